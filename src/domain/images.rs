//! Image transform parameters, cache keys and responsive breakpoints.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_QUALITY: u8 = 70;
pub const DEFAULT_BREAKPOINTS: [u32; 5] = [320, 480, 768, 1024, 1200];

const MOBILE_MAX_WIDTH: u32 = 400;
const MOBILE_QUALITY_FLOOR: u8 = 50;
const TABLET_MAX_WIDTH: u32 = 800;
const TABLET_QUALITY_FLOOR: u8 = 60;
/// Breakpoints wider than this multiple of the base width are skipped.
const MAX_UPSCALE: f64 = 1.5;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum ResizeMode {
    Thumbnail,
    #[default]
    BestFit,
    Resize,
    FitToWidth,
    FitToHeight,
}

impl ResizeMode {
    /// Value of the `m` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            ResizeMode::Thumbnail => "thumbnail",
            ResizeMode::BestFit => "bestFit",
            ResizeMode::Resize => "resize",
            ResizeMode::FitToWidth => "fitToWidth",
            ResizeMode::FitToHeight => "fitToHeight",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Webp,
    Jpeg,
    Png,
    Avif,
}

impl ImageFormat {
    /// Value of the `mime` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Webp => "webp",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Avif => "avif",
        }
    }

    /// Format actually requested from Cockpit; there is no AVIF encoder behind it.
    pub fn resolved(self) -> Self {
        match self {
            ImageFormat::Avif => ImageFormat::Webp,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOptions {
    pub width: u32,
    pub height: u32,
    pub resize: ResizeMode,
    pub quality: u8,
    pub format: ImageFormat,
    pub progressive: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            resize: ResizeMode::default(),
            quality: DEFAULT_QUALITY,
            format: ImageFormat::default(),
            progressive: true,
        }
    }
}

impl ImageOptions {
    /// Same options resized to `width`, keeping the aspect ratio of the base size.
    pub fn scaled_to(&self, width: u32) -> Self {
        Self {
            width,
            height: scaled_height(self.width, self.height, width),
            ..*self
        }
    }
}

/// Lower quality for narrow viewports: `≤400px` floors at 50, `≤800px` at 60.
pub fn optimal_quality(width: u32, quality: u8) -> u8 {
    if width <= MOBILE_MAX_WIDTH {
        MOBILE_QUALITY_FLOOR.max(quality.saturating_sub(20))
    } else if width <= TABLET_MAX_WIDTH {
        TABLET_QUALITY_FLOOR.max(quality.saturating_sub(10))
    } else {
        quality
    }
}

/// Height proportional to `target_width`, rounded to the nearest pixel.
pub fn scaled_height(base_width: u32, base_height: u32, target_width: u32) -> u32 {
    if base_width == 0 {
        return base_height;
    }
    let scaled = f64::from(base_height) * f64::from(target_width) / f64::from(base_width);
    // Bounded by base_height * target_width / base_width, which fits in u32 for
    // any realistic breakpoint.
    scaled.round() as u32
}

/// Breakpoints usable for a srcset of `base_width`, ascending and deduplicated.
pub fn srcset_breakpoints(base_width: u32, breakpoints: &[u32]) -> Vec<u32> {
    if base_width == 0 {
        return Vec::new();
    }
    let ceiling = f64::from(base_width) * MAX_UPSCALE;
    let mut widths: Vec<u32> = breakpoints
        .iter()
        .copied()
        .filter(|&bp| bp > 0 && f64::from(bp) <= ceiling)
        .collect();
    widths.sort_unstable();
    widths.dedup();
    widths
}

/// Identity of one transformed rendition in the image URL cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageCacheKey {
    pub image_id: String,
    pub width: u32,
    pub height: u32,
    pub resize: ResizeMode,
    pub quality: u8,
    pub format: ImageFormat,
}

impl ImageCacheKey {
    /// Key for `options` after quality adjustment and format resolution.
    pub fn new(image_id: impl Into<String>, options: &ImageOptions) -> Self {
        Self {
            image_id: image_id.into(),
            width: options.width,
            height: options.height,
            resize: options.resize,
            quality: optimal_quality(options.width, options.quality),
            format: options.format.resolved(),
        }
    }

    /// Query parameters for Cockpit's image transform endpoint.
    pub fn transform_query(&self, progressive: bool) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("w", self.width.to_string()),
            ("h", self.height.to_string()),
            ("m", self.resize.as_str().to_string()),
            ("q", self.quality.to_string()),
            ("mime", self.format.as_str().to_string()),
        ];
        if progressive {
            query.push(("progressive", "1".to_string()));
        }
        query
    }
}

impl fmt::Display for ImageCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}x{}-{}-{}-{}",
            self.image_id,
            self.width,
            self.height,
            self.resize.as_str(),
            self.quality,
            self.format.as_str()
        )
    }
}
