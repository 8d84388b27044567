use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, builder::BoolishValueParser};

use crate::{
    domain::{
        artworks::DEFAULT_HIGHLIGHT_LIMIT,
        images::{
            DEFAULT_BREAKPOINTS, DEFAULT_HEIGHT, DEFAULT_QUALITY, DEFAULT_WIDTH, ImageFormat,
            ImageOptions, ResizeMode,
        },
        locale::Locale,
    },
    infra::enquiry::EnquiryForm,
};

/// Command-line arguments for the Ikono binary.
#[derive(Debug, Parser)]
#[command(
    name = "ikono",
    version,
    about = "Inspect Ikono gallery content served by Cockpit"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "IKONO_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the Cockpit instance URL.
    #[arg(
        long = "cockpit-base-url",
        env = "COCKPIT_BASE_URL",
        value_name = "URL",
        global = true
    )]
    pub cockpit_base_url: Option<String>,

    /// Override the Cockpit API token.
    #[arg(
        long = "cockpit-api-token",
        env = "COCKPIT_API_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub cockpit_api_token: Option<String>,

    /// Read the Cockpit API token from a file; wins over --cockpit-api-token.
    #[arg(
        long = "cockpit-api-token-file",
        env = "COCKPIT_API_TOKEN_FILE",
        value_name = "PATH",
        global = true
    )]
    pub cockpit_api_token_file: Option<PathBuf>,

    /// Override the Cockpit request timeout.
    #[arg(long = "cockpit-timeout-ms", value_name = "MILLIS", global = true)]
    pub cockpit_request_timeout_ms: Option<u64>,

    /// Content locale.
    #[arg(long = "locale", value_enum, global = true)]
    pub locale: Option<Locale>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// List artists ordered by representation type.
    Artists,
    /// Show one artist.
    Artist(IdArgs),
    /// List artworks.
    Artworks(ArtworksArgs),
    /// Show one artwork.
    Artwork(IdArgs),
    /// Group an artist's achievements by category and year.
    Achievements(IdArgs),
    /// List exhibitions.
    Exhibitions,
    /// Show one exhibition.
    Exhibition(ExhibitionArgs),
    /// Show the home page singleton.
    Home(HomeArgs),
    /// List content pages.
    Pages,
    /// Show one content page.
    Page(IdArgs),
    /// Resolve the optimized URL of an image.
    Image(ImageArgs),
    /// Build a responsive srcset for an image.
    Srcset(SrcsetArgs),
    /// Resolve optimized URLs for several images at once.
    Preload(PreloadArgs),
    /// Submit an artwork enquiry to the site.
    Enquire(EnquireArgs),
}

#[derive(Debug, Args, Clone)]
pub struct IdArgs {
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Debug, Args, Clone)]
pub struct ArtworksArgs {
    /// Only highlighted artworks.
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "artist")]
    pub highlighted: bool,

    /// Maximum number of highlighted artworks.
    #[arg(long, default_value_t = DEFAULT_HIGHLIGHT_LIMIT, requires = "highlighted")]
    pub limit: usize,

    /// Only works by this artist, split by edition.
    #[arg(long, value_name = "ARTIST_ID")]
    pub artist: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ExhibitionArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    /// Print the exhibited artworks instead of the exhibition.
    #[arg(long, action = ArgAction::SetTrue)]
    pub artworks: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Carousel {
    Artists,
    Artworks,
}

#[derive(Debug, Args, Clone)]
pub struct HomeArgs {
    /// Print a resolved home page carousel instead of the page.
    #[arg(long, value_enum)]
    pub carousel: Option<Carousel>,
}

#[derive(Debug, Args, Clone)]
pub struct ImageOptionArgs {
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    #[arg(long, value_enum, default_value_t = ResizeMode::BestFit)]
    pub resize: ResizeMode,

    #[arg(
        long,
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub quality: u8,

    #[arg(long, value_enum, default_value_t = ImageFormat::Webp)]
    pub format: ImageFormat,

    /// Request baseline instead of progressive encoding.
    #[arg(long = "no-progressive", action = ArgAction::SetTrue)]
    pub no_progressive: bool,
}

impl From<&ImageOptionArgs> for ImageOptions {
    fn from(args: &ImageOptionArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            resize: args.resize,
            quality: args.quality,
            format: args.format,
            progressive: !args.no_progressive,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ImageArgs {
    #[arg(value_name = "IMAGE_ID")]
    pub id: String,

    #[command(flatten)]
    pub options: ImageOptionArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SrcsetArgs {
    #[arg(value_name = "IMAGE_ID")]
    pub id: String,

    #[command(flatten)]
    pub options: ImageOptionArgs,

    /// Comma-separated candidate widths.
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_BREAKPOINTS
    )]
    pub breakpoints: Vec<u32>,
}

#[derive(Debug, Args, Clone)]
pub struct PreloadArgs {
    #[arg(value_name = "IMAGE_ID", required = true)]
    pub ids: Vec<String>,

    /// Override the preload quality.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,
}

#[derive(Debug, Args, Clone)]
pub struct EnquireArgs {
    /// Site receiving the form post.
    #[arg(long, env = "IKONO_SITE_URL", value_name = "URL")]
    pub site: String,

    /// Form field, repeatable.
    #[arg(
        long = "field",
        value_name = "NAME=VALUE",
        value_parser = EnquiryForm::parse_field
    )]
    pub fields: Vec<(String, String)>,
}
