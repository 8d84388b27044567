//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::domain::locale::Locale;

mod cli;

pub use cli::*;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "ikono";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_IMAGE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct Settings {
    pub cockpit: CockpitSettings,
    pub images: ImageSettings,
    pub logging: LoggingSettings,
}

#[derive(Clone)]
pub struct CockpitSettings {
    pub base_url: Url,
    pub api_token: String,
    pub request_timeout: Duration,
    pub image_timeout: Duration,
    pub default_locale: Locale,
}

impl fmt::Debug for CockpitSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CockpitSettings")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("image_timeout", &self.image_timeout)
            .field("default_locale", &self.default_locale)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettings {
    pub cache_ttl: Duration,
    pub sweep_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    Settings::from_raw(load_raw(cli)?)
}

/// Logging settings only; commands that never talk to Cockpit use this so
/// they run without credentials.
pub fn load_logging(cli: &CliArgs) -> Result<LoggingSettings, LoadError> {
    build_logging_settings(load_raw(cli)?.logging)
}

fn load_raw(cli: &CliArgs) -> Result<RawSettings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("IKONO").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);
    Ok(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    cockpit: RawCockpitSettings,
    images: RawImageSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(url) = overrides.cockpit_base_url.as_ref() {
            self.cockpit.base_url = Some(url.clone());
        }
        if let Some(token) = overrides.cockpit_api_token.as_ref() {
            self.cockpit.api_token = Some(token.clone());
        }
        if let Some(path) = overrides.cockpit_api_token_file.as_ref() {
            self.cockpit.api_token_file = Some(path.clone());
        }
        if let Some(timeout) = overrides.cockpit_request_timeout_ms {
            self.cockpit.request_timeout_ms = Some(timeout);
        }
        if let Some(locale) = overrides.locale {
            self.cockpit.default_locale = Some(locale.as_str().to_string());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            cockpit,
            images,
            logging,
        } = raw;

        let cockpit = build_cockpit_settings(cockpit)?;
        let images = build_image_settings(images)?;
        let logging = build_logging_settings(logging)?;

        Ok(Self {
            cockpit,
            images,
            logging,
        })
    }
}

fn build_cockpit_settings(cockpit: RawCockpitSettings) -> Result<CockpitSettings, LoadError> {
    let base_url = match non_blank(cockpit.base_url) {
        Some(value) => parse_base_url(&value)
            .map_err(|reason| LoadError::invalid("cockpit.base_url", reason))?,
        None => return Err(LoadError::invalid("cockpit.base_url", "must be set")),
    };

    let api_token = match cockpit.api_token_file {
        Some(path) => read_token_file(&path)?,
        None => non_blank(cockpit.api_token)
            .ok_or_else(|| LoadError::invalid("cockpit.api_token", "must be set"))?,
    };

    let request_timeout = millis(
        cockpit
            .request_timeout_ms
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        "cockpit.request_timeout_ms",
    )?;
    let image_timeout = millis(
        cockpit.image_timeout_ms.unwrap_or(DEFAULT_IMAGE_TIMEOUT_MS),
        "cockpit.image_timeout_ms",
    )?;

    let default_locale = match non_blank(cockpit.default_locale) {
        Some(value) => Locale::from_str(&value)
            .map_err(|err| LoadError::invalid("cockpit.default_locale", err.to_string()))?,
        None => Locale::default(),
    };

    Ok(CockpitSettings {
        base_url,
        api_token,
        request_timeout,
        image_timeout,
        default_locale,
    })
}

fn build_image_settings(images: RawImageSettings) -> Result<ImageSettings, LoadError> {
    let cache_ttl = seconds(
        images.cache_ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECS),
        "images.cache_ttl_seconds",
    )?;
    let sweep_interval = seconds(
        images
            .sweep_interval_seconds
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
        "images.sweep_interval_seconds",
    )?;

    Ok(ImageSettings {
        cache_ttl,
        sweep_interval,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCockpitSettings {
    base_url: Option<String>,
    api_token: Option<String>,
    api_token_file: Option<PathBuf>,
    request_timeout_ms: Option<u64>,
    image_timeout_ms: Option<u64>,
    default_locale: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawImageSettings {
    cache_ttl_seconds: Option<u64>,
    sweep_interval_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn parse_base_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|err| format!("invalid URL `{value}`: {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme `{other}`, expected http or https")),
    }
}

fn read_token_file(path: &Path) -> Result<String, LoadError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        LoadError::invalid(
            "cockpit.api_token_file",
            format!("failed to read {}: {err}", path.display()),
        )
    })?;
    non_blank(Some(contents))
        .ok_or_else(|| LoadError::invalid("cockpit.api_token_file", "file is empty"))
}

fn millis(value: u64, key: &'static str) -> Result<Duration, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    Ok(Duration::from_millis(value))
}

fn seconds(value: u64, key: &'static str) -> Result<Duration, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    Ok(Duration::from_secs(value))
}
