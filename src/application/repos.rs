//! Gateway trait describing the Cockpit content API adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::locale::Locale;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to `{endpoint}` timed out after {}ms", .after.as_millis())]
    Timeout { endpoint: String, after: Duration },
    #[error("cockpit responded {status} {status_text} for `{endpoint}`")]
    HttpStatus {
        endpoint: String,
        status: u16,
        status_text: String,
    },
    #[error("network error for `{endpoint}`: {message}")]
    Network { endpoint: String, message: String },
    #[error("failed to decode response from `{endpoint}`: {message}")]
    Decode { endpoint: String, message: String },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl GatewayError {
    pub fn network(endpoint: &str, err: impl std::fmt::Display) -> Self {
        Self::Network {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }

    pub fn decode(endpoint: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HttpStatus { status: 404, .. })
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::HttpStatus { .. } => "http_status",
            Self::Network { .. } => "network",
            Self::Decode { .. } => "decode",
            Self::Url(_) => "url",
        }
    }
}

/// Value of one query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    /// Objects and arrays, sent as compact JSON text.
    Json(Value),
}

impl ParamValue {
    pub fn render(&self) -> String {
        match self {
            ParamValue::Text(text) => text.clone(),
            ParamValue::Json(Value::String(text)) => text.clone(),
            ParamValue::Json(value) => value.to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(_) | Value::Array(_) => Self::Json(value),
            Value::String(text) => Self::Text(text),
            other => Self::Text(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_json(self) -> Value {
        match self {
            SortOrder::Ascending => Value::from(1),
            SortOrder::Descending => Value::from(-1),
        }
    }
}

/// Ordered query parameters for content requests.
///
/// Parameters render in insertion order. Setting a key that is already present
/// replaces its value in place, so defaults keep their leading position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionParams {
    entries: Vec<(String, ParamValue)>,
}

impl CollectionParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn locale(self, locale: Locale) -> Self {
        self.with("locale", locale.cms_code())
    }

    pub fn limit(self, limit: u32) -> Self {
        self.with("limit", limit)
    }

    pub fn skip(self, skip: u32) -> Self {
        self.with("skip", skip)
    }

    pub fn populate(self, depth: u32) -> Self {
        self.with("populate", depth)
    }

    pub fn filter(self, filter: Value) -> Self {
        self.with("filter", ParamValue::Json(filter))
    }

    /// Adds `field` to the sort document, keeping previously added fields.
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        let mut document = match self.get("sort") {
            Some(ParamValue::Json(Value::Object(existing))) => existing.clone(),
            _ => Map::new(),
        };
        document.insert(field.into(), order.as_json());
        self.set("sort", ParamValue::Json(Value::Object(document)));
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `self` layered over `defaults`: default keys come first, overridden in place.
    pub fn merged_over(self, mut defaults: CollectionParams) -> CollectionParams {
        for (key, value) in self.entries {
            defaults.set(key, value);
        }
        defaults
    }
}

/// Read access to the Cockpit content API.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// `GET {base}/api/{endpoint}` with the API token and `params`, decoded as JSON.
    async fn fetch_json(
        &self,
        endpoint: &str,
        params: &CollectionParams,
    ) -> Result<Value, GatewayError>;

    /// Ask the image transform endpoint for a rendition; returns its URL.
    async fn fetch_image_url(
        &self,
        image_id: &str,
        query: &[(&'static str, String)],
    ) -> Result<String, GatewayError>;

    /// Untransformed asset URL, used when a rendition cannot be produced.
    fn asset_url(&self, image_id: &str) -> String;
}
