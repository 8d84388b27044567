//! Fail-open reads over the content gateway.
//!
//! Every read returns a [`Fetched`] value. When Cockpit cannot be reached or
//! answers with garbage the caller still gets an empty value to render, along
//! with the reason it is empty.

use std::sync::Arc;

use metrics::counter;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::domain::locale::Locale;

use super::repos::{CollectionParams, ContentGateway, GatewayError};

const METRIC_CMS_FETCH_FAILED: &str = "ikono_cms_fetch_failed_total";

/// Outcome of a fail-open read.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Fresh(T),
    /// Cockpit could not serve the content; `value` is a fallback.
    Degraded { value: T, reason: String },
}

impl<T> Fetched<T> {
    pub fn value(&self) -> &T {
        match self {
            Fetched::Fresh(value) | Fetched::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Fetched::Fresh(value) | Fetched::Degraded { value, .. } => value,
        }
    }

    pub fn into_parts(self) -> (T, Option<String>) {
        match self {
            Fetched::Fresh(value) => (value, None),
            Fetched::Degraded { value, reason } => (value, Some(reason)),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Fetched::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Fetched::Fresh(_) => None,
            Fetched::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Fresh(value) => Fetched::Fresh(f(value)),
            Fetched::Degraded { value, reason } => Fetched::Degraded {
                value: f(value),
                reason,
            },
        }
    }

    /// Mark as degraded, keeping an earlier reason if there is one.
    pub fn degrade(self, reason: impl Into<String>) -> Fetched<T> {
        match self {
            Fetched::Fresh(value) => Fetched::Degraded {
                value,
                reason: reason.into(),
            },
            degraded => degraded,
        }
    }
}

impl<T: Default> Fetched<T> {
    pub fn degraded(reason: impl Into<String>) -> Self {
        Fetched::Degraded {
            value: T::default(),
            reason: reason.into(),
        }
    }
}

/// Typed, fail-open reads of Cockpit collections and singletons.
#[derive(Clone)]
pub struct ContentService {
    gateway: Arc<dyn ContentGateway>,
    default_locale: Locale,
}

impl ContentService {
    pub fn new(gateway: Arc<dyn ContentGateway>, default_locale: Locale) -> Self {
        Self {
            gateway,
            default_locale,
        }
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    /// All items of `collection`. Failures yield an empty list.
    pub async fn get_collection<T: DeserializeOwned>(
        &self,
        collection: &str,
        params: CollectionParams,
    ) -> Fetched<Vec<T>> {
        let endpoint = format!("content/items/{collection}");
        match self.fetch(&endpoint, params).await {
            Ok(Value::Null) => Fetched::Fresh(Vec::new()),
            Ok(body) => match serde_json::from_value(body) {
                Ok(items) => Fetched::Fresh(items),
                Err(err) => Self::fail(GatewayError::decode(&endpoint, err)),
            },
            Err(err) => Self::fail(err),
        }
    }

    /// One item of `collection` by id. A 404 is an absent item, not a failure.
    pub async fn get_collection_item<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        params: CollectionParams,
    ) -> Fetched<Option<T>> {
        let endpoint = format!("content/item/{collection}/{id}");
        self.fetch_optional(endpoint, params).await
    }

    /// The singleton model `name`.
    pub async fn get_singleton<T: DeserializeOwned>(
        &self,
        name: &str,
        params: CollectionParams,
    ) -> Fetched<Option<T>> {
        let endpoint = format!("content/item/{name}");
        self.fetch_optional(endpoint, params).await
    }

    async fn fetch_optional<T: DeserializeOwned>(
        &self,
        endpoint: String,
        params: CollectionParams,
    ) -> Fetched<Option<T>> {
        match self.fetch(&endpoint, params).await {
            Ok(Value::Null) => Fetched::Fresh(None),
            Ok(body) => match serde_json::from_value(body) {
                Ok(item) => Fetched::Fresh(Some(item)),
                Err(err) => Self::fail(GatewayError::decode(&endpoint, err)),
            },
            Err(err) if err.is_not_found() => Fetched::Fresh(None),
            Err(err) => Self::fail(err),
        }
    }

    async fn fetch(&self, endpoint: &str, params: CollectionParams) -> Result<Value, GatewayError> {
        let params = params.merged_over(CollectionParams::new().locale(self.default_locale));
        self.gateway.fetch_json(endpoint, &params).await
    }

    fn fail<T: Default>(err: GatewayError) -> Fetched<T> {
        counter!(METRIC_CMS_FETCH_FAILED, "kind" => err.kind()).increment(1);
        warn!(
            target = "application::content",
            kind = err.kind(),
            error = %err,
            "cockpit read failed, serving empty content"
        );
        Fetched::degraded(err.to_string())
    }
}
