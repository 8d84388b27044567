//! HTTP adapter for the Cockpit content API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::histogram;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderValue},
};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{
    application::repos::{CollectionParams, ContentGateway, GatewayError},
    config::CockpitSettings,
};

use super::error::InfraError;

const METRIC_CMS_FETCH_MS: &str = "ikono_cms_fetch_ms";
const API_PREFIX: &str = "api";
const IMAGE_ENDPOINT: &str = "assets/image";
const ACCEPT_JSON: &str = "application/json";
const ACCEPT_IMAGE_URL: &str = "text/plain, */*";

/// Cockpit client bound to one instance and API token.
#[derive(Clone)]
pub struct CockpitClient {
    client: Client,
    api_root: String,
    token: String,
    request_timeout: Duration,
    image_timeout: Duration,
}

impl std::fmt::Debug for CockpitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CockpitClient")
            .field("api_root", &self.api_root)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("image_timeout", &self.image_timeout)
            .finish()
    }
}

impl CockpitClient {
    pub fn new(settings: &CockpitSettings) -> Result<Self, InfraError> {
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            client,
            api_root: api_root(&settings.base_url),
            token: settings.api_token.clone(),
            request_timeout: settings.request_timeout,
            image_timeout: settings.image_timeout,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("ikono/", env!("CARGO_PKG_VERSION"))
    }

    /// `{base}/api/{endpoint}?token=…` followed by `params` in insertion order.
    pub fn build_url(
        &self,
        endpoint: &str,
        params: &CollectionParams,
    ) -> Result<Url, GatewayError> {
        let mut url = self.endpoint_url(endpoint)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("token", &self.token);
            for (key, value) in params.iter() {
                query.append_pair(key, &value.render());
            }
        }
        Ok(url)
    }

    /// GET `endpoint` and decode the body as JSON, giving up after `timeout`.
    ///
    /// The request future is dropped on expiry, which aborts the connection.
    pub async fn fetch_resource(
        &self,
        endpoint: &str,
        params: &CollectionParams,
        timeout: Option<Duration>,
    ) -> Result<Value, GatewayError> {
        let url = self.build_url(endpoint, params)?;
        let after = timeout.unwrap_or(self.request_timeout);
        let started = Instant::now();

        let request = async {
            let response = self
                .client
                .get(url)
                .header(ACCEPT, HeaderValue::from_static(ACCEPT_JSON))
                .send()
                .await
                .map_err(|err| GatewayError::network(endpoint, err))?;
            ensure_success(endpoint, response.status())?;
            let body = response
                .bytes()
                .await
                .map_err(|err| GatewayError::network(endpoint, err))?;
            serde_json::from_slice::<Value>(&body)
                .map_err(|err| GatewayError::decode(endpoint, err))
        };

        let outcome = tokio::time::timeout(after, request)
            .await
            .unwrap_or_else(|_| {
                Err(GatewayError::Timeout {
                    endpoint: endpoint.to_string(),
                    after,
                })
            });

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        histogram!(METRIC_CMS_FETCH_MS, "op" => "content").record(elapsed_ms);
        debug!(
            target = "infra::cockpit",
            endpoint,
            elapsed_ms,
            ok = outcome.is_ok(),
            "cockpit request finished"
        );

        outcome
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, GatewayError> {
        let endpoint = endpoint.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{endpoint}", self.api_root))?)
    }

    fn image_url(&self, image_id: &str) -> Result<Url, GatewayError> {
        let mut url = self.endpoint_url(IMAGE_ENDPOINT)?;
        url.path_segments_mut()
            .map_err(|()| GatewayError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(image_id);
        Ok(url)
    }
}

#[async_trait]
impl ContentGateway for CockpitClient {
    async fn fetch_json(
        &self,
        endpoint: &str,
        params: &CollectionParams,
    ) -> Result<Value, GatewayError> {
        self.fetch_resource(endpoint, params, None).await
    }

    async fn fetch_image_url(
        &self,
        image_id: &str,
        query: &[(&'static str, String)],
    ) -> Result<String, GatewayError> {
        let mut url = self.image_url(image_id)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        let after = self.image_timeout;
        let started = Instant::now();
        let request = async {
            let response = self
                .client
                .get(url)
                .header(ACCEPT, HeaderValue::from_static(ACCEPT_IMAGE_URL))
                .send()
                .await
                .map_err(|err| GatewayError::network(IMAGE_ENDPOINT, err))?;
            ensure_success(IMAGE_ENDPOINT, response.status())?;
            let body = response
                .text()
                .await
                .map_err(|err| GatewayError::network(IMAGE_ENDPOINT, err))?;
            Ok::<_, GatewayError>(body.trim().to_string())
        };

        let outcome = tokio::time::timeout(after, request)
            .await
            .unwrap_or_else(|_| {
                Err(GatewayError::Timeout {
                    endpoint: IMAGE_ENDPOINT.to_string(),
                    after,
                })
            });
        histogram!(METRIC_CMS_FETCH_MS, "op" => "image")
            .record(started.elapsed().as_secs_f64() * 1000.0);
        outcome
    }

    fn asset_url(&self, image_id: &str) -> String {
        self.image_url(image_id)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}/{IMAGE_ENDPOINT}/{image_id}", self.api_root))
    }
}

fn api_root(base_url: &Url) -> String {
    format!("{}/{API_PREFIX}", base_url.as_str().trim_end_matches('/'))
}

fn ensure_success(endpoint: &str, status: StatusCode) -> Result<(), GatewayError> {
    if status.is_success() {
        return Ok(());
    }
    Err(GatewayError::HttpStatus {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
    })
}
