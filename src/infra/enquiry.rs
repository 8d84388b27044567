//! Artwork enquiry form submission.
//!
//! The site host collects form posts addressed to its root; the form is
//! identified by the `form-name` field.

use reqwest::{
    Client,
    header::{CONTENT_TYPE, HeaderValue},
};
use thiserror::Error;
use tracing::info;
use url::{Url, form_urlencoded};

pub const ENQUIRY_FORM_NAME: &str = "artwork-enquiry";
const FORM_NAME_FIELD: &str = "form-name";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Error)]
pub enum EnquiryError {
    #[error("invalid site URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("site responded {status}")]
    Status { status: u16 },
    #[error("invalid field `{0}`, expected NAME=VALUE")]
    InvalidField(String),
}

/// Ordered enquiry fields as the visitor filled them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnquiryForm {
    fields: Vec<(String, String)>,
}

impl EnquiryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Parse a `NAME=VALUE` pair; the value may itself contain `=`.
    pub fn parse_field(raw: &str) -> Result<(String, String), EnquiryError> {
        match raw.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.to_string()))
            }
            _ => Err(EnquiryError::InvalidField(raw.to_string())),
        }
    }

    /// URL-encoded body with the form name appended.
    pub fn encode(&self) -> String {
        let mut body = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.fields {
            if name != FORM_NAME_FIELD {
                body.append_pair(name, value);
            }
        }
        body.append_pair(FORM_NAME_FIELD, ENQUIRY_FORM_NAME);
        body.finish()
    }
}

impl FromIterator<(String, String)> for EnquiryForm {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EnquiryClient {
    client: Client,
    endpoint: Url,
}

impl EnquiryClient {
    pub fn new(site: &str) -> Result<Self, EnquiryError> {
        let endpoint = Url::parse(site)?.join("/")?;
        let client = Client::builder()
            .user_agent(concat!("ikono/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn submit(&self, form: &EnquiryForm) -> Result<(), EnquiryError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
            .body(form.encode())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnquiryError::Status {
                status: status.as_u16(),
            });
        }

        info!(
            target = "infra::enquiry",
            fields = form.fields().len(),
            "enquiry submitted"
        );
        Ok(())
    }
}

/// Recognise the page a successful form post redirects to.
///
/// Returns the URL to show instead, without query or fragment, so the marker
/// is consumed once.
pub fn redirect_outcome(url: &Url) -> Option<Url> {
    let submitted = url.query_pairs().any(|(key, value)| {
        (key == "form" && value == ENQUIRY_FORM_NAME) || (key == "success" && value == "true")
    });
    if !submitted {
        return None;
    }
    let mut clean = url.clone();
    clean.set_query(None);
    clean.set_fragment(None);
    Some(clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_appends_form_name_once() {
        let form = EnquiryForm::new()
            .field("name", "Aiko Tanaka")
            .field("message", "Is #12 still available?")
            .field("form-name", "spoofed");

        assert_eq!(
            form.encode(),
            "name=Aiko+Tanaka&message=Is+%2312+still+available%3F&form-name=artwork-enquiry"
        );
    }

    #[test]
    fn parse_field_splits_on_first_equals() {
        assert_eq!(
            EnquiryForm::parse_field("note=a=b").expect("field"),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(matches!(
            EnquiryForm::parse_field("novalue"),
            Err(EnquiryError::InvalidField(_))
        ));
        assert!(EnquiryForm::parse_field("=x").is_err());
    }

    #[test]
    fn redirect_marker_is_detected_and_stripped() {
        let url = Url::parse("https://gallery.example/artworks/kumo?form=artwork-enquiry#top")
            .expect("url");
        let clean = redirect_outcome(&url).expect("marker");
        assert_eq!(clean.as_str(), "https://gallery.example/artworks/kumo");

        let url = Url::parse("https://gallery.example/?success=true").expect("url");
        assert!(redirect_outcome(&url).is_some());

        let url = Url::parse("https://gallery.example/?success=false").expect("url");
        assert!(redirect_outcome(&url).is_none());
    }

    #[test]
    fn client_posts_to_site_root() {
        let client = EnquiryClient::new("https://gallery.example/ja/artworks").expect("client");
        assert_eq!(client.endpoint().as_str(), "https://gallery.example/");
    }
}
