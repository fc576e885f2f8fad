//! Shared HTTP plumbing for the registry adapters

use crate::domain::errors::SourceError;
use crate::domain::{EnrichError, Result};
use reqwest::{Client, ClientBuilder};
use scraper::Selector;
use serde::de::DeserializeOwned;
use std::time::Duration;
use reqwest::StatusCode;
use url::Url;

/// Placeholder replaced with the company id in endpoint templates
pub const ID_PLACEHOLDER: &str = "{id}";

/// HTTP client configured for one registry
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url_template: String,
}

impl HttpSource {
    /// Build a client with the given per-request timeout and user agent
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the TLS backend cannot be initialised.
    pub fn new(url_template: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(user_agent)
            .build()
            .map_err(|e| EnrichError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }

    /// Endpoint for `id`, with the id percent-encoded
    pub fn url_for(&self, id: &str) -> std::result::Result<Url, SourceError> {
        let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
        let raw = self.url_template.replace(ID_PLACEHOLDER, &encoded);
        Url::parse(&raw).map_err(|e| SourceError::Transport(format!("Invalid URL '{raw}': {e}")))
    }

    /// GET the endpoint for `id` and return the body as text
    ///
    /// A 404 is reported as [`SourceError::NotFound`], any other non-2xx
    /// status as [`SourceError::HttpStatus`].
    pub async fn get_text(&self, id: &str) -> std::result::Result<String, SourceError> {
        let url = self.url_for(id)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(SourceError::from_reqwest)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(SourceError::from_reqwest)
    }

    /// GET the endpoint for `id` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, id: &str) -> std::result::Result<T, SourceError> {
        let body = self.get_text(id).await?;
        serde_json::from_str(&body).map_err(|e| SourceError::InvalidResponse(e.to_string()))
    }
}

/// Parse a CSS selector, reporting failures as a source error
pub(crate) fn selector(css: &str) -> std::result::Result<Selector, SourceError> {
    Selector::parse(css)
        .map_err(|e| SourceError::InvalidResponse(format!("Bad selector '{css}': {e}")))
}

/// Text content of an element with whitespace collapsed
pub(crate) fn element_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn source(template: &str) -> HttpSource {
        HttpSource::new(template, Duration::from_secs(5), "test-agent").unwrap()
    }

    #[test]
    fn test_url_for_substitutes_every_placeholder() {
        let src = source("https://example.org/company/{id}?q={id}");
        let url = src.url_for("10150825").unwrap();
        assert_eq!(url.as_str(), "https://example.org/company/10150825?q=10150825");
    }

    #[test]
    fn test_url_for_encodes_id() {
        let src = source("https://example.org/search?q={id}");
        let url = src.url_for("12 34&x").unwrap();
        assert_eq!(url.as_str(), "https://example.org/search?q=12+34%26x");
    }

    #[test]
    fn test_url_for_rejects_bad_template() {
        let src = source("not a url {id}");
        assert!(matches!(src.url_for("1"), Err(SourceError::Transport(_))));
    }

    #[tokio::test]
    async fn test_get_text_maps_statuses() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/company/404404")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/company/503503")
            .with_status(503)
            .create_async()
            .await;
        server
            .mock("GET", "/company/200200")
            .with_status(200)
            .with_body("<h1>ok</h1>")
            .create_async()
            .await;
        let src = source(&format!("{}/company/{{id}}", server.url()));

        assert!(matches!(
            src.get_text("404404").await,
            Err(SourceError::NotFound(id)) if id == "404404"
        ));
        assert!(matches!(
            src.get_text("503503").await,
            Err(SourceError::HttpStatus { status: 503, .. })
        ));
        assert_eq!(src.get_text("200200").await.unwrap(), "<h1>ok</h1>");
    }

    #[test]
    fn test_element_text_collapses_whitespace() {
        let html = Html::parse_fragment("<p>  ACME \n  <b>Holding</b>\t SA </p>");
        let p = selector("p").unwrap();
        let element = html.select(&p).next().unwrap();
        assert_eq!(element_text(element), "ACME Holding SA");
    }
}
