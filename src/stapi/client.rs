use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use tracing::debug;

use crate::errors::StapiError;

pub const DEFAULT_BASE_URL: &str = "https://stapi.co/api/v1/rest";

/// Raw access to the STAPI character endpoints.
///
/// Implementations return the parsed JSON body untouched; shape checks happen
/// in the callers.
#[async_trait]
pub trait CharacterApi: Send + Sync {
    async fn fetch_character(&self, uid: &str) -> Result<Value, StapiError>;

    async fn search_characters(&self, name: &str) -> Result<Value, StapiError>;
}

#[derive(Debug, Clone)]
pub struct StapiClient {
    client: Client,
    base_url: String,
}

impl StapiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StapiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| StapiError::transport(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_json(response: reqwest::Response, endpoint: &str) -> Result<Value, StapiError> {
        let status = response.status();
        let body = response.text().await.map_err(|err| {
            StapiError::transport(format!("failed to read {endpoint} response body: {err}"))
        })?;

        let json: Value = serde_json::from_str(&body).map_err(|err| {
            StapiError::transport(format!("{endpoint} returned a non-JSON body: {err}"))
        })?;

        debug!(endpoint, status = status.as_u16(), body = %json, "stapi response");
        Ok(json)
    }
}

#[async_trait]
impl CharacterApi for StapiClient {
    async fn fetch_character(&self, uid: &str) -> Result<Value, StapiError> {
        let response = self
            .client
            .get(format!("{}/character", self.base_url))
            .query(&[("uid", uid)])
            .send()
            .await
            .map_err(|err| StapiError::transport(format!("character request failed: {err}")))?;

        Self::read_json(response, "character").await
    }

    async fn search_characters(&self, name: &str) -> Result<Value, StapiError> {
        let response = self
            .client
            .post(format!("{}/character/search", self.base_url))
            .header(header::ACCEPT, "application/json")
            .form(&[("title", name), ("name", name)])
            .send()
            .await
            .map_err(|err| {
                StapiError::transport(format!("character search request failed: {err}"))
            })?;

        Self::read_json(response, "character/search").await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> StapiClient {
        StapiClient::new(server.uri(), Duration::from_secs(5)).expect("client builds")
    }

    #[tokio::test]
    async fn fetch_character_sends_uid_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/character"))
            .and(query_param("uid", "CHMA0000187912"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"character": {"name": "Jean-Luc Picard"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let body = client(&server)
            .fetch_character("CHMA0000187912")
            .await
            .expect("fetch succeeds");

        assert_eq!(body["character"]["name"], "Jean-Luc Picard");
    }

    #[tokio::test]
    async fn search_posts_form_with_title_and_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/character/search"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(header("accept", "application/json"))
            .and(body_string("title=Jean-Luc+Picard&name=Jean-Luc+Picard"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"characters": [{"uid": "CHMA0000187912"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let body = client(&server)
            .search_characters("Jean-Luc Picard")
            .await
            .expect("search succeeds");

        assert_eq!(body["characters"][0]["uid"], "CHMA0000187912");
    }

    #[tokio::test]
    async fn non_json_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/character"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .fetch_character("CHMA0000001234")
            .await
            .expect_err("html body must fail");

        assert!(matches!(err, StapiError::Transport(_)));
    }

    #[tokio::test]
    async fn json_error_body_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/character"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})),
            )
            .mount(&server)
            .await;

        let body = client(&server)
            .fetch_character("missing")
            .await
            .expect("json body is returned regardless of status");

        assert_eq!(body, json!({"error": "not found"}));
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = StapiClient::new("https://stapi.co/api/v1/rest/", Duration::from_secs(1))
            .expect("client builds");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }
}
