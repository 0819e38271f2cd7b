use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::ClientError;
use crate::objects::SendMessageRequest;

/// Production Graph API host for Instagram messaging.
pub const DEFAULT_BASE_URL: &str = "https://graph.instagram.com";

/// Graph API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "v21.0";

/// Typed HTTP client for `POST /<api-version>/<account>/messages`.
///
/// The client holds no credentials; the caller passes the sending account's
/// bearer token with every request.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: Client,
    base_url: Url,
    api_version: String,
}

impl GraphClient {
    /// Create a new `GraphClient`.
    ///
    /// * `base_url` – Graph API root (e.g. `https://graph.instagram.com`).
    /// * `api_version` – version path segment (e.g. `v21.0`).
    pub fn new(base_url: Url, api_version: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_version: api_version.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// The messaging endpoint for `account_id`.
    pub fn messages_url(&self, account_id: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend([self.api_version.as_str(), account_id, "messages"]);
        Ok(url)
    }

    /// Send `body` on behalf of `account_id`.
    ///
    /// Returns the upstream response payload unchanged. A 2xx body that is
    /// not JSON is returned as a JSON string.
    pub async fn send_message(
        &self,
        account_id: &str,
        bearer_token: &str,
        body: &SendMessageRequest,
    ) -> Result<Value, ClientError> {
        let url = self.messages_url(account_id)?;

        let resp = self
            .http
            .post(url)
            .bearer_auth(bearer_token)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ClientError::Api { status, body: text });
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str) -> GraphClient {
        GraphClient::new(Url::parse(base).unwrap(), "v21.0")
    }

    #[test]
    fn messages_url_appends_version_and_account() {
        let url = client("https://graph.instagram.com")
            .messages_url("17841401533576017")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://graph.instagram.com/v21.0/17841401533576017/messages"
        );
    }

    #[test]
    fn messages_url_keeps_base_path() {
        let url = client("http://localhost:8080/proxy/").messages_url("42").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v21.0/42/messages");
    }

    #[tokio::test]
    async fn send_message_posts_body_with_bearer() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v21.0/42/messages"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({"recipient": {"id": "U1"}, "message": {"text": "oii"}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"recipient_id": "U1", "message_id": "m_1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let resp = client(&server.uri())
            .send_message("42", "tok", &SendMessageRequest::text("U1", "oii"))
            .await
            .unwrap();
        assert_eq!(resp, json!({"recipient_id": "U1", "message_id": "m_1"}));
    }

    #[tokio::test]
    async fn send_message_surfaces_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .send_message("42", "tok", &SendMessageRequest::text("U1", "oii"))
            .await
            .unwrap_err();
        match err {
            ClientError::Api { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_message_returns_plain_text_as_string() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let resp = client(&server.uri())
            .send_message("42", "tok", &SendMessageRequest::text("U1", "oii"))
            .await
            .unwrap();
        assert_eq!(resp, Value::String("ok".into()));
    }
}
