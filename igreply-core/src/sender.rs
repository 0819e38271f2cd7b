//! Outbound Send API calls on behalf of registered accounts.

use async_trait::async_trait;
use compact_str::CompactString;
use igreply_sdk::client::{ClientError, GraphClient};
use igreply_sdk::objects::SendMessageRequest;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config::{AccountId, AccountRegistry, GraphConfig};
use crate::credentials::{CredentialError, CredentialResolver};
use crate::env::ReadEnv;

/// Errors that can occur while sending a reply.
#[derive(Debug, Error)]
pub enum SendError {
    /// The sending account is not in the static registry.
    #[error("account not configured: {0}")]
    AccountNotConfigured(CompactString),

    /// No credential is bound for the sending account.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The upstream call failed. `status` is `None` for transport errors.
    #[error("send failed: {detail}")]
    Failed { status: Option<u16>, detail: String },
}

impl From<ClientError> for SendError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, body } => SendError::Failed {
                status: Some(status.as_u16()),
                detail: if body.trim().is_empty() {
                    status.to_string()
                } else {
                    body
                },
            },
            other => SendError::Failed {
                status: None,
                detail: other.to_string(),
            },
        }
    }
}

/// Sends a text message from one of our accounts to a user.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Returns the upstream response payload unchanged on success.
    async fn send_text(
        &self,
        recipient_id: &str,
        text: &str,
        from_account: &str,
    ) -> Result<Value, SendError>;
}

/// [`MessageSender`] backed by the Graph API.
///
/// Each call checks the registry, resolves the account's token, then issues
/// exactly one POST. There is no retry. In-flight calls are capped per account.
pub struct GraphMessageSender<E> {
    registry: AccountRegistry,
    credentials: CredentialResolver<E>,
    client: GraphClient,
    in_flight: HashMap<AccountId, Semaphore>,
}

impl<E: ReadEnv> GraphMessageSender<E> {
    pub fn new(
        registry: AccountRegistry,
        credentials: CredentialResolver<E>,
        config: &GraphConfig,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
                reqwest::Client::new()
            });
        let client = GraphClient::new(config.base_url.clone(), config.api_version.clone())
            .with_http_client(http);

        let permits = config.max_concurrent_sends.max(1);
        let in_flight = registry
            .iter()
            .map(|account| (account.clone(), Semaphore::new(permits)))
            .collect();

        Self {
            registry,
            credentials,
            client,
            in_flight,
        }
    }
}

#[async_trait]
impl<E: ReadEnv + Send + Sync> MessageSender for GraphMessageSender<E> {
    async fn send_text(
        &self,
        recipient_id: &str,
        text: &str,
        from_account: &str,
    ) -> Result<Value, SendError> {
        let Some(account) = self.registry.get(from_account) else {
            return Err(SendError::AccountNotConfigured(from_account.into()));
        };
        let token = self.credentials.resolve(account)?;

        let _permit = match self.in_flight.get(account) {
            Some(limit) => Some(limit.acquire().await.map_err(|e| SendError::Failed {
                status: None,
                detail: e.to_string(),
            })?),
            None => None,
        };

        debug!(account_id = %account, recipient_id, "Sending reply");
        let response = self
            .client
            .send_message(
                account.as_str(),
                token.expose(),
                &SendMessageRequest::text(recipient_id, text),
            )
            .await?;

        info!(account_id = %account, recipient_id, "Reply sent");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MemEnv;
    use serde_json::json;
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ACCOUNT: &str = "17841401533576017";

    fn sender(server: &MockServer, env: MemEnv) -> GraphMessageSender<MemEnv> {
        sender_with_limit(server, env, 2)
    }

    fn sender_with_limit(
        server: &MockServer,
        env: MemEnv,
        max_concurrent_sends: usize,
    ) -> GraphMessageSender<MemEnv> {
        let registry = AccountRegistry::new([AccountId::parse(ACCOUNT).unwrap()]);
        let config = GraphConfig {
            base_url: Url::parse(&server.uri()).unwrap(),
            api_version: "v21.0".into(),
            timeout: Duration::from_secs(2),
            max_concurrent_sends,
        };
        GraphMessageSender::new(registry, CredentialResolver::new(env), &config)
    }

    #[tokio::test]
    async fn test_success_returns_upstream_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v21.0/{ACCOUNT}/messages")))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({"recipient": {"id": "U1"}, "message": {"text": "oii"}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"recipient_id": "U1", "message_id": "m_1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let env = MemEnv::new().with(format!("token_{ACCOUNT}"), "tok");
        let resp = sender(&server, env)
            .send_text("U1", "oii", ACCOUNT)
            .await
            .unwrap();
        assert_eq!(resp, json!({"recipient_id": "U1", "message_id": "m_1"}));
    }

    #[tokio::test]
    async fn test_upstream_error_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": {"message": "An unknown error has occurred.", "code": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let env = MemEnv::new().with(format!("token_{ACCOUNT}"), "tok");
        let err = sender(&server, env)
            .send_text("U1", "oii", ACCOUNT)
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                SendError::Failed { status: Some(500), ref detail }
                    if detail.contains("An unknown error has occurred.")
            ),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_empty_error_body_falls_back_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let env = MemEnv::new().with(format!("token_{ACCOUNT}"), "tok");
        let err = sender(&server, env)
            .send_text("U1", "oii", ACCOUNT)
            .await
            .unwrap_err();
        assert!(
            matches!(err, SendError::Failed { status: Some(502), ref detail } if detail.contains("502"))
        );
    }

    #[tokio::test]
    async fn test_unregistered_account_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let env = MemEnv::new().with("token_999", "tok");
        let err = sender(&server, env)
            .send_text("U1", "oii", "999")
            .await
            .unwrap_err();
        assert!(matches!(err, SendError::AccountNotConfigured(ref id) if id == "999"));
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = sender(&server, MemEnv::new())
            .send_text("U1", "oii", ACCOUNT)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SendError::Credential(CredentialError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_a_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let env = MemEnv::new().with(format!("token_{ACCOUNT}"), "tok");
        let err = sender(&server, env)
            .send_text("U1", "oii", ACCOUNT)
            .await
            .unwrap_err();
        assert!(matches!(err, SendError::Failed { status: None, .. }));
    }

    #[tokio::test]
    async fn test_sends_for_one_account_are_bounded() {
        let delay = Duration::from_millis(400);
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(delay))
            .expect(2)
            .mount(&server)
            .await;

        let env = MemEnv::new().with(format!("token_{ACCOUNT}"), "tok");
        let sender = sender_with_limit(&server, env, 1);

        let started = tokio::time::Instant::now();
        let (first, second) = tokio::join!(
            sender.send_text("U1", "oii", ACCOUNT),
            sender.send_text("U2", "oii", ACCOUNT),
        );
        let elapsed = started.elapsed();

        first.unwrap();
        second.unwrap();
        assert!(elapsed >= delay * 2, "sends overlapped: {elapsed:?}");
    }

    #[tokio::test]
    async fn test_sends_run_concurrently_within_the_limit() {
        let delay = Duration::from_millis(400);
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(delay))
            .expect(2)
            .mount(&server)
            .await;

        let env = MemEnv::new().with(format!("token_{ACCOUNT}"), "tok");
        let sender = sender_with_limit(&server, env, 2);

        let started = tokio::time::Instant::now();
        let (first, second) = tokio::join!(
            sender.send_text("U1", "oii", ACCOUNT),
            sender.send_text("U2", "oii", ACCOUNT),
        );
        let elapsed = started.elapsed();

        first.unwrap();
        second.unwrap();
        assert!(elapsed < delay * 2, "sends were serialized: {elapsed:?}");
    }
}
