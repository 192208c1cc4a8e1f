use std::time::Duration;

use {
    async_trait::async_trait,
    bistro_config::MessengerConfig,
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::debug,
};

use crate::{message::OutboundMessage, profile::MessengerProfile};

/// Successful Send API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendReceipt {
    pub recipient_id: Option<String>,
    pub message_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The platform answered with a non-success status.
    #[error("send API returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
        body: String,
    },

    /// The request never produced a response.
    #[error("send API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Delivers one outbound message to one recipient.
///
/// Implementations must not retry; callers log failures and move on.
#[async_trait]
pub trait Sender: Send + Sync {
    async fn send(
        &self,
        recipient_id: &str,
        message: &OutboundMessage,
    ) -> Result<SendReceipt, SendError>;
}

/// Send API client for a single Page.
#[derive(Clone)]
pub struct GraphApiSender {
    http: reqwest::Client,
    base_url: String,
    access_token: Secret<String>,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

impl GraphApiSender {
    pub fn new(
        base_url: impl Into<String>,
        access_token: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, SendError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bistro/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SendError::Client(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    pub fn from_config(config: &MessengerConfig) -> Result<Self, SendError> {
        Self::new(
            config.graph_api_url.clone(),
            config.page_access_token.clone(),
            Duration::from_secs(config.send_timeout_secs),
        )
    }

    /// Configure the Page's Messenger profile (Get Started button, greeting,
    /// persistent menu).
    pub async fn set_profile(&self, profile: &MessengerProfile) -> Result<(), SendError> {
        self.post("me/messenger_profile", profile).await.map(|_| ())
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<String, SendError> {
        let url = format!("{}/{path}", self.base_url);
        let resp = self
            .http
            .post(url)
            .query(&[("access_token", self.access_token.expose_secret())])
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            let message = serde_json::from_str::<GraphErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());
            return Err(SendError::Api {
                status: status.as_u16(),
                message,
                body: text,
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl Sender for GraphApiSender {
    async fn send(
        &self,
        recipient_id: &str,
        message: &OutboundMessage,
    ) -> Result<SendReceipt, SendError> {
        let body = self
            .post("me/messages", &message.to_request(recipient_id))
            .await?;
        // Sender actions answer with only `recipient_id`; a body we cannot
        // read still means the platform accepted the call.
        let receipt: SendReceipt = serde_json::from_str(&body).unwrap_or_default();
        match &receipt.message_id {
            Some(message_id) => debug!(
                recipient_id,
                message_id,
                kind = %message.describe(),
                "successfully sent message"
            ),
            None => debug!(recipient_id, kind = %message.describe(), "successfully called send API"),
        }
        Ok(receipt)
    }
}
