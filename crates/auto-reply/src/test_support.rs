//! In-memory senders for unit tests.

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use {
    async_trait::async_trait,
    bistro_messenger::{OutboundMessage, SendError, SendReceipt, Sender},
    tokio::time::Instant,
};

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub recipient_id: String,
    pub message: OutboundMessage,
    pub at: Instant,
}

/// Records every message and answers with a synthetic message id.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingSender {
    #[allow(clippy::unwrap_used)]
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sender for RecordingSender {
    #[allow(clippy::unwrap_used)]
    async fn send(
        &self,
        recipient_id: &str,
        message: &OutboundMessage,
    ) -> Result<SendReceipt, SendError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentMessage {
            recipient_id: recipient_id.to_string(),
            message: message.clone(),
            at: Instant::now(),
        });
        Ok(SendReceipt {
            recipient_id: Some(recipient_id.to_string()),
            message_id: Some(format!("mid.{}", sent.len())),
        })
    }
}

/// Rejects every message the way the platform does for a bad token.
#[derive(Default)]
pub struct FailingSender {
    attempts: AtomicUsize,
}

impl FailingSender {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sender for FailingSender {
    async fn send(
        &self,
        _recipient_id: &str,
        _message: &OutboundMessage,
    ) -> Result<SendReceipt, SendError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SendError::Api {
            status: 400,
            message: "Invalid OAuth access token.".into(),
            body: r#"{"error":{"message":"Invalid OAuth access token."}}"#.into(),
        })
    }
}
