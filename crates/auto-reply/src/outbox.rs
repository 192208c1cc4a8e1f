//! Background delivery of reply plans.
//!
//! Each plan runs as one tracked task so the webhook can be acknowledged
//! before any Send API call completes. Steps of a plan are sent strictly in
//! order; plans for different events are independent of each other.

use std::sync::Arc;

use {
    bistro_messenger::{SendError, Sender},
    tokio_util::{sync::CancellationToken, task::TaskTracker},
    tracing::{debug, error, info},
};

use crate::reply::ReplyPlan;

pub struct Outbox {
    sender: Arc<dyn Sender>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl Outbox {
    pub fn new(sender: Arc<dyn Sender>) -> Self {
        Self {
            sender,
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Queue `plan` for `recipient_id` and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn deliver(&self, recipient_id: &str, plan: ReplyPlan) {
        if plan.is_empty() {
            return;
        }
        if self.shutdown.is_cancelled() {
            info!(recipient_id, steps = plan.len(), "outbox closed, dropping reply");
            return;
        }

        let sender = Arc::clone(&self.sender);
        let cancel = self.shutdown.clone();
        let recipient_id = recipient_id.to_string();
        self.tracker.spawn(async move {
            let total = plan.len();
            for (index, step) in plan.steps.into_iter().enumerate() {
                if !step.delay.is_zero() {
                    tokio::select! {
                        () = cancel.cancelled() => {
                            info!(
                                recipient_id = %recipient_id,
                                dropped = total - index,
                                "shutting down, dropping pending delayed replies"
                            );
                            return;
                        },
                        () = tokio::time::sleep(step.delay) => {},
                    }
                }

                let kind = step.message.describe();
                match sender.send(&recipient_id, &step.message).await {
                    Ok(receipt) => debug!(
                        recipient_id = %recipient_id,
                        kind = %kind,
                        message_id = receipt.message_id.as_deref().unwrap_or(""),
                        "reply sent"
                    ),
                    Err(SendError::Api {
                        status,
                        message,
                        body,
                    }) => error!(
                        recipient_id = %recipient_id,
                        kind = %kind,
                        status,
                        body = %body,
                        "failed calling Send API: {message}"
                    ),
                    Err(e) => error!(recipient_id = %recipient_id, kind = %kind, error = %e, "failed calling Send API"),
                }
            }
        });
    }

    /// Number of plans still running.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Wait for every queued plan to finish, delays included. The outbox
    /// accepts new plans afterwards.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Abandon pending delayed steps and wait for in-flight sends.
    pub async fn shutdown(&self) {
        let pending = self.pending();
        if pending > 0 {
            info!(pending, "waiting for in-flight replies");
        }
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}
