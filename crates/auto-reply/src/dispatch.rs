use std::sync::Arc;

use {
    bistro_messenger::{
        EventKind, MessageKind, MessagingEvent, WebhookEnvelope,
        webhook::{AccountLinking, Delivery, MessagePayload, Optin, Postback, Read},
    },
    tracing::{debug, info, warn},
};

use crate::{
    keywords::{Action, match_keyword, match_payload},
    outbox::Outbox,
    reply::Composer,
};

/// Counts from one webhook batch, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub entries: usize,
    pub events: usize,
    /// Events that produced at least one outbound message.
    pub replies: usize,
    /// Events that could not be decoded or classified.
    pub skipped: usize,
}

/// Routes webhook events to canned replies.
pub struct Dispatcher {
    composer: Composer,
    outbox: Arc<Outbox>,
}

impl Dispatcher {
    pub fn new(composer: Composer, outbox: Arc<Outbox>) -> Self {
        Self { composer, outbox }
    }

    #[must_use]
    pub fn outbox(&self) -> &Arc<Outbox> {
        &self.outbox
    }

    /// Handle every event of `envelope` in order. Never fails: problems with
    /// one event are logged and the rest of the batch still runs. Replies are
    /// queued on the outbox, so this returns without waiting on the Send API.
    pub fn dispatch(&self, envelope: &WebhookEnvelope) -> DispatchReport {
        let mut report = DispatchReport::default();
        if !envelope.is_page() {
            debug!(object = %envelope.object, "ignoring non-page webhook");
            return report;
        }

        for entry in &envelope.entry {
            report.entries += 1;
            for (index, event) in entry.events().enumerate() {
                report.events += 1;
                let event = match event {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(page_id = %entry.id, index, error = %e, "skipping malformed messaging event");
                        report.skipped += 1;
                        continue;
                    },
                };

                match self.handle(&event) {
                    Some(action) => {
                        let plan = self.composer.plan(action);
                        if !plan.is_empty() {
                            report.replies += 1;
                            self.outbox.deliver(event.sender_id(), plan);
                        }
                    },
                    None if matches!(event.kind(), EventKind::Unknown) => report.skipped += 1,
                    None => {},
                }
            }
        }

        debug!(
            entries = report.entries,
            events = report.events,
            replies = report.replies,
            skipped = report.skipped,
            "webhook batch dispatched"
        );
        report
    }

    /// Pick the reply for one event, or `None` when it is only logged.
    fn handle(&self, event: &MessagingEvent) -> Option<Action> {
        match event.kind() {
            EventKind::Optin(optin) => Some(on_optin(event, optin)),
            EventKind::Message(message) => on_message(event, message),
            EventKind::Delivery(delivery) => {
                on_delivery(delivery);
                None
            },
            EventKind::Postback(postback) => Some(on_postback(event, postback)),
            EventKind::Read(read) => {
                on_read(event, read);
                None
            },
            EventKind::AccountLinking(linking) => {
                on_account_linking(event, linking);
                None
            },
            EventKind::Unknown => {
                warn!(
                    sender_id = event.sender_id(),
                    timestamp = event.timestamp,
                    "webhook received unknown messaging event"
                );
                None
            },
        }
    }
}

fn on_optin(event: &MessagingEvent, optin: &Optin) -> Action {
    info!(
        sender_id = event.sender_id(),
        recipient_id = event.recipient_id(),
        pass_through = optin.reference.as_deref().unwrap_or(""),
        timestamp = event.timestamp,
        "received authentication"
    );
    Action::OptinConfirmation
}

fn on_message(event: &MessagingEvent, message: &MessagePayload) -> Option<Action> {
    let sender_id = event.sender_id();
    let message_id = message.message_id.as_deref().unwrap_or("");
    match message.kind() {
        MessageKind::Echo => {
            info!(
                message_id,
                app_id = message.app_id.unwrap_or_default(),
                metadata = message.metadata.as_deref().unwrap_or(""),
                "received echo"
            );
            None
        },
        MessageKind::QuickReply(payload) => {
            info!(sender_id, message_id, payload, "quick reply");
            Some(match_payload(payload))
        },
        MessageKind::Text(text) => {
            info!(sender_id, message_id, text, "received message");
            Some(match_keyword(text))
        },
        MessageKind::Attachments(attachments) => {
            info!(
                sender_id,
                message_id,
                attachments = attachments.len(),
                "received message with attachments"
            );
            Some(Action::Welcome)
        },
        MessageKind::Empty => {
            debug!(sender_id, message_id, "received message without text or attachments");
            None
        },
    }
}

fn on_delivery(delivery: &Delivery) {
    for message_id in &delivery.mids {
        info!(message_id = %message_id, "received delivery confirmation");
    }
    info!(watermark = delivery.watermark, "all messages before watermark were delivered");
}

fn on_postback(event: &MessagingEvent, postback: &Postback) -> Action {
    info!(
        sender_id = event.sender_id(),
        recipient_id = event.recipient_id(),
        payload = %postback.payload,
        timestamp = event.timestamp,
        "received postback"
    );
    let action = match_payload(&postback.payload);
    if action == Action::GetStarted {
        info!(sender_id = event.sender_id(), "get started tapped");
    }
    action
}

fn on_read(event: &MessagingEvent, read: &Read) {
    info!(
        sender_id = event.sender_id(),
        watermark = read.watermark,
        seq = read.seq.unwrap_or_default(),
        "received message read event"
    );
}

fn on_account_linking(event: &MessagingEvent, linking: &AccountLinking) {
    info!(
        sender_id = event.sender_id(),
        status = %linking.status,
        auth_code = linking.authorization_code.as_deref().unwrap_or(""),
        "received account link event"
    );
}
