//! Inbound webhook payloads.
//!
//! The platform batches events: one envelope carries several page entries,
//! each with several messaging events. Events are kept as raw JSON inside
//! [`PageEntry`] so a single malformed event can be skipped without losing
//! the rest of the batch.

use serde::Deserialize;

/// `object` value of envelopes addressed to a Page.
pub const PAGE_OBJECT: &str = "page";

/// Top-level webhook body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<PageEntry>,
}

impl WebhookEnvelope {
    /// Only Page subscriptions are handled; everything else is acknowledged
    /// and ignored.
    #[must_use]
    pub fn is_page(&self) -> bool {
        self.object == PAGE_OBJECT
    }
}

/// One page's batch of events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub messaging: Vec<serde_json::Value>,
}

impl PageEntry {
    /// Decode each event independently, in array order.
    pub fn events(&self) -> impl Iterator<Item = Result<MessagingEvent, serde_json::Error>> + '_ {
        self.messaging
            .iter()
            .map(|raw| MessagingEvent::deserialize(raw))
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Party {
    #[serde(default)]
    pub id: String,
}

/// A single messaging event. By platform contract exactly one of the
/// optional variant fields is populated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagingEvent {
    #[serde(default)]
    pub sender: Party,
    #[serde(default)]
    pub recipient: Party,
    #[serde(default)]
    pub timestamp: i64,
    pub optin: Option<Optin>,
    pub message: Option<MessagePayload>,
    pub delivery: Option<Delivery>,
    pub postback: Option<Postback>,
    pub read: Option<Read>,
    pub account_linking: Option<AccountLinking>,
}

/// Classified view of a [`MessagingEvent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind<'a> {
    Optin(&'a Optin),
    Message(&'a MessagePayload),
    Delivery(&'a Delivery),
    Postback(&'a Postback),
    Read(&'a Read),
    AccountLinking(&'a AccountLinking),
    Unknown,
}

impl EventKind<'_> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Optin(_) => "optin",
            Self::Message(_) => "message",
            Self::Delivery(_) => "delivery",
            Self::Postback(_) => "postback",
            Self::Read(_) => "read",
            Self::AccountLinking(_) => "account_linking",
            Self::Unknown => "unknown",
        }
    }
}

impl MessagingEvent {
    #[must_use]
    pub fn sender_id(&self) -> &str {
        &self.sender.id
    }

    #[must_use]
    pub fn recipient_id(&self) -> &str {
        &self.recipient.id
    }

    /// Classify by the first populated field, in the order
    /// optin, message, delivery, postback, read, account_linking.
    #[must_use]
    pub fn kind(&self) -> EventKind<'_> {
        if let Some(optin) = &self.optin {
            EventKind::Optin(optin)
        } else if let Some(message) = &self.message {
            EventKind::Message(message)
        } else if let Some(delivery) = &self.delivery {
            EventKind::Delivery(delivery)
        } else if let Some(postback) = &self.postback {
            EventKind::Postback(postback)
        } else if let Some(read) = &self.read {
            EventKind::Read(read)
        } else if let Some(linking) = &self.account_linking {
            EventKind::AccountLinking(linking)
        } else {
            EventKind::Unknown
        }
    }
}

/// Plugin opt-in ("Send to Messenger"). `ref` is the developer pass-through.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Optin {
    #[serde(rename = "ref")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MessagePayload {
    #[serde(default)]
    pub is_echo: bool,
    #[serde(rename = "mid")]
    pub message_id: Option<String>,
    pub app_id: Option<u64>,
    pub metadata: Option<String>,
    pub seq: Option<u64>,
    pub text: Option<String>,
    pub attachments: Option<Vec<Attachment>>,
    pub quick_reply: Option<QuickReplyPayload>,
}

/// What a received message amounts to, most specific first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageKind<'a> {
    /// Our own outbound message reflected back.
    Echo,
    /// A tapped quick reply; carries its payload token.
    QuickReply(&'a str),
    Text(&'a str),
    Attachments(&'a [Attachment]),
    /// Neither text nor attachments.
    Empty,
}

impl MessagePayload {
    #[must_use]
    pub fn kind(&self) -> MessageKind<'_> {
        if self.is_echo {
            return MessageKind::Echo;
        }
        if let Some(quick_reply) = &self.quick_reply {
            return MessageKind::QuickReply(&quick_reply.payload);
        }
        if let Some(text) = &self.text {
            return MessageKind::Text(text);
        }
        match &self.attachments {
            Some(attachments) => MessageKind::Attachments(attachments),
            None => MessageKind::Empty,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Attachment {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct QuickReplyPayload {
    #[serde(default)]
    pub payload: String,
}

/// Delivery receipt; every message sent before `watermark` was delivered.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Delivery {
    #[serde(default)]
    pub mids: Vec<String>,
    #[serde(default)]
    pub watermark: i64,
    pub seq: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Postback {
    pub title: Option<String>,
    #[serde(default)]
    pub payload: String,
}

/// Read receipt; every message sent before `watermark` was read.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Read {
    #[serde(default)]
    pub watermark: i64,
    pub seq: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AccountLinking {
    #[serde(default)]
    pub status: String,
    pub authorization_code: Option<String>,
}
