//! Messenger Platform surface for the bistro bot.
//!
//! Inbound: webhook envelope types, event classification and `X-Hub-Signature`
//! verification. Outbound: the message model and a Send API client behind the
//! [`Sender`] trait.

pub mod message;
pub mod profile;
pub mod send_api;
pub mod signature;
pub mod webhook;

pub use {
    message::{Button, Element, OutboundMessage, QuickReply, SenderAction},
    profile::MessengerProfile,
    send_api::{GraphApiSender, SendError, SendReceipt, Sender},
    signature::{SIGNATURE_HEADER, SignatureCheck, SignatureError, check_request, verify_signature},
    webhook::{EventKind, MessageKind, MessagingEvent, PageEntry, WebhookEnvelope},
};
