//! Inbound event processing: the glue between the webhook and the Send API.
//!
//! Flow: webhook envelope → classify each messaging event → match keyword or
//! postback payload to an [`Action`] → compose a [`ReplyPlan`] of canned
//! messages → hand the plan to the [`Outbox`], which sends it in the
//! background so the webhook can be acknowledged immediately.

pub mod content;
pub mod dispatch;
pub mod keywords;
pub mod outbox;
pub mod reply;

#[cfg(test)]
pub(crate) mod test_support;

pub use {
    dispatch::{DispatchReport, Dispatcher},
    keywords::{Action, match_keyword, match_payload},
    outbox::Outbox,
    reply::{Composer, ReplyPlan, ReplyStep},
};
