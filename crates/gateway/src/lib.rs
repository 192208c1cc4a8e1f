//! Gateway: the bot's HTTP server.
//!
//! Routes:
//! - `GET /webhook`: subscription handshake (`hub.challenge` echo)
//! - `POST /webhook`: signed event batches, acknowledged with 200 once dispatched
//! - `GET /authorize`: account-linking consent page
//! - `GET /health`: liveness probe
//! - everything else: static assets (menu images, logo)
//!
//! Replies are sent by the auto-reply outbox in the background, so the
//! webhook answers well inside the platform's 20 second window.

pub mod authorize;
pub mod error;
pub mod server;
pub mod state;
pub mod webhook;

pub use {
    error::{Error, Result},
    server::{build_app, start},
    state::AppState,
};
