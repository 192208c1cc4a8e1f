use std::{path::Path, sync::Arc};

use {
    bistro_auto_reply::{Composer, Dispatcher, Outbox},
    bistro_config::BistroConfig,
    bistro_messenger::{GraphApiSender, Sender},
};

use crate::error::Result;

/// Shared, read-only state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BistroConfig>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// State whose replies go out through `sender`.
    pub fn new(config: BistroConfig, sender: Arc<dyn Sender>) -> Self {
        let composer = Composer::new(&config.server.server_url, &config.replies)
            .with_assets_dir(Path::new(&config.server.assets_dir));
        let outbox = Arc::new(Outbox::new(sender));
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(Dispatcher::new(composer, outbox)),
        }
    }

    /// State wired to the real Send API.
    pub fn from_config(config: BistroConfig) -> Result<Self> {
        let sender = GraphApiSender::from_config(&config.messenger)?;
        Ok(Self::new(config, Arc::new(sender)))
    }

    #[must_use]
    pub fn outbox(&self) -> &Arc<Outbox> {
        self.dispatcher.outbox()
    }
}
