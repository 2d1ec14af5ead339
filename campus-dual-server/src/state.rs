use std::sync::Arc;

use anyhow::{Context, Result};
use campus_dual_core::FeedConfig;

use crate::config::Settings;
use crate::gate::Gatekeeper;
use crate::upstream::UpstreamClient;

/// Shared application state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub feed: Arc<FeedConfig>,
    pub gate: Arc<Gatekeeper>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        let feed = settings
            .feed
            .to_feed_config()
            .context("Invalid feed configuration")?;
        let gate = Gatekeeper::new(&settings.access);
        let upstream = UpstreamClient::new(&settings.upstream)?;

        Ok(AppState {
            settings: Arc::new(settings),
            feed: Arc::new(feed),
            gate: Arc::new(gate),
            upstream: Arc::new(upstream),
        })
    }
}
