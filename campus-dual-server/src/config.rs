//! Server configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`campus-dual.toml`, or the path in `CAMPUS_DUAL_CONFIG`), then
//! `CAMPUS_DUAL_*` environment variables with `__` between section and key,
//! e.g. `CAMPUS_DUAL_SERVER__PORT=8080`.

use std::path::PathBuf;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File};
use anyhow::{Context, Result};
use serde::Deserialize;

use campus_dual_core::constants::{
    DEFAULT_CALENDAR_NAME, DEFAULT_FALLBACK_TITLE, DEFAULT_PRODUCT_ID, DEFAULT_REFRESH_INTERVAL,
    DEFAULT_ROOM_SENTINELS, DEFAULT_TIMEZONE,
};
use campus_dual_core::{FeedConfig, FeedResult};

const DEFAULT_CONFIG_FILE: &str = "campus-dual.toml";
const CONFIG_PATH_VAR: &str = "CAMPUS_DUAL_CONFIG";
const ENV_PREFIX: &str = "CAMPUS_DUAL";

/// Keys that accept comma-separated lists from the environment.
const LIST_KEYS: &[&str] = &[
    "upstream.retry_statuses",
    "access.calendar_agents",
    "feed.room_sentinels",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub access: AccessSettings,
    pub feed: FeedSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// How the Campus Dual portal is reached.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub user_agent: String,
    pub max_attempts: u32,
    /// Statuses worth another attempt (Cloudflare edge/origin errors)
    pub retry_statuses: Vec<u16>,
    /// Backoff unit; attempt `n` waits `n * retry_backoff_ms`
    pub retry_backoff_ms: u64,
    pub timeout_secs: u64,
    /// Skip TLS certificate verification for the portal
    pub accept_invalid_certs: bool,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        UpstreamSettings {
            base_url: "https://selfservice.campus-dual.de".to_string(),
            user_agent: format!("Mozilla/5.0 (CampusDualICS/{})", env!("CARGO_PKG_VERSION")),
            max_attempts: 3,
            retry_statuses: vec![520, 522, 523, 524, 526],
            retry_backoff_ms: 150,
            timeout_secs: 20,
            accept_invalid_certs: false,
        }
    }
}

/// Who may fetch the feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessSettings {
    /// The website that links to the feed; also the default CORS origin
    pub allowed_origin: String,
    /// Case-insensitive User-Agent fragments of calendar clients
    pub calendar_agents: Vec<String>,
}

impl Default for AccessSettings {
    fn default() -> Self {
        AccessSettings {
            allowed_origin: "https://xnycrofox.github.io".to_string(),
            calendar_agents: [
                "Google-Calendar",
                "Microsoft",
                "Outlook",
                "Apple-PubSub",
                "iOS",
                "Mac OS X",
                "Android",
                "Thunderbird",
                "Java/",
                "Feed",
                "vCalendar",
                "iCal",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub timezone: String,
    pub room_sentinels: Vec<String>,
    pub fallback_title: String,
    pub calendar_name: String,
    pub product_id: String,
    pub refresh_interval: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        FeedSettings {
            timezone: DEFAULT_TIMEZONE.to_string(),
            room_sentinels: DEFAULT_ROOM_SENTINELS.iter().map(|s| s.to_string()).collect(),
            fallback_title: DEFAULT_FALLBACK_TITLE.to_string(),
            calendar_name: DEFAULT_CALENDAR_NAME.to_string(),
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL.to_string(),
        }
    }
}

impl FeedSettings {
    pub fn to_feed_config(&self) -> FeedResult<FeedConfig> {
        let mut config = FeedConfig::new(&self.timezone)?;
        config.room_sentinels = self.room_sentinels.clone();
        config.fallback_title = self.fallback_title.clone();
        config.calendar_name = self.calendar_name.clone();
        config.product_id = self.product_id.clone();
        config.refresh_interval = self.refresh_interval.clone();
        Ok(config)
    }
}

impl Settings {
    /// Load settings from the config file (if any) and the environment.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env_source());

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }
}

fn env_source() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .try_parsing(true),
        |env, key| env.with_list_parse_key(key),
    )
}
