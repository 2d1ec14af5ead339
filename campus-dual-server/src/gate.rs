//! Admission check for feed requests.
//!
//! The feed is meant to be fetched by the companion website or by calendar
//! apps. This only looks at request headers and is not authentication.

use axum::http::HeaderMap;
use axum::http::header::{HeaderName, ORIGIN, REFERER, USER_AGENT};
use url::Url;

use crate::config::AccessSettings;

const LOCALHOST: &str = "localhost";

#[derive(Debug, Clone)]
pub struct Gatekeeper {
    website_host: String,
    calendar_agents: Vec<String>,
}

/// Outcome of [`Gatekeeper::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub from_website: bool,
    pub from_calendar_client: bool,
    pub user_agent: String,
}

impl Verdict {
    pub fn admitted(&self) -> bool {
        self.from_website || self.from_calendar_client
    }
}

impl Gatekeeper {
    pub fn new(settings: &AccessSettings) -> Self {
        Gatekeeper {
            website_host: host_of(&settings.allowed_origin),
            calendar_agents: settings
                .calendar_agents
                .iter()
                .map(|agent| agent.trim().to_lowercase())
                .filter(|agent| !agent.is_empty())
                .collect(),
        }
    }

    pub fn check(&self, headers: &HeaderMap) -> Verdict {
        // Origin wins; Referer only counts when there is no Origin
        let source = header_str(headers, &ORIGIN)
            .filter(|origin| !origin.is_empty())
            .or_else(|| header_str(headers, &REFERER))
            .unwrap_or_default()
            .to_lowercase();

        let from_website = source.contains(LOCALHOST)
            || (!self.website_host.is_empty() && source.contains(&self.website_host));

        let user_agent = header_str(headers, &USER_AGENT)
            .unwrap_or_default()
            .to_string();
        let agent = user_agent.to_lowercase();
        let from_calendar_client = self.calendar_agents.iter().any(|a| agent.contains(a));

        Verdict {
            from_website,
            from_calendar_client,
            user_agent,
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn host_of(origin: &str) -> String {
    Url::parse(origin)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| origin.trim().to_string())
        .to_lowercase()
}
