use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use campus_dual_core::constants::{CONTENT_TYPE as CALENDAR_CONTENT_TYPE, FEED_FILENAME};
use campus_dual_core::{parse_rows, render_feed};

use crate::routes::AppError;
use crate::state::AppState;
use crate::upstream::transport_details;
use crate::window::{FetchWindow, parse_months};

const CACHE_CONTROL_VALUE: &str = "public, max-age=900, s-maxage=900";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(calendar_feed))
        .route("/api/calendar", get(calendar_feed))
}

/// Query string of a feed request. Everything is optional so that missing
/// credentials produce our own message instead of a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Campus Dual user id
    u: Option<String>,
    /// Campus Dual feed hash
    h: Option<String>,
    /// Lookahead in months
    m: Option<String>,
    debug: Option<String>,
}

impl FeedQuery {
    fn credentials(&self) -> Option<(&str, &str)> {
        let user = self.u.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let hash = self.h.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((user, hash))
    }

    fn debug(&self) -> bool {
        self.debug.as_deref() == Some("1")
    }
}

/// Fetch the caller's timetable from Campus Dual and serve it as iCalendar.
async fn calendar_feed(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<FeedQuery>,
) -> Result<Response, AppError> {
    let verdict = state.gate.check(&headers);
    if !verdict.admitted() {
        warn!(user_agent = %verdict.user_agent, "Rejected feed request");
        return Err(AppError::Forbidden {
            user_agent: verdict.user_agent,
        });
    }

    let (user, hash) = query.credentials().ok_or(AppError::MissingCredentials)?;
    let debug = query.debug();

    let now = Utc::now();
    let window = FetchWindow::around(now, parse_months(query.m.as_deref()));
    let url = state
        .upstream
        .feed_url(user, hash, window, now.timestamp_millis())?;

    let response = state
        .upstream
        .fetch(&url)
        .await
        .map_err(|err| AppError::UpstreamUnreachable {
            message: err.to_string(),
            details: debug.then(|| transport_details(&err, &url)),
        })?;

    if response.status.is_redirection() {
        return Err(AppError::UpstreamRedirect {
            dump: debug.then(|| response.dump(&url)),
        });
    }
    if !response.status.is_success() {
        return Err(AppError::UpstreamStatus {
            status: response.status.as_u16(),
            dump: debug.then(|| response.dump(&url)),
        });
    }

    let rows = parse_rows(&response.body)?;
    let feed = render_feed(&rows, user, now, &state.feed)?;

    info!(
        total = feed.stats.total,
        emitted = feed.stats.emitted,
        skipped = feed.stats.skipped,
        "Served calendar feed"
    );

    Ok((
        [
            (CONTENT_TYPE, CALENDAR_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("inline; filename=\"{FEED_FILENAME}\""),
            ),
            (CACHE_CONTROL, CACHE_CONTROL_VALUE.to_string()),
        ],
        feed.ics,
    )
        .into_response())
}
