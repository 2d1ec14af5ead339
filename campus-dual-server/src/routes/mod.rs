pub mod feed;
pub mod health;

use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, middleware};
use serde_json::Value;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::error;

use campus_dual_core::FeedError;

use crate::cors::cors;
use crate::state::AppState;

/// All routes, with CORS and request tracing applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(feed::router())
        .merge(health::router())
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Everything a feed request can fail with.
///
/// Messages are shown to end users in their calendar app or browser, so they
/// are plain German text. Upstream failures carry a JSON diagnostic instead
/// when the request asked for debug output.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(
        "Zugriff verweigert.\nDieser Feed ist nur über die Webseite oder Kalender-Apps abrufbar.\n\nUser-Agent: {user_agent}"
    )]
    Forbidden { user_agent: String },

    #[error("Fehler: userid (u) und hash (h) fehlen.")]
    MissingCredentials,

    #[error("Fehler: Upstream-Fetch fehlgeschlagen: {message}")]
    UpstreamUnreachable {
        message: String,
        details: Option<Value>,
    },

    #[error(
        "Campus Dual leitet die Anfrage um (Wartung oder Anmeldung). Bitte später erneut versuchen."
    )]
    UpstreamRedirect { dump: Option<Value> },

    #[error(
        "Campus Dual ist momentan nicht erreichbar oder antwortet fehlerhaft (Status {status}). Bitte später erneut versuchen."
    )]
    UpstreamStatus { status: u16, dump: Option<Value> },

    #[error("Fehler: Ungültige JSON-Antwort von Campus Dual: {0}")]
    InvalidJson(String),

    #[error("Fehler: Formatfehler – kein Array empfangen.")]
    NotAnArray,

    #[error("Interner Fehler: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::MissingCredentials => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnreachable { .. } => StatusCode::BAD_GATEWAY,
            AppError::UpstreamRedirect { .. } | AppError::UpstreamStatus { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::InvalidJson(_) | AppError::NotAnArray => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn diagnostics(&self) -> Option<&Value> {
        match self {
            AppError::UpstreamUnreachable { details, .. } => details.as_ref(),
            AppError::UpstreamRedirect { dump } | AppError::UpstreamStatus { dump, .. } => {
                dump.as_ref()
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Feed request failed");
        }

        match self.diagnostics() {
            Some(json) => (status, Json(json.clone())).into_response(),
            None => (
                status,
                [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                self.to_string(),
            )
                .into_response(),
        }
    }
}

impl From<FeedError> for AppError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::InvalidJson(err) => AppError::InvalidJson(err.to_string()),
            FeedError::NotAnArray(_) => AppError::NotAnArray,
            other => AppError::Internal(other.into()),
        }
    }
}
