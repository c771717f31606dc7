use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use auditorium_remote::RemoteError;
use auditorium_types::api::ErrorBody;

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input. Raised before any backend call.
    #[error("{0}")]
    Validation(&'static str),

    #[error("Login required")]
    LoginRequired,

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("session store failure: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AppError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            AppError::LoginRequired => (StatusCode::UNAUTHORIZED, "login_required"),
            // Client errors from the backend keep their status, everything else is a bad gateway.
            AppError::Remote(RemoteError::Status { status, .. }) => {
                let status = StatusCode::from_u16(*status)
                    .ok()
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, "remote")
            }
            AppError::Remote(RemoteError::Decode(_)) => (StatusCode::BAD_GATEWAY, "remote"),
            AppError::Remote(RemoteError::Transport(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "connectivity")
            }
            AppError::Remote(RemoteError::NotConfigured(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
            }
            AppError::Session(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let message = match &self {
            AppError::Session(e) => {
                error!("Session store failure: {}", e);
                "Session unavailable, please try again".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                error: kind.to_string(),
                message,
            }),
        )
            .into_response()
    }
}
