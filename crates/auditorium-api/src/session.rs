//! Per-client session state on top of `tower_sessions::Session`.
//!
//! A session is ANONYMOUS until `sign_in` stores an [`AuthSession`] under
//! [`AUTH_KEY`]. `sign_out` flushes everything, preferences included.

use tower_sessions::Session;
use tracing::{error, warn};

use auditorium_remote::RemoteError;
use auditorium_types::models::{AuthSession, Preferences};

use crate::error::AppError;

/// Key holding the serialized [`AuthSession`].
pub const AUTH_KEY: &str = "auth";

/// Key holding the serialized [`Preferences`].
pub const PREFERENCES_KEY: &str = "preferences";

pub async fn current(session: &Session) -> Result<Option<AuthSession>, AppError> {
    Ok(session.get::<AuthSession>(AUTH_KEY).await?)
}

/// ANONYMOUS -> AUTHENTICATED. The session id is rotated first.
pub async fn sign_in(session: &Session, auth: &AuthSession) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(AUTH_KEY, auth).await?;
    Ok(())
}

/// Overwrite the cached identity without rotating the id.
pub async fn store(session: &Session, auth: &AuthSession) -> Result<(), AppError> {
    session.insert(AUTH_KEY, auth).await?;
    Ok(())
}

pub async fn sign_out(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}

pub async fn preferences(session: &Session) -> Result<Preferences, AppError> {
    Ok(session
        .get::<Preferences>(PREFERENCES_KEY)
        .await?
        .unwrap_or_default())
}

pub async fn set_preferences(session: &Session, preferences: Preferences) -> Result<(), AppError> {
    session.insert(PREFERENCES_KEY, preferences).await?;
    Ok(())
}

/// Drop back to ANONYMOUS when the backend refused the stored access token.
pub async fn forget_if_rejected(session: &Session, err: &RemoteError) {
    if !err.is_auth_rejection() {
        return;
    }
    warn!("Backend rejected the session token, signing out");
    if let Err(e) = session.flush().await {
        error!("Failed to clear rejected session: {}", e);
    }
}
