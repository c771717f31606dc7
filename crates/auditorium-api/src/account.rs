use axum::{Extension, Json, extract::State};
use tower_sessions::Session;
use tracing::{error, info, warn};

use auditorium_remote::UserMetadata;
use auditorium_types::api::{
    AccountResponse, ChangePasswordRequest, DeleteAccountRequest, Notice, UpdatePreferencesRequest,
    UpdateProfileRequest,
};
use auditorium_types::models::{AuthSession, Preferences};

use crate::AppState;
use crate::error::AppError;
use crate::extract::JsonBody;
use crate::session;
use crate::validate;

// Every handler here sits behind `require_session`.

/// GET /account — cached identity and preferences. Tokens are never returned.
pub async fn get_account(
    session: Session,
    Extension(auth): Extension<AuthSession>,
) -> Result<Json<AccountResponse>, AppError> {
    Ok(Json(AccountResponse {
        user: auth.user,
        preferences: session::preferences(&session).await?,
    }))
}

/// PATCH /account/profile
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Extension(mut auth): Extension<AuthSession>,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    if req.first_name.is_none() && req.last_name.is_none() {
        return Err(AppError::Validation("Nothing to update"));
    }

    let first_name = req.first_name.as_deref().map(str::trim);
    let last_name = req.last_name.as_deref().map(str::trim);
    let profile = UserMetadata {
        first_name: first_name.map(str::to_string),
        last_name: last_name.map(str::to_string),
    };

    if let Err(e) = state
        .backend
        .update_profile(&auth.access_token, &profile)
        .await
    {
        warn!("Profile update for {} failed: {}", auth.user.id, e);
        session::forget_if_rejected(&session, &e).await;
        return Err(e.into());
    }

    if first_name.is_some() {
        auth.user.first_name = validate::profile_field(first_name);
    }
    if last_name.is_some() {
        auth.user.last_name = validate::profile_field(last_name);
    }
    session::store(&session, &auth).await?;

    Ok(Json(AccountResponse {
        user: auth.user,
        preferences: session::preferences(&session).await?,
    }))
}

/// PUT /account/password
pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    Extension(auth): Extension<AuthSession>,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> Result<Json<Notice>, AppError> {
    validate::new_password(&req.new_password, &req.confirm_password)?;

    if let Err(e) = state
        .backend
        .update_password(&auth.access_token, &req.new_password)
        .await
    {
        warn!("Password change for {} failed: {}", auth.user.id, e);
        session::forget_if_rejected(&session, &e).await;
        return Err(e.into());
    }

    info!("Password changed for {}", auth.user.id);
    Ok(Json(Notice::new("Password updated")))
}

/// DELETE /account
///
/// Goes through the admin endpoint with the service-role key, so a rejection
/// here says nothing about the user's own token and the session is kept.
pub async fn delete_account(
    State(state): State<AppState>,
    session: Session,
    Extension(auth): Extension<AuthSession>,
    JsonBody(req): JsonBody<DeleteAccountRequest>,
) -> Result<Json<Notice>, AppError> {
    validate::delete_confirmation(&req.confirmation)?;

    state.backend.delete_user(&auth.user.id).await?;
    // The account is gone either way; a stale session fails its next backend call.
    if let Err(e) = session::sign_out(&session).await {
        error!("Failed to clear session of deleted account {}: {}", auth.user.id, e);
    }

    info!("Account {} deleted", auth.user.id);
    Ok(Json(Notice::new("Account deleted")))
}

/// PUT /account/preferences — session only.
pub async fn update_preferences(
    session: Session,
    JsonBody(req): JsonBody<UpdatePreferencesRequest>,
) -> Result<Json<Preferences>, AppError> {
    let mut preferences = session::preferences(&session).await?;
    if let Some(theme) = req.theme {
        preferences.theme = theme;
    }
    if let Some(email_notifications) = req.email_notifications {
        preferences.email_notifications = email_notifications;
    }
    session::set_preferences(&session, preferences).await?;

    Ok(Json(preferences))
}
