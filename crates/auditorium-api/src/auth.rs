use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tower_sessions::Session;
use tracing::{error, info};

use auditorium_remote::{SignUp, UserMetadata};
use auditorium_types::api::{LoginRequest, LoginResponse, Notice, RegisterRequest};

use crate::AppState;
use crate::error::AppError;
use crate::extract::JsonBody;
use crate::session;
use crate::validate;

/// POST /auth/register
///
/// Creates the user at the identity provider. The user is not signed in: the
/// provider emails a confirmation link pointing back at `<site_url>/login`.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate::registration(&req)?;

    let email = req.email.trim().to_string();
    let request = SignUp {
        email: email.clone(),
        password: req.password,
        data: UserMetadata {
            first_name: validate::profile_field(req.first_name.as_deref()),
            last_name: validate::profile_field(req.last_name.as_deref()),
        },
        redirect_to: format!("{}/login", state.site_url),
    };

    state.backend.sign_up(&request).await?;
    info!("Registered {}", email);

    Ok((
        StatusCode::CREATED,
        Json(Notice::new(
            "Registration successful. Confirm your email address, then log in.",
        )),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate::credentials(&req.email, &req.password)?;

    let email = req.email.trim();
    let grant = state.backend.sign_in(email, &req.password).await?;
    let auth = grant.into_session(email);

    session::sign_in(&session, &auth).await?;
    info!("User {} logged in", auth.user.id);

    Ok(Json(LoginResponse {
        message: "Logged in".to_string(),
        user: auth.user,
    }))
}

/// POST /auth/logout — always succeeds.
pub async fn logout(session: Session) -> Json<Notice> {
    if let Err(e) = session::sign_out(&session).await {
        error!("Failed to clear session on logout: {}", e);
    }
    Json(Notice::new("Logged out"))
}
