use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use crate::error::AppError;
use crate::session;

/// Load the signed-in identity from the session cookie.
/// Handlers behind this layer read it with `Extension<AuthSession>`.
pub async fn require_session(
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = session::current(&session)
        .await?
        .ok_or(AppError::LoginRequired)?;

    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}
