pub mod account;
pub mod auth;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod reservations;
pub mod session;
pub mod validate;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post, put},
};
use tower_sessions::{MemoryStore, SessionManagerLayer, SessionStore, cookie::Key};

use auditorium_remote::Backend;

pub use error::AppError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub backend: Arc<dyn Backend>,
    /// Public base URL of this deployment, without a trailing slash.
    pub site_url: String,
    /// When false, reservations may be created without logging in.
    pub require_login: bool,
}

/// All routes, wrapped in a signed-cookie session layer backed by memory.
pub fn router(state: AppState, session_key: Key, secure_cookies: bool) -> Router {
    router_with_store(state, MemoryStore::default(), session_key, secure_cookies)
}

/// [`router`] over any session store.
pub fn router_with_store<Store>(
    state: AppState,
    store: Store,
    session_key: Key,
    secure_cookies: bool,
) -> Router
where
    Store: SessionStore + Clone,
{
    let session_layer = SessionManagerLayer::new(store)
        .with_secure(secure_cookies)
        .with_signed(session_key);

    let public_routes = Router::new()
        .route(
            "/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/health", get(health))
        .with_state(state.clone());

    let account_routes = Router::new()
        .route(
            "/account",
            get(account::get_account).delete(account::delete_account),
        )
        .route("/account/profile", patch(account::update_profile))
        .route("/account/password", put(account::change_password))
        .route("/account/preferences", put(account::update_preferences))
        .layer(axum_middleware::from_fn(middleware::require_session))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(account_routes)
        .layer(session_layer)
}

async fn health() -> &'static str {
    "ok"
}
