//! Client for the hosted backend: a PostgREST-style reservation store and a
//! GoTrue-style identity provider sharing one base URL.

pub mod client;
pub mod error;
pub mod wire;

use async_trait::async_trait;

use auditorium_types::models::Reservation;

pub use client::{RemoteConfig, SupabaseClient};
pub use error::{RemoteError, Result};
pub use wire::{AuthGrant, RemoteUser, SignUp, UserMetadata};

/// Every call the service makes to the backend.
///
/// `SupabaseClient` is the production implementation; tests substitute a
/// recording fake.
#[async_trait]
pub trait Backend: Send + Sync {
    /// All rows of the reservations table, in the order the store returns them.
    async fn list_reservations(&self) -> Result<Vec<Reservation>>;

    /// Insert one row. Without an access token the public API key is the bearer.
    async fn insert_reservation(
        &self,
        reservation: &Reservation,
        access_token: Option<&str>,
    ) -> Result<()>;

    async fn sign_up(&self, request: &SignUp) -> Result<()>;

    /// Password grant.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthGrant>;

    async fn update_profile(&self, access_token: &str, profile: &UserMetadata) -> Result<()>;

    async fn update_password(&self, access_token: &str, password: &str) -> Result<()>;

    /// Admin delete. Uses the service-role key, never the user's token.
    async fn delete_user(&self, user_id: &str) -> Result<()>;
}
