use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use auditorium_types::models::Reservation;

use crate::error::{RemoteError, Result};
use crate::wire::{AuthGrant, ReservationRow, SignUp, UserMetadata};
use crate::Backend;

const RESERVATIONS_TABLE: &str = "reservations";

/// Statuses the store may answer an insert with.
const INSERTED: &[StatusCode] = &[StatusCode::OK, StatusCode::CREATED];

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Public (anon) API key.
    pub api_key: String,
    /// Service-role key for admin calls. Account deletion is refused without it.
    pub service_key: Option<String>,
    /// Deadline applied to every call.
    pub timeout: Duration,
}

pub struct SupabaseClient {
    http: Client,
    rest_url: String,
    auth_url: String,
    api_key: String,
    service_key: Option<String>,
}

impl SupabaseClient {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base = config.base_url.trim_end_matches('/');
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", base),
            auth_url: format!("{}/auth/v1", base),
            api_key: config.api_key,
            service_key: config.service_key,
        })
    }

    /// Attach the project key and a bearer credential.
    fn authorize(&self, req: RequestBuilder, bearer: &str) -> RequestBuilder {
        req.header("apikey", &self.api_key).bearer_auth(bearer)
    }
}

#[async_trait]
impl Backend for SupabaseClient {
    async fn list_reservations(&self) -> Result<Vec<Reservation>> {
        let resp = self
            .authorize(
                self.http.get(format!("{}/{}", self.rest_url, RESERVATIONS_TABLE)),
                &self.api_key,
            )
            .query(&[("select", "*")])
            .send()
            .await?;

        let resp = ensure_success(resp).await?;
        let rows: Vec<ReservationRow> = decode(resp).await?;
        let total = rows.len();
        let reservations: Vec<Reservation> = rows
            .into_iter()
            .filter_map(ReservationRow::into_reservation)
            .collect();
        if reservations.len() < total {
            warn!(
                "Skipped {} unreadable reservation rows",
                total - reservations.len()
            );
        }
        Ok(reservations)
    }

    async fn insert_reservation(
        &self,
        reservation: &Reservation,
        access_token: Option<&str>,
    ) -> Result<()> {
        let bearer = access_token.unwrap_or(self.api_key.as_str());
        let resp = self
            .authorize(
                self.http.post(format!("{}/{}", self.rest_url, RESERVATIONS_TABLE)),
                bearer,
            )
            .json(reservation)
            .send()
            .await?;

        ensure_status(resp, INSERTED).await?;
        Ok(())
    }

    async fn sign_up(&self, request: &SignUp) -> Result<()> {
        let resp = self
            .authorize(self.http.post(format!("{}/signup", self.auth_url)), &self.api_key)
            .query(&[("redirect_to", request.redirect_to.as_str())])
            .json(request)
            .send()
            .await?;

        ensure_status(resp, INSERTED).await?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthGrant> {
        let resp = self
            .authorize(self.http.post(format!("{}/token", self.auth_url)), &self.api_key)
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let resp = ensure_status(resp, &[StatusCode::OK]).await?;
        decode(resp).await
    }

    async fn update_profile(&self, access_token: &str, profile: &UserMetadata) -> Result<()> {
        let resp = self
            .authorize(self.http.patch(format!("{}/user", self.auth_url)), access_token)
            .json(&serde_json::json!({ "data": profile }))
            .send()
            .await?;

        ensure_success(resp).await?;
        Ok(())
    }

    async fn update_password(&self, access_token: &str, password: &str) -> Result<()> {
        let resp = self
            .authorize(self.http.patch(format!("{}/user", self.auth_url)), access_token)
            .json(&serde_json::json!({ "password": password }))
            .send()
            .await?;

        ensure_success(resp).await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let service_key = self
            .service_key
            .as_deref()
            .ok_or(RemoteError::NotConfigured("SUPABASE_SERVICE_ROLE_KEY"))?;

        let resp = self
            .http
            .delete(format!("{}/admin/users/{}", self.auth_url, user_id))
            .header("apikey", service_key)
            .bearer_auth(service_key)
            .send()
            .await?;

        ensure_success(resp).await?;
        Ok(())
    }
}

async fn ensure_status(resp: Response, accepted: &[StatusCode]) -> Result<Response> {
    if accepted.contains(&resp.status()) {
        Ok(resp)
    } else {
        Err(rejection(resp).await)
    }
}

async fn ensure_success(resp: Response) -> Result<Response> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(rejection(resp).await)
    }
}

async fn rejection(resp: Response) -> RemoteError {
    let status = resp.status();
    let url = resp.url().path().to_string();
    let body = resp.text().await.unwrap_or_default();
    warn!("Backend rejected {} with {}", url, status);
    RemoteError::status(status.as_u16(), body)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        debug!("Undecodable backend body ({} bytes)", text.len());
        RemoteError::Decode(e.to_string())
    })
}
