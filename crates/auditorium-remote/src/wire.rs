//! Identity-provider payloads. Distinct from auditorium-types so the session
//! model does not follow the backend's field names.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use auditorium_types::models::{AuthSession, Reservation, SessionUser};

/// A `reservations` row as read back. Columns are loose so one odd row
/// cannot fail the whole listing.
#[derive(Debug, Deserialize)]
pub(crate) struct ReservationRow {
    #[serde(default)]
    room: Value,
    #[serde(default)]
    date: Value,
    #[serde(default)]
    owner_id: Value,
}

impl ReservationRow {
    /// `None` when room or date is unusable. Timestamps keep their date part.
    pub(crate) fn into_reservation(self) -> Option<Reservation> {
        let room = scalar_text(self.room)?;
        let date = self.date.as_str()?;
        let date = NaiveDate::parse_from_str(date.get(..10)?, "%Y-%m-%d").ok()?;
        Some(Reservation {
            room,
            date,
            owner_id: scalar_text(self.owner_id),
        })
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Free-form profile data kept by the identity provider under `user_metadata`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub data: UserMetadata,
    /// Sent as the `redirect_to` query parameter, not in the body.
    #[serde(skip)]
    pub redirect_to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Successful password-grant response.
#[derive(Clone, Deserialize)]
pub struct AuthGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub user: RemoteUser,
}

impl fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGrant")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

impl AuthGrant {
    /// `login_email` is used when the provider omits the user's email.
    pub fn into_session(self, login_email: &str) -> AuthSession {
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user: SessionUser {
                id: self.user.id,
                email: self.user.email.unwrap_or_else(|| login_email.to_string()),
                first_name: self.user.user_metadata.first_name,
                last_name: self.user.user_metadata.last_name,
            },
        }
    }
}
