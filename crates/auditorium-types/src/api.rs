use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{Preferences, Reservation, SessionUser, Theme};

// -- Generic --

/// Success body carrying a user-facing message.
#[derive(Debug, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body. `error` is a stable kind, `message` is shown to the user.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Missing and `null` text fields read as empty, so the handlers' own
/// checks report them.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// -- Reservations --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateReservationRequest {
    #[serde(default, deserialize_with = "text")]
    pub room: String,
    #[serde(default, deserialize_with = "text")]
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReservationListResponse {
    pub reservations: Vec<Reservation>,
    /// Set when the list is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// Set when the remote could not be read; the list is then empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "text")]
    pub email: String,
    #[serde(default, deserialize_with = "text")]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "text")]
    pub email: String,
    #[serde(default, deserialize_with = "text")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: SessionUser,
}

// -- Account --

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub user: SessionUser,
    pub preferences: Preferences,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangePasswordRequest {
    #[serde(default, deserialize_with = "text")]
    pub new_password: String,
    #[serde(default, deserialize_with = "text")]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteAccountRequest {
    #[serde(default, deserialize_with = "text")]
    pub confirmation: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePreferencesRequest {
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub email_notifications: Option<bool>,
}
