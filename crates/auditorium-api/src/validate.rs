//! Input checks. Everything here runs before the backend is contacted.

use chrono::NaiveDate;

use auditorium_types::api::RegisterRequest;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Phrase the user must type to delete their account.
pub const DELETE_CONFIRMATION: &str = "DELETE";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns the trimmed room and the parsed date.
pub fn reservation(room: &str, date: &str) -> Result<(String, NaiveDate), AppError> {
    let room = room.trim();
    if room.is_empty() {
        return Err(AppError::Validation("Room number is required"));
    }

    let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Validation("Date must be a valid date in YYYY-MM-DD format"))?;

    Ok((room.to_string(), date))
}

pub fn credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation("Email and password are required"));
    }
    Ok(())
}

pub fn registration(req: &RegisterRequest) -> Result<(), AppError> {
    credentials(&req.email, &req.password)?;
    if let Some(confirmation) = &req.password_confirmation {
        if confirmation != &req.password {
            return Err(AppError::Validation("Passwords do not match"));
        }
    }
    Ok(())
}

pub fn new_password(new_password: &str, confirmation: &str) -> Result<(), AppError> {
    if new_password.is_empty() {
        return Err(AppError::Validation("New password is required"));
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "Password must be at least 6 characters long",
        ));
    }
    if new_password != confirmation {
        return Err(AppError::Validation("Passwords do not match"));
    }
    Ok(())
}

pub fn delete_confirmation(text: &str) -> Result<(), AppError> {
    if text != DELETE_CONFIRMATION {
        return Err(AppError::Validation(
            "Type DELETE to confirm account deletion",
        ));
    }
    Ok(())
}

/// Trim an optional profile field; blank becomes `None`.
pub fn profile_field(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg.to_string(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn reservation_trims_room_and_parses_date() {
        let (room, date) = reservation("  101 ", "2025-01-10").unwrap();
        assert_eq!(room, "101");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
    }

    #[test]
    fn blank_room_rejected() {
        assert_eq!(message(reservation("   ", "2025-01-10").unwrap_err()), "Room number is required");
    }

    #[test]
    fn bad_dates_rejected() {
        for date in ["", "10.01.2025", "2025-02-30", "2025-13-01", "tomorrow"] {
            assert!(
                matches!(reservation("101", date), Err(AppError::Validation(_))),
                "{} should be rejected",
                date
            );
        }
    }

    #[test]
    fn credentials_require_both_fields() {
        assert!(credentials("a@b.c", "pw").is_ok());
        assert!(credentials(" ", "pw").is_err());
        assert!(credentials("a@b.c", "").is_err());
    }

    #[test]
    fn registration_checks_confirmation_only_when_present() {
        let mut req = RegisterRequest {
            email: "a@b.c".into(),
            password: "secret1".into(),
            password_confirmation: None,
            first_name: None,
            last_name: None,
        };
        assert!(registration(&req).is_ok());

        req.password_confirmation = Some("secret2".into());
        assert_eq!(message(registration(&req).unwrap_err()), "Passwords do not match");

        req.password_confirmation = Some("secret1".into());
        assert!(registration(&req).is_ok());
    }

    #[test]
    fn new_password_rules() {
        assert_eq!(message(new_password("", "").unwrap_err()), "New password is required");
        assert_eq!(message(new_password("abcdef", "abcdeg").unwrap_err()), "Passwords do not match");
        assert_eq!(
            message(new_password("abc", "abc").unwrap_err()),
            "Password must be at least 6 characters long"
        );
        assert_eq!(
            message(new_password("abc", "abd").unwrap_err()),
            "Password must be at least 6 characters long"
        );
        assert!(new_password("abcdef", "abcdef").is_ok());
        // Length counts characters, not bytes.
        assert!(new_password("äöü", "äöü").is_err());
    }

    #[test]
    fn delete_needs_exact_phrase() {
        assert!(delete_confirmation("DELETE").is_ok());
        for text in ["", "delete", "DELETE ", "yes"] {
            assert!(delete_confirmation(text).is_err());
        }
    }

    #[test]
    fn profile_field_blanks_become_none() {
        assert_eq!(profile_field(Some("  Ada ")), Some("Ada".to_string()));
        assert_eq!(profile_field(Some("   ")), None);
        assert_eq!(profile_field(None), None);
    }
}
