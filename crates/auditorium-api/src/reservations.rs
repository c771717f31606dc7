use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tower_sessions::Session;
use tracing::{info, warn};

use auditorium_types::api::{CreateReservationRequest, Notice, ReservationListResponse};
use auditorium_types::models::Reservation;

use crate::AppState;
use crate::error::AppError;
use crate::extract::JsonBody;
use crate::session;
use crate::validate;

pub const NO_RESERVATIONS: &str = "No reservations yet";

/// GET /reservations — every row, as the store returns it.
///
/// A failed read is not an error response: the list is empty and `error`
/// says why.
pub async fn list_reservations(State(state): State<AppState>) -> Json<ReservationListResponse> {
    match state.backend.list_reservations().await {
        Ok(reservations) => {
            let notice = reservations
                .is_empty()
                .then(|| NO_RESERVATIONS.to_string());
            Json(ReservationListResponse {
                reservations,
                notice,
                error: None,
            })
        }
        Err(e) => {
            warn!("Failed to load reservations: {}", e);
            Json(ReservationListResponse {
                reservations: vec![],
                notice: None,
                error: Some(format!("Could not load reservations: {}", e)),
            })
        }
    }
}

/// POST /reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    session: Session,
    JsonBody(req): JsonBody<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (room, date) = validate::reservation(&req.room, &req.date)?;

    let auth = session::current(&session).await?;
    if state.require_login && auth.is_none() {
        return Err(AppError::LoginRequired);
    }

    let reservation = Reservation {
        room,
        date,
        owner_id: auth.as_ref().map(|a| a.user.id.clone()),
    };
    let access_token = auth.as_ref().map(|a| a.access_token.as_str());

    if let Err(e) = state
        .backend
        .insert_reservation(&reservation, access_token)
        .await
    {
        warn!(
            "Reservation of room {} on {} failed: {}",
            reservation.room, reservation.date, e
        );
        if auth.is_some() {
            session::forget_if_rejected(&session, &e).await;
        }
        return Err(e.into());
    }

    info!(
        "Room {} reserved for {} by {}",
        reservation.room,
        reservation.date,
        reservation.owner_id.as_deref().unwrap_or("anonymous")
    );

    Ok((
        StatusCode::CREATED,
        Json(Notice::new("Reservation created successfully")),
    ))
}
