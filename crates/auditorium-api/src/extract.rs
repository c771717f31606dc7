use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;

/// `Json` whose rejections answer with the usual validation body instead of
/// axum's plain-text 4xx.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text());
                Err(match rejection {
                    JsonRejection::MissingJsonContentType(_) => {
                        AppError::Validation("Request body must be JSON")
                    }
                    _ => AppError::Validation("Request body is malformed"),
                })
            }
        }
    }
}
