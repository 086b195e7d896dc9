use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;

pub async fn request_email(
    State(state): State<AppState>,
    Json(body): Json<RequestEmailBody>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let email = EmailAddress::new(body.email)
        .map_err(|e| ApiError::UnprocessableEntity(format!("Invalid email: {}", e)))?;

    state
        .auth_service
        .request_email_confirmation(email.as_str(), &state.public_url)
        .await
        .map_err(ApiError::from)
        .map(|outcome| ApiSuccess::new(StatusCode::OK, MessageData::new(outcome.message())))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestEmailBody {
    email: String,
}
