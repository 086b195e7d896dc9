use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::contact_data::ContactData;
use super::contact_data::ContactRequest;
use super::ApiError;
use super::ApiSuccess;
use crate::contact::ports::ContactServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_contact(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Json(body): Json<ContactRequest>,
) -> Result<ApiSuccess<ContactData>, ApiError> {
    state
        .contact_service
        .create_contact(&user.id, body.try_into_details()?)
        .await
        .map_err(ApiError::from)
        .map(|ref contact| ApiSuccess::new(StatusCode::CREATED, contact.into()))
}
