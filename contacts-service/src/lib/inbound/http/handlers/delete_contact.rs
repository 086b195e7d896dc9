use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::contact_data::parse_contact_id;
use super::contact_data::ContactData;
use super::ApiError;
use super::ApiSuccess;
use crate::contact::ports::ContactServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Responds with the removed contact.
pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(contact_id): Path<String>,
) -> Result<ApiSuccess<ContactData>, ApiError> {
    let contact_id = parse_contact_id(&contact_id)?;

    state
        .contact_service
        .delete_contact(&user.id, &contact_id)
        .await
        .map_err(ApiError::from)
        .map(|ref contact| ApiSuccess::new(StatusCode::OK, contact.into()))
}
