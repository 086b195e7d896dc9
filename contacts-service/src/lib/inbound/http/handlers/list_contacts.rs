use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::contact_data::to_contact_list;
use super::contact_data::ContactData;
use super::ApiError;
use super::ApiSuccess;
use crate::contact::models::Page;
use crate::contact::ports::ContactServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Query(query): Query<ListContactsQuery>,
) -> Result<ApiSuccess<Vec<ContactData>>, ApiError> {
    let page = Page::new(query.skip, query.limit)?;

    state
        .contact_service
        .list_contacts(&user.id, page)
        .await
        .map_err(ApiError::from)
        .map(|contacts| ApiSuccess::new(StatusCode::OK, to_contact_list(&contacts)))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListContactsQuery {
    skip: Option<u32>,
    limit: Option<u32>,
}
