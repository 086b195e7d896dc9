use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::contact_data::to_contact_list;
use super::contact_data::ContactData;
use super::ApiError;
use super::ApiSuccess;
use crate::contact::models::ContactSearch;
use crate::contact::ports::ContactServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Without any filter every contact of the user matches.
pub async fn search_contacts(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Query(query): Query<SearchContactsQuery>,
) -> Result<ApiSuccess<Vec<ContactData>>, ApiError> {
    let search = ContactSearch::new(query.first_name, query.last_name, query.email);

    state
        .contact_service
        .search_contacts(&user.id, search)
        .await
        .map_err(ApiError::from)
        .map(|contacts| ApiSuccess::new(StatusCode::OK, to_contact_list(&contacts)))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchContactsQuery {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}
