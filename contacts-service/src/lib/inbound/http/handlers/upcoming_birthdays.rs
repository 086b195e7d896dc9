use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::contact_data::to_contact_list;
use super::contact_data::ContactData;
use super::ApiError;
use super::ApiSuccess;
use crate::contact::ports::ContactServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

const DEFAULT_DAYS: u32 = 7;
const MAX_DAYS: u32 = 366;

pub async fn upcoming_birthdays(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Query(query): Query<BirthdaysQuery>,
) -> Result<ApiSuccess<Vec<ContactData>>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_DAYS);
    if days > MAX_DAYS {
        return Err(ApiError::UnprocessableEntity(format!(
            "days must be at most {}",
            MAX_DAYS
        )));
    }

    state
        .contact_service
        .upcoming_birthdays(&user.id, days)
        .await
        .map_err(ApiError::from)
        .map(|contacts| ApiSuccess::new(StatusCode::OK, to_contact_list(&contacts)))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BirthdaysQuery {
    days: Option<u32>,
}
