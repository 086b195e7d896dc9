use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::get_current_user::UserData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::AvatarUrl;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn update_avatar(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Json(body): Json<UpdateAvatarRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let avatar = AvatarUrl::new(body.avatar_url)
        .map_err(|e| ApiError::UnprocessableEntity(format!("Invalid avatar: {}", e)))?;

    state
        .auth_service
        .update_avatar(&user, avatar)
        .await
        .map_err(ApiError::from)
        .map(|ref updated| ApiSuccess::new(StatusCode::OK, updated.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateAvatarRequest {
    avatar_url: String,
}
