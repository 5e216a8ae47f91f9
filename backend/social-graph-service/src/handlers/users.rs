/// User handlers - HTTP endpoints for user records
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::AppState;
use crate::domain::User;
use crate::error::Result;
use crate::metrics::track;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(
        length(max = 50),
        custom(function = "crate::validators::not_blank")
    )]
    pub username: String,
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            created_at: user.created_at,
        }
    }
}

pub(crate) fn to_responses(users: Vec<User>) -> Vec<UserResponse> {
    users.into_iter().map(UserResponse::from).collect()
}

/// Create a user
pub async fn create_user(
    state: web::Data<AppState>,
    req: web::Json<CreateUserRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let user = track(
        "create_user",
        state
            .users
            .create_user(&req.username, req.display_name.as_deref()),
    )
    .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Get a user by ID
pub async fn get_user(state: web::Data<AppState>, user_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let user = track("get_user", state.users.get_user(*user_id)).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
