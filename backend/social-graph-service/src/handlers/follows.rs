/// Follow handlers - follow/unfollow and relationship listings
use actix_web::{web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use super::users::to_responses;
use super::{AppState, MessageResponse};
use crate::error::Result;
use crate::metrics::track;

pub async fn follow_user(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (follower_id, following_id) = path.into_inner();
    track(
        "follow_user",
        state.follows.follow_user(follower_id, following_id),
    )
    .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Followed successfully!")))
}

pub async fn unfollow_user(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (follower_id, following_id) = path.into_inner();
    track(
        "unfollow_user",
        state.follows.unfollow_user(follower_id, following_id),
    )
    .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Unfollowed successfully!")))
}

pub async fn get_followers(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let users = track("get_followers", state.follows.get_followers(*user_id)).await?;
    Ok(HttpResponse::Ok().json(to_responses(users)))
}

pub async fn get_following(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let users = track("get_following", state.follows.get_following(*user_id)).await?;
    Ok(HttpResponse::Ok().json(to_responses(users)))
}

#[derive(Debug, Serialize)]
pub struct FollowingResponse {
    pub following: bool,
}

pub async fn is_following(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (follower_id, following_id) = path.into_inner();
    let following = track(
        "is_following",
        state.follows.is_following(follower_id, following_id),
    )
    .await?;

    Ok(HttpResponse::Ok().json(FollowingResponse { following }))
}
