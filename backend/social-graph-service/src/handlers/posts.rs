/// Post handlers - HTTP endpoints for post operations
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{AppState, MessageResponse};
use crate::domain::Post;
use crate::error::Result;
use crate::metrics::track;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[validate(custom(function = "crate::validators::not_blank"))]
    pub content: String,
    #[validate(length(max = 2048))]
    pub media_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub content: String,
    pub media_url: Option<String>,
    pub likes: i32,
    pub shares: i32,
    pub author_username: String,
    pub shared: bool,
    pub original_post_id: Option<Uuid>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            content: post.content,
            media_url: post.media_url,
            likes: post.likes,
            shares: post.shares,
            author_username: post.author_username,
            shared: post.shared,
            original_post_id: post.original_post_id,
        }
    }
}

/// Create a new post
pub async fn create_post(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = track(
        "create_post",
        state
            .posts
            .create_post(*user_id, &req.content, req.media_url.as_deref()),
    )
    .await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// Edit a post; only its author may do this
pub async fn modify_post(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let (user_id, post_id) = path.into_inner();

    let post = track(
        "modify_post",
        state
            .posts
            .modify_post(user_id, post_id, &req.content, req.media_url.as_deref()),
    )
    .await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// Delete a post; only its author may do this
pub async fn remove_post(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (user_id, post_id) = path.into_inner();
    track("remove_post", state.posts.remove_post(user_id, post_id)).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// Get posts for a user
pub async fn fetch_user_posts(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let posts = track("fetch_user_posts", state.posts.fetch_user_posts(*user_id)).await?;
    let body: Vec<PostResponse> = posts.into_iter().map(PostResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Get a post by ID
pub async fn get_post(state: web::Data<AppState>, post_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let post = track("get_post", state.posts.get_post(*post_id)).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// Like a post. The caller id in the path is not recorded.
pub async fn like_post(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (user_id, post_id) = path.into_inner();
    tracing::debug!(user_id = %user_id, post_id = %post_id, "Like requested");
    track("like_post", state.posts.like_post(post_id)).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post liked!")))
}

pub async fn unlike_post(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (user_id, post_id) = path.into_inner();
    tracing::debug!(user_id = %user_id, post_id = %post_id, "Unlike requested");
    track("unlike_post", state.posts.unlike_post(post_id)).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post unliked!")))
}

/// Share a post as a new post owned by the caller
pub async fn share_post(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (user_id, post_id) = path.into_inner();
    let share = track("share_post", state.posts.share_post(user_id, post_id)).await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(share)))
}
