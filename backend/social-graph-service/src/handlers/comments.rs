use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AppState, MessageResponse};
use crate::domain::Comment;
use crate::error::Result;
use crate::metrics::track;

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            user_id: comment.user_id,
            post_id: comment.post_id,
            created_at: comment.created_at,
        }
    }
}

/// Add a comment; the text comes from the `content` query parameter
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    query: web::Query<CommentQuery>,
) -> Result<HttpResponse> {
    let (user_id, post_id) = path.into_inner();
    track(
        "add_comment",
        state.comments.add_comment(user_id, post_id, &query.content),
    )
    .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment added!")))
}

pub async fn get_post_comments(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = track(
        "get_post_comments",
        state.comments.get_post_comments(*post_id),
    )
    .await?;
    let body: Vec<CommentResponse> = comments.into_iter().map(CommentResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
