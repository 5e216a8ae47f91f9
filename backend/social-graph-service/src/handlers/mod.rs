/// HTTP handlers for the social graph API
///
/// Every route lives under `/api`. Handlers validate request DTOs, call one
/// service operation through `metrics::track`, and map the result to JSON.
pub mod comments;
pub mod follows;
pub mod groups;
pub mod health;
pub mod posts;
pub mod reports;
pub mod users;

use actix_web::web;
use serde::Serialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::repository::SocialGraphRepository;
use crate::services::{
    CommentService, FollowService, GroupService, PostService, ReportService, UserService,
};

/// Shared state handed to every handler through `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn SocialGraphRepository>,
    pub users: UserService,
    pub posts: PostService,
    pub follows: FollowService,
    pub comments: CommentService,
    pub groups: GroupService,
    pub reports: ReportService,
}

impl AppState {
    pub fn new(repo: Arc<dyn SocialGraphRepository>) -> Self {
        Self {
            users: UserService::new(repo.clone()),
            posts: PostService::new(repo.clone()),
            follows: FollowService::new(repo.clone()),
            comments: CommentService::new(repo.clone()),
            groups: GroupService::new(repo.clone()),
            reports: ReportService::new(repo.clone()),
            repo,
        }
    }
}

/// Plain acknowledgement body for mutations that return no entity
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Register every route. Literal segments (`view`, `search`, `creator`...)
/// are registered ahead of the parameterized paths they overlap with.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Extractor failures use the same JSON error body as handler errors
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::Validation(err.to_string()).into()
    }));

    cfg.route("/health", web::get().to(health::health))
        .route("/health/ready", web::get().to(health::ready))
        .route("/metrics", web::get().to(crate::metrics::serve_metrics))
        .service(
            web::scope("/api")
                // users & follows
                .route("/users", web::post().to(users::create_user))
                .route("/users/{user_id}", web::get().to(users::get_user))
                .route(
                    "/users/{user_id}/followers",
                    web::get().to(follows::get_followers),
                )
                .route(
                    "/users/{user_id}/following",
                    web::get().to(follows::get_following),
                )
                .route(
                    "/users/{follower_id}/following/{following_id}",
                    web::get().to(follows::is_following),
                )
                .route(
                    "/users/{follower_id}/follow/{following_id}",
                    web::post().to(follows::follow_user),
                )
                .route(
                    "/users/{follower_id}/unfollow/{following_id}",
                    web::post().to(follows::unfollow_user),
                )
                // posts
                .route("/posts/view/{post_id}", web::get().to(posts::get_post))
                .route(
                    "/posts/{user_id}/like/{post_id}",
                    web::post().to(posts::like_post),
                )
                .route(
                    "/posts/{user_id}/unlike/{post_id}",
                    web::post().to(posts::unlike_post),
                )
                .route("/posts/{user_id}", web::post().to(posts::create_post))
                .route("/posts/{user_id}", web::get().to(posts::fetch_user_posts))
                .route("/posts/{user_id}/{post_id}", web::put().to(posts::modify_post))
                .route(
                    "/posts/{user_id}/{post_id}",
                    web::delete().to(posts::remove_post),
                )
                // shares
                .route(
                    "/share/{user_id}/share/{post_id}",
                    web::post().to(posts::share_post),
                )
                // comments
                .route(
                    "/comments/post/{post_id}",
                    web::get().to(comments::get_post_comments),
                )
                .route(
                    "/comments/{user_id}/post/{post_id}",
                    web::post().to(comments::add_comment),
                )
                // groups
                .route("/groups/search", web::get().to(groups::search_groups))
                .route("/groups/view/{group_id}", web::get().to(groups::get_group))
                .route(
                    "/groups/creator/{user_id}",
                    web::get().to(groups::get_groups_by_creator),
                )
                .route(
                    "/groups/member/{user_id}",
                    web::get().to(groups::get_groups_by_member),
                )
                .route("/groups/{user_id}", web::post().to(groups::create_group))
                .route(
                    "/groups/{group_id}/members",
                    web::get().to(groups::get_group_members),
                )
                .route(
                    "/groups/{group_id}/members/{user_id}",
                    web::post().to(groups::add_user_to_group),
                )
                .route(
                    "/groups/{group_id}/members/{user_id}",
                    web::delete().to(groups::remove_user_from_group),
                )
                .route(
                    "/groups/{user_id}/{group_id}",
                    web::delete().to(groups::delete_group),
                )
                // reports
                .route(
                    "/reports/post/{post_id}",
                    web::get().to(reports::get_post_reports),
                )
                .route(
                    "/reports/{user_id}/report/{post_id}",
                    web::post().to(reports::report_post),
                ),
        );
}
