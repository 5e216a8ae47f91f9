/// Business logic layer for social-graph-service
///
/// Each service owns one concern and shares the same repository handle:
/// - User service: identity records
/// - Post service: post lifecycle, likes, shares
/// - Follow service: follow edges and relationship queries
/// - Comment service: comments on posts
/// - Group service: groups and membership
/// - Report service: flagging posts
pub mod comments;
pub mod follow;
pub mod groups;
pub mod posts;
pub mod reports;
pub mod users;

pub use comments::CommentService;
pub use follow::FollowService;
pub use groups::GroupService;
pub use posts::PostService;
pub use reports::ReportService;
pub use users::UserService;

use uuid::Uuid;

use crate::domain::{Group, Post, User};
use crate::error::{AppError, Result};
use crate::repository::SocialGraphRepository;

pub(crate) async fn require_user(repo: &dyn SocialGraphRepository, user_id: Uuid) -> Result<User> {
    repo.find_user(user_id)
        .await?
        .ok_or_else(AppError::user_not_found)
}

pub(crate) async fn require_post(repo: &dyn SocialGraphRepository, post_id: Uuid) -> Result<Post> {
    repo.find_post(post_id)
        .await?
        .ok_or_else(AppError::post_not_found)
}

pub(crate) async fn require_group(
    repo: &dyn SocialGraphRepository,
    group_id: Uuid,
) -> Result<Group> {
    repo.find_group(group_id)
        .await?
        .ok_or_else(AppError::group_not_found)
}
