use uuid::Uuid;

use super::RepositoryError;
use crate::domain::{Comment, Follow, Group, GroupMember, Post, Report, User};

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Storage interface for the social graph.
///
/// Both PostgresSocialGraphRepository and InMemorySocialGraphRepository implement this.
/// Every method is a single atomic unit: multi-step writes (share, group
/// creation, group deletion) run inside one transaction.
#[async_trait::async_trait]
pub trait SocialGraphRepository: Send + Sync {
    // ---- users ----

    /// Insert a user; `UniqueViolation` when the username is taken
    async fn create_user(&self, user: &User) -> RepoResult<User>;

    async fn find_user(&self, user_id: Uuid) -> RepoResult<Option<User>>;

    // ---- posts ----

    async fn insert_post(&self, post: &Post) -> RepoResult<Post>;

    async fn find_post(&self, post_id: Uuid) -> RepoResult<Option<Post>>;

    /// All posts by an author, newest first
    async fn find_posts_by_author(&self, author_id: Uuid) -> RepoResult<Vec<Post>>;

    /// Overwrite content and media in place; `None` if the post is gone
    async fn update_post_content(
        &self,
        post_id: Uuid,
        content: &str,
        media_url: Option<&str>,
    ) -> RepoResult<Option<Post>>;

    /// Returns true if a row was removed
    async fn delete_post(&self, post_id: Uuid) -> RepoResult<bool>;

    /// Atomic `likes = likes + 1`
    async fn increment_likes(&self, post_id: Uuid) -> RepoResult<Option<Post>>;

    /// Atomic decrement, floored at zero
    async fn decrement_likes(&self, post_id: Uuid) -> RepoResult<Option<Post>>;

    /// Insert `share` and bump its origin's share counter in one transaction.
    ///
    /// `share.original_post_id` must be set. `MissingReference` if the origin
    /// disappeared before the transaction ran.
    async fn create_share(&self, share: &Post) -> RepoResult<Post>;

    // ---- comments ----

    async fn insert_comment(&self, comment: &Comment) -> RepoResult<Comment>;

    /// Comments on a post, oldest first
    async fn find_comments_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Comment>>;

    // ---- follows ----

    /// Idempotent insert; returns true if a new edge was created
    async fn insert_follow(&self, follow: &Follow) -> RepoResult<bool>;

    /// Idempotent delete; returns true if an edge was removed
    async fn delete_follow(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool>;

    async fn follow_exists(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool>;

    /// Users following `user_id`, most recent edge first
    async fn find_followers(&self, user_id: Uuid) -> RepoResult<Vec<User>>;

    /// Users that `user_id` follows, most recent edge first
    async fn find_following(&self, user_id: Uuid) -> RepoResult<Vec<User>>;

    // ---- groups ----

    /// Insert the group and its creator's admin membership in one transaction
    async fn create_group_with_admin(
        &self,
        group: &Group,
        admin: &GroupMember,
    ) -> RepoResult<(Group, GroupMember)>;

    async fn find_group(&self, group_id: Uuid) -> RepoResult<Option<Group>>;

    async fn find_groups_by_creator(&self, creator_id: Uuid) -> RepoResult<Vec<Group>>;

    async fn find_groups_by_member(&self, user_id: Uuid) -> RepoResult<Vec<Group>>;

    /// Case-insensitive substring match on the group name
    async fn search_groups(&self, pattern: &str) -> RepoResult<Vec<Group>>;

    /// Delete members, then the group, only when `creator_id` created it.
    /// Returns false (and changes nothing) otherwise.
    async fn delete_group_by_creator(&self, group_id: Uuid, creator_id: Uuid) -> RepoResult<bool>;

    /// Insert a membership unless one already exists for (user, group).
    /// Returns the stored row, which is the existing one on a duplicate.
    async fn insert_member(&self, member: &GroupMember) -> RepoResult<GroupMember>;

    /// Returns true if a row was removed
    async fn delete_member(&self, group_id: Uuid, user_id: Uuid) -> RepoResult<bool>;

    async fn find_group_members(&self, group_id: Uuid) -> RepoResult<Vec<GroupMember>>;

    // ---- reports ----

    async fn insert_report(&self, report: &Report) -> RepoResult<Report>;

    /// Reports against a post, newest first
    async fn find_reports_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Report>>;

    /// Health check (optional)
    async fn health_check(&self) -> RepoResult<()> {
        Ok(())
    }
}
