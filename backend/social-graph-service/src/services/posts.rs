/// Post service - handles post creation, edits, deletion, likes and shares
use std::sync::Arc;
use uuid::Uuid;

use super::{require_post, require_user};
use crate::domain::{ensure_owner, Post};
use crate::error::{AppError, Result};
use crate::repository::SocialGraphRepository;
use crate::validators::require_not_blank;

#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn SocialGraphRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn SocialGraphRepository>) -> Self {
        Self { repo }
    }

    fn repo(&self) -> &dyn SocialGraphRepository {
        self.repo.as_ref()
    }

    /// Create a new post
    pub async fn create_post(
        &self,
        author_id: Uuid,
        content: &str,
        media_url: Option<&str>,
    ) -> Result<Post> {
        require_not_blank("Content", content)?;
        let author = require_user(self.repo(), author_id).await?;

        let post = self
            .repo
            .insert_post(&Post::new(&author, content, media_url.map(str::to_string)))
            .await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(post)
    }

    /// Get a post by ID
    pub async fn get_post(&self, post_id: Uuid) -> Result<Post> {
        require_post(self.repo(), post_id).await
    }

    /// Edit an existing post (author only)
    pub async fn modify_post(
        &self,
        caller_id: Uuid,
        post_id: Uuid,
        content: &str,
        media_url: Option<&str>,
    ) -> Result<Post> {
        require_not_blank("Content", content)?;
        let post = require_post(self.repo(), post_id).await?;
        self.authorize(caller_id, &post)?;

        let updated = self
            .repo
            .update_post_content(post_id, content, media_url)
            .await?
            .ok_or_else(AppError::post_not_found)?;

        tracing::info!(post_id = %post_id, "Post updated");
        Ok(updated)
    }

    /// Remove a post (author only).
    ///
    /// A post that still has shares, comments or reports is kept and the
    /// call fails with `Conflict`.
    pub async fn remove_post(&self, caller_id: Uuid, post_id: Uuid) -> Result<()> {
        let post = require_post(self.repo(), post_id).await?;
        self.authorize(caller_id, &post)?;

        if !self.repo.delete_post(post_id).await? {
            return Err(AppError::post_not_found());
        }

        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    /// All posts by a user, newest first
    pub async fn fetch_user_posts(&self, user_id: Uuid) -> Result<Vec<Post>> {
        Ok(self.repo.find_posts_by_author(user_id).await?)
    }

    /// Increment the like counter. Not idempotent: every call counts.
    pub async fn like_post(&self, post_id: Uuid) -> Result<Post> {
        self.repo
            .increment_likes(post_id)
            .await?
            .ok_or_else(AppError::post_not_found)
    }

    /// Decrement the like counter, never below zero
    pub async fn unlike_post(&self, post_id: Uuid) -> Result<Post> {
        self.repo
            .decrement_likes(post_id)
            .await?
            .ok_or_else(AppError::post_not_found)
    }

    /// Share `post_id` as a new post owned by `user_id`
    pub async fn share_post(&self, user_id: Uuid, post_id: Uuid) -> Result<Post> {
        let sharer = require_user(self.repo(), user_id).await?;
        let original = require_post(self.repo(), post_id).await?;

        let share = self
            .repo
            .create_share(&Post::share_of(&original, &sharer))
            .await?;

        tracing::info!(
            post_id = %share.id,
            original_post_id = %original.id,
            user_id = %user_id,
            "Post shared"
        );
        Ok(share)
    }

    fn authorize(&self, caller_id: Uuid, post: &Post) -> Result<()> {
        ensure_owner(caller_id, post).map_err(|err| {
            tracing::warn!(
                post_id = %post.id,
                caller_id = %caller_id,
                author_id = %post.author_id,
                "Rejected post mutation by non-owner"
            );
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::repository::InMemorySocialGraphRepository;

    async fn setup() -> (PostService, User, User) {
        let repo = Arc::new(InMemorySocialGraphRepository::new());
        let alice = repo.create_user(&User::new("alice", None)).await.unwrap();
        let bob = repo.create_user(&User::new("bob", None)).await.unwrap();
        (PostService::new(repo), alice, bob)
    }

    #[tokio::test]
    async fn test_create_post_for_missing_author_fails() {
        let (posts, _, _) = setup().await;
        let err = posts
            .create_post(Uuid::new_v4(), "hello", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_post_rejects_blank_content() {
        let (posts, alice, _) = setup().await;
        let err = posts.create_post(alice.id, "  ", None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_like_increments_exactly_n_times() {
        let (posts, alice, _) = setup().await;
        let post = posts.create_post(alice.id, "apples", None).await.unwrap();

        for _ in 0..5 {
            posts.like_post(post.id).await.unwrap();
        }

        assert_eq!(posts.get_post(post.id).await.unwrap().likes, 5);
    }

    #[tokio::test]
    async fn test_unlike_at_zero_stays_zero() {
        let (posts, alice, _) = setup().await;
        let post = posts.create_post(alice.id, "pears", None).await.unwrap();

        let after = posts.unlike_post(post.id).await.unwrap();
        assert_eq!(after.likes, 0);

        posts.like_post(post.id).await.unwrap();
        posts.unlike_post(post.id).await.unwrap();
        let after = posts.unlike_post(post.id).await.unwrap();
        assert_eq!(after.likes, 0);
    }

    #[tokio::test]
    async fn test_like_missing_post_not_found() {
        let (posts, _, _) = setup().await;
        let err = posts.like_post(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_modify_by_non_owner_is_forbidden_and_unchanged() {
        let (posts, alice, bob) = setup().await;
        let post = posts
            .create_post(alice.id, "original", Some("a.png"))
            .await
            .unwrap();

        let err = posts
            .modify_post(bob.id, post.id, "hijacked", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let unchanged = posts.get_post(post.id).await.unwrap();
        assert_eq!(unchanged.content, "original");
        assert_eq!(unchanged.media_url.as_deref(), Some("a.png"));
    }

    #[tokio::test]
    async fn test_modify_by_owner_overwrites_content_and_media() {
        let (posts, alice, _) = setup().await;
        let post = posts
            .create_post(alice.id, "draft", Some("a.png"))
            .await
            .unwrap();

        let updated = posts
            .modify_post(alice.id, post.id, "final", None)
            .await
            .unwrap();

        assert_eq!(updated.id, post.id);
        assert_eq!(updated.content, "final");
        assert_eq!(updated.media_url, None);
        assert_eq!(updated.author_id, alice.id);
    }

    #[tokio::test]
    async fn test_remove_by_non_owner_is_forbidden() {
        let (posts, alice, bob) = setup().await;
        let post = posts.create_post(alice.id, "keep me", None).await.unwrap();

        let err = posts.remove_post(bob.id, post.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(posts.get_post(post.id).await.is_ok());

        posts.remove_post(alice.id, post.id).await.unwrap();
        assert!(matches!(
            posts.get_post(post.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_modify_missing_post_not_found() {
        let (posts, alice, _) = setup().await;
        let err = posts
            .modify_post(alice.id, Uuid::new_v4(), "x", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_share_creates_linked_post_and_counts_share() {
        let (posts, alice, bob) = setup().await;
        let original = posts
            .create_post(alice.id, "harvest day", Some("harvest.jpg"))
            .await
            .unwrap();

        let share = posts.share_post(bob.id, original.id).await.unwrap();

        assert_ne!(share.id, original.id);
        assert_eq!(share.author_id, bob.id);
        assert_eq!(share.author_username, "bob");
        assert!(share.shared);
        assert_eq!(share.original_post_id, Some(original.id));
        assert_eq!(share.media_url.as_deref(), Some("harvest.jpg"));
        assert_eq!(share.content, "Shared Post: harvest day");

        let original = posts.get_post(original.id).await.unwrap();
        assert_eq!(original.shares, 1);
    }

    #[tokio::test]
    async fn test_share_requires_user_and_post() {
        let (posts, alice, _) = setup().await;
        let post = posts.create_post(alice.id, "x", None).await.unwrap();

        let err = posts.share_post(Uuid::new_v4(), post.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = posts.share_post(alice.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_shared_original_conflicts() {
        let (posts, alice, bob) = setup().await;
        let original = posts.create_post(alice.id, "harvest day", None).await.unwrap();
        let share = posts.share_post(bob.id, original.id).await.unwrap();

        let err = posts.remove_post(alice.id, original.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let share = posts.get_post(share.id).await.unwrap();
        assert_eq!(share.original_post_id, Some(original.id));
        assert!(posts.get_post(original.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_user_posts_newest_first() {
        let (posts, alice, bob) = setup().await;
        posts.create_post(alice.id, "first", None).await.unwrap();
        posts.create_post(bob.id, "other", None).await.unwrap();
        posts.create_post(alice.id, "second", None).await.unwrap();

        let list = posts.fetch_user_posts(alice.id).await.unwrap();
        let contents: Vec<&str> = list.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["second", "first"]);

        assert!(posts.fetch_user_posts(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
