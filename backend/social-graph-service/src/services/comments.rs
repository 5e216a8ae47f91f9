use std::sync::Arc;
use uuid::Uuid;

use super::{require_post, require_user};
use crate::domain::Comment;
use crate::error::Result;
use crate::repository::SocialGraphRepository;
use crate::validators::require_not_blank;

/// Comment service - comments attached to posts
#[derive(Clone)]
pub struct CommentService {
    repo: Arc<dyn SocialGraphRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn SocialGraphRepository>) -> Self {
        Self { repo }
    }

    pub async fn add_comment(&self, user_id: Uuid, post_id: Uuid, content: &str) -> Result<Comment> {
        require_not_blank("Comment", content)?;
        require_user(self.repo.as_ref(), user_id).await?;
        require_post(self.repo.as_ref(), post_id).await?;

        let comment = self
            .repo
            .insert_comment(&Comment::new(user_id, post_id, content))
            .await?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, user_id = %user_id, "Comment added");
        Ok(comment)
    }

    /// Comments on a post, oldest first
    pub async fn get_post_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        require_post(self.repo.as_ref(), post_id).await?;
        Ok(self.repo.find_comments_by_post(post_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Post, User};
    use crate::error::AppError;
    use crate::repository::InMemorySocialGraphRepository;

    async fn setup() -> (CommentService, Arc<InMemorySocialGraphRepository>, User, Post) {
        let repo = Arc::new(InMemorySocialGraphRepository::new());
        let alice = repo.create_user(&User::new("alice", None)).await.unwrap();
        let post = repo
            .insert_post(&Post::new(&alice, "hello", None))
            .await
            .unwrap();
        (CommentService::new(repo.clone()), repo, alice, post)
    }

    #[tokio::test]
    async fn test_comments_listed_in_creation_order() {
        let (comments, _, alice, post) = setup().await;
        comments.add_comment(alice.id, post.id, "first").await.unwrap();
        comments.add_comment(alice.id, post.id, "second").await.unwrap();

        let listed = comments.get_post_comments(post.id).await.unwrap();
        let contents: Vec<&str> = listed.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert!(listed.iter().all(|c| c.post_id == post.id && c.user_id == alice.id));
    }

    #[tokio::test]
    async fn test_comment_requires_existing_user_and_post() {
        let (comments, _, alice, post) = setup().await;

        let err = comments
            .add_comment(Uuid::new_v4(), post.id, "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = comments
            .add_comment(alice.id, Uuid::new_v4(), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_blank_comment_rejected() {
        let (comments, _, alice, post) = setup().await;
        let err = comments.add_comment(alice.id, post.id, "").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_commented_post_is_not_deleted() {
        let (comments, repo, alice, post) = setup().await;
        comments.add_comment(alice.id, post.id, "still here").await.unwrap();

        assert!(repo.delete_post(post.id).await.is_err());
        assert_eq!(comments.get_post_comments(post.id).await.unwrap().len(), 1);
    }
}
