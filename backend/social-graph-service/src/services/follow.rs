/// Follow service - manages the directed follower -> following edges
use std::sync::Arc;
use uuid::Uuid;

use super::require_user;
use crate::domain::{Follow, User};
use crate::error::Result;
use crate::repository::SocialGraphRepository;

#[derive(Clone)]
pub struct FollowService {
    repo: Arc<dyn SocialGraphRepository>,
}

impl FollowService {
    pub fn new(repo: Arc<dyn SocialGraphRepository>) -> Self {
        Self { repo }
    }

    /// Create a follow relationship (idempotent)
    ///
    /// Returns true if a new edge was created, false if it already existed.
    pub async fn follow_user(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool> {
        self.require_both(follower_id, following_id).await?;

        let created = self
            .repo
            .insert_follow(&Follow::new(follower_id, following_id))
            .await?;

        if created {
            tracing::info!(follower = %follower_id, following = %following_id, "Follow created");
        } else {
            tracing::debug!(
                follower = %follower_id,
                following = %following_id,
                "Follow already exists"
            );
        }
        Ok(created)
    }

    /// Remove a follow relationship (idempotent)
    ///
    /// Returns true if an edge was removed.
    pub async fn unfollow_user(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool> {
        self.require_both(follower_id, following_id).await?;

        let removed = self.repo.delete_follow(follower_id, following_id).await?;
        if removed {
            tracing::info!(follower = %follower_id, following = %following_id, "Follow removed");
        }
        Ok(removed)
    }

    /// Users who follow `user_id`
    pub async fn get_followers(&self, user_id: Uuid) -> Result<Vec<User>> {
        require_user(self.repo.as_ref(), user_id).await?;
        Ok(self.repo.find_followers(user_id).await?)
    }

    /// Users that `user_id` follows
    pub async fn get_following(&self, user_id: Uuid) -> Result<Vec<User>> {
        require_user(self.repo.as_ref(), user_id).await?;
        Ok(self.repo.find_following(user_id).await?)
    }

    /// Whether the directed edge `follower_id -> following_id` exists
    pub async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool> {
        self.require_both(follower_id, following_id).await?;
        Ok(self.repo.follow_exists(follower_id, following_id).await?)
    }

    async fn require_both(&self, follower_id: Uuid, following_id: Uuid) -> Result<()> {
        require_user(self.repo.as_ref(), follower_id).await?;
        require_user(self.repo.as_ref(), following_id).await?;
        Ok(())
    }
}
