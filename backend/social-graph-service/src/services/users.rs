use std::sync::Arc;
use uuid::Uuid;

use crate::domain::User;
use crate::error::{AppError, Result};
use crate::repository::{RepositoryError, SocialGraphRepository};
use crate::validators::require_not_blank;

/// User service - identity records referenced by the rest of the graph
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn SocialGraphRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn SocialGraphRepository>) -> Self {
        Self { repo }
    }

    /// Create a user; usernames are unique
    pub async fn create_user(&self, username: &str, display_name: Option<&str>) -> Result<User> {
        require_not_blank("Username", username)?;

        let user = User::new(username.trim(), display_name.map(str::to_string));
        let stored = self.repo.create_user(&user).await.map_err(|err| match err {
            RepositoryError::UniqueViolation(_) => {
                AppError::Conflict(format!("Username '{}' is already taken", user.username))
            }
            other => other.into(),
        })?;

        tracing::info!(user_id = %stored.id, username = %stored.username, "User created");
        Ok(stored)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        super::require_user(self.repo.as_ref(), user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemorySocialGraphRepository;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemorySocialGraphRepository::new()))
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let users = service();
        let created = users.create_user("alice", Some("Alice")).await.unwrap();

        let fetched = users.get_user(created.id).await.unwrap();
        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.display_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let users = service();
        users.create_user("alice", None).await.unwrap();

        let err = users.create_user("alice", None).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_blank_username_rejected() {
        let err = service().create_user("   ", None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_user_not_found() {
        let err = service().get_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
