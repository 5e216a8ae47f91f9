use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::r#trait::{RepoResult, SocialGraphRepository};
use super::RepositoryError;
use crate::domain::{Comment, Follow, Group, GroupMember, Post, Report, User};

/// Tables kept in insertion order; a single lock makes every method atomic.
#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
    groups: Vec<Group>,
    members: Vec<GroupMember>,
    reports: Vec<Report>,
}

impl Tables {
    fn user(&self, user_id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    fn post_mut(&mut self, post_id: Uuid) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == post_id)
    }

    fn require_user(&self, user_id: Uuid) -> RepoResult<&User> {
        self.user(user_id)
            .ok_or_else(|| RepositoryError::MissingReference("User not found".to_string()))
    }

    fn require_post(&self, post_id: Uuid) -> RepoResult<()> {
        if self.posts.iter().any(|p| p.id == post_id) {
            Ok(())
        } else {
            Err(RepositoryError::MissingReference("Post not found".to_string()))
        }
    }

    fn require_group(&self, group_id: Uuid) -> RepoResult<()> {
        if self.groups.iter().any(|g| g.id == group_id) {
            Ok(())
        } else {
            Err(RepositoryError::MissingReference("Group not found".to_string()))
        }
    }

    /// Mirror of the `ON DELETE` rules in the PostgreSQL schema
    /// True when a share, comment or report still points at the post
    fn post_referenced(&self, post_id: Uuid) -> bool {
        self.posts.iter().any(|p| p.original_post_id == Some(post_id))
            || self.comments.iter().any(|c| c.post_id == post_id)
            || self.reports.iter().any(|r| r.post_id == post_id)
    }
}

/// Counters are INTEGER columns; overflow is an error, never a silent clamp.
fn checked_increment(value: i32, counter: &str) -> RepoResult<i32> {
    value
        .checked_add(1)
        .ok_or_else(|| RepositoryError::OutOfRange(format!("{} counter out of range", counter)))
}

/// Process-local repository used for development and tests.
///
/// Enforces the same uniqueness and reference rules as the PostgreSQL schema.
#[derive(Default)]
pub struct InMemorySocialGraphRepository {
    tables: RwLock<Tables>,
}

impl InMemorySocialGraphRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SocialGraphRepository for InMemorySocialGraphRepository {
    async fn create_user(&self, user: &User) -> RepoResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::UniqueViolation(
                "users_username_unique".to_string(),
            ));
        }
        tables.users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_user(&self, user_id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.tables.read().await.user(user_id).cloned())
    }

    async fn insert_post(&self, post: &Post) -> RepoResult<Post> {
        let mut tables = self.tables.write().await;
        let mut stored = post.clone();
        stored.author_username = tables.require_user(post.author_id)?.username.clone();
        tables.posts.push(stored.clone());
        Ok(stored)
    }

    async fn find_post(&self, post_id: Uuid) -> RepoResult<Option<Post>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == post_id).cloned())
    }

    async fn find_posts_by_author(&self, author_id: Uuid) -> RepoResult<Vec<Post>> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .rev()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn update_post_content(
        &self,
        post_id: Uuid,
        content: &str,
        media_url: Option<&str>,
    ) -> RepoResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        Ok(tables.post_mut(post_id).map(|post| {
            post.content = content.to_string();
            post.media_url = media_url.map(str::to_string);
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete_post(&self, post_id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.post_referenced(post_id) {
            return Err(RepositoryError::StillReferenced(
                "Post has shares, comments or reports".to_string(),
            ));
        }
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != post_id);
        Ok(tables.posts.len() < before)
    }

    async fn increment_likes(&self, post_id: Uuid) -> RepoResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.post_mut(post_id) else {
            return Ok(None);
        };
        post.likes = checked_increment(post.likes, "likes")?;
        Ok(Some(post.clone()))
    }

    async fn decrement_likes(&self, post_id: Uuid) -> RepoResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        Ok(tables.post_mut(post_id).map(|post| {
            if post.likes > 0 {
                post.likes -= 1;
            }
            post.clone()
        }))
    }

    async fn create_share(&self, share: &Post) -> RepoResult<Post> {
        let original_id = share.original_post_id.ok_or_else(|| {
            RepositoryError::Database("share is missing original_post_id".to_string())
        })?;

        let mut tables = self.tables.write().await;
        let author_username = tables.require_user(share.author_id)?.username.clone();
        let original = tables
            .post_mut(original_id)
            .ok_or_else(|| RepositoryError::MissingReference("Post not found".to_string()))?;
        original.shares = checked_increment(original.shares, "shares")?;

        let mut stored = share.clone();
        stored.author_username = author_username;
        tables.posts.push(stored.clone());
        Ok(stored)
    }

    async fn insert_comment(&self, comment: &Comment) -> RepoResult<Comment> {
        let mut tables = self.tables.write().await;
        tables.require_user(comment.user_id)?;
        tables.require_post(comment.post_id)?;
        tables.comments.push(comment.clone());
        Ok(comment.clone())
    }

    async fn find_comments_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn insert_follow(&self, follow: &Follow) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        tables.require_user(follow.follower_id)?;
        tables.require_user(follow.following_id)?;
        let exists = tables.follows.iter().any(|f| {
            f.follower_id == follow.follower_id && f.following_id == follow.following_id
        });
        if exists {
            return Ok(false);
        }
        tables.follows.push(follow.clone());
        Ok(true)
    }

    async fn delete_follow(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.follows.len();
        tables
            .follows
            .retain(|f| !(f.follower_id == follower_id && f.following_id == following_id));
        Ok(tables.follows.len() < before)
    }

    async fn follow_exists(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .any(|f| f.follower_id == follower_id && f.following_id == following_id))
    }

    async fn find_followers(&self, user_id: Uuid) -> RepoResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .rev()
            .filter(|f| f.following_id == user_id)
            .filter_map(|f| tables.user(f.follower_id).cloned())
            .collect())
    }

    async fn find_following(&self, user_id: Uuid) -> RepoResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .rev()
            .filter(|f| f.follower_id == user_id)
            .filter_map(|f| tables.user(f.following_id).cloned())
            .collect())
    }

    async fn create_group_with_admin(
        &self,
        group: &Group,
        admin: &GroupMember,
    ) -> RepoResult<(Group, GroupMember)> {
        let mut tables = self.tables.write().await;
        tables.require_user(group.creator_id)?;
        tables.require_user(admin.user_id)?;
        if tables.groups.iter().any(|g| g.id == group.id)
            || tables.members.iter().any(|m| m.id == admin.id)
        {
            return Err(RepositoryError::UniqueViolation("primary key".to_string()));
        }

        let mut stored_admin = admin.clone();
        stored_admin.group_id = group.id;

        tables.groups.push(group.clone());
        tables.members.push(stored_admin.clone());
        Ok((group.clone(), stored_admin))
    }

    async fn find_group(&self, group_id: Uuid) -> RepoResult<Option<Group>> {
        let tables = self.tables.read().await;
        Ok(tables.groups.iter().find(|g| g.id == group_id).cloned())
    }

    async fn find_groups_by_creator(&self, creator_id: Uuid) -> RepoResult<Vec<Group>> {
        let tables = self.tables.read().await;
        Ok(tables
            .groups
            .iter()
            .filter(|g| g.creator_id == creator_id)
            .cloned()
            .collect())
    }

    async fn find_groups_by_member(&self, user_id: Uuid) -> RepoResult<Vec<Group>> {
        let tables = self.tables.read().await;
        Ok(tables
            .groups
            .iter()
            .filter(|g| {
                tables
                    .members
                    .iter()
                    .any(|m| m.group_id == g.id && m.user_id == user_id)
            })
            .cloned()
            .collect())
    }

    async fn search_groups(&self, pattern: &str) -> RepoResult<Vec<Group>> {
        let needle = pattern.to_lowercase();
        let tables = self.tables.read().await;
        let mut groups: Vec<Group> = tables
            .groups
            .iter()
            .filter(|g| g.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        // Stable sort keeps creation order among equal names
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    async fn delete_group_by_creator(&self, group_id: Uuid, creator_id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .groups
            .iter()
            .any(|g| g.id == group_id && g.creator_id == creator_id);
        if !owned {
            return Ok(false);
        }

        tables.members.retain(|m| m.group_id != group_id);
        tables.groups.retain(|g| g.id != group_id);
        Ok(true)
    }

    async fn insert_member(&self, member: &GroupMember) -> RepoResult<GroupMember> {
        let mut tables = self.tables.write().await;
        tables.require_group(member.group_id)?;
        tables.require_user(member.user_id)?;

        if let Some(existing) = tables
            .members
            .iter()
            .find(|m| m.group_id == member.group_id && m.user_id == member.user_id)
        {
            return Ok(existing.clone());
        }

        tables.members.push(member.clone());
        Ok(member.clone())
    }

    async fn delete_member(&self, group_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.members.len();
        tables
            .members
            .retain(|m| !(m.group_id == group_id && m.user_id == user_id));
        Ok(tables.members.len() < before)
    }

    async fn find_group_members(&self, group_id: Uuid) -> RepoResult<Vec<GroupMember>> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .iter()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn insert_report(&self, report: &Report) -> RepoResult<Report> {
        let mut tables = self.tables.write().await;
        tables.require_user(report.user_id)?;
        tables.require_post(report.post_id)?;
        tables.reports.push(report.clone());
        Ok(report.clone())
    }

    async fn find_reports_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Report>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reports
            .iter()
            .rev()
            .filter(|r| r.post_id == post_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemorySocialGraphRepository, User, User) {
        let repo = InMemorySocialGraphRepository::new();
        let alice = repo.create_user(&User::new("alice", None)).await.unwrap();
        let bob = repo.create_user(&User::new("bob", None)).await.unwrap();
        (repo, alice, bob)
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let (repo, _, _) = seeded().await;
        let err = repo.create_user(&User::new("alice", None)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn test_decrement_likes_floors_at_zero() {
        let (repo, alice, _) = seeded().await;
        let post = repo.insert_post(&Post::new(&alice, "hi", None)).await.unwrap();

        let after = repo.decrement_likes(post.id).await.unwrap().unwrap();
        assert_eq!(after.likes, 0);

        repo.increment_likes(post.id).await.unwrap();
        let after = repo.decrement_likes(post.id).await.unwrap().unwrap();
        assert_eq!(after.likes, 0);
    }

    #[tokio::test]
    async fn test_shared_original_cannot_be_deleted() {
        let (repo, alice, bob) = seeded().await;
        let original = repo.insert_post(&Post::new(&alice, "hi", None)).await.unwrap();
        let share = repo
            .create_share(&Post::share_of(&original, &bob))
            .await
            .unwrap();

        let err = repo.delete_post(original.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::StillReferenced(_)));

        assert!(repo.find_post(original.id).await.unwrap().is_some());
        let share = repo.find_post(share.id).await.unwrap().unwrap();
        assert!(share.shared);
        assert_eq!(share.original_post_id, Some(original.id));

        // The share itself is unreferenced and can go
        assert!(repo.delete_post(share.id).await.unwrap());
        assert!(repo.delete_post(original.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_commented_or_reported_post_cannot_be_deleted() {
        let (repo, alice, bob) = seeded().await;
        let commented = repo.insert_post(&Post::new(&alice, "a", None)).await.unwrap();
        let reported = repo.insert_post(&Post::new(&alice, "b", None)).await.unwrap();
        repo.insert_comment(&Comment::new(bob.id, commented.id, "nice"))
            .await
            .unwrap();
        repo.insert_report(&Report::pending(bob.id, reported.id, "spam"))
            .await
            .unwrap();

        for post_id in [commented.id, reported.id] {
            let err = repo.delete_post(post_id).await.unwrap_err();
            assert!(matches!(err, RepositoryError::StillReferenced(_)));
        }
        assert_eq!(repo.find_comments_by_post(commented.id).await.unwrap().len(), 1);
        assert_eq!(repo.find_reports_by_post(reported.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_likes_are_not_lost() {
        let (repo, alice, _) = seeded().await;
        let post_id = repo.insert_post(&Post::new(&alice, "hi", None)).await.unwrap().id;
        let repo = std::sync::Arc::new(repo);

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.increment_likes(post_id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.find_post(post_id).await.unwrap().unwrap().likes, 50);
    }

    #[tokio::test]
    async fn test_like_overflow_is_an_error() {
        let (repo, alice, bob) = seeded().await;
        let mut full = Post::new(&alice, "viral", None);
        full.likes = i32::MAX;
        full.shares = i32::MAX;
        let full = repo.insert_post(&full).await.unwrap();

        let err = repo.increment_likes(full.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::OutOfRange(_)));
        assert_eq!(repo.find_post(full.id).await.unwrap().unwrap().likes, i32::MAX);

        let err = repo
            .create_share(&Post::share_of(&full, &bob))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::OutOfRange(_)));
        assert!(repo.find_posts_by_author(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_group_create_is_all_or_nothing() {
        let (repo, alice, _) = seeded().await;
        let group = Group::new(alice.id, "Produce", true);
        let ghost_admin = GroupMember::new(group.id, Uuid::new_v4(), true);

        let err = repo
            .create_group_with_admin(&group, &ghost_admin)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::MissingReference(_)));
        assert!(repo.find_group(group.id).await.unwrap().is_none());

        let first = Group::new(alice.id, "First", true);
        let (_, admin) = repo
            .create_group_with_admin(&first, &GroupMember::new(first.id, alice.id, true))
            .await
            .unwrap();
        let second = Group::new(alice.id, "Second", true);
        let mut clashing = GroupMember::new(second.id, alice.id, true);
        clashing.id = admin.id;

        let err = repo
            .create_group_with_admin(&second, &clashing)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueViolation(_)));
        assert!(repo.find_group(second.id).await.unwrap().is_none());
        assert_eq!(repo.find_groups_by_creator(alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_share_of_missing_original_changes_nothing() {
        let (repo, alice, bob) = seeded().await;
        let original = Post::new(&alice, "never stored", None);

        let err = repo
            .create_share(&Post::share_of(&original, &bob))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::MissingReference(_)));
        assert!(repo.find_posts_by_author(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_member_returns_existing_row() {
        let (repo, alice, bob) = seeded().await;
        let group = Group::new(alice.id, "Produce", true);
        repo.create_group_with_admin(&group, &GroupMember::new(group.id, alice.id, true))
            .await
            .unwrap();

        let first = repo
            .insert_member(&GroupMember::new(group.id, bob.id, false))
            .await
            .unwrap();
        let second = repo
            .insert_member(&GroupMember::new(group.id, bob.id, true))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(!second.is_admin);
        assert_eq!(repo.find_group_members(group.id).await.unwrap().len(), 2);
    }
}
