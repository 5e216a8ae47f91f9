use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::r#trait::{RepoResult, SocialGraphRepository};
use super::RepositoryError;
use crate::domain::{Comment, Follow, Group, GroupMember, Post, Report, User};

/// Post columns with the author's username joined in.
/// Callers alias posts as `p` and users as `u`.
const POST_COLUMNS: &str = r#"
    p.id, p.author_id, u.username AS author_username, p.content, p.media_url,
    p.likes, p.shares, p.shared, p.original_post_id, p.created_at, p.updated_at
"#;

const GROUP_COLUMNS: &str = "g.id, g.name, g.is_public, g.creator_id, g.created_at";

const USER_COLUMNS: &str = "u.id, u.username, u.display_name, u.created_at";

/// Escape LIKE metacharacters so the pattern matches literally
fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(sqlx::FromRow)]
struct ReportRow {
    id: Uuid,
    user_id: Uuid,
    post_id: Uuid,
    description: String,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = RepositoryError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Report {
            id: row.id,
            user_id: row.user_id,
            post_id: row.post_id,
            description: row.description,
            status: row.status.parse().map_err(RepositoryError::Database)?,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL repository for the social graph (source of truth)
#[derive(Clone)]
pub struct PostgresSocialGraphRepository {
    pool: PgPool,
}

impl PostgresSocialGraphRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn insert_post_in<'e, E>(&self, executor: E, post: &Post) -> RepoResult<Post>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let sql = format!(
            r#"
            WITH p AS (
                INSERT INTO posts (id, author_id, content, media_url, likes, shares, shared,
                                   original_post_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            SELECT {POST_COLUMNS}
            FROM p
            JOIN users u ON u.id = p.author_id
            "#
        );

        let stored = sqlx::query_as::<_, Post>(&sql)
            .bind(post.id)
            .bind(post.author_id)
            .bind(&post.content)
            .bind(&post.media_url)
            .bind(post.likes)
            .bind(post.shares)
            .bind(post.shared)
            .bind(post.original_post_id)
            .bind(post.created_at)
            .bind(post.updated_at)
            .fetch_one(executor)
            .await?;

        Ok(stored)
    }

    async fn adjust_likes(&self, post_id: Uuid, expression: &str) -> RepoResult<Option<Post>> {
        let sql = format!(
            r#"
            UPDATE posts p
            SET likes = {expression}
            FROM users u
            WHERE p.id = $1 AND u.id = p.author_id
            RETURNING {POST_COLUMNS}
            "#
        );

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }
}

#[async_trait::async_trait]
impl SocialGraphRepository for PostgresSocialGraphRepository {
    async fn create_user(&self, user: &User) -> RepoResult<User> {
        let stored = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, display_name, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, display_name, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        debug!("Created user in PostgreSQL: {} ({})", stored.id, stored.username);
        Ok(stored)
    }

    async fn find_user(&self, user_id: Uuid) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, display_name, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_post(&self, post: &Post) -> RepoResult<Post> {
        self.insert_post_in(&self.pool, post).await
    }

    async fn find_post(&self, post_id: Uuid) -> RepoResult<Option<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id WHERE p.id = $1"
        );

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    async fn find_posts_by_author(&self, author_id: Uuid) -> RepoResult<Vec<Post>> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.author_id = $1
            ORDER BY p.created_at DESC
            "#
        );

        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    async fn update_post_content(
        &self,
        post_id: Uuid,
        content: &str,
        media_url: Option<&str>,
    ) -> RepoResult<Option<Post>> {
        let sql = format!(
            r#"
            UPDATE posts p
            SET content = $2, media_url = $3, updated_at = NOW()
            FROM users u
            WHERE p.id = $1 AND u.id = p.author_id
            RETURNING {POST_COLUMNS}
            "#
        );

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .bind(content)
            .bind(media_url)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    async fn delete_post(&self, post_id: Uuid) -> RepoResult<bool> {
        // Shares, comments and reports reference posts with ON DELETE RESTRICT
        let affected = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|err| match RepositoryError::from(err) {
                RepositoryError::MissingReference(_) => RepositoryError::StillReferenced(
                    "Post has shares, comments or reports".to_string(),
                ),
                other => other,
            })?
            .rows_affected();

        Ok(affected > 0)
    }

    async fn increment_likes(&self, post_id: Uuid) -> RepoResult<Option<Post>> {
        self.adjust_likes(post_id, "p.likes + 1").await
    }

    async fn decrement_likes(&self, post_id: Uuid) -> RepoResult<Option<Post>> {
        self.adjust_likes(post_id, "GREATEST(p.likes - 1, 0)").await
    }

    async fn create_share(&self, share: &Post) -> RepoResult<Post> {
        let original_id = share.original_post_id.ok_or_else(|| {
            RepositoryError::Database("share is missing original_post_id".to_string())
        })?;

        let mut tx = self.pool.begin().await?;

        // Bumping the counter first also locks the origin row until commit
        let bumped = sqlx::query("UPDATE posts SET shares = shares + 1 WHERE id = $1")
            .bind(original_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if bumped == 0 {
            return Err(RepositoryError::MissingReference("Post not found".to_string()));
        }

        let stored = self.insert_post_in(&mut *tx, share).await?;

        tx.commit().await?;

        debug!("Created share in PostgreSQL: {} -> {}", stored.id, original_id);
        Ok(stored)
    }

    async fn insert_comment(&self, comment: &Comment) -> RepoResult<Comment> {
        let stored = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, user_id, post_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, post_id, content, created_at
            "#,
        )
        .bind(comment.id)
        .bind(comment.user_id)
        .bind(comment.post_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn find_comments_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, user_id, post_id, content, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn insert_follow(&self, follow: &Follow) -> RepoResult<bool> {
        let inserted = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO follows (id, follower_id, following_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (follower_id, following_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(follow.id)
        .bind(follow.follower_id)
        .bind(follow.following_id)
        .bind(follow.created_at)
        .fetch_optional(&self.pool)
        .await?;

        debug!(
            "Upserted FOLLOWS in PostgreSQL: {} -> {} (new={})",
            follow.follower_id,
            follow.following_id,
            inserted.is_some()
        );
        Ok(inserted.is_some())
    }

    async fn delete_follow(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool> {
        let affected = sqlx::query(
            "DELETE FROM follows WHERE follower_id = $1 AND following_id = $2",
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn follow_exists(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM follows
                WHERE follower_id = $1 AND following_id = $2
            )
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_followers(&self, user_id: Uuid) -> RepoResult<Vec<User>> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.following_id = $1
            ORDER BY f.created_at DESC
            "#
        );

        let users = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn find_following(&self, user_id: Uuid) -> RepoResult<Vec<User>> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM follows f
            JOIN users u ON u.id = f.following_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            "#
        );

        let users = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn create_group_with_admin(
        &self,
        group: &Group,
        admin: &GroupMember,
    ) -> RepoResult<(Group, GroupMember)> {
        let mut tx = self.pool.begin().await?;

        let stored_group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO social_groups (id, name, is_public, creator_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, is_public, creator_id, created_at
            "#,
        )
        .bind(group.id)
        .bind(&group.name)
        .bind(group.is_public)
        .bind(group.creator_id)
        .bind(group.created_at)
        .fetch_one(&mut *tx)
        .await?;

        let stored_admin = sqlx::query_as::<_, GroupMember>(
            r#"
            INSERT INTO group_members (id, user_id, group_id, is_admin, joined_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, group_id, is_admin, joined_at
            "#,
        )
        .bind(admin.id)
        .bind(admin.user_id)
        .bind(stored_group.id)
        .bind(admin.is_admin)
        .bind(admin.joined_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            "Created group in PostgreSQL: {} ({}) with admin {}",
            stored_group.id, stored_group.name, stored_admin.user_id
        );
        Ok((stored_group, stored_admin))
    }

    async fn find_group(&self, group_id: Uuid) -> RepoResult<Option<Group>> {
        let sql = format!("SELECT {GROUP_COLUMNS} FROM social_groups g WHERE g.id = $1");

        let group = sqlx::query_as::<_, Group>(&sql)
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    async fn find_groups_by_creator(&self, creator_id: Uuid) -> RepoResult<Vec<Group>> {
        let sql = format!(
            "SELECT {GROUP_COLUMNS} FROM social_groups g WHERE g.creator_id = $1 ORDER BY g.created_at"
        );

        let groups = sqlx::query_as::<_, Group>(&sql)
            .bind(creator_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(groups)
    }

    async fn find_groups_by_member(&self, user_id: Uuid) -> RepoResult<Vec<Group>> {
        let sql = format!(
            r#"
            SELECT {GROUP_COLUMNS}
            FROM social_groups g
            JOIN group_members m ON m.group_id = g.id
            WHERE m.user_id = $1
            ORDER BY g.created_at
            "#
        );

        let groups = sqlx::query_as::<_, Group>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(groups)
    }

    async fn search_groups(&self, pattern: &str) -> RepoResult<Vec<Group>> {
        let sql = format!(
            r#"
            SELECT {GROUP_COLUMNS}
            FROM social_groups g
            WHERE g.name ILIKE '%' || $1 || '%'
            ORDER BY g.name, g.created_at
            "#
        );

        let groups = sqlx::query_as::<_, Group>(&sql)
            .bind(escape_like(pattern))
            .fetch_all(&self.pool)
            .await?;

        Ok(groups)
    }

    async fn delete_group_by_creator(&self, group_id: Uuid, creator_id: Uuid) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await?;

        let owned: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM social_groups WHERE id = $1 AND creator_id = $2 FOR UPDATE",
        )
        .bind(group_id)
        .bind(creator_id)
        .fetch_optional(&mut *tx)
        .await?;

        if owned.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        let members_removed = sqlx::query("DELETE FROM group_members WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM social_groups WHERE id = $1 AND creator_id = $2")
            .bind(group_id)
            .bind(creator_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        debug!(
            "Deleted group in PostgreSQL: {} ({} members removed)",
            group_id, members_removed
        );
        Ok(deleted > 0)
    }

    async fn insert_member(&self, member: &GroupMember) -> RepoResult<GroupMember> {
        let inserted = sqlx::query_as::<_, GroupMember>(
            r#"
            INSERT INTO group_members (id, user_id, group_id, is_admin, joined_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, group_id) DO NOTHING
            RETURNING id, user_id, group_id, is_admin, joined_at
            "#,
        )
        .bind(member.id)
        .bind(member.user_id)
        .bind(member.group_id)
        .bind(member.is_admin)
        .bind(member.joined_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(stored) = inserted {
            return Ok(stored);
        }

        let existing = sqlx::query_as::<_, GroupMember>(
            r#"
            SELECT id, user_id, group_id, is_admin, joined_at
            FROM group_members
            WHERE user_id = $1 AND group_id = $2
            "#,
        )
        .bind(member.user_id)
        .bind(member.group_id)
        .fetch_optional(&self.pool)
        .await?;

        existing.ok_or_else(|| {
            RepositoryError::Database("membership removed during insert".to_string())
        })
    }

    async fn delete_member(&self, group_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        let affected = sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    async fn find_group_members(&self, group_id: Uuid) -> RepoResult<Vec<GroupMember>> {
        let members = sqlx::query_as::<_, GroupMember>(
            r#"
            SELECT id, user_id, group_id, is_admin, joined_at
            FROM group_members
            WHERE group_id = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn insert_report(&self, report: &Report) -> RepoResult<Report> {
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            INSERT INTO reports (id, user_id, post_id, description, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, post_id, description, status, created_at
            "#,
        )
        .bind(report.id)
        .bind(report.user_id)
        .bind(report.post_id)
        .bind(&report.description)
        .bind(report.status.as_str())
        .bind(report.created_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_reports_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, user_id, post_id, description, status, created_at
            FROM reports
            WHERE post_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Report::try_from).collect()
    }

    async fn health_check(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
