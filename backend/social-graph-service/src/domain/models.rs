use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Prefix prepended to the content of a shared post
pub const SHARED_CONTENT_PREFIX: &str = "Shared Post: ";

/// User entity - identity record referenced by every other entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            display_name,
            created_at: Utc::now(),
        }
    }
}

/// Post entity - original or shared
///
/// `author_username` is joined from `users` on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub content: String,
    pub media_url: Option<String>,
    pub likes: i32,
    pub shares: i32,
    pub shared: bool,
    pub original_post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author: &User, content: impl Into<String>, media_url: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id: author.id,
            author_username: author.username.clone(),
            content: content.into(),
            media_url,
            likes: 0,
            shares: 0,
            shared: false,
            original_post_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build the share of `original` owned by `sharer`.
    ///
    /// The share points back at its origin and carries the origin's media.
    pub fn share_of(original: &Post, sharer: &User) -> Self {
        let mut post = Post::new(
            sharer,
            format!("{}{}", SHARED_CONTENT_PREFIX, original.content),
            original.media_url.clone(),
        );
        post.shared = true;
        post.original_post_id = Some(original.id);
        post
    }
}

/// Comment entity - one author, one post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(user_id: Uuid, post_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            post_id,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Follow edge (directed: follower -> following)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    pub fn new(follower_id: Uuid, following_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            follower_id,
            following_id,
            created_at: Utc::now(),
        }
    }
}

/// Group entity - owns its membership rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(creator_id: Uuid, name: impl Into<String>, is_public: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_public,
            creator_id,
            created_at: Utc::now(),
        }
    }
}

/// Membership of a user in a group. At most one per (user, group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupMember {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub is_admin: bool,
    pub joined_at: DateTime<Utc>,
}

impl GroupMember {
    pub fn new(group_id: Uuid, user_id: Uuid, is_admin: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            group_id,
            is_admin,
            joined_at: Utc::now(),
        }
    }
}

/// Moderation status of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "PENDING",
            ReportStatus::Reviewed => "REVIEWED",
            ReportStatus::Resolved => "RESOLVED",
            ReportStatus::Dismissed => "DISMISSED",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ReportStatus::Pending),
            "REVIEWED" => Ok(ReportStatus::Reviewed),
            "RESOLVED" => Ok(ReportStatus::Resolved),
            "DISMISSED" => Ok(ReportStatus::Dismissed),
            other => Err(format!("unknown report status: {}", other)),
        }
    }
}

/// Report entity - a user flagging a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub description: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// New reports always start out pending
    pub fn pending(user_id: Uuid, post_id: Uuid, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            post_id,
            description: description.into(),
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
