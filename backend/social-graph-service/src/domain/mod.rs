pub mod authorization;
pub mod models;

pub use authorization::{ensure_owner, is_owner, Owned};
pub use models::{
    Comment, Follow, Group, GroupMember, Post, Report, ReportStatus, User, SHARED_CONTENT_PREFIX,
};
