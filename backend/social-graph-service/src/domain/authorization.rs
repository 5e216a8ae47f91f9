//! Ownership checks for mutating operations.
//!
//! Authorization is a plain equality between the caller and the resource's
//! owner. Services call [`ensure_owner`] before every ownership-gated write.

use uuid::Uuid;

use super::models::{Comment, Group, Post};
use crate::error::{AppError, Result};

/// A resource with a single owning user
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for Group {
    fn owner_id(&self) -> Uuid {
        self.creator_id
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

pub fn is_owner<R: Owned + ?Sized>(caller_id: Uuid, resource: &R) -> bool {
    resource.owner_id() == caller_id
}

/// `Forbidden` unless `caller_id` owns `resource`
pub fn ensure_owner<R: Owned + ?Sized>(caller_id: Uuid, resource: &R) -> Result<()> {
    if is_owner(caller_id, resource) {
        Ok(())
    } else {
        Err(AppError::unauthorized_action())
    }
}
