/// Group service - group lifecycle and membership
///
/// The creator of a group is inserted as its first admin member in the same
/// transaction as the group itself. Only the creator may delete a group;
/// a delete from anyone else leaves the group untouched.
use std::sync::Arc;
use uuid::Uuid;

use super::{require_group, require_user};
use crate::domain::{Group, GroupMember};
use crate::error::Result;
use crate::repository::SocialGraphRepository;
use crate::validators::require_not_blank;

#[derive(Clone)]
pub struct GroupService {
    repo: Arc<dyn SocialGraphRepository>,
}

impl GroupService {
    pub fn new(repo: Arc<dyn SocialGraphRepository>) -> Self {
        Self { repo }
    }

    /// Create a group with `creator_id` as admin member
    pub async fn create_group(&self, creator_id: Uuid, name: &str, is_public: bool) -> Result<Group> {
        require_not_blank("Group name", name)?;
        require_user(self.repo.as_ref(), creator_id).await?;

        let group = Group::new(creator_id, name, is_public);
        let admin = GroupMember::new(group.id, creator_id, true);
        let (group, _) = self.repo.create_group_with_admin(&group, &admin).await?;

        tracing::info!(group_id = %group.id, creator_id = %creator_id, "Group created");
        Ok(group)
    }

    pub async fn get_group(&self, group_id: Uuid) -> Result<Group> {
        require_group(self.repo.as_ref(), group_id).await
    }

    pub async fn get_groups_by_creator(&self, creator_id: Uuid) -> Result<Vec<Group>> {
        Ok(self.repo.find_groups_by_creator(creator_id).await?)
    }

    pub async fn get_groups_by_member(&self, user_id: Uuid) -> Result<Vec<Group>> {
        Ok(self.repo.find_groups_by_member(user_id).await?)
    }

    /// Case-insensitive substring search on group names
    pub async fn search_groups(&self, name: &str) -> Result<Vec<Group>> {
        Ok(self.repo.search_groups(name.trim()).await?)
    }

    /// Delete a group and all its memberships.
    ///
    /// Returns false without touching anything when the group does not exist
    /// or `caller_id` is not its creator.
    pub async fn delete_group(&self, caller_id: Uuid, group_id: Uuid) -> Result<bool> {
        let deleted = self.repo.delete_group_by_creator(group_id, caller_id).await?;
        if deleted {
            tracing::info!(group_id = %group_id, "Group deleted");
        } else {
            tracing::warn!(
                group_id = %group_id,
                caller_id = %caller_id,
                "Group delete ignored: group missing or caller is not the creator"
            );
        }
        Ok(deleted)
    }

    /// Add a member. Adding an existing member returns the stored membership unchanged.
    pub async fn add_user_to_group(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        is_admin: bool,
    ) -> Result<GroupMember> {
        require_group(self.repo.as_ref(), group_id).await?;
        require_user(self.repo.as_ref(), user_id).await?;

        let member = self
            .repo
            .insert_member(&GroupMember::new(group_id, user_id, is_admin))
            .await?;

        tracing::info!(
            group_id = %group_id,
            user_id = %user_id,
            is_admin = member.is_admin,
            "Group member added"
        );
        Ok(member)
    }

    /// Remove a member; returns true if a membership was removed.
    /// A missing group or user simply removes nothing.
    pub async fn remove_user_from_group(&self, group_id: Uuid, user_id: Uuid) -> Result<bool> {
        let removed = self.repo.delete_member(group_id, user_id).await?;
        if removed {
            tracing::info!(group_id = %group_id, user_id = %user_id, "Group member removed");
        }
        Ok(removed)
    }

    pub async fn get_group_members(&self, group_id: Uuid) -> Result<Vec<GroupMember>> {
        require_group(self.repo.as_ref(), group_id).await?;
        Ok(self.repo.find_group_members(group_id).await?)
    }
}
