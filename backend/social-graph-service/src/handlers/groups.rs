/// Group handlers - group lifecycle, search and membership
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{AppState, MessageResponse};
use crate::domain::{Group, GroupMember};
use crate::error::Result;
use crate::metrics::track;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    #[validate(
        length(max = 100),
        custom(function = "crate::validators::not_blank")
    )]
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberQuery {
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub group_id: Uuid,
    pub group_name: String,
    pub is_public: bool,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            group_id: group.id,
            group_name: group.name,
            is_public: group.is_public,
            creator_id: group.creator_id,
            created_at: group.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMemberResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub is_admin: bool,
    pub joined_at: DateTime<Utc>,
}

impl From<GroupMember> for GroupMemberResponse {
    fn from(member: GroupMember) -> Self {
        Self {
            id: member.id,
            user_id: member.user_id,
            group_id: member.group_id,
            is_admin: member.is_admin,
            joined_at: member.joined_at,
        }
    }
}

fn group_list(groups: Vec<Group>) -> Vec<GroupResponse> {
    groups.into_iter().map(GroupResponse::from).collect()
}

/// Create a group owned by the path user
pub async fn create_group(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
    req: web::Json<CreateGroupRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let group = track(
        "create_group",
        state.groups.create_group(*user_id, &req.name, req.is_public),
    )
    .await?;

    Ok(HttpResponse::Ok().json(GroupResponse::from(group)))
}

pub async fn get_group(state: web::Data<AppState>, group_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let group = track("get_group", state.groups.get_group(*group_id)).await?;
    Ok(HttpResponse::Ok().json(GroupResponse::from(group)))
}

pub async fn get_groups_by_creator(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let groups = track(
        "get_groups_by_creator",
        state.groups.get_groups_by_creator(*user_id),
    )
    .await?;
    Ok(HttpResponse::Ok().json(group_list(groups)))
}

pub async fn get_groups_by_member(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let groups = track(
        "get_groups_by_member",
        state.groups.get_groups_by_member(*user_id),
    )
    .await?;
    Ok(HttpResponse::Ok().json(group_list(groups)))
}

pub async fn search_groups(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let groups = track("search_groups", state.groups.search_groups(&query.name)).await?;
    Ok(HttpResponse::Ok().json(group_list(groups)))
}

/// Delete a group. Requests from anyone but the creator change nothing.
pub async fn delete_group(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (user_id, group_id) = path.into_inner();
    let deleted = track("delete_group", state.groups.delete_group(user_id, group_id)).await?;

    let message = if deleted {
        "Group deleted successfully"
    } else {
        "No group deleted"
    };
    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}

pub async fn get_group_members(
    state: web::Data<AppState>,
    group_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let members = track("get_group_members", state.groups.get_group_members(*group_id)).await?;
    let body: Vec<GroupMemberResponse> =
        members.into_iter().map(GroupMemberResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn add_user_to_group(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    query: web::Query<MemberQuery>,
) -> Result<HttpResponse> {
    let (group_id, user_id) = path.into_inner();
    let member = track(
        "add_user_to_group",
        state
            .groups
            .add_user_to_group(group_id, user_id, query.is_admin),
    )
    .await?;

    Ok(HttpResponse::Ok().json(GroupMemberResponse::from(member)))
}

pub async fn remove_user_from_group(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (group_id, user_id) = path.into_inner();
    track(
        "remove_user_from_group",
        state.groups.remove_user_from_group(group_id, user_id),
    )
    .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Member removed")))
}
