//! Group wire models and their engine mappings

use oxidir_engine::dn::Dn;
use oxidir_engine::model::{GroupEntry, GroupKind, NewGroup};
use serde::{Deserialize, Serialize};

/// Wire name of posix groups
const POSIX_GROUP: &str = "posixGroup";
/// Wire name of member-list groups
const GROUP_OF_NAMES: &str = "groupOfNames";

/// Group record as returned by the directory facade
#[derive(Debug, Serialize, Deserialize)]
pub struct GroupRecord {
    pub dn: String,
    pub cn: String,
    #[serde(default)]
    pub group_type: Option<String>,
    #[serde(default)]
    pub gid_number: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub member_count: u32,
}

impl GroupRecord {
    /// Convert into the engine group model
    pub fn into_entry(self) -> GroupEntry {
        let kind = match self.group_type.as_deref() {
            Some(POSIX_GROUP) => GroupKind::Posix,
            _ => GroupKind::GroupOfNames,
        };
        GroupEntry {
            dn: Dn::parse(&self.dn),
            name: self.cn,
            kind,
            gid: self.gid_number,
            description: self.description.filter(|d| !d.is_empty()),
            member_count: self.member_count,
        }
    }
}

/// Wire name for an engine group kind
pub fn kind_to_wire(kind: GroupKind) -> &'static str {
    match kind {
        GroupKind::Posix => POSIX_GROUP,
        GroupKind::GroupOfNames => GROUP_OF_NAMES,
    }
}

/// Group list response
#[derive(Debug, Serialize, Deserialize)]
pub struct GroupListResponse {
    pub results: Vec<GroupRecord>,
    #[serde(default)]
    pub next_cookie: Option<String>,
}

/// Body for POST /api/groups
#[derive(Debug, Serialize)]
pub struct CreateGroupRequest {
    pub group_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateGroupRequest {
    /// Build the request body from the engine group model
    pub fn from_new_group(group: &NewGroup) -> Self {
        Self {
            group_type: kind_to_wire(group.kind).to_string(),
            gid_number: group.gid,
            description: group.description.clone(),
        }
    }
}

/// Member list from GET /api/groups/{name}/members
#[derive(Debug, Serialize, Deserialize)]
pub struct MemberListResponse {
    pub members: Vec<String>,
}

/// Body for POST /api/groups/{name}/members
#[derive(Debug, Serialize)]
pub struct MemberRequest {
    pub member_dn: String,
    /// Login attribute value, required by posix groups which track
    /// members by name rather than DN
    pub member_uid: String,
}

/// Group names from GET /api/users/{uid}/groups
#[derive(Debug, Serialize, Deserialize)]
pub struct UserGroupsResponse {
    pub groups: Vec<String>,
}

impl UserGroupsResponse {
    /// Normalize values to bare group names; servers with the memberOf
    /// overlay report full DNs instead of names
    pub fn into_names(self) -> Vec<String> {
        self.groups
            .into_iter()
            .map(|value| {
                if value.contains('=') {
                    Dn::parse(&value).leaf_value("cn")
                } else {
                    value
                }
            })
            .collect()
    }
}
