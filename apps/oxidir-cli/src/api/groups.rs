//! Group API methods

use crate::api::client::{decode_json, RestDirectory};
use crate::models::group::{CreateGroupRequest, GroupListResponse, GroupRecord};
use crate::models::{MemberListResponse, MemberRequest, MessageResponse};
use oxidir_engine::error::{EngineError, EngineResult};
use oxidir_engine::model::NewGroup;
use reqwest::StatusCode;

impl RestDirectory {
    /// Fetch all groups in the directory
    pub(crate) async fn fetch_groups(&self) -> EngineResult<Vec<GroupRecord>> {
        let url = self.url("/api/groups");
        let response = self.get_authenticated(&url).await?;

        if response.status().is_success() {
            let list: GroupListResponse = decode_json(response).await?;
            Ok(list.results)
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Create a group entry
    pub(crate) async fn create_group(&self, group: &NewGroup) -> EngineResult<()> {
        let body = CreateGroupRequest::from_new_group(group);
        let request = self
            .http()
            .post(self.url("/api/groups"))
            .query(&[("group_name", group.name.as_str())])
            .json(&body);

        let response = self.send_authenticated(request).await?;
        if response.status().is_success() {
            let _: MessageResponse = decode_json(response).await?;
            Ok(())
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Delete a group by name
    pub(crate) async fn delete_group(&self, name: &str) -> EngineResult<()> {
        let url = self.url(&format!("/api/groups/{name}"));
        let response = self.send_authenticated(self.http().delete(&url)).await?;

        if response.status().is_success() {
            Ok(())
        } else if response.status() == StatusCode::NOT_FOUND {
            Err(EngineError::not_found(format!("group '{name}'")))
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// List the member DNs of a group
    pub(crate) async fn fetch_members(&self, name: &str) -> EngineResult<Vec<String>> {
        let url = self.url(&format!("/api/groups/{name}/members"));
        let response = self.get_authenticated(&url).await?;

        if response.status().is_success() {
            let list: MemberListResponse = decode_json(response).await?;
            Ok(list.members)
        } else if response.status() == StatusCode::NOT_FOUND {
            Err(EngineError::not_found(format!("group '{name}'")))
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Add a member to a group
    pub(crate) async fn add_group_member(
        &self,
        name: &str,
        member_dn: &str,
        member_uid: &str,
    ) -> EngineResult<()> {
        let url = self.url(&format!("/api/groups/{name}/members"));
        let body = MemberRequest {
            member_dn: member_dn.to_string(),
            member_uid: member_uid.to_string(),
        };

        let response = self.post_json(&url, &body).await?;
        if response.status().is_success() {
            let _: MessageResponse = decode_json(response).await?;
            Ok(())
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Remove a member from a group
    pub(crate) async fn remove_group_member(
        &self,
        name: &str,
        member_dn: &str,
        member_uid: &str,
    ) -> EngineResult<()> {
        let request = self
            .http()
            .delete(self.url(&format!("/api/groups/{name}/members")))
            .query(&[("member_dn", member_dn), ("member_uid", member_uid)]);

        let response = self.send_authenticated(request).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Search groups by name
    pub(crate) async fn search_group_records(&self, name: &str) -> EngineResult<Vec<GroupRecord>> {
        let request = self
            .http()
            .get(self.url("/api/search/groups"))
            .query(&[("name", name)]);

        let response = self.send_authenticated(request).await?;
        if response.status().is_success() {
            let list: GroupListResponse = decode_json(response).await?;
            Ok(list.results)
        } else {
            Err(self.error_from_response(response).await)
        }
    }
}
