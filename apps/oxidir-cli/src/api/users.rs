//! User API methods

use crate::api::client::{decode_json, RestDirectory};
use crate::models::user::{CreateUserRequest, UpdateUserRequest, UserListResponse, UserRecord};
use crate::models::{MessageResponse, UserGroupsResponse};
use oxidir_engine::error::{EngineError, EngineResult};
use oxidir_engine::model::{EntryUpdate, NewEntry, ScopeFilter};
use reqwest::StatusCode;

impl RestDirectory {
    /// Fetch one page of user entries, optionally scoped to a container
    pub(crate) async fn fetch_users(
        &self,
        scope: &ScopeFilter,
        page_size: u32,
        cookie: Option<&str>,
    ) -> EngineResult<UserListResponse> {
        let mut request = self
            .http()
            .get(self.url("/api/users"))
            .query(&[("page_size", page_size.to_string())]);
        if let Some(cookie) = cookie {
            request = request.query(&[("cookie", cookie)]);
        }
        if let Some(base) = scope.base() {
            request = request.query(&[("base", base.to_string())]);
        }

        let response = self.send_authenticated(request).await?;
        if response.status().is_success() {
            decode_json(response).await
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Fetch a single user by login name
    pub(crate) async fn fetch_user(&self, uid: &str) -> EngineResult<UserRecord> {
        let url = self.url(&format!("/api/users/{uid}"));
        let response = self.get_authenticated(&url).await?;

        if response.status().is_success() {
            decode_json(response).await
        } else if response.status() == StatusCode::NOT_FOUND {
            Err(EngineError::not_found(format!("user '{uid}'")))
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Create a user entry and return the record the server stored
    pub(crate) async fn create_user(&self, entry: &NewEntry) -> EngineResult<UserRecord> {
        let body = CreateUserRequest::from_new_entry(entry);
        let mut request = self
            .http()
            .post(self.url("/api/users"))
            .query(&[("username", entry.uid.as_str())])
            .json(&body);
        if let Some(parent) = &entry.parent {
            request = request.query(&[("base", parent.to_string())]);
        }

        let response = self.send_authenticated(request).await?;
        if response.status().is_success() {
            decode_json(response).await
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Replace attributes on an existing user entry
    pub(crate) async fn update_user(
        &self,
        uid: &str,
        update: &EntryUpdate,
    ) -> EngineResult<UserRecord> {
        let url = self.url(&format!("/api/users/{uid}"));
        let body = UpdateUserRequest::from_update(update);

        let response = self.patch_json(&url, &body).await?;
        if response.status().is_success() {
            decode_json(response).await
        } else if response.status() == StatusCode::NOT_FOUND {
            Err(EngineError::not_found(format!("user '{uid}'")))
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Lock a user entry so it can no longer bind
    pub(crate) async fn disable_user(&self, uid: &str) -> EngineResult<()> {
        let url = self.url(&format!("/api/users/{uid}/disable"));
        let response = self.send_authenticated(self.http().post(&url)).await?;

        if response.status().is_success() {
            let _: MessageResponse = decode_json(response).await?;
            Ok(())
        } else if response.status() == StatusCode::NOT_FOUND {
            Err(EngineError::not_found(format!("user '{uid}'")))
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Search users by name, login, or email
    pub(crate) async fn search_users(&self, query: &str) -> EngineResult<Vec<UserRecord>> {
        let request = self
            .http()
            .get(self.url("/api/search/users"))
            .query(&[("q", query)]);

        let response = self.send_authenticated(request).await?;
        if response.status().is_success() {
            let list: UserListResponse = decode_json(response).await?;
            Ok(list.results)
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// List the names of the groups a user belongs to
    pub(crate) async fn fetch_user_groups(&self, uid: &str) -> EngineResult<Vec<String>> {
        let url = self.url(&format!("/api/users/{uid}/groups"));
        let response = self.get_authenticated(&url).await?;

        if response.status().is_success() {
            let groups: UserGroupsResponse = decode_json(response).await?;
            Ok(groups.into_names())
        } else if response.status() == StatusCode::NOT_FOUND {
            Err(EngineError::not_found(format!("user '{uid}'")))
        } else {
            Err(self.error_from_response(response).await)
        }
    }
}
