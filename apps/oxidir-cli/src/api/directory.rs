//! Tree, deletion, and health API methods

use crate::api::client::{decode_json, RestDirectory};
use crate::models::{HealthResponse, TreeResponse};
use oxidir_engine::error::{EngineError, EngineResult};
use reqwest::StatusCode;

impl RestDirectory {
    /// Fetch every container DN in the directory
    pub(crate) async fn fetch_tree(&self) -> EngineResult<Vec<String>> {
        let url = self.url("/api/tree");
        let response = self.get_authenticated(&url).await?;

        if response.status().is_success() {
            let tree: TreeResponse = decode_json(response).await?;
            Ok(tree.containers)
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Delete any entry, user or group, by its DN
    pub(crate) async fn delete_resource(&self, dn: &str) -> EngineResult<()> {
        let request = self
            .http()
            .delete(self.url("/api/resource"))
            .query(&[("dn", dn)]);

        let response = self.send_authenticated(request).await?;
        if response.status().is_success() {
            Ok(())
        } else if response.status() == StatusCode::NOT_FOUND {
            Err(EngineError::not_found(format!("entry '{dn}'")))
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Probe service health; requires no session
    pub(crate) async fn fetch_health(&self) -> EngineResult<HealthResponse> {
        let url = self.url("/api/health");
        let response = self.get_unauthenticated(&url).await?;

        if response.status().is_success() {
            decode_json(response).await
        } else {
            Err(self.error_from_response(response).await)
        }
    }
}
