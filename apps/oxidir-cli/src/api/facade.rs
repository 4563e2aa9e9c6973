//! Engine facade implementation backed by the REST client

use crate::api::RestDirectory;
use async_trait::async_trait;
use oxidir_engine::dn::Dn;
use oxidir_engine::error::EngineResult;
use oxidir_engine::facade::DirectoryFacade;
use oxidir_engine::model::{
    DirectoryEntry, EntryPage, EntryUpdate, GroupEntry, NewEntry, NewGroup, PageCursor,
    ScopeFilter, ServiceHealth, UserEntry,
};
use oxidir_engine::session::Credentials;

#[async_trait]
impl DirectoryFacade for RestDirectory {
    async fn authenticate(&self, username: &str, password: &str) -> EngineResult<Credentials> {
        self.login(username, password).await
    }

    async fn list_entries(
        &self,
        scope: &ScopeFilter,
        page_size: u32,
        cursor: Option<&PageCursor>,
    ) -> EngineResult<EntryPage> {
        let cookie = cursor.map(|c| c.token());
        let list = self.fetch_users(scope, page_size, cookie).await?;

        let entries = list
            .results
            .into_iter()
            .map(|r| DirectoryEntry::User(r.into_entry()))
            .collect();
        let next_cursor = list
            .next_cookie
            .map(|token| PageCursor::new(token, scope.clone(), page_size));

        Ok(EntryPage {
            entries,
            next_cursor,
        })
    }

    async fn get_entry(&self, uid: &str) -> EngineResult<UserEntry> {
        Ok(self.fetch_user(uid).await?.into_entry())
    }

    async fn create_entry(&self, entry: &NewEntry) -> EngineResult<UserEntry> {
        Ok(self.create_user(entry).await?.into_entry())
    }

    async fn update_entry(&self, uid: &str, update: &EntryUpdate) -> EngineResult<UserEntry> {
        Ok(self.update_user(uid, update).await?.into_entry())
    }

    async fn disable_entry(&self, uid: &str) -> EngineResult<()> {
        self.disable_user(uid).await
    }

    async fn delete_entry(&self, dn: &Dn) -> EngineResult<()> {
        self.delete_resource(&dn.to_string()).await
    }

    async fn list_groups(&self) -> EngineResult<Vec<GroupEntry>> {
        let records = self.fetch_groups().await?;
        Ok(records.into_iter().map(|r| r.into_entry()).collect())
    }

    async fn create_group(&self, group: &NewGroup) -> EngineResult<()> {
        RestDirectory::create_group(self, group).await
    }

    async fn delete_group(&self, name: &str) -> EngineResult<()> {
        RestDirectory::delete_group(self, name).await
    }

    async fn group_members(&self, group: &str) -> EngineResult<Vec<Dn>> {
        let members = self.fetch_members(group).await?;
        Ok(members.iter().map(|dn| Dn::parse(dn)).collect())
    }

    async fn entry_groups(&self, uid: &str) -> EngineResult<Vec<String>> {
        self.fetch_user_groups(uid).await
    }

    async fn add_member(
        &self,
        group_dn: &Dn,
        member_dn: &Dn,
        member_uid: &str,
    ) -> EngineResult<()> {
        let group = group_dn.leaf_value("cn");
        self.add_group_member(&group, &member_dn.to_string(), member_uid)
            .await
    }

    async fn remove_member(
        &self,
        group_dn: &Dn,
        member_dn: &Dn,
        member_uid: &str,
    ) -> EngineResult<()> {
        let group = group_dn.leaf_value("cn");
        self.remove_group_member(&group, &member_dn.to_string(), member_uid)
            .await
    }

    async fn container_tree(&self) -> EngineResult<Vec<Dn>> {
        let containers = self.fetch_tree().await?;
        Ok(containers.iter().map(|dn| Dn::parse(dn)).collect())
    }

    async fn search_entries(&self, query: &str) -> EngineResult<Vec<UserEntry>> {
        let records = self.search_users(query).await?;
        Ok(records.into_iter().map(|r| r.into_entry()).collect())
    }

    async fn search_groups(&self, name: &str) -> EngineResult<Vec<GroupEntry>> {
        let records = self.search_group_records(name).await?;
        Ok(records.into_iter().map(|r| r.into_entry()).collect())
    }

    async fn health(&self) -> EngineResult<ServiceHealth> {
        let health = self.fetch_health().await?;
        Ok(ServiceHealth {
            status: health.status,
        })
    }
}
