//! In-memory directory façade for engine scenario tests.
//!
//! Holds a small directory in memory, counts façade calls per operation,
//! and lets tests gate individual responses to force out-of-order
//! resolution.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use oxidir_engine::dn::Dn;
use oxidir_engine::error::{EngineError, EngineResult};
use oxidir_engine::facade::DirectoryFacade;
use oxidir_engine::model::{
    DirectoryEntry, EntryPage, EntryUpdate, GroupEntry, GroupKind, NewEntry, NewGroup,
    PageCursor, ScopeFilter, ServiceHealth, UserEntry,
};
use oxidir_engine::session::Credentials;

pub const BASE: &str = "dc=example,dc=com";

pub fn user_dn(uid: &str) -> Dn {
    Dn::parse(&format!("uid={uid},ou=people,{BASE}"))
}

pub fn group_dn(name: &str) -> Dn {
    Dn::parse(&format!("cn={name},ou=groups,{BASE}"))
}

#[derive(Default)]
pub struct Counters {
    pub tree: AtomicUsize,
    pub list: AtomicUsize,
    pub groups: AtomicUsize,
    pub members: AtomicUsize,
    pub search: AtomicUsize,
}

impl Counters {
    pub fn reset(&self) {
        self.tree.store(0, Ordering::SeqCst);
        self.list.store(0, Ordering::SeqCst);
        self.groups.store(0, Ordering::SeqCst);
        self.members.store(0, Ordering::SeqCst);
        self.search.store(0, Ordering::SeqCst);
    }
}

struct DirState {
    users: Vec<UserEntry>,
    groups: Vec<GroupEntry>,
    members: HashMap<String, Vec<Dn>>,
    containers: Vec<Dn>,
}

struct TreeReply {
    containers: Vec<Dn>,
    gate: Option<oneshot::Receiver<()>>,
}

pub struct FakeDirectory {
    state: Mutex<DirState>,
    pub counts: Counters,
    tree_replies: Mutex<VecDeque<TreeReply>>,
    list_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    fail_next_remove: AtomicBool,
    reject_lists: AtomicBool,
}

impl FakeDirectory {
    pub fn new() -> Arc<FakeDirectory> {
        Arc::new(FakeDirectory {
            state: Mutex::new(DirState {
                users: Vec::new(),
                groups: Vec::new(),
                members: HashMap::new(),
                containers: vec![
                    Dn::parse(BASE),
                    Dn::parse(&format!("ou=people,{BASE}")),
                    Dn::parse(&format!("ou=groups,{BASE}")),
                ],
            }),
            counts: Counters::default(),
            tree_replies: Mutex::new(VecDeque::new()),
            list_gates: Mutex::new(VecDeque::new()),
            fail_next_remove: AtomicBool::new(false),
            reject_lists: AtomicBool::new(false),
        })
    }

    pub fn seed_user(&self, uid: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.users.push(UserEntry {
            dn: user_dn(uid),
            uid: uid.to_string(),
            name: name.to_string(),
            email: Some(format!("{uid}@example.com")),
            title: None,
        });
    }

    pub fn seed_users(&self, count: usize) {
        for i in 0..count {
            self.seed_user(&format!("user{i:02}"), &format!("User {i:02}"));
        }
    }

    pub fn seed_group(&self, name: &str, kind: GroupKind, gid: Option<u32>, members: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state.groups.push(GroupEntry {
            dn: group_dn(name),
            name: name.to_string(),
            kind,
            gid,
            description: None,
            member_count: members.len() as u32,
        });
        state
            .members
            .insert(name.to_string(), members.iter().map(|m| user_dn(m)).collect());
    }

    /// Queue a canned `container_tree` reply, optionally held until the
    /// returned sender fires.
    pub fn queue_tree_reply(&self, containers: &[&str], gated: bool) -> Option<oneshot::Sender<()>> {
        let (gate, release) = if gated {
            let (tx, rx) = oneshot::channel();
            (Some(rx), Some(tx))
        } else {
            (None, None)
        };
        self.tree_replies.lock().unwrap().push_back(TreeReply {
            containers: containers.iter().map(|c| Dn::parse(c)).collect(),
            gate,
        });
        release
    }

    /// Hold the next `list_entries` call until the returned sender fires.
    pub fn gate_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().unwrap().push_back(rx);
        tx
    }

    /// Make the next `remove_member` call fail without applying.
    pub fn fail_next_remove(&self) {
        self.fail_next_remove.store(true, Ordering::SeqCst);
    }

    /// Reject every subsequent `list_entries` call as unauthenticated.
    pub fn reject_lists_as_unauthenticated(&self) {
        self.reject_lists.store(true, Ordering::SeqCst);
    }

    fn scoped_users(state: &DirState, scope: &ScopeFilter) -> Vec<UserEntry> {
        state
            .users
            .iter()
            .filter(|u| match scope.base() {
                Some(base) => u.dn.is_descendant_of(base),
                None => true,
            })
            .cloned()
            .collect()
    }

    fn member_count(state: &DirState, name: &str) -> u32 {
        state.members.get(name).map_or(0, |m| m.len() as u32)
    }
}

#[async_trait]
impl DirectoryFacade for FakeDirectory {
    async fn authenticate(&self, username: &str, password: &str) -> EngineResult<Credentials> {
        if username == "admin" && password == "secret" {
            Ok(Credentials::bearer("fake-token"))
        } else {
            Err(EngineError::authentication("invalid credentials"))
        }
    }

    async fn list_entries(
        &self,
        scope: &ScopeFilter,
        page_size: u32,
        cursor: Option<&PageCursor>,
    ) -> EngineResult<EntryPage> {
        self.counts.list.fetch_add(1, Ordering::SeqCst);
        let gate = self.list_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.reject_lists.load(Ordering::SeqCst) {
            return Err(EngineError::authentication("token rejected"));
        }

        let state = self.state.lock().unwrap();
        let matching = Self::scoped_users(&state, scope);
        let offset: usize = cursor.map_or(0, |c| c.token().parse().unwrap());
        let end = (offset + page_size as usize).min(matching.len());
        let entries = matching[offset..end]
            .iter()
            .cloned()
            .map(DirectoryEntry::User)
            .collect();
        let next_cursor = (end < matching.len())
            .then(|| PageCursor::new(end.to_string(), scope.clone(), page_size));
        Ok(EntryPage {
            entries,
            next_cursor,
        })
    }

    async fn get_entry(&self, uid: &str) -> EngineResult<UserEntry> {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.uid == uid)
            .cloned()
            .ok_or_else(|| EngineError::not_found(uid))
    }

    async fn create_entry(&self, entry: &NewEntry) -> EngineResult<UserEntry> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.uid == entry.uid) {
            return Err(EngineError::validation("entryAlreadyExists"));
        }
        let parent = entry
            .parent
            .clone()
            .unwrap_or_else(|| Dn::parse(&format!("ou=people,{BASE}")));
        let created = UserEntry {
            dn: Dn::parse(&format!("uid={},{parent}", entry.uid)),
            uid: entry.uid.clone(),
            name: entry.name.clone(),
            email: entry.email.clone(),
            title: entry.title.clone(),
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn update_entry(&self, uid: &str, update: &EntryUpdate) -> EngineResult<UserEntry> {
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.uid == uid)
            .ok_or_else(|| EngineError::not_found(uid))?;
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(email) = &update.email {
            user.email = Some(email.clone());
        }
        if let Some(title) = &update.title {
            user.title = Some(title.clone());
        }
        Ok(user.clone())
    }

    async fn disable_entry(&self, uid: &str) -> EngineResult<()> {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.uid == uid)
            .map(|_| ())
            .ok_or_else(|| EngineError::not_found(uid))
    }

    async fn delete_entry(&self, dn: &Dn) -> EngineResult<()> {
        let mut state = self.state.lock().unwrap();
        let users_before = state.users.len();
        state.users.retain(|u| u.dn != *dn);
        if state.users.len() != users_before {
            return Ok(());
        }
        let groups_before = state.groups.len();
        state.groups.retain(|g| g.dn != *dn);
        if state.groups.len() != groups_before {
            return Ok(());
        }
        Err(EngineError::not_found(dn.to_string()))
    }

    async fn list_groups(&self) -> EngineResult<Vec<GroupEntry>> {
        self.counts.groups.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(state
            .groups
            .iter()
            .map(|g| GroupEntry {
                member_count: Self::member_count(&state, &g.name),
                ..g.clone()
            })
            .collect())
    }

    async fn create_group(&self, group: &NewGroup) -> EngineResult<()> {
        if group.kind.requires_gid() && group.gid.is_none() {
            return Err(EngineError::validation("posix group requires a gidNumber"));
        }
        let mut state = self.state.lock().unwrap();
        if state.groups.iter().any(|g| g.name == group.name) {
            return Err(EngineError::validation("group already exists"));
        }
        state.groups.push(GroupEntry {
            dn: group_dn(&group.name),
            name: group.name.clone(),
            kind: group.kind,
            gid: group.gid,
            description: group.description.clone(),
            member_count: 0,
        });
        state.members.insert(group.name.clone(), Vec::new());
        Ok(())
    }

    async fn delete_group(&self, name: &str) -> EngineResult<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.groups.len();
        state.groups.retain(|g| g.name != name);
        if state.groups.len() == before {
            return Err(EngineError::not_found(name));
        }
        state.members.remove(name);
        Ok(())
    }

    async fn group_members(&self, group: &str) -> EngineResult<Vec<Dn>> {
        self.counts.members.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        state
            .members
            .get(group)
            .cloned()
            .ok_or_else(|| EngineError::not_found(group))
    }

    async fn entry_groups(&self, uid: &str) -> EngineResult<Vec<String>> {
        let dn = user_dn(uid);
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .iter()
            .filter(|(_, members)| members.contains(&dn))
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn add_member(
        &self,
        group_dn: &Dn,
        member_dn: &Dn,
        _member_uid: &str,
    ) -> EngineResult<()> {
        let name = group_dn.leaf_value("cn");
        let mut state = self.state.lock().unwrap();
        let members = state
            .members
            .get_mut(&name)
            .ok_or_else(|| EngineError::not_found(name.clone()))?;
        if members.contains(member_dn) {
            return Err(EngineError::validation("already a member"));
        }
        members.push(member_dn.clone());
        Ok(())
    }

    async fn remove_member(
        &self,
        group_dn: &Dn,
        member_dn: &Dn,
        _member_uid: &str,
    ) -> EngineResult<()> {
        if self.fail_next_remove.swap(false, Ordering::SeqCst) {
            return Err(EngineError::transport("connection reset"));
        }
        let name = group_dn.leaf_value("cn");
        let mut state = self.state.lock().unwrap();
        let members = state
            .members
            .get_mut(&name)
            .ok_or_else(|| EngineError::not_found(name.clone()))?;
        let before = members.len();
        members.retain(|m| m != member_dn);
        if members.len() == before {
            return Err(EngineError::validation("not a member of the group"));
        }
        Ok(())
    }

    async fn container_tree(&self) -> EngineResult<Vec<Dn>> {
        self.counts.tree.fetch_add(1, Ordering::SeqCst);
        let reply = self.tree_replies.lock().unwrap().pop_front();
        match reply {
            Some(reply) => {
                if let Some(gate) = reply.gate {
                    let _ = gate.await;
                }
                Ok(reply.containers)
            }
            None => Ok(self.state.lock().unwrap().containers.clone()),
        }
    }

    async fn search_entries(&self, query: &str) -> EngineResult<Vec<UserEntry>> {
        self.counts.search.fetch_add(1, Ordering::SeqCst);
        let needle = query.to_ascii_lowercase();
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .filter(|u| {
                u.uid.to_ascii_lowercase().contains(&needle)
                    || u.name.to_ascii_lowercase().contains(&needle)
                    || u.email
                        .as_deref()
                        .is_some_and(|e| e.to_ascii_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn search_groups(&self, name: &str) -> EngineResult<Vec<GroupEntry>> {
        let needle = name.to_ascii_lowercase();
        let state = self.state.lock().unwrap();
        Ok(state
            .groups
            .iter()
            .filter(|g| g.name.to_ascii_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn health(&self) -> EngineResult<ServiceHealth> {
        Ok(ServiceHealth {
            status: "ok".to_string(),
        })
    }
}
