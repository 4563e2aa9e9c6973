//! Engine data model.
//!
//! Entries are tagged variants with a fixed schema per variant rather than
//! open-ended attribute bags, so each call site states which attributes it
//! actually relies on.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::dn::Dn;

/// Scope restriction for entry retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeFilter {
    /// No restriction: the whole directory the session can see.
    Everywhere,
    /// Entries at or below the given container.
    Under(Dn),
}

impl ScopeFilter {
    /// Scope with no restriction.
    pub fn everywhere() -> Self {
        ScopeFilter::Everywhere
    }

    /// Scope restricted to one container subtree.
    pub fn under(base: Dn) -> Self {
        ScopeFilter::Under(base)
    }

    /// The base container, if restricted.
    pub fn base(&self) -> Option<&Dn> {
        match self {
            ScopeFilter::Everywhere => None,
            ScopeFilter::Under(dn) => Some(dn),
        }
    }

    /// Whether this scope imposes no restriction.
    pub fn is_everywhere(&self) -> bool {
        matches!(self, ScopeFilter::Everywhere)
    }
}

impl fmt::Display for ScopeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeFilter::Everywhere => write!(f, "everywhere"),
            ScopeFilter::Under(dn) => write!(f, "{dn}"),
        }
    }
}

/// Opaque continuation token plus the scope and page size it was issued for.
///
/// A cursor is valid only for the exact `(scope, page_size)` pair that
/// issued it. Reusing one across a scope change is a caller programming
/// error, asserted rather than surfaced as a runtime error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    token: String,
    scope: ScopeFilter,
    page_size: u32,
}

impl PageCursor {
    /// Wrap a server-issued continuation token.
    pub fn new(token: impl Into<String>, scope: ScopeFilter, page_size: u32) -> Self {
        PageCursor {
            token: token.into(),
            scope,
            page_size,
        }
    }

    /// The raw server token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The scope this cursor was issued under.
    pub fn scope(&self) -> &ScopeFilter {
        &self.scope
    }

    /// The page size this cursor was issued under.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Assert that this cursor belongs to the given `(scope, page_size)`.
    ///
    /// # Panics
    ///
    /// Panics when the pair does not match the one the cursor was issued
    /// under.
    pub fn ensure_matches(&self, scope: &ScopeFilter, page_size: u32) {
        assert!(
            self.scope == *scope && self.page_size == page_size,
            "page cursor issued for ({}, {}) used with ({}, {})",
            self.scope,
            self.page_size,
            scope,
            page_size,
        );
    }
}

/// One page of entries plus the continuation cursor, if more follow.
#[derive(Debug, Clone)]
pub struct EntryPage {
    pub entries: Vec<DirectoryEntry>,
    pub next_cursor: Option<PageCursor>,
}

/// A user or group record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectoryEntry {
    User(UserEntry),
    Group(GroupEntry),
}

impl DirectoryEntry {
    /// The entry's unique key.
    pub fn dn(&self) -> &Dn {
        match self {
            DirectoryEntry::User(user) => &user.dn,
            DirectoryEntry::Group(group) => &group.dn,
        }
    }

    /// Login name for users, group name for groups.
    pub fn identifier(&self) -> &str {
        match self {
            DirectoryEntry::User(user) => &user.uid,
            DirectoryEntry::Group(group) => &group.name,
        }
    }
}

/// A user entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserEntry {
    pub dn: Dn,
    pub uid: String,
    /// Full name (`cn`).
    pub name: String,
    pub email: Option<String>,
    /// Role or job title.
    pub title: Option<String>,
}

/// A group entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEntry {
    pub dn: Dn,
    pub name: String,
    pub kind: GroupKind,
    /// Numeric group id; present exactly when `kind` requires one.
    pub gid: Option<u32>,
    pub description: Option<String>,
    pub member_count: u32,
}

/// Group flavor in the directory schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupKind {
    #[serde(rename = "posix")]
    Posix,
    #[serde(rename = "groupOfNames")]
    GroupOfNames,
}

impl GroupKind {
    /// Whether creating a group of this kind requires a numeric group id.
    pub fn requires_gid(&self) -> bool {
        matches!(self, GroupKind::Posix)
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::Posix => write!(f, "posix"),
            GroupKind::GroupOfNames => write!(f, "groupOfNames"),
        }
    }
}

impl FromStr for GroupKind {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "posix" | "posixgroup" => Ok(GroupKind::Posix),
            "groupofnames" => Ok(GroupKind::GroupOfNames),
            other => Err(format!(
                "unknown group kind '{other}' (expected 'posix' or 'groupOfNames')"
            )),
        }
    }
}

/// Attributes for a new user entry.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub uid: String,
    /// Full name (`cn`), required by the directory schema.
    pub name: String,
    /// Surname (`sn`), required by the directory schema.
    pub surname: String,
    pub email: Option<String>,
    pub title: Option<String>,
    pub password: String,
    /// Container to create the entry under; the server's default user
    /// container when absent.
    pub parent: Option<Dn>,
}

/// Partial attribute changes for an existing user entry.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub password: Option<String>,
}

impl EntryUpdate {
    /// Whether no change is requested.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.title.is_none()
            && self.password.is_none()
    }
}

/// Attributes for a new group.
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub name: String,
    pub kind: GroupKind,
    /// Required when `kind.requires_gid()`; the server rejects the request
    /// otherwise.
    pub gid: Option<u32>,
    pub description: Option<String>,
}

/// Façade health report.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub status: String,
}

impl ServiceHealth {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Result of committing a stream refresh.
///
/// `Stale` means the response was superseded by a more recently issued
/// request and was discarded without touching held state. It is an expected
/// outcome, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Committed,
    Stale,
}

impl RefreshOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, RefreshOutcome::Committed)
    }
}

/// One container in the organizational hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub dn: Dn,
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Leaf node for a container DN, label derived from the leading
    /// component.
    pub fn new(dn: Dn) -> Self {
        let label = dn.label();
        TreeNode {
            dn,
            label,
            children: Vec::new(),
        }
    }

    /// Depth-first lookup by DN.
    pub fn find(&self, dn: &Dn) -> Option<&TreeNode> {
        if self.dn == *dn {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(dn))
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeNode::node_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_variants_expose_dn_and_identifier() {
        let user = DirectoryEntry::User(UserEntry {
            dn: Dn::parse("uid=alice,ou=people,dc=example"),
            uid: "alice".to_string(),
            name: "Alice Liddell".to_string(),
            email: Some("alice@example.com".to_string()),
            title: None,
        });
        assert_eq!(user.identifier(), "alice");
        assert_eq!(user.dn().to_string(), "uid=alice,ou=people,dc=example");

        let group = DirectoryEntry::Group(GroupEntry {
            dn: Dn::parse("cn=admins,ou=groups,dc=example"),
            name: "admins".to_string(),
            kind: GroupKind::GroupOfNames,
            gid: None,
            description: None,
            member_count: 3,
        });
        assert_eq!(group.identifier(), "admins");
    }

    #[test]
    fn group_kind_parses_common_spellings() {
        assert_eq!("posix".parse::<GroupKind>().unwrap(), GroupKind::Posix);
        assert_eq!(
            "groupOfNames".parse::<GroupKind>().unwrap(),
            GroupKind::GroupOfNames
        );
        assert_eq!(
            "group-of-names".parse::<GroupKind>().unwrap(),
            GroupKind::GroupOfNames
        );
        assert!("circle".parse::<GroupKind>().is_err());
    }

    #[test]
    fn posix_groups_require_a_gid() {
        assert!(GroupKind::Posix.requires_gid());
        assert!(!GroupKind::GroupOfNames.requires_gid());
    }

    #[test]
    fn cursor_accepts_its_issuing_pair() {
        let scope = ScopeFilter::under(Dn::parse("ou=people,dc=example"));
        let cursor = PageCursor::new("abc123", scope.clone(), 25);
        cursor.ensure_matches(&scope, 25);
    }

    #[test]
    #[should_panic(expected = "page cursor issued for")]
    fn cursor_rejects_a_different_scope() {
        let cursor = PageCursor::new(
            "abc123",
            ScopeFilter::under(Dn::parse("ou=people,dc=example")),
            25,
        );
        cursor.ensure_matches(&ScopeFilter::everywhere(), 25);
    }

    #[test]
    #[should_panic(expected = "page cursor issued for")]
    fn cursor_rejects_a_different_page_size() {
        let scope = ScopeFilter::everywhere();
        let cursor = PageCursor::new("abc123", scope.clone(), 25);
        cursor.ensure_matches(&scope, 50);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(EntryUpdate::default().is_empty());
        let update = EntryUpdate {
            title: Some("Lead Architect".to_string()),
            ..EntryUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn tree_node_find_walks_the_subtree() {
        let mut root = TreeNode::new(Dn::parse("dc=example"));
        let mut people = TreeNode::new(Dn::parse("ou=people,dc=example"));
        people
            .children
            .push(TreeNode::new(Dn::parse("ou=eng,ou=people,dc=example")));
        root.children.push(people);

        assert_eq!(root.node_count(), 3);
        let hit = root.find(&Dn::parse("ou=eng,ou=people,dc=example"));
        assert_eq!(hit.map(|n| n.label.as_str()), Some("eng"));
    }
}
