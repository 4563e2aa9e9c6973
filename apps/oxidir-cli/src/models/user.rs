//! User wire models and their engine mappings

use oxidir_engine::dn::Dn;
use oxidir_engine::model::{EntryUpdate, NewEntry, UserEntry};
use serde::{Deserialize, Serialize};

/// User record as returned by the directory facade
#[derive(Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub dn: String,
    pub uid: String,
    pub cn: String,
    #[serde(default)]
    pub mail: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl UserRecord {
    /// Convert into the engine entry model
    pub fn into_entry(self) -> UserEntry {
        UserEntry {
            dn: Dn::parse(&self.dn),
            uid: self.uid,
            name: self.cn,
            email: normalize_attr(self.mail),
            title: normalize_attr(self.title),
        }
    }
}

/// Drop placeholder attribute values the server uses for absent fields
fn normalize_attr(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "N/A")
}

/// Paged user list response
#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub results: Vec<UserRecord>,
    #[serde(default)]
    pub next_cookie: Option<String>,
}

/// Attribute body for POST /api/users
#[derive(Debug, Serialize)]
pub struct CreateUserRequest {
    pub cn: String,
    pub sn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "userPassword")]
    pub user_password: String,
}

impl CreateUserRequest {
    /// Build the attribute body from the engine request model
    pub fn from_new_entry(entry: &NewEntry) -> Self {
        Self {
            cn: entry.name.clone(),
            sn: entry.surname.clone(),
            mail: entry.email.clone(),
            title: entry.title.clone(),
            user_password: entry.password.clone(),
        }
    }
}

/// Attribute replacements for PATCH /api/users/{uid}
#[derive(Debug, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "userPassword", skip_serializing_if = "Option::is_none")]
    pub user_password: Option<String>,
}

impl UpdateUserRequest {
    /// Build the replacement set from the engine update model
    pub fn from_update(update: &EntryUpdate) -> Self {
        Self {
            cn: update.name.clone(),
            mail: update.email.clone(),
            title: update.title.clone(),
            user_password: update.password.clone(),
        }
    }
}
