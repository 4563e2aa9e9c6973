//! Secure credential storage for the oxidir CLI

mod file;
mod store;

pub use file::FileCredentialStore;
pub use store::{get_credential_store, CredentialStore};
