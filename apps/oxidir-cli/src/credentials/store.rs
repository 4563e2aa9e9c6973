//! Credential storage abstraction

use crate::config::ConfigPaths;
use crate::credentials::FileCredentialStore;
use crate::error::CliResult;
use oxidir_engine::session::Credentials;

/// Trait for credential storage backends
pub trait CredentialStore: Send + Sync {
    /// Store credentials
    fn store(&self, credentials: &Credentials) -> CliResult<()>;

    /// Load credentials
    fn load(&self) -> CliResult<Option<Credentials>>;

    /// Delete stored credentials
    fn delete(&self) -> CliResult<()>;

    /// Check if credentials exist
    fn exists(&self) -> bool;
}

/// Get the credential store for the current platform
pub fn get_credential_store(paths: &ConfigPaths) -> Box<dyn CredentialStore> {
    Box::new(FileCredentialStore::new(paths.credentials_file.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_credential_store() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::from_base(temp_dir.path());

        let store = get_credential_store(&paths);
        assert!(!store.exists());
    }
}
