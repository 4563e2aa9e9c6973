//! Shared helpers for oxidir CLI integration tests

use oxidir_cli::api::RestDirectory;
use oxidir_cli::config::Config;
use oxidir_engine::session::{Credentials, SessionContext};
use wiremock::MockServer;

/// A mock directory server plus the config and session wired to it
pub struct TestContext {
    pub server: MockServer,
    pub config: Config,
    pub session: SessionContext,
}

impl TestContext {
    /// Start a mock server with a test bearer token installed in the session
    pub async fn new() -> Self {
        let ctx = Self::anonymous().await;
        ctx.session.install(Credentials::bearer("test-token")).await;
        ctx
    }

    /// Start a mock server with no credential installed
    pub async fn anonymous() -> Self {
        let server = MockServer::start().await;
        let config = Config {
            server_url: server.uri(),
            ..Config::default()
        };

        TestContext {
            server,
            config,
            session: SessionContext::new(),
        }
    }

    /// Build a REST client pointed at the mock server
    pub fn client(&self) -> RestDirectory {
        RestDirectory::new(self.config.clone(), self.session.clone())
            .expect("client construction against the mock server should succeed")
    }
}
