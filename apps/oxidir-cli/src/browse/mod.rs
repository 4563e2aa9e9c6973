//! Interactive browse shell for the directory
//!
//! Hosts the live engine state for a browsing session: the consistency
//! coordinator with its tree, list, and membership views, plus the idle
//! guard that ends the session after inactivity.

mod executor;
mod prompt;
mod session;

pub use executor::{CommandExecutor, ExecuteResult};
pub use prompt::Prompt;
pub use session::BrowseSession;
