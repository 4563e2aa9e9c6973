//! Configuration management for the oxidir CLI

mod paths;
mod settings;

pub use paths::ConfigPaths;
pub use settings::Config;
