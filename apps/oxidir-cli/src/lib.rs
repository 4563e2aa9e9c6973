//! oxidir CLI library
//!
//! This library exposes internal modules for integration testing.
//! The main CLI binary is still in main.rs.

// Re-export error types for testing
pub mod error;

// Re-export config module for testing
pub mod config;

// Re-export the wire client and its request/response models for testing
pub mod api;
pub mod models;

// Re-export credential storage for testing
pub mod credentials;
