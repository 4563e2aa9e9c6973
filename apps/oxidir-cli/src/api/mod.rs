//! REST facade client for the directory service

mod auth;
mod client;
mod directory;
mod facade;
mod groups;
mod users;

pub use client::RestDirectory;
