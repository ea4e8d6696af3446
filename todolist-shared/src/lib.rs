//! # Todolist Shared Library
//!
//! This crate contains the domain model and persistence layer used by the
//! Todolist API server.
//!
//! ## Module Organization
//!
//! - `models`: Entities (users, tasks, tags), request payloads and their SQL
//! - `store`: The `TodoStore` persistence gateway and its PostgreSQL implementation
//! - `db`: Connection pool and migration management

pub mod db;
pub mod models;
pub mod store;

/// Current version of the Todolist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
