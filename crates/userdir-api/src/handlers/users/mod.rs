//! User endpoints
//!
//! Provides REST API endpoints for reading the user directory.

pub mod get;
pub mod list;
