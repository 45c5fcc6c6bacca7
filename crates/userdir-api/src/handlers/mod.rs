//! Request handlers for the userdir REST API.

pub mod users;
