//! Networking modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` issues the HTTP calls and `types` defines the wire schema shared by
//! the API client, the user store, and the CLI.

pub mod api;
pub mod types;
