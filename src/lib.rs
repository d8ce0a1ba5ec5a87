//! # seatrack
//!
//! Client for the vessel-tracking and ocean-data dashboard backend.
//!
//! This crate contains the REST API client, the persisted user store, the
//! route table with its navigation guard, and the session glue that ties
//! them together. The `seatrack` binary drives the same pieces from a
//! terminal.

pub mod app;
pub mod config;
pub mod net;
pub mod router;
pub mod state;
pub mod util;
