//! Client-side application state.

pub mod user;
