//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate environment concerns (disk, browser storage) from
//! the user store and router so those stay testable.

pub mod storage;
