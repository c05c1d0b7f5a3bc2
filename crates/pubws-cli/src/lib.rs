//! pubws library - expose modules for testing
//!
//! The binary's command handlers live here so integration tests can
//! exercise them directly.

pub mod commands;
pub mod common;

pub use common::GlobalOpts;
