//! Command handlers for the pubws CLI

pub mod merge;
pub mod migrate;
pub mod pin;
pub mod prune;
