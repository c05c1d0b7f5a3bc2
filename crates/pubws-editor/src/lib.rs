//! Format-preserving editing of pubspec-style YAML documents
//!
//! This crate provides the document layer the rest of pubws is built on:
//! a parser for the block-YAML subset that package manifests use, and an
//! editor that applies point edits (get/set/remove/append) addressed by
//! key paths. Every mutation is a local text splice against the original
//! source, so formatting, comments, and key ordering outside the edited
//! span survive byte-for-byte. Serializing a document with no staged
//! edits returns exactly the text it was parsed from.
//!
//! The editor performs no I/O: text in at construction, text out via
//! [`YamlDocument::text`].

pub mod editor;
pub mod errors;
pub mod node;
pub mod parser;
pub mod path;

pub use editor::{YamlDocument, YamlValue};
pub use errors::EditError;
pub use node::{MapEntry, Mapping, Node, Scalar, SeqItem, Sequence};
pub use path::{KeyPath, Segment};
