//! Parsed document tree with source spans
//!
//! Every node records the byte range it occupies in the source text, so
//! the editor can splice replacements in place instead of regenerating
//! the document from the tree.

use std::ops::Range;

/// A byte range into the source text.
pub type Span = Range<usize>;

/// One parsed value: a block mapping, a block sequence, or a scalar.
#[derive(Debug, Clone)]
pub enum Node {
    Mapping(Mapping),
    Sequence(Sequence),
    Scalar(Scalar),
}

impl Node {
    /// Byte range of this node's content in the source text.
    pub fn span(&self) -> Span {
        match self {
            Node::Mapping(m) => m.span.clone(),
            Node::Sequence(s) => s.span.clone(),
            Node::Scalar(s) => s.span.clone(),
        }
    }

    /// Column (space count) this node's lines start at.
    ///
    /// Scalars sit on their parent's line and report the parent entry's
    /// indent via the parser; only block nodes use this for re-indenting.
    pub fn indent(&self) -> usize {
        match self {
            Node::Mapping(m) => m.indent,
            Node::Sequence(s) => s.indent,
            Node::Scalar(_) => 0,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

/// A scalar value. `value` is the unquoted form; `span` covers the raw
/// source text including quotes but excluding any trailing comment.
#[derive(Debug, Clone)]
pub struct Scalar {
    pub value: String,
    pub span: Span,
}

/// A block mapping: one `key: value` entry per line at a shared indent.
#[derive(Debug, Clone)]
pub struct Mapping {
    pub entries: Vec<MapEntry>,
    pub indent: usize,
    pub span: Span,
}

impl Mapping {
    pub fn get(&self, key: &str) -> Option<&MapEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// One mapping entry, spanning from the start of its key line to the end
/// of its value block (exclusive of trailing blank/comment lines).
#[derive(Debug, Clone)]
pub struct MapEntry {
    pub key: String,
    pub indent: usize,
    /// Byte offset of the start of the key's line.
    pub line_start: usize,
    /// Byte offset just past the `:` separator.
    pub colon_end: usize,
    /// `None` for a `key:` line with no value (present-but-empty).
    pub value: Option<Node>,
    /// Byte offset one past the entry's last line (including its newline).
    pub end: usize,
}

/// A block sequence: `- item` lines at a shared indent.
#[derive(Debug, Clone)]
pub struct Sequence {
    pub items: Vec<SeqItem>,
    pub indent: usize,
    pub span: Span,
}

/// One sequence item.
#[derive(Debug, Clone)]
pub struct SeqItem {
    /// Byte offset of the start of the item's line.
    pub line_start: usize,
    /// Byte offset just past the leading `-`.
    pub dash_end: usize,
    /// `None` for a bare `-` with no value.
    pub value: Option<Node>,
    /// Byte offset one past the item's last line (including its newline).
    pub end: usize,
}
