//! Splice-based document editor
//!
//! [`YamlDocument`] holds the document text plus a parsed view with byte
//! spans. Reads navigate the parsed tree; writes are computed as a single
//! local text splice, applied, and the tree is re-parsed so subsequent
//! reads observe every edit made in the session. Content outside an
//! edited span is never touched.

use crate::errors::EditError;
use crate::node::{MapEntry, Node, SeqItem, Span};
use crate::parser;
use crate::path::{KeyPath, Segment};

/// A value to write into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlValue {
    /// A single-line scalar (unquoted form; quoting is applied on write).
    Scalar(String),
    /// A nested block captured as dedented lines, relative indentation
    /// preserved. Written under its key with the target's indentation.
    Block(Vec<String>),
}

impl YamlValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        YamlValue::Scalar(value.into())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            YamlValue::Scalar(s) => Some(s),
            YamlValue::Block(_) => None,
        }
    }
}

/// Where a path resolved inside the document.
enum Target<'a> {
    Node(&'a Node),
    /// A `key:` entry with no value.
    NullEntry { indent: usize, end: usize },
    /// A bare `-` item with no value.
    NullItem,
}

/// One structured document, edited in place.
pub struct YamlDocument {
    original: String,
    text: String,
    root: Option<Node>,
}

impl YamlDocument {
    /// Parse a document from its full text.
    pub fn parse(text: impl Into<String>) -> Result<Self, EditError> {
        let text = text.into();
        let root = parser::parse(&text)?;
        Ok(YamlDocument {
            original: text.clone(),
            text,
            root,
        })
    }

    /// Current serialized form. Byte-identical to the construction text
    /// when no edit has been applied; safe to call repeatedly.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether any edit changed the document since construction.
    pub fn is_modified(&self) -> bool {
        self.text != self.original
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Resolve a path to its node. Absent paths and `key:` entries with
    /// no value both return `None`; use [`contains`](Self::contains) to
    /// distinguish present-but-empty from absent.
    pub fn get(&self, path: &KeyPath) -> Option<&Node> {
        match self.locate(path)? {
            Target::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Resolve a path to a scalar value.
    pub fn get_scalar(&self, path: &KeyPath) -> Option<&str> {
        self.get(path)?.as_scalar().map(|s| s.value.as_str())
    }

    /// Whether the path exists at all, including empty `key:` entries.
    pub fn contains(&self, path: &KeyPath) -> bool {
        self.locate(path).is_some()
    }

    /// Capture the value at a path in a form that can be written into
    /// another document (or elsewhere in this one).
    pub fn value_of(&self, path: &KeyPath) -> Option<YamlValue> {
        match self.locate(path)? {
            Target::Node(node) => Some(self.capture(node)),
            Target::NullEntry { .. } | Target::NullItem => Some(YamlValue::Scalar(String::new())),
        }
    }

    /// List a mapping's entries as `(key, value)` pairs in declared order.
    ///
    /// `Ok(None)` when the path is absent, `Ok(Some(vec![]))` when the
    /// entry exists but is empty, and a structure error when the path
    /// resolves to a scalar or sequence.
    pub fn entries(&self, path: &KeyPath) -> Result<Option<Vec<(String, YamlValue)>>, EditError> {
        match self.locate(path) {
            None => Ok(None),
            Some(Target::NullEntry { .. }) => Ok(Some(Vec::new())),
            Some(Target::Node(Node::Mapping(m))) => Ok(Some(
                m.entries
                    .iter()
                    .map(|entry| {
                        let value = match &entry.value {
                            Some(node) => self.capture(node),
                            None => YamlValue::Scalar(String::new()),
                        };
                        (entry.key.clone(), value)
                    })
                    .collect(),
            )),
            Some(_) => Err(EditError::structure(
                path.to_string(),
                "expected a mapping",
            )),
        }
    }

    /// List a sequence's scalar items.
    pub fn list_items(&self, path: &KeyPath) -> Result<Option<Vec<String>>, EditError> {
        match self.locate(path) {
            None => Ok(None),
            Some(Target::NullEntry { .. }) => Ok(Some(Vec::new())),
            Some(Target::Node(Node::Sequence(seq))) => Ok(Some(
                seq.items
                    .iter()
                    .filter_map(|item| match &item.value {
                        Some(Node::Scalar(s)) => Some(s.value.clone()),
                        _ => None,
                    })
                    .collect(),
            )),
            Some(_) => Err(EditError::NotASequence {
                path: path.to_string(),
            }),
        }
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Set the value at a path, creating intermediate mappings as needed.
    /// Sibling content is not touched.
    pub fn set(&mut self, path: &KeyPath, value: &YamlValue) -> Result<(), EditError> {
        let (span, replacement) = self.plan_set(path, value)?;
        self.apply(span, replacement)
    }

    /// Convenience for setting a scalar.
    pub fn set_scalar(&mut self, path: &KeyPath, value: &str) -> Result<(), EditError> {
        self.set(path, &YamlValue::scalar(value))
    }

    /// Delete the entry or item at a path, including its whole value
    /// block. Returns `false` when the path is absent. Parents that
    /// become empty are left in place; cleanup is the caller's call.
    pub fn remove(&mut self, path: &KeyPath) -> Result<bool, EditError> {
        let Some((last, parent_path)) = split_last(path) else {
            return Err(EditError::structure("", "cannot remove the document root"));
        };
        let span = match self.locate(&parent_path) {
            None | Some(Target::NullEntry { .. }) | Some(Target::NullItem) => return Ok(false),
            Some(Target::Node(Node::Mapping(m))) => {
                let Segment::Key(key) = last else {
                    return Err(EditError::structure(
                        path.to_string(),
                        "cannot index into a mapping",
                    ));
                };
                match m.get(key) {
                    Some(entry) => entry.line_start..entry.end,
                    None => return Ok(false),
                }
            }
            Some(Target::Node(Node::Sequence(seq))) => {
                let Segment::Index(index) = last else {
                    return Err(EditError::structure(
                        path.to_string(),
                        "cannot key into a sequence",
                    ));
                };
                match seq.items.get(*index) {
                    Some(item) => item.line_start..item.end,
                    None => return Ok(false),
                }
            }
            Some(Target::Node(Node::Scalar(_))) => {
                return Err(EditError::structure(
                    path.to_string(),
                    "parent is a scalar, not a container",
                ));
            }
        };
        self.apply(span, String::new())?;
        Ok(true)
    }

    /// Append a scalar to the sequence at a path, creating the sequence
    /// (and intermediate mappings) when absent. Fails when the path holds
    /// a value that is not a sequence.
    pub fn append(&mut self, path: &KeyPath, value: &str) -> Result<(), EditError> {
        match self.locate(path) {
            Some(Target::Node(Node::Sequence(seq))) => {
                let at = seq.span.end;
                let line = format!(
                    "{}{}- {}\n",
                    self.newline_prefix(at),
                    " ".repeat(seq.indent),
                    render_scalar(value)
                );
                self.apply(at..at, line)
            }
            Some(Target::NullEntry { indent, end, .. }) => {
                let line = format!(
                    "{}{}- {}\n",
                    self.newline_prefix(end),
                    " ".repeat(indent + 2),
                    render_scalar(value)
                );
                self.apply(end..end, line)
            }
            Some(_) => Err(EditError::NotASequence {
                path: path.to_string(),
            }),
            None => self.set(
                path,
                &YamlValue::Block(vec![format!("- {}", render_scalar(value))]),
            ),
        }
    }

    /// Insert a top-level `key: value` entry, positioned immediately
    /// after `after` when that key exists, otherwise at document end.
    /// No-op returning `false` when `key` is already present.
    pub fn insert_top_level(
        &mut self,
        key: &str,
        value: Option<&str>,
        after: Option<&str>,
    ) -> Result<bool, EditError> {
        let line_body = match value {
            Some(v) => format!("{}: {}", render_key(key), render_scalar(v)),
            None => format!("{}:", render_key(key)),
        };
        let (at, indent) = match &self.root {
            None => (self.text.len(), 0),
            Some(Node::Mapping(m)) => {
                if m.contains_key(key) {
                    return Ok(false);
                }
                let at = after
                    .and_then(|anchor| m.get(anchor))
                    .map_or(self.text.len(), |entry| entry.end);
                (at, m.indent)
            }
            Some(_) => {
                return Err(EditError::structure(key, "document root is not a mapping"));
            }
        };
        let line = format!(
            "{}{}{}\n",
            self.newline_prefix(at),
            " ".repeat(indent),
            line_body
        );
        self.apply(at..at, line)?;
        Ok(true)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn locate(&self, path: &KeyPath) -> Option<Target<'_>> {
        let mut node = self.root.as_ref()?;
        let segments = path.segments();
        for (i, segment) in segments.iter().enumerate() {
            let last = i + 1 == segments.len();
            match (node, segment) {
                (Node::Mapping(m), Segment::Key(key)) => {
                    let entry = m.get(key)?;
                    match &entry.value {
                        Some(child) => node = child,
                        None if last => {
                            return Some(Target::NullEntry {
                                indent: entry.indent,
                                end: entry.end,
                            });
                        }
                        None => return None,
                    }
                }
                (Node::Sequence(seq), Segment::Index(index)) => {
                    let item = seq.items.get(*index)?;
                    match &item.value {
                        Some(child) => node = child,
                        None if last => return Some(Target::NullItem),
                        None => return None,
                    }
                }
                _ => return None,
            }
        }
        Some(Target::Node(node))
    }

    fn capture(&self, node: &Node) -> YamlValue {
        match node {
            Node::Scalar(s) => YamlValue::Scalar(s.value.clone()),
            block => {
                let span = block.span();
                let indent = block.indent();
                let lines = self.text[span]
                    .lines()
                    .map(|line| {
                        let line = line.trim_end_matches('\r');
                        let strip = line
                            .bytes()
                            .take(indent)
                            .take_while(|b| *b == b' ')
                            .count();
                        line[strip..].to_string()
                    })
                    .collect();
                YamlValue::Block(lines)
            }
        }
    }

    fn plan_set(&self, path: &KeyPath, value: &YamlValue) -> Result<(Span, String), EditError> {
        let segments = path.segments();
        if segments.is_empty() {
            return Err(EditError::structure("", "cannot set the document root"));
        }
        let Some(root) = &self.root else {
            let keys = creation_keys(segments, path)?;
            let at = self.text.len();
            let text = format!(
                "{}{}",
                self.newline_prefix(at),
                render_chain(&keys, value, 0)
            );
            return Ok((at..at, text));
        };

        let mut node = root;
        let mut i = 0;
        loop {
            let last = i + 1 == segments.len();
            match (node, &segments[i]) {
                (Node::Mapping(m), Segment::Key(key)) => {
                    if let Some(entry) = m.get(key) {
                        if last {
                            return Ok(self.plan_entry_rewrite(entry, value));
                        }
                        match &entry.value {
                            Some(child) => {
                                node = child;
                                i += 1;
                            }
                            None => {
                                let keys = creation_keys(&segments[i + 1..], path)?;
                                let at = entry.end;
                                let text = format!(
                                    "{}{}",
                                    self.newline_prefix(at),
                                    render_chain(&keys, value, entry.indent + 2)
                                );
                                return Ok((at..at, text));
                            }
                        }
                    } else {
                        let keys = creation_keys(&segments[i..], path)?;
                        let at = m.span.end;
                        let text = format!(
                            "{}{}",
                            self.newline_prefix(at),
                            render_chain(&keys, value, m.indent)
                        );
                        return Ok((at..at, text));
                    }
                }
                (Node::Sequence(seq), Segment::Index(index)) => {
                    let Some(item) = seq.items.get(*index) else {
                        return Err(EditError::structure(
                            path.to_string(),
                            format!("index {index} out of bounds"),
                        ));
                    };
                    if last {
                        return Ok(self.plan_item_rewrite(item, value));
                    }
                    match &item.value {
                        Some(child) => {
                            node = child;
                            i += 1;
                        }
                        None => {
                            return Err(EditError::structure(
                                path.to_string(),
                                "cannot descend into an empty item",
                            ));
                        }
                    }
                }
                _ => {
                    return Err(EditError::structure(
                        path.to_string(),
                        "parent exists but is not a matching container",
                    ));
                }
            }
        }
    }

    fn plan_entry_rewrite(&self, entry: &MapEntry, value: &YamlValue) -> (Span, String) {
        match (&entry.value, value) {
            (Some(Node::Scalar(old)), YamlValue::Scalar(new)) => {
                (old.span.clone(), render_scalar(new))
            }
            (Some(_), YamlValue::Scalar(new)) => (
                entry.colon_end..entry.end,
                format!(" {}\n", render_scalar(new)),
            ),
            (Some(old), YamlValue::Block(lines)) => {
                let indent = match old {
                    Node::Scalar(_) => entry.indent + 2,
                    block => block.indent(),
                };
                (
                    entry.colon_end..entry.end,
                    format!("\n{}", render_block(lines, indent)),
                )
            }
            (None, YamlValue::Scalar(new)) => (
                entry.colon_end..entry.colon_end,
                format!(" {}", render_scalar(new)),
            ),
            (None, YamlValue::Block(lines)) => (
                entry.end..entry.end,
                format!(
                    "{}{}",
                    self.newline_prefix(entry.end),
                    render_block(lines, entry.indent + 2)
                ),
            ),
        }
    }

    fn plan_item_rewrite(&self, item: &SeqItem, value: &YamlValue) -> (Span, String) {
        match (&item.value, value) {
            (Some(Node::Scalar(old)), YamlValue::Scalar(new)) => {
                (old.span.clone(), render_scalar(new))
            }
            (Some(_), YamlValue::Scalar(new)) => {
                (item.dash_end..item.end, format!(" {}\n", render_scalar(new)))
            }
            (Some(old), YamlValue::Block(lines)) => {
                let indent = match old {
                    Node::Scalar(_) => item.dash_end - item.line_start + 1,
                    block => block.indent(),
                };
                (
                    item.dash_end..item.end,
                    format!("\n{}", render_block(lines, indent)),
                )
            }
            (None, YamlValue::Scalar(new)) => {
                (item.dash_end..item.dash_end, format!(" {}", render_scalar(new)))
            }
            (None, YamlValue::Block(lines)) => (
                item.end..item.end,
                format!(
                    "{}{}",
                    self.newline_prefix(item.end),
                    render_block(lines, item.dash_end - item.line_start + 1)
                ),
            ),
        }
    }

    fn newline_prefix(&self, at: usize) -> &'static str {
        if at > 0 && self.text.as_bytes().get(at - 1).is_some_and(|b| *b != b'\n') {
            "\n"
        } else {
            ""
        }
    }

    fn apply(&mut self, span: Span, replacement: String) -> Result<(), EditError> {
        self.text.replace_range(span, &replacement);
        self.root = parser::parse(&self.text)?;
        Ok(())
    }
}

// =============================================================================
// RENDERING
// =============================================================================

fn split_last(path: &KeyPath) -> Option<(&Segment, KeyPath)> {
    let segments = path.segments();
    let (last, parents) = segments.split_last()?;
    let mut parent = KeyPath::root();
    for segment in parents {
        parent = match segment {
            Segment::Key(k) => parent.key(k.clone()),
            Segment::Index(i) => parent.index(*i),
        };
    }
    Some((last, parent))
}

fn creation_keys<'a>(
    segments: &'a [Segment],
    path: &KeyPath,
) -> Result<Vec<&'a str>, EditError> {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Key(k) => Ok(k.as_str()),
            Segment::Index(_) => Err(EditError::structure(
                path.to_string(),
                "cannot create sequence elements by index",
            )),
        })
        .collect()
}

/// Render a chain of nested keys ending in `value`, starting at `indent`.
fn render_chain(keys: &[&str], value: &YamlValue, indent: usize) -> String {
    let mut out = String::new();
    let mut level = indent;
    for key in &keys[..keys.len().saturating_sub(1)] {
        out.push_str(&" ".repeat(level));
        out.push_str(&render_key(key));
        out.push_str(":\n");
        level += 2;
    }
    let Some(last) = keys.last() else {
        return out;
    };
    match value {
        YamlValue::Scalar(v) => {
            out.push_str(&format!(
                "{}{}: {}\n",
                " ".repeat(level),
                render_key(last),
                render_scalar(v)
            ));
        }
        YamlValue::Block(lines) => {
            out.push_str(&format!("{}{}:\n", " ".repeat(level), render_key(last)));
            out.push_str(&render_block(lines, level + 2));
        }
    }
    out
}

fn render_block(lines: &[String], indent: usize) -> String {
    let mut out = String::new();
    for line in lines {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&" ".repeat(indent));
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

fn render_key(key: &str) -> String {
    if key.contains(':') || key.contains('#') || key.starts_with(['\'', '"', ' ']) {
        format!("'{}'", key.replace('\'', "''"))
    } else {
        key.to_string()
    }
}

fn render_scalar(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }
    let starts_special = value.starts_with([
        '#', '?', '&', '*', '!', '|', '>', '%', '@', '`', '"', '\'', '{', '}', '[', ']', ',', ' ',
    ]);
    let needs_quote = starts_special
        || value == "-"
        || value.starts_with("- ")
        || value.ends_with([' ', ':'])
        || value.contains(": ")
        || value.contains(" #");
    if needs_quote {
        format!("'{}'", value.replace('\'', "''"))
    } else {
        value.to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PUBSPEC: &str = "\
name: demo_app
version: 1.2.3 # release train

environment:
  sdk: ^3.4.0

# runtime deps
dependencies:
  collection: ^1.18.0
  http: ^1.1.0 # pinned for proxy fix
  local_kit:
    path: ../local_kit

dev_dependencies:
  lints: ^4.0.0
";

    fn doc(src: &str) -> YamlDocument {
        match YamlDocument::parse(src) {
            Ok(d) => d,
            Err(e) => unreachable!("fixture failed to parse: {e}"),
        }
    }

    fn dep(name: &str) -> KeyPath {
        KeyPath::root().key("dependencies").key(name)
    }

    #[test]
    fn test_no_edit_roundtrip_is_byte_identical() {
        let d = doc(PUBSPEC);
        assert_eq!(d.text(), PUBSPEC);
        assert!(!d.is_modified());
        // Repeated serialization never double-applies anything.
        assert_eq!(d.text(), d.text());
    }

    #[test]
    fn test_get_reads() {
        let d = doc(PUBSPEC);
        assert_eq!(d.get_scalar(&KeyPath::root().key("name")), Some("demo_app"));
        assert_eq!(d.get_scalar(&dep("http")), Some("^1.1.0"));
        assert_eq!(d.get_scalar(&dep("missing")), None);
        assert!(d.contains(&KeyPath::root().key("dev_dependencies")));
        assert!(!d.contains(&KeyPath::root().key("dependency_overrides")));
    }

    #[test]
    fn test_set_existing_scalar_preserves_surroundings() {
        let mut d = doc(PUBSPEC);
        assert!(d.set_scalar(&dep("http"), "any").is_ok());
        let text = d.text();
        assert!(text.contains("  http: any # pinned for proxy fix\n"));
        // Everything else untouched.
        assert!(text.contains("version: 1.2.3 # release train\n"));
        assert!(text.contains("# runtime deps\n"));
        assert!(text.contains("  collection: ^1.18.0\n"));
    }

    #[test]
    fn test_set_new_key_in_existing_mapping() {
        let mut d = doc(PUBSPEC);
        assert!(d.set_scalar(&dep("args"), "^2.5.0").is_ok());
        assert!(d.text().contains("    path: ../local_kit\n  args: ^2.5.0\n"));
    }

    #[test]
    fn test_set_creates_intermediate_mappings() {
        let mut d = doc(PUBSPEC);
        let path = KeyPath::root().key("dependency_overrides").key("foo");
        assert!(d.set_scalar(&path, "^2.0.0").is_ok());
        assert!(d.text().contains("dependency_overrides:\n  foo: ^2.0.0\n"));
        assert_eq!(d.get_scalar(&path), Some("^2.0.0"));
    }

    #[test]
    fn test_set_into_empty_section() {
        let mut d = doc("name: demo\ndependencies:\n");
        assert!(d.set_scalar(&dep("foo"), "^1.0.0").is_ok());
        assert_eq!(d.text(), "name: demo\ndependencies:\n  foo: ^1.0.0\n");
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut d = doc(PUBSPEC);
        let path = KeyPath::root().key("name").key("nested");
        assert!(matches!(
            d.set_scalar(&path, "x"),
            Err(EditError::Structure { .. })
        ));
    }

    #[test]
    fn test_set_block_value() {
        let mut d = doc(PUBSPEC);
        let value = YamlValue::Block(vec!["path: ../shared/foo".to_string()]);
        assert!(d.set(&dep("foo"), &value).is_ok());
        assert!(d.text().contains("  foo:\n    path: ../shared/foo\n"));
    }

    #[test]
    fn test_block_capture_roundtrip() {
        let d = doc(PUBSPEC);
        let Some(YamlValue::Block(lines)) = d.value_of(&dep("local_kit")) else {
            unreachable!("expected block value");
        };
        assert_eq!(lines, vec!["path: ../local_kit".to_string()]);
    }

    #[test]
    fn test_remove_entry_and_nested_block() {
        let mut d = doc(PUBSPEC);
        assert!(matches!(d.remove(&dep("local_kit")), Ok(true)));
        let text = d.text();
        assert!(!text.contains("local_kit"));
        assert!(!text.contains("../local_kit"));
        assert!(text.contains("  http: ^1.1.0 # pinned for proxy fix\n"));
        // No cascade: the section stays even if it were the last entry.
        assert!(text.contains("dependencies:\n"));
    }

    #[test]
    fn test_remove_absent_returns_false() {
        let mut d = doc(PUBSPEC);
        assert!(matches!(d.remove(&dep("nope")), Ok(false)));
        assert!(!d.is_modified());
    }

    #[test]
    fn test_remove_last_entry_leaves_empty_section() {
        let mut d = doc("dev_dependencies:\n  lints: ^4.0.0\nname: demo\n");
        let path = KeyPath::root().key("dev_dependencies").key("lints");
        assert!(matches!(d.remove(&path), Ok(true)));
        assert_eq!(d.text(), "dev_dependencies:\nname: demo\n");
        let entries = d.entries(&KeyPath::root().key("dev_dependencies"));
        assert!(matches!(entries, Ok(Some(ref v)) if v.is_empty()));
    }

    #[test]
    fn test_append_to_existing_sequence() {
        let mut d = doc("workspace:\n  - packages/app\n");
        let path = KeyPath::root().key("workspace");
        assert!(d.append(&path, "packages/lib").is_ok());
        assert_eq!(d.text(), "workspace:\n  - packages/app\n  - packages/lib\n");
    }

    #[test]
    fn test_append_creates_sequence() {
        let mut d = doc("name: demo\n");
        let path = KeyPath::root().key("workspace");
        assert!(d.append(&path, "packages/app").is_ok());
        assert_eq!(d.text(), "name: demo\nworkspace:\n  - packages/app\n");
    }

    #[test]
    fn test_append_to_empty_key() {
        let mut d = doc("workspace:\nname: demo\n");
        let path = KeyPath::root().key("workspace");
        assert!(d.append(&path, "packages/app").is_ok());
        assert_eq!(d.text(), "workspace:\n  - packages/app\nname: demo\n");
    }

    #[test]
    fn test_append_to_non_sequence_fails() {
        let mut d = doc(PUBSPEC);
        assert!(matches!(
            d.append(&KeyPath::root().key("name"), "x"),
            Err(EditError::NotASequence { .. })
        ));
        assert!(matches!(
            d.append(&KeyPath::root().key("dependencies"), "x"),
            Err(EditError::NotASequence { .. })
        ));
    }

    #[test]
    fn test_insert_top_level_after_anchor() {
        let mut d = doc(PUBSPEC);
        let inserted = d.insert_top_level("resolution", Some("workspace"), Some("environment"));
        assert!(matches!(inserted, Ok(true)));
        assert!(d.text().contains("  sdk: ^3.4.0\nresolution: workspace\n"));
    }

    #[test]
    fn test_insert_top_level_without_anchor_appends() {
        let mut d = doc("name: demo\n");
        let inserted = d.insert_top_level("resolution", Some("workspace"), Some("environment"));
        assert!(matches!(inserted, Ok(true)));
        assert_eq!(d.text(), "name: demo\nresolution: workspace\n");
    }

    #[test]
    fn test_insert_top_level_existing_is_noop() {
        let mut d = doc("name: demo\nresolution: workspace\n");
        let inserted = d.insert_top_level("resolution", Some("workspace"), None);
        assert!(matches!(inserted, Ok(false)));
        assert!(!d.is_modified());
    }

    #[test]
    fn test_missing_trailing_newline_handled() {
        let mut d = doc("name: demo");
        assert!(d
            .set_scalar(&KeyPath::root().key("version"), "1.0.0")
            .is_ok());
        assert_eq!(d.text(), "name: demo\nversion: 1.0.0\n");
    }

    #[test]
    fn test_edits_visible_to_reads() {
        let mut d = doc(PUBSPEC);
        assert!(d.set_scalar(&dep("http"), "any").is_ok());
        assert_eq!(d.get_scalar(&dep("http")), Some("any"));
        assert!(matches!(d.remove(&dep("collection")), Ok(true)));
        assert_eq!(d.get_scalar(&dep("collection")), None);
    }

    #[test]
    fn test_set_on_empty_document() {
        let mut d = doc("# nothing here yet\n");
        assert!(d.set_scalar(&dep("foo"), "^1.0.0").is_ok());
        assert_eq!(
            d.text(),
            "# nothing here yet\ndependencies:\n  foo: ^1.0.0\n"
        );
    }

    #[test]
    fn test_scalar_quoting_on_write() {
        let mut d = doc("name: demo\n");
        let path = KeyPath::root().key("note");
        assert!(d.set_scalar(&path, "a: b").is_ok());
        assert!(d.text().contains("note: 'a: b'\n"));
        assert_eq!(d.get_scalar(&path), Some("a: b"));
    }

    #[test]
    fn test_entries_in_declared_order() {
        let d = doc(PUBSPEC);
        let entries = d.entries(&KeyPath::root().key("dependencies"));
        let Ok(Some(entries)) = entries else {
            unreachable!("expected entries");
        };
        let names: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["collection", "http", "local_kit"]);
    }

    #[test]
    fn test_entries_absent_vs_scalar() {
        let d = doc(PUBSPEC);
        assert!(matches!(
            d.entries(&KeyPath::root().key("dependency_overrides")),
            Ok(None)
        ));
        assert!(matches!(
            d.entries(&KeyPath::root().key("name")),
            Err(EditError::Structure { .. })
        ));
    }
}
