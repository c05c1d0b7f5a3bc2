//! Line-oriented parser for the block-YAML subset used by package manifests
//!
//! Supports nested block mappings, block sequences, plain and quoted
//! scalars, literal/folded block scalars, comments, and blank lines.
//! Flow collections (`{...}`, `[...]`) are kept as opaque scalars. The
//! parser records byte spans for every node so edits can be applied as
//! local splices.

use crate::errors::EditError;
use crate::node::{MapEntry, Mapping, Node, Scalar, SeqItem, Sequence};

/// Parse a document. Returns `None` for an empty document (blank lines
/// and comments only).
pub fn parse(src: &str) -> Result<Option<Node>, EditError> {
    let lines = scan_lines(src)?;
    if lines.is_empty() {
        return Ok(None);
    }
    let mut pos = 0;
    let indent = lines[0].indent;
    let root = parse_block(src, &lines, &mut pos, indent)?;
    if pos < lines.len() {
        return Err(EditError::parse(
            lines[pos].number,
            "unexpected indentation",
        ));
    }
    Ok(Some(root))
}

// =============================================================================
// LINE SCANNING
// =============================================================================

/// One content line (blank and comment-only lines are skipped).
#[derive(Debug, Clone, Copy)]
struct RawLine {
    /// Byte offset of the line start.
    start: usize,
    /// Byte offset of the end of the line's text (before `\r`/`\n`).
    text_end: usize,
    /// Byte offset of the start of the next line.
    next: usize,
    /// Leading space count.
    indent: usize,
    /// 1-based line number, for diagnostics.
    number: usize,
}

fn scan_lines(src: &str) -> Result<Vec<RawLine>, EditError> {
    let bytes = src.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut number = 0usize;
    while start < bytes.len() {
        number += 1;
        let mut eol = start;
        while eol < bytes.len() && bytes[eol] != b'\n' {
            eol += 1;
        }
        let next = if eol < bytes.len() { eol + 1 } else { eol };
        let mut text_end = eol;
        if text_end > start && bytes[text_end - 1] == b'\r' {
            text_end -= 1;
        }
        let mut cursor = start;
        while cursor < text_end && bytes[cursor] == b' ' {
            cursor += 1;
        }
        if cursor < text_end && bytes[cursor] == b'\t' {
            return Err(EditError::parse(number, "tab character in indentation"));
        }
        if cursor < text_end && bytes[cursor] != b'#' {
            lines.push(RawLine {
                start,
                text_end,
                next,
                indent: cursor - start,
                number,
            });
        }
        start = next;
    }
    Ok(lines)
}

// =============================================================================
// BLOCK PARSING
// =============================================================================

fn parse_block(
    src: &str,
    lines: &[RawLine],
    pos: &mut usize,
    indent: usize,
) -> Result<Node, EditError> {
    let first = lines[*pos];
    if is_sequence_item(src, first) {
        parse_sequence(src, lines, pos, indent)
    } else {
        parse_mapping(src, lines, pos, indent)
    }
}

fn is_sequence_item(src: &str, line: RawLine) -> bool {
    let text = &src[line.start + line.indent..line.text_end];
    text == "-" || text.starts_with("- ")
}

fn parse_mapping(
    src: &str,
    lines: &[RawLine],
    pos: &mut usize,
    indent: usize,
) -> Result<Node, EditError> {
    let span_start = lines[*pos].start;
    let mut span_end = span_start;
    let mut entries = Vec::new();

    while *pos < lines.len() {
        let line = lines[*pos];
        if line.indent != indent {
            break;
        }
        if is_sequence_item(src, line) {
            return Err(EditError::parse(
                line.number,
                "sequence item inside a mapping",
            ));
        }
        let text = &src[line.start + line.indent..line.text_end];
        let Some((key, colon_offset)) = split_key(text) else {
            return Err(EditError::parse(line.number, "expected 'key:'"));
        };
        let colon_end = line.start + line.indent + colon_offset + 1;
        *pos += 1;

        let mut end = line.next;
        let value = match split_value(&src[colon_end..line.text_end]) {
            Some((rel_start, rel_end, unquoted)) => {
                let quoted = matches!(src.as_bytes()[colon_end + rel_start], b'\'' | b'"');
                if !quoted && is_block_scalar_indicator(&unquoted) {
                    // Literal/folded block scalar: the indented lines that
                    // follow belong to this value.
                    let mut text_end = line.text_end;
                    while *pos < lines.len() && lines[*pos].indent > indent {
                        text_end = lines[*pos].text_end;
                        end = lines[*pos].next;
                        *pos += 1;
                    }
                    let span = (colon_end + rel_start)..text_end;
                    Some(Node::Scalar(Scalar {
                        value: src[span.clone()].to_string(),
                        span,
                    }))
                } else {
                    if *pos < lines.len() && lines[*pos].indent > indent {
                        return Err(EditError::parse(
                            lines[*pos].number,
                            "unexpected indentation after scalar value",
                        ));
                    }
                    Some(Node::Scalar(Scalar {
                        value: unquoted,
                        span: (colon_end + rel_start)..(colon_end + rel_end),
                    }))
                }
            }
            None => {
                if *pos < lines.len() && lines[*pos].indent > indent {
                    let child_indent = lines[*pos].indent;
                    let child = parse_block(src, lines, pos, child_indent)?;
                    end = child.span().end;
                    Some(child)
                } else {
                    None
                }
            }
        };

        span_end = end;
        entries.push(MapEntry {
            key,
            indent,
            line_start: line.start,
            colon_end,
            value,
            end,
        });
    }

    Ok(Node::Mapping(Mapping {
        entries,
        indent,
        span: span_start..span_end,
    }))
}

fn parse_sequence(
    src: &str,
    lines: &[RawLine],
    pos: &mut usize,
    indent: usize,
) -> Result<Node, EditError> {
    let span_start = lines[*pos].start;
    let mut span_end = span_start;
    let mut items = Vec::new();

    while *pos < lines.len() {
        let line = lines[*pos];
        if line.indent != indent || !is_sequence_item(src, line) {
            break;
        }
        let dash_end = line.start + line.indent + 1;
        *pos += 1;

        let mut end = line.next;
        let value = match split_value(&src[dash_end..line.text_end]) {
            Some((rel_start, rel_end, unquoted)) => Some(Node::Scalar(Scalar {
                value: unquoted,
                span: (dash_end + rel_start)..(dash_end + rel_end),
            })),
            None => {
                if *pos < lines.len() && lines[*pos].indent > indent {
                    let child_indent = lines[*pos].indent;
                    let child = parse_block(src, lines, pos, child_indent)?;
                    end = child.span().end;
                    Some(child)
                } else {
                    None
                }
            }
        };

        span_end = end;
        items.push(SeqItem {
            line_start: line.start,
            dash_end,
            value,
            end,
        });
    }

    Ok(Node::Sequence(Sequence {
        items,
        indent,
        span: span_start..span_end,
    }))
}

fn is_block_scalar_indicator(value: &str) -> bool {
    let trimmed = value.trim();
    let Some(first) = trimmed.chars().next() else {
        return false;
    };
    (first == '|' || first == '>')
        && trimmed[1..].chars().all(|c| matches!(c, '+' | '-' | '0'..='9'))
}

// =============================================================================
// SCALAR SPLITTING
// =============================================================================

/// Split `text` into a key and the offset of its `:` separator.
///
/// The separator must be at end-of-line or followed by whitespace, and
/// quoted keys are honored.
fn split_key(text: &str) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    if bytes[0] == b'\'' || bytes[0] == b'"' {
        let close = find_closing_quote(text, 0)?;
        let mut cursor = close + 1;
        while cursor < bytes.len() && bytes[cursor] == b' ' {
            cursor += 1;
        }
        if cursor < bytes.len()
            && bytes[cursor] == b':'
            && (cursor + 1 == bytes.len() || bytes[cursor + 1].is_ascii_whitespace())
        {
            return Some((unquote(&text[..=close]), cursor));
        }
        return None;
    }
    for (i, b) in bytes.iter().enumerate() {
        if *b == b':' && (i + 1 == bytes.len() || bytes[i + 1].is_ascii_whitespace()) {
            let key = text[..i].trim_end();
            if key.is_empty() {
                return None;
            }
            return Some((key.to_string(), i));
        }
    }
    None
}

/// Extract the scalar value from the remainder of a line.
///
/// Returns `(start, end, unquoted)` offsets relative to `text`, with any
/// trailing comment excluded, or `None` when the line carries no value.
fn split_value(text: &str) -> Option<(usize, usize, String)> {
    let bytes = text.as_bytes();
    let mut start = 0;
    while start < bytes.len() && (bytes[start] == b' ' || bytes[start] == b'\t') {
        start += 1;
    }
    if start == bytes.len() || bytes[start] == b'#' {
        return None;
    }
    if bytes[start] == b'\'' || bytes[start] == b'"' {
        let close = find_closing_quote(text, start)?;
        return Some((start, close + 1, unquote(&text[start..=close])));
    }
    // Plain scalar: runs to a ` #` comment or end of line.
    let mut end = bytes.len();
    for i in start + 1..bytes.len() {
        if bytes[i] == b'#' && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
            end = i;
            break;
        }
    }
    let value = text[start..end].trim_end();
    Some((start, start + value.len(), value.to_string()))
}

/// Find the closing quote matching the quote at `open`.
fn find_closing_quote(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let quote = bytes[open];
    let mut i = open + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if quote == b'\'' && i + 1 < bytes.len() && bytes[i + 1] == b'\'' {
                i += 2; // escaped single quote
                continue;
            }
            return Some(i);
        }
        if quote == b'"' && bytes[i] == b'\\' {
            i += 1;
        }
        i += 1;
    }
    None
}

fn unquote(raw: &str) -> String {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\'' {
        return raw[1..raw.len() - 1].replace("''", "'");
    }
    if bytes.len() >= 2 && bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"' {
        let inner = &raw[1..raw.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => {}
                }
            } else {
                out.push(c);
            }
        }
        return out;
    }
    raw.to_string()
}
