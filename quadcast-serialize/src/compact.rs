//! IRI compaction for serialized output.
//!
//! An [`IriCompactor`] rewrites absolute IRIs written as `<IRI>` into
//! base-relative (`<rest>`) or prefixed (`label:rest`) form. Everything that is
//! not an angle-bracketed IRI passes through untouched: CURIEs, blank nodes,
//! punctuation, and string literals including any `<...>` they contain.
//!
//! ## Algorithm
//!
//! For each candidate IRI:
//!
//! 1. If a base is set and the IRI starts with it, strip the base and emit
//!    `<rest>`.
//! 2. Otherwise the first namespace (in prefix-table order) that the IRI starts
//!    with wins: an exact match emits the bare label, anything longer emits
//!    `label:rest`.
//! 3. Otherwise the IRI is re-emitted as `<IRI>`.
//!
//! Steps 1 and 2 are exclusive: a base-stripped IRI is never prefix-matched.
//!
//! ## Overlapping namespaces
//!
//! Matching is not longest-prefix. With `a = http://ex.org/` configured before
//! `b = http://ex.org/path/`, the IRI `http://ex.org/path/x` compacts to
//! `a:path/x`. Callers should avoid configuring overlapping namespaces.

use crate::service::ChunkStream;
use futures::stream::TryStreamExt;
use indexmap::IndexMap;

/// Prefix label to namespace IRI, in caller order. The label may be empty.
pub type PrefixTable = IndexMap<String, String>;

/// Rewrites IRIs in serialized chunks. Built fresh for each serialize call.
#[derive(Debug, Clone, Default)]
pub struct IriCompactor {
    base: Option<String>,
    /// Namespace IRI to label. Iteration order is the position of each
    /// namespace's first occurrence in the prefix table; on a namespace
    /// collision the label of the last occurrence is kept.
    reverse: IndexMap<String, String>,
}

impl IriCompactor {
    /// Build a compactor from optional prefixes and base.
    ///
    /// An empty base and empty namespaces are ignored, since they would match
    /// every IRI.
    pub fn new(prefixes: Option<&PrefixTable>, base: Option<&str>) -> Self {
        let mut reverse = IndexMap::new();
        for (label, namespace) in prefixes.into_iter().flatten() {
            if namespace.is_empty() {
                continue;
            }
            reverse.insert(namespace.clone(), label.clone());
        }

        Self {
            base: base.filter(|b| !b.is_empty()).map(str::to_string),
            reverse,
        }
    }

    /// True when neither a base nor any prefix is configured.
    pub fn is_passthrough(&self) -> bool {
        self.base.is_none() && self.reverse.is_empty()
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// The derived namespace to label lookup, in matching order.
    pub fn reverse_lookup(&self) -> &IndexMap<String, String> {
        &self.reverse
    }

    /// Compact the content of one `<IRI>` token.
    pub fn compact_iri(&self, iri: &str) -> String {
        if let Some(rest) = self.base.as_deref().and_then(|base| iri.strip_prefix(base)) {
            return format!("<{}>", rest);
        }

        for (namespace, label) in &self.reverse {
            if let Some(rest) = iri.strip_prefix(namespace.as_str()) {
                if rest.is_empty() {
                    return bare_label(label);
                }
                return format!("{}:{}", label, rest);
            }
        }

        format!("<{}>", iri)
    }

    /// Rewrite every angle-bracketed IRI in `chunk`.
    ///
    /// String literals (`"..."`, `'...'`, and the triple-quoted forms) are
    /// copied verbatim. Lines that start with a `@prefix`, `@base`, `PREFIX`
    /// or `BASE` directive are copied verbatim, as are `#` comments up to the
    /// end of the line. A `<` that is not closed by `>`
    /// before whitespace, `<` or `"` is not treated as an IRI.
    pub fn compact_chunk(&self, chunk: &str) -> String {
        if self.is_passthrough() {
            return chunk.to_string();
        }

        let bytes = chunk.as_bytes();
        let mut out = String::with_capacity(chunk.len());
        let mut i = 0;
        let mut at_line_start = true;

        while i < bytes.len() {
            if at_line_start {
                at_line_start = false;
                let line_end = line_end(chunk, i);
                if is_directive(&chunk[i..line_end]) {
                    out.push_str(&chunk[i..line_end]);
                    i = line_end;
                    at_line_start = true;
                    continue;
                }
            }

            match bytes[i] {
                quote @ (b'"' | b'\'') => {
                    let end = literal_end(bytes, i, quote);
                    out.push_str(&chunk[i..end]);
                    i = end;
                }
                b'<' => match iri_end(bytes, i) {
                    Some(close) => {
                        out.push_str(&self.compact_iri(&chunk[i + 1..close]));
                        i = close + 1;
                    }
                    None => {
                        out.push('<');
                        i += 1;
                    }
                },
                b'#' => {
                    let end = comment_end(chunk, i);
                    out.push_str(&chunk[i..end]);
                    i = end;
                }
                b'\n' => {
                    out.push('\n');
                    i += 1;
                    at_line_start = true;
                }
                _ => {
                    let next = next_special(bytes, i + 1);
                    out.push_str(&chunk[i..next]);
                    i = next;
                }
            }
        }

        out
    }

    /// Apply [`compact_chunk`](Self::compact_chunk) to every chunk of a stream.
    ///
    /// Errors pass through untouched and chunk order is preserved.
    pub fn transform(self, chunks: ChunkStream) -> ChunkStream {
        if self.is_passthrough() {
            return chunks;
        }
        Box::pin(chunks.map_ok(move |chunk| self.compact_chunk(&chunk)))
    }
}

fn bare_label(label: &str) -> String {
    if label.is_empty() {
        // The empty prefix on its own is written `:`
        ":".to_string()
    } else {
        label.to_string()
    }
}

/// Byte offset just past the end of the line starting at `start`.
fn line_end(chunk: &str, start: usize) -> usize {
    chunk[start..]
        .find('\n')
        .map(|pos| start + pos + 1)
        .unwrap_or(chunk.len())
}

/// End of a `#` comment, not including the newline.
fn comment_end(chunk: &str, start: usize) -> usize {
    chunk[start..]
        .find('\n')
        .map(|pos| start + pos)
        .unwrap_or(chunk.len())
}

fn is_directive(line: &str) -> bool {
    let line = line.trim_start();
    if line.starts_with("@prefix") || line.starts_with("@base") {
        return true;
    }
    let keyword = line.split_whitespace().next().unwrap_or_default();
    keyword.eq_ignore_ascii_case("PREFIX") || keyword.eq_ignore_ascii_case("BASE")
}

/// Offset just past the literal opened at `start`, or the chunk length if it
/// is unterminated.
fn literal_end(bytes: &[u8], start: usize, quote: u8) -> usize {
    let long = bytes.len() >= start + 3 && bytes[start + 1] == quote && bytes[start + 2] == quote;
    let mut j = if long { start + 3 } else { start + 1 };

    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b if b == quote => {
                if !long {
                    return j + 1;
                }
                if bytes.len() >= j + 3 && bytes[j + 1] == quote && bytes[j + 2] == quote {
                    return j + 3;
                }
                j += 1;
            }
            _ => j += 1,
        }
    }

    bytes.len()
}

/// Offset of the `>` closing the IRI opened at `start`.
fn iri_end(bytes: &[u8], start: usize) -> Option<usize> {
    for (offset, b) in bytes[start + 1..].iter().enumerate() {
        match b {
            b'>' => return Some(start + 1 + offset),
            b'<' | b'"' => return None,
            b if b.is_ascii_whitespace() => return None,
            _ => {}
        }
    }
    None
}

/// Offset of the next byte the scanner has to look at.
fn next_special(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|b| matches!(b, b'"' | b'\'' | b'<' | b'#' | b'\n'))
        .map(|pos| from + pos)
        .unwrap_or(bytes.len())
}
