//! Segment-aware prefix index over dot-separated paths.
//!
//! Each node stands for one consumed segment. Patterns are inserted as
//! sequences of literal segments (`[a-z][a-z0-9_]*`) and single-segment
//! wildcards (`*`). Lookup returns the value of the deepest stored pattern
//! that is a segment-aligned prefix of the queried path.
//!
//! # Matching Rules
//!
//! - Segment boundaries are respected: `auth.jwt` never matches `auth.j`.
//! - `*` consumes exactly one segment, never zero and never several.
//! - Specificity is depth. A wildcard pattern reaching deeper beats a
//!   shallower literal one (`a.*.c` beats `a.b` for `a.b.c`).
//! - At equal depth the literal branch is explored first and kept, so
//!   `auth.jwt.verify` beats `auth.*.verify` for `auth.jwt.verify`.
//! - A path segment that is not `[a-z][a-z0-9_]*` stops that branch; only
//!   what was matched before it counts.
//!
//! # Zero-Allocation Lookup
//!
//! Lookup scans the path in place, borrowing sub-slices for child lookups.
//! The traversal state is a depth counter and a reference to the best
//! terminal found so far. Work is bounded by path length times two
//! branches per node.
//!
//! ```rust
//! use palisade_status::SegmentTrie;
//!
//! let mut trie = SegmentTrie::new();
//! trie.insert("storage.pg", 503).unwrap();
//! trie.insert("auth.*.verify", 401).unwrap();
//!
//! assert_eq!(trie.lookup("storage.pg.connect_timeout"), Some(&503));
//! assert_eq!(trie.lookup_with_pattern("auth.saml.verify"), Some((&401, "auth.*.verify")));
//! assert_eq!(trie.lookup("storage.p"), None);
//! ```

use crate::error::PatternError;
use crate::reason::is_segment;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Token matching exactly one arbitrary segment.
pub const WILDCARD: &str = "*";

/// Segment separator.
pub const SEPARATOR: char = '.';

/// Longest-prefix-match index keyed by dotted paths.
#[derive(Debug, Clone)]
pub struct SegmentTrie<T> {
    root: Node<T>,
    len: usize,
}

#[derive(Debug, Clone)]
struct Node<T> {
    children: HashMap<Box<str>, Node<T>>,
    terminal: Option<Terminal<T>>,
}

/// Value registered for the prefix ending at a node, plus the pattern text
/// that registered it (diagnostics only).
#[derive(Debug, Clone)]
struct Terminal<T> {
    value: T,
    pattern: Box<str>,
}

impl<T> Node<T> {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            terminal: None,
        }
    }

    /// Depth-first walk from byte offset `off` with `depth` segments consumed.
    fn walk<'t>(&'t self, path: &str, off: usize, depth: usize, best: &mut Best<'t, T>) {
        if let Some(terminal) = &self.terminal {
            if best.map_or(true, |(d, _)| depth > d) {
                *best = Some((depth, terminal));
            }
        }
        if off >= path.len() {
            return;
        }
        let Some(end) = scan_segment(path.as_bytes(), off) else {
            return;
        };
        let segment = &path[off..end];
        // skip the separator if present
        let next = if end < path.len() { end + 1 } else { end };

        if let Some(child) = self.children.get(segment) {
            child.walk(path, next, depth + 1, best);
        }
        if let Some(child) = self.children.get(WILDCARD) {
            child.walk(path, next, depth + 1, best);
        }
    }
}

type Best<'t, T> = Option<(usize, &'t Terminal<T>)>;

/// Find the end of the segment starting at `off`, validating
/// `[a-z][a-z0-9_]*` as it goes. `None` if the segment is malformed.
#[inline]
fn scan_segment(bytes: &[u8], off: usize) -> Option<usize> {
    if !bytes[off].is_ascii_lowercase() {
        return None;
    }
    let mut i = off + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'.' => break,
            b'a'..=b'z' | b'0'..=b'9' | b'_' => i += 1,
            _ => return None,
        }
    }
    Some(i)
}

impl<T> SegmentTrie<T> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            len: 0,
        }
    }

    /// Number of distinct patterns stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no pattern has been stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Associate `value` with `pattern`.
    ///
    /// Re-inserting an existing pattern replaces its value (last write
    /// wins); the stored pattern text is kept from the first insertion.
    ///
    /// # Errors
    ///
    /// [`PatternError`] if the pattern is empty, has an empty segment, has
    /// a segment that is neither `*` nor `[a-z][a-z0-9_]*`, or is made only
    /// of wildcards.
    pub fn insert(&mut self, pattern: &str, value: T) -> Result<(), PatternError> {
        let segments = split_pattern(pattern)?;

        let mut cur = &mut self.root;
        for segment in segments {
            cur = cur
                .children
                .entry(Box::from(segment))
                .or_insert_with(Node::new);
        }
        match &mut cur.terminal {
            Some(terminal) => terminal.value = value,
            empty => {
                *empty = Some(Terminal {
                    value,
                    pattern: Box::from(pattern),
                });
                self.len += 1;
            }
        }
        Ok(())
    }

    /// Value of the deepest stored pattern that prefixes `path`.
    #[inline]
    pub fn lookup(&self, path: &str) -> Option<&T> {
        self.best(path).map(|t| &t.value)
    }

    /// Like [`lookup`](Self::lookup), also returning the winning pattern.
    #[inline]
    pub fn lookup_with_pattern(&self, path: &str) -> Option<(&T, &str)> {
        self.best(path).map(|t| (&t.value, &*t.pattern))
    }

    fn best(&self, path: &str) -> Option<&Terminal<T>> {
        let mut best: Best<'_, T> = None;
        self.root.walk(path, 0, 0, &mut best);
        best.map(|(_, terminal)| terminal)
    }
}

impl<T> Default for SegmentTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Split and validate a pattern without heap allocation for typical depths.
fn split_pattern(pattern: &str) -> Result<SmallVec<[&str; 8]>, PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }
    let mut segments = SmallVec::new();
    let mut all_wildcard = true;
    for segment in pattern.split(SEPARATOR) {
        if segment.is_empty() {
            return Err(PatternError::EmptySegment);
        }
        if segment != WILDCARD {
            if !is_segment(segment) {
                return Err(PatternError::InvalidSegment(segment.to_owned()));
            }
            all_wildcard = false;
        }
        segments.push(segment);
    }
    if all_wildcard {
        return Err(PatternError::AllWildcard);
    }
    Ok(segments)
}
