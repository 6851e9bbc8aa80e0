//! Optional, hierarchical refinement of a [`Code`](crate::Code).
//!
//! A [`Reason`] is a dot-separated path such as `"storage.pg.connect_timeout"`
//! naming the module, component and operation that failed. The empty reason
//! means "no refinement" and is always valid.
//!
//! # Canonical Form
//!
//! - empty, or
//! - 1-4 segments, each `[a-z][a-z0-9_]*`, separated by `.`
//! - 3-128 bytes in total when non-empty
//!
//! [`normalize`] is also the canonicalization step applied to prefix rule
//! patterns when a mapper is built, so `"STORAGE/PG"` and `"storage.pg"`
//! name the same rule.

use crate::error::ReasonError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Minimum length of a non-empty canonical reason.
pub const MIN_LENGTH: usize = 3;

/// Maximum length of a canonical reason.
pub const MAX_LENGTH: usize = 128;

/// Maximum number of segments in a canonical reason.
pub const MAX_SEGMENTS: usize = 4;

/// Canonical, validated reason path (possibly empty).
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Reason(Cow<'static, str>);

impl Reason {
    /// The "no reason provided" value.
    pub const EMPTY: Reason = Reason(Cow::Borrowed(""));

    /// Wrap a static string without validation.
    #[inline]
    pub const fn from_static(s: &'static str) -> Self {
        Self(Cow::Borrowed(s))
    }

    /// Normalize and validate `s`.
    ///
    /// Blank input yields [`Reason::EMPTY`].
    pub fn parse(s: &str) -> Result<Self, ReasonError> {
        let normalized = normalize(s);
        if normalized.is_empty() {
            return Ok(Self::EMPTY);
        }
        validate(&normalized)?;
        Ok(Self(Cow::Owned(normalized)))
    }

    /// Canonical text of this reason.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty reason.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the `.`-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Debug for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reason({:?})", self.as_str())
    }
}

impl AsRef<str> for Reason {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for Reason {
    type Error = ReasonError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Reason> for String {
    fn from(reason: Reason) -> Self {
        reason.0.into_owned()
    }
}

/// Bring an arbitrary string closer to canonical reason form.
///
/// Trims surrounding whitespace, lowercases, converts `/` to `.` and `-` to
/// `_`. The result is not guaranteed to be valid.
pub fn normalize(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    trimmed.to_lowercase().replace('/', ".").replace('-', "_")
}

/// Check that `s` is a canonical reason. The empty string is valid.
pub fn validate(s: &str) -> Result<(), ReasonError> {
    if s.is_empty() {
        return Ok(());
    }
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&s.len()) {
        return Err(ReasonError::InvalidLength {
            len: s.len(),
            min: MIN_LENGTH,
            max: MAX_LENGTH,
        });
    }
    let mut count = 0;
    for segment in s.split('.') {
        count += 1;
        if count > MAX_SEGMENTS || !is_segment(segment) {
            return Err(ReasonError::InvalidFormat(s.to_owned()));
        }
    }
    Ok(())
}

/// `[a-z][a-z0-9_]*`
pub(crate) fn is_segment(segment: &str) -> bool {
    match segment.as_bytes().split_first() {
        Some((head, tail)) => {
            head.is_ascii_lowercase()
                && tail
                    .iter()
                    .all(|&c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'_')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_empty_reason() {
        assert_eq!(Reason::parse("").unwrap(), Reason::EMPTY);
        assert_eq!(Reason::parse("   ").unwrap(), Reason::EMPTY);
        assert!(Reason::EMPTY.is_empty());
    }

    #[test]
    fn normalize_is_conservative() {
        assert_eq!(
            normalize("  STORAGE/PG.CONNECT-TIMEOUT  "),
            "storage.pg.connect_timeout"
        );
        assert_eq!(normalize("auth.*.verify"), "auth.*.verify");
    }

    #[test]
    fn parse_accepts_canonical_paths() {
        let r = Reason::parse("apimachinery.schema.gvk.parse").unwrap();
        assert_eq!(r.as_str(), "apimachinery.schema.gvk.parse");
        assert_eq!(r.segments().count(), 4);
    }

    #[test]
    fn parse_rejects_malformed_paths() {
        assert!(matches!(
            Reason::parse("ab"),
            Err(ReasonError::InvalidLength { .. })
        ));
        assert!(matches!(
            Reason::parse("a..b"),
            Err(ReasonError::InvalidFormat(_))
        ));
        assert!(matches!(
            Reason::parse("1schema.parse"),
            Err(ReasonError::InvalidFormat(_))
        ));
        assert!(matches!(
            Reason::parse("a.b.c.d.e"),
            Err(ReasonError::InvalidFormat(_))
        ));
        assert!(Reason::parse(&"a".repeat(MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn segment_syntax() {
        assert!(is_segment("pg"));
        assert!(is_segment("connect_timeout2"));
        assert!(!is_segment(""));
        assert!(!is_segment("*"));
        assert!(!is_segment("_x"));
        assert!(!is_segment("Pg"));
    }
}
