//! Error types for the build and parse paths.
//!
//! Resolution itself never fails. Everything in this module is produced
//! either while assembling a [`Mapper`](crate::Mapper) or while turning raw
//! strings into canonical [`Code`](crate::Code) / [`Reason`](crate::Reason)
//! values at the edge of the system.

use crate::code::Code;
use crate::rules::Family;
use thiserror::Error;

/// Why a prefix pattern was rejected by the segment trie.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern is the empty string.
    #[error("empty prefix")]
    Empty,
    /// The pattern has a leading, trailing or doubled `.`.
    #[error("empty segment")]
    EmptySegment,
    /// A segment is neither `*` nor `[a-z][a-z0-9_]*`.
    #[error("invalid segment {0:?}")]
    InvalidSegment(String),
    /// Every segment is `*`, which would shadow every reason.
    #[error("prefix cannot consist of '*' only")]
    AllWildcard,
}

/// Failure to compile a rule store into a [`Mapper`](crate::Mapper).
///
/// The build aborts on the first offending rule; no partially built
/// snapshot is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A prefix rule did not survive normalization and validation.
    #[error("invalid {family} reason-prefix {pattern:?} for code \"{code}\": {source}")]
    InvalidPrefix {
        /// Output family the rule was registered for.
        family: Family,
        /// Category the rule was scoped to.
        code: Code,
        /// Raw pattern text as supplied by the caller.
        pattern: String,
        /// Underlying validation failure.
        #[source]
        source: PatternError,
    },
}

impl BuildError {
    /// Category of the offending rule.
    #[inline]
    pub fn code(&self) -> &Code {
        match self {
            Self::InvalidPrefix { code, .. } => code,
        }
    }

    /// Raw pattern text of the offending rule.
    #[inline]
    pub fn pattern(&self) -> &str {
        match self {
            Self::InvalidPrefix { pattern, .. } => pattern,
        }
    }
}

/// A string could not be turned into a canonical [`Code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// Length outside `MIN_LENGTH..=MAX_LENGTH` after normalization.
    #[error("invalid code length {len} (must be {min}-{max})")]
    InvalidLength {
        /// Observed length in bytes.
        len: usize,
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// Characters outside `[a-z][a-z0-9_]*`.
    #[error("invalid code format {0:?}")]
    InvalidFormat(String),
}

/// A string could not be turned into a canonical [`Reason`](crate::Reason).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReasonError {
    /// Length outside `MIN_LENGTH..=MAX_LENGTH` after normalization.
    #[error("invalid reason length {len} (must be {min}-{max})")]
    InvalidLength {
        /// Observed length in bytes.
        len: usize,
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// Not 1-4 dot-separated `[a-z][a-z0-9_]*` segments.
    #[error("invalid reason format {0:?}")]
    InvalidFormat(String),
}
