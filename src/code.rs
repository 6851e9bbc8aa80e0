//! Error code namespace - the coarse category half of a classification.
//!
//! A [`Code`] names a transport-agnostic class of failure such as
//! `"unavailable"` or `"not_found"`. The status engine treats it as an opaque
//! map key; this module owns the canonical form and the well-known set.
//!
//! # Canonical Form
//!
//! `^[a-z][a-z0-9_]{2,63}$`: lowercase ASCII, digits and underscores,
//! starting with a letter, 3-64 bytes long.
//!
//! # Zero-Allocation Constants
//!
//! Well-known codes are `const` values borrowing `'static` text, so they can
//! be used in static tables and compared without touching the heap.
//!
//! ```rust
//! use palisade_status::Code;
//!
//! let parsed = Code::parse("  Not-Found ").unwrap();
//! assert_eq!(parsed, Code::NOT_FOUND);
//! assert_eq!(parsed.as_str(), "not_found");
//! ```

use crate::error::CodeError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Minimum length of a canonical code.
pub const MIN_LENGTH: usize = 3;

/// Maximum length of a canonical code.
pub const MAX_LENGTH: usize = 64;

/// Canonical, validated error category.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code(Cow<'static, str>);

impl Code {
    // ------------------------------------------------------------------------
    // Core / generic domain
    // ------------------------------------------------------------------------

    /// Internal, non-classified failure.
    pub const INTERNAL: Code = Code::from_static("internal");
    /// Input violates a structural or semantic invariant.
    pub const INVALID: Code = Code::from_static("invalid");
    /// A required value or structure is absent.
    pub const MISSING: Code = Code::from_static("missing");
    /// Requested operation or option is not supported.
    pub const UNSUPPORTED: Code = Code::from_static("unsupported");

    // ------------------------------------------------------------------------
    // Runtime / operation control
    // ------------------------------------------------------------------------

    /// A dependency is temporarily unreachable.
    pub const UNAVAILABLE: Code = Code::from_static("unavailable");
    /// The time budget was exceeded.
    pub const TIMEOUT: Code = Code::from_static("timeout");
    /// The operation was canceled by the caller.
    pub const CANCELED: Code = Code::from_static("canceled");
    /// A reachable dependency returned a failure.
    pub const DEPENDENCY_FAILED: Code = Code::from_static("dependency_failed");
    /// The component is alive but not ready to serve.
    pub const NOT_READY: Code = Code::from_static("not_ready");
    /// The component is leaving service and refuses new work.
    pub const DRAINING: Code = Code::from_static("draining");
    /// Queues or worker pools are saturated.
    pub const OVERLOADED: Code = Code::from_static("overloaded");
    /// Business-level throttle asking the caller to back off.
    pub const THROTTLED: Code = Code::from_static("throttled");

    // ------------------------------------------------------------------------
    // Resource / state / concurrency
    // ------------------------------------------------------------------------

    /// Target entity does not exist.
    pub const NOT_FOUND: Code = Code::from_static("not_found");
    /// An entity with the same identity already exists.
    pub const ALREADY_EXISTS: Code = Code::from_static("already_exists");
    /// Domain-state conflict.
    pub const CONFLICT: Code = Code::from_static("conflict");
    /// A stated precondition did not hold.
    pub const PRECONDITION_FAILED: Code = Code::from_static("precondition_failed");
    /// The resource existed once and is permanently gone.
    pub const GONE: Code = Code::from_static("gone");
    /// The client sent a version that is no longer current.
    pub const STALE_VERSION: Code = Code::from_static("stale_version");
    /// A deprecated or removed feature was used.
    pub const DEPRECATION_REJECTED: Code = Code::from_static("deprecation_rejected");

    // ------------------------------------------------------------------------
    // Authentication / authorization
    // ------------------------------------------------------------------------

    /// No authentication context could be established.
    pub const UNAUTHENTICATED: Code = Code::from_static("unauthenticated");
    /// Supplied credentials failed verification.
    pub const INVALID_CREDENTIALS: Code = Code::from_static("invalid_credentials");
    /// Authenticated but not allowed.
    pub const PERMISSION_DENIED: Code = Code::from_static("permission_denied");
    /// Token is malformed or fails validation.
    pub const TOKEN_INVALID: Code = Code::from_static("token_invalid");
    /// Token lifetime is over.
    pub const TOKEN_EXPIRED: Code = Code::from_static("token_expired");
    /// Token was revoked by policy.
    pub const TOKEN_REVOKED: Code = Code::from_static("token_revoked");
    /// Stateful session has expired.
    pub const SESSION_EXPIRED: Code = Code::from_static("session_expired");

    // ------------------------------------------------------------------------
    // Rate, quota, time windows
    // ------------------------------------------------------------------------

    /// A domain object with a TTL has expired.
    pub const EXPIRED: Code = Code::from_static("expired");
    /// Request arrived before its allowed window.
    pub const TOO_EARLY: Code = Code::from_static("too_early");
    /// Request rate limit hit.
    pub const RATE_LIMITED: Code = Code::from_static("rate_limited");
    /// Allocated quota exhausted.
    pub const QUOTA_EXCEEDED: Code = Code::from_static("quota_exceeded");

    /// Wrap a static string without validation.
    ///
    /// Intended for `const` declarations of codes already known to be
    /// canonical. Use [`Code::parse`] for anything that comes from outside.
    #[inline]
    pub const fn from_static(s: &'static str) -> Self {
        Self(Cow::Borrowed(s))
    }

    /// Normalize and validate `s` into a canonical code.
    pub fn parse(s: &str) -> Result<Self, CodeError> {
        let normalized = normalize(s);
        validate(&normalized)?;
        Ok(Self(Cow::Owned(normalized)))
    }

    /// Canonical text of this code.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({:?})", self.as_str())
    }
}

impl AsRef<str> for Code {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for Code {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.0.into_owned()
    }
}

/// Bring an arbitrary string closer to canonical code form.
///
/// Trims surrounding whitespace, lowercases, and replaces `-` with `_`.
/// The result is not guaranteed to be valid.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace('-', "_")
}

/// Check that `s` is already in canonical code form.
pub fn validate(s: &str) -> Result<(), CodeError> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&s.len()) {
        return Err(CodeError::InvalidLength {
            len: s.len(),
            min: MIN_LENGTH,
            max: MAX_LENGTH,
        });
    }
    let bytes = s.as_bytes();
    let head_ok = bytes[0].is_ascii_lowercase();
    let tail_ok = bytes[1..]
        .iter()
        .all(|&c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'_');
    if head_ok && tail_ok {
        Ok(())
    } else {
        Err(CodeError::InvalidFormat(s.to_owned()))
    }
}
