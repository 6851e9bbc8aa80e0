//! Diagnostic trace of a resolution.
//!
//! An [`Explanation`] records, per output family, which precedence tier
//! produced the status and, for a prefix hit, the pattern that won. It
//! borrows from the [`Mapper`](crate::Mapper) it was produced by and never
//! allocates until rendered.
//!
//! # Fixed Format
//!
//! `Display` renders three lines with no trailing newline:
//!
//! ```text
//! code="unavailable" reason="storage.pg.connect_timeout"
//! http: source=prefix pattern="storage.pg" -> 503
//! grpc: source=default -> UNAVAILABLE(14)
//! ```
//!
//! gRPC values render as the canonical `SCREAMING_SNAKE_CASE` name followed
//! by the numeric code, e.g. `CANCELLED(1)` and `INVALID_ARGUMENT(3)`. This
//! is the spelling of the gRPC status code table, not the Go constant names
//! (`Canceled`, `InvalidArgument`) upper-cased.
//!
//! The output is pinned by golden tests; treat any change to it as breaking.

use crate::code::Code;
use crate::grpc::GrpcCode;
use crate::reason::Reason;
use std::fmt;

/// Precedence tier that produced a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source<'a> {
    /// Exact (code, family) override.
    Override,
    /// Longest-prefix match on the reason.
    Prefix {
        /// Pattern text of the winning rule, as it was inserted.
        pattern: &'a str,
    },
    /// Per-code default.
    Default,
    /// Global fallback for the family.
    Fallback,
}

impl Source<'_> {
    /// Tier name used in the rendered trace.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Prefix { .. } => "prefix",
            Self::Default => "default",
            Self::Fallback => "fallback",
        }
    }

    /// Winning pattern for a prefix hit.
    pub const fn pattern(&self) -> Option<&str> {
        match self {
            Self::Prefix { pattern } => Some(*pattern),
            _ => None,
        }
    }
}

/// Resolved value plus the tier it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a, V> {
    /// Resolved status.
    pub value: V,
    /// Tier that produced it.
    pub source: Source<'a>,
}

/// Per-family trace for one `(code, reason)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Explanation<'a> {
    /// Queried category.
    pub code: &'a Code,
    /// Queried reason (possibly empty).
    pub reason: &'a Reason,
    /// HTTP resolution.
    pub http: Resolution<'a, u16>,
    /// gRPC resolution.
    pub grpc: Resolution<'a, GrpcCode>,
}

fn write_line<V: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    resolution: &Resolution<'_, V>,
) -> fmt::Result {
    write!(f, "{label}: source={}", resolution.source.as_str())?;
    if let Some(pattern) = resolution.source.pattern() {
        write!(f, " pattern={pattern:?}")?;
    }
    write!(f, " -> {}", resolution.value)
}

impl fmt::Display for Explanation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "code={:?} reason={:?}",
            self.code.as_str(),
            self.reason.as_str()
        )?;
        write_line(f, "http", &self.http)?;
        f.write_str("\n")?;
        write_line(f, "grpc", &self.grpc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_prefix_pattern_only_for_prefix_hits() {
        let reason = Reason::from_static("auth.jwt.verify");
        let e = Explanation {
            code: &Code::TOKEN_INVALID,
            reason: &reason,
            http: Resolution {
                value: 401,
                source: Source::Prefix {
                    pattern: "auth.*.verify",
                },
            },
            grpc: Resolution {
                value: GrpcCode::Unauthenticated,
                source: Source::Override,
            },
        };
        assert_eq!(
            e.to_string(),
            "code=\"token_invalid\" reason=\"auth.jwt.verify\"\n\
             http: source=prefix pattern=\"auth.*.verify\" -> 401\n\
             grpc: source=override -> UNAUTHENTICATED(16)"
        );
    }

    #[test]
    fn empty_reason_renders_as_empty_quotes() {
        let e = Explanation {
            code: &Code::INTERNAL,
            reason: &Reason::EMPTY,
            http: Resolution {
                value: 500,
                source: Source::Fallback,
            },
            grpc: Resolution {
                value: GrpcCode::Internal,
                source: Source::Default,
            },
        };
        let rendered = e.to_string();
        assert!(rendered.starts_with("code=\"internal\" reason=\"\"\n"));
        assert!(!rendered.ends_with('\n'));
    }

    #[test]
    fn grpc_line_uses_canonical_status_names() {
        let e = Explanation {
            code: &Code::CANCELED,
            reason: &Reason::EMPTY,
            http: Resolution {
                value: 400,
                source: Source::Override,
            },
            grpc: Resolution {
                value: GrpcCode::Canceled,
                source: Source::Default,
            },
        };
        assert!(e.to_string().ends_with("grpc: source=default -> CANCELLED(1)"));

        let e = Explanation {
            grpc: Resolution {
                value: GrpcCode::InvalidArgument,
                source: Source::Override,
            },
            ..e
        };
        assert!(e.to_string().ends_with("grpc: source=override -> INVALID_ARGUMENT(3)"));
    }

    #[test]
    fn source_names() {
        assert_eq!(Source::Override.as_str(), "override");
        assert_eq!(Source::Prefix { pattern: "a" }.pattern(), Some("a"));
        assert_eq!(Source::Default.pattern(), None);
        assert_eq!(Source::Fallback.as_str(), "fallback");
    }
}
