//! Immutable resolution snapshot.
//!
//! A [`Mapper`] is compiled once from a [`Builder`] and then queried for the
//! lifetime of the process. Every map and trie it holds is owned outright;
//! nothing refers back to the builder.
//!
//! # Precedence
//!
//! Each family resolves independently, stopping at the first tier that
//! produces a value:
//!
//! 1. exact override for the code
//! 2. longest reason-prefix match among the code's prefix rules
//! 3. per-code default
//! 4. global fallback
//!
//! Resolution is total: every `(code, reason)` yields a status.
//!
//! # Concurrency
//!
//! `Mapper` has no interior mutability. Lookups take `&self`, never block and
//! never allocate, so a snapshot can be shared across threads (directly or
//! behind an `Arc`) without synchronization. Reload means building a new
//! snapshot; see [`SharedMapper`](crate::SharedMapper).

use crate::code::Code;
use crate::defaults;
use crate::error::BuildError;
use crate::explain::{Explanation, Resolution, Source};
use crate::grpc::GrpcCode;
use crate::reason::{self, Reason};
use crate::rules::{Builder, Directive, Family, FamilyRules};
use crate::trie::SegmentTrie;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Paired result of resolving both families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Status {
    /// HTTP status.
    pub http: u16,
    /// gRPC status.
    pub grpc: GrpcCode,
}

/// Transport adapter seam.
///
/// HTTP and gRPC handlers depend on this trait rather than on a concrete
/// snapshot, so they work equally with a fixed [`Mapper`] or a reloadable
/// [`SharedMapper`](crate::SharedMapper).
pub trait StatusMapper: Send + Sync {
    /// Resolve the HTTP status for `(code, reason)`.
    fn http_status(&self, code: &Code, reason: &Reason) -> u16;

    /// Resolve the gRPC status for `(code, reason)`.
    fn grpc_status(&self, code: &Code, reason: &Reason) -> GrpcCode;

    /// Resolve both families.
    fn status(&self, code: &Code, reason: &Reason) -> Status {
        Status {
            http: self.http_status(code, reason),
            grpc: self.grpc_status(code, reason),
        }
    }

    /// Rendered resolution trace, for logs and debugging.
    fn explain(&self, code: &Code, reason: &Reason) -> String;
}

// ============================================================================
// Per-Family Table
// ============================================================================

#[derive(Debug, Clone)]
struct FamilyTable<V> {
    overrides: HashMap<Code, V>,
    tries: HashMap<Code, SegmentTrie<V>>,
    defaults: HashMap<Code, V>,
    fallback: V,
}

impl<V: Copy> FamilyTable<V> {
    fn seeded(table: &[(Code, V)], fallback: V) -> Self {
        Self {
            overrides: HashMap::new(),
            tries: HashMap::new(),
            defaults: table.iter().cloned().collect(),
            fallback,
        }
    }

    /// Normalize and insert every prefix rule, then freeze the flat maps.
    fn compile(family: Family, rules: FamilyRules<V>) -> Result<Self, BuildError> {
        let mut tries = HashMap::with_capacity(rules.prefixes.len());
        for (code, prefixes) in rules.prefixes {
            if prefixes.is_empty() {
                continue;
            }
            let mut trie = SegmentTrie::new();
            for rule in prefixes {
                let pattern = reason::normalize(&rule.pattern);
                if let Err(source) = trie.insert(&pattern, rule.value) {
                    tracing::warn!(
                        family = family.label(),
                        code = %code,
                        pattern = %rule.pattern,
                        error = %source,
                        "rejected reason-prefix rule"
                    );
                    return Err(BuildError::InvalidPrefix {
                        family,
                        code,
                        pattern: rule.pattern,
                        source,
                    });
                }
            }
            tries.insert(code, trie);
        }

        Ok(Self {
            overrides: rules.overrides.into_iter().collect(),
            tries,
            defaults: rules.defaults.into_iter().collect(),
            fallback: rules.fallback,
        })
    }

    #[inline]
    fn resolve(&self, code: &Code, reason: &Reason) -> V {
        if let Some(v) = self.overrides.get(code) {
            return *v;
        }
        if let Some(v) = self
            .tries
            .get(code)
            .and_then(|trie| trie.lookup(reason.as_str()))
        {
            return *v;
        }
        self.defaults.get(code).copied().unwrap_or(self.fallback)
    }

    fn explain(&self, code: &Code, reason: &Reason) -> Resolution<'_, V> {
        if let Some(v) = self.overrides.get(code) {
            return Resolution {
                value: *v,
                source: Source::Override,
            };
        }
        if let Some((v, pattern)) = self
            .tries
            .get(code)
            .and_then(|trie| trie.lookup_with_pattern(reason.as_str()))
        {
            return Resolution {
                value: *v,
                source: Source::Prefix { pattern },
            };
        }
        match self.defaults.get(code) {
            Some(v) => Resolution {
                value: *v,
                source: Source::Default,
            },
            None => Resolution {
                value: self.fallback,
                source: Source::Fallback,
            },
        }
    }

    fn prefix_count(&self) -> usize {
        self.tries.values().map(SegmentTrie::len).sum()
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Compiled, immutable `(code, reason)` to status resolver.
///
/// ```rust
/// use palisade_status::{Code, GrpcCode, Mapper, Reason};
///
/// let mapper = Mapper::builder()
///     .http_prefix(Code::UNAVAILABLE, "storage.pg", 503)
///     .http_override(Code::CANCELED, 408)
///     .build()
///     .unwrap();
///
/// let reason = Reason::parse("storage.pg.connect_timeout").unwrap();
/// assert_eq!(mapper.http_status(&Code::UNAVAILABLE, &reason), 503);
/// assert_eq!(mapper.grpc_status(&Code::UNAVAILABLE, &reason), GrpcCode::Unavailable);
/// assert_eq!(mapper.http_status(&Code::INVALID, &Reason::EMPTY), 400);
/// ```
#[derive(Debug, Clone)]
pub struct Mapper {
    http: FamilyTable<u16>,
    grpc: FamilyTable<GrpcCode>,
}

impl Mapper {
    /// Start a rule store seeded with the built-in defaults.
    #[inline]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Build a snapshot from configuration directives applied on top of the
    /// built-in defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Builder::build`].
    pub fn from_directives(
        directives: impl IntoIterator<Item = Directive>,
    ) -> Result<Self, BuildError> {
        Builder::new().apply_all(directives).build()
    }

    pub(crate) fn compile(builder: Builder) -> Result<Self, BuildError> {
        let http = FamilyTable::compile(Family::Http, builder.http)?;
        let grpc = FamilyTable::compile(Family::Grpc, builder.grpc)?;

        tracing::debug!(
            http_overrides = http.overrides.len(),
            http_prefixes = http.prefix_count(),
            http_defaults = http.defaults.len(),
            grpc_overrides = grpc.overrides.len(),
            grpc_prefixes = grpc.prefix_count(),
            grpc_defaults = grpc.defaults.len(),
            "status mapper built"
        );

        Ok(Self { http, grpc })
    }

    /// Resolve the HTTP status for `(code, reason)`.
    #[inline]
    pub fn http_status(&self, code: &Code, reason: &Reason) -> u16 {
        self.http.resolve(code, reason)
    }

    /// Resolve the gRPC status for `(code, reason)`.
    #[inline]
    pub fn grpc_status(&self, code: &Code, reason: &Reason) -> GrpcCode {
        self.grpc.resolve(code, reason)
    }

    /// Resolve both families.
    #[inline]
    pub fn status(&self, code: &Code, reason: &Reason) -> Status {
        Status {
            http: self.http_status(code, reason),
            grpc: self.grpc_status(code, reason),
        }
    }

    /// Structured trace of which tier produced each family's status.
    ///
    /// Walks the same precedence as [`status`](Self::status), so
    /// `explanation(c, r).http.value == http_status(c, r)` always holds.
    pub fn explanation<'a>(&'a self, code: &'a Code, reason: &'a Reason) -> Explanation<'a> {
        Explanation {
            code,
            reason,
            http: self.http.explain(code, reason),
            grpc: self.grpc.explain(code, reason),
        }
    }

    /// HTTP status used when a code has no rule at all.
    #[inline]
    pub fn http_fallback(&self) -> u16 {
        self.http.fallback
    }

    /// gRPC status used when a code has no rule at all.
    #[inline]
    pub fn grpc_fallback(&self) -> GrpcCode {
        self.grpc.fallback
    }
}

impl Default for Mapper {
    /// Built-in defaults and fallbacks only, no overrides or prefix rules.
    fn default() -> Self {
        Self {
            http: FamilyTable::seeded(defaults::HTTP_DEFAULTS, defaults::FALLBACK_HTTP),
            grpc: FamilyTable::seeded(defaults::GRPC_DEFAULTS, defaults::FALLBACK_GRPC),
        }
    }
}

impl StatusMapper for Mapper {
    #[inline]
    fn http_status(&self, code: &Code, reason: &Reason) -> u16 {
        Mapper::http_status(self, code, reason)
    }

    #[inline]
    fn grpc_status(&self, code: &Code, reason: &Reason) -> GrpcCode {
        Mapper::grpc_status(self, code, reason)
    }

    fn explain(&self, code: &Code, reason: &Reason) -> String {
        self.explanation(code, reason).to_string()
    }
}
