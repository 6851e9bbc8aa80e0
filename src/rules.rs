//! Rule store - mutable accumulation of mapping rules before compilation.
//!
//! A [`Builder`] collects, per output [`Family`] and per [`Code`]:
//!
//! - an optional **default** (seeded from the built-in tables),
//! - an optional exact **override**,
//! - zero or more **prefix rules** (raw pattern + status).
//!
//! Nothing here validates patterns. Rules are stored exactly as given and
//! only normalized and checked by [`Builder::build`], so directives can be
//! applied in any order and an incomplete configuration can still be
//! inspected. Later writes to the same (family, code) default or override
//! replace earlier ones; prefix rules append.
//!
//! # Configuration as Data
//!
//! Besides the chained methods, the store accepts [`Directive`] values, which
//! deserialize with serde:
//!
//! ```rust
//! use palisade_status::{Builder, Code, Directive, GrpcCode, Reason};
//!
//! let directives: Vec<Directive> = serde_json::from_str(r#"[
//!     {"op": "add_prefix", "code": "unavailable", "pattern": "storage.pg", "status": {"http": 503}},
//!     {"op": "set_override", "code": "canceled", "status": {"grpc": "CANCELLED"}}
//! ]"#).unwrap();
//!
//! let mapper = Builder::new().apply_all(directives).build().unwrap();
//! let reason = Reason::parse("storage.pg.connect_timeout").unwrap();
//! assert_eq!(mapper.http_status(&Code::UNAVAILABLE, &reason), 503);
//! assert_eq!(mapper.grpc_status(&Code::CANCELED, &Reason::EMPTY), GrpcCode::Canceled);
//! ```

use crate::code::Code;
use crate::defaults;
use crate::error::BuildError;
use crate::grpc::GrpcCode;
use crate::mapper::Mapper;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Output status family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// HTTP status codes (`u16`).
    Http,
    /// gRPC status codes ([`GrpcCode`]).
    Grpc,
}

impl Family {
    /// Short label used in diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Grpc => "grpc",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Http => "HTTP",
            Self::Grpc => "gRPC",
        })
    }
}

/// A status value tagged with its family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusValue {
    /// HTTP status.
    Http(u16),
    /// gRPC status.
    Grpc(GrpcCode),
}

impl StatusValue {
    /// Family this value belongs to.
    pub const fn family(self) -> Family {
        match self {
            Self::Http(_) => Family::Http,
            Self::Grpc(_) => Family::Grpc,
        }
    }
}

impl From<u16> for StatusValue {
    fn from(status: u16) -> Self {
        Self::Http(status)
    }
}

impl From<GrpcCode> for StatusValue {
    fn from(status: GrpcCode) -> Self {
        Self::Grpc(status)
    }
}

/// One build-time configuration step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Directive {
    /// Set or replace the default for `code` in the value's family.
    SetDefault {
        /// Target category.
        code: Code,
        /// New default.
        status: StatusValue,
    },
    /// Set or replace the exact override for `code` in the value's family.
    SetOverride {
        /// Target category.
        code: Code,
        /// Override value.
        status: StatusValue,
    },
    /// Append a prefix rule for `code` in the value's family.
    AddPrefix {
        /// Target category.
        code: Code,
        /// Raw dotted pattern, `*` matches one segment.
        pattern: String,
        /// Value when the pattern wins.
        status: StatusValue,
    },
    /// Replace the global fallback of the value's family.
    SetFallback {
        /// New fallback.
        status: StatusValue,
    },
}

/// A raw, not yet validated prefix rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRule<V> {
    /// Dotted pattern exactly as supplied.
    pub pattern: String,
    /// Status applied when this pattern wins.
    pub value: V,
}

/// Rules accumulated for one output family.
#[derive(Debug, Clone)]
pub struct FamilyRules<V> {
    pub(crate) defaults: BTreeMap<Code, V>,
    pub(crate) overrides: BTreeMap<Code, V>,
    pub(crate) prefixes: BTreeMap<Code, Vec<PrefixRule<V>>>,
    pub(crate) fallback: V,
}

impl<V: Copy> FamilyRules<V> {
    fn seeded(table: &[(Code, V)], fallback: V) -> Self {
        Self {
            defaults: table.iter().cloned().collect(),
            overrides: BTreeMap::new(),
            prefixes: BTreeMap::new(),
            fallback,
        }
    }

    /// Default currently registered for `code`.
    pub fn default_for(&self, code: &Code) -> Option<V> {
        self.defaults.get(code).copied()
    }

    /// Override currently registered for `code`.
    pub fn override_for(&self, code: &Code) -> Option<V> {
        self.overrides.get(code).copied()
    }

    /// Prefix rules registered for `code`, in insertion order.
    pub fn prefixes_for(&self, code: &Code) -> &[PrefixRule<V>] {
        self.prefixes.get(code).map_or(&[], Vec::as_slice)
    }

    /// Global fallback for this family.
    pub fn fallback(&self) -> V {
        self.fallback
    }

    /// Total number of prefix rules across all codes.
    pub fn prefix_count(&self) -> usize {
        self.prefixes.values().map(Vec::len).sum()
    }

    fn set_default(&mut self, code: Code, value: V) {
        self.defaults.insert(code, value);
    }

    fn set_override(&mut self, code: Code, value: V) {
        self.overrides.insert(code, value);
    }

    fn add_prefix(&mut self, code: Code, pattern: String, value: V) {
        self.prefixes
            .entry(code)
            .or_default()
            .push(PrefixRule { pattern, value });
    }
}

/// Mutable rule store compiled into an immutable [`Mapper`].
///
/// Starts pre-seeded with [`defaults::HTTP_DEFAULTS`],
/// [`defaults::GRPC_DEFAULTS`] and the global fallbacks.
#[derive(Debug, Clone)]
#[must_use = "a builder does nothing until built"]
pub struct Builder {
    pub(crate) http: FamilyRules<u16>,
    pub(crate) grpc: FamilyRules<GrpcCode>,
}

impl Builder {
    /// Create a builder seeded with the built-in defaults.
    pub fn new() -> Self {
        Self {
            http: FamilyRules::seeded(defaults::HTTP_DEFAULTS, defaults::FALLBACK_HTTP),
            grpc: FamilyRules::seeded(defaults::GRPC_DEFAULTS, defaults::FALLBACK_GRPC),
        }
    }

    /// Set or replace the HTTP default for `code`.
    #[inline]
    pub fn http_default(mut self, code: Code, status: u16) -> Self {
        self.http.set_default(code, status);
        self
    }

    /// Set or replace the gRPC default for `code`.
    #[inline]
    pub fn grpc_default(mut self, code: Code, status: GrpcCode) -> Self {
        self.grpc.set_default(code, status);
        self
    }

    /// Register an exact HTTP override for `code`, ignoring the reason.
    #[inline]
    pub fn http_override(mut self, code: Code, status: u16) -> Self {
        self.http.set_override(code, status);
        self
    }

    /// Register an exact gRPC override for `code`, ignoring the reason.
    #[inline]
    pub fn grpc_override(mut self, code: Code, status: GrpcCode) -> Self {
        self.grpc.set_override(code, status);
        self
    }

    /// Add an HTTP longest-prefix-match rule for `code`.
    #[inline]
    pub fn http_prefix(mut self, code: Code, pattern: impl Into<String>, status: u16) -> Self {
        self.http.add_prefix(code, pattern.into(), status);
        self
    }

    /// Add a gRPC longest-prefix-match rule for `code`.
    #[inline]
    pub fn grpc_prefix(
        mut self,
        code: Code,
        pattern: impl Into<String>,
        status: GrpcCode,
    ) -> Self {
        self.grpc.add_prefix(code, pattern.into(), status);
        self
    }

    /// Replace the HTTP status used for codes with no rule at all.
    #[inline]
    pub fn http_fallback(mut self, status: u16) -> Self {
        self.http.fallback = status;
        self
    }

    /// Replace the gRPC status used for codes with no rule at all.
    #[inline]
    pub fn grpc_fallback(mut self, status: GrpcCode) -> Self {
        self.grpc.fallback = status;
        self
    }

    /// Apply one configuration directive.
    pub fn apply(self, directive: Directive) -> Self {
        use StatusValue::{Grpc, Http};
        match directive {
            Directive::SetDefault { code, status: Http(v) } => self.http_default(code, v),
            Directive::SetDefault { code, status: Grpc(v) } => self.grpc_default(code, v),
            Directive::SetOverride { code, status: Http(v) } => self.http_override(code, v),
            Directive::SetOverride { code, status: Grpc(v) } => self.grpc_override(code, v),
            Directive::AddPrefix {
                code,
                pattern,
                status: Http(v),
            } => self.http_prefix(code, pattern, v),
            Directive::AddPrefix {
                code,
                pattern,
                status: Grpc(v),
            } => self.grpc_prefix(code, pattern, v),
            Directive::SetFallback { status: Http(v) } => self.http_fallback(v),
            Directive::SetFallback { status: Grpc(v) } => self.grpc_fallback(v),
        }
    }

    /// Apply directives in sequence.
    pub fn apply_all(self, directives: impl IntoIterator<Item = Directive>) -> Self {
        directives.into_iter().fold(self, Self::apply)
    }

    /// Rules accumulated so far for HTTP.
    #[inline]
    pub fn http_rules(&self) -> &FamilyRules<u16> {
        &self.http
    }

    /// Rules accumulated so far for gRPC.
    #[inline]
    pub fn grpc_rules(&self) -> &FamilyRules<GrpcCode> {
        &self.grpc
    }

    /// Normalize, validate and freeze the rules into a [`Mapper`].
    ///
    /// # Errors
    ///
    /// [`BuildError::InvalidPrefix`] for the first prefix rule (HTTP before
    /// gRPC, codes in sorted order, rules in insertion order) whose pattern
    /// is empty, malformed or all-wildcard after normalization.
    pub fn build(self) -> Result<Mapper, BuildError> {
        Mapper::compile(self)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_builder_is_seeded_with_builtin_defaults() {
        let b = Builder::new();
        assert_eq!(b.http_rules().default_for(&Code::NOT_FOUND), Some(404));
        assert_eq!(
            b.grpc_rules().default_for(&Code::NOT_FOUND),
            Some(GrpcCode::NotFound)
        );
        assert_eq!(b.http_rules().fallback(), 500);
        assert_eq!(b.grpc_rules().fallback(), GrpcCode::Internal);
        assert_eq!(b.http_rules().prefix_count(), 0);
    }

    #[test]
    fn later_writes_replace_earlier_ones() {
        let b = Builder::new()
            .http_override(Code::CANCELED, 499)
            .http_override(Code::CANCELED, 408)
            .http_default(Code::GONE, 404);
        assert_eq!(b.http_rules().override_for(&Code::CANCELED), Some(408));
        assert_eq!(b.http_rules().default_for(&Code::GONE), Some(404));
        assert_eq!(b.grpc_rules().override_for(&Code::CANCELED), None);
    }

    #[test]
    fn prefix_rules_append_unvalidated() {
        let b = Builder::new()
            .http_prefix(Code::UNAVAILABLE, "storage.pg", 503)
            .http_prefix(Code::UNAVAILABLE, "NOT..VALID", 599);
        let rules = b.http_rules().prefixes_for(&Code::UNAVAILABLE);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].pattern, "NOT..VALID");
        assert!(b.grpc_rules().prefixes_for(&Code::UNAVAILABLE).is_empty());
    }

    #[test]
    fn directives_route_by_family() {
        let b = Builder::new().apply_all([
            Directive::SetOverride {
                code: Code::CANCELED,
                status: StatusValue::Grpc(GrpcCode::Aborted),
            },
            Directive::AddPrefix {
                code: Code::TIMEOUT,
                pattern: "storage.*".into(),
                status: 504.into(),
            },
            Directive::SetFallback {
                status: StatusValue::Http(599),
            },
        ]);
        assert_eq!(
            b.grpc_rules().override_for(&Code::CANCELED),
            Some(GrpcCode::Aborted)
        );
        assert_eq!(b.http_rules().override_for(&Code::CANCELED), None);
        assert_eq!(b.http_rules().prefixes_for(&Code::TIMEOUT).len(), 1);
        assert_eq!(b.http_rules().fallback(), 599);
    }

    #[test]
    fn directive_deserializes_from_json() {
        let d: Directive = serde_json::from_str(
            r#"{"op":"set_default","code":"Rate-Limited","status":{"grpc":"UNAVAILABLE"}}"#,
        )
        .unwrap();
        assert_eq!(
            d,
            Directive::SetDefault {
                code: Code::RATE_LIMITED,
                status: StatusValue::Grpc(GrpcCode::Unavailable),
            }
        );
    }

    #[test]
    fn directive_rejects_malformed_code() {
        let res: Result<Directive, _> = serde_json::from_str(
            r#"{"op":"set_default","code":"x","status":{"http":400}}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn status_value_family() {
        assert_eq!(StatusValue::from(503).family(), Family::Http);
        assert_eq!(StatusValue::from(GrpcCode::Aborted).family(), Family::Grpc);
    }
}
