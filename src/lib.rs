//! # Palisade Status
//!
//! Deterministic mapping from error categories and reasons to transport
//! statuses.
//!
//! A classified failure carries a coarse [`Code`] (`"unavailable"`) and an
//! optional hierarchical [`Reason`] (`"storage.pg.connect_timeout"`). This
//! crate resolves that pair into an HTTP status and a gRPC status, once per
//! failure, on every request path of a service.
//!
//! ## Design Philosophy
//!
//! 1. **Build once, read forever**: rules are compiled into an immutable
//!    [`Mapper`] snapshot; reload means building a new one
//! 2. **Resolution is total**: every `(code, reason)` pair yields a status
//! 3. **Resolution is cheap**: no allocation, no locks, no I/O on lookup
//! 4. **Configuration errors surface at build time**, never per request
//! 5. **Every answer is explainable** through a fixed-format trace
//!
//! ## Precedence
//!
//! Per output family, the first tier that produces a value wins:
//!
//! 1. exact override for the code
//! 2. longest reason-prefix match (segment-aligned, `*` matches one segment)
//! 3. per-code default (seeded from [`defaults`])
//! 4. global fallback (500 / `INTERNAL`)
//!
//! ## Quick Start
//!
//! ```rust
//! use palisade_status::{Code, GrpcCode, Mapper, Reason};
//!
//! let mapper = Mapper::builder()
//!     .http_prefix(Code::UNAVAILABLE, "storage.pg", 503)
//!     .http_override(Code::CANCELED, 408)
//!     .build()
//!     .expect("static rules are valid");
//!
//! let reason = Reason::parse("storage.pg.connect_timeout").unwrap();
//! let status = mapper.status(&Code::UNAVAILABLE, &reason);
//! assert_eq!(status.http, 503);
//! assert_eq!(status.grpc, GrpcCode::Unavailable);
//!
//! // code="unavailable" reason="storage.pg.connect_timeout"
//! // http: source=prefix pattern="storage.pg" -> 503
//! // grpc: source=default -> UNAVAILABLE(14)
//! println!("{}", mapper.explanation(&Code::UNAVAILABLE, &reason));
//! ```
//!
//! ## Configuration Reload
//!
//! ```rust
//! use palisade_status::{Code, Directive, Reason, SharedMapper, StatusMapper, StatusValue};
//!
//! let shared = SharedMapper::default();
//! shared
//!     .reload([Directive::SetOverride {
//!         code: Code::CANCELED,
//!         status: StatusValue::Http(499),
//!     }])
//!     .unwrap();
//! assert_eq!(shared.http_status(&Code::CANCELED, &Reason::EMPTY), 499);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod code;
pub mod defaults;
pub mod error;
pub mod explain;
pub mod grpc;
pub mod mapper;
pub mod reason;
pub mod rules;
pub mod shared;
pub mod trie;

pub use code::Code;
pub use error::{BuildError, CodeError, PatternError, ReasonError};
pub use explain::{Explanation, Resolution, Source};
pub use grpc::GrpcCode;
pub use mapper::{Mapper, Status, StatusMapper};
pub use reason::Reason;
pub use rules::{Builder, Directive, Family, FamilyRules, PrefixRule, StatusValue};
pub use shared::SharedMapper;
pub use trie::SegmentTrie;
