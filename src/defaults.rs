//! Built-in status tables for the well-known codes.
//!
//! # Taxonomy & Governance
//!
//! These tables are the library-level defaults every [`Builder`](crate::Builder)
//! starts from. They are process-wide constant data: callers adjust them per
//! build with `http_default` / `grpc_default`, never by mutating the tables.
//!
//! The HTTP side stays close to common REST conventions; the gRPC side uses
//! the canonical status that best preserves the code's meaning (gRPC has no
//! 410, so `gone` maps to `NOT_FOUND`).
//!
//! Any change to a mapping is a behavior change for every consumer and must
//! bump [`DEFAULTS_VERSION`].

use crate::code::Code;
use crate::grpc::GrpcCode;

/// Version of the built-in tables.
pub const DEFAULTS_VERSION: u32 = 1;

/// HTTP fallback for a code with no rule at all.
pub const FALLBACK_HTTP: u16 = 500;

/// gRPC fallback for a code with no rule at all.
pub const FALLBACK_GRPC: GrpcCode = GrpcCode::Internal;

/// Built-in HTTP status per well-known code.
pub static HTTP_DEFAULTS: &[(Code, u16)] = &[
    // 5xx - server / dependency / transient
    (Code::INTERNAL, 500),
    (Code::UNAVAILABLE, 503),
    (Code::NOT_READY, 503),
    (Code::DRAINING, 503),
    (Code::OVERLOADED, 503),
    (Code::DEPENDENCY_FAILED, 502),
    (Code::TIMEOUT, 504),
    // 499 (client closed request) is the usual alternative
    (Code::CANCELED, 408),
    // 4xx - client / protocol / resource
    (Code::INVALID, 400),
    (Code::MISSING, 400),
    (Code::UNSUPPORTED, 400),
    (Code::EXPIRED, 400),
    (Code::DEPRECATION_REJECTED, 400),
    (Code::TOO_EARLY, 425),
    (Code::NOT_FOUND, 404),
    (Code::GONE, 410),
    // conflicts and concurrency
    (Code::ALREADY_EXISTS, 409),
    (Code::CONFLICT, 409),
    (Code::STALE_VERSION, 409),
    (Code::PRECONDITION_FAILED, 412),
    // authn / authz
    (Code::UNAUTHENTICATED, 401),
    (Code::INVALID_CREDENTIALS, 401),
    (Code::TOKEN_INVALID, 401),
    (Code::TOKEN_EXPIRED, 401),
    (Code::TOKEN_REVOKED, 401),
    (Code::SESSION_EXPIRED, 401),
    (Code::PERMISSION_DENIED, 403),
    // rate / quota
    (Code::THROTTLED, 429),
    (Code::RATE_LIMITED, 429),
    (Code::QUOTA_EXCEEDED, 429),
];

/// Built-in gRPC status per well-known code.
pub static GRPC_DEFAULTS: &[(Code, GrpcCode)] = &[
    (Code::INTERNAL, GrpcCode::Internal),
    // input / preconditions / protocol
    (Code::INVALID, GrpcCode::InvalidArgument),
    (Code::MISSING, GrpcCode::InvalidArgument),
    (Code::UNSUPPORTED, GrpcCode::InvalidArgument),
    (Code::PRECONDITION_FAILED, GrpcCode::FailedPrecondition),
    (Code::DEPENDENCY_FAILED, GrpcCode::FailedPrecondition),
    (Code::EXPIRED, GrpcCode::FailedPrecondition),
    (Code::TOO_EARLY, GrpcCode::FailedPrecondition),
    // resource state / versioning
    (Code::NOT_FOUND, GrpcCode::NotFound),
    (Code::GONE, GrpcCode::NotFound),
    (Code::DEPRECATION_REJECTED, GrpcCode::FailedPrecondition),
    // conflicts / concurrency
    (Code::ALREADY_EXISTS, GrpcCode::AlreadyExists),
    (Code::CONFLICT, GrpcCode::Aborted),
    (Code::STALE_VERSION, GrpcCode::Aborted),
    // authn / authz
    (Code::UNAUTHENTICATED, GrpcCode::Unauthenticated),
    (Code::INVALID_CREDENTIALS, GrpcCode::Unauthenticated),
    (Code::TOKEN_INVALID, GrpcCode::Unauthenticated),
    (Code::TOKEN_EXPIRED, GrpcCode::Unauthenticated),
    (Code::TOKEN_REVOKED, GrpcCode::Unauthenticated),
    (Code::SESSION_EXPIRED, GrpcCode::Unauthenticated),
    (Code::PERMISSION_DENIED, GrpcCode::PermissionDenied),
    // availability / load / lifecycle
    (Code::UNAVAILABLE, GrpcCode::Unavailable),
    (Code::NOT_READY, GrpcCode::Unavailable),
    (Code::DRAINING, GrpcCode::Unavailable),
    (Code::OVERLOADED, GrpcCode::Unavailable),
    // time / cancellation
    (Code::TIMEOUT, GrpcCode::DeadlineExceeded),
    (Code::CANCELED, GrpcCode::Canceled),
    // rate / quota
    (Code::THROTTLED, GrpcCode::ResourceExhausted),
    (Code::RATE_LIMITED, GrpcCode::ResourceExhausted),
    (Code::QUOTA_EXCEEDED, GrpcCode::ResourceExhausted),
];
