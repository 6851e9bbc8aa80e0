//! Reloadable holder for the current [`Mapper`] snapshot.
//!
//! Readers are wait-free: a lookup loads the current snapshot through
//! [`ArcSwap`] and resolves against it without taking a lock. A reload
//! builds an entirely new snapshot first and swaps it in only if the build
//! succeeded; snapshots already handed out stay valid until their last
//! `Arc` is dropped.

use crate::code::Code;
use crate::error::BuildError;
use crate::grpc::GrpcCode;
use crate::mapper::{Mapper, Status, StatusMapper};
use crate::reason::Reason;
use crate::rules::{Builder, Directive};
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Atomically swappable [`Mapper`].
#[derive(Debug)]
pub struct SharedMapper {
    current: ArcSwap<Mapper>,
}

impl SharedMapper {
    /// Wrap an initial snapshot.
    pub fn new(mapper: Mapper) -> Self {
        Self {
            current: ArcSwap::from_pointee(mapper),
        }
    }

    /// Current snapshot.
    ///
    /// Hold the returned `Arc` for the duration of a request to get a
    /// consistent view across several lookups.
    #[inline]
    pub fn load(&self) -> Arc<Mapper> {
        self.current.load_full()
    }

    /// Install `mapper` and return the snapshot it replaced.
    pub fn replace(&self, mapper: Mapper) -> Arc<Mapper> {
        let previous = self.current.swap(Arc::new(mapper));
        tracing::info!("status mapper replaced");
        previous
    }

    /// Build a snapshot from `directives` on top of the built-in defaults
    /// and install it.
    ///
    /// # Errors
    ///
    /// Returns the [`BuildError`] and leaves the current snapshot in place if
    /// any rule is rejected.
    pub fn reload(
        &self,
        directives: impl IntoIterator<Item = Directive>,
    ) -> Result<(), BuildError> {
        self.reload_from(Builder::new().apply_all(directives))
    }

    /// Like [`reload`](Self::reload), for an already populated builder.
    ///
    /// # Errors
    ///
    /// Same as [`reload`](Self::reload).
    pub fn reload_from(&self, builder: Builder) -> Result<(), BuildError> {
        match builder.build() {
            Ok(mapper) => {
                self.current.store(Arc::new(mapper));
                tracing::info!("status mapper reloaded");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "status mapper reload rejected, keeping current rules");
                Err(err)
            }
        }
    }
}

impl Default for SharedMapper {
    fn default() -> Self {
        Self::new(Mapper::default())
    }
}

impl From<Mapper> for SharedMapper {
    fn from(mapper: Mapper) -> Self {
        Self::new(mapper)
    }
}

impl StatusMapper for SharedMapper {
    #[inline]
    fn http_status(&self, code: &Code, reason: &Reason) -> u16 {
        self.current.load().http_status(code, reason)
    }

    #[inline]
    fn grpc_status(&self, code: &Code, reason: &Reason) -> GrpcCode {
        self.current.load().grpc_status(code, reason)
    }

    /// Both families resolved against a single loaded snapshot.
    #[inline]
    fn status(&self, code: &Code, reason: &Reason) -> Status {
        self.current.load().status(code, reason)
    }

    fn explain(&self, code: &Code, reason: &Reason) -> String {
        self.current.load().explanation(code, reason).to_string()
    }
}
