//! Target trait for log output destinations

use super::{error::Result, log_event::LogEvent};
use std::sync::Arc;

/// An output sink that receives the events a rule routes to it.
///
/// Targets are shared between rules and threads, so the trait takes
/// `&self`; implementations guard their own mutable state.
pub trait Target: Send + Sync {
    fn write(&self, event: &LogEvent) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Shared handle to a target. Identity (not name) decides de-duplication.
pub type TargetRef = Arc<dyn Target>;

/// Identity comparison between two target handles
#[inline]
pub fn same_target(a: &TargetRef, b: &TargetRef) -> bool {
    // Data pointers only: vtable pointers are not unique per type.
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
