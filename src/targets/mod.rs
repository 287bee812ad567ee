//! Target implementations

pub mod async_wrapper;
pub mod console;
pub mod memory;

pub use async_wrapper::{
    AsyncTargetMetrics, AsyncTargetWrapper, AsyncTargetWrapperBuilder, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use console::ConsoleTarget;
pub use memory::MemoryTarget;
