//! Filter implementations attachable to logging rules

pub mod function;
pub mod message;
pub mod sampling;

pub use function::FnFilter;
pub use message::{MessageCondition, MessageFilter};
pub use sampling::{SamplerMetrics, SamplingConfig, SamplingFilter};
