//! Mixed-precision dtype policy for sharded data-parallel training.
//!
//! Describes the precision of the four buffers a sharded optimizer manages
//! (main params, main grads, gradient communication, gradient accumulation)
//! and resolves it against the model's own parameter dtype.
//!
//! - [`precision`]: dtype tags and the float promotion order
//! - [`policy`]: the immutable policy, its builder, YAML loading, resolution
//! - [`error`]: error types with actionable diagnostics

pub mod error;
pub mod policy;
pub mod precision;

pub use error::{PolicyError, Result};
pub use policy::{BufferFootprint, PrecisionPolicy, PrecisionPolicyBuilder, ResolvedPrecision};
pub use precision::{FloatDtype, ScalarType};
