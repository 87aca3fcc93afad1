//! Mixed-precision buffer policy
//!
//! A [`PrecisionPolicy`] says which precision each buffer of sharded
//! data-parallel training is held in:
//!
//! | field               | default | buffer                          |
//! |---------------------|---------|---------------------------------|
//! | `main_params_dtype` | fp32    | optimizer-owned main weights    |
//! | `main_grads_dtype`  | fp32    | main gradients                  |
//! | `grad_comm_dtype`   | unset   | gradient gather/scatter payload |
//! | `grad_accum_dtype`  | fp32    | gradient reduction              |
//!
//! Unset fields follow the model parameter dtype, which is only known when
//! the engine sets up its buffers. [`PrecisionPolicy::resolve`] turns the
//! policy plus that dtype into a [`ResolvedPrecision`] with no unset fields.
//!
//! ## Example
//!
//! ```
//! use mp_policy::{FloatDtype, PrecisionPolicy, ScalarType};
//!
//! let policy = PrecisionPolicy::builder()
//!     .main_grads_dtype(None)
//!     .grad_comm_dtype(Some(ScalarType::BF16))
//!     .build()
//!     .unwrap();
//!
//! let resolved = policy.resolve(FloatDtype::Bf16);
//! assert_eq!(resolved.main_params, FloatDtype::Fp32);
//! assert_eq!(resolved.main_grads, FloatDtype::Bf16);
//! assert_eq!(resolved.grad_comm, FloatDtype::Bf16);
//! // Reduced in fp32, so accumulated in fp32.
//! assert_eq!(resolved.grad_accum, FloatDtype::Fp32);
//! ```

mod config;
mod loader;
mod resolve;


pub use config::{PrecisionPolicy, PrecisionPolicyBuilder};
pub use resolve::{BufferFootprint, ResolvedPrecision};
