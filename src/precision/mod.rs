//! Dtype tags and floating-point precisions
//!
//! Two closed enumerations:
//! - [`ScalarType`] is any tensor element type the framework may report
//!   (floats, integers, bool, complex).
//! - [`FloatDtype`] is the subset a training buffer may be held in, with an
//!   explicit promotion rank:
//!
//! | dtype | bytes | rank |
//! |-------|-------|------|
//! | fp16  | 2     | 0    |
//! | bf16  | 2     | 0    |
//! | fp32  | 4     | 1    |
//! | fp64  | 8     | 2    |
//!
//! ## Example
//!
//! ```
//! use mp_policy::{FloatDtype, ScalarType};
//!
//! let model: ScalarType = "torch.bfloat16".parse().unwrap();
//! let model = FloatDtype::try_from(model).unwrap();
//! assert_eq!(model.promote(FloatDtype::Fp32), FloatDtype::Fp32);
//! assert_eq!(FloatDtype::Bf16.promote(FloatDtype::Fp16), FloatDtype::Bf16);
//! ```

mod precision_types;
mod scalar_type;


pub use precision_types::FloatDtype;
pub use scalar_type::ScalarType;
