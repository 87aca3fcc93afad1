//! Resolution of a policy against the model parameter dtype.

use std::fmt;

use serde::Serialize;

use super::PrecisionPolicy;
use crate::error::{PolicyError, Result};
use crate::precision::{FloatDtype, ScalarType};

/// Concrete dtypes for every training buffer, given one model dtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedPrecision {
    /// Dtype of the model compute parameters this was resolved against
    pub model_params: FloatDtype,
    /// Main (optimizer-owned) parameter buffer
    pub main_params: FloatDtype,
    /// Main gradient buffer
    pub main_grads: FloatDtype,
    /// Gradient gather/scatter payload
    pub grad_comm: FloatDtype,
    /// Gradient accumulation buffer
    pub grad_accum: FloatDtype,
}

impl PrecisionPolicy {
    /// Resolve every buffer dtype for a model whose compute parameters are
    /// held in `model_param_dtype`.
    ///
    /// - main params: `main_params_dtype`, else the model dtype
    /// - main grads: `main_grads_dtype`, else the model dtype
    /// - grad comm: `grad_comm_dtype`, else the model dtype
    /// - grad accum: [`grad_reduce_dtype`](Self::grad_reduce_dtype) promoted
    ///   with the resolved main grads
    pub fn resolve(&self, model_param_dtype: FloatDtype) -> ResolvedPrecision {
        let main_grads = self.main_grads_dtype().unwrap_or(model_param_dtype);
        ResolvedPrecision {
            model_params: model_param_dtype,
            main_params: self.main_params_dtype().unwrap_or(model_param_dtype),
            main_grads,
            grad_comm: self.grad_comm_dtype().unwrap_or(model_param_dtype),
            grad_accum: self.grad_reduce_dtype(model_param_dtype).promote(main_grads),
        }
    }

    /// Resolve against a framework dtype tag.
    ///
    /// Fails with [`PolicyError::UnsupportedDtype`] if the tag is not a
    /// floating-point type.
    pub fn resolve_for(&self, model_param_dtype: ScalarType) -> Result<ResolvedPrecision> {
        let model = FloatDtype::try_from(model_param_dtype)?;
        Ok(self.resolve(model))
    }

    /// Resolve against a dtype name such as `"torch.bfloat16"`.
    ///
    /// Unknown and non-float names both fail with
    /// [`PolicyError::UnsupportedDtype`].
    pub fn resolve_named(&self, model_param_dtype: &str) -> Result<ResolvedPrecision> {
        let scalar: ScalarType = model_param_dtype
            .parse()
            .map_err(|_| PolicyError::UnsupportedDtype { dtype: model_param_dtype.to_string() })?;
        self.resolve_for(scalar)
    }

    /// Dtype gradients are reduced at before accumulation.
    ///
    /// This is `grad_accum_dtype` when set, else the resolved main grads
    /// dtype. Accumulation itself happens at this dtype promoted with the main
    /// grads dtype, see [`ResolvedPrecision::grad_accum`].
    pub fn grad_reduce_dtype(&self, model_param_dtype: FloatDtype) -> FloatDtype {
        self.grad_accum_dtype()
            .or(self.main_grads_dtype())
            .unwrap_or(model_param_dtype)
    }
}

impl ResolvedPrecision {
    /// Whether the model compute weights can serve as the main weights,
    /// so no separate main parameter copy is needed.
    pub fn main_params_is_model_buffer(&self) -> bool {
        self.main_params == self.model_params
    }

    /// Whether gradients must be cast away from their native dtype before
    /// gather/scatter.
    pub fn casts_before_comm(&self) -> bool {
        self.grad_comm != self.model_params
    }

    /// Bytes per parameter held by each buffer
    pub fn bytes_per_param(&self) -> BufferFootprint {
        let bytes = |dtype: FloatDtype| dtype.size_bytes() as u64;
        BufferFootprint {
            main_params: bytes(self.main_params),
            main_grads: bytes(self.main_grads),
            grad_comm: bytes(self.grad_comm),
            grad_accum: bytes(self.grad_accum),
        }
    }

    /// Estimated bytes held by each buffer for `num_params` parameters.
    ///
    /// Counts are computed in `u64`; returns `None` if any buffer size
    /// overflows. Estimation only: sharding, padding, and buffer reuse are
    /// not modelled.
    pub fn buffer_bytes(&self, num_params: usize) -> Option<BufferFootprint> {
        let num_params = u64::try_from(num_params).ok()?;
        let per_param = self.bytes_per_param();
        Some(BufferFootprint {
            main_params: per_param.main_params.checked_mul(num_params)?,
            main_grads: per_param.main_grads.checked_mul(num_params)?,
            grad_comm: per_param.grad_comm.checked_mul(num_params)?,
            grad_accum: per_param.grad_accum.checked_mul(num_params)?,
        })
    }
}

impl fmt::Display for ResolvedPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "model={} main_params={} main_grads={} grad_comm={} grad_accum={}",
            self.model_params, self.main_params, self.main_grads, self.grad_comm, self.grad_accum
        )
    }
}

/// Byte counts for the four policy-controlled buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BufferFootprint {
    pub main_params: u64,
    pub main_grads: u64,
    pub grad_comm: u64,
    pub grad_accum: u64,
}

impl BufferFootprint {
    /// Sum over all four buffers, `None` on overflow
    pub fn total(&self) -> Option<u64> {
        self.main_params
            .checked_add(self.main_grads)?
            .checked_add(self.grad_comm)?
            .checked_add(self.grad_accum)
    }
}
