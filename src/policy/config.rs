//! The precision policy record and its builder.

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, Result};
use crate::precision::{FloatDtype, ScalarType};

pub(crate) const MAIN_PARAMS_FIELD: &str = "main_params_dtype";
pub(crate) const MAIN_GRADS_FIELD: &str = "main_grads_dtype";
pub(crate) const GRAD_COMM_FIELD: &str = "grad_comm_dtype";
pub(crate) const GRAD_ACCUM_FIELD: &str = "grad_accum_dtype";

/// Dtype assignment for the buffers of sharded mixed-precision training
///
/// Each field is either a concrete precision or unset. Unset means "follow the
/// model parameter dtype" and is resolved against it by
/// [`PrecisionPolicy::resolve`]. Fields are private: a policy never changes
/// after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "super::loader::RawPolicy", into = "super::loader::RawPolicy")]
pub struct PrecisionPolicy {
    main_params_dtype: Option<FloatDtype>,
    main_grads_dtype: Option<FloatDtype>,
    grad_comm_dtype: Option<FloatDtype>,
    grad_accum_dtype: Option<FloatDtype>,
}

impl PrecisionPolicy {
    /// Create a policy from four optional dtype tags.
    ///
    /// `None` unsets the field (it follows the model dtype); it does not
    /// select the fp32 default. Use [`builder`](Self::builder) or
    /// [`Default`] to start from the defaults and override single fields.
    ///
    /// Fails with [`PolicyError::InvalidPrecision`] on the first field that
    /// holds a non-floating-point tag.
    pub fn new(
        main_params_dtype: Option<ScalarType>,
        main_grads_dtype: Option<ScalarType>,
        grad_comm_dtype: Option<ScalarType>,
        grad_accum_dtype: Option<ScalarType>,
    ) -> Result<Self> {
        Self::builder()
            .main_params_dtype(main_params_dtype)
            .main_grads_dtype(main_grads_dtype)
            .grad_comm_dtype(grad_comm_dtype)
            .grad_accum_dtype(grad_accum_dtype)
            .build()
    }

    /// Create a policy from already-validated precisions
    pub const fn from_dtypes(
        main_params_dtype: Option<FloatDtype>,
        main_grads_dtype: Option<FloatDtype>,
        grad_comm_dtype: Option<FloatDtype>,
        grad_accum_dtype: Option<FloatDtype>,
    ) -> Self {
        Self { main_params_dtype, main_grads_dtype, grad_comm_dtype, grad_accum_dtype }
    }

    /// Create a policy from dtype names such as `"bf16"` or `"torch.float32"`.
    ///
    /// As with [`new`](Self::new), `None` unsets the field rather than
    /// selecting the fp32 default; use [`builder`](Self::builder) or
    /// [`Default`] for defaults.
    ///
    /// Unknown names and non-float names both fail with
    /// [`PolicyError::InvalidPrecision`].
    pub fn from_names(
        main_params_dtype: Option<&str>,
        main_grads_dtype: Option<&str>,
        grad_comm_dtype: Option<&str>,
        grad_accum_dtype: Option<&str>,
    ) -> Result<Self> {
        Ok(Self::from_dtypes(
            parse_field(MAIN_PARAMS_FIELD, main_params_dtype)?,
            parse_field(MAIN_GRADS_FIELD, main_grads_dtype)?,
            parse_field(GRAD_COMM_FIELD, grad_comm_dtype)?,
            parse_field(GRAD_ACCUM_FIELD, grad_accum_dtype)?,
        ))
    }

    /// Policy with every field unset: all buffers follow the model dtype.
    pub const fn native() -> Self {
        Self::from_dtypes(None, None, None, None)
    }

    /// Start a builder from the documented defaults
    pub fn builder() -> PrecisionPolicyBuilder {
        PrecisionPolicyBuilder::default()
    }

    /// Main (optimizer-owned) parameter buffer dtype
    pub fn main_params_dtype(&self) -> Option<FloatDtype> {
        self.main_params_dtype
    }

    /// Main gradient buffer dtype
    pub fn main_grads_dtype(&self) -> Option<FloatDtype> {
        self.main_grads_dtype
    }

    /// Gradient gather/scatter communication dtype
    pub fn grad_comm_dtype(&self) -> Option<FloatDtype> {
        self.grad_comm_dtype
    }

    /// Gradient reduction dtype; accumulation may be promoted above it
    pub fn grad_accum_dtype(&self) -> Option<FloatDtype> {
        self.grad_accum_dtype
    }
}

impl Default for PrecisionPolicy {
    /// fp32 main params, fp32 main grads, native grad comm, fp32 grad accum.
    fn default() -> Self {
        Self::from_dtypes(
            Some(FloatDtype::Fp32),
            Some(FloatDtype::Fp32),
            None,
            Some(FloatDtype::Fp32),
        )
    }
}

fn validate_field(field: &str, tag: Option<ScalarType>) -> Result<Option<FloatDtype>> {
    tag.map(|scalar| {
        FloatDtype::try_from(scalar).map_err(|_| PolicyError::invalid_precision(field, scalar))
    })
    .transpose()
}

fn parse_field(field: &str, name: Option<&str>) -> Result<Option<FloatDtype>> {
    name.map(|name| {
        let scalar: ScalarType =
            name.parse().map_err(|_| PolicyError::invalid_precision(field, name))?;
        FloatDtype::try_from(scalar).map_err(|_| PolicyError::invalid_precision(field, name))
    })
    .transpose()
}

/// Builder for [`PrecisionPolicy`]
///
/// Setters take raw dtype tags so that a caller forwarding whatever its
/// framework reports gets the rejection at [`build`](Self::build) time.
#[derive(Debug, Clone, Copy)]
pub struct PrecisionPolicyBuilder {
    main_params_dtype: Option<ScalarType>,
    main_grads_dtype: Option<ScalarType>,
    grad_comm_dtype: Option<ScalarType>,
    grad_accum_dtype: Option<ScalarType>,
}

impl Default for PrecisionPolicyBuilder {
    fn default() -> Self {
        Self {
            main_params_dtype: Some(ScalarType::F32),
            main_grads_dtype: Some(ScalarType::F32),
            grad_comm_dtype: None,
            grad_accum_dtype: Some(ScalarType::F32),
        }
    }
}

impl PrecisionPolicyBuilder {
    /// Set (or unset with `None`) the main parameter dtype
    pub fn main_params_dtype(mut self, dtype: Option<ScalarType>) -> Self {
        self.main_params_dtype = dtype;
        self
    }

    /// Set (or unset with `None`) the main gradient dtype
    pub fn main_grads_dtype(mut self, dtype: Option<ScalarType>) -> Self {
        self.main_grads_dtype = dtype;
        self
    }

    /// Set (or unset with `None`) the gradient communication dtype
    pub fn grad_comm_dtype(mut self, dtype: Option<ScalarType>) -> Self {
        self.grad_comm_dtype = dtype;
        self
    }

    /// Set (or unset with `None`) the gradient reduction dtype
    pub fn grad_accum_dtype(mut self, dtype: Option<ScalarType>) -> Self {
        self.grad_accum_dtype = dtype;
        self
    }

    /// Validate every field and freeze the policy
    pub fn build(self) -> Result<PrecisionPolicy> {
        let policy = PrecisionPolicy::from_dtypes(
            validate_field(MAIN_PARAMS_FIELD, self.main_params_dtype)?,
            validate_field(MAIN_GRADS_FIELD, self.main_grads_dtype)?,
            validate_field(GRAD_COMM_FIELD, self.grad_comm_dtype)?,
            validate_field(GRAD_ACCUM_FIELD, self.grad_accum_dtype)?,
        );
        tracing::debug!(
            main_params = ?policy.main_params_dtype,
            main_grads = ?policy.main_grads_dtype,
            grad_comm = ?policy.grad_comm_dtype,
            grad_accum = ?policy.grad_accum_dtype,
            "built precision policy"
        );
        Ok(policy)
    }
}
