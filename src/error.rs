//! Error types with actionable diagnostics.
//!
//! Every error names the offending field or dtype and suggests what to do
//! about it, so a misconfigured policy can be fixed without reading the docs.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;

/// Errors raised while building, loading, or resolving a precision policy.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// A policy field was given a dtype that is not a floating-point precision.
    #[error("Invalid precision for '{field}': {value}\n  → Use one of: fp16, bf16, fp32, fp64, or leave the field unset")]
    InvalidPrecision { field: String, value: String },

    /// The model parameter dtype supplied at resolution time is not a float.
    #[error("Unsupported model parameter dtype: {dtype}\n  → Model compute parameters must be fp16, bf16, fp32, or fp64")]
    UnsupportedDtype { dtype: String },

    /// A dtype name matched no known tag.
    #[error("Unknown dtype name: '{name}'\n  → Try a name like 'fp32', 'bfloat16', or 'torch.float16'")]
    UnknownDtype { name: String },

    /// Policy file has invalid syntax or unknown keys.
    #[error("Invalid policy configuration in {path}:\n  {message}\n  → Check YAML syntax and field names (main_params_dtype, main_grads_dtype, grad_comm_dtype, grad_accum_dtype)")]
    ConfigParsing { path: PathBuf, message: String },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PolicyError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Build an `InvalidPrecision` error for a policy field.
    pub(crate) fn invalid_precision(field: &str, value: impl ToString) -> Self {
        Self::InvalidPrecision { field: field.to_string(), value: value.to_string() }
    }

    /// Check if this error is caused by user configuration.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPrecision { .. } => "P001",
            Self::UnsupportedDtype { .. } => "P002",
            Self::UnknownDtype { .. } => "P003",
            Self::ConfigParsing { .. } => "P010",
            Self::Io { .. } => "P020",
        }
    }
}
