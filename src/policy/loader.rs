//! YAML loading for precision policies.
//!
//! A missing key takes its documented default, an explicit `null` unsets the
//! field, and any other value must be a dtype name:
//!
//! ```yaml
//! main_params_dtype: fp32
//! main_grads_dtype: null      # follow the model dtype
//! grad_comm_dtype: bf16
//! # grad_accum_dtype omitted  -> fp32
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::PrecisionPolicy;
use crate::error::{PolicyError, Result};

/// Unvalidated field values as they appear in a policy file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawPolicy {
    #[serde(default = "default_fp32")]
    main_params_dtype: Option<String>,
    #[serde(default = "default_fp32")]
    main_grads_dtype: Option<String>,
    #[serde(default)]
    grad_comm_dtype: Option<String>,
    #[serde(default = "default_fp32")]
    grad_accum_dtype: Option<String>,
}

fn default_fp32() -> Option<String> {
    Some("fp32".to_string())
}

impl TryFrom<RawPolicy> for PrecisionPolicy {
    type Error = PolicyError;

    fn try_from(raw: RawPolicy) -> Result<Self> {
        PrecisionPolicy::from_names(
            raw.main_params_dtype.as_deref(),
            raw.main_grads_dtype.as_deref(),
            raw.grad_comm_dtype.as_deref(),
            raw.grad_accum_dtype.as_deref(),
        )
    }
}

impl From<PrecisionPolicy> for RawPolicy {
    fn from(policy: PrecisionPolicy) -> Self {
        let name = |dtype: Option<crate::FloatDtype>| dtype.map(|d| d.name().to_string());
        Self {
            main_params_dtype: name(policy.main_params_dtype()),
            main_grads_dtype: name(policy.main_grads_dtype()),
            grad_comm_dtype: name(policy.grad_comm_dtype()),
            grad_accum_dtype: name(policy.grad_accum_dtype()),
        }
    }
}

impl PrecisionPolicy {
    /// Load a policy from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PolicyError::Io {
            context: format!("reading policy file: {}", path.display()),
            source: e,
        })?;

        let policy = parse_yaml(&content, path)?;
        tracing::debug!(
            path = %path.display(),
            policy = %policy.describe(),
            "loaded precision policy"
        );
        Ok(policy)
    }

    /// Parse a policy from a YAML string.
    ///
    /// Syntax errors and unknown keys fail with [`PolicyError::ConfigParsing`];
    /// a well-formed file naming a non-float dtype fails with
    /// [`PolicyError::InvalidPrecision`].
    pub fn from_yaml(content: &str) -> Result<Self> {
        parse_yaml(content, Path::new("<inline>"))
    }

    /// Serialize to YAML; unset fields are written as `null`.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| PolicyError::ConfigParsing {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }

    fn describe(&self) -> String {
        let show = |dtype: Option<crate::FloatDtype>| dtype.map_or("unset", |d| d.name());
        format!(
            "main_params={} main_grads={} grad_comm={} grad_accum={}",
            show(self.main_params_dtype()),
            show(self.main_grads_dtype()),
            show(self.grad_comm_dtype()),
            show(self.grad_accum_dtype()),
        )
    }
}

fn parse_yaml(content: &str, path: &Path) -> Result<PrecisionPolicy> {
    // An empty document is an all-defaults policy.
    let content = if content.trim().is_empty() { "{}" } else { content };
    let raw: RawPolicy = serde_yaml::from_str(content).map_err(|e| PolicyError::ConfigParsing {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    PrecisionPolicy::try_from(raw)
}
