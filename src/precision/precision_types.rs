//! Floating-point buffer precisions and their promotion order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ScalarType;
use crate::error::PolicyError;

/// Floating-point precision a training buffer can be held in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum FloatDtype {
    /// 16-bit floating point (IEEE half precision)
    Fp16,
    /// 16-bit brain floating point (truncated mantissa)
    Bf16,
    /// 32-bit floating point (default)
    #[default]
    Fp32,
    /// 64-bit floating point
    Fp64,
}

impl FloatDtype {
    /// All supported precisions, narrowest first
    pub const ALL: [FloatDtype; 4] =
        [FloatDtype::Fp16, FloatDtype::Bf16, FloatDtype::Fp32, FloatDtype::Fp64];

    /// Size in bytes
    pub fn size_bytes(&self) -> usize {
        match self {
            FloatDtype::Fp64 => 8,
            FloatDtype::Fp32 => 4,
            FloatDtype::Fp16 | FloatDtype::Bf16 => 2,
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            FloatDtype::Fp16 => "fp16",
            FloatDtype::Bf16 => "bf16",
            FloatDtype::Fp32 => "fp32",
            FloatDtype::Fp64 => "fp64",
        }
    }

    /// Whether this is a reduced precision type
    pub fn is_reduced(&self) -> bool {
        matches!(self, FloatDtype::Fp16 | FloatDtype::Bf16)
    }

    /// Promotion rank. fp16 and bf16 share the half-precision rank.
    pub fn rank(&self) -> u8 {
        match self {
            FloatDtype::Fp16 | FloatDtype::Bf16 => 0,
            FloatDtype::Fp32 => 1,
            FloatDtype::Fp64 => 2,
        }
    }

    /// Promote two precisions to the higher-ranked one.
    ///
    /// Equal ranks return `self` unchanged, so `bf16.promote(fp16)` is `bf16`
    /// and never widens to fp32.
    pub fn promote(self, other: FloatDtype) -> FloatDtype {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for FloatDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<FloatDtype> for ScalarType {
    fn from(dtype: FloatDtype) -> Self {
        match dtype {
            FloatDtype::Fp16 => ScalarType::F16,
            FloatDtype::Bf16 => ScalarType::BF16,
            FloatDtype::Fp32 => ScalarType::F32,
            FloatDtype::Fp64 => ScalarType::F64,
        }
    }
}

impl TryFrom<ScalarType> for FloatDtype {
    type Error = PolicyError;

    fn try_from(scalar: ScalarType) -> Result<Self, Self::Error> {
        match scalar {
            ScalarType::F16 => Ok(FloatDtype::Fp16),
            ScalarType::BF16 => Ok(FloatDtype::Bf16),
            ScalarType::F32 => Ok(FloatDtype::Fp32),
            ScalarType::F64 => Ok(FloatDtype::Fp64),
            other => Err(PolicyError::UnsupportedDtype { dtype: other.name().to_string() }),
        }
    }
}

impl FromStr for FloatDtype {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let scalar: ScalarType = s.parse()?;
        FloatDtype::try_from(scalar)
    }
}

impl TryFrom<String> for FloatDtype {
    type Error = PolicyError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}
