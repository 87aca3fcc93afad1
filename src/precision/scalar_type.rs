//! Tensor element type tags.

use std::fmt;
use std::str::FromStr;

use crate::error::PolicyError;

/// Element type of a tensor, as reported by the training framework.
///
/// Only the floating-point tags are valid buffer precisions; the rest exist so
/// that a caller can hand over whatever dtype its model actually carries and
/// get a typed rejection instead of a silent cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    F64,
    F32,
    F16,
    BF16,
    I64,
    I32,
    I16,
    I8,
    U8,
    Bool,
    Complex64,
    Complex128,
}

impl ScalarType {
    /// Canonical short name
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::F64 => "fp64",
            ScalarType::F32 => "fp32",
            ScalarType::F16 => "fp16",
            ScalarType::BF16 => "bf16",
            ScalarType::I64 => "int64",
            ScalarType::I32 => "int32",
            ScalarType::I16 => "int16",
            ScalarType::I8 => "int8",
            ScalarType::U8 => "uint8",
            ScalarType::Bool => "bool",
            ScalarType::Complex64 => "complex64",
            ScalarType::Complex128 => "complex128",
        }
    }

    /// Whether this is a real floating-point type
    pub fn is_floating_point(&self) -> bool {
        matches!(self, ScalarType::F64 | ScalarType::F32 | ScalarType::F16 | ScalarType::BF16)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ScalarType {
    type Err = PolicyError;

    /// Parse a dtype name. Accepts short names (`bf16`), long names
    /// (`bfloat16`), and framework-qualified names (`torch.bfloat16`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let bare = lower.strip_prefix("torch.").unwrap_or(&lower);
        match bare {
            "fp64" | "f64" | "float64" | "double" => Ok(ScalarType::F64),
            "fp32" | "f32" | "float32" | "float" => Ok(ScalarType::F32),
            "fp16" | "f16" | "float16" | "half" => Ok(ScalarType::F16),
            "bf16" | "bfloat16" => Ok(ScalarType::BF16),
            "int64" | "i64" | "long" => Ok(ScalarType::I64),
            "int32" | "i32" | "int" => Ok(ScalarType::I32),
            "int16" | "i16" | "short" => Ok(ScalarType::I16),
            "int8" | "i8" => Ok(ScalarType::I8),
            "uint8" | "u8" => Ok(ScalarType::U8),
            "bool" => Ok(ScalarType::Bool),
            "complex64" | "c64" | "cfloat" => Ok(ScalarType::Complex64),
            "complex128" | "c128" | "cdouble" => Ok(ScalarType::Complex128),
            _ => Err(PolicyError::UnknownDtype { name: s.to_string() }),
        }
    }
}
