//! Element types of kernel variables.
//!
//! Kernels report the type of a variable as a free-form string (for example
//! `"DOUBLE PRECISION"` or `"INTEGER"`). [`ElementType::classify`] is the single
//! place that turns such a string into a tagged variant, so every consumer
//! matches exhaustively instead of re-testing prefixes.

use std::fmt;

use strum::VariantArray;

pub mod ext;

#[cfg(any(test, feature = "proptest"))]
pub mod proptest_gen;


/// Numeric element types a value view can be built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::EnumCount, strum::EnumIter, strum::VariantArray)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
pub enum ScalarType {
    /// IEEE 754 double precision.
    Float64,
    /// Signed 32-bit integer (Fortran default `INTEGER`).
    Int32,
}

impl ScalarType {
    /// Lower-case prefix of the kernel type strings that map to this type.
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Float64 => "double",
            Self::Int32 => "int",
        }
    }

    pub const fn bytes(&self) -> usize {
        match self {
            Self::Float64 => 8,
            Self::Int32 => 4,
        }
    }
}

/// Element type of a kernel variable, as classified from its type string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    Float64,
    Int32,
    /// The kernel reported a type no value view exists for. Keeps the raw string.
    Unsupported(String),
}

impl ElementType {
    /// Classify a kernel-reported type string.
    ///
    /// Matching is a case-insensitive prefix test: `"DOUBLE PRECISION"` and
    /// `"double"` are [`ElementType::Float64`], `"INTEGER"` and `"int"` are
    /// [`ElementType::Int32`]. Anything else is kept verbatim in
    /// [`ElementType::Unsupported`].
    pub fn classify(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        ScalarType::VARIANTS
            .iter()
            .find(|scalar| lower.starts_with(scalar.prefix()))
            .map_or_else(|| Self::Unsupported(raw.to_string()), |scalar| Self::from(*scalar))
    }

    /// The numeric type, if this element type is supported.
    pub fn scalar(&self) -> Option<ScalarType> {
        match self {
            Self::Float64 => Some(ScalarType::Float64),
            Self::Int32 => Some(ScalarType::Int32),
            Self::Unsupported(_) => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.scalar().is_some()
    }

    /// Size of one element in bytes, `None` for unsupported types.
    pub fn bytes(&self) -> Option<usize> {
        self.scalar().map(|s| s.bytes())
    }
}

impl From<ScalarType> for ElementType {
    fn from(scalar: ScalarType) -> Self {
        match scalar {
            ScalarType::Float64 => Self::Float64,
            ScalarType::Int32 => Self::Int32,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float64 => f.write_str("float64"),
            Self::Int32 => f.write_str("int32"),
            Self::Unsupported(raw) => write!(f, "unsupported({raw})"),
        }
    }
}
