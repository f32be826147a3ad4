//! Kernel-reported shapes.
//!
//! Kernels report a variable's shape as `rank` integers and may pad unused
//! dimensions with zeros. The logical shape is what remains after stripping
//! the zero padding from both ends: `[0, 10, 5]` is a 10x5 array.

use std::ffi::c_int;

use smallvec::SmallVec;

use crate::error::{InvalidMetadataSnafu, Result};

/// Logical shape of a variable (stack-allocated up to 4 dimensions).
pub type Shape = SmallVec<[usize; 4]>;

/// Strip leading and trailing zero extents.
///
/// Idempotent; a shape without zero ends is returned unchanged and an
/// all-zero shape trims to the empty slice.
pub fn trim_shape(shape: &[c_int]) -> &[c_int] {
    let Some(start) = shape.iter().position(|&extent| extent != 0) else {
        return &[];
    };
    let end = shape.iter().rposition(|&extent| extent != 0).map_or(start, |last| last + 1);
    &shape[start..end]
}

/// Trim `raw` and convert it to extents, rejecting negative values.
pub fn logical_shape(name: &str, raw: &[c_int]) -> Result<Shape> {
    trim_shape(raw)
        .iter()
        .map(|&extent| {
            usize::try_from(extent)
                .map_err(|_| InvalidMetadataSnafu { name, what: "extent", value: i64::from(extent) }.build())
        })
        .collect()
}
