//! Zero-copy views over kernel-owned buffers.

use std::ptr::NonNull;

use amilink_dtype::ScalarType;
use amilink_dtype::ext::HasElementType;
use ndarray::{ArrayViewMut, ArrayViewMutD, IxDyn, ShapeBuilder};
use snafu::ensure;

use crate::error::{InvalidMetadataSnafu, NullValuePointerSnafu, Result};

/// A typed, shaped array aliasing memory allocated and owned by the kernel.
///
/// Nothing is copied: reads see the kernel's current values and writes go
/// straight into the kernel's state. Multi-dimensional views use column-major
/// (Fortran) order, the kernel's native layout, so `view[[i, j]]` is the same
/// element the kernel addresses as `a(i+1, j+1)`.
///
/// # Lifetime contract
///
/// The view borrows the [`crate::KernelAdapter`] it came from mutably, so no
/// other kernel call can be made while it is alive. This is deliberate: any
/// kernel call (most obviously `update` or `finalize`) may reallocate or free
/// the buffer. Drop the view before advancing the kernel and ask for a fresh
/// one afterwards; a view must never be cached across time steps.
#[derive(Debug)]
pub enum ValueView<'a> {
    Float64(ArrayViewMutD<'a, f64>),
    Int32(ArrayViewMutD<'a, i32>),
}

impl<'a> ValueView<'a> {
    pub fn element_type(&self) -> ScalarType {
        match self {
            Self::Float64(_) => ScalarType::Float64,
            Self::Int32(_) => ScalarType::Int32,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Float64(view) => view.shape(),
            Self::Int32(view) => view.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start of the aliased kernel buffer.
    pub fn as_ptr(&self) -> *const u8 {
        match self {
            Self::Float64(view) => view.as_ptr().cast(),
            Self::Int32(view) => view.as_ptr().cast(),
        }
    }

    pub fn as_f64(&self) -> Option<&ArrayViewMutD<'a, f64>> {
        match self {
            Self::Float64(view) => Some(view),
            Self::Int32(_) => None,
        }
    }

    pub fn as_f64_mut(&mut self) -> Option<&mut ArrayViewMutD<'a, f64>> {
        match self {
            Self::Float64(view) => Some(view),
            Self::Int32(_) => None,
        }
    }

    pub fn into_f64(self) -> Option<ArrayViewMutD<'a, f64>> {
        match self {
            Self::Float64(view) => Some(view),
            Self::Int32(_) => None,
        }
    }

    pub fn as_i32(&self) -> Option<&ArrayViewMutD<'a, i32>> {
        match self {
            Self::Int32(view) => Some(view),
            Self::Float64(_) => None,
        }
    }

    pub fn as_i32_mut(&mut self) -> Option<&mut ArrayViewMutD<'a, i32>> {
        match self {
            Self::Int32(view) => Some(view),
            Self::Float64(_) => None,
        }
    }

    pub fn into_i32(self) -> Option<ArrayViewMutD<'a, i32>> {
        match self {
            Self::Int32(view) => Some(view),
            Self::Float64(_) => None,
        }
    }
}

/// Build a column-major view of `shape` over the kernel buffer at `ptr`.
///
/// A null `ptr` is rejected unless the shape holds no elements. Shapes whose
/// byte size does not fit `isize` are rejected before any view is built.
///
/// # Safety
///
/// For `'a`, `ptr` must be valid for reads and writes of `shape.iter().product()`
/// properly aligned elements of `T`, and no access may happen through any
/// other path except by the kernel itself between calls.
pub(crate) unsafe fn column_major<'a, T: HasElementType>(
    name: &str,
    ptr: *mut T,
    shape: &[usize],
) -> Result<ArrayViewMutD<'a, T>> {
    // Zero extents aside, the extents must multiply to a byte size that fits `isize`.
    let nonzero = || shape.iter().filter(|&&extent| extent != 0);
    let addressable = nonzero()
        .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
        .is_some_and(|count| count <= isize::MAX as usize / size_of::<T>());
    if !addressable {
        let count = nonzero().fold(1usize, |acc, &extent| acc.saturating_mul(extent));
        return InvalidMetadataSnafu { name, what: "element count", value: i64::try_from(count).unwrap_or(i64::MAX) }
            .fail();
    }
    let len: usize = shape.iter().product();
    let ptr = if len == 0 {
        NonNull::dangling().as_ptr()
    } else {
        ensure!(!ptr.is_null(), NullValuePointerSnafu { name });
        ptr
    };

    tracing::trace!(
        kernel.variable = name,
        view.element_type = ?T::SCALAR,
        view.shape = ?shape,
        "creating column-major value view"
    );
    // SAFETY: guaranteed by the caller; non-null or dangling for empty shapes.
    Ok(unsafe { ArrayViewMut::from_shape_ptr(IxDyn(shape).f(), ptr) })
}
