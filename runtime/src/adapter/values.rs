//! Zero-copy access to variable values.
//!
//! The kernel hands out raw pointers to buffers it owns. The adapter's job is
//! only to put the right static type and shape around such a pointer:
//!
//! | rank | element type | result |
//! |------|--------------|--------|
//! | > 0  | `double*`    | column-major `f64` view of the logical shape |
//! | > 0  | `int*`       | column-major `i32` view of the logical shape |
//! | 0    | `int*`       | one-element `i32` view |
//! | 0    | `double*`    | [`Error::UnsupportedScalarType`](crate::Error::UnsupportedScalarType) |
//! | any  | other        | [`Error::UnsupportedVariableType`](crate::Error::UnsupportedVariableType) |

use std::ffi::c_int;

use amilink_dtype::ElementType;

use crate::error::{Result, UnsupportedScalarTypeSnafu, UnsupportedVariableTypeSnafu};
use crate::kernel::KernelApi;
use crate::shape::logical_shape;
use crate::view::{ValueView, column_major};

use super::{KernelAdapter, variable_detail};

impl<K: KernelApi> KernelAdapter<K> {
    /// A view over the kernel's own buffer for `name`.
    ///
    /// The view aliases kernel memory; see [`ValueView`] for how long it
    /// stays valid. It borrows the adapter, so drop it before the next call.
    pub fn get_value_ptr(&mut self, name: &str) -> Result<ValueView<'_>> {
        let rank = self.get_var_rank(name)?;
        if rank == 0 {
            return self.get_value_ptr_scalar(name);
        }

        let type_name = self.get_var_type(name)?;
        let raw_shape = self.get_var_shape(name)?;
        let mut shape = logical_shape(name, &raw_shape)?;
        if shape.is_empty() {
            // All extents zero: an empty array, not a scalar.
            shape.push(0);
        }

        match ElementType::classify(&type_name) {
            ElementType::Float64 => {
                let ptr = self.value_ptr_double(name)?;
                // SAFETY: the kernel guarantees `ptr` addresses a column-major buffer of
                // `shape` doubles that lives until its next call; the returned view
                // borrows `self`, so no further call can happen while it exists.
                Ok(ValueView::Float64(unsafe { column_major(name, ptr, &shape)? }))
            }
            ElementType::Int32 => {
                let ptr = self.value_ptr_int(name)?;
                // SAFETY: as above, for ints.
                Ok(ValueView::Int32(unsafe { column_major(name, ptr, &shape)? }))
            }
            ElementType::Unsupported(type_name) => UnsupportedVariableTypeSnafu { name, type_name }.fail(),
        }
    }

    fn get_value_ptr_scalar(&mut self, name: &str) -> Result<ValueView<'_>> {
        let type_name = self.get_var_type(name)?;
        match ElementType::classify(&type_name) {
            ElementType::Int32 => {
                let ptr = self.value_ptr_int(name)?;
                // SAFETY: a scalar int is a single kernel-owned element; lifetime as above.
                Ok(ValueView::Int32(unsafe { column_major(name, ptr, &[1])? }))
            }
            ElementType::Float64 => UnsupportedScalarTypeSnafu { name, type_name }.fail(),
            ElementType::Unsupported(type_name) => UnsupportedVariableTypeSnafu { name, type_name }.fail(),
        }
    }

    fn value_ptr_double(&mut self, name: &str) -> Result<*mut f64> {
        let c_name = self.c_name(name)?;
        let mut ptr = std::ptr::null_mut();
        self.call("get_value_ptr_double", || variable_detail(name), |kernel| {
            kernel.get_value_ptr_double(&c_name, &mut ptr)
        })?;
        Ok(ptr)
    }

    fn value_ptr_int(&mut self, name: &str) -> Result<*mut c_int> {
        let c_name = self.c_name(name)?;
        let mut ptr = std::ptr::null_mut();
        self.call("get_value_ptr_int", || variable_detail(name), |kernel| kernel.get_value_ptr_int(&c_name, &mut ptr))?;
        Ok(ptr)
    }
}
