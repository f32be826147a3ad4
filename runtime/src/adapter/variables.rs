//! Variable metadata.
//!
//! Every query is one kernel call; nothing is cached, because a kernel may
//! change a variable's shape (and buffer) between time steps.

use std::ffi::c_int;

use amilink_dtype::ElementType;

use crate::error::Result;
use crate::kernel::KernelApi;
use crate::shape::{Shape, logical_shape};

use super::{KernelAdapter, decode_string, non_negative, variable_detail};

/// Metadata of one variable, assembled from individual kernel queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDescriptor {
    pub name: String,
    /// 0 for scalars.
    pub rank: usize,
    /// Shape as reported by the kernel, including zero padding.
    pub shape: Vec<c_int>,
    pub element_type: ElementType,
    pub item_size: usize,
    pub nbytes: usize,
}

impl VariableDescriptor {
    /// The shape with its zero padding stripped.
    pub fn logical_shape(&self) -> Result<Shape> {
        logical_shape(&self.name, &self.shape)
    }
}

impl<K: KernelApi> KernelAdapter<K> {
    /// Number of dimensions of `name` (0 for scalars).
    pub fn get_var_rank(&mut self, name: &str) -> Result<usize> {
        let c_name = self.c_name(name)?;
        let mut rank = 0;
        self.call("get_var_rank", || variable_detail(name), |kernel| kernel.get_var_rank(&c_name, &mut rank))?;
        non_negative(name, "rank", rank)
    }

    /// The type string the kernel reports for `name`, e.g. `"DOUBLE PRECISION"`.
    pub fn get_var_type(&mut self, name: &str) -> Result<String> {
        let c_name = self.c_name(name)?;
        let mut buffer = self.string_buffer();
        self.call("get_var_type", || variable_detail(name), |kernel| {
            // SAFETY: the buffer is MAXSTRLEN bytes long.
            unsafe { kernel.get_var_type(&c_name, &mut buffer) }
        })?;
        Ok(decode_string(&buffer))
    }

    /// The classified element type of `name`.
    pub fn get_var_element_type(&mut self, name: &str) -> Result<ElementType> {
        Ok(ElementType::classify(&self.get_var_type(name)?))
    }

    /// The raw shape of `name`: `rank` extents as the kernel reports them.
    ///
    /// Zero padding is kept; see [`crate::shape::trim_shape`].
    pub fn get_var_shape(&mut self, name: &str) -> Result<Vec<c_int>> {
        let rank = self.get_var_rank(name)?;
        let c_name = self.c_name(name)?;
        let mut shape = vec![0; rank];
        self.call("get_var_shape", || variable_detail(name), |kernel| {
            // SAFETY: the buffer holds `rank` extents, as just reported by the kernel.
            unsafe { kernel.get_var_shape(&c_name, &mut shape) }
        })?;
        Ok(shape)
    }

    /// Size of one element of `name` in bytes.
    pub fn get_var_itemsize(&mut self, name: &str) -> Result<usize> {
        let c_name = self.c_name(name)?;
        let mut item_size = 0;
        self.call("get_var_itemsize", || variable_detail(name), |kernel| {
            kernel.get_var_itemsize(&c_name, &mut item_size)
        })?;
        non_negative(name, "item size", item_size)
    }

    /// Total size of `name` in bytes.
    pub fn get_var_nbytes(&mut self, name: &str) -> Result<usize> {
        let c_name = self.c_name(name)?;
        let mut nbytes = 0;
        self.call("get_var_nbytes", || variable_detail(name), |kernel| kernel.get_var_nbytes(&c_name, &mut nbytes))?;
        non_negative(name, "byte size", nbytes)
    }

    /// Query all metadata of `name`.
    pub fn describe_variable(&mut self, name: &str) -> Result<VariableDescriptor> {
        Ok(VariableDescriptor {
            name: name.to_string(),
            rank: self.get_var_rank(name)?,
            shape: self.get_var_shape(name)?,
            element_type: self.get_var_element_type(name)?,
            item_size: self.get_var_itemsize(name)?,
            nbytes: self.get_var_nbytes(name)?,
        })
    }
}
