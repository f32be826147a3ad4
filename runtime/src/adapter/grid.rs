//! Grid metadata and coordinates.
//!
//! Coordinate and shape arrays are allocated by the caller and filled by the
//! kernel; the adapter never owns grid memory. Shape buffers are checked
//! against the grid's rank. Coordinate counts are not exposed by the kernel
//! binding, so sizing coordinate buffers is the caller's obligation and the
//! coordinate queries are `unsafe`.

use std::ffi::c_int;

use snafu::ensure;

use crate::error::{BufferTooSmallSnafu, Result};
use crate::kernel::{KernelApi, Status};

use super::{KernelAdapter, decode_string, non_negative};

/// Metadata of one grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDescriptor {
    pub id: i32,
    pub rank: usize,
    pub grid_type: String,
}

fn grid_detail(grid: i32) -> String {
    format!("for id {grid}")
}

impl<K: KernelApi> KernelAdapter<K> {
    pub fn get_grid_rank(&mut self, grid: i32) -> Result<usize> {
        let mut rank = 0;
        self.call("get_grid_rank", || grid_detail(grid), |kernel| kernel.get_grid_rank(grid, &mut rank))?;
        non_negative(&format!("grid {grid}"), "rank", rank)
    }

    pub fn get_grid_type(&mut self, grid: i32) -> Result<String> {
        let mut buffer = self.string_buffer();
        self.call("get_grid_type", || grid_detail(grid), |kernel| {
            // SAFETY: the buffer is MAXSTRLEN bytes long.
            unsafe { kernel.get_grid_type(grid, &mut buffer) }
        })?;
        Ok(decode_string(&buffer))
    }

    /// Fill `shape` with the grid's extents.
    ///
    /// Fails with [`Error::BufferTooSmall`](crate::Error::BufferTooSmall),
    /// without reaching the kernel's shape query, if `shape` is shorter than
    /// the grid's rank.
    pub fn get_grid_shape(&mut self, grid: i32, shape: &mut [c_int]) -> Result<()> {
        let rank = self.get_grid_rank(grid)?;
        ensure!(
            shape.len() >= rank,
            BufferTooSmallSnafu { what: format!("grid {grid} shape"), len: shape.len(), required: rank }
        );
        self.call("get_grid_shape", || grid_detail(grid), |kernel| {
            // SAFETY: `shape` holds at least `rank` extents.
            unsafe { kernel.get_grid_shape(grid, shape) }
        })
    }

    /// Fill `x` with the grid's x coordinates.
    ///
    /// # Safety
    ///
    /// `x` must be long enough for every x coordinate the kernel reports for
    /// `grid`; the kernel writes them without knowing the slice length.
    pub unsafe fn get_grid_x(&mut self, grid: i32, x: &mut [f64]) -> Result<()> {
        // SAFETY: forwarded to the caller.
        self.fill_coordinates("get_grid_x", grid, x, |kernel, grid, x| unsafe { kernel.get_grid_x(grid, x) })
    }

    /// Fill `y` with the grid's y coordinates.
    ///
    /// # Safety
    ///
    /// As for [`KernelAdapter::get_grid_x`], for y coordinates.
    pub unsafe fn get_grid_y(&mut self, grid: i32, y: &mut [f64]) -> Result<()> {
        // SAFETY: forwarded to the caller.
        self.fill_coordinates("get_grid_y", grid, y, |kernel, grid, y| unsafe { kernel.get_grid_y(grid, y) })
    }

    /// Fill `z` with the grid's z coordinates.
    ///
    /// # Safety
    ///
    /// As for [`KernelAdapter::get_grid_x`], for z coordinates.
    pub unsafe fn get_grid_z(&mut self, grid: i32, z: &mut [f64]) -> Result<()> {
        // SAFETY: forwarded to the caller.
        self.fill_coordinates("get_grid_z", grid, z, |kernel, grid, z| unsafe { kernel.get_grid_z(grid, z) })
    }

    /// Query rank and type of `grid`.
    pub fn describe_grid(&mut self, grid: i32) -> Result<GridDescriptor> {
        Ok(GridDescriptor { id: grid, rank: self.get_grid_rank(grid)?, grid_type: self.get_grid_type(grid)? })
    }

    fn fill_coordinates(
        &mut self,
        function: &'static str,
        grid: i32,
        coordinates: &mut [f64],
        fill: impl FnOnce(&mut K, c_int, &mut [f64]) -> Result<Status>,
    ) -> Result<()> {
        self.call(function, || grid_detail(grid), |kernel| fill(kernel, grid, coordinates))
    }
}
