//! The kernel function table.
//!
//! A kernel exposes a fixed set of C functions. Every function returns an
//! integer [`Status`] and communicates results through pointers supplied by
//! the caller. [`KernelApi`] mirrors that table one method per function, with
//! the pointers expressed as Rust references and slices:
//!
//! - [`crate::library::SharedLibrary`] - a kernel loaded from a `.so`/`.dll`/`.dylib`
//! - any in-process implementation (used by the test suite)
//!
//! Implementations must not interpret the status; decoding it is the
//! adapter's job. An `Err` from a method means the call could not be made at
//! all (for example the symbol is missing), not that the kernel failed.

use std::ffi::{CStr, c_int};

use crate::Result;

/// Raw status code returned by every kernel function.
pub type Status = c_int;

/// Status reported by a kernel function on success. Anything else is a failure.
pub const SUCCESS: Status = 0;

/// Status used for calls the binding never dispatches to the kernel.
pub const FAILURE: Status = 1;

/// One loaded kernel module.
///
/// String outputs (`get_var_type`, `get_grid_type`) are written NUL-terminated
/// into the provided buffer. Array outputs (`get_var_shape`, `get_grid_shape`,
/// `get_grid_x/y/z`) are written into caller-allocated slices. A kernel
/// decides on its own how much it writes, so these methods are `unsafe`: the
/// slice length is not passed along and cannot bound the write.
pub trait KernelApi {
    /// Read an exported integer variable of the module.
    fn constant_int(&self, name: &str) -> Result<c_int>;

    /// Overwrite an exported integer variable of the module.
    fn set_constant_int(&mut self, name: &str, value: c_int) -> Result<()>;

    fn initialize(&mut self, config_file: &CStr) -> Result<Status>;
    fn update(&mut self) -> Result<Status>;
    fn finalize(&mut self) -> Result<Status>;

    fn get_current_time(&mut self, time: &mut f64) -> Result<Status>;
    fn get_start_time(&mut self, time: &mut f64) -> Result<Status>;
    fn get_end_time(&mut self, time: &mut f64) -> Result<Status>;
    fn get_time_step(&mut self, dt: &mut f64) -> Result<Status>;

    /// # Safety
    ///
    /// `var_type` must hold at least `MAXSTRLEN` bytes.
    unsafe fn get_var_type(&mut self, name: &CStr, var_type: &mut [u8]) -> Result<Status>;
    fn get_var_rank(&mut self, name: &CStr, rank: &mut c_int) -> Result<Status>;
    /// # Safety
    ///
    /// `shape` must hold at least the variable's rank elements.
    unsafe fn get_var_shape(&mut self, name: &CStr, shape: &mut [c_int]) -> Result<Status>;
    fn get_var_itemsize(&mut self, name: &CStr, item_size: &mut c_int) -> Result<Status>;
    fn get_var_nbytes(&mut self, name: &CStr, nbytes: &mut c_int) -> Result<Status>;

    /// Store the address of the kernel-owned `double` buffer of `name` in `ptr`.
    fn get_value_ptr_double(&mut self, name: &CStr, ptr: &mut *mut f64) -> Result<Status>;

    /// Store the address of the kernel-owned `int` buffer of `name` in `ptr`.
    fn get_value_ptr_int(&mut self, name: &CStr, ptr: &mut *mut c_int) -> Result<Status>;

    fn get_grid_rank(&mut self, grid: c_int, rank: &mut c_int) -> Result<Status>;
    /// # Safety
    ///
    /// `grid_type` must hold at least `MAXSTRLEN` bytes.
    unsafe fn get_grid_type(&mut self, grid: c_int, grid_type: &mut [u8]) -> Result<Status>;
    /// # Safety
    ///
    /// `shape` must hold at least the grid's rank elements.
    unsafe fn get_grid_shape(&mut self, grid: c_int, shape: &mut [c_int]) -> Result<Status>;
    /// # Safety
    ///
    /// `x` must hold every x coordinate the kernel reports for `grid`.
    unsafe fn get_grid_x(&mut self, grid: c_int, x: &mut [f64]) -> Result<Status>;
    /// # Safety
    ///
    /// `y` must hold every y coordinate the kernel reports for `grid`.
    unsafe fn get_grid_y(&mut self, grid: c_int, y: &mut [f64]) -> Result<Status>;
    /// # Safety
    ///
    /// `z` must hold every z coordinate the kernel reports for `grid`.
    unsafe fn get_grid_z(&mut self, grid: c_int, z: &mut [f64]) -> Result<Status>;

    fn prepare_time_step(&mut self, dt: f64) -> Result<Status>;
    fn do_time_step(&mut self) -> Result<Status>;
    fn finalize_time_step(&mut self) -> Result<Status>;
    fn get_subcomponent_count(&mut self, count: &mut c_int) -> Result<Status>;
    fn prepare_solve(&mut self, component_id: c_int) -> Result<Status>;
    fn solve(&mut self, component_id: c_int, has_converged: &mut c_int) -> Result<Status>;
    fn finalize_solve(&mut self, component_id: c_int) -> Result<Status>;
}
