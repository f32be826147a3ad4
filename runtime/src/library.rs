//! Kernels loaded from a shared library.
//!
//! Functions are looked up by their fixed export name on every call, so a
//! kernel that only implements part of the table (for example no AMI
//! extension) still loads; calling a missing function fails with
//! [`crate::Error::SymbolNotFound`].

use std::ffi::{CStr, c_char, c_int};
use std::path::{Path, PathBuf};

use snafu::ResultExt;

use crate::error::{LibraryLoadSnafu, Result, SymbolNotFoundSnafu};
use crate::kernel::{KernelApi, Status};

/// Resolve `name` as a kernel function of the given C signature and call it.
macro_rules! kernel_call {
    ($lib:ident . $name:ident ( $($arg:expr => $ty:ty),* $(,)? )) => {{
        type KernelFn = unsafe extern "C" fn($($ty),*) -> Status;
        // SAFETY: KernelFn is the signature of this entry in the kernel function table.
        let function = unsafe { $lib.function::<KernelFn>(stringify!($name))? };
        tracing::trace!(kernel.function = stringify!($name), "calling kernel");
        // SAFETY: every pointer argument refers to live memory sized as the table requires.
        Ok(unsafe { function($($arg),*) })
    }};
}

/// A kernel module opened with `dlopen`/`LoadLibrary`.
pub struct SharedLibrary {
    path: PathBuf,
    /// Unloaded on drop; no pointer obtained from the module may outlive it.
    library: libloading::Library,
}

impl SharedLibrary {
    /// Open the kernel module at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // SAFETY: loading runs the module's initialization routines. The caller
        // vouches for the module by configuring it as the kernel.
        let library = unsafe { libloading::Library::new(&path) }.context(LibraryLoadSnafu { path: path.clone() })?;

        tracing::debug!(kernel.path = %path.display(), "kernel library loaded");
        Ok(Self { path, library })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up an exported function.
    ///
    /// # Safety
    ///
    /// `T` must be an `extern "C"` function pointer type matching the export.
    unsafe fn function<T: Copy>(&self, name: &'static str) -> Result<T> {
        let symbol: libloading::Symbol<'_, T> = unsafe { self.library.get(name.as_bytes()) }
            .map_err(|e| SymbolNotFoundSnafu { name, reason: e.to_string() }.build())?;
        Ok(*symbol)
    }

    /// Address of an exported `int` variable.
    fn int_variable(&self, name: &str) -> Result<*mut c_int> {
        // SAFETY: data symbols are looked up as pointers to the variable.
        let symbol: libloading::Symbol<'_, *mut c_int> = unsafe { self.library.get(name.as_bytes()) }
            .map_err(|e| SymbolNotFoundSnafu { name, reason: e.to_string() }.build())?;
        Ok(*symbol)
    }
}

impl std::fmt::Debug for SharedLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedLibrary").field("path", &self.path).finish_non_exhaustive()
    }
}

impl KernelApi for SharedLibrary {
    fn constant_int(&self, name: &str) -> Result<c_int> {
        let variable = self.int_variable(name)?;
        // SAFETY: the symbol is an `int` living as long as the module.
        Ok(unsafe { variable.read() })
    }

    fn set_constant_int(&mut self, name: &str, value: c_int) -> Result<()> {
        let variable = self.int_variable(name)?;
        // SAFETY: as above; the module is not accessed concurrently.
        unsafe { variable.write(value) };
        Ok(())
    }

    fn initialize(&mut self, config_file: &CStr) -> Result<Status> {
        kernel_call!(self.initialize(config_file.as_ptr() => *const c_char))
    }

    fn update(&mut self) -> Result<Status> {
        kernel_call!(self.update())
    }

    fn finalize(&mut self) -> Result<Status> {
        kernel_call!(self.finalize())
    }

    fn get_current_time(&mut self, time: &mut f64) -> Result<Status> {
        kernel_call!(self.get_current_time(time as *mut f64 => *mut f64))
    }

    fn get_start_time(&mut self, time: &mut f64) -> Result<Status> {
        kernel_call!(self.get_start_time(time as *mut f64 => *mut f64))
    }

    fn get_end_time(&mut self, time: &mut f64) -> Result<Status> {
        kernel_call!(self.get_end_time(time as *mut f64 => *mut f64))
    }

    fn get_time_step(&mut self, dt: &mut f64) -> Result<Status> {
        kernel_call!(self.get_time_step(dt as *mut f64 => *mut f64))
    }

    unsafe fn get_var_type(&mut self, name: &CStr, var_type: &mut [u8]) -> Result<Status> {
        kernel_call!(self.get_var_type(
            name.as_ptr() => *const c_char,
            var_type.as_mut_ptr().cast::<c_char>() => *mut c_char,
        ))
    }

    fn get_var_rank(&mut self, name: &CStr, rank: &mut c_int) -> Result<Status> {
        kernel_call!(self.get_var_rank(name.as_ptr() => *const c_char, rank as *mut c_int => *mut c_int))
    }

    unsafe fn get_var_shape(&mut self, name: &CStr, shape: &mut [c_int]) -> Result<Status> {
        kernel_call!(self.get_var_shape(name.as_ptr() => *const c_char, shape.as_mut_ptr() => *mut c_int))
    }

    fn get_var_itemsize(&mut self, name: &CStr, item_size: &mut c_int) -> Result<Status> {
        kernel_call!(self.get_var_itemsize(name.as_ptr() => *const c_char, item_size as *mut c_int => *mut c_int))
    }

    fn get_var_nbytes(&mut self, name: &CStr, nbytes: &mut c_int) -> Result<Status> {
        kernel_call!(self.get_var_nbytes(name.as_ptr() => *const c_char, nbytes as *mut c_int => *mut c_int))
    }

    fn get_value_ptr_double(&mut self, name: &CStr, ptr: &mut *mut f64) -> Result<Status> {
        kernel_call!(self.get_value_ptr_double(name.as_ptr() => *const c_char, ptr as *mut *mut f64 => *mut *mut f64))
    }

    fn get_value_ptr_int(&mut self, name: &CStr, ptr: &mut *mut c_int) -> Result<Status> {
        kernel_call!(self.get_value_ptr_int(name.as_ptr() => *const c_char, ptr as *mut *mut c_int => *mut *mut c_int))
    }

    fn get_grid_rank(&mut self, grid: c_int, rank: &mut c_int) -> Result<Status> {
        kernel_call!(self.get_grid_rank(&grid as *const c_int => *const c_int, rank as *mut c_int => *mut c_int))
    }

    unsafe fn get_grid_type(&mut self, grid: c_int, grid_type: &mut [u8]) -> Result<Status> {
        kernel_call!(self.get_grid_type(
            &grid as *const c_int => *const c_int,
            grid_type.as_mut_ptr().cast::<c_char>() => *mut c_char,
        ))
    }

    unsafe fn get_grid_shape(&mut self, grid: c_int, shape: &mut [c_int]) -> Result<Status> {
        kernel_call!(self.get_grid_shape(&grid as *const c_int => *const c_int, shape.as_mut_ptr() => *mut c_int))
    }

    unsafe fn get_grid_x(&mut self, grid: c_int, x: &mut [f64]) -> Result<Status> {
        kernel_call!(self.get_grid_x(&grid as *const c_int => *const c_int, x.as_mut_ptr() => *mut f64))
    }

    unsafe fn get_grid_y(&mut self, grid: c_int, y: &mut [f64]) -> Result<Status> {
        kernel_call!(self.get_grid_y(&grid as *const c_int => *const c_int, y.as_mut_ptr() => *mut f64))
    }

    unsafe fn get_grid_z(&mut self, grid: c_int, z: &mut [f64]) -> Result<Status> {
        kernel_call!(self.get_grid_z(&grid as *const c_int => *const c_int, z.as_mut_ptr() => *mut f64))
    }

    fn prepare_time_step(&mut self, dt: f64) -> Result<Status> {
        kernel_call!(self.prepare_time_step(&dt as *const f64 => *const f64))
    }

    fn do_time_step(&mut self) -> Result<Status> {
        kernel_call!(self.do_time_step())
    }

    fn finalize_time_step(&mut self) -> Result<Status> {
        kernel_call!(self.finalize_time_step())
    }

    fn get_subcomponent_count(&mut self, count: &mut c_int) -> Result<Status> {
        kernel_call!(self.get_subcomponent_count(count as *mut c_int => *mut c_int))
    }

    fn prepare_solve(&mut self, component_id: c_int) -> Result<Status> {
        kernel_call!(self.prepare_solve(&component_id as *const c_int => *const c_int))
    }

    fn solve(&mut self, component_id: c_int, has_converged: &mut c_int) -> Result<Status> {
        kernel_call!(self.solve(
            &component_id as *const c_int => *const c_int,
            has_converged as *mut c_int => *mut c_int,
        ))
    }

    fn finalize_solve(&mut self, component_id: c_int) -> Result<Status> {
        kernel_call!(self.finalize_solve(&component_id as *const c_int => *const c_int))
    }
}
