//! The kernel adapter.
//!
//! [`KernelAdapter`] owns one loaded kernel and is the only way the host talks
//! to it. Every method that reaches the kernel:
//!
//! 1. refuses to run once the kernel has been finalized,
//! 2. enters a [`DirectoryScope`] (switch to the working directory),
//! 3. calls exactly one kernel function,
//! 4. decodes the status, turning anything but success into
//!    [`Error::KernelCall`](crate::Error::KernelCall),
//! 5. restores the caller's directory.
//!
//! Restoration in step 5 happens before any failure from step 3 or 4 is
//! propagated. When both the call and the restoration fail, the call's error
//! is returned and the restore failure is logged. Kernel status codes never
//! leave the adapter.
//!
//! The methods are split by concern:
//! - `lifecycle` - initialize/update/finalize and the simulation clock
//! - `variables` - variable metadata
//! - `values` - zero-copy value views
//! - `grid` - grid metadata and coordinates
//! - `coupling` - the iterative multi-component time step
//! - `unsupported` - protocol methods the binding does not implement

use std::ffi::{CStr, CString, c_int};
use std::path::{Path, PathBuf};

use snafu::{ResultExt, ensure};

use crate::config::AdapterConfig;
use crate::error::{
    FinalizedSnafu, IndexOutOfRangeSnafu, InvalidMetadataSnafu, InvalidNameSnafu, KernelCallSnafu, Result,
    WorkingDirectorySnafu,
};
use crate::kernel::{KernelApi, SUCCESS, Status};
use crate::library::SharedLibrary;
use crate::workdir::DirectoryScope;

pub(crate) mod coupling;
mod grid;
mod lifecycle;
mod unsupported;
mod values;
mod variables;

pub use grid::GridDescriptor;
pub use unsupported::UNSUPPORTED_OPERATIONS;
pub use variables::VariableDescriptor;

/// Name of the exported constant bounding every string exchanged with the kernel.
pub const MAXSTRLEN: &str = "MAXSTRLEN";

/// Host-side adapter for one loaded kernel.
///
/// Single-threaded by construction: every operation takes `&mut self`, and
/// value views borrow the adapter, so two kernel calls can never overlap.
pub struct KernelAdapter<K: KernelApi = SharedLibrary> {
    kernel: K,
    /// Absolute; fixed after construction.
    working_directory: PathBuf,
    /// Length of every string buffer exchanged with the kernel.
    max_str_len: usize,
    finalized: bool,
}

impl KernelAdapter<SharedLibrary> {
    /// Load the kernel library named by `config`.
    pub fn load(config: &AdapterConfig) -> Result<Self> {
        let kernel = SharedLibrary::open(&config.library)?;
        Self::new(kernel, &config.working_directory)
    }
}

impl<K: KernelApi> KernelAdapter<K> {
    /// Wrap an already loaded kernel.
    ///
    /// Resolves `working_directory` to an absolute path (it must exist) and
    /// reads the kernel's `MAXSTRLEN` constant.
    pub fn new(kernel: K, working_directory: impl AsRef<Path>) -> Result<Self> {
        let working_directory = working_directory.as_ref();
        let working_directory =
            std::fs::canonicalize(working_directory).context(WorkingDirectorySnafu { path: working_directory })?;

        let raw_max_str_len = kernel.constant_int(MAXSTRLEN)?;
        let max_str_len = usize::try_from(raw_max_str_len)
            .ok()
            .filter(|&len| len > 0)
            .ok_or_else(|| {
                InvalidMetadataSnafu { name: MAXSTRLEN, what: "length", value: i64::from(raw_max_str_len) }.build()
            })?;

        tracing::debug!(
            kernel.working_directory = %working_directory.display(),
            kernel.max_str_len = max_str_len,
            "kernel adapter created"
        );
        Ok(Self { kernel, working_directory, max_str_len, finalized: false })
    }

    /// Directory every kernel call runs in.
    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// The kernel's `MAXSTRLEN`, read at construction.
    pub fn max_str_len(&self) -> usize {
        self.max_str_len
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Whether [`KernelAdapter::finalize`] has been called.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Read an exported integer variable of the kernel module.
    pub fn constant_int(&self, name: &str) -> Result<i32> {
        self.kernel.constant_int(name)
    }

    /// Overwrite an exported integer variable of the kernel module.
    pub fn set_constant_int(&mut self, name: &str, value: i32) -> Result<()> {
        ensure!(!self.finalized, FinalizedSnafu { operation: "set_constant_int" });
        self.kernel.set_constant_int(name, value)
    }

    /// Run one kernel function inside the working directory.
    fn scoped<R>(&mut self, function: &'static str, call: impl FnOnce(&mut K) -> Result<R>) -> Result<R> {
        ensure!(!self.finalized, FinalizedSnafu { operation: function });

        let scope = DirectoryScope::enter(&self.working_directory)?;
        tracing::trace!(kernel.function = function, "dispatching kernel call");
        match call(&mut self.kernel) {
            Ok(value) => {
                scope.exit()?;
                Ok(value)
            }
            Err(error) => {
                // The call's own failure wins over a failed restore.
                if let Err(restore) = scope.exit() {
                    tracing::warn!(
                        kernel.function = function,
                        error = %restore,
                        "failed to restore the caller's working directory"
                    );
                }
                Err(error)
            }
        }
    }

    /// Run one kernel function inside the working directory and decode its status.
    fn call(
        &mut self,
        function: &'static str,
        detail: impl FnOnce() -> String,
        call: impl FnOnce(&mut K) -> Result<Status>,
    ) -> Result<()> {
        self.scoped(function, |kernel| check_status(call(kernel)?, function, detail))
    }

    /// Encode `name` as a C string that fits the kernel's string buffers.
    fn c_name(&self, name: &str) -> Result<CString> {
        ensure!(
            name.len() < self.max_str_len,
            InvalidNameSnafu { name, reason: format!("longer than MAXSTRLEN ({}) - 1", self.max_str_len) }
        );
        CString::new(name).map_err(|_| InvalidNameSnafu { name, reason: "contains a NUL byte" }.build())
    }

    /// A zeroed buffer for a kernel string output.
    fn string_buffer(&self) -> Vec<u8> {
        vec![0; self.max_str_len]
    }
}

impl<K: KernelApi + std::fmt::Debug> std::fmt::Debug for KernelAdapter<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelAdapter")
            .field("kernel", &self.kernel)
            .field("working_directory", &self.working_directory)
            .field("max_str_len", &self.max_str_len)
            .field("finalized", &self.finalized)
            .finish()
    }
}

fn check_status(status: Status, function: &'static str, detail: impl FnOnce() -> String) -> Result<()> {
    if status != SUCCESS {
        tracing::debug!(kernel.function = function, kernel.status = status, "kernel call failed");
        return KernelCallSnafu { function, status, detail: detail() }.fail();
    }
    Ok(())
}

/// Decode a NUL-terminated string written by the kernel.
///
/// Fortran kernels blank-pad their strings, so trailing whitespace is dropped.
fn decode_string(buffer: &[u8]) -> String {
    let bytes = CStr::from_bytes_until_nul(buffer).map_or(buffer, CStr::to_bytes);
    String::from_utf8_lossy(bytes).trim_end().to_string()
}

/// Convert a count reported by the kernel, rejecting negative values.
fn non_negative(name: &str, what: &'static str, value: c_int) -> Result<usize> {
    usize::try_from(value).map_err(|_| InvalidMetadataSnafu { name, what, value: i64::from(value) }.build())
}

/// Convert a host-side index to the kernel's integer type.
fn kernel_index(what: &'static str, index: usize) -> Result<c_int> {
    c_int::try_from(index).map_err(|_| IndexOutOfRangeSnafu { what, index }.build())
}

fn variable_detail(name: &str) -> String {
    format!("for variable {name}")
}
