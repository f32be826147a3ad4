//! Lifecycle control and the simulation clock.

use std::ffi::CString;
use std::path::Path;

use crate::error::{InvalidNameSnafu, Result};
use crate::kernel::{FAILURE, KernelApi, Status};

use super::KernelAdapter;

impl<K: KernelApi> KernelAdapter<K> {
    /// Initialize the kernel from `config_file`.
    ///
    /// The path is passed through byte for byte; a relative path is resolved by
    /// the kernel against the working directory, not the caller's directory.
    pub fn initialize(&mut self, config_file: impl AsRef<Path>) -> Result<()> {
        let config_file = config_file.as_ref();
        let c_config = path_to_c_string(config_file)?;

        self.call("initialize", || format!("with config file {}", config_file.display()), |kernel| {
            kernel.initialize(&c_config)
        })
    }

    /// Advance the kernel by one internal time step.
    pub fn update(&mut self) -> Result<()> {
        self.call("update", String::new, |kernel| kernel.update())
    }

    /// Advance the kernel to `time`.
    ///
    /// The kernel binding has no such function: the call is scoped like any
    /// other but never reaches the kernel and always fails with
    /// [`Error::KernelCall`](crate::Error::KernelCall).
    pub fn update_until(&mut self, time: f64) -> Result<()> {
        self.call("update_until", || format!("not supported by the kernel binding, target time {time}"), |_| {
            Ok(FAILURE)
        })
    }

    /// Release kernel-side resources.
    ///
    /// The kernel is considered finalized after this call whatever its
    /// outcome; every later kernel call fails with
    /// [`Error::Finalized`](crate::Error::Finalized).
    pub fn finalize(&mut self) -> Result<()> {
        let outcome = self.call("finalize", String::new, |kernel| kernel.finalize());
        self.finalized = true;
        tracing::debug!(kernel.success = outcome.is_ok(), "kernel finalized");
        outcome
    }

    pub fn get_current_time(&mut self) -> Result<f64> {
        self.query_time("get_current_time", |kernel, time| kernel.get_current_time(time))
    }

    pub fn get_start_time(&mut self) -> Result<f64> {
        self.query_time("get_start_time", |kernel, time| kernel.get_start_time(time))
    }

    pub fn get_end_time(&mut self) -> Result<f64> {
        self.query_time("get_end_time", |kernel, time| kernel.get_end_time(time))
    }

    pub fn get_time_step(&mut self) -> Result<f64> {
        self.query_time("get_time_step", |kernel, dt| kernel.get_time_step(dt))
    }

    fn query_time(
        &mut self,
        function: &'static str,
        query: impl FnOnce(&mut K, &mut f64) -> Result<Status>,
    ) -> Result<f64> {
        let mut value = 0.0;
        self.call(function, String::new, |kernel| query(kernel, &mut value))?;
        Ok(value)
    }
}

/// Encode `path` for the kernel without altering it.
#[cfg(unix)]
fn path_to_c_string(path: &Path) -> Result<CString> {
    use std::os::unix::ffi::OsStrExt;

    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| InvalidNameSnafu { name: path.display().to_string(), reason: "contains a NUL byte" }.build())
}

/// Encode `path` for the kernel, refusing paths that are not valid UTF-8.
#[cfg(not(unix))]
fn path_to_c_string(path: &Path) -> Result<CString> {
    let name = || path.display().to_string();
    let utf8 = path.to_str().ok_or_else(|| InvalidNameSnafu { name: name(), reason: "is not valid UTF-8" }.build())?;
    CString::new(utf8).map_err(|_| InvalidNameSnafu { name: name(), reason: "contains a NUL byte" }.build())
}
