//! Adapter configuration.
//!
//! Provides a bon builder for explicit configuration and an environment
//! variable fallback for tools that are pointed at a kernel from the outside.

use std::ffi::OsString;
use std::path::PathBuf;

use bon::bon;

/// Environment variable naming the kernel library.
pub const LIBRARY_ENV: &str = "AMILINK_LIBRARY";

/// Environment variable naming the kernel's working directory.
pub const WORKING_DIR_ENV: &str = "AMILINK_WORKING_DIR";

/// Where the kernel lives and where it must run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Path of the kernel shared library.
    pub library: PathBuf,
    /// Directory the kernel runs in. Relative paths are resolved once, when
    /// the adapter is constructed.
    pub working_directory: PathBuf,
}

#[bon]
impl AdapterConfig {
    #[builder]
    pub fn new(
        #[builder(into)] library: PathBuf,
        #[builder(into, default = PathBuf::from("."))] working_directory: PathBuf,
    ) -> Self {
        Self { library, working_directory }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `AMILINK_LIBRARY` - Kernel library path (required)
    /// * `AMILINK_WORKING_DIR` - Kernel working directory (default: `.`)
    ///
    /// Returns `None` if no library is configured.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Same as [`AdapterConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Option<Self> {
        let library = lookup(LIBRARY_ENV).filter(|value| !value.is_empty())?;
        let working_directory = lookup(WORKING_DIR_ENV).filter(|value| !value.is_empty()).unwrap_or_else(|| ".".into());
        Some(Self::builder().library(library).working_directory(working_directory).build())
    }
}
