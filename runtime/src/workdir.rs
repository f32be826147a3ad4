//! Working-directory discipline around kernel calls.
//!
//! Kernels resolve relative input paths against the process working
//! directory, so every call into a kernel runs with the current directory
//! switched to the configured working directory. The current directory is
//! process-wide state: a [`DirectoryScope`] holds a global lock for its whole
//! lifetime and restores the caller's directory when it ends, on every exit
//! path including early returns and panics.

use std::path::{Path, PathBuf};

use parking_lot::{Mutex, MutexGuard};
use snafu::ResultExt;

use crate::error::{CurrentDirectorySnafu, Result, WorkingDirectorySnafu};

/// Serializes every switch of the process working directory.
static DIRECTORY_LOCK: Mutex<()> = Mutex::new(());

/// The span of one kernel call, during which the process runs in the working directory.
///
/// Scopes must not be nested: entering a second scope on the same thread
/// while one is alive deadlocks.
#[must_use = "the working directory is restored as soon as the scope is dropped"]
pub struct DirectoryScope {
    /// Caller's directory; `None` once restored.
    previous: Option<PathBuf>,
    _lock: MutexGuard<'static, ()>,
}

impl DirectoryScope {
    /// Capture the current directory and switch to `working_directory`.
    ///
    /// If the switch fails the current directory is left untouched.
    pub fn enter(working_directory: &Path) -> Result<Self> {
        let lock = DIRECTORY_LOCK.lock();
        let previous = std::env::current_dir().context(CurrentDirectorySnafu)?;
        std::env::set_current_dir(working_directory).context(WorkingDirectorySnafu { path: working_directory })?;

        tracing::trace!(
            workdir.previous = %previous.display(),
            workdir.current = %working_directory.display(),
            "entered working directory"
        );
        Ok(Self { previous: Some(previous), _lock: lock })
    }

    /// The directory that will be restored.
    pub fn previous(&self) -> Option<&Path> {
        self.previous.as_deref()
    }

    /// Restore the caller's directory, reporting failure.
    pub fn exit(mut self) -> Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        match self.previous.take() {
            Some(previous) => std::env::set_current_dir(&previous).context(WorkingDirectorySnafu { path: previous }),
            None => Ok(()),
        }
    }
}

impl Drop for DirectoryScope {
    fn drop(&mut self) {
        // Runs before `_lock` is released.
        if let Err(error) = self.restore() {
            tracing::warn!(%error, "failed to restore the caller's working directory");
        }
    }
}
