//! Error types for the kernel adapter.

use std::path::PathBuf;

use snafu::Snafu;

/// Result type for adapter operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while driving a kernel.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A kernel function returned a non-success status.
    #[snafu(display(
        "kernel call '{function}' failed with status {status}{}",
        if detail.is_empty() { String::new() } else { format!(" ({detail})") }
    ))]
    KernelCall { function: &'static str, status: i32, detail: String },

    /// The kernel binding does not implement this protocol method.
    #[snafu(display("operation '{operation}' is not supported by the kernel binding"))]
    UnsupportedOperation { operation: &'static str },

    /// The variable's type string matches no supported element type.
    #[snafu(display("variable '{name}' has unsupported type '{type_name}'"))]
    UnsupportedVariableType { name: String, type_name: String },

    /// Value pointers to scalars are only available for integers.
    #[snafu(display("scalar variable '{name}' of type '{type_name}' cannot be accessed by pointer"))]
    UnsupportedScalarType { name: String, type_name: String },

    /// The kernel module could not be opened.
    #[snafu(display("failed to load kernel library '{}': {source}", path.display()))]
    LibraryLoad { path: PathBuf, source: libloading::Error },

    /// The kernel does not export a required function or constant.
    #[snafu(display("symbol '{name}' not found in kernel: {reason}"))]
    SymbolNotFound { name: String, reason: String },

    /// Switching into (or resolving) the working directory failed.
    #[snafu(display("working directory '{}' is not accessible: {source}", path.display()))]
    WorkingDirectory { path: PathBuf, source: std::io::Error },

    /// The caller's current directory could not be captured.
    #[snafu(display("failed to capture the current directory: {source}"))]
    CurrentDirectory { source: std::io::Error },

    /// A name cannot be passed to the kernel as a bounded C string.
    #[snafu(display("name '{name}' cannot be passed to the kernel: {reason}"))]
    InvalidName { name: String, reason: String },

    /// The kernel reported a negative count or extent.
    #[snafu(display("kernel reported invalid {what} {value} for '{name}'"))]
    InvalidMetadata { name: String, what: &'static str, value: i64 },

    /// The kernel reported success but handed out a null buffer.
    #[snafu(display("kernel returned a null value pointer for non-empty variable '{name}'"))]
    NullValuePointer { name: String },

    /// A caller-supplied output buffer is shorter than what the kernel will write.
    #[snafu(display("{what} buffer holds {len} elements, the kernel writes {required}"))]
    BufferTooSmall { what: String, len: usize, required: usize },

    /// A host-side index does not fit the kernel's integer type.
    #[snafu(display("{what} {index} is out of range for the kernel"))]
    IndexOutOfRange { what: &'static str, index: usize },

    /// The kernel was finalized; its handle is no longer valid.
    #[snafu(display("cannot call '{operation}': kernel has been finalized"))]
    Finalized { operation: &'static str },
}
