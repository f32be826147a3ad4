//! Host-side adapter for dynamically loaded simulation kernels.
//!
//! A kernel is a shared library exposing the BMI model-coupling function
//! table (initialize, update, finalize, variable introspection) plus the AMI
//! extension for iterative multi-component coupling. The adapter implements
//! no numerics; it marshals host values into the kernel's calling convention
//! and wraps kernel-owned buffers in zero-copy, column-major array views.
//!
//! # Working directory
//!
//! Kernels resolve input paths against the process working directory, so
//! every kernel call runs with the current directory switched to the
//! configured working directory and restored afterwards (see [`workdir`]).
//!
//! # Example
//!
//! ```ignore
//! let config = AdapterConfig::builder().library("libmf6.so").working_directory("model").build();
//! let mut kernel = KernelAdapter::load(&config)?;
//! kernel.initialize("mfsim.nam")?;
//! while kernel.get_current_time()? < kernel.get_end_time()? {
//!     kernel.update()?;
//!     let head = kernel.get_value_ptr("SLN_1/X")?;
//!     println!("{:?}", head.shape());
//! }
//! kernel.finalize()?;
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod kernel;
pub mod library;
pub mod shape;
pub mod view;
pub mod workdir;

#[cfg(test)]
pub mod test;

pub use adapter::{GridDescriptor, KernelAdapter, MAXSTRLEN, UNSUPPORTED_OPERATIONS, VariableDescriptor};
pub use amilink_dtype::ext::HasElementType;
pub use amilink_dtype::{ElementType, ScalarType};
pub use config::AdapterConfig;
pub use error::*;
pub use kernel::{KernelApi, Status};
pub use library::SharedLibrary;
pub use view::ValueView;
