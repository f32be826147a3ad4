//! Iterative multi-component coupling (the AMI extension).
//!
//! One time step is driven by the caller in this order:
//!
//! ```text
//! prepare_time_step(dt)
//! for id in subcomponents:
//!     prepare_solve(id)
//!     solve(id)          // repeated until it reports convergence
//!     finalize_solve(id)
//! finalize_time_step()
//! ```
//!
//! [`KernelAdapter::do_time_step`] replaces the inner loop for kernels without
//! subcomponent-level iteration. The adapter imposes no iteration cap and no
//! rollback: a failing call returns immediately and leaving or restarting the
//! half-finished step is up to the caller.

use std::ffi::c_int;

use crate::error::Result;
use crate::kernel::KernelApi;

use super::{KernelAdapter, kernel_index, non_negative};

fn component_detail(component_id: usize) -> String {
    format!("for component {component_id}")
}

/// The kernel reports convergence as exactly `1`; every other value means not converged.
pub(crate) fn has_converged(raw: c_int) -> bool {
    raw == 1
}

impl<K: KernelApi> KernelAdapter<K> {
    /// Start a time step of length `dt`.
    pub fn prepare_time_step(&mut self, dt: f64) -> Result<()> {
        self.call("prepare_time_step", || format!("with dt {dt}"), |kernel| kernel.prepare_time_step(dt))
    }

    /// Solve the whole time step in one go.
    pub fn do_time_step(&mut self) -> Result<()> {
        self.call("do_time_step", String::new, |kernel| kernel.do_time_step())
    }

    /// Commit the current time step.
    pub fn finalize_time_step(&mut self) -> Result<()> {
        self.call("finalize_time_step", String::new, |kernel| kernel.finalize_time_step())
    }

    /// Number of coupled subcomponents to iterate per time step.
    pub fn get_subcomponent_count(&mut self) -> Result<usize> {
        let mut count = 0;
        self.call("get_subcomponent_count", String::new, |kernel| kernel.get_subcomponent_count(&mut count))?;
        non_negative("subcomponents", "count", count)
    }

    pub fn prepare_solve(&mut self, component_id: usize) -> Result<()> {
        let id = kernel_index("component id", component_id)?;
        self.call("prepare_solve", || component_detail(component_id), |kernel| kernel.prepare_solve(id))
    }

    /// Run one nonlinear iteration for a subcomponent; `true` once it has converged.
    ///
    /// Call again (without repeating [`KernelAdapter::prepare_solve`]) until it
    /// converges or the caller gives up.
    pub fn solve(&mut self, component_id: usize) -> Result<bool> {
        let id = kernel_index("component id", component_id)?;
        let mut converged = 0;
        self.call("solve", || component_detail(component_id), |kernel| kernel.solve(id, &mut converged))?;

        let converged = has_converged(converged);
        tracing::trace!(kernel.component = component_id, kernel.converged = converged, "solve iteration");
        Ok(converged)
    }

    pub fn finalize_solve(&mut self, component_id: usize) -> Result<()> {
        let id = kernel_index("component id", component_id)?;
        self.call("finalize_solve", || component_detail(component_id), |kernel| kernel.finalize_solve(id))
    }
}
