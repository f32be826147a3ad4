//! Protocol methods the kernel binding does not implement.
//!
//! Each fails immediately with
//! [`Error::UnsupportedOperation`](crate::Error::UnsupportedOperation) without
//! touching the kernel or the working directory, and works even after the
//! kernel has been finalized.

use crate::error::{Result, UnsupportedOperationSnafu};
use crate::kernel::KernelApi;

use super::KernelAdapter;

macro_rules! unsupported_operations {
    ($(fn $name:ident(&self $(, $arg:ident: $ty:ty)* $(,)?) -> $ret:ty;)*) => {
        /// Names of every protocol method that always fails with `UnsupportedOperation`.
        pub const UNSUPPORTED_OPERATIONS: &[&str] = &[$(stringify!($name)),*];

        impl<K: KernelApi> KernelAdapter<K> {
            $(
                /// Not supported by the kernel binding; always fails.
                pub fn $name(&self $(, $arg: $ty)*) -> Result<$ret> {
                    UnsupportedOperationSnafu { operation: stringify!($name) }.fail()
                }
            )*
        }
    };
}

unsupported_operations! {
    fn get_component_name(&self) -> String;
    fn get_input_item_count(&self) -> usize;
    fn get_output_item_count(&self) -> usize;
    fn get_input_var_names(&self) -> Vec<String>;
    fn get_output_var_names(&self) -> Vec<String>;
    fn get_var_grid(&self, _name: &str) -> i32;
    fn get_var_units(&self, _name: &str) -> String;
    fn get_var_location(&self, _name: &str) -> String;
    fn get_time_units(&self) -> String;
    fn get_value(&self, _name: &str, _dest: &mut [f64]) -> ();
    fn get_value_at_indices(&self, _name: &str, _dest: &mut [f64], _indices: &[i32]) -> ();
    fn set_value(&self, _name: &str, _values: &[f64]) -> ();
    fn set_value_at_indices(&self, _name: &str, _indices: &[i32], _values: &[f64]) -> ();
    fn get_grid_size(&self, _grid: i32) -> usize;
    fn get_grid_spacing(&self, _grid: i32, _spacing: &mut [f64]) -> ();
    fn get_grid_origin(&self, _grid: i32, _origin: &mut [f64]) -> ();
    fn get_grid_node_count(&self, _grid: i32) -> usize;
    fn get_grid_edge_count(&self, _grid: i32) -> usize;
    fn get_grid_face_count(&self, _grid: i32) -> usize;
    fn get_grid_edge_nodes(&self, _grid: i32, _edge_nodes: &mut [i32]) -> ();
    fn get_grid_face_edges(&self, _grid: i32, _face_edges: &mut [i32]) -> ();
    fn get_grid_face_nodes(&self, _grid: i32, _face_nodes: &mut [i32]) -> ();
    fn get_grid_nodes_per_face(&self, _grid: i32, _nodes_per_face: &mut [i32]) -> ();
}
