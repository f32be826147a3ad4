use crate::Error;
use crate::adapter::GridDescriptor;
use crate::test::fake::{FakeGrid, FakeKernel};
use crate::test::helpers::{adapter_in_tempdir, test_setup};

fn kernel() -> FakeKernel {
    FakeKernel::new().with_grid(1, FakeGrid {
        rank: 2,
        grid_type: "rectilinear".to_string(),
        shape: vec![3, 2],
        x: vec![0.0, 100.0],
        y: vec![0.0, 50.0, 100.0],
        z: vec![],
    })
}

#[test]
fn test_grid_metadata() {
    let _guard = test_setup();
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel());

    assert_eq!(adapter.get_grid_rank(1).unwrap(), 2);
    assert_eq!(adapter.get_grid_type(1).unwrap(), "rectilinear");
    assert_eq!(adapter.describe_grid(1).unwrap(), GridDescriptor {
        id: 1,
        rank: 2,
        grid_type: "rectilinear".to_string()
    });
}

#[test]
fn test_grid_arrays_are_filled_in_place() {
    let _guard = test_setup();
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel());

    let mut shape = [0; 2];
    adapter.get_grid_shape(1, &mut shape).unwrap();
    assert_eq!(shape, [3, 2]);

    let mut x = [f64::NAN; 2];
    let mut y = [f64::NAN; 3];
    let mut z: [f64; 0] = [];
    // SAFETY: the buffers match the coordinate counts of grid 1.
    unsafe {
        adapter.get_grid_x(1, &mut x).unwrap();
        adapter.get_grid_y(1, &mut y).unwrap();
        adapter.get_grid_z(1, &mut z).unwrap();
    }
    assert_eq!(x, [0.0, 100.0]);
    assert_eq!(y, [0.0, 50.0, 100.0]);
}

#[test]
fn test_grid_shape_checks_buffer_against_rank() {
    let _guard = test_setup();
    let kernel = kernel();
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    let mut shape = [0; 1];
    let err = adapter.get_grid_shape(1, &mut shape).unwrap_err();
    assert!(matches!(err, Error::BufferTooSmall { len: 1, required: 2, .. }), "got {err:?}");
    assert_eq!(kernel.functions(), ["get_grid_rank"], "the kernel never sees the short buffer");
}

#[test]
fn test_grid_shape_accepts_longer_buffer() {
    let _guard = test_setup();
    let kernel = kernel();
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    let mut shape = [-1; 4];
    adapter.get_grid_shape(1, &mut shape).unwrap();
    assert_eq!(shape, [3, 2, -1, -1]);
    assert_eq!(kernel.functions(), ["get_grid_rank", "get_grid_shape"]);
}

#[test]
fn test_grid_id_is_forwarded() {
    let _guard = test_setup();
    let kernel = kernel();
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    adapter.get_grid_type(1).unwrap();
    let calls = kernel.calls();
    assert_eq!(calls[0].function, "get_grid_type");
    assert_eq!(calls[0].subject.as_deref(), Some("1"));
}

#[test]
fn test_unknown_grid() {
    let _guard = test_setup();
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel());

    let err = adapter.get_grid_rank(7).unwrap_err();
    assert!(matches!(err, Error::KernelCall { function: "get_grid_rank", .. }), "got {err:?}");
    assert!(err.to_string().ends_with("(for id 7)"), "got {err}");
}

#[test]
fn test_coordinate_failure_names_axis() {
    let _guard = test_setup();
    let kernel = kernel().fail_on("get_grid_y", Some("1"));
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    let mut y = [0.0; 3];
    // SAFETY: grid 1 has three y coordinates.
    let err = unsafe { adapter.get_grid_y(1, &mut y) }.unwrap_err();
    assert!(matches!(err, Error::KernelCall { function: "get_grid_y", .. }), "got {err:?}");
}

#[test]
fn test_negative_grid_rank_is_invalid() {
    let _guard = test_setup();
    let kernel = FakeKernel::new().with_grid(0, FakeGrid { rank: -1, ..FakeGrid::default() });
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    let err = adapter.get_grid_rank(0).unwrap_err();
    assert!(matches!(err, Error::InvalidMetadata { ref name, what: "rank", .. } if name == "grid 0"), "got {err:?}");
}
