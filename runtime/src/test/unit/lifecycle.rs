use crate::test::fake::FakeKernel;
use crate::test::helpers::{adapter_in_tempdir, canonical, current_dir, test_setup};
use crate::{Error, KernelAdapter};

#[test]
fn test_initialize_passes_config_file_through() {
    let _guard = test_setup();
    let kernel = FakeKernel::new();
    let (workdir, mut adapter) = adapter_in_tempdir(&kernel);
    let before = current_dir();

    adapter.initialize("mfsim.nam").unwrap();

    assert_eq!(kernel.state().config_file.as_deref(), Some(c"mfsim.nam"));
    assert_eq!(kernel.calls()[0].cwd, canonical(&workdir), "kernel must run in the working directory");
    assert_eq!(current_dir(), before, "caller's directory must be restored");
}

#[cfg(unix)]
#[test]
fn test_initialize_keeps_non_utf8_config_path() {
    use std::ffi::{CString, OsStr};
    use std::os::unix::ffi::OsStrExt;

    let _guard = test_setup();
    let kernel = FakeKernel::new();
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    adapter.initialize(OsStr::from_bytes(b"model\xff.nam")).unwrap();

    assert_eq!(kernel.state().config_file, Some(CString::new(b"model\xff.nam".to_vec()).unwrap()));
}

#[test]
fn test_initialize_rejects_nul_in_config_path() {
    let _guard = test_setup();
    let kernel = FakeKernel::new();
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    let err = adapter.initialize("mfsim\0.nam").unwrap_err();
    assert!(matches!(err, Error::InvalidName { .. }), "got {err:?}");
    assert!(kernel.calls().is_empty());
}

#[test]
fn test_update_advances_clock() {
    let _guard = test_setup();
    let kernel = FakeKernel::new();
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    adapter.initialize("mfsim.nam").unwrap();
    adapter.update().unwrap();
    adapter.update().unwrap();

    assert_eq!(adapter.get_current_time().unwrap(), 2.0);
    assert_eq!(kernel.functions(), ["initialize", "update", "update", "get_current_time"]);
}

#[test]
fn test_clock_queries() {
    let _guard = test_setup();
    let kernel = FakeKernel::new();
    {
        let mut state = kernel.state_mut();
        state.start_time = 1.5;
        state.end_time = 365.0;
        state.time_step = 0.25;
    }
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    assert_eq!(adapter.get_start_time().unwrap(), 1.5);
    assert_eq!(adapter.get_end_time().unwrap(), 365.0);
    assert_eq!(adapter.get_time_step().unwrap(), 0.25);
    assert_eq!(adapter.get_current_time().unwrap(), 0.0);
}

#[test]
fn test_clock_query_failure() {
    let _guard = test_setup();
    let kernel = FakeKernel::new().fail_on("get_end_time", None);
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    let err = adapter.get_end_time().unwrap_err();
    assert!(matches!(err, Error::KernelCall { function: "get_end_time", status: 1, .. }), "got {err:?}");
}

#[test]
fn test_update_failure_is_kernel_call_error() {
    let _guard = test_setup();
    let kernel = FakeKernel::new().fail_on("update", None);
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);
    let before = current_dir();

    let err = adapter.update().unwrap_err();

    assert!(matches!(err, Error::KernelCall { function: "update", .. }), "got {err:?}");
    assert_eq!(err.to_string(), "kernel call 'update' failed with status 1");
    assert_eq!(current_dir(), before);
}

#[test]
fn test_update_until_is_unsupported_failure() {
    let _guard = test_setup();
    let kernel = FakeKernel::new();
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);
    let before = current_dir();

    let err = adapter.update_until(5.0).unwrap_err();

    assert!(matches!(err, Error::KernelCall { function: "update_until", .. }), "got {err:?}");
    assert!(err.to_string().contains("not supported"), "got {err}");
    assert!(kernel.calls().is_empty(), "update_until must never reach the kernel");
    assert_eq!(current_dir(), before);
}

#[test]
fn test_finalize_invalidates_handle() {
    let _guard = test_setup();
    let kernel = FakeKernel::new().with_scalar_int("NITER", "INTEGER", 3);
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    adapter.finalize().unwrap();
    assert!(adapter.is_finalized());

    assert!(matches!(adapter.update().unwrap_err(), Error::Finalized { operation: "update" }));
    assert!(matches!(adapter.get_var_rank("NITER").unwrap_err(), Error::Finalized { operation: "get_var_rank" }));
    assert!(matches!(adapter.finalize().unwrap_err(), Error::Finalized { operation: "finalize" }));
    assert_eq!(kernel.functions(), ["finalize"]);
}

#[test]
fn test_failed_finalize_still_invalidates_handle() {
    let _guard = test_setup();
    let kernel = FakeKernel::new().fail_on("finalize", None);
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    assert!(matches!(adapter.finalize().unwrap_err(), Error::KernelCall { function: "finalize", .. }));
    assert!(adapter.is_finalized());
    assert!(matches!(adapter.update().unwrap_err(), Error::Finalized { .. }));
}

#[test]
fn test_construction_reads_maxstrlen() {
    let _guard = test_setup();
    let kernel = FakeKernel::new().with_constant("MAXSTRLEN", 64);
    let (workdir, adapter) = adapter_in_tempdir(&kernel);

    assert_eq!(adapter.max_str_len(), 64);
    assert_eq!(adapter.working_directory(), canonical(&workdir));
    assert!(!adapter.is_finalized());
}

#[test]
fn test_construction_rejects_non_positive_maxstrlen() {
    let _guard = test_setup();
    let workdir = tempfile::tempdir().unwrap();

    for value in [0, -1] {
        let kernel = FakeKernel::new().with_constant("MAXSTRLEN", value);
        let err = KernelAdapter::new(kernel, workdir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidMetadata { what: "length", .. }), "got {err:?}");
    }
}

#[test]
fn test_construction_requires_maxstrlen() {
    let _guard = test_setup();
    let workdir = tempfile::tempdir().unwrap();
    let kernel = FakeKernel::new();
    kernel.state_mut().constants.clear();

    let err = KernelAdapter::new(kernel, workdir.path()).unwrap_err();
    assert!(matches!(err, Error::SymbolNotFound { ref name, .. } if name == "MAXSTRLEN"), "got {err:?}");
}

#[test]
fn test_construction_requires_existing_working_directory() {
    let _guard = test_setup();
    let workdir = tempfile::tempdir().unwrap();
    let missing = workdir.path().join("does-not-exist");

    let err = KernelAdapter::new(FakeKernel::new(), &missing).unwrap_err();
    assert!(matches!(err, Error::WorkingDirectory { ref path, .. } if *path == missing), "got {err:?}");
}

#[test]
fn test_relative_working_directory_is_resolved_once() {
    let _guard = test_setup();
    let workdir = tempfile::tempdir().unwrap();
    std::fs::create_dir(workdir.path().join("model")).unwrap();
    let before = current_dir();

    std::env::set_current_dir(workdir.path()).unwrap();
    let adapter = KernelAdapter::new(FakeKernel::new(), "model");
    std::env::set_current_dir(&before).unwrap();

    assert_eq!(adapter.unwrap().working_directory(), canonical(&workdir).join("model"));
}

#[test]
fn test_constant_int_roundtrip() {
    let _guard = test_setup();
    let kernel = FakeKernel::new().with_constant("ISTDOUTTOFILE", 1);
    let (_workdir, mut adapter) = adapter_in_tempdir(&kernel);

    assert_eq!(adapter.constant_int("ISTDOUTTOFILE").unwrap(), 1);
    adapter.set_constant_int("ISTDOUTTOFILE", 0).unwrap();
    assert_eq!(adapter.constant_int("ISTDOUTTOFILE").unwrap(), 0);
    assert!(matches!(adapter.constant_int("MISSING").unwrap_err(), Error::SymbolNotFound { .. }));
}
