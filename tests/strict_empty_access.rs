//! Strict empty-array policy, switched on through the process-wide config
//!
//! Lives in its own binary: every test here turns `Strict` on, and no other
//! test binary shares the setting.

use rc_runtime::config::{self, EmptyAccessPolicy, RuntimeConfig};
use rc_runtime::ffi::*;
use rc_runtime::{create_integers, create_references, rc_runtime_init, RcError};

fn strict() {
    config::set(RuntimeConfig {
        empty_access: EmptyAccessPolicy::Strict,
        ..RuntimeConfig::default()
    });
}

#[test]
fn default_accessors_report_empty_access() {
    strict();

    let ints = create_integers(&[]).expect("create");
    assert!(matches!(
        ints.first_integer(),
        Err(RcError::EmptyContainerAccess { op: "first_integer" })
    ));
    assert!(matches!(
        ints.last_integer(),
        Err(RcError::EmptyContainerAccess { op: "last_integer" })
    ));

    let refs = create_references(Vec::new()).expect("create");
    assert!(matches!(
        refs.first_reference(),
        Err(RcError::EmptyContainerAccess { op: "first_reference" })
    ));
    assert!(refs.last_reference().is_err());
}

#[test]
fn non_empty_arrays_unaffected() {
    strict();

    let ints = create_integers(&[5, 9]).expect("create");
    assert_eq!(ints.first_integer().expect("first"), 5);
    assert_eq!(ints.last_integer().expect("last"), 9);
}

#[test]
fn c_surface_records_empty_access_code() {
    strict();

    let h = unsafe { rc_new_ints(core::ptr::null(), 0) };
    rc_clear_error();
    assert_eq!(array_first_int(h), 0);
    assert_eq!(rc_last_error(), -2);

    rc_clear_error();
    assert_eq!(array_last_int(h), 0);
    assert_eq!(rc_last_error(), -2);

    let refs = unsafe { rc_new_refs(core::ptr::null(), 0) };
    rc_clear_error();
    assert_eq!(array_first_ptr(refs), 0);
    assert_eq!(rc_last_error(), -2);

    rc_drop(h);
    rc_drop(refs);
}

#[test]
fn runtime_init_reads_policy_from_environment() {
    std::env::set_var("RC_RUNTIME_EMPTY_ACCESS", "strict");
    rc_runtime_init();

    assert_eq!(config::empty_access_policy(), EmptyAccessPolicy::Strict);
    let ints = create_integers(&[]).expect("create");
    assert!(ints.first_integer().is_err());
}
