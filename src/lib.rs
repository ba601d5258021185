//! rc-runtime - Minimal reference-counted object runtime
//!
//! Support library linked into programs emitted by a small compiler. It
//! provides heap objects (text and arrays of integers or references) with
//! explicit retain/release, first/last element access, and line printing.
//!
//! Rust callers use [`RefCount`] handles directly; generated code goes
//! through the `extern "C"` surface in [`ffi`].

pub mod allocator;
pub mod builtins;
pub mod config;
pub mod error;
pub mod ffi;
pub mod logging;
pub mod object;
pub mod rc;

// Re-export core types
pub use builtins::{print_int, print_legacy_text, print_text};
pub use config::{EmptyAccessPolicy, RuntimeConfig};
pub use error::{PayloadKindName, RcError, Result};
pub use object::{
    create, create_integers, create_references, create_text, push_integer, push_reference,
    Element, ElementKind, Elements, LegacyText, ObjectHandle, Payload, PayloadKind, TextHandle,
};
pub use rc::{RefCount, Release};

/// Runtime initialization
///
/// Reads `RC_RUNTIME_*` environment variables and installs logging. Safe to
/// call more than once; later calls refresh the configuration only.
#[no_mangle]
pub extern "C" fn rc_runtime_init() {
    let config = RuntimeConfig::from_env();
    logging::init_with_config(config.log.clone());
    config::set(config);
    logging::log_runtime_init();
}

/// Runtime cleanup
///
/// Releases every C handle still held by the calling thread and reports
/// them as leaks.
#[no_mangle]
pub extern "C" fn rc_runtime_cleanup() {
    let leaked = ffi::cleanup();
    logging::debug!(leaked, "handle table cleared");
    logging::log_runtime_shutdown();
}
