//! Reference counting - C API for refcount operations
//!
//! Null-safe like the rest of the surface: handle `0` is a no-op.

use super::{ffi_result, ffi_status};
use super::handles::TABLE;
use crate::logging::log_ffi_call;

/// Increment reference count
///
/// The caller now holds one more release obligation for `handle`.
/// Returns 0 on success, or a negative error code (`UseAfterFree` for a
/// handle whose object is gone).
#[no_mangle]
pub extern "C" fn rc_take(handle: u64) -> i32 {
    if handle == 0 {
        return 0;
    }

    log_ffi_call("rc_take", handle);
    let result = TABLE.with(|t| t.borrow_mut().retain(handle)).map(drop);
    ffi_status("rc_take", result)
}

/// Decrement reference count, destroying the object at zero
///
/// Returns 0 on success. Releasing a handle after its last reference was
/// already released returns the `DoubleRelease` code and changes nothing.
#[no_mangle]
pub extern "C" fn rc_drop(handle: u64) -> i32 {
    if handle == 0 {
        return 0;
    }

    log_ffi_call("rc_drop", handle);
    let result = TABLE.with(|t| t.borrow_mut().release(handle)).map(drop);
    ffi_status("rc_drop", result)
}

/// Get current reference count (for debugging/testing)
///
/// The count includes references held by arrays, not only C handles.
/// Returns 0 for null or stale handles.
#[no_mangle]
pub extern "C" fn rc_refcount(handle: u64) -> u32 {
    if handle == 0 {
        return 0;
    }

    let result = TABLE.with(|t| {
        t.borrow()
            .get(handle)
            .map(|h| u32::try_from(h.count()).unwrap_or(u32::MAX))
    });
    ffi_result("rc_refcount", result, 0)
}
