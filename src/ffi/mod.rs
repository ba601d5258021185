//! C FFI - Stable ABI for generated code
//!
//! Design: Opaque `u64` handles backed by a per-thread table:
//! 1. Object lifecycle (`rc_new_*`)
//! 2. Reference counting (`rc_take`, `rc_drop`, `rc_refcount`)
//! 3. Array access and push (`array_*`)
//! 4. Console output (`puts_int`, `puts_str`)
//! 5. Error propagation via a thread-local last-error code
//!
//! Failures return a neutral value (`0` handle, `0` integer, `-1` byte
//! count) and record the error code, readable with `rc_last_error`.
//! Handles are only valid on the thread that created them.

mod handles;
mod object;
mod refcount;


pub use object::{
    array_first_int, array_first_ptr, array_last_int, array_last_ptr, array_len, array_push_int,
    array_push_ptr, puts_int, puts_str, rc_new_bytes, rc_new_ints, rc_new_refs, rc_new_str,
};
pub use refcount::{rc_drop, rc_refcount, rc_take};

use crate::error::{RcError, Result};
use crate::logging::{debug, log_ffi_error, log_leaked_handles};
use core::cell::Cell;
use handles::TABLE;

thread_local! {
    static LAST_ERROR: Cell<i32> = const { Cell::new(0) };
}

/// Code of the most recent failure on this thread (0 if none)
#[no_mangle]
pub extern "C" fn rc_last_error() -> i32 {
    LAST_ERROR.with(Cell::get)
}

/// Reset the last-error code to 0
#[no_mangle]
pub extern "C" fn rc_clear_error() {
    LAST_ERROR.with(|c| c.set(0));
}

/// C handles currently live on this thread
pub fn live_handles() -> usize {
    TABLE.with(|t| t.borrow().live_handles())
}

/// Release every handle still held on this thread; returns how many there were
pub fn cleanup() -> usize {
    let leaked = TABLE.with(|t| t.borrow_mut().clear());
    if leaked > 0 {
        log_leaked_handles(leaked);
    } else {
        debug!("No outstanding handles at cleanup");
    }
    leaked
}

/// Unwrap an FFI result, recording the error and substituting `fallback`
#[inline]
pub(crate) fn ffi_result<T>(fn_name: &str, result: Result<T>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            record_error(fn_name, &err);
            fallback
        }
    }
}

/// Map a unit result to 0 or the error's code
#[inline]
pub(crate) fn ffi_status(fn_name: &str, result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            record_error(fn_name, &err);
            err.code()
        }
    }
}

#[cold]
fn record_error(fn_name: &str, err: &RcError) {
    log_ffi_error(fn_name, &err.to_string());
    LAST_ERROR.with(|c| c.set(err.code()));
}
