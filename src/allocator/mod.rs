//! Memory allocator - accounted allocation for object boxes and payloads
//!
//! Design: Two allocation paths, both fallible:
//! 1. Object boxes (header + value) via `std::alloc` with an explicit `Layout`
//! 2. Payload buffers via `Storage<T>`, reserved with `try_reserve_exact`
//!
//! Every allocation and free is recorded in thread-local counters so tests
//! can assert that a balanced retain/release sequence leaves nothing behind.

mod header;
mod stats;
mod storage;

#[cfg(test)]
mod tests;

pub use header::ObjectHeader;
pub use stats::{stats, AllocatorStats};
pub use storage::Storage;

use crate::error::{RcError, Result};
use crate::logging::{log_allocation, log_deallocation};
use core::ptr::NonNull;
use std::alloc::{alloc, dealloc, Layout};

/// Allocate a box for `value` and move it in
///
/// Returns `OutOfMemory` instead of aborting when the system allocator
/// refuses the request.
pub fn alloc_box<T>(value: T) -> Result<NonNull<T>> {
    let layout = Layout::new::<T>();
    debug_assert!(layout.size() > 0, "boxed runtime values are never zero-sized");

    let ptr = unsafe { alloc(layout) } as *mut T;
    let Some(ptr) = NonNull::new(ptr) else {
        return Err(RcError::OutOfMemory { requested: layout.size() });
    };

    unsafe { ptr.as_ptr().write(value) };

    stats::record_alloc(layout.size());
    log_allocation(layout.size(), ptr.as_ptr() as *const u8);
    Ok(ptr)
}

/// Drop the boxed value in place and return its memory
///
/// # Safety
/// - `ptr` must come from `alloc_box::<T>` and not have been freed
/// - No reference to the value may outlive this call
pub unsafe fn free_box<T>(ptr: NonNull<T>) {
    let layout = Layout::new::<T>();

    core::ptr::drop_in_place(ptr.as_ptr());
    dealloc(ptr.as_ptr() as *mut u8, layout);

    stats::record_free(layout.size());
    log_deallocation(ptr.as_ptr() as *const u8);
}
