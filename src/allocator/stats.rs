//! Allocation accounting - per-thread counters

use core::cell::Cell;

thread_local! {
    static LIVE_ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
    static LIVE_BYTES: Cell<usize> = const { Cell::new(0) };
    static TOTAL_ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
    static TOTAL_FREES: Cell<usize> = const { Cell::new(0) };
}

/// Allocator statistics for the calling thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorStats {
    pub live_allocations: usize,
    pub live_bytes: usize,
    pub total_allocations: usize,
    pub total_frees: usize,
}

impl AllocatorStats {
    /// Allocations made since `earlier` that are still outstanding
    pub fn outstanding_since(&self, earlier: &AllocatorStats) -> isize {
        self.live_allocations as isize - earlier.live_allocations as isize
    }
}

/// Snapshot the calling thread's counters
pub fn stats() -> AllocatorStats {
    AllocatorStats {
        live_allocations: LIVE_ALLOCATIONS.with(Cell::get),
        live_bytes: LIVE_BYTES.with(Cell::get),
        total_allocations: TOTAL_ALLOCATIONS.with(Cell::get),
        total_frees: TOTAL_FREES.with(Cell::get),
    }
}

#[inline]
pub(crate) fn record_alloc(size: usize) {
    LIVE_ALLOCATIONS.with(|c| c.set(c.get() + 1));
    LIVE_BYTES.with(|c| c.set(c.get() + size));
    TOTAL_ALLOCATIONS.with(|c| c.set(c.get() + 1));
}

#[inline]
pub(crate) fn record_free(size: usize) {
    LIVE_ALLOCATIONS.with(|c| c.set(c.get().saturating_sub(1)));
    LIVE_BYTES.with(|c| c.set(c.get().saturating_sub(size)));
    TOTAL_FREES.with(|c| c.set(c.get() + 1));
}

/// Adjust live bytes when a buffer is resized in place
#[inline]
pub(crate) fn record_resize(old_size: usize, new_size: usize) {
    LIVE_BYTES.with(|c| c.set(c.get().saturating_sub(old_size) + new_size));
}
