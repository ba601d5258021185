//! Lifecycle counters - per-thread, like the objects they describe

use core::cell::Cell;

thread_local! {
    static NEXT_ID: Cell<u64> = const { Cell::new(1) };
    static CREATED: Cell<usize> = const { Cell::new(0) };
    static DESTROYED: Cell<usize> = const { Cell::new(0) };
    static RETAINS: Cell<usize> = const { Cell::new(0) };
    static RELEASES: Cell<usize> = const { Cell::new(0) };
}

/// Reference counting statistics for the calling thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RcStats {
    pub objects_created: usize,
    pub objects_destroyed: usize,
    pub retains: usize,
    pub releases: usize,
}

impl RcStats {
    /// Objects created but not yet destroyed
    #[inline]
    pub fn live_objects(&self) -> usize {
        self.objects_created - self.objects_destroyed
    }
}

pub fn stats() -> RcStats {
    RcStats {
        objects_created: CREATED.with(Cell::get),
        objects_destroyed: DESTROYED.with(Cell::get),
        retains: RETAINS.with(Cell::get),
        releases: RELEASES.with(Cell::get),
    }
}

#[inline]
pub(crate) fn next_object_id() -> u64 {
    NEXT_ID.with(|c| {
        let id = c.get();
        c.set(id + 1);
        id
    })
}

#[inline]
pub(crate) fn record_created() {
    CREATED.with(|c| c.set(c.get() + 1));
}

#[inline]
pub(crate) fn record_destroyed() {
    DESTROYED.with(|c| c.set(c.get() + 1));
}

#[inline]
pub(crate) fn record_retain() {
    RETAINS.with(|c| c.set(c.get() + 1));
}

#[inline]
pub(crate) fn record_release() {
    RELEASES.with(|c| c.set(c.get() + 1));
}
