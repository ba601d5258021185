//! Object metadata - the header prefixed to every counted object
//!
//! Design: The counter is a plain `Cell`. Objects never cross threads, so
//! increments and decrements need no atomics.

use core::cell::Cell;

/// Object header - lives in the same allocation as the object value
#[repr(C)]
pub struct ObjectHeader {
    id: u64,
    refcount: Cell<usize>,
}

impl ObjectHeader {
    /// Create header for a new object (count starts at 1)
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            refcount: Cell::new(1),
        }
    }

    /// Per-thread serial number, used to correlate log events
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn refcount(&self) -> usize {
        self.refcount.get()
    }

    /// Increment and return the new count
    ///
    /// Aborts on overflow: a wrapped counter would free a live object.
    #[inline(always)]
    pub fn inc(&self) -> usize {
        let Some(next) = self.refcount.get().checked_add(1) else {
            std::process::abort();
        };
        self.refcount.set(next);
        next
    }

    /// Decrement and return the new count
    #[inline(always)]
    pub fn dec(&self) -> usize {
        let old = self.refcount.get();
        debug_assert!(old > 0, "refcount underflow");
        let next = old - 1;
        self.refcount.set(next);
        next
    }
}
