//! Reference counting smart pointer
//!
//! Optimized for minimal overhead: the header and the value share one
//! allocation and hot path operations are always inlined. Counting is
//! non-atomic and the pointer is neither `Send` nor `Sync`.

use super::stats;
use crate::allocator::{alloc_box, free_box, ObjectHeader};
use crate::error::Result;
use crate::logging::{log_object_created, log_object_destroyed, trace};
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ops::Deref;
use core::ptr::NonNull;

/// Header and value, allocated together
#[repr(C)]
pub(crate) struct RcBox<T> {
    header: ObjectHeader,
    value: T,
}

/// Outcome of `RefCount::release`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Other references remain; carries the new count
    Live(usize),
    /// This was the last reference and the object has been freed
    Destroyed,
}

/// Owning reference to a counted object
///
/// Each `RefCount` is one release obligation. `retain` (or `clone`) creates
/// another; `release` (or dropping) discharges one. Because `release`
/// consumes the handle, a handle cannot be released twice or used after its
/// release.
pub struct RefCount<T> {
    ptr: NonNull<RcBox<T>>,
    _marker: PhantomData<RcBox<T>>,
}

impl<T> RefCount<T> {
    /// Allocate a new object holding `value` with a count of 1
    #[inline]
    pub fn new(value: T) -> Result<Self> {
        let id = stats::next_object_id();
        let ptr = alloc_box(RcBox {
            header: ObjectHeader::new(id),
            value,
        })?;

        stats::record_created();
        log_object_created(id, core::mem::size_of::<RcBox<T>>());

        Ok(Self {
            ptr,
            _marker: PhantomData,
        })
    }

    /// Take another reference (hot path, always inlined)
    #[inline(always)]
    pub fn retain(&self) -> Self {
        let count = self.header().inc();
        stats::record_retain();
        trace!(event = "retain", object_id = self.header().id(), count);

        Self {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Give up this reference, destroying the object if it was the last
    #[inline]
    pub fn release(self) -> Release {
        let this = ManuallyDrop::new(self);
        unsafe { this.dec() }
    }

    /// Current reference count
    #[inline]
    pub fn count(&self) -> usize {
        self.header().refcount()
    }

    /// Per-thread object serial, stable for the object's lifetime
    #[inline]
    pub fn id(&self) -> u64 {
        self.header().id()
    }

    /// True when both handles refer to the same object
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        a.ptr == b.ptr
    }

    /// Mutable access, only when this is the sole reference
    #[inline]
    pub fn get_mut(this: &mut Self) -> Option<&mut T> {
        if this.count() == 1 {
            Some(unsafe { &mut (*this.ptr.as_ptr()).value })
        } else {
            None
        }
    }

    #[inline(always)]
    fn header(&self) -> &ObjectHeader {
        unsafe { &(*self.ptr.as_ptr()).header }
    }

    /// Decrement (hot path); caller must not use `self` afterwards
    #[inline(always)]
    unsafe fn dec(&self) -> Release {
        let count = self.header().dec();
        stats::record_release();

        if count == 0 {
            self.destroy();
            Release::Destroyed
        } else {
            trace!(event = "release", object_id = self.header().id(), count);
            Release::Live(count)
        }
    }

    /// Drop the payload and free the object (cold path)
    #[cold]
    #[inline(never)]
    unsafe fn destroy(&self) {
        let id = self.header().id();
        log_object_destroyed(id);
        stats::record_destroyed();

        // Dropping the value releases anything the payload owns.
        free_box(self.ptr);
    }
}

impl<T> Clone for RefCount<T> {
    #[inline]
    fn clone(&self) -> Self {
        self.retain()
    }
}

impl<T> Drop for RefCount<T> {
    #[inline]
    fn drop(&mut self) {
        unsafe {
            self.dec();
        }
    }
}

impl<T> Deref for RefCount<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        unsafe { &(*self.ptr.as_ptr()).value }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for RefCount<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RefCount")
            .field("id", &self.id())
            .field("count", &self.count())
            .field("value", &**self)
            .finish()
    }
}
