//! Payload buffers - owned, growable, accounted
//!
//! A thin wrapper over `Vec<T>` whose every reservation goes through
//! `try_reserve`, so exhaustion is reported rather than aborting, and whose
//! capacity changes are mirrored into the allocator statistics.

use super::stats;
use crate::error::{RcError, Result};
use core::ops::Deref;

/// Owned payload buffer
pub struct Storage<T> {
    items: Vec<T>,
    accounted_bytes: usize,
}

impl<T> Storage<T> {
    /// Reserve room for exactly `capacity` elements
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut items = Vec::new();
        items
            .try_reserve_exact(capacity)
            .map_err(|_| out_of_memory::<T>(capacity))?;

        let mut storage = Self {
            items,
            accounted_bytes: 0,
        };
        storage.account();
        Ok(storage)
    }

    /// Take ownership of an existing vector
    pub fn adopt(items: Vec<T>) -> Self {
        let mut storage = Self {
            items,
            accounted_bytes: 0,
        };
        storage.account();
        storage
    }

    /// Append one element, growing geometrically
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.items.len() == self.items.capacity() {
            let additional = self.items.len().max(4);
            self.items
                .try_reserve(additional)
                .map_err(|_| out_of_memory::<T>(self.items.len() + additional))?;
            self.account();
        }
        self.items.push(value);
        Ok(())
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Bytes currently reserved for this buffer
    #[inline]
    pub fn reserved_bytes(&self) -> usize {
        self.accounted_bytes
    }

    /// Sync the statistics with the vector's current capacity
    fn account(&mut self) {
        let bytes = self.items.capacity() * core::mem::size_of::<T>();
        match (self.accounted_bytes, bytes) {
            (old, new) if old == new => {}
            (0, new) => stats::record_alloc(new),
            (old, 0) => stats::record_free(old),
            (old, new) => stats::record_resize(old, new),
        }
        self.accounted_bytes = bytes;
    }
}

impl<T: Copy> Storage<T> {
    /// Copy a slice into a new buffer of exactly its length
    pub fn from_slice(items: &[T]) -> Result<Self> {
        let mut storage = Self::with_capacity(items.len())?;
        storage.extend_from_slice(items)?;
        Ok(storage)
    }

    /// Append a copy of `items`, reserving only what is missing
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<()> {
        let spare = self.items.capacity() - self.items.len();
        if items.len() > spare {
            self.items
                .try_reserve(items.len())
                .map_err(|_| out_of_memory::<T>(self.items.len() + items.len()))?;
            self.account();
        }
        self.items.extend_from_slice(items);
        Ok(())
    }
}

impl<T: Clone> Storage<T> {
    /// Clone every element into a new buffer with room for `extra` more
    pub fn try_clone_with_room(&self, extra: usize) -> Result<Self> {
        let mut storage = Self::with_capacity(self.items.len() + extra)?;
        storage.items.extend(self.items.iter().cloned());
        Ok(storage)
    }
}

impl<T> Deref for Storage<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> Drop for Storage<T> {
    fn drop(&mut self) {
        if self.accounted_bytes > 0 {
            stats::record_free(self.accounted_bytes);
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

fn out_of_memory<T>(count: usize) -> RcError {
    RcError::OutOfMemory {
        requested: count.saturating_mul(core::mem::size_of::<T>()),
    }
}
