//! Handle table - generational indices for C callers
//!
//! C code never sees an object address. It gets a `u64` whose low 32 bits
//! are `slot index + 1` and whose high 32 bits are the slot generation, so
//! `0` is never a valid handle. A slot holds one Rust reference per
//! outstanding C reference; when the last one goes the slot's generation is
//! bumped, and any copy of the old handle becomes detectably stale.
//!
//! Generations never wrap: a slot whose generation reaches `u32::MAX` is
//! retired instead of reused, so a stale handle is always older than its
//! slot. The table holds at most `u32::MAX - 1` slots; past that, `insert`
//! reports `OutOfMemory`.

use crate::error::{PayloadKindName, RcError, Result};
use crate::object::{ObjectHandle, TextHandle};
use crate::rc::Release;
use core::cell::RefCell;

thread_local! {
    pub(crate) static TABLE: RefCell<HandleTable> = RefCell::new(HandleTable::new());
}

/// Either legacy shape, tagged
pub(crate) enum AnyHandle {
    Text(TextHandle),
    Object(ObjectHandle),
}

impl AnyHandle {
    fn retain(&self) -> Self {
        match self {
            Self::Text(h) => Self::Text(h.retain()),
            Self::Object(h) => Self::Object(h.retain()),
        }
    }

    fn release(self) -> Release {
        match self {
            Self::Text(h) => h.release(),
            Self::Object(h) => h.release(),
        }
    }

    pub(crate) fn count(&self) -> usize {
        match self {
            Self::Text(h) => h.count(),
            Self::Object(h) => h.count(),
        }
    }
}

struct Slot {
    generation: u32,
    refs: Vec<AnyHandle>,
}

/// Why a lookup is happening; decides which error a stale handle gets
#[derive(Clone, Copy)]
enum Access {
    Use,
    Release,
}

/// Slot limit; every `index + 1` below it fits the low 32 bits
const MAX_SLOTS: usize = u32::MAX as usize - 1;

pub(crate) struct HandleTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    max_slots: usize,
}

impl HandleTable {
    fn new() -> Self {
        Self::with_max_slots(MAX_SLOTS)
    }

    fn with_max_slots(max_slots: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            max_slots: max_slots.min(MAX_SLOTS),
        }
    }

    /// `OutOfMemory` unless one more `insert` is certain to succeed
    pub(crate) fn ensure_room(&self) -> Result<()> {
        if !self.free.is_empty() || self.slots.len() < self.max_slots {
            Ok(())
        } else {
            Err(table_full())
        }
    }

    /// Register a new C reference and return its handle
    ///
    /// On failure `handle` is dropped, releasing its reference.
    pub(crate) fn insert(&mut self, handle: AnyHandle) -> Result<u64> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = u32::try_from(self.slots.len())
                    .ok()
                    .filter(|&i| (i as usize) < self.max_slots)
                    .ok_or_else(table_full)?;
                self.slots.push(Slot {
                    generation: 0,
                    refs: Vec::new(),
                });
                index
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.refs.push(handle);
        Ok(encode(index, slot.generation))
    }

    /// Borrow the object behind `raw`
    pub(crate) fn get(&self, raw: u64) -> Result<&AnyHandle> {
        let index = self.locate(raw, Access::Use)?;
        self.slots[index]
            .refs
            .last()
            .ok_or(RcError::UseAfterFree { handle: raw })
    }

    /// One more C reference under the same handle; returns the new count
    pub(crate) fn retain(&mut self, raw: u64) -> Result<usize> {
        let index = self.locate(raw, Access::Use)?;
        let refs = &mut self.slots[index].refs;
        let extra = refs
            .last()
            .map(AnyHandle::retain)
            .ok_or(RcError::UseAfterFree { handle: raw })?;
        let count = extra.count();
        refs.push(extra);
        Ok(count)
    }

    /// Drop one C reference
    pub(crate) fn release(&mut self, raw: u64) -> Result<Release> {
        let handle = self.detach(raw, Access::Release)?;
        self.settle(raw);
        Ok(handle.release())
    }

    /// Take one reference out of its slot without retiring the slot
    ///
    /// Pair with `reattach` on failure or `settle` on success. Legacy text
    /// stays in place and is reported as a mismatch against `expected`.
    pub(crate) fn detach_object(
        &mut self,
        raw: u64,
        expected: PayloadKindName,
    ) -> Result<ObjectHandle> {
        match self.detach(raw, Access::Use)? {
            AnyHandle::Object(h) => Ok(h),
            text @ AnyHandle::Text(_) => {
                let index = self.locate(raw, Access::Use)?;
                self.slots[index].refs.push(text);
                Err(RcError::KindMismatch {
                    expected,
                    found: PayloadKindName::LegacyText,
                })
            }
        }
    }

    pub(crate) fn reattach(&mut self, raw: u64, handle: ObjectHandle) {
        if let Ok(index) = self.locate(raw, Access::Use) {
            self.slots[index].refs.push(AnyHandle::Object(handle));
        }
    }

    /// Retire the slot if its last reference was detached
    pub(crate) fn settle(&mut self, raw: u64) {
        let Ok(index) = self.locate(raw, Access::Use) else {
            return;
        };
        if self.slots[index].refs.is_empty() {
            self.retire(index);
        }
    }

    /// Number of live handles (distinct slots in use)
    pub(crate) fn live_handles(&self) -> usize {
        self.slots.iter().filter(|s| !s.refs.is_empty()).count()
    }

    /// Drop every outstanding reference; returns how many handles were live
    pub(crate) fn clear(&mut self) -> usize {
        let live: Vec<usize> = (0..self.slots.len())
            .filter(|&i| !self.slots[i].refs.is_empty())
            .collect();
        for &index in &live {
            self.slots[index].refs.clear();
            self.retire(index);
        }
        live.len()
    }

    /// Invalidate outstanding copies of a now-empty slot's handle
    ///
    /// The slot goes back on the free list unless its generation is spent.
    fn retire(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.generation = slot.generation.saturating_add(1);
        if slot.generation < u32::MAX {
            self.free.push(index as u32);
        }
    }

    fn detach(&mut self, raw: u64, access: Access) -> Result<AnyHandle> {
        let index = self.locate(raw, access)?;
        self.slots[index].refs.pop().ok_or(stale(raw, access))
    }

    fn locate(&self, raw: u64, access: Access) -> Result<usize> {
        let (index, generation) = decode(raw).ok_or(RcError::InvalidHandle { handle: raw })?;
        let slot = self
            .slots
            .get(index)
            .ok_or(RcError::InvalidHandle { handle: raw })?;

        if slot.generation == generation {
            Ok(index)
        } else if generation < slot.generation {
            Err(stale(raw, access))
        } else {
            Err(RcError::InvalidHandle { handle: raw })
        }
    }
}

fn table_full() -> RcError {
    RcError::OutOfMemory {
        requested: core::mem::size_of::<Slot>(),
    }
}

fn stale(raw: u64, access: Access) -> RcError {
    match access {
        Access::Use => RcError::UseAfterFree { handle: raw },
        Access::Release => RcError::DoubleRelease { handle: raw },
    }
}

#[inline]
fn encode(index: u32, generation: u32) -> u64 {
    ((generation as u64) << 32) | (index as u64 + 1)
}

#[inline]
fn decode(raw: u64) -> Option<(usize, u32)> {
    let low = (raw & 0xffff_ffff) as usize;
    if low == 0 {
        return None;
    }
    Some((low - 1, (raw >> 32) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::create_integers;

    fn object(value: i32) -> AnyHandle {
        AnyHandle::Object(create_integers(&[value]).expect("create"))
    }

    #[test]
    fn test_full_table_reports_out_of_memory() {
        let mut table = HandleTable::with_max_slots(2);
        let a = table.insert(object(1)).expect("first slot");
        let _b = table.insert(object(2)).expect("second slot");

        let err = table.insert(object(3)).unwrap_err();
        assert!(matches!(err, RcError::OutOfMemory { .. }));
        assert!(table.ensure_room().is_err());

        // A freed slot is usable again
        table.release(a).expect("release");
        assert!(table.insert(object(4)).is_ok());
    }

    #[test]
    fn test_encoded_index_stays_in_low_bits() {
        let raw = encode(MAX_SLOTS as u32 - 1, 7);
        assert_eq!(raw >> 32, 7);
        assert_eq!(decode(raw), Some((MAX_SLOTS - 1, 7)));
    }

    #[test]
    fn test_spent_generation_retires_slot() {
        let mut table = HandleTable::new();
        let first = table.insert(object(1)).expect("insert");
        let (index, _) = decode(first).expect("decode");

        // Jump to the last generation a slot may hand out
        table.slots[index].generation = u32::MAX - 1;
        let last = encode(index as u32, u32::MAX - 1);

        table.release(last).expect("release");
        assert_eq!(table.slots[index].generation, u32::MAX);
        assert!(!table.free.contains(&(index as u32)));

        // Old handles stay stale, with the error matching the access
        assert!(matches!(table.get(last), Err(RcError::UseAfterFree { .. })));
        assert!(matches!(table.release(last), Err(RcError::DoubleRelease { .. })));
        assert!(matches!(table.get(first), Err(RcError::UseAfterFree { .. })));

        let next = table.insert(object(2)).expect("insert");
        assert_ne!(decode(next).expect("decode").0, index);
    }
}
