//! Allocator tests
//!
//! - Boxes: allocation, drop-in-place, accounting
//! - Storage: reservation, growth, adoption, cloning
//! - Header: counter transitions

use super::*;
use core::cell::Cell;
use std::rc::Rc;

// ===== Box Tests =====

#[test]
fn box_roundtrip_is_balanced() {
    let before = stats();

    let ptr = alloc_box(42u64).expect("alloc");
    assert_eq!(unsafe { *ptr.as_ptr() }, 42);
    assert_eq!(stats().outstanding_since(&before), 1);

    unsafe { free_box(ptr) };
    assert_eq!(stats().outstanding_since(&before), 0);
    assert_eq!(stats().live_bytes, before.live_bytes);
}

#[test]
fn free_box_runs_destructor() {
    struct Flag(Rc<Cell<bool>>);
    impl Drop for Flag {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    let dropped = Rc::new(Cell::new(false));
    let ptr = alloc_box(Flag(dropped.clone())).expect("alloc");
    assert!(!dropped.get());

    unsafe { free_box(ptr) };
    assert!(dropped.get());
}

// ===== Storage Tests =====

#[test]
fn storage_from_slice_copies_exactly() {
    let storage = Storage::from_slice(&[1i32, 2, 3]).expect("storage");
    assert_eq!(storage.as_slice(), &[1, 2, 3]);
    assert_eq!(storage.reserved_bytes(), 3 * core::mem::size_of::<i32>());
}

#[test]
fn empty_storage_allocates_nothing() {
    let before = stats();
    let storage = Storage::<i32>::from_slice(&[]).expect("storage");
    assert!(storage.is_empty());
    assert_eq!(stats().outstanding_since(&before), 0);
}

#[test]
fn storage_growth_keeps_single_allocation() {
    let before = stats();
    let mut storage = Storage::<i32>::with_capacity(1).expect("storage");

    for i in 0..100 {
        storage.push(i).expect("push");
    }

    assert_eq!(storage.len(), 100);
    assert_eq!(storage[99], 99);
    assert_eq!(stats().outstanding_since(&before), 1);
    assert_eq!(stats().live_bytes - before.live_bytes, storage.reserved_bytes());

    drop(storage);
    assert_eq!(stats().outstanding_since(&before), 0);
    assert_eq!(stats().live_bytes, before.live_bytes);
}

#[test]
fn push_into_empty_storage_records_allocation() {
    let before = stats();
    let mut storage = Storage::<u8>::with_capacity(0).expect("storage");
    assert_eq!(stats().outstanding_since(&before), 0);

    storage.push(7).expect("push");
    assert_eq!(stats().outstanding_since(&before), 1);
}

#[test]
fn adopted_vector_is_accounted() {
    let before = stats();
    let storage = Storage::adopt(vec![1u16, 2, 3]);
    assert_eq!(stats().outstanding_since(&before), 1);
    drop(storage);
    assert_eq!(stats().outstanding_since(&before), 0);
}

#[test]
fn clone_with_room_reserves_extra() {
    let storage = Storage::from_slice(&[9u8, 8]).expect("storage");
    let copy = storage.try_clone_with_room(1).expect("clone");
    assert_eq!(copy.as_slice(), &[9, 8]);
    assert_eq!(copy.reserved_bytes(), 3);
}

#[test]
fn absurd_reservation_reports_out_of_memory() {
    let err = Storage::<u64>::with_capacity(usize::MAX / 4).unwrap_err();
    assert!(matches!(err, crate::RcError::OutOfMemory { .. }));
}

// ===== Header Tests =====

#[test]
fn header_counts_from_one() {
    let header = ObjectHeader::new(5);
    assert_eq!(header.id(), 5);
    assert_eq!(header.refcount(), 1);
    assert_eq!(header.inc(), 2);
    assert_eq!(header.dec(), 1);
    assert_eq!(header.dec(), 0);
}
