//! Object lifecycle and access - C API
//!
//! Constructors return a new handle holding one reference. Element handles
//! passed in (`rc_new_refs`, `array_push_ptr`) stay owned by the caller; the
//! array retains its own reference to each element.

use super::handles::{AnyHandle, HandleTable, TABLE};
use super::ffi_result;
use crate::builtins;
use crate::error::{PayloadKindName, RcError, Result};
use crate::logging::{log_ffi_call, trace};
use crate::object::{self, Element, ObjectHandle};
use core::ffi::{c_char, CStr};

/// Create sized text from `len` bytes at `ptr`
///
/// # Safety
/// - `ptr` must point to at least `len` readable bytes (may be null when
///   `len` is 0)
/// - Returns 0 on failure (see `rc_last_error`)
#[no_mangle]
pub unsafe extern "C" fn rc_new_bytes(ptr: *const u8, len: usize) -> u64 {
    let result = slice_arg(ptr, len, "ptr")
        .and_then(object::create)
        .and_then(|h| register(AnyHandle::Object(h)));
    ffi_result("rc_new_bytes", result, 0)
}

/// Create legacy text from a NUL-terminated string
///
/// # Safety
/// - `str` must be null or point to a NUL-terminated string
#[no_mangle]
pub unsafe extern "C" fn rc_new_str(str: *const c_char) -> u64 {
    let result = if str.is_null() {
        Err(RcError::NullPointer { arg: "str" })
    } else {
        object::create_text(CStr::from_ptr(str)).and_then(|h| register(AnyHandle::Text(h)))
    };
    ffi_result("rc_new_str", result, 0)
}

/// Create an integer array from `len` values at `ptr`
///
/// # Safety
/// - `ptr` must point to at least `len` readable `i32`s (may be null when
///   `len` is 0)
#[no_mangle]
pub unsafe extern "C" fn rc_new_ints(ptr: *const i32, len: usize) -> u64 {
    let result = slice_arg(ptr, len, "ptr")
        .and_then(object::create_integers)
        .and_then(|h| register(AnyHandle::Object(h)));
    ffi_result("rc_new_ints", result, 0)
}

/// Create a reference array from `len` handles at `ptr`
///
/// Each element is retained by the array; the caller keeps its handles.
///
/// # Safety
/// - `ptr` must point to at least `len` readable handles (may be null when
///   `len` is 0)
#[no_mangle]
pub unsafe extern "C" fn rc_new_refs(ptr: *const u64, len: usize) -> u64 {
    let result = slice_arg(ptr, len, "ptr").and_then(|raw| {
        TABLE.with(|t| {
            let mut table = t.borrow_mut();
            let elements = raw
                .iter()
                .map(|&h| object_ref(table.get(h)?, PayloadKindName::Sized).map(ObjectHandle::retain))
                .collect::<Result<Vec<_>>>()?;
            let array = object::create_references(elements)?;
            table.insert(AnyHandle::Object(array))
        })
    });
    ffi_result("rc_new_refs", result, 0)
}

/// Number of elements (arrays) or bytes (text)
#[no_mangle]
pub extern "C" fn array_len(handle: u64) -> usize {
    let result = TABLE.with(|t| {
        t.borrow().get(handle).map(|h| match h {
            AnyHandle::Text(text) => text.len(),
            AnyHandle::Object(obj) => obj.len(),
        })
    });
    ffi_result("array_len", result, 0)
}

/// Element 0 of an integer array; 0 for an empty array
#[no_mangle]
pub extern "C" fn array_first_int(handle: u64) -> i32 {
    let result = with_object(handle, PayloadKindName::IntegerArray, |obj| obj.first_integer());
    ffi_result("array_first_int", result, 0)
}

/// Last element of an integer array; 0 for an empty array
#[no_mangle]
pub extern "C" fn array_last_int(handle: u64) -> i32 {
    let result = with_object(handle, PayloadKindName::IntegerArray, |obj| obj.last_integer());
    ffi_result("array_last_int", result, 0)
}

/// Element 0 of a reference array as a new handle; 0 for an empty array
///
/// The returned handle holds its own reference and must be dropped.
#[no_mangle]
pub extern "C" fn array_first_ptr(handle: u64) -> u64 {
    let result = element_handle(handle, |obj| obj.first_reference());
    ffi_result("array_first_ptr", result, 0)
}

/// Last element of a reference array as a new handle; 0 for an empty array
#[no_mangle]
pub extern "C" fn array_last_ptr(handle: u64) -> u64 {
    let result = element_handle(handle, |obj| obj.last_reference());
    ffi_result("array_last_ptr", result, 0)
}

/// Append an integer, consuming one reference to `array`
///
/// Returns the handle to use from now on: the same object when the caller
/// held the only reference, otherwise a copy. On failure returns 0 and
/// `array` is left as it was.
#[no_mangle]
pub extern "C" fn array_push_int(array: u64, value: i32) -> u64 {
    log_ffi_call("array_push_int", array);
    let result = push_element(array, PayloadKindName::IntegerArray, |_| {
        Ok(Element::Integer(value))
    });
    ffi_result("array_push_int", result, 0)
}

/// Append a reference, consuming one reference to `array`
///
/// The array retains `value`; the caller keeps its own handle to it.
#[no_mangle]
pub extern "C" fn array_push_ptr(array: u64, value: u64) -> u64 {
    log_ffi_call("array_push_ptr", array);
    let result = push_element(array, PayloadKindName::ReferenceArray, |table| {
        let element = object_ref(table.get(value)?, PayloadKindName::Sized)?.retain();
        Ok(Element::Reference(element))
    });
    ffi_result("array_push_ptr", result, 0)
}

/// Print an integer and newline; returns bytes written, -1 on failure
#[no_mangle]
pub extern "C" fn puts_int(value: i32) -> i32 {
    ffi_result("puts_int", builtins::print_int(value), -1)
}

/// Print a text object and newline; returns bytes written, -1 on failure
#[no_mangle]
pub extern "C" fn puts_str(handle: u64) -> i32 {
    let result = TABLE.with(|t| match t.borrow().get(handle)? {
        AnyHandle::Text(text) => builtins::print_legacy_text(text),
        AnyHandle::Object(obj) => builtins::print_text(obj),
    });
    ffi_result("puts_str", result, -1)
}

fn register(handle: AnyHandle) -> Result<u64> {
    TABLE.with(|t| t.borrow_mut().insert(handle))
}

/// Borrow a sized object out of a table entry
///
/// Legacy text is reported as a mismatch against `expected`.
pub(super) fn object_ref(handle: &AnyHandle, expected: PayloadKindName) -> Result<&ObjectHandle> {
    match handle {
        AnyHandle::Object(obj) => Ok(obj),
        AnyHandle::Text(_) => Err(RcError::KindMismatch {
            expected,
            found: PayloadKindName::LegacyText,
        }),
    }
}

fn with_object<T, F>(handle: u64, expected: PayloadKindName, f: F) -> Result<T>
where
    F: FnOnce(&ObjectHandle) -> Result<T>,
{
    TABLE.with(|t| {
        let table = t.borrow();
        f(object_ref(table.get(handle)?, expected)?)
    })
}

/// Register a reference array element as a new handle (0 for none)
fn element_handle<F>(handle: u64, f: F) -> Result<u64>
where
    F: for<'a> FnOnce(&'a ObjectHandle) -> Result<Option<&'a ObjectHandle>>,
{
    TABLE.with(|t| {
        let mut table = t.borrow_mut();
        let array = object_ref(table.get(handle)?, PayloadKindName::ReferenceArray)?;
        let element = f(array)?.map(ObjectHandle::retain);
        match element {
            Some(e) => table.insert(AnyHandle::Object(e)),
            None => Ok(0),
        }
    })
}

fn push_element<F>(array: u64, expected: PayloadKindName, make_element: F) -> Result<u64>
where
    F: FnOnce(&HandleTable) -> Result<Element>,
{
    TABLE.with(|t| {
        let mut table = t.borrow_mut();
        let element = make_element(&table)?;
        table.ensure_room()?;

        let mut handle = table.detach_object(array, expected)?;
        match object::push(&mut handle, element) {
            Ok(()) => {
                table.settle(array);
                trace!(event = "array_push", object_id = handle.id(), len = handle.len());
                table.insert(AnyHandle::Object(handle))
            }
            Err(err) => {
                table.reattach(array, handle);
                Err(err)
            }
        }
    })
}

/// View a C pointer/length pair as a slice
///
/// # Safety
/// Same contract as `slice::from_raw_parts` when `ptr` is non-null.
unsafe fn slice_arg<'a, T>(ptr: *const T, len: usize, arg: &'static str) -> Result<&'a [T]> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(RcError::NullPointer { arg });
    }
    Ok(core::slice::from_raw_parts(ptr, len))
}
