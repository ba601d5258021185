//! Object system - counted objects with text or array payloads
//!
//! Design: Two handle types that never mix:
//! - `ObjectHandle`: sized objects. The payload is a tagged `Payload`, either
//!   a text buffer with an explicit length or an array whose element kind is
//!   part of its type.
//! - `TextHandle`: legacy terminator-delimited text with no length field.
//!
//! Reference arrays own their elements. Inserting retains, destroying the
//! array releases every element.

pub mod array;
pub mod text;


pub use array::{Element, ElementKind, Elements};
pub use text::{create_text, LegacyText, TextBuffer, TextHandle};

use crate::allocator::Storage;
use crate::error::{PayloadKindName, RcError, Result};
use crate::logging::trace;
use crate::rc::RefCount;

/// Handle to a sized object
pub type ObjectHandle = RefCount<Payload>;

/// Sized object payload
#[derive(Debug)]
pub enum Payload {
    Text(TextBuffer),
    Array(Elements),
}

/// Payload discriminant without the data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    Array(ElementKind),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Text(_) => PayloadKind::Text,
            Self::Array(elements) => PayloadKind::Array(elements.kind()),
        }
    }

    /// Byte count for text, element count for arrays
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Array(elements) => elements.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read-only view of a text payload, valid while the handle is held
    pub fn text_view(&self) -> Result<&[u8]> {
        self.text().map(TextBuffer::as_bytes)
    }

    /// Array payload of either kind, or `KindMismatch` for text
    pub fn elements(&self) -> Result<&Elements> {
        self.array_as(PayloadKindName::Array)
    }

    /// Array payload; a text payload reports `expected` in the mismatch
    fn array_as(&self, expected: PayloadKindName) -> Result<&Elements> {
        match self {
            Self::Array(elements) => Ok(elements),
            Self::Text(_) => Err(RcError::KindMismatch {
                expected,
                found: PayloadKindName::Text,
            }),
        }
    }

    /// Array payload that should hold `kind` elements
    pub fn elements_of(&self, kind: ElementKind) -> Result<&Elements> {
        self.array_as(kind.name())
    }

    /// Text payload, or `KindMismatch` for arrays
    pub fn text(&self) -> Result<&TextBuffer> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Array(elements) => Err(RcError::KindMismatch {
                expected: PayloadKindName::Text,
                found: elements.kind().name(),
            }),
        }
    }

    pub fn first_integer(&self) -> Result<i32> {
        self.elements_of(ElementKind::Integer)?.first_integer()
    }

    pub fn last_integer(&self) -> Result<i32> {
        self.elements_of(ElementKind::Integer)?.last_integer()
    }

    /// Element 0 of a reference array; `None` is the null handle
    pub fn first_reference(&self) -> Result<Option<&ObjectHandle>> {
        self.elements_of(ElementKind::Reference)?.first_reference()
    }

    pub fn last_reference(&self) -> Result<Option<&ObjectHandle>> {
        self.elements_of(ElementKind::Reference)?.last_reference()
    }
}

/// Create a sized text object, copying `bytes`
///
/// Embedded zero bytes are kept; an empty slice yields a valid empty object.
pub fn create(bytes: &[u8]) -> Result<ObjectHandle> {
    let text = TextBuffer::from_bytes(bytes)?;
    RefCount::new(Payload::Text(text))
}

/// Create an integer array, copying `values`
pub fn create_integers(values: &[i32]) -> Result<ObjectHandle> {
    let storage = Storage::from_slice(values)?;
    RefCount::new(Payload::Array(Elements::Integers(storage)))
}

/// Create a reference array that takes over the given references
///
/// Callers that want to keep their own reference pass `handle.retain()`.
pub fn create_references(elements: Vec<ObjectHandle>) -> Result<ObjectHandle> {
    RefCount::new(Payload::Array(Elements::References(Storage::adopt(elements))))
}

/// Append an integer to an array
///
/// Mutates in place when `array` is the only reference. Otherwise the array
/// is copied, `array` is repointed at the copy and the other holders keep
/// the unchanged original.
pub fn push_integer(array: &mut ObjectHandle, value: i32) -> Result<()> {
    push(array, Element::Integer(value))
}

/// Append a reference, taking over `value`
pub fn push_reference(array: &mut ObjectHandle, value: ObjectHandle) -> Result<()> {
    push(array, Element::Reference(value))
}

/// Append one element with copy-on-write for shared arrays
pub fn push(array: &mut ObjectHandle, value: Element) -> Result<()> {
    array.elements_of(value.kind())?.check_accepts(&value)?;

    if let Some(Payload::Array(elements)) = RefCount::get_mut(array) {
        return elements.push(value);
    }

    trace!(event = "copy_on_write", object_id = array.id(), count = array.count());
    let mut copy = array.elements()?.try_clone_with_room(1)?;
    copy.push(value)?;

    let shared = core::mem::replace(array, RefCount::new(Payload::Array(copy))?);
    shared.release();
    Ok(())
}
