//! Array payloads - integers or owned references, fixed at creation
//!
//! Empty-array policy: first/last on a zero-length array return a zero
//! sentinel (`0`, or no reference) by default. This is a compatibility
//! choice that callers can observe. `EmptyAccessPolicy::Strict` turns it
//! into `EmptyContainerAccess`.

use super::ObjectHandle;
use crate::allocator::Storage;
use crate::config::{self, EmptyAccessPolicy};
use crate::error::{PayloadKindName, RcError, Result};

/// Array elements, tagged by kind
#[derive(Debug)]
pub enum Elements {
    Integers(Storage<i32>),
    References(Storage<ObjectHandle>),
}

/// Element kind of an array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Integer,
    Reference,
}

/// A single value to append
#[derive(Debug)]
pub enum Element {
    Integer(i32),
    Reference(ObjectHandle),
}

impl ElementKind {
    pub(crate) fn name(self) -> PayloadKindName {
        match self {
            Self::Integer => PayloadKindName::IntegerArray,
            Self::Reference => PayloadKindName::ReferenceArray,
        }
    }
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Integer(_) => ElementKind::Integer,
            Self::Reference(_) => ElementKind::Reference,
        }
    }
}

impl Elements {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Integers(_) => ElementKind::Integer,
            Self::References(_) => ElementKind::Reference,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Integers(items) => items.len(),
            Self::References(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn integers(&self) -> Result<&[i32]> {
        match self {
            Self::Integers(items) => Ok(items.as_slice()),
            Self::References(_) => Err(self.mismatch(ElementKind::Integer)),
        }
    }

    pub fn references(&self) -> Result<&[ObjectHandle]> {
        match self {
            Self::References(items) => Ok(items.as_slice()),
            Self::Integers(_) => Err(self.mismatch(ElementKind::Reference)),
        }
    }

    /// Element 0 under the configured empty-array policy
    pub fn first_integer(&self) -> Result<i32> {
        self.first_integer_with(config::empty_access_policy())
    }

    /// Element `len - 1` under the configured empty-array policy
    pub fn last_integer(&self) -> Result<i32> {
        self.last_integer_with(config::empty_access_policy())
    }

    pub fn first_reference(&self) -> Result<Option<&ObjectHandle>> {
        self.first_reference_with(config::empty_access_policy())
    }

    pub fn last_reference(&self) -> Result<Option<&ObjectHandle>> {
        self.last_reference_with(config::empty_access_policy())
    }

    pub fn first_integer_with(&self, policy: EmptyAccessPolicy) -> Result<i32> {
        let item = self.integers()?.first().copied();
        or_sentinel(item, 0, policy, "first_integer")
    }

    pub fn last_integer_with(&self, policy: EmptyAccessPolicy) -> Result<i32> {
        let item = self.integers()?.last().copied();
        or_sentinel(item, 0, policy, "last_integer")
    }

    pub fn first_reference_with(&self, policy: EmptyAccessPolicy) -> Result<Option<&ObjectHandle>> {
        let item = self.references()?.first();
        or_sentinel(item.map(Some), None, policy, "first_reference")
    }

    pub fn last_reference_with(&self, policy: EmptyAccessPolicy) -> Result<Option<&ObjectHandle>> {
        let item = self.references()?.last();
        or_sentinel(item.map(Some), None, policy, "last_reference")
    }

    /// `KindMismatch` unless `value` fits this array
    pub fn check_accepts(&self, value: &Element) -> Result<()> {
        if value.kind() == self.kind() {
            Ok(())
        } else {
            Err(self.mismatch(value.kind()))
        }
    }

    pub(crate) fn push(&mut self, value: Element) -> Result<()> {
        match (self, value) {
            (Self::Integers(items), Element::Integer(v)) => items.push(v),
            (Self::References(items), Element::Reference(h)) => items.push(h),
            (this, value) => Err(this.mismatch(value.kind())),
        }
    }

    /// Copy with room for `extra` more elements; references are retained
    pub(crate) fn try_clone_with_room(&self, extra: usize) -> Result<Self> {
        Ok(match self {
            Self::Integers(items) => Self::Integers(items.try_clone_with_room(extra)?),
            Self::References(items) => Self::References(items.try_clone_with_room(extra)?),
        })
    }

    fn mismatch(&self, expected: ElementKind) -> RcError {
        RcError::KindMismatch {
            expected: expected.name(),
            found: self.kind().name(),
        }
    }
}

#[inline]
fn or_sentinel<T>(
    item: Option<T>,
    sentinel: T,
    policy: EmptyAccessPolicy,
    op: &'static str,
) -> Result<T> {
    match (item, policy) {
        (Some(item), _) => Ok(item),
        (None, EmptyAccessPolicy::ZeroSentinel) => Ok(sentinel),
        (None, EmptyAccessPolicy::Strict) => Err(RcError::EmptyContainerAccess { op }),
    }
}
