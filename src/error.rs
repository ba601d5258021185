//! Runtime errors - one taxonomy shared by the Rust API and the C surface
//!
//! Every variant maps to a stable negative code so C callers can read the
//! failure back through `rc_last_error`.

use std::io;

/// Runtime error
#[derive(Debug)]
pub enum RcError {
    /// Allocation of an object box or payload buffer failed
    OutOfMemory { requested: usize },
    /// first/last on a zero-length array while the strict policy is active
    EmptyContainerAccess { op: &'static str },
    /// Operation on a C handle whose object has already been destroyed
    UseAfterFree { handle: u64 },
    /// Release of a C handle whose object has already been destroyed
    DoubleRelease { handle: u64 },
    /// Payload is not the shape the operation expects
    KindMismatch { expected: PayloadKindName, found: PayloadKindName },
    /// C handle that this thread never issued
    InvalidHandle { handle: u64 },
    /// Null pointer passed with a non-zero length
    NullPointer { arg: &'static str },
    /// Console write failed
    Output(io::Error),
}

/// Payload shape names used in `KindMismatch`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKindName {
    Text,
    LegacyText,
    IntegerArray,
    ReferenceArray,
    /// Any array, when the element kind does not matter
    Array,
    /// Any sized object (text or array), as opposed to legacy text
    Sized,
}

impl RcError {
    /// Stable error code for the C surface (0 means no error)
    pub fn code(&self) -> i32 {
        match self {
            Self::OutOfMemory { .. } => -1,
            Self::EmptyContainerAccess { .. } => -2,
            Self::UseAfterFree { .. } => -3,
            Self::DoubleRelease { .. } => -4,
            Self::KindMismatch { .. } => -5,
            Self::InvalidHandle { .. } => -6,
            Self::NullPointer { .. } => -7,
            Self::Output(_) => -8,
        }
    }
}

impl core::fmt::Display for PayloadKindName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::LegacyText => "legacy text",
            Self::IntegerArray => "integer array",
            Self::ReferenceArray => "reference array",
            Self::Array => "array",
            Self::Sized => "sized",
        };
        f.write_str(name)
    }
}

impl core::fmt::Display for RcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "Out of memory allocating {} bytes", requested)
            }
            Self::EmptyContainerAccess { op } => {
                write!(f, "{} called on an empty array", op)
            }
            Self::UseAfterFree { handle } => {
                write!(f, "Handle {:#x} refers to a destroyed object", handle)
            }
            Self::DoubleRelease { handle } => {
                write!(f, "Handle {:#x} released after its object was destroyed", handle)
            }
            Self::KindMismatch { expected, found } => {
                write!(f, "Expected {} payload, found {}", expected, found)
            }
            Self::InvalidHandle { handle } => write!(f, "Unknown handle {:#x}", handle),
            Self::NullPointer { arg } => write!(f, "Null pointer passed for `{}`", arg),
            Self::Output(err) => write!(f, "Console output failed: {}", err),
        }
    }
}

impl std::error::Error for RcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Output(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for RcError {
    fn from(err: io::Error) -> Self {
        Self::Output(err)
    }
}

pub type Result<T> = core::result::Result<T, RcError>;
