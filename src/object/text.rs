//! Text payloads - sized buffers and legacy C strings
//!
//! Both keep a trailing NUL so the bytes can be handed to C as a string.
//! `TextBuffer` records its length and may contain embedded zeros;
//! `LegacyText` has no length and ends at its first NUL.

use crate::allocator::Storage;
use crate::error::Result;
use crate::rc::RefCount;
use core::ffi::CStr;

/// Handle to a legacy terminator-delimited text object
pub type TextHandle = RefCount<LegacyText>;

/// Sized text: `len` payload bytes followed by one terminator byte
pub struct TextBuffer {
    bytes: Storage<u8>,
}

impl TextBuffer {
    /// Copy `src` and append the terminator
    pub fn from_bytes(src: &[u8]) -> Result<Self> {
        let mut bytes = Storage::with_capacity(src.len() + 1)?;
        bytes.extend_from_slice(src)?;
        bytes.push(0)?;
        Ok(Self { bytes })
    }

    /// Payload bytes, without the terminator
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// Payload bytes followed by the terminator
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl core::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes()))
    }
}

/// Legacy text object: a copied C string
pub struct LegacyText {
    bytes: Storage<u8>,
}

impl LegacyText {
    /// Copy a C string, including its terminator
    pub fn from_c_str(src: &CStr) -> Result<Self> {
        let bytes = Storage::from_slice(src.to_bytes_with_nul())?;
        Ok(Self { bytes })
    }

    /// Bytes up to (not including) the terminator
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.as_c_str().to_bytes()
    }

    #[inline]
    pub fn as_c_str(&self) -> &CStr {
        // SAFETY: copied from a `CStr`, so exactly one NUL, at the end
        unsafe { CStr::from_bytes_with_nul_unchecked(&self.bytes) }
    }

    /// Length found by scanning for the terminator
    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl core::fmt::Debug for LegacyText {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self.as_c_str())
    }
}

/// Create a legacy text object from a C string
pub fn create_text(src: &CStr) -> Result<TextHandle> {
    RefCount::new(LegacyText::from_c_str(src)?)
}
