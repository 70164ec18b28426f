//! Pointer/length helpers shared by the FFI entry points.

use crate::ffi::error::KeypunkError;
use std::slice;

/// Borrow a UTF-8 string from a pointer/length pair.
///
/// # Safety
/// `ptr` must point to at least `len` readable bytes that outlive `'a`.
pub(crate) unsafe fn read_str<'a>(ptr: *const u8, len: usize) -> Result<&'a str, KeypunkError> {
    if ptr.is_null() {
        return Err(KeypunkError::NullPointer);
    }
    // SAFETY: Null checked above, caller guarantees len readable bytes
    let bytes = unsafe { slice::from_raw_parts(ptr, len) };
    std::str::from_utf8(bytes).map_err(|_| KeypunkError::InvalidInput)
}

/// Copy `value` into a caller buffer sized by the in/out `output_len`.
///
/// On `BufferTooSmall` the required size is written back and the buffer is
/// left untouched. No NUL terminator is appended.
///
/// # Safety
/// `output` must be writable for `*output_len` bytes; `output_len` must be writable.
pub(crate) unsafe fn write_output(
    value: &[u8],
    output: *mut u8,
    output_len: *mut usize,
) -> KeypunkError {
    if output.is_null() || output_len.is_null() {
        return KeypunkError::NullPointer;
    }

    // SAFETY: output_len verified non-null
    let available_size = unsafe { *output_len };
    if value.len() > available_size {
        unsafe {
            *output_len = value.len();
        }
        return KeypunkError::BufferTooSmall;
    }

    // SAFETY: output is non-null and holds available_size >= value.len() bytes
    unsafe {
        std::ptr::copy_nonoverlapping(value.as_ptr(), output, value.len());
        *output_len = value.len();
    }
    KeypunkError::Ok
}
