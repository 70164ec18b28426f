//! C FFI wrappers for the volatile session cache.
//!
//! UI windows come and go; the host keeps one session handle so the master
//! secret survives between them without ever touching disk.

use crate::SessionCache;
use crate::ffi::error::KeypunkError;
use crate::ffi::handles::KeypunkSession;
use crate::ffi::{read_str, write_output};
use std::panic::catch_unwind;

/// Create an empty session cache.
///
/// # Safety
/// - Returned handle must be freed with `keypunk_session_free`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keypunk_session_new() -> *mut KeypunkSession {
    catch_unwind(|| KeypunkSession::into_opaque_ptr(SessionCache::new()))
        .unwrap_or(std::ptr::null_mut())
}

/// Free a session cache, wiping every stored value.
///
/// # Safety
/// - `handle` must have been created by `keypunk_session_new`
/// - `handle` must not be used after this call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keypunk_session_free(handle: *mut KeypunkSession) {
    let _ = catch_unwind(|| {
        // SAFETY: If Some is returned we own the cache and drop it here
        unsafe {
            let _session = KeypunkSession::from_opaque_ptr(handle);
        }
    });
}

/// Store a UTF-8 value under a UTF-8 key, replacing (and wiping) any previous value.
///
/// # Safety
/// - `key` and `value` must reference at least `key_len` / `value_len` readable bytes
/// - `handle` must remain valid for the duration of the call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keypunk_session_set(
    handle: *const KeypunkSession,
    key: *const u8,
    key_len: usize,
    value: *const u8,
    value_len: usize,
) -> KeypunkError {
    let result = catch_unwind(|| {
        let session = match unsafe { KeypunkSession::as_ref(handle) } {
            Some(session) => session,
            None => return KeypunkError::InvalidHandle,
        };
        let (key, value) = match unsafe { (read_str(key, key_len), read_str(value, value_len)) } {
            (Ok(key), Ok(value)) => (key, value),
            (Err(e), _) | (_, Err(e)) => return e,
        };
        session.cache(key, Some(value));
        KeypunkError::Ok
    });
    result.unwrap_or(KeypunkError::Internal)
}

/// Read the value stored under a key.
///
/// # Returns
/// - `KeypunkError::Ok` (0) with the value copied to `output`
/// - `KeypunkError::NotFound` (12) if nothing is stored under `key`
/// - `KeypunkError::BufferTooSmall` (8) with the required size in `*output_len`
///
/// # Safety
/// - `key` must reference at least `key_len` readable bytes
/// - `output` must be writable for `*output_len` bytes and `output_len` writable
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keypunk_session_get(
    handle: *const KeypunkSession,
    key: *const u8,
    key_len: usize,
    output: *mut u8,
    output_len: *mut usize,
) -> KeypunkError {
    let result = catch_unwind(|| {
        let session = match unsafe { KeypunkSession::as_ref(handle) } {
            Some(session) => session,
            None => return KeypunkError::InvalidHandle,
        };
        let key = match unsafe { read_str(key, key_len) } {
            Ok(key) => key,
            Err(e) => return e,
        };
        match session.cache(key, None) {
            Some(value) => unsafe { write_output(value.as_bytes(), output, output_len) },
            None => KeypunkError::NotFound,
        }
    });
    result.unwrap_or(KeypunkError::Internal)
}

/// Remove and wipe one entry. Removing a missing key is not an error.
///
/// # Safety
/// - `key` must reference at least `key_len` readable bytes
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keypunk_session_forget(
    handle: *const KeypunkSession,
    key: *const u8,
    key_len: usize,
) -> KeypunkError {
    let result = catch_unwind(|| {
        let session = match unsafe { KeypunkSession::as_ref(handle) } {
            Some(session) => session,
            None => return KeypunkError::InvalidHandle,
        };
        match unsafe { read_str(key, key_len) } {
            Ok(key) => {
                session.forget(key);
                KeypunkError::Ok
            }
            Err(e) => e,
        }
    });
    result.unwrap_or(KeypunkError::Internal)
}

/// Wipe every entry.
///
/// # Safety
/// - `handle` must remain valid for the duration of the call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keypunk_session_clear(handle: *const KeypunkSession) -> KeypunkError {
    let result = catch_unwind(|| match unsafe { KeypunkSession::as_ref(handle) } {
        Some(session) => {
            session.clear();
            KeypunkError::Ok
        }
        None => KeypunkError::InvalidHandle,
    });
    result.unwrap_or(KeypunkError::Internal)
}
