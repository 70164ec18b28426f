//! Handles the host holds across calls.
//!
//! There are two, and both are meant to live as long as the host's UI
//! process:
//! - `KeypunkGenerator` owns the stretched-key cache. Deriving a PBKDF2 key
//!   is the slow step, so one generator should serve every site lookup;
//!   `keypunk_generator_clear` wipes the keys when the user locks, and
//!   `keypunk_generator_free` drops them for good.
//! - `KeypunkSession` holds the master secret while UI windows open and
//!   close. It is never persisted; freeing it zeroizes every entry.
//!
//! Live handles are registered by address. A freed, foreign or repeated
//! handle is not in the registry, so calls with it return
//! `KeypunkError::InvalidHandle` and `free` ignores it.

use crate::{Generator, SessionCache};
use std::collections::HashSet;
use std::sync::{LazyLock, Mutex};

/// Global registry of live Generator handles
static GENERATOR_HANDLES: LazyLock<Mutex<HashSet<usize>>> =
    LazyLock::new(|| Mutex::new(HashSet::new()));

/// Global registry of live SessionCache handles
static SESSION_HANDLES: LazyLock<Mutex<HashSet<usize>>> =
    LazyLock::new(|| Mutex::new(HashSet::new()));

/// Generates an opaque FFI handle type with validity tracking.
///
/// This macro creates:
/// - A `#[repr(C)]` struct with zero-sized private field
/// - `into_opaque_ptr`: box the inner value and register the pointer
/// - `from_opaque_ptr`: unregister and take the inner value back (returns `Option`)
/// - `is_valid`: check whether a handle is registered
/// - `as_ref`: borrow the inner value (returns `Option`)
macro_rules! opaque_handle {
    (
        $(#[$meta:meta])*
        $handle:ident,
        $inner:ty,
        $registry:ident
    ) => {
        $(#[$meta])*
        #[repr(C)]
        pub struct $handle {
            _private: [u8; 0],
        }

        impl $handle {
            /// Convert from inner type to opaque FFI handle.
            ///
            /// The returned pointer must eventually reach `from_opaque_ptr`
            /// or the value leaks.
            pub(crate) fn into_opaque_ptr(inner: $inner) -> *mut Self {
                let ptr = Box::into_raw(Box::new(inner)) as *mut Self;
                if let Ok(mut handles) = $registry.lock() {
                    handles.insert(ptr as usize);
                }
                ptr
            }

            /// Convert from opaque FFI handle back to inner type.
            ///
            /// Returns `None` for null, freed or foreign pointers. On success
            /// the handle is unregistered and cannot be used again.
            ///
            /// # Safety
            /// - If `Some` is returned, the pointer is consumed and must not be used again
            pub(crate) unsafe fn from_opaque_ptr(ptr: *mut Self) -> Option<$inner> {
                if ptr.is_null() {
                    return None;
                }
                let addr = ptr as usize;
                let registered = $registry
                    .lock()
                    .map(|mut handles| handles.remove(&addr))
                    .unwrap_or(false);
                if !registered {
                    return None;
                }
                // SAFETY: Handle was registered, so it came from into_opaque_ptr
                Some(unsafe { *Box::from_raw(ptr as *mut $inner) })
            }

            /// Check if a handle is valid (registered and not freed).
            pub(crate) fn is_valid(ptr: *const Self) -> bool {
                if ptr.is_null() {
                    return false;
                }
                $registry
                    .lock()
                    .map(|handles| handles.contains(&(ptr as usize)))
                    .unwrap_or(false)
            }

            /// Borrow the inner type from an opaque pointer.
            ///
            /// Returns `None` if the handle is invalid.
            ///
            /// # Safety
            /// - The handle must not be freed while the reference is alive
            pub(crate) unsafe fn as_ref<'a>(ptr: *const Self) -> Option<&'a $inner> {
                if !Self::is_valid(ptr) {
                    return None;
                }
                // SAFETY: Handle is registered, so pointer is valid and aligned
                Some(unsafe { &*(ptr as *const $inner) })
            }
        }
    };
}

opaque_handle!(
    /// Opaque handle for Generator instances
    ///
    /// Owns the stretched-key cache, so hosts should keep one handle for the
    /// lifetime of the process rather than one per call.
    ///
    /// # Safety
    /// - Create with `keypunk_generator_new`
    /// - Free with `keypunk_generator_free`
    /// - Never dereference from C code
    KeypunkGenerator,
    Generator,
    GENERATOR_HANDLES
);

opaque_handle!(
    /// Opaque handle for SessionCache instances
    ///
    /// # Safety
    /// - Create with `keypunk_session_new`
    /// - Free with `keypunk_session_free`
    /// - Never dereference from C code
    KeypunkSession,
    SessionCache,
    SESSION_HANDLES
);
