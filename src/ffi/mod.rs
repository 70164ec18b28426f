//! C FFI layer for keypunk-core
//!
//! Lets a non-Rust UI host call the generator. Profiles and KDF settings
//! cross the boundary as JSON (the same shape the profile store persists);
//! strings are UTF-8 pointer/length pairs. All functions are panic-safe.

mod buffers;
pub mod error;
pub mod generator;
pub mod handles;
pub mod session;

pub use error::KeypunkError;
pub(crate) use buffers::{read_str, write_output};
pub use handles::*;

// Re-export FFI functions for C clients
pub use generator::{
    keypunk_checksum, keypunk_generate, keypunk_generator_cached_keys, keypunk_generator_clear,
    keypunk_generator_free, keypunk_generator_new,
};
pub use session::{
    keypunk_session_clear, keypunk_session_forget, keypunk_session_free, keypunk_session_get,
    keypunk_session_new, keypunk_session_set,
};
