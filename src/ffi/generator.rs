//! C FFI wrappers for password generation.
//!
//! Provides C-compatible functions with:
//! - Panic safety via catch_unwind
//! - Null pointer and handle validity checks
//! - Buffer overflow protection (in/out length, `BufferTooSmall`)
//! - Profiles and KDF settings passed as the JSON the profile store persists

use crate::ffi::error::KeypunkError;
use crate::ffi::handles::KeypunkGenerator;
use crate::ffi::{read_str, write_output};
use crate::{
    ChecksumConfig, DerivationProfile, Generator, HashAlgorithm, KdfConfig, KdfFunction,
    verification_checksum,
};
use serde_json::Value;
use std::panic::catch_unwind;
use zeroize::Zeroizing;

/// Parse a stored profile.
///
/// The algorithm name is checked on its own first so that an unknown name
/// reports `UnsupportedAlgorithm` instead of a generic parse failure.
pub(crate) fn parse_profile(json: &str) -> Result<DerivationProfile, KeypunkError> {
    let value: Value = serde_json::from_str(json).map_err(|_| KeypunkError::InvalidInput)?;
    if let Some(name) = value.pointer("/algorithm/name").and_then(Value::as_str) {
        name.parse::<HashAlgorithm>()?;
    }
    serde_json::from_value(value).map_err(|_| KeypunkError::InvalidInput)
}

/// Parse stored KDF settings, reporting an unknown `functionId` as `UnsupportedKdf`.
pub(crate) fn parse_kdf_config(json: &str) -> Result<KdfConfig, KeypunkError> {
    let value: Value = serde_json::from_str(json).map_err(|_| KeypunkError::InvalidInput)?;
    if let Some(id) = value.get("functionId").and_then(Value::as_str) {
        id.parse::<KdfFunction>()?;
    }
    serde_json::from_value(value).map_err(|_| KeypunkError::InvalidInput)
}

/// Create a generator with an empty stretched-key cache.
///
/// # Parameters
/// - `error_out`: Optional pointer receiving the error code (may be null)
///
/// # Returns
/// Generator handle, or null on failure.
///
/// # Safety
/// - `error_out`, if not null, must point to writable memory
/// - Returned handle must be freed with `keypunk_generator_free`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keypunk_generator_new(
    error_out: *mut KeypunkError,
) -> *mut KeypunkGenerator {
    let result = catch_unwind(|| {
        if !error_out.is_null() {
            unsafe { *error_out = KeypunkError::Ok };
        }
        KeypunkGenerator::into_opaque_ptr(Generator::new())
    });

    result.unwrap_or_else(|_| {
        if !error_out.is_null() {
            unsafe { *error_out = KeypunkError::Internal };
        }
        std::ptr::null_mut()
    })
}

/// Free a generator and wipe its cached keys.
///
/// Null, already-freed and foreign handles are ignored.
///
/// # Safety
/// - `handle` must have been created by `keypunk_generator_new`
/// - `handle` must not be used after this call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keypunk_generator_free(handle: *mut KeypunkGenerator) {
    let _ = catch_unwind(|| {
        // SAFETY: If Some is returned we own the generator and drop it here
        unsafe {
            let _generator = KeypunkGenerator::from_opaque_ptr(handle);
        }
    });
}

/// Number of stretched keys currently cached. Returns 0 for an invalid handle.
///
/// # Safety
/// - `handle` must remain valid for the duration of the call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keypunk_generator_cached_keys(handle: *const KeypunkGenerator) -> usize {
    let result = catch_unwind(|| match unsafe { KeypunkGenerator::as_ref(handle) } {
        Some(generator) => generator.key_derivation().cached_entries(),
        None => 0,
    });
    result.unwrap_or(0)
}

/// Wipe every cached stretched key (e.g. when the user locks the UI).
///
/// # Safety
/// - `handle` must remain valid for the duration of the call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keypunk_generator_clear(handle: *const KeypunkGenerator) -> KeypunkError {
    let result = catch_unwind(|| match unsafe { KeypunkGenerator::as_ref(handle) } {
        Some(generator) => {
            generator.key_derivation().clear();
            KeypunkError::Ok
        }
        None => KeypunkError::InvalidHandle,
    });
    result.unwrap_or(KeypunkError::Internal)
}

/// Generate the password for a site.
///
/// # Parameters
/// - `handle`: Generator handle (must be valid)
/// - `secret`, `secret_len`: UTF-8 master secret
/// - `site`, `site_len`: UTF-8 site identifier
/// - `profile_json`, `profile_json_len`: UTF-8 JSON `DerivationProfile`
/// - `kdf_json`, `kdf_json_len`: UTF-8 JSON `KdfConfig`; null disables stretching
/// - `output`: Buffer receiving the UTF-8 password (no NUL terminator)
/// - `output_len`: On input the buffer size; on output the password length
///   (or the required size if `BufferTooSmall`)
///
/// # Returns
/// - `KeypunkError::Ok` (0) on success
/// - `KeypunkError::NullPointer` (9) if a required pointer is null
/// - `KeypunkError::InvalidHandle` (10) if the handle is freed or unknown
/// - `KeypunkError::InvalidInput` (1) for bad UTF-8 or malformed JSON
/// - `KeypunkError::BufferTooSmall` (8) if `output` cannot hold the password
/// - Any configuration error code raised by generation
///
/// # Safety
/// Caller must ensure:
/// - Every non-null pointer references at least its stated length of readable memory
/// - `output` is writable for `*output_len` bytes and `output_len` is writable
/// - `handle` is not freed concurrently
///
/// Function is panic-safe and will never unwind across FFI boundary.
#[allow(clippy::too_many_arguments)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keypunk_generate(
    handle: *const KeypunkGenerator,
    secret: *const u8,
    secret_len: usize,
    site: *const u8,
    site_len: usize,
    profile_json: *const u8,
    profile_json_len: usize,
    kdf_json: *const u8,
    kdf_json_len: usize,
    output: *mut u8,
    output_len: *mut usize,
) -> KeypunkError {
    let result = catch_unwind(|| {
        if handle.is_null() {
            return KeypunkError::NullPointer;
        }
        let generator = match unsafe { KeypunkGenerator::as_ref(handle) } {
            Some(generator) => generator,
            None => return KeypunkError::InvalidHandle,
        };

        // SAFETY: Caller guarantees each pointer covers its length
        let (secret, site, profile_json) = match unsafe {
            (
                read_str(secret, secret_len),
                read_str(site, site_len),
                read_str(profile_json, profile_json_len),
            )
        } {
            (Ok(secret), Ok(site), Ok(profile)) => (secret, site, profile),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => return e,
        };

        let profile = match parse_profile(profile_json) {
            Ok(profile) => profile,
            Err(e) => return e,
        };

        let kdf_config = if kdf_json.is_null() {
            KdfConfig::disabled()
        } else {
            let json = match unsafe { read_str(kdf_json, kdf_json_len) } {
                Ok(json) => json,
                Err(e) => return e,
            };
            match parse_kdf_config(json) {
                Ok(config) => config,
                Err(e) => return e,
            }
        };

        let password = match generator.generate(secret, site, &profile, &kdf_config) {
            Ok(password) => Zeroizing::new(password),
            Err(e) => return KeypunkError::from(e),
        };

        // SAFETY: Caller guarantees output/output_len validity
        unsafe { write_output(password.as_bytes(), output, output_len) }
    });

    result.unwrap_or(KeypunkError::Internal)
}

/// Compute the verification checksum of a master secret (four hex characters).
///
/// # Parameters
/// - `secret`, `secret_len`: UTF-8 master secret
/// - `output`, `output_len`: In/out buffer as for `keypunk_generate`
///
/// # Safety
/// Same pointer requirements as `keypunk_generate`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keypunk_checksum(
    secret: *const u8,
    secret_len: usize,
    output: *mut u8,
    output_len: *mut usize,
) -> KeypunkError {
    let result = catch_unwind(|| {
        let secret = match unsafe { read_str(secret, secret_len) } {
            Ok(secret) => secret,
            Err(e) => return e,
        };
        match verification_checksum(secret, &ChecksumConfig::default()) {
            Ok(checksum) => unsafe { write_output(checksum.as_bytes(), output, output_len) },
            Err(e) => KeypunkError::from(e),
        }
    });

    result.unwrap_or(KeypunkError::Internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_PROFILE: &str = r##"{
        "algorithm": { "name": "sha2-256", "hmac": true },
        "outputLength": 16,
        "alphabetSets": ["ABCDEFGHIJKLMNOPQRSTUVWXYZ", "abcdefghijklmnopqrstuvwxyz", "0123456789", "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~"],
        "requireAllClasses": true
    }"##;

    unsafe fn generate(
        handle: *const KeypunkGenerator,
        profile: &str,
        kdf: Option<&str>,
        buffer: &mut [u8],
    ) -> (KeypunkError, usize) {
        let secret = b"Password";
        let site = b"example.com";
        let mut len = buffer.len();
        let (kdf_ptr, kdf_len) = kdf.map_or((std::ptr::null(), 0), |k| (k.as_ptr(), k.len()));
        let code = unsafe {
            keypunk_generate(
                handle,
                secret.as_ptr(),
                secret.len(),
                site.as_ptr(),
                site.len(),
                profile.as_ptr(),
                profile.len(),
                kdf_ptr,
                kdf_len,
                buffer.as_mut_ptr(),
                &mut len,
            )
        };
        (code, len)
    }

    #[test]
    fn test_generate_known_vector() {
        unsafe {
            let handle = keypunk_generator_new(std::ptr::null_mut());
            let mut buffer = [0u8; 64];
            let (code, len) = generate(handle, DEFAULT_PROFILE, None, &mut buffer);
            assert_eq!(code, KeypunkError::Ok);
            assert_eq!(&buffer[..len], b"R[\\6SK-9hrFu\"iq:");
            keypunk_generator_free(handle);
        }
    }

    #[test]
    fn test_generate_with_kdf_caches_key() {
        let kdf = r#"{"enabled":true,"functionId":"pbkdf2-sha-256","iterationCount":1000,"salt":"000102030405060708090a0b0c0d0e0f"}"#;
        unsafe {
            let handle = keypunk_generator_new(std::ptr::null_mut());
            let mut buffer = [0u8; 64];
            let (code, len) = generate(handle, DEFAULT_PROFILE, Some(kdf), &mut buffer);
            assert_eq!(code, KeypunkError::Ok);
            assert_eq!(&buffer[..len], b"?g'o_W8`x(/N`5)#");
            assert_eq!(keypunk_generator_cached_keys(handle), 1);

            assert_eq!(keypunk_generator_clear(handle), KeypunkError::Ok);
            assert_eq!(keypunk_generator_cached_keys(handle), 0);
            keypunk_generator_free(handle);
        }
    }

    #[test]
    fn test_buffer_too_small_reports_required_size() {
        unsafe {
            let handle = keypunk_generator_new(std::ptr::null_mut());
            let mut buffer = [0u8; 4];
            let (code, len) = generate(handle, DEFAULT_PROFILE, None, &mut buffer);
            assert_eq!(code, KeypunkError::BufferTooSmall);
            assert_eq!(len, 16);
            assert_eq!(buffer, [0u8; 4]);
            keypunk_generator_free(handle);
        }
    }

    #[test]
    fn test_configuration_errors() {
        unsafe {
            let handle = keypunk_generator_new(std::ptr::null_mut());
            let mut buffer = [0u8; 64];

            let unknown = DEFAULT_PROFILE.replace("sha2-256", "md5");
            assert_eq!(
                generate(handle, &unknown, None, &mut buffer).0,
                KeypunkError::UnsupportedAlgorithm
            );

            let empty = r#"{"algorithm":{"name":"sha1"},"outputLength":8,"alphabetSets":[]}"#;
            assert_eq!(generate(handle, empty, None, &mut buffer).0, KeypunkError::EmptyAlphabet);

            assert_eq!(generate(handle, "{", None, &mut buffer).0, KeypunkError::InvalidInput);

            let zero = r#"{"enabled":true,"iterationCount":0,"salt":""}"#;
            assert_eq!(
                generate(handle, DEFAULT_PROFILE, Some(zero), &mut buffer).0,
                KeypunkError::InvalidIterationCount
            );

            keypunk_generator_free(handle);
        }
    }

    #[test]
    fn test_identifier_errors_keep_their_codes() {
        assert_eq!(
            parse_profile(r#"{"algorithm":{"name":"md4"},"outputLength":8,"alphabetSets":["ab"]}"#),
            Err(KeypunkError::UnsupportedAlgorithm)
        );
        assert_eq!(
            parse_kdf_config(r#"{"enabled":true,"functionId":"bcrypt","iterationCount":10,"salt":""}"#),
            Err(KeypunkError::UnsupportedKdf)
        );

        // Malformed settings with valid identifiers stay generic input errors
        assert_eq!(
            parse_profile(r#"{"algorithm":{"name":"sha1"},"outputLength":"eight","alphabetSets":["ab"]}"#),
            Err(KeypunkError::InvalidInput)
        );
        assert_eq!(
            parse_kdf_config(r#"{"enabled":true,"functionId":"pbkdf2-sha-256","iterationCount":10,"salt":"xyz"}"#),
            Err(KeypunkError::InvalidInput)
        );
        assert_eq!(parse_profile("[1, 2]"), Err(KeypunkError::InvalidInput));

        let config = parse_kdf_config(r#"{"enabled":true,"iterationCount":10,"salt":"00ff"}"#).unwrap();
        assert_eq!(config.function, KdfFunction::Pbkdf2Sha256);
        assert_eq!(config.salt, vec![0x00, 0xff]);
    }

    #[test]
    fn test_invalid_handles() {
        unsafe {
            let mut buffer = [0u8; 64];
            let (code, _) = generate(std::ptr::null(), DEFAULT_PROFILE, None, &mut buffer);
            assert_eq!(code, KeypunkError::NullPointer);

            let mut unregistered = 0u8;
            let foreign = &mut unregistered as *mut u8 as *const KeypunkGenerator;
            let (code, _) = generate(foreign, DEFAULT_PROFILE, None, &mut buffer);
            assert_eq!(code, KeypunkError::InvalidHandle);
            assert_eq!(keypunk_generator_clear(foreign), KeypunkError::InvalidHandle);
            assert_eq!(keypunk_generator_cached_keys(foreign), 0);
        }
    }

    #[test]
    fn test_checksum() {
        let secret = b"Password";
        let mut buffer = [0u8; 8];
        let mut len = buffer.len();
        let code = unsafe {
            keypunk_checksum(secret.as_ptr(), secret.len(), buffer.as_mut_ptr(), &mut len)
        };
        assert_eq!(code, KeypunkError::Ok);
        assert_eq!(&buffer[..len], b"e6c8");
    }

    #[test]
    fn test_checksum_rejects_invalid_utf8() {
        let secret = [0xffu8, 0xfe];
        let mut buffer = [0u8; 8];
        let mut len = buffer.len();
        let code = unsafe {
            keypunk_checksum(secret.as_ptr(), secret.len(), buffer.as_mut_ptr(), &mut len)
        };
        assert_eq!(code, KeypunkError::InvalidInput);
    }
}
