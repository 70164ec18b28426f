//! FFI error types for C-compatible error handling across the FFI boundary.

use crate::alphabet::AlphabetError;
use crate::generator::GenerateError;
use crate::hash_engine::HashError;
use crate::key_derivation::KeyDerivationError;
use crate::profile::ProfileError;

/// C-compatible error codes for FFI boundary
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypunkError {
    /// Operation succeeded
    Ok = 0,
    /// Invalid input provided (bad UTF-8, malformed JSON)
    InvalidInput = 1,
    /// Unknown hash algorithm identifier
    UnsupportedAlgorithm = 2,
    /// Unknown key derivation function identifier
    UnsupportedKdf = 3,
    /// Alphabet has no characters
    EmptyAlphabet = 4,
    /// Profile is structurally invalid
    InvalidProfile = 5,
    /// Iteration count of zero
    InvalidIterationCount = 6,
    /// HMAC requested without a key
    MissingKey = 7,
    /// Output buffer too small
    BufferTooSmall = 8,
    /// Null pointer provided
    NullPointer = 9,
    /// Invalid or already-freed handle
    InvalidHandle = 10,
    /// Internal failure (caught panic, primitive failure)
    Internal = 11,
    /// Session cache has no entry for the key
    NotFound = 12,
}

impl From<HashError> for KeypunkError {
    fn from(e: HashError) -> Self {
        match e {
            HashError::UnsupportedAlgorithm(_) => KeypunkError::UnsupportedAlgorithm,
            HashError::MissingKey => KeypunkError::MissingKey,
        }
    }
}

impl From<KeyDerivationError> for KeypunkError {
    fn from(e: KeyDerivationError) -> Self {
        match e {
            KeyDerivationError::UnsupportedKdf(_) => KeypunkError::UnsupportedKdf,
            KeyDerivationError::InvalidIterationCount(_) => KeypunkError::InvalidIterationCount,
            KeyDerivationError::DerivationFailed(_) => KeypunkError::Internal,
        }
    }
}

impl From<AlphabetError> for KeypunkError {
    fn from(e: AlphabetError) -> Self {
        match e {
            AlphabetError::EmptyAlphabet => KeypunkError::EmptyAlphabet,
            AlphabetError::AlphabetTooLarge(_) => KeypunkError::InvalidProfile,
            AlphabetError::Hash(e) => KeypunkError::from(e),
        }
    }
}

impl From<ProfileError> for KeypunkError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::NoAlphabetSets => KeypunkError::EmptyAlphabet,
            ProfileError::EmptyAlphabetSet(_) | ProfileError::ZeroLength => {
                KeypunkError::InvalidProfile
            }
            ProfileError::Alphabet(e) => KeypunkError::from(e),
        }
    }
}

impl From<GenerateError> for KeypunkError {
    fn from(e: GenerateError) -> Self {
        match e {
            GenerateError::Profile(e) => KeypunkError::from(e),
            GenerateError::KeyDerivation(e) => KeypunkError::from(e),
            GenerateError::Alphabet(e) => KeypunkError::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_errors_map_to_leaf_codes() {
        let e = GenerateError::Alphabet(AlphabetError::Hash(HashError::MissingKey));
        assert_eq!(KeypunkError::from(e), KeypunkError::MissingKey);

        let e = GenerateError::Profile(ProfileError::Alphabet(AlphabetError::EmptyAlphabet));
        assert_eq!(KeypunkError::from(e), KeypunkError::EmptyAlphabet);

        let e = GenerateError::KeyDerivation(KeyDerivationError::UnsupportedKdf("x".into()));
        assert_eq!(KeypunkError::from(e), KeypunkError::UnsupportedKdf);
    }
}
