//! Hash and HMAC selection over the supported digest family.
//!
//! Algorithms form a closed set, parsed from their canonical identifiers
//! (`"sha2-256"`, `"keccak-512"`, ...) when a profile is loaded. Keccak and
//! SHA-3 share the Keccak-f\[1600\] permutation and differ only in the
//! domain padding byte (`0x01` vs the FIPS 202 `0x06`), so both are exposed
//! as distinct algorithms.
//!
//! Two keying modes exist:
//! - HMAC (RFC 2104) with the selected hash, key mandatory
//! - Plain concatenation `H(key || message)`. Weaker than HMAC, kept because
//!   existing passwords were derived this way.

use crate::words::WordArray;
use digest::Digest;
use digest::core_api::BlockSizeUser;
use hmac::{Mac, SimpleHmac};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while selecting or running a hash
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("HMAC requires a key")]
    MissingKey,
}

/// Padding rule applied before the final compression/permutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// Merkle–Damgård length padding (SHA-1, SHA-2, RIPEMD-160)
    MerkleDamgard,
    /// Original Keccak submission padding, domain byte `0x01`
    Keccak,
    /// FIPS 202 padding, domain byte `0x06`
    Fips202,
}

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum HashAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Ripemd160,
    Keccak224,
    Keccak256,
    Keccak384,
    Keccak512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl HashAlgorithm {
    /// Every supported algorithm, in identifier order.
    pub const ALL: [HashAlgorithm; 14] = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Ripemd160,
        HashAlgorithm::Keccak224,
        HashAlgorithm::Keccak256,
        HashAlgorithm::Keccak384,
        HashAlgorithm::Keccak512,
        HashAlgorithm::Sha3_224,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_384,
        HashAlgorithm::Sha3_512,
    ];

    /// Canonical identifier used in stored profiles.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha2-224",
            HashAlgorithm::Sha256 => "sha2-256",
            HashAlgorithm::Sha384 => "sha2-384",
            HashAlgorithm::Sha512 => "sha2-512",
            HashAlgorithm::Ripemd160 => "ripemd-160",
            HashAlgorithm::Keccak224 => "keccak-224",
            HashAlgorithm::Keccak256 => "keccak-256",
            HashAlgorithm::Keccak384 => "keccak-384",
            HashAlgorithm::Keccak512 => "keccak-512",
            HashAlgorithm::Sha3_224 => "sha3-224",
            HashAlgorithm::Sha3_256 => "sha3-256",
            HashAlgorithm::Sha3_384 => "sha3-384",
            HashAlgorithm::Sha3_512 => "sha3-512",
        }
    }

    /// Digest size in bits.
    pub fn digest_bits(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 | HashAlgorithm::Ripemd160 => 160,
            HashAlgorithm::Sha224 | HashAlgorithm::Keccak224 | HashAlgorithm::Sha3_224 => 224,
            HashAlgorithm::Sha256 | HashAlgorithm::Keccak256 | HashAlgorithm::Sha3_256 => 256,
            HashAlgorithm::Sha384 | HashAlgorithm::Keccak384 | HashAlgorithm::Sha3_384 => 384,
            HashAlgorithm::Sha512 | HashAlgorithm::Keccak512 | HashAlgorithm::Sha3_512 => 512,
        }
    }

    /// Number of 32-bit words in one digest.
    pub fn digest_words(&self) -> usize {
        self.digest_bits() / 32
    }

    pub fn padding(&self) -> Padding {
        match self {
            HashAlgorithm::Keccak224
            | HashAlgorithm::Keccak256
            | HashAlgorithm::Keccak384
            | HashAlgorithm::Keccak512 => Padding::Keccak,
            HashAlgorithm::Sha3_224
            | HashAlgorithm::Sha3_256
            | HashAlgorithm::Sha3_384
            | HashAlgorithm::Sha3_512 => Padding::Fips202,
            _ => Padding::MerkleDamgard,
        }
    }

    /// Input block size in bytes; for sponges this is the rate.
    pub fn block_bytes(&self) -> usize {
        match self.padding() {
            Padding::MerkleDamgard => match self {
                HashAlgorithm::Sha384 | HashAlgorithm::Sha512 => 128,
                _ => 64,
            },
            Padding::Keccak | Padding::Fips202 => 200 - 2 * (self.digest_bits() / 8),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        HashAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == name)
            .ok_or_else(|| HashError::UnsupportedAlgorithm(name.to_string()))
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = HashError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<HashAlgorithm> for &'static str {
    fn from(algorithm: HashAlgorithm) -> Self {
        algorithm.as_str()
    }
}

fn keyed_digest<D>(message: &[u8], key: Option<&[u8]>, use_hmac: bool) -> Result<Vec<u8>, HashError>
where
    D: Digest + BlockSizeUser,
{
    if use_hmac {
        let key = key.ok_or(HashError::MissingKey)?;
        // SimpleHmac accepts keys of any length (long keys are hashed first)
        let mut mac = <SimpleHmac<D> as Mac>::new_from_slice(key)
            .map_err(|_| HashError::MissingKey)?;
        mac.update(message);
        return Ok(mac.finalize().into_bytes().to_vec());
    }

    let mut hasher = D::new();
    if let Some(key) = key {
        Digest::update(&mut hasher, key);
    }
    Digest::update(&mut hasher, message);
    Ok(hasher.finalize().to_vec())
}

/// Raw digest bytes for `message` under the selected keying mode.
pub fn digest_bytes(
    algorithm: HashAlgorithm,
    message: &[u8],
    key: Option<&[u8]>,
    use_hmac: bool,
) -> Result<Vec<u8>, HashError> {
    match algorithm {
        HashAlgorithm::Sha1 => keyed_digest::<sha1::Sha1>(message, key, use_hmac),
        HashAlgorithm::Sha224 => keyed_digest::<sha2::Sha224>(message, key, use_hmac),
        HashAlgorithm::Sha256 => keyed_digest::<sha2::Sha256>(message, key, use_hmac),
        HashAlgorithm::Sha384 => keyed_digest::<sha2::Sha384>(message, key, use_hmac),
        HashAlgorithm::Sha512 => keyed_digest::<sha2::Sha512>(message, key, use_hmac),
        HashAlgorithm::Ripemd160 => keyed_digest::<ripemd::Ripemd160>(message, key, use_hmac),
        HashAlgorithm::Keccak224 => keyed_digest::<sha3::Keccak224>(message, key, use_hmac),
        HashAlgorithm::Keccak256 => keyed_digest::<sha3::Keccak256>(message, key, use_hmac),
        HashAlgorithm::Keccak384 => keyed_digest::<sha3::Keccak384>(message, key, use_hmac),
        HashAlgorithm::Keccak512 => keyed_digest::<sha3::Keccak512>(message, key, use_hmac),
        HashAlgorithm::Sha3_224 => keyed_digest::<sha3::Sha3_224>(message, key, use_hmac),
        HashAlgorithm::Sha3_256 => keyed_digest::<sha3::Sha3_256>(message, key, use_hmac),
        HashAlgorithm::Sha3_384 => keyed_digest::<sha3::Sha3_384>(message, key, use_hmac),
        HashAlgorithm::Sha3_512 => keyed_digest::<sha3::Sha3_512>(message, key, use_hmac),
    }
}

/// Compute the digest of `message` as big-endian 32-bit words.
///
/// With `use_hmac` the digest is `HMAC(key, message)` and `key` must be
/// present. Without it, `key` (if any) is prepended verbatim to `message`.
pub fn compute_digest(
    algorithm: HashAlgorithm,
    message: &[u8],
    key: Option<&[u8]>,
    use_hmac: bool,
) -> Result<WordArray, HashError> {
    let bytes = digest_bytes(algorithm, message, key, use_hmac)?;
    Ok(WordArray::from_digest(&bytes))
}
