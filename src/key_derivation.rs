//! Master key derivation with PBKDF2-SHA256 stretching
//!
//! Turns the user's master secret into the key fed to the hash engine. With
//! stretching disabled the secret passes through unchanged. With stretching
//! enabled the secret is run through PBKDF2 with HMAC-SHA256, the
//! installation-wide salt and the configured iteration count, producing a
//! 256-bit key. The hash engine is keyed with the base64 text of those bits,
//! so every platform derives the same passwords from the same settings.
//!
//! Stretching is deliberately slow, and the UI re-derives on every keystroke,
//! so results are memoized for the lifetime of the [`KeyDerivation`] value.
//! The cache is keyed by a SHA-256 fingerprint of the length-prefixed
//! `(secret, salt, iterations)` triple, never by the secret itself, and
//! cached keys are wiped on drop.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Instant;
use thiserror::Error;
use zeroize::Zeroizing;

/// Output length of the stretching function in bytes (256 bits)
pub const DERIVED_KEY_LENGTH: usize = 32;

/// Errors that can occur during key derivation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyDerivationError {
    #[error("unsupported key derivation function: {0}")]
    UnsupportedKdf(String),

    #[error("invalid iteration count: expected at least 1, got {0}")]
    InvalidIterationCount(u32),

    #[error("key derivation failed: {0}")]
    DerivationFailed(String),
}

/// Key-stretching functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum KdfFunction {
    /// PBKDF2 with HMAC-SHA256 as the PRF
    #[default]
    Pbkdf2Sha256,
}

impl KdfFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            KdfFunction::Pbkdf2Sha256 => "pbkdf2-sha-256",
        }
    }
}

impl fmt::Display for KdfFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KdfFunction {
    type Err = KeyDerivationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "pbkdf2-sha-256" => Ok(KdfFunction::Pbkdf2Sha256),
            other => Err(KeyDerivationError::UnsupportedKdf(other.to_string())),
        }
    }
}

impl TryFrom<String> for KdfFunction {
    type Error = KeyDerivationError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<KdfFunction> for &'static str {
    fn from(function: KdfFunction) -> Self {
        function.as_str()
    }
}

/// Stretching configuration, shared by every profile of an installation
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KdfConfig {
    pub enabled: bool,
    #[serde(rename = "functionId", default)]
    pub function: KdfFunction,
    pub iteration_count: u32,
    /// Stored as a hex string in settings
    #[serde(with = "hex_bytes")]
    pub salt: Vec<u8>,
}

impl KdfConfig {
    /// Stretching switched off: the secret is used as the key directly.
    pub fn disabled() -> Self {
        KdfConfig {
            enabled: false,
            function: KdfFunction::Pbkdf2Sha256,
            iteration_count: 1,
            salt: Vec::new(),
        }
    }

    /// PBKDF2-SHA256 with the given salt and iteration count.
    pub fn pbkdf2(salt: impl Into<Vec<u8>>, iteration_count: u32) -> Self {
        KdfConfig {
            enabled: true,
            function: KdfFunction::Pbkdf2Sha256,
            iteration_count,
            salt: salt.into(),
        }
    }
}

impl fmt::Debug for KdfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdfConfig")
            .field("enabled", &self.enabled)
            .field("function", &self.function)
            .field("iteration_count", &self.iteration_count)
            .field("salt_len", &self.salt.len())
            .finish()
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(encoded.trim()).map_err(serde::de::Error::custom)
    }
}

/// How a stretched key is handed to its consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEncoding {
    /// Standard base64 text; this is the key the hash engine consumes
    #[default]
    Base64,
    /// Raw 256 bits for binary consumers such as a storage cipher
    Raw,
}

/// Key material produced by [`KeyDerivation::derive_master_key`]
///
/// Wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl DerivedKey {
    fn new(bytes: Vec<u8>) -> Self {
        DerivedKey {
            bytes: Zeroizing::new(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedKey([REDACTED; {}])", self.bytes.len())
    }
}

type CacheSlot = Arc<OnceLock<Zeroizing<[u8; DERIVED_KEY_LENGTH]>>>;

/// Memoizing master key deriver
///
/// Owns the process-lifetime cache of stretched keys. Entries are never
/// evicted proactively; [`KeyDerivation::clear`] or dropping the value wipes
/// them. Concurrent callers with the same triple share one computation.
pub struct KeyDerivation {
    cache: Mutex<HashMap<[u8; 32], CacheSlot>>,
    /// Number of times the stretching primitive actually ran
    stretch_count: AtomicU64,
}

impl KeyDerivation {
    pub fn new() -> Self {
        KeyDerivation {
            cache: Mutex::new(HashMap::new()),
            stretch_count: AtomicU64::new(0),
        }
    }

    /// Derive the key the hash engine uses for `secret`.
    ///
    /// - Stretching disabled: returns the secret bytes unchanged, whatever
    ///   the encoding
    /// - Stretching enabled: PBKDF2-SHA256, 256-bit output, encoded as asked
    pub fn derive_master_key(
        &self,
        secret: &str,
        config: &KdfConfig,
        encoding: KeyEncoding,
    ) -> Result<DerivedKey, KeyDerivationError> {
        self.derive_master_key_traced(secret, config, encoding)
            .map(|(key, _)| key)
    }

    /// Same as [`derive_master_key`](Self::derive_master_key), also reporting
    /// whether the key came from the cache.
    pub fn derive_master_key_traced(
        &self,
        secret: &str,
        config: &KdfConfig,
        encoding: KeyEncoding,
    ) -> Result<(DerivedKey, bool), KeyDerivationError> {
        if !config.enabled {
            return Ok((DerivedKey::new(secret.as_bytes().to_vec()), false));
        }

        if config.iteration_count == 0 {
            return Err(KeyDerivationError::InvalidIterationCount(0));
        }

        let (stretched, cached) = match config.function {
            KdfFunction::Pbkdf2Sha256 => self.stretch_cached(secret, config),
        };

        let key = match encoding {
            KeyEncoding::Raw => DerivedKey::new(stretched.to_vec()),
            KeyEncoding::Base64 => DerivedKey::new(STANDARD.encode(&stretched[..]).into_bytes()),
        };
        Ok((key, cached))
    }

    fn stretch_cached(
        &self,
        secret: &str,
        config: &KdfConfig,
    ) -> (Zeroizing<[u8; DERIVED_KEY_LENGTH]>, bool) {
        let fingerprint = cache_fingerprint(secret.as_bytes(), &config.salt, config.iteration_count);

        // Hold the map lock only long enough to find or insert the slot
        let slot = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cache.entry(fingerprint).or_default())
        };

        let mut computed = false;
        let key = slot.get_or_init(|| {
            computed = true;
            self.stretch(secret, config)
        });

        if computed {
            tracing::debug!(iterations = config.iteration_count, "kdf cache miss");
        } else {
            tracing::trace!("kdf cache hit");
        }
        (key.clone(), !computed)
    }

    fn stretch(&self, secret: &str, config: &KdfConfig) -> Zeroizing<[u8; DERIVED_KEY_LENGTH]> {
        let started = Instant::now();
        let mut key = Zeroizing::new([0u8; DERIVED_KEY_LENGTH]);
        pbkdf2::pbkdf2_hmac::<Sha256>(
            secret.as_bytes(),
            &config.salt,
            config.iteration_count,
            &mut key[..],
        );
        self.stretch_count.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            iterations = config.iteration_count,
            elapsed_micros = started.elapsed().as_micros() as u64,
            "pbkdf2 stretch complete"
        );
        key
    }

    /// How many times the stretching primitive has run.
    pub fn stretch_count(&self) -> u64 {
        self.stretch_count.load(Ordering::Relaxed)
    }

    /// Number of cached keys.
    pub fn cached_entries(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop every cached key. Dropped keys are zeroized.
    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for KeyDerivation {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeyDerivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyDerivation")
            .field("cached_entries", &self.cached_entries())
            .field("stretch_count", &self.stretch_count())
            .finish()
    }
}

/// Cache key for a `(secret, salt, iterations)` triple
///
/// Length-prefixed so `("ab", "c")` and `("a", "bc")` cannot collide.
/// Format: `[prefix][secret_len:u64BE][secret][salt_len:u64BE][salt][iterations:u32BE]`
fn cache_fingerprint(secret: &[u8], salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"keypunk_kdf_cache_v1");
    hasher.update((secret.len() as u64).to_be_bytes());
    hasher.update(secret);
    hasher.update((salt.len() as u64).to_be_bytes());
    hasher.update(salt);
    hasher.update(iterations.to_be_bytes());
    hasher.finalize().into()
}
