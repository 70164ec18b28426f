//! Password generation: the single entry point the UI layer calls.
//!
//! `generate` composes the pipeline:
//! key derivation (once) -> codec rounds until the length is met -> optional
//! class coverage. Given valid inputs the result is a pure function of
//! `(secret, site, profile, kdf config)`; the only state touched is the
//! stretched-key cache and the last-call metrics.

use crate::alphabet::{self, AlphabetError};
use crate::coverage;
use crate::hash_engine::{self, HashAlgorithm, HashError};
use crate::key_derivation::{KdfConfig, KeyDerivation, KeyDerivationError, KeyEncoding};
use crate::metrics::DerivationMetrics;
use crate::profile::{DerivationProfile, ProfileError};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use thiserror::Error;

/// Errors surfaced by [`Generator`]
///
/// All of them are configuration errors: retrying with the same input
/// fails the same way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    KeyDerivation(#[from] KeyDerivationError),

    #[error(transparent)]
    Alphabet(#[from] AlphabetError),
}

/// Settings for the short secret checksum shown next to the input field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumConfig {
    pub algorithm: HashAlgorithm,
    /// Number of hex characters kept
    pub length: usize,
}

impl Default for ChecksumConfig {
    fn default() -> Self {
        ChecksumConfig {
            algorithm: HashAlgorithm::Sha512,
            length: 4,
        }
    }
}

/// Short, non-secret fingerprint of a master secret.
///
/// Lets a user notice a typo without revealing the secret: the leading
/// `length` lowercase hex characters of the plain digest of the secret. Stored
/// checksums compare against this value, so the format is fixed. An empty
/// secret has no checksum and yields an empty string.
pub fn verification_checksum(secret: &str, config: &ChecksumConfig) -> Result<String, HashError> {
    if secret.is_empty() {
        return Ok(String::new());
    }
    let digest = hash_engine::digest_bytes(config.algorithm, secret.as_bytes(), None, false)?;
    let mut checksum = hex::encode(digest);
    checksum.truncate(config.length);
    Ok(checksum)
}

/// Password generator owning the stretched-key cache
pub struct Generator {
    kdf: KeyDerivation,
    /// Last operation metrics (interior mutability for observability)
    last_metrics: Arc<Mutex<DerivationMetrics>>,
}

impl Generator {
    pub fn new() -> Self {
        Generator::with_key_derivation(KeyDerivation::new())
    }

    /// Use an existing key deriver (and its cache).
    pub fn with_key_derivation(kdf: KeyDerivation) -> Self {
        Generator {
            kdf,
            last_metrics: Arc::new(Mutex::new(DerivationMetrics::new())),
        }
    }

    pub fn key_derivation(&self) -> &KeyDerivation {
        &self.kdf
    }

    /// Derive the password for `site`.
    ///
    /// 1. master key from `secret` (stretched, cached and base64-encoded when enabled)
    /// 2. message = site + modifier
    /// 3. codec rounds over the concatenated alphabet sets
    /// 4. class coverage when required and the length allows it
    pub fn generate(
        &self,
        secret: &str,
        site: &str,
        profile: &DerivationProfile,
        kdf_config: &KdfConfig,
    ) -> Result<String, GenerateError> {
        let alphabet = profile.alphabet()?;

        let kdf_start = Instant::now();
        let (key, cache_hit) = self
            .kdf
            .derive_master_key_traced(secret, kdf_config, KeyEncoding::Base64)?;
        let kdf_micros = if kdf_config.enabled {
            kdf_start.elapsed().as_micros() as u64
        } else {
            0
        };

        let message = profile.message(site);

        let encode_start = Instant::now();
        let encoded = alphabet::generate_traced(
            Some(key.as_bytes()),
            &message,
            &profile.algorithm,
            &alphabet,
            profile.output_length,
        )?;
        let encode_micros = encode_start.elapsed().as_micros() as u64;

        let mut metrics = DerivationMetrics::new()
            .with_kdf(kdf_micros, cache_hit)
            .with_encoding(encode_micros, encoded.hash_iterations);

        let mut value = encoded.value;
        if profile.enforces_coverage() {
            let (covered, replaced) =
                coverage::ensure_all_classes_traced(&value, &profile.alphabet_sets);
            value = covered;
            metrics = metrics.with_coverage(replaced);
        } else if profile.require_all_classes {
            tracing::debug!(
                length = profile.output_length,
                classes = profile.alphabet_sets.len(),
                "output shorter than class count, coverage skipped"
            );
        }

        tracing::debug!(
            algorithm = %profile.algorithm,
            length = profile.output_length,
            hash_iterations = metrics.hash_iterations,
            kdf_cache_hit = cache_hit,
            "password generated"
        );

        if let Ok(mut last) = self.last_metrics.lock() {
            *last = metrics;
        }

        Ok(value)
    }

    /// Metrics of the most recent successful `generate` call.
    pub fn last_metrics(&self) -> DerivationMetrics {
        self.last_metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}
