//! # keypunk-core
//!
//! Deterministic site passwords from a master secret. Nothing derived is
//! ever stored: the same `(master secret, site, profile, kdf config)` always
//! yields the same password on any device, so only the configuration needs
//! to be synchronized.
//!
//! ## Pipeline
//!
//! | Stage | Module | What it does |
//! |:------|:-------|:-------------|
//! | Key derivation | [`key_derivation`] | Optional PBKDF2-SHA256 stretching, memoized |
//! | Hash engine | [`hash_engine`] | SHA-1/SHA-2/SHA-3/Keccak/RIPEMD-160, plain or HMAC |
//! | Alphabet codec | [`alphabet`] | Exact long division of digests into any alphabet |
//! | Coverage | [`coverage`] | Guarantees one character from every class |
//! | Generator | [`generator`] | Composes the above |
//!
//! ## Quick Start
//!
//! ```rust
//! use keypunk_core::{DerivationProfile, Generator, KdfConfig};
//!
//! let generator = Generator::new();
//! let profile = DerivationProfile::default(); // sha2-256 HMAC, 16 chars, 4 classes
//!
//! let password = generator
//!     .generate("Password", "example.com", &profile, &KdfConfig::disabled())
//!     .unwrap();
//! assert_eq!(password, "R[\\6SK-9hrFu\"iq:");
//! ```
//!
//! ## With Key Stretching
//!
//! ```rust
//! use keypunk_core::{DerivationProfile, Generator, KdfConfig};
//!
//! let generator = Generator::new();
//! let kdf = KdfConfig::pbkdf2(*b"installation-slt", 10_000);
//!
//! let first = generator
//!     .generate("Password", "example.com", &DerivationProfile::default(), &kdf)
//!     .unwrap();
//! // Second call reuses the cached stretched key
//! let second = generator
//!     .generate("Password", "github.com", &DerivationProfile::default(), &kdf)
//!     .unwrap();
//! assert_ne!(first, second);
//! assert_eq!(generator.key_derivation().stretch_count(), 1);
//! ```
//!
//! ## Features
//!
//! | Feature | Description | Default |
//! |:--------|:------------|:-------:|
//! | `ffi` | C ABI and header generation | No |

pub mod alphabet;
pub mod coverage;
pub mod generator;
pub mod hash_engine;
pub mod key_derivation;
pub mod metrics;
pub mod profile;
pub mod session;
pub mod vectors;
pub mod words;

pub use alphabet::{Alphabet, AlphabetError};
pub use coverage::ensure_all_classes;
pub use generator::{ChecksumConfig, GenerateError, Generator, verification_checksum};
pub use hash_engine::{HashAlgorithm, HashError, compute_digest};
pub use key_derivation::{
    DerivedKey, KdfConfig, KdfFunction, KeyDerivation, KeyDerivationError, KeyEncoding,
};
pub use metrics::DerivationMetrics;
pub use profile::{AlgorithmProfile, DerivationProfile, ProfileError};
pub use session::SessionCache;
pub use vectors::{VectorCollection, VectorError, VectorReport};
pub use words::WordArray;

// C FFI layer (feature-gated)
#[cfg(feature = "ffi")]
pub mod ffi;
#[cfg(feature = "ffi")]
pub use ffi::KeypunkError;
