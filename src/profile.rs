//! Derivation profiles: the stored configuration behind a family of passwords.
//!
//! A profile is read-only input for the core. It is persisted by an external
//! profile store as JSON (camelCase fields); unknown algorithm identifiers
//! fail at deserialization time.

use crate::alphabet::{Alphabet, AlphabetError};
use crate::hash_engine::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Profile validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile has no alphabet sets")]
    NoAlphabetSets,

    #[error("alphabet set {0} is empty")]
    EmptyAlphabetSet(usize),

    #[error("output length must be at least 1")]
    ZeroLength,

    #[error(transparent)]
    Alphabet(#[from] AlphabetError),
}

/// Hash selection for a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlgorithmProfile {
    pub name: HashAlgorithm,
    #[serde(default)]
    pub hmac: bool,
}

impl AlgorithmProfile {
    pub fn new(name: HashAlgorithm, hmac: bool) -> Self {
        AlgorithmProfile { name, hmac }
    }
}

impl Default for AlgorithmProfile {
    fn default() -> Self {
        AlgorithmProfile::new(HashAlgorithm::Sha256, true)
    }
}

impl fmt::Display for AlgorithmProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.hmac {
            f.write_str(" (HMAC)")?;
        }
        Ok(())
    }
}

/// Immutable configuration for one family of generated passwords
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivationProfile {
    pub algorithm: AlgorithmProfile,
    /// Number of characters to produce
    pub output_length: usize,
    /// Character classes; their concatenation is the working alphabet
    pub alphabet_sets: Vec<String>,
    /// Appended to the site identifier before hashing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    #[serde(default)]
    pub require_all_classes: bool,
}

impl DerivationProfile {
    pub fn new<S: Into<String>>(
        algorithm: AlgorithmProfile,
        output_length: usize,
        alphabet_sets: impl IntoIterator<Item = S>,
    ) -> Self {
        DerivationProfile {
            algorithm,
            output_length,
            alphabet_sets: alphabet_sets.into_iter().map(Into::into).collect(),
            modifier: None,
            require_all_classes: false,
        }
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    pub fn with_all_classes(mut self, require_all_classes: bool) -> Self {
        self.require_all_classes = require_all_classes;
        self
    }

    /// Check the profile can drive a generation.
    ///
    /// Overlapping sets are accepted; an empty set is not, because coverage
    /// enforcement could never place a character from it.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.output_length == 0 {
            return Err(ProfileError::ZeroLength);
        }
        if self.alphabet_sets.is_empty() {
            return Err(ProfileError::NoAlphabetSets);
        }
        if let Some(index) = self.alphabet_sets.iter().position(|set| set.is_empty()) {
            return Err(ProfileError::EmptyAlphabetSet(index));
        }
        Ok(())
    }

    /// Working alphabet: every set concatenated in order.
    pub fn alphabet(&self) -> Result<Alphabet, ProfileError> {
        self.validate()?;
        Ok(Alphabet::from_sets(&self.alphabet_sets)?)
    }

    /// Hash message for a site: identifier followed by the modifier.
    pub fn message(&self, site: &str) -> String {
        match &self.modifier {
            Some(modifier) => format!("{site}{modifier}"),
            None => site.to_string(),
        }
    }

    /// True when coverage enforcement runs for this profile.
    ///
    /// Skipped when the output is shorter than the number of classes, since
    /// every class cannot fit.
    pub fn enforces_coverage(&self) -> bool {
        self.require_all_classes && self.output_length >= self.alphabet_sets.len()
    }
}

impl Default for DerivationProfile {
    fn default() -> Self {
        DerivationProfile::new(
            AlgorithmProfile::default(),
            16,
            [
                "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
                "abcdefghijklmnopqrstuvwxyz",
                "0123456789",
                "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
            ],
        )
        .with_all_classes(true)
    }
}

impl fmt::Display for DerivationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - alphabet: '{}', useAllSets: {}, modifier: {}, passwordLength: {}",
            self.algorithm,
            self.alphabet_sets.concat(),
            self.require_all_classes,
            self.modifier.as_deref().unwrap_or(""),
            self.output_length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_appends_modifier() {
        let profile = DerivationProfile::default();
        assert_eq!(profile.message("example.com"), "example.com");
        assert_eq!(profile.with_modifier("#2").message("example.com"), "example.com#2");
    }

    #[test]
    fn test_validation() {
        let mut profile = DerivationProfile::default();
        assert!(profile.validate().is_ok());

        profile.alphabet_sets.push(String::new());
        assert_eq!(profile.validate(), Err(ProfileError::EmptyAlphabetSet(4)));

        profile.alphabet_sets.clear();
        assert_eq!(profile.validate(), Err(ProfileError::NoAlphabetSets));
        assert!(profile.alphabet().is_err());

        let mut empty = DerivationProfile::default();
        empty.output_length = 0;
        assert_eq!(empty.validate(), Err(ProfileError::ZeroLength));
    }

    #[test]
    fn test_overlapping_sets_allowed() {
        let profile = DerivationProfile::new(AlgorithmProfile::default(), 8, ["abc", "bcd"]);
        assert!(profile.validate().is_ok());
        assert_eq!(profile.alphabet().unwrap().len(), 6);
    }

    #[test]
    fn test_coverage_condition() {
        let profile = DerivationProfile::default();
        assert!(profile.enforces_coverage());

        let mut short = profile.clone();
        short.output_length = 3;
        assert!(!short.enforces_coverage());

        short.output_length = 4;
        assert!(short.enforces_coverage());

        assert!(!profile.with_all_classes(false).enforces_coverage());
    }

    #[test]
    fn test_display_format() {
        let profile = DerivationProfile::new(
            AlgorithmProfile::new(HashAlgorithm::Sha256, true),
            16,
            ["ab", "01"],
        )
        .with_all_classes(true);
        assert_eq!(
            profile.to_string(),
            "sha2-256 (HMAC) - alphabet: 'ab01', useAllSets: true, modifier: , passwordLength: 16"
        );

        let plain = DerivationProfile::new(AlgorithmProfile::new(HashAlgorithm::Sha1, false), 8, ["x"])
            .with_modifier("v2");
        assert_eq!(
            plain.to_string(),
            "sha1 - alphabet: 'x', useAllSets: false, modifier: v2, passwordLength: 8"
        );
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "algorithm": {"name": "keccak-256", "hmac": true},
            "outputLength": 20,
            "alphabetSets": ["abc", "123"],
            "modifier": "x",
            "requireAllClasses": true
        }"#;
        let profile: DerivationProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.algorithm.name, HashAlgorithm::Keccak256);
        assert!(profile.algorithm.hmac);
        assert_eq!(profile.output_length, 20);
        assert_eq!(profile.modifier.as_deref(), Some("x"));

        let reparsed: DerivationProfile =
            serde_json::from_str(&serde_json::to_string(&profile).unwrap()).unwrap();
        assert_eq!(reparsed, profile);
    }

    #[test]
    fn test_unknown_algorithm_rejected_at_load() {
        let json = r#"{"algorithm": {"name": "md5"}, "outputLength": 8, "alphabetSets": ["a"]}"#;
        let err = serde_json::from_str::<DerivationProfile>(json).unwrap_err();
        assert!(err.to_string().contains("unsupported hash algorithm: md5"));
    }
}
