//! Reference test-vector collections
//!
//! A collection pins generated passwords for a grid of profiles, master
//! secrets and site identifiers. Implementations on other platforms export
//! the same JSON, so running a collection proves cross-implementation
//! agreement. Format:
//!
//! ```json
//! {
//!   "alphabets": { "full": ["ABC…", "abc…", "012…", "!\"#…"] },
//!   "testSets": [
//!     {
//!       "profile": { "algo": "sha2-256", "hmac": true, "alph": "full",
//!                    "uas": true, "mod": "", "len": 16 },
//!       "kdf": { "enabled": true, "functionId": "pbkdf2-sha-256",
//!                "iterationCount": 1000, "salt": "0001…0f" },
//!       "tests": [ { "mpw": "Password", "vectors": { "example.com": "…" } } ]
//!     }
//!   ]
//! }
//! ```
//!
//! `kdf` is optional; a set without it runs with key stretching disabled.

use crate::generator::{GenerateError, Generator};
use crate::hash_engine::HashAlgorithm;
use crate::key_derivation::KdfConfig;
use crate::profile::{AlgorithmProfile, DerivationProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorError {
    #[error("invalid vector collection: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("test set references unknown alphabet '{0}'")]
    UnknownAlphabet(String),

    #[error("generation failed for profile '{profile}': {source}")]
    Generate {
        profile: String,
        #[source]
        source: GenerateError,
    },
}

/// Compact profile notation used inside collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorProfile {
    pub algo: HashAlgorithm,
    #[serde(default)]
    pub hmac: bool,
    /// Key into the collection's `alphabets`
    pub alph: String,
    /// Require every alphabet set
    #[serde(default)]
    pub uas: bool,
    #[serde(rename = "mod", default)]
    pub modifier: Option<String>,
    pub len: usize,
}

impl VectorProfile {
    /// Expand to a full profile using the collection's alphabets.
    pub fn to_profile(
        &self,
        alphabets: &BTreeMap<String, Vec<String>>,
    ) -> Result<DerivationProfile, VectorError> {
        let sets = alphabets
            .get(&self.alph)
            .ok_or_else(|| VectorError::UnknownAlphabet(self.alph.clone()))?;

        let mut profile = DerivationProfile::new(
            AlgorithmProfile::new(self.algo, self.hmac),
            self.len,
            sets.iter().cloned(),
        )
        .with_all_classes(self.uas);
        profile.modifier = self.modifier.clone().filter(|modifier| !modifier.is_empty());
        Ok(profile)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorTest {
    /// Master secret
    pub mpw: String,
    /// Site identifier -> expected password
    pub vectors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSet {
    pub profile: VectorProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kdf: Option<KdfConfig>,
    pub tests: Vec<VectorTest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorCollection {
    pub alphabets: BTreeMap<String, Vec<String>>,
    pub test_sets: Vec<TestSet>,
}

/// One vector whose output did not match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorMismatch {
    /// Profile rendered with its `Display` form
    pub profile: String,
    pub site: String,
    pub expected: String,
    pub actual: String,
}

/// Outcome of running a collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VectorReport {
    pub passed: usize,
    pub mismatches: Vec<VectorMismatch>,
}

impl VectorReport {
    pub fn total(&self) -> usize {
        self.passed + self.mismatches.len()
    }

    pub fn is_success(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl VectorCollection {
    pub fn from_json(json: &str) -> Result<Self, VectorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run every vector through `generator`.
    ///
    /// Mismatches are collected, not fatal. A profile that cannot generate
    /// at all (e.g. unknown alphabet) aborts the run.
    pub fn run(&self, generator: &Generator) -> Result<VectorReport, VectorError> {
        let mut report = VectorReport::default();

        for set in &self.test_sets {
            let profile = set.profile.to_profile(&self.alphabets)?;
            let kdf = set.kdf.clone().unwrap_or_else(KdfConfig::disabled);
            let label = match &set.kdf {
                Some(kdf) if kdf.enabled => {
                    format!("{profile} + {} x{}", kdf.function, kdf.iteration_count)
                }
                _ => profile.to_string(),
            };

            for test in &set.tests {
                for (site, expected) in &test.vectors {
                    let actual = generator
                        .generate(&test.mpw, site, &profile, &kdf)
                        .map_err(|source| VectorError::Generate {
                            profile: label.clone(),
                            source,
                        })?;

                    if &actual == expected {
                        report.passed += 1;
                    } else {
                        tracing::warn!(profile = %label, site = %site, "test vector mismatch");
                        report.mismatches.push(VectorMismatch {
                            profile: label.clone(),
                            site: site.clone(),
                            expected: expected.clone(),
                            actual,
                        });
                    }
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r##"{
        "alphabets": { "full": ["ABCDEFGHIJKLMNOPQRSTUVWXYZ", "abcdefghijklmnopqrstuvwxyz", "0123456789", "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~"] },
        "testSets": [
            {
                "profile": { "algo": "sha2-256", "hmac": true, "alph": "full", "uas": true, "mod": "", "len": 16 },
                "tests": [
                    { "mpw": "Password", "vectors": { "example.com": "R[\\6SK-9hrFu\"iq:", "github.com": "wrong" } }
                ]
            }
        ]
    }"##;

    #[test]
    fn test_parse_and_run() {
        let collection = VectorCollection::from_json(SMALL).unwrap();
        assert_eq!(collection.test_sets.len(), 1);

        let report = collection.run(&Generator::new()).unwrap();
        assert_eq!(report.total(), 2);
        assert_eq!(report.passed, 1);
        assert!(!report.is_success());

        let mismatch = &report.mismatches[0];
        assert_eq!(mismatch.site, "github.com");
        assert_eq!(mismatch.expected, "wrong");
        assert_eq!(mismatch.actual, "1vDI;/'_%_Jy$@&(");
        assert!(mismatch.profile.starts_with("sha2-256 (HMAC) - alphabet: 'ABC"));
    }

    #[test]
    fn test_empty_modifier_means_none() {
        let collection = VectorCollection::from_json(SMALL).unwrap();
        let profile = collection.test_sets[0]
            .profile
            .to_profile(&collection.alphabets)
            .unwrap();
        assert_eq!(profile.modifier, None);
        assert!(profile.require_all_classes);
    }

    #[test]
    fn test_stretched_set() {
        let json = SMALL.replace(
            "\"tests\"",
            r#""kdf": { "enabled": true, "functionId": "pbkdf2-sha-256", "iterationCount": 1000, "salt": "000102030405060708090a0b0c0d0e0f" }, "tests""#,
        );
        let collection = VectorCollection::from_json(&json).unwrap();
        let kdf = collection.test_sets[0].kdf.as_ref().unwrap();
        assert_eq!(kdf.iteration_count, 1000);
        assert_eq!(kdf.salt, (0u8..16).collect::<Vec<_>>());

        let generator = Generator::new();
        let report = collection.run(&generator).unwrap();
        assert_eq!(report.passed, 0);
        assert_eq!(report.mismatches[0].actual, "?g'o_W8`x(/N`5)#");
        assert!(report.mismatches[0].profile.ends_with("+ pbkdf2-sha-256 x1000"));
        assert_eq!(generator.key_derivation().stretch_count(), 1);
    }

    #[test]
    fn test_unknown_alphabet() {
        let json = SMALL.replace("\"alph\": \"full\"", "\"alph\": \"emoji\"");
        let collection = VectorCollection::from_json(&json).unwrap();
        let err = collection.run(&Generator::new()).unwrap_err();
        assert!(matches!(err, VectorError::UnknownAlphabet(name) if name == "emoji"));
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let json = SMALL.replace("sha2-256", "md5");
        assert!(matches!(
            VectorCollection::from_json(&json),
            Err(VectorError::InvalidJson(_))
        ));
    }
}
