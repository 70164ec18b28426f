//! Test fixtures and constants for keypunk-core tests.
//!
//! Pinned passwords are cross-checked against a second implementation of the
//! pipeline, including stretched keys (base64 key text) and coverage ties.
//! Any change to them is a compatibility break.

#![allow(dead_code)]

use keypunk_core::{AlgorithmProfile, DerivationProfile, HashAlgorithm, VectorCollection};

// ============================================================================
// Alphabets
// ============================================================================

pub const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// The four default classes (94 printable ASCII characters)
pub const FULL_SETS: [&str; 4] = [UPPER, LOWER, DIGITS, SYMBOLS];

/// Letters and digits only
pub const ALNUM_SETS: [&str; 3] = [UPPER, LOWER, DIGITS];

// ============================================================================
// Master Secrets and Key Stretching
// ============================================================================

pub const TEST_SECRET: &str = "Password";
pub const TEST_SECRET_LONG: &str = "correct horse battery staple";

/// Salt bytes 0x00..=0x0f
pub const TEST_SALT: [u8; 16] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
];

pub const TEST_ITERATIONS: u32 = 1000;

/// PBKDF2-SHA256("Password", TEST_SALT, 1000)
pub const TEST_STRETCHED_KEY_HEX: &str =
    "97663091fc4b864ce7ff36aa466102e858430a39dd7c247db50d55ed5fb603e8";

// ============================================================================
// Pinned Outputs (sha2-256 HMAC, full alphabet, 16 chars, all classes)
// ============================================================================

pub const DEFAULT_VECTORS: [(&str, &str, &str); 6] = [
    ("Password", "example.com", "R[\\6SK-9hrFu\"iq:"),
    ("Password", "github.com", "1vDI;/'_%_Jy$@&("),
    ("Password", "mail.google.com", "3vI'PWf'\"::x:IoE"),
    ("correct horse battery staple", "example.com", "Q0Q:W/ST[R:n\\.m/"),
    ("correct horse battery staple", "github.com", "a6Vz;o]*ok`})]2]"),
    ("correct horse battery staple", "mail.google.com", "B\\&)9@6(grcI3hrn"),
];

/// base64 of TEST_STRETCHED_KEY_HEX, the text the hash engine is keyed with
pub const TEST_STRETCHED_KEY_BASE64: &str = "l2YwkfxLhkzn/zaqRmEC6FhDCjndfCR9tQ1V7V+2A+g=";

/// Default profile with stretching (TEST_SALT, TEST_ITERATIONS), "Password"/"example.com"
pub const STRETCHED_EXAMPLE_COM: &str = "?g'o_W8`x(/N`5)#";

/// Coverage runs where two classes tie for the most characters
/// (secret "Password", sha2-256 HMAC): alphabet, length, site, raw, covered
pub const COVERAGE_TIE_VECTORS: [(&str, usize, &str, &str, &str); 2] = [
    ("full", 4, "site4.com", "[GI!", "w6I!"),
    ("alnum", 16, "s292", "jhrdmZcLEOQQGsEs", "9hrdmZcLEOQQGsEs"),
];

/// First 100 characters for "Password"/"example.com", no coverage
pub const EXAMPLE_COM_100: &str = "R[\\6SK-9hrFu\"iq:O+/IKdA:\"Q&iO|Hhl@6!{A#>@mH1SO\"+OGPz|SvZ)&|R~\"*'ASz1j:@O'|rTokansh+Ic+myK/!\\l5.}Nna4";

/// Reference vector collection covering every algorithm family
pub const REFERENCE_VECTORS: &str = include_str!("../vectors/reference.json");

// ============================================================================
// Helper Functions
// ============================================================================

/// Profile over the full alphabet
pub fn full_profile(name: HashAlgorithm, hmac: bool, length: usize, all_classes: bool) -> DerivationProfile {
    DerivationProfile::new(AlgorithmProfile::new(name, hmac), length, FULL_SETS).with_all_classes(all_classes)
}

pub fn reference_collection() -> VectorCollection {
    VectorCollection::from_json(REFERENCE_VECTORS).expect("reference vectors parse")
}

/// Index of the class `c` belongs to (first match), if any
pub fn class_of(c: char, sets: &[&str]) -> Option<usize> {
    sets.iter().position(|set| set.contains(c))
}

/// Route library `tracing` output to the test harness (`RUST_LOG=keypunk_core=debug`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
