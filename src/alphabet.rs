//! Base conversion of digests into an arbitrary output alphabet.
//!
//! Each digest is treated as one big-endian integer and repeatedly divided by
//! the alphabet size; every pass emits `alphabet[remainder]`. The least
//! significant digit comes out first. When one digest does not yield enough
//! characters the message is re-hashed with an iteration counter appended
//! (`"site"`, `"site2"`, `"site3"`, ...) and the results are concatenated.
//!
//! Output must stay bit-exact with every previously generated password, so
//! the emission order, the counter format and the truncation rule are fixed.
//! Symbols are Unicode scalar values: a character outside the Basic
//! Multilingual Plane is one symbol, not a surrogate pair.

use crate::hash_engine::{self, HashError};
use crate::profile::AlgorithmProfile;
use crate::words::WordArray;
use thiserror::Error;

/// Errors raised by the codec
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    #[error("alphabet is empty")]
    EmptyAlphabet,

    #[error("alphabet has {0} symbols, more than a 32-bit divisor can address")]
    AlphabetTooLarge(usize),

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Ordered output symbols; duplicates are kept and weight the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    pub fn new(symbols: &str) -> Result<Self, AlphabetError> {
        Self::from_chars(symbols.chars().collect())
    }

    /// Concatenate character classes in configuration order.
    pub fn from_sets<S: AsRef<str>>(sets: &[S]) -> Result<Self, AlphabetError> {
        Self::from_chars(sets.iter().flat_map(|set| set.as_ref().chars()).collect())
    }

    fn from_chars(symbols: Vec<char>) -> Result<Self, AlphabetError> {
        if symbols.is_empty() {
            return Err(AlphabetError::EmptyAlphabet);
        }
        if u32::try_from(symbols.len()).is_err() {
            return Err(AlphabetError::AlphabetTooLarge(symbols.len()));
        }
        Ok(Alphabet { symbols })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    fn divisor(&self) -> u32 {
        // length checked at construction
        self.symbols.len() as u32
    }
}

/// Convert one digest into alphabet symbols, appending to `out`.
///
/// Consumes the word array as scratch space. Returns the number of symbols
/// appended. A one-symbol alphabet cannot shrink the dividend, so it yields a
/// single symbol per digest instead of dividing.
pub fn encode_digest(mut words: WordArray, alphabet: &Alphabet, out: &mut String) -> usize {
    let divisor = alphabet.divisor();
    if divisor == 1 {
        out.push(alphabet.symbols[0]);
        return 1;
    }

    let mut emitted = 0;
    loop {
        let remainder = words.div_rem_in_place(divisor);
        out.push(alphabet.symbols[remainder as usize]);
        emitted += 1;
        if words.is_exhausted() {
            break;
        }
    }
    emitted
}

/// Result of one codec run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub value: String,
    /// Number of digests computed
    pub hash_iterations: u32,
}

/// Produce exactly `length` symbols for `message` under `key`.
pub fn generate(
    key: Option<&[u8]>,
    message: &str,
    algorithm: &AlgorithmProfile,
    alphabet: &Alphabet,
    length: usize,
) -> Result<String, AlphabetError> {
    generate_traced(key, message, algorithm, alphabet, length).map(|encoded| encoded.value)
}

/// [`generate`] plus the number of digests it took.
pub fn generate_traced(
    key: Option<&[u8]>,
    message: &str,
    algorithm: &AlgorithmProfile,
    alphabet: &Alphabet,
    length: usize,
) -> Result<Encoded, AlphabetError> {
    if alphabet.is_empty() {
        return Err(AlphabetError::EmptyAlphabet);
    }

    let mut value = String::new();
    let mut produced = 0usize;
    let mut counter: u32 = 1;

    while produced < length {
        // The first round hashes the bare message, never "message1"
        let round_message = if counter > 1 {
            format!("{message}{counter}")
        } else {
            message.to_string()
        };

        let words = hash_engine::compute_digest(
            algorithm.name,
            round_message.as_bytes(),
            key,
            algorithm.hmac,
        )?;
        produced += encode_digest(words, alphabet, &mut value);
        counter += 1;
    }

    if produced > length {
        value = value.chars().take(length).collect();
    }

    tracing::trace!(hash_iterations = counter - 1, length, "codec complete");

    Ok(Encoded {
        value,
        hash_iterations: counter - 1,
    })
}
