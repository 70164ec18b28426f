#![no_main]

use arbitrary::Arbitrary;
use keypunk_core::WordArray;
use keypunk_core::alphabet::{Alphabet, encode_digest};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct CodecInput {
    limbs: Vec<u32>,
    symbols: String,
}

fuzz_target!(|input: CodecInput| {
    // Validates: no panics, termination, output drawn from the alphabet,
    // emitted count matches what was appended

    let CodecInput { limbs, symbols } = input;
    if limbs.len() > 64 {
        return;
    }

    let alphabet = match Alphabet::new(&symbols) {
        Ok(alphabet) => alphabet,
        Err(_) => {
            // Empty alphabets are rejected up front, never divided by
            assert!(symbols.is_empty());
            return;
        }
    };

    let mut out = String::new();
    let emitted = encode_digest(WordArray::from_limbs(limbs.clone()), &alphabet, &mut out);
    assert_eq!(emitted, out.chars().count());
    assert!(out.chars().all(|c| alphabet.symbols().contains(&c)));

    // Determinism
    let mut again = String::new();
    encode_digest(WordArray::from_limbs(limbs), &alphabet, &mut again);
    assert_eq!(out, again, "encoding must be deterministic");
});
