//! Digest words as one big-endian unsigned integer.
//!
//! A hash digest is reinterpreted as a sequence of 32-bit limbs, most
//! significant limb first. The only arithmetic the codec needs is repeated
//! division by a small divisor (the alphabet size), so that is all this type
//! offers. Division accumulates in native `u64`: `limb + remainder * 2^32`
//! never exceeds `divisor * 2^32 - 1`, which fits for every `u32` divisor.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Big-endian array of 32-bit limbs used as a scratch dividend.
///
/// Leading limbs that have reached zero are skipped by later divisions, so a
/// full reduction to zero costs O(n²) limb operations for n limbs.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct WordArray {
    limbs: Vec<u32>,
    /// Index of the first limb still taking part in division
    start: usize,
}

impl WordArray {
    /// Build from limbs, most significant first.
    pub fn from_limbs(limbs: Vec<u32>) -> Self {
        WordArray { limbs, start: 0 }
    }

    /// Reinterpret raw digest bytes as big-endian 32-bit limbs.
    ///
    /// Every supported digest is a whole number of limbs; a trailing partial
    /// limb (never produced by the engine) is zero-padded on the right.
    pub fn from_digest(bytes: &[u8]) -> Self {
        let limbs = bytes
            .chunks(4)
            .map(|chunk| {
                let mut word = [0u8; 4];
                word[..chunk.len()].copy_from_slice(chunk);
                u32::from_be_bytes(word)
            })
            .collect();
        WordArray::from_limbs(limbs)
    }

    /// All limbs, including exhausted leading ones.
    pub fn limbs(&self) -> &[u32] {
        &self.limbs
    }

    /// Number of limbs the digest started with.
    pub fn len(&self) -> usize {
        self.limbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limbs.is_empty()
    }

    /// True once every limb still in play has been skipped.
    pub fn is_exhausted(&self) -> bool {
        self.start >= self.limbs.len()
    }

    /// True when the represented integer is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs[self.start.min(self.limbs.len())..]
            .iter()
            .all(|&limb| limb == 0)
    }

    /// Divide in place by `divisor`, returning the remainder.
    ///
    /// One pass runs most significant limb first. Afterwards the leading
    /// zero limbs are skipped so the next pass only touches live limbs.
    ///
    /// # Panics
    /// Panics if `divisor` is zero. Callers validate the alphabet first.
    pub fn div_rem_in_place(&mut self, divisor: u32) -> u32 {
        assert!(divisor != 0, "division of word array by zero");

        let divisor = u64::from(divisor);
        let mut remainder: u64 = 0;
        for limb in &mut self.limbs[self.start..] {
            let value = u64::from(*limb) | (remainder << 32);
            // quotient < 2^32 because remainder < divisor
            *limb = (value / divisor) as u32;
            remainder = value % divisor;
        }

        while self.start < self.limbs.len() && self.limbs[self.start] == 0 {
            self.start += 1;
        }

        remainder as u32
    }

    /// Non-destructive division: returns `(quotient, remainder)`.
    pub fn div_rem(&self, divisor: u32) -> (WordArray, u32) {
        let mut quotient = self.clone();
        let remainder = quotient.div_rem_in_place(divisor);
        (quotient, remainder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_u128(words: &WordArray) -> u128 {
        words
            .limbs()
            .iter()
            .fold(0u128, |acc, &limb| (acc << 32) | u128::from(limb))
    }

    #[test]
    fn test_from_digest_is_big_endian() {
        let words = WordArray::from_digest(&[0x86, 0xcb, 0x26, 0x11, 0xf4, 0x69, 0xe1, 0x36]);
        assert_eq!(words.limbs(), &[0x86cb_2611, 0xf469_e136]);
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn test_from_digest_pads_partial_limb() {
        let words = WordArray::from_digest(&[0x01, 0x02, 0x03, 0x04, 0xff]);
        assert_eq!(words.limbs(), &[0x0102_0304, 0xff00_0000]);
    }

    #[test]
    fn test_div_rem_matches_wide_arithmetic() {
        let words = WordArray::from_limbs(vec![0xffff_ffff, 0x1234_5678, 0x9abc_def0]);
        let value = to_u128(&words);

        for divisor in [1u32, 2, 10, 94, 62, 65_537, 2_097_151, u32::MAX] {
            let (quotient, remainder) = words.div_rem(divisor);
            assert_eq!(u128::from(remainder), value % u128::from(divisor));
            assert_eq!(to_u128(&quotient), value / u128::from(divisor));
        }
    }

    #[test]
    fn test_leading_zero_limbs_are_skipped() {
        // 2^32 + 5
        let mut words = WordArray::from_limbs(vec![0, 0, 1, 5]);
        let remainder = words.div_rem_in_place(10);
        assert_eq!(remainder, 1); // 4294967301 % 10
        assert!(!words.is_exhausted());

        // Reduce to zero; the quotient fits in the last limb afterwards
        while !words.is_exhausted() {
            words.div_rem_in_place(10);
        }
        assert!(words.is_zero());
    }

    #[test]
    fn test_zero_value() {
        let words = WordArray::from_limbs(vec![0, 0]);
        assert!(words.is_zero());
        assert!(!words.is_exhausted());
    }

    #[test]
    #[should_panic(expected = "division of word array by zero")]
    fn test_zero_divisor_panics() {
        let mut words = WordArray::from_limbs(vec![1]);
        words.div_rem_in_place(0);
    }
}

// Kani proofs for the limb division step
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Property: a two-limb division agrees with native u64 division
    #[kani::proof]
    #[kani::unwind(4)]
    fn verify_two_limb_division() {
        let high: u32 = kani::any();
        let low: u32 = kani::any();
        let divisor: u32 = kani::any();
        kani::assume(divisor > 0);

        let mut words = WordArray::from_limbs(vec![high, low]);
        let remainder = words.div_rem_in_place(divisor);

        let value = (u64::from(high) << 32) | u64::from(low);
        assert_eq!(u64::from(remainder), value % u64::from(divisor));
        let quotient = (u64::from(words.limbs[0]) << 32) | u64::from(words.limbs[1]);
        assert_eq!(quotient, value / u64::from(divisor));
    }

    /// Property: the remainder is always smaller than the divisor
    #[kani::proof]
    #[kani::unwind(4)]
    fn verify_remainder_bound() {
        let limbs: [u32; 3] = kani::any();
        let divisor: u32 = kani::any();
        kani::assume(divisor > 0);

        let mut words = WordArray::from_limbs(limbs.to_vec());
        let remainder = words.div_rem_in_place(divisor);
        assert!(remainder < divisor);
    }
}
