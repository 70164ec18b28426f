//! Character class coverage
//!
//! Rewrites a few characters of a generated value so every configured class
//! appears at least once, using only the value itself (no extra hashing).
//! For each missing class, in configuration order:
//!
//! 1. pick the represented class with the most positions; on a tie, the class
//!    whose first character appears earliest in the value wins
//! 2. take its earliest position
//! 3. replace that character with `missing[index_in_own_class % missing.len()]`
//!
//! Rewritten positions are never picked again. The donor always has at least
//! two positions whenever the value is at least as
//! long as the number of classes, so no class is ever emptied. Callers skip
//! this step for shorter values.

use std::collections::VecDeque;

/// Class index of `symbol`; the first matching class wins on overlap.
fn class_of<S: AsRef<str>>(symbol: char, sets: &[S]) -> Option<usize> {
    sets.iter().position(|set| set.as_ref().contains(symbol))
}

/// Rewrite `value` so every class in `sets` is represented.
pub fn ensure_all_classes<S: AsRef<str>>(value: &str, sets: &[S]) -> String {
    ensure_all_classes_traced(value, sets).0
}

/// [`ensure_all_classes`] plus the number of characters it replaced.
pub fn ensure_all_classes_traced<S: AsRef<str>>(value: &str, sets: &[S]) -> (String, usize) {
    let mut symbols: Vec<char> = value.chars().collect();

    let mut positions: Vec<VecDeque<usize>> = vec![VecDeque::new(); sets.len()];
    // Classes in order of first appearance in the value
    let mut appearance: Vec<usize> = Vec::with_capacity(sets.len());
    for (position, &symbol) in symbols.iter().enumerate() {
        if let Some(class) = class_of(symbol, sets) {
            if positions[class].is_empty() {
                appearance.push(class);
            }
            positions[class].push_back(position);
        }
    }

    let missing: Vec<usize> = (0..sets.len())
        .filter(|&class| positions[class].is_empty())
        .collect();

    let mut replaced = 0;
    for target in missing {
        let target_symbols: Vec<char> = sets[target].as_ref().chars().collect();
        if target_symbols.is_empty() {
            continue;
        }

        // Strict comparison keeps the first-appearing class on ties
        let mut donor: Option<usize> = None;
        for &class in &appearance {
            let count = positions[class].len();
            if count == 0 {
                continue;
            }
            if donor.is_none_or(|best| count > positions[best].len()) {
                donor = Some(class);
            }
        }
        let Some(donor) = donor else {
            break;
        };
        let Some(position) = positions[donor].pop_front() else {
            break;
        };

        let original = symbols[position];
        let index_in_class = sets[donor]
            .as_ref()
            .chars()
            .position(|symbol| symbol == original)
            .unwrap_or(0);

        // Rewritten positions never donate again
        symbols[position] = target_symbols[index_in_class % target_symbols.len()];
        replaced += 1;
    }

    if replaced > 0 {
        tracing::trace!(replaced, "coverage rewrote characters");
    }

    (symbols.into_iter().collect(), replaced)
}
