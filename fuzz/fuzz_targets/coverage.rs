#![no_main]

use arbitrary::Arbitrary;
use keypunk_core::ensure_all_classes;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct CoverageInput {
    value: String,
    sets: Vec<String>,
}

fuzz_target!(|input: CoverageInput| {
    // Attack: arbitrary (possibly overlapping, empty or unicode) class sets
    // Validates: no panics, length preserved, classes covered when possible

    let CoverageInput { value, sets } = input;
    if sets.len() > 16 {
        return;
    }

    let covered = ensure_all_classes(&value, &sets);
    assert_eq!(covered.chars().count(), value.chars().count());

    let classed = |c: char| sets.iter().any(|set| set.contains(c));
    let all_classed = value.chars().all(classed);
    let disjoint = sets.iter().enumerate().all(|(i, a)| {
        sets.iter()
            .skip(i + 1)
            .all(|b| !a.chars().any(|c| b.contains(c)))
    });

    // Guarantee holds for well-formed inputs: disjoint non-empty sets, every
    // character classed, and room for every class
    if disjoint
        && all_classed
        && sets.iter().all(|set| !set.is_empty())
        && value.chars().count() >= sets.len()
    {
        for set in &sets {
            assert!(covered.chars().any(|c| set.contains(c)), "class lost");
        }
    }
});
