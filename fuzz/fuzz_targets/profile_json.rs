#![no_main]

use keypunk_core::{DerivationProfile, Generator, KdfConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Attack: hostile profile documents from a synced profile store
    // Validates: parsing and generation fail cleanly, never panic

    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut profile) = serde_json::from_str::<DerivationProfile>(json) else {
        return;
    };

    // Bound the work per input
    profile.output_length = profile.output_length.min(512);

    if let Ok(value) = Generator::new().generate("Password", "example.com", &profile, &KdfConfig::disabled()) {
        assert_eq!(value.chars().count(), profile.output_length);
    }
});
