#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        let amenities = host_advisor::loader::parse_amenities(raw);
        assert!(amenities.iter().all(|a| !a.is_empty()));
    }
});
