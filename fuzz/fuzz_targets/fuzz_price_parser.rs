#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        if let Some(price) = host_advisor::loader::parse_price(raw) {
            assert!(price.is_finite());
            assert!(price >= 0.0);
        }
    }
});
