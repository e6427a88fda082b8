#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let value = quickbill::parse_or_zero(s);
        assert!(!value.is_sign_negative() || value.is_zero());
    }
});
