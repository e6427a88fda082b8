#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (f64, f64)| {
    let (height, page) = data;
    if let Ok(slices) = quickbill::export::paginate(height, page) {
        assert!(!slices.is_empty());
        assert!(slices.len() <= quickbill::export::MAX_PAGES + 1);
    }
});
