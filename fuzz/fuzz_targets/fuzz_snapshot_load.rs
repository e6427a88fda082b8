#![no_main]

use libfuzzer_sys::fuzz_target;
use quickbill::store::{EntityGroup, EntityStore, MemoryStore};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Any stored text must load; bad groups fall back to defaults.
        let backend = MemoryStore::new()
            .with_entry(EntityGroup::ServiceItems.key(), s)
            .with_entry(EntityGroup::TaxRate.key(), s)
            .with_entry(EntityGroup::InvoiceDetails.key(), s);
        let mut store = EntityStore::open(backend);
        let id = store.add_item();
        let _ = store.totals().rounded();
        assert!(store.remove_item(id));
    }
});
