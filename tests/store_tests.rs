#![cfg(feature = "store")]

use chrono::NaiveDate;
use quickbill::core::*;
use quickbill::store::*;
use rust_decimal_macros::dec;

fn defaults() -> InvoiceState {
    InvoiceState::sample_on(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
}

#[test]
fn first_run_uses_sample_data() {
    let store = EntityStore::open_with(MemoryStore::new(), defaults());
    assert_eq!(store.state(), &defaults());
    assert_eq!(store.totals().total, dec!(1500));
}

#[test]
fn malformed_items_fall_back_independently() {
    let backend = MemoryStore::new()
        .with_entry("serviceItems", "[{\"id\": 1, \"description\": ")
        .with_entry("client", r#"{"name":"Globex","address":"1 Main St","email":"ap@globex.test"}"#)
        .with_entry("taxRate", "0.1")
        .with_entry("isTaxApplicable", "false");

    let store = EntityStore::open_with(backend, defaults());
    let state = store.state();

    assert_eq!(state.items.as_slice(), sample_items().as_slice());
    assert_eq!(state.client.name, "Globex");
    assert_eq!(state.tax.rate, dec!(0.1));
    assert!(!state.tax.applicable);
    assert_eq!(state.issuer, Issuer::default());
}

#[test]
fn restores_snapshot_written_by_the_browser_app() {
    let backend = MemoryStore::new()
        .with_entry(
            "company",
            r#"{"name":"Acme Ltd","address":"1 Road","email":"a@acme.test","phone":"0123","logoUrl":""}"#,
        )
        .with_entry(
            "invoiceDetails",
            r#"{"invoiceNumber":"INV-042","invoiceDate":"2024-03-01","dueDate":"2024-03-08"}"#,
        )
        .with_entry(
            "serviceItems",
            r#"[{"id":1,"description":"Design","quantity":2,"unitPrice":300},{"id":3,"description":"Hosting","quantity":1,"unitPrice":12.5}]"#,
        )
        .with_entry(
            "bankDetails",
            r#"{"bankName":"Bank","accountName":"Acme","accountNumber":"87654321","sortCode":"65-43-21"}"#,
        );

    let mut store = EntityStore::open_with(backend, defaults());
    assert_eq!(store.state().meta.invoice_number, "INV-042");
    assert_eq!(store.state().issuer.logo(), None);
    assert_eq!(store.totals().subtotal, dec!(612.5));
    assert_eq!(store.add_item(), 4);
}

#[test]
fn edits_survive_reopen() {
    let mut store = EntityStore::open_with(MemoryStore::new(), defaults());
    store.update_issuer(|issuer| issuer.name = "Initech".into());
    store.update_meta(|meta| meta.invoice_number = "INV-777".into());
    let id = store.add_item();
    store.update_item(id, ItemField::Description, "Support");
    store.update_item(id, ItemField::UnitPrice, "100");
    store.remove_item(2);
    store.set_tax_applicable(false);

    let reopened = EntityStore::open_with(store.into_backend(), InvoiceState::default());
    let state = reopened.state();
    assert_eq!(state.issuer.name, "Initech");
    assert_eq!(state.meta.invoice_number, "INV-777");
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items.get(id).unwrap().description, "Support");
    assert_eq!(reopened.totals().total, dec!(1300));
}

#[test]
fn file_store_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();

    {
        let backend = FileStore::open(dir.path()).unwrap();
        let mut store = EntityStore::open_with(backend, defaults());
        store.update_client(|client| client.email = "billing@globex.test".into());
        store.update(GroupPatch::TaxRate(dec!(0.05)));
    }

    let backend = FileStore::open(dir.path()).unwrap();
    let store = EntityStore::open_with(backend, defaults());
    assert_eq!(store.state().client.email, "billing@globex.test");
    assert_eq!(store.state().tax.rate, dec!(0.05));
    // Untouched groups were never written and still come from defaults.
    assert!(!dir.path().join("bankDetails.json").exists());
}

#[test]
fn corrupt_file_falls_back_for_that_group_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("serviceItems.json"), "not json").unwrap();
    std::fs::write(dir.path().join("isTaxApplicable.json"), "false").unwrap();

    let store = EntityStore::open_with(FileStore::open(dir.path()).unwrap(), defaults());
    assert_eq!(store.state().items.len(), 2);
    assert!(!store.state().tax.applicable);
}

#[test]
fn patch_replacing_items_keeps_ids_fresh() {
    let mut store = EntityStore::open_with(MemoryStore::new(), defaults());
    let added = store.add_item();
    store.update(GroupPatch::ServiceItems(vec![LineItem::new(
        1,
        "Retainer",
        dec!(1),
        dec!(500),
    )]));
    assert_eq!(store.totals().subtotal, dec!(500));
    assert!(store.add_item() > added);
}

#[test]
fn flush_writes_every_group() {
    let mut store = EntityStore::open_with(MemoryStore::new(), defaults());
    store.flush().unwrap();
    for group in EntityGroup::ALL {
        assert!(store.backend().get(group.key()).unwrap().is_some(), "{}", group.key());
    }
}

#[test]
fn negative_amounts_in_snapshot_or_patch_become_zero() {
    let backend = MemoryStore::new().with_entry(
        "serviceItems",
        r#"[{"id":1,"description":"Refund","quantity":-5,"unitPrice":100}]"#,
    );
    let mut store = EntityStore::open_with(backend, defaults());
    assert_eq!(store.totals().subtotal, dec!(0));

    store.update(GroupPatch::ServiceItems(vec![LineItem::new(
        1,
        "Credit",
        dec!(-2),
        dec!(10),
    )]));
    assert_eq!(store.state().items.get(1).unwrap().quantity, dec!(0));
    assert_eq!(store.totals().subtotal, dec!(0));
}

#[test]
fn huge_form_entries_do_not_break_totals_or_view() {
    let mut store = EntityStore::open_with(MemoryStore::new(), defaults());
    let id = store.add_item();
    store.update_item(id, ItemField::Quantity, "79228162514264337593543950335");
    store.update_item(id, ItemField::UnitPrice, "2");

    let totals = store.totals();
    assert_eq!(totals.total, rust_decimal::Decimal::MAX);
    let view = store.view(&Presentation::default());
    assert!(view.total.value.starts_with('£'));
}
