//! Property-based tests for totals, item identity, input coercion and
//! pagination.
//!
//! Run with: `cargo test --features all --test proptest_tests`

#![cfg(feature = "core")]

use proptest::prelude::*;
use quickbill::*;
use rust_decimal::Decimal;

fn arb_price() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (0i64..10_000).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..5_000).prop_map(|basis_points| Decimal::new(basis_points, 4))
}

fn arb_items() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec((arb_quantity(), arb_price()), 0..20).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (quantity, price))| {
                LineItem::new(i as u64 + 1, format!("Item {i}"), quantity, price)
            })
            .collect()
    })
}

#[derive(Debug, Clone)]
enum Edit {
    Add,
    RemoveNth(usize),
}

fn arb_edits() -> impl Strategy<Value = Vec<Edit>> {
    prop::collection::vec(
        prop_oneof![3 => Just(Edit::Add), 1 => (0usize..50).prop_map(Edit::RemoveNth)],
        0..60,
    )
}

proptest! {
    #[test]
    fn subtotal_is_sum_of_line_amounts(items in arb_items(), rate in arb_rate()) {
        let totals = calculate_totals(&items, &TaxPolicy::new(rate, true));
        let expected: Decimal = items.iter().map(|i| i.quantity * i.unit_price).sum();
        prop_assert_eq!(totals.subtotal, expected);
        prop_assert_eq!(totals.tax_amount, expected * rate);
        prop_assert_eq!(totals.total, totals.subtotal + totals.tax_amount);
    }

    #[test]
    fn subtotal_ignores_item_order(items in arb_items(), rate in arb_rate()) {
        let tax = TaxPolicy::new(rate, true);
        let mut reversed = items.clone();
        reversed.reverse();
        prop_assert_eq!(calculate_totals(&items, &tax), calculate_totals(&reversed, &tax));
    }

    #[test]
    fn tax_off_means_total_equals_subtotal(items in arb_items(), rate in arb_rate()) {
        let totals = calculate_totals(&items, &TaxPolicy::new(rate, false));
        prop_assert_eq!(totals.tax_amount, Decimal::ZERO);
        prop_assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn ids_stay_unique_through_edits(edits in arb_edits()) {
        let mut items = LineItems::from_items(sample_items());
        let mut issued: Vec<u64> = items.iter().map(|i| i.id).collect();

        for edit in edits {
            match edit {
                Edit::Add => {
                    let id = items.add();
                    prop_assert!(!issued.contains(&id), "id {} reissued", id);
                    issued.push(id);
                }
                Edit::RemoveNth(n) if !items.is_empty() => {
                    let id = items.as_slice()[n % items.len()].id;
                    prop_assert!(items.remove(id));
                }
                Edit::RemoveNth(_) => {}
            }
        }

        let mut live: Vec<u64> = items.iter().map(|i| i.id).collect();
        let count = live.len();
        live.sort_unstable();
        live.dedup();
        prop_assert_eq!(live.len(), count);
    }

    #[test]
    fn parse_or_zero_is_never_negative(raw in ".{0,24}") {
        prop_assert!(parse_or_zero(&raw) >= Decimal::ZERO);
    }

    #[test]
    fn parse_or_zero_reads_plain_amounts(cents in 0i64..100_000_000) {
        let amount = Decimal::new(cents, 2);
        prop_assert_eq!(parse_or_zero(&amount.to_string()), amount);
    }

    #[test]
    fn format_money_has_two_decimals(cents in 0i64..1_000_000_000) {
        let shown = format_money(Decimal::new(cents, 2), DEFAULT_CURRENCY_GLYPH);
        let digits = shown.trim_start_matches(DEFAULT_CURRENCY_GLYPH);
        let (_, fraction) = digits.split_once('.').unwrap();
        prop_assert_eq!(fraction.len(), 2);
    }
}

#[cfg(feature = "export")]
mod pagination {
    use proptest::prelude::*;
    use quickbill::export::paginate;

    proptest! {
        #[test]
        fn whole_pages_have_no_trailing_page(pages in 1usize..200) {
            let slices = paginate(297.0 * pages as f64, 297.0).unwrap();
            prop_assert_eq!(slices.len(), pages);
        }

        #[test]
        fn page_count_is_ceiling(height in 0.5f64..50_000.0) {
            let slices = paginate(height, 297.0).unwrap();
            let expected = (height / 297.0).ceil() as usize;
            // Heights within float noise of a page boundary may land either side.
            let near_boundary = (height / 297.0 - (height / 297.0).round()).abs() < 1e-9;
            if !near_boundary {
                prop_assert_eq!(slices.len(), expected);
            }
            for (index, slice) in slices.iter().enumerate() {
                prop_assert_eq!(slice.index, index);
                prop_assert_eq!(slice.offset_mm, -(index as f64) * 297.0);
            }
        }
    }
}
