use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::types::{LineItem, TaxPolicy};

/// Currency glyph prefixed to every displayed amount.
pub const DEFAULT_CURRENCY_GLYPH: &str = "£";

/// Derived invoice totals at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of all line amounts.
    pub subtotal: Decimal,
    /// `subtotal × rate` when tax applies, otherwise zero.
    pub tax_amount: Decimal,
    /// `subtotal + tax_amount`.
    pub total: Decimal,
}

impl Totals {
    /// All three amounts rounded for display.
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round_money(self.subtotal),
            tax_amount: round_money(self.tax_amount),
            total: round_money(self.total),
        }
    }
}

/// Line amount (`quantity × unit_price`), unrounded.
///
/// Saturates at [`Decimal::MAX`] instead of overflowing.
pub fn line_amount(item: &LineItem) -> Decimal {
    saturating_mul(item.quantity, item.unit_price)
}

/// Compute totals from the current items and tax policy.
///
/// Line amounts are summed unrounded; rounding happens only when the
/// result is presented, so it never accumulates. Amounts beyond the
/// `Decimal` range saturate rather than panic.
pub fn calculate_totals(items: &[LineItem], tax: &TaxPolicy) -> Totals {
    let subtotal = items
        .iter()
        .map(line_amount)
        .fold(Decimal::ZERO, saturating_add);
    let tax_amount = if tax.applicable {
        saturating_mul(subtotal, tax.rate)
    } else {
        Decimal::ZERO
    };

    Totals {
        subtotal,
        tax_amount,
        total: saturating_add(subtotal, tax_amount),
    }
}

pub(crate) fn saturating_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or_else(|| {
        if a.is_sign_negative() != b.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

pub(crate) fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(if a.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Round a Decimal to 2 decimal places using half-up (commercial rounding).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount as `<glyph><amount>` with exactly two decimals.
pub fn format_money(amount: Decimal, glyph: &str) -> String {
    let mut rounded = round_money(amount);
    rounded.rescale(2);
    format!("{glyph}{rounded}")
}
