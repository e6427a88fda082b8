//! Display-ready projection of an [`InvoiceState`].
//!
//! A renderer draws exactly these strings; it never recomputes amounts.

use serde::Serialize;

use super::totals::{DEFAULT_CURRENCY_GLYPH, Totals, calculate_totals, format_money, line_amount};
use super::types::{InvoiceState, LOGO_PLACEHOLDER_URL};

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub currency_glyph: String,
}

impl Presentation {
    pub fn new(currency_glyph: impl Into<String>) -> Self {
        Self {
            currency_glyph: currency_glyph.into(),
        }
    }

    pub fn money(&self, amount: rust_decimal::Decimal) -> String {
        format_money(amount, &self.currency_glyph)
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_GLYPH)
    }
}

/// Issuer logo as the renderer should request it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewLogo {
    pub src: String,
}

impl ViewLogo {
    /// Source to display: the configured one, or the placeholder after a
    /// failed load. A broken logo never stops the page from rendering.
    pub fn src_or_placeholder(&self, load_failed: bool) -> &str {
        if load_failed {
            LOGO_PLACEHOLDER_URL
        } else {
            &self.src
        }
    }
}

/// One row of the items table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRow {
    pub id: u64,
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub amount: String,
}

/// A labelled amount in the totals box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewAmount {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceView {
    pub logo: Option<ViewLogo>,
    pub issuer_name: String,
    /// Address, email, phone.
    pub issuer_lines: Vec<String>,
    pub title: String,
    pub number_line: String,
    pub client_name: String,
    /// Address, email.
    pub client_lines: Vec<String>,
    pub issue_date: String,
    pub due_date: String,
    pub rows: Vec<ViewRow>,
    pub subtotal: ViewAmount,
    /// Absent when tax does not apply.
    pub tax: Option<ViewAmount>,
    pub total: ViewAmount,
    pub bank_lines: Vec<ViewAmount>,
}

impl InvoiceView {
    pub fn build(state: &InvoiceState, presentation: &Presentation) -> Self {
        let totals: Totals = calculate_totals(state.items.as_slice(), &state.tax);

        let rows = state
            .items
            .iter()
            .map(|item| ViewRow {
                id: item.id,
                description: item.description.clone(),
                quantity: item.quantity.normalize().to_string(),
                unit_price: presentation.money(item.unit_price),
                amount: presentation.money(line_amount(item)),
            })
            .collect();

        let tax = state.tax.applicable.then(|| ViewAmount {
            label: format!("Tax ({}%):", state.tax.percent()),
            value: presentation.money(totals.tax_amount),
        });

        let banking = &state.banking;
        let bank_lines = [
            ("Bank Name:", &banking.bank_name),
            ("Account Name:", &banking.account_name),
            ("Account Number:", &banking.account_number),
            ("Sort Code:", &banking.sort_code),
        ]
        .into_iter()
        .map(|(label, value)| ViewAmount {
            label: label.to_string(),
            value: value.clone(),
        })
        .collect();

        Self {
            logo: state.issuer.logo().map(|src| ViewLogo {
                src: src.to_string(),
            }),
            issuer_name: state.issuer.name.clone(),
            issuer_lines: vec![
                state.issuer.address.clone(),
                state.issuer.email.clone(),
                state.issuer.phone.clone(),
            ],
            title: "INVOICE".to_string(),
            number_line: format!("# {}", state.meta.invoice_number),
            client_name: state.client.name.clone(),
            client_lines: vec![state.client.address.clone(), state.client.email.clone()],
            issue_date: state.meta.issue_date.format("%Y-%m-%d").to_string(),
            due_date: state.meta.due_date.format("%Y-%m-%d").to_string(),
            rows,
            subtotal: ViewAmount {
                label: "Subtotal:".to_string(),
                value: presentation.money(totals.subtotal),
            },
            tax,
            total: ViewAmount {
                label: "Total:".to_string(),
                value: presentation.money(totals.total),
            },
            bank_lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ItemField, TaxPolicy};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn state() -> InvoiceState {
        InvoiceState::sample_on(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    #[test]
    fn sample_view() {
        let view = InvoiceView::build(&state(), &Presentation::default());
        assert_eq!(view.number_line, "# INV-001");
        assert_eq!(view.issue_date, "2024-06-15");
        assert_eq!(view.due_date, "2024-06-22");
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].unit_price, "£1200.00");
        assert_eq!(view.rows[0].quantity, "1");
        assert_eq!(view.subtotal.value, "£1250.00");
        let tax = view.tax.unwrap();
        assert_eq!(tax.label, "Tax (20%):");
        assert_eq!(tax.value, "£250.00");
        assert_eq!(view.total.value, "£1500.00");
        assert_eq!(view.bank_lines[3].value, "12-34-56");
    }

    #[test]
    fn tax_line_hidden_when_not_applicable() {
        let mut state = state();
        state.tax = TaxPolicy::new(dec!(0.20), false);
        let view = InvoiceView::build(&state, &Presentation::default());
        assert!(view.tax.is_none());
        assert_eq!(view.total.value, "£1250.00");
    }

    #[test]
    fn row_amount_uses_full_precision() {
        let mut state = state();
        let id = state.items.add();
        state.items.update(id, ItemField::Quantity, "3");
        state.items.update(id, ItemField::UnitPrice, "0.335");
        let view = InvoiceView::build(&state, &Presentation::new("$"));
        let row = view.rows.last().unwrap();
        assert_eq!(row.unit_price, "$0.34");
        assert_eq!(row.amount, "$1.01");
    }

    #[test]
    fn missing_logo_and_failed_logo() {
        let mut state = state();
        let view = InvoiceView::build(&state, &Presentation::default());
        let logo = view.logo.unwrap();
        assert_eq!(logo.src_or_placeholder(true), LOGO_PLACEHOLDER_URL);

        state.issuer.logo_url = Some("https://example.com/logo.png".into());
        let logo = InvoiceView::build(&state, &Presentation::default()).logo.unwrap();
        assert_eq!(logo.src_or_placeholder(false), "https://example.com/logo.png");
        assert_eq!(logo.src_or_placeholder(true), LOGO_PLACEHOLDER_URL);

        state.issuer.logo_url = None;
        assert!(InvoiceView::build(&state, &Presentation::default()).logo.is_none());
    }
}
