use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::items::LineItems;

/// Logo shown when the issuer has none or it fails to load.
pub const LOGO_PLACEHOLDER_URL: &str = "https://placehold.co/150x50/E0E7FF/4338CA?text=Your+Logo";

/// Days between the default issue date and the default due date.
pub const DEFAULT_PAYMENT_DAYS: u64 = 7;

/// The business issuing the invoice (payee).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issuer {
    pub name: String,
    /// Free-text postal address, may span several lines.
    pub address: String,
    pub email: String,
    pub phone: String,
    /// Logo URI. `None` or an empty string means no logo is configured.
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Default for Issuer {
    fn default() -> Self {
        Self {
            name: "Your Company Name".into(),
            address: "123 Business Rd, City, Postcode".into(),
            email: "info@yourcompany.com".into(),
            phone: "+123 456 7890".into(),
            logo_url: Some(LOGO_PLACEHOLDER_URL.into()),
        }
    }
}

impl Issuer {
    /// The configured logo URI, if any non-blank one is set.
    pub fn logo(&self) -> Option<&str> {
        self.logo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// The party being billed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub address: String,
    pub email: String,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            name: "Client Name".into(),
            address: "Client Address, City, Postcode".into(),
            email: "client@example.com".into(),
        }
    }
}

/// Invoice number and dates.
///
/// The due date is not required to follow the issue date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceMeta {
    /// Used verbatim in the exported filename.
    pub invoice_number: String,
    #[serde(rename = "invoiceDate")]
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl InvoiceMeta {
    /// Default metadata issued on `date`, due [`DEFAULT_PAYMENT_DAYS`] later.
    pub fn starting_on(date: NaiveDate) -> Self {
        Self {
            invoice_number: "INV-001".into(),
            issue_date: date,
            due_date: date
                .checked_add_days(Days::new(DEFAULT_PAYMENT_DAYS))
                .unwrap_or(date),
        }
    }
}

impl Default for InvoiceMeta {
    fn default() -> Self {
        Self::starting_on(Local::now().date_naive())
    }
}

/// One billable line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique within the owning [`LineItems`] collection.
    pub id: u64,
    pub description: String,
    /// Non-negative; invalid input is coerced to zero.
    pub quantity: Decimal,
    /// Non-negative; invalid input is coerced to zero.
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(
        id: u64,
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            quantity,
            unit_price,
        }
    }
}

/// Sample items shown on first run.
pub fn sample_items() -> Vec<LineItem> {
    vec![
        LineItem::new(1, "Website Design", dec!(1), dec!(1200.00)),
        LineItem::new(2, "Monthly Hosting", dec!(1), dec!(50.00)),
    ]
}

/// Tax rate and whether it is charged at all.
///
/// The rate is kept when tax is switched off so switching it back on
/// restores the previous rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPolicy {
    /// Fraction, e.g. `0.20` for 20%. The upper bound is not enforced.
    pub rate: Decimal,
    pub applicable: bool,
}

impl TaxPolicy {
    pub fn new(rate: Decimal, applicable: bool) -> Self {
        Self { rate, applicable }
    }

    /// Rate expressed as a percentage, trailing zeros removed (`0.20` → `20`).
    pub fn percent(&self) -> Decimal {
        super::totals::saturating_mul(self.rate, dec!(100)).normalize()
    }

    /// Set the rate from percent text such as `"20"` or `"7.5"`.
    pub fn set_rate_percent(&mut self, raw: &str) {
        self.rate = (super::items::parse_or_zero(raw) / dec!(100)).normalize();
    }
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self::new(dec!(0.20), true)
    }
}

/// Bank transfer details printed on the invoice. Opaque strings, not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankingInfo {
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub sort_code: String,
}

impl Default for BankingInfo {
    fn default() -> Self {
        Self {
            bank_name: "Your Bank Name".into(),
            account_name: "Your Account Name".into(),
            account_number: "12345678".into(),
            sort_code: "12-34-56".into(),
        }
    }
}

/// Everything the user edits, one field per entity group.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceState {
    pub issuer: Issuer,
    pub client: Client,
    pub meta: InvoiceMeta,
    pub items: LineItems,
    pub tax: TaxPolicy,
    pub banking: BankingInfo,
}

impl Default for InvoiceState {
    fn default() -> Self {
        Self {
            issuer: Issuer::default(),
            client: Client::default(),
            meta: InvoiceMeta::default(),
            items: LineItems::from_items(sample_items()),
            tax: TaxPolicy::default(),
            banking: BankingInfo::default(),
        }
    }
}

impl InvoiceState {
    /// First-run state with invoice dates anchored at `date`.
    pub fn sample_on(date: NaiveDate) -> Self {
        Self {
            meta: InvoiceMeta::starting_on(date),
            ..Self::default()
        }
    }
}
