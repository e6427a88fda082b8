//! # quickbill
//!
//! Single-user invoice editing with exact totals and a paginated PDF export.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Amounts are kept at full precision and only rounded to two decimal places
//! when presented.
//!
//! ## Quick Start
//!
//! ```rust
//! use quickbill::core::*;
//! use rust_decimal_macros::dec;
//!
//! let mut items = LineItems::default();
//! let design = items.add();
//! items.update(design, ItemField::Description, "Website Design");
//! items.update(design, ItemField::UnitPrice, "1200");
//! let hosting = items.add();
//! items.update(hosting, ItemField::UnitPrice, "50");
//!
//! let totals = calculate_totals(items.as_slice(), &TaxPolicy::new(dec!(0.20), true));
//! assert_eq!(totals.subtotal, dec!(1250));
//! assert_eq!(totals.tax_amount, dec!(250));
//! assert_eq!(format_money(totals.total, DEFAULT_CURRENCY_GLYPH), "£1500.00");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Entity types, line items, totals, preview view model |
//! | `store` (default) | Write-through entity store over a key-value backend |
//! | `export` | Rasterize, paginate and assemble the preview into a PDF |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "store")]
pub mod store;

#[cfg(feature = "export")]
pub mod export;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
