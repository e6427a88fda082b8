//! Core invoice types, line items, totals, and the preview view model.
//!
//! Everything here is pure data and arithmetic: no I/O, no rendering.

mod error;
mod items;
mod numbering;
mod totals;
mod types;
mod view;

pub use error::*;
pub use items::*;
pub use numbering::*;
pub use totals::*;
pub use types::*;
pub use view::*;
