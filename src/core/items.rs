use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::numbering::ItemIdSequence;
use super::types::LineItem;

/// Normalize numeric form input.
///
/// Reads the longest leading decimal number (optional sign, digits, optional
/// fraction, optional exponent) after trimming whitespace. Anything that
/// does not start with a number, overflows, or is negative becomes zero.
pub fn parse_or_zero(raw: &str) -> Decimal {
    let Some(number) = leading_number(raw.trim()) else {
        return Decimal::ZERO;
    };
    let value = if number.contains(['e', 'E']) {
        Decimal::from_scientific(&number)
    } else {
        Decimal::from_str(&number)
    };
    value.unwrap_or(Decimal::ZERO).max(Decimal::ZERO)
}

/// Canonical text of the numeric prefix of `s`, or `None` if it has none.
fn leading_number(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    let mut out = String::new();

    match bytes.first() {
        Some(b'-') => {
            out.push('-');
            pos = 1;
        }
        Some(b'+') => pos = 1,
        _ => {}
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_digits = &s[frac_start..frac_end];
        if !int_digits.is_empty() || !frac_digits.is_empty() {
            pos = frac_end;
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }
    out.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(frac_digits);
    }

    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        let mut exp_end = pos + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            out.push('e');
            out.push_str(s[pos + 1..exp_end].trim_start_matches('+'));
        }
    }

    Some(out)
}

/// Editable field of a [`LineItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemField {
    Description,
    Quantity,
    UnitPrice,
}

impl ItemField {
    /// Snapshot field name (`description`, `quantity`, `unitPrice`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Quantity => "quantity",
            Self::UnitPrice => "unitPrice",
        }
    }

    /// Parse a snapshot field name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "description" => Some(Self::Description),
            "quantity" => Some(Self::Quantity),
            "unitPrice" => Some(Self::UnitPrice),
            _ => None,
        }
    }
}

/// Ordered line-item collection with collision-free identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct LineItems {
    items: Vec<LineItem>,
    ids: ItemIdSequence,
}

impl LineItems {
    /// Adopt existing items, e.g. restored from a snapshot.
    ///
    /// Later items whose id repeats an earlier one get a fresh id so the
    /// collection is always uniquely keyed. Negative quantities and unit
    /// prices become zero, as they would through [`LineItems::update`].
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Self::adopt(items, 1)
    }

    /// Replace every item while keeping the id sequence monotonic, so ids
    /// issued earlier in the session are still never handed out again.
    pub fn replace(&mut self, items: Vec<LineItem>) {
        *self = Self::adopt(items, self.ids.peek());
    }

    fn adopt(mut items: Vec<LineItem>, floor: u64) -> Self {
        let existing = items.iter().map(|item| item.id);
        let mut ids = ItemIdSequence::after(existing.chain([floor.saturating_sub(1)]));
        let mut seen = HashSet::with_capacity(items.len());
        for item in &mut items {
            item.quantity = item.quantity.max(Decimal::ZERO);
            item.unit_price = item.unit_price.max(Decimal::ZERO);
            if !seen.insert(item.id) {
                let fresh = ids.next_id();
                tracing::debug!(duplicate = item.id, fresh, "reassigned duplicate line item id");
                item.id = fresh;
                seen.insert(fresh);
            }
        }
        Self { items, ids }
    }

    /// Append a blank item (quantity 1, unit price 0) and return its id.
    pub fn add(&mut self) -> u64 {
        let id = self.ids.next_id();
        self.items
            .push(LineItem::new(id, String::new(), Decimal::ONE, Decimal::ZERO));
        id
    }

    /// Set one field of item `id` from raw form text.
    ///
    /// Descriptions are stored verbatim; numeric fields go through
    /// [`parse_or_zero`]. Returns `false` if no item has that id.
    pub fn update(&mut self, id: u64, field: ItemField, raw: &str) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        match field {
            ItemField::Description => item.description = raw.to_string(),
            ItemField::Quantity => item.quantity = parse_or_zero(raw),
            ItemField::UnitPrice => item.unit_price = parse_or_zero(raw),
        }
        true
    }

    /// Remove item `id`. Unknown ids leave the collection untouched.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn get(&self, id: u64) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for LineItems {
    fn default() -> Self {
        Self::from_items(Vec::new())
    }
}

impl From<Vec<LineItem>> for LineItems {
    fn from(items: Vec<LineItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<LineItems> for Vec<LineItem> {
    fn from(items: LineItems) -> Self {
        items.items
    }
}

impl<'a> IntoIterator for &'a LineItems {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
