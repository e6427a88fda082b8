/// Monotonic line-item identifier generator.
///
/// Identifiers are handed out in increasing order and never reissued, so an
/// id freed by a removal cannot collide with an item added later in the
/// same session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemIdSequence {
    next_id: u64,
}

impl ItemIdSequence {
    /// Create a new sequence starting at 1.
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Create a sequence continuing after the highest of `existing`.
    pub fn after<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let next_id = existing
            .into_iter()
            .max()
            .map_or(1, |max| max.saturating_add(1));
        Self { next_id }
    }

    /// Issue the next identifier.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Preview the next identifier without consuming it.
    pub fn peek(&self) -> u64 {
        self.next_id
    }
}

impl Default for ItemIdSequence {
    fn default() -> Self {
        Self::new()
    }
}
