use rust_decimal::Decimal;
use tracing::warn;

use super::backend::KeyValueStore;
use super::snapshot::{EntityGroup, load, save};
use crate::core::{
    BankingInfo, Client, InvoiceError, InvoiceMeta, InvoiceState, InvoiceView, ItemField, Issuer,
    LineItem, LineItems, Presentation, TaxPolicy, Totals, calculate_totals,
};

/// Handle returned by [`EntityStore::subscribe`].
pub type SubscriptionId = u64;

type Listener = Box<dyn Fn(EntityGroup, &InvoiceState) + Send + Sync>;

/// Whole-group replacement value for [`EntityStore::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum GroupPatch {
    Company(Issuer),
    Client(Client),
    InvoiceDetails(InvoiceMeta),
    ServiceItems(Vec<LineItem>),
    TaxRate(Decimal),
    IsTaxApplicable(bool),
    BankDetails(BankingInfo),
}

impl GroupPatch {
    pub fn group(&self) -> EntityGroup {
        match self {
            Self::Company(_) => EntityGroup::Company,
            Self::Client(_) => EntityGroup::Client,
            Self::InvoiceDetails(_) => EntityGroup::InvoiceDetails,
            Self::ServiceItems(_) => EntityGroup::ServiceItems,
            Self::TaxRate(_) => EntityGroup::TaxRate,
            Self::IsTaxApplicable(_) => EntityGroup::IsTaxApplicable,
            Self::BankDetails(_) => EntityGroup::BankDetails,
        }
    }
}

/// Owner of the editable invoice state.
///
/// Every mutation writes exactly the group it touched, synchronously, then
/// notifies subscribers once. Groups are saved independently; there is no
/// transaction spanning several of them. Write failures are logged and
/// absorbed so editing never stops; [`EntityStore::flush`] reports them.
pub struct EntityStore<S: KeyValueStore> {
    backend: S,
    state: InvoiceState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl<S: KeyValueStore> EntityStore<S> {
    /// Restore state from `backend`, using the sample data for any group
    /// that is missing or malformed.
    pub fn open(backend: S) -> Self {
        Self::open_with(backend, InvoiceState::default())
    }

    /// Restore state from `backend` with caller-supplied fallbacks.
    pub fn open_with(backend: S, defaults: InvoiceState) -> Self {
        let state = InvoiceState {
            issuer: load(&backend, EntityGroup::Company, defaults.issuer),
            client: load(&backend, EntityGroup::Client, defaults.client),
            meta: load(&backend, EntityGroup::InvoiceDetails, defaults.meta),
            items: load(&backend, EntityGroup::ServiceItems, defaults.items),
            tax: TaxPolicy {
                rate: load(&backend, EntityGroup::TaxRate, defaults.tax.rate),
                applicable: load(&backend, EntityGroup::IsTaxApplicable, defaults.tax.applicable),
            },
            banking: load(&backend, EntityGroup::BankDetails, defaults.banking),
        };

        Self {
            backend,
            state,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn state(&self) -> &InvoiceState {
        &self.state
    }

    /// Totals for the current state, recomputed on every call.
    pub fn totals(&self) -> Totals {
        calculate_totals(self.state.items.as_slice(), &self.state.tax)
    }

    pub fn view(&self, presentation: &Presentation) -> InvoiceView {
        InvoiceView::build(&self.state, presentation)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Replace one whole group.
    pub fn update(&mut self, patch: GroupPatch) -> &InvoiceState {
        let group = patch.group();
        match patch {
            GroupPatch::Company(issuer) => self.state.issuer = issuer,
            GroupPatch::Client(client) => self.state.client = client,
            GroupPatch::InvoiceDetails(meta) => self.state.meta = meta,
            GroupPatch::ServiceItems(items) => self.state.items.replace(items),
            GroupPatch::TaxRate(rate) => self.state.tax.rate = rate,
            GroupPatch::IsTaxApplicable(applicable) => self.state.tax.applicable = applicable,
            GroupPatch::BankDetails(banking) => self.state.banking = banking,
        }
        self.commit(group);
        &self.state
    }

    pub fn update_issuer(&mut self, edit: impl FnOnce(&mut Issuer)) -> &Issuer {
        edit(&mut self.state.issuer);
        self.commit(EntityGroup::Company);
        &self.state.issuer
    }

    pub fn update_client(&mut self, edit: impl FnOnce(&mut Client)) -> &Client {
        edit(&mut self.state.client);
        self.commit(EntityGroup::Client);
        &self.state.client
    }

    pub fn update_meta(&mut self, edit: impl FnOnce(&mut InvoiceMeta)) -> &InvoiceMeta {
        edit(&mut self.state.meta);
        self.commit(EntityGroup::InvoiceDetails);
        &self.state.meta
    }

    pub fn update_banking(&mut self, edit: impl FnOnce(&mut BankingInfo)) -> &BankingInfo {
        edit(&mut self.state.banking);
        self.commit(EntityGroup::BankDetails);
        &self.state.banking
    }

    pub fn set_tax_rate(&mut self, rate: Decimal) {
        self.state.tax.rate = rate;
        self.commit(EntityGroup::TaxRate);
    }

    /// Set the rate from percent text, e.g. `"20"` → `0.20`.
    pub fn set_tax_rate_percent(&mut self, raw: &str) {
        self.state.tax.set_rate_percent(raw);
        self.commit(EntityGroup::TaxRate);
    }

    pub fn set_tax_applicable(&mut self, applicable: bool) {
        self.state.tax.applicable = applicable;
        self.commit(EntityGroup::IsTaxApplicable);
    }

    /// Append a blank line item and return its id.
    pub fn add_item(&mut self) -> u64 {
        let id = self.state.items.add();
        self.commit(EntityGroup::ServiceItems);
        id
    }

    /// Edit one field of a line item from raw form text. Unknown ids are a
    /// no-op and write nothing.
    pub fn update_item(&mut self, id: u64, field: ItemField, raw: &str) -> bool {
        let changed = self.state.items.update(id, field, raw);
        if changed {
            self.commit(EntityGroup::ServiceItems);
        }
        changed
    }

    /// Remove a line item. Unknown ids are a no-op and write nothing.
    pub fn remove_item(&mut self, id: u64) -> bool {
        let removed = self.state.items.remove(id);
        if removed {
            self.commit(EntityGroup::ServiceItems);
        }
        removed
    }

    pub fn items(&self) -> &LineItems {
        &self.state.items
    }

    /// Call `listener` after every group mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(EntityGroup, &InvoiceState) + Send + Sync + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Write every group, stopping at the first failure.
    pub fn flush(&mut self) -> Result<(), InvoiceError> {
        for group in EntityGroup::ALL {
            self.write_group(group)?;
        }
        Ok(())
    }

    fn commit(&mut self, group: EntityGroup) {
        if let Err(err) = self.write_group(group) {
            warn!(key = group.key(), error = %err, "failed to persist entity group");
        }
        for (_, listener) in &self.listeners {
            listener(group, &self.state);
        }
    }

    fn write_group(&mut self, group: EntityGroup) -> Result<(), InvoiceError> {
        let backend = &mut self.backend;
        let state = &self.state;
        match group {
            EntityGroup::Company => save(backend, group, &state.issuer),
            EntityGroup::Client => save(backend, group, &state.client),
            EntityGroup::InvoiceDetails => save(backend, group, &state.meta),
            EntityGroup::ServiceItems => save(backend, group, &state.items),
            EntityGroup::TaxRate => save(backend, group, &state.tax.rate),
            EntityGroup::IsTaxApplicable => save(backend, group, &state.tax.applicable),
            EntityGroup::BankDetails => save(backend, group, &state.banking),
        }
    }
}
