use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::backend::KeyValueStore;
use crate::core::InvoiceError;

/// A named, independently persisted category of invoice data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityGroup {
    Company,
    Client,
    InvoiceDetails,
    ServiceItems,
    TaxRate,
    IsTaxApplicable,
    BankDetails,
}

impl EntityGroup {
    pub const ALL: [EntityGroup; 7] = [
        Self::Company,
        Self::Client,
        Self::InvoiceDetails,
        Self::ServiceItems,
        Self::TaxRate,
        Self::IsTaxApplicable,
        Self::BankDetails,
    ];

    /// Storage key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Client => "client",
            Self::InvoiceDetails => "invoiceDetails",
            Self::ServiceItems => "serviceItems",
            Self::TaxRate => "taxRate",
            Self::IsTaxApplicable => "isTaxApplicable",
            Self::BankDetails => "bankDetails",
        }
    }

    /// Parse from a storage key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.key() == key)
    }
}

/// Load one group, falling back to `default` when the entry is missing,
/// unreadable or malformed. Never fails.
pub fn load<T, S>(backend: &S, group: EntityGroup, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match backend.get(group.key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(err) => {
            warn!(key = group.key(), error = %err, "failed to read snapshot entry, using default");
            return default;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(key = group.key(), error = %err, "malformed snapshot entry, using default");
            default
        }
    }
}

/// Serialize `value` as JSON and write it under the group's key.
pub fn save<T, S>(backend: &mut S, group: EntityGroup, value: &T) -> Result<(), InvoiceError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)
        .map_err(|e| InvoiceError::Snapshot(format!("failed to encode {}: {e}", group.key())))?;
    backend.set(group.key(), &json)?;
    debug!(key = group.key(), bytes = json.len(), "saved snapshot entry");
    Ok(())
}
