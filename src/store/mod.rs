//! Write-through persistence of the editable invoice state.
//!
//! Each entity group lives under its own key in a [`KeyValueStore`] as a
//! JSON value. Groups load independently: a missing or malformed entry
//! falls back to that group's default and leaves the others alone.
//!
//! # Example
//!
//! ```
//! use quickbill::store::*;
//!
//! let mut store = EntityStore::open(MemoryStore::new());
//! let id = store.add_item();
//! store.update_item(id, quickbill::ItemField::UnitPrice, "75");
//! assert!(store.backend().get("serviceItems").unwrap().is_some());
//! ```

mod backend;
mod entity_store;
mod snapshot;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use entity_store::{EntityStore, GroupPatch, SubscriptionId};
pub use snapshot::{EntityGroup, load, save};
