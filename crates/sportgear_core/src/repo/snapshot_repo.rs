//! Collection snapshot persistence over a key-value backend.
//!
//! # Responsibility
//! - Serialize each collection as a JSON array into its fixed slot.
//! - Load each slot independently, falling back to empty on bad data.
//!
//! # Invariants
//! - A failure in one slot never prevents reading or writing the others.
//! - `load_all` and `save_all` never return errors; failures are logged.

use crate::model::item::Item;
use crate::model::packing_list::PackingList;
use crate::model::reminder::Reminder;
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::{RepoError, RepoResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const ITEMS_SLOT: &str = "sportItems";
pub const REMINDERS_SLOT: &str = "maintenanceReminders";
pub const PACKING_LISTS_SLOT: &str = "packingLists";

/// The three collections owned by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub items: Vec<Item>,
    pub reminders: Vec<Reminder>,
    pub packing_lists: Vec<PackingList>,
}

/// Outcome of one `save_all` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    /// Slots whose write failed, in write order.
    pub failed_slots: Vec<&'static str>,
}

impl PersistReport {
    pub fn is_ok(&self) -> bool {
        self.failed_slots.is_empty()
    }
}

/// Slot-level reader/writer for [`Collections`].
pub struct SnapshotRepository<K> {
    backend: K,
}

impl<K: KeyValueStore> SnapshotRepository<K> {
    pub fn new(backend: K) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    pub fn into_backend(self) -> K {
        self.backend
    }

    /// Reads one slot. `Ok(None)` means the slot was never written.
    pub fn load_slot<T: DeserializeOwned>(&self, slot: &'static str) -> RepoResult<Option<Vec<T>>> {
        let Some(bytes) = self.backend.get(slot)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| RepoError::Deserialize { slot, source })
    }

    /// Writes one slot, replacing its previous content.
    pub fn save_slot<T: Serialize>(&mut self, slot: &'static str, records: &[T]) -> RepoResult<()> {
        let bytes =
            serde_json::to_vec(records).map_err(|source| RepoError::Serialize { slot, source })?;
        self.backend.set(slot, &bytes)
    }

    /// Loads every slot; absent or unreadable slots come back empty.
    pub fn load_all(&self) -> Collections {
        Collections {
            items: self.load_or_empty(ITEMS_SLOT),
            reminders: self.load_or_empty(REMINDERS_SLOT),
            packing_lists: self.load_or_empty(PACKING_LISTS_SLOT),
        }
    }

    /// Writes every slot, attempting each one regardless of earlier failures.
    pub fn save_all(&mut self, collections: &Collections) -> PersistReport {
        let mut report = PersistReport::default();
        let results = [
            (ITEMS_SLOT, self.save_slot(ITEMS_SLOT, &collections.items)),
            (
                REMINDERS_SLOT,
                self.save_slot(REMINDERS_SLOT, &collections.reminders),
            ),
            (
                PACKING_LISTS_SLOT,
                self.save_slot(PACKING_LISTS_SLOT, &collections.packing_lists),
            ),
        ];
        for (slot, result) in results {
            if let Err(err) = result {
                warn!("event=slot_save module=repo status=error slot={slot} error={err}");
                report.failed_slots.push(slot);
            }
        }
        report
    }

    fn load_or_empty<T: DeserializeOwned>(&self, slot: &'static str) -> Vec<T> {
        match self.load_slot(slot) {
            Ok(Some(records)) => {
                debug!(
                    "event=slot_load module=repo status=ok slot={slot} count={}",
                    records.len()
                );
                records
            }
            Ok(None) => {
                debug!("event=slot_load module=repo status=empty slot={slot}");
                Vec::new()
            }
            Err(err) => {
                warn!("event=slot_load module=repo status=fallback slot={slot} error={err}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Collections, SnapshotRepository, ITEMS_SLOT, PACKING_LISTS_SLOT, REMINDERS_SLOT};
    use crate::model::item::{Item, ItemCategory};
    use crate::model::packing_list::PackingList;
    use crate::model::reminder::{Reminder, ReminderType};
    use crate::repo::kv_repo::{KeyValueStore, MemoryKeyValueStore};
    use crate::repo::RepoError;
    use chrono::Utc;

    #[test]
    fn untouched_backend_loads_empty_collections() {
        let repo = SnapshotRepository::new(MemoryKeyValueStore::new());
        assert_eq!(repo.load_all(), Collections::default());
    }

    #[test]
    fn save_all_writes_every_slot_as_json_array() {
        let item = Item::new("Racket", ItemCategory::Equipment);
        let collections = Collections {
            reminders: vec![Reminder::new(item.id, ReminderType::Inspection, Utc::now())],
            packing_lists: vec![PackingList::new("Court", "Tennis").with_items([item.id])],
            items: vec![item],
        };

        let mut repo = SnapshotRepository::new(MemoryKeyValueStore::new());
        assert!(repo.save_all(&collections).is_ok());

        for slot in [ITEMS_SLOT, REMINDERS_SLOT, PACKING_LISTS_SLOT] {
            let bytes = repo.backend().get(slot).unwrap().unwrap();
            let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(value.as_array().map(Vec::len), Some(1), "{slot}");
        }
        assert_eq!(repo.load_all(), collections);
    }

    #[test]
    fn malformed_slot_falls_back_to_empty_without_touching_others() {
        let mut backend = MemoryKeyValueStore::new();
        backend.set(ITEMS_SLOT, b"{not json").unwrap();
        let list = PackingList::new("Pool", "Swimming");
        backend
            .set(PACKING_LISTS_SLOT, &serde_json::to_vec(&[&list]).unwrap())
            .unwrap();

        let repo = SnapshotRepository::new(backend);
        let err = repo.load_slot::<Item>(ITEMS_SLOT).unwrap_err();
        assert!(matches!(err, RepoError::Deserialize { slot, .. } if slot == ITEMS_SLOT));

        let loaded = repo.load_all();
        assert!(loaded.items.is_empty());
        assert!(loaded.reminders.is_empty());
        assert_eq!(loaded.packing_lists, vec![list]);
    }
}
