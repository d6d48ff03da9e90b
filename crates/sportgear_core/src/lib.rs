//! Core domain logic for SportGear.
//! This crate is the single source of truth for inventory, reminder and
//! packing-list invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::item::{normalize_condition, Item, ItemCategory, ItemId};
pub use model::packing_list::{PackingList, PackingListId, PackingProgress};
pub use model::presets::default_presets;
pub use model::reminder::{Reminder, ReminderId, ReminderType};
pub use repo::kv_repo::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use repo::snapshot_repo::{
    Collections, PersistReport, SnapshotRepository, ITEMS_SLOT, PACKING_LISTS_SLOT,
    REMINDERS_SLOT,
};
pub use repo::{RepoError, RepoResult};
pub use service::gear_store::{
    open_memory_store, open_sqlite_store, GearStore, StoreEvent, SubscriptionId,
};
pub use service::projections::ItemListQuery;
pub use service::reminder_rules::{CLEANING_USAGE_THRESHOLD, REPLACEMENT_CONDITION_THRESHOLD};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
