//! Read projections consumed by the presentation layer.
//!
//! # Responsibility
//! - Filter and order items for the inventory list.
//! - Order pending reminders and resolve packing-list contents.
//!
//! # Invariants
//! - Projections are recomputed from current store state, never cached.
//! - Item listing is ordered by name, compared case-insensitively; ties keep
//!   a deterministic order by exact name, then store order.

use crate::clock::Clock;
use crate::model::item::{Item, ItemCategory};
use crate::model::packing_list::{PackingList, PackingProgress};
use crate::model::reminder::Reminder;
use crate::repo::kv_repo::KeyValueStore;
use crate::service::gear_store::GearStore;

/// Filter options for the inventory list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemListQuery {
    /// Exact category match when set.
    pub category: Option<ItemCategory>,
    /// Case-insensitive substring of name or brand; blank means no filter.
    pub search_text: Option<String>,
}

impl ItemListQuery {
    pub fn category(category: ItemCategory) -> Self {
        Self {
            category: Some(category),
            search_text: None,
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            category: None,
            search_text: Some(text.into()),
        }
    }
}

/// Filters `items` by `query` and orders them by name.
pub fn list_items<'a>(items: &'a [Item], query: &ItemListQuery) -> Vec<&'a Item> {
    let needle = query
        .search_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_lowercase);

    let mut listed: Vec<&Item> = items
        .iter()
        .filter(|item| query.category.map_or(true, |category| item.category == category))
        .filter(|item| {
            needle
                .as_deref()
                .map_or(true, |needle| item.matches_lowercase(needle))
        })
        .collect();
    listed.sort_by_cached_key(|item| (item.name.to_lowercase(), item.name.clone()));
    listed
}

/// Incomplete reminders ordered by due date, earliest first.
pub fn pending_reminders(reminders: &[Reminder]) -> Vec<&Reminder> {
    let mut pending: Vec<&Reminder> = reminders.iter().filter(|r| r.is_pending()).collect();
    pending.sort_by_key(|reminder| reminder.due_date);
    pending
}

/// Items referenced by `list`, in store order.
pub fn packing_list_items<'a>(items: &'a [Item], list: &PackingList) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|item| list.items.contains(&item.id))
        .collect()
}

/// The item a reminder points at, if it still exists.
pub fn item_for_reminder<'a>(items: &'a [Item], reminder: &Reminder) -> Option<&'a Item> {
    items.iter().find(|item| item.id == reminder.item_id)
}

impl<K: KeyValueStore, C: Clock> GearStore<K, C> {
    pub fn list_items(&self, query: &ItemListQuery) -> Vec<&Item> {
        list_items(self.items(), query)
    }

    pub fn pending_reminders(&self) -> Vec<&Reminder> {
        pending_reminders(self.reminders())
    }

    /// Badge count for the reminders tab.
    pub fn pending_reminder_count(&self) -> usize {
        self.reminders().iter().filter(|r| r.is_pending()).count()
    }

    pub fn packing_list_items(&self, list: &PackingList) -> Vec<&Item> {
        packing_list_items(self.items(), list)
    }

    pub fn item_for_reminder(&self, reminder: &Reminder) -> Option<&Item> {
        item_for_reminder(self.items(), reminder)
    }

    /// Progress for every packing list, in store order.
    pub fn packing_progress(&self) -> Vec<(&PackingList, PackingProgress)> {
        self.packing_lists()
            .iter()
            .map(|list| (list, list.progress()))
            .collect()
    }
}
