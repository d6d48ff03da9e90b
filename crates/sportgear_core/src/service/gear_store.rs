//! Gear store: single owner of items, reminders and packing lists.
//!
//! # Responsibility
//! - Expose the mutation use-cases for all three collections.
//! - Run reminder rules after item creation, update and usage.
//! - Persist the full snapshot after every applied mutation.
//! - Notify subscribers about which collection changed.
//!
//! # Invariants
//! - Collections are only mutated through `&mut self` methods; readers get
//!   slices.
//! - Unknown ids turn a mutation into a silent no-op: no persist, no event.
//!   `delete_item` still sweeps reminders pointing at the unknown id.
//! - Stored item conditions are always finite and within `[0, 1]`.
//! - Persistence failures are logged and never reach the caller; in-memory
//!   state stays authoritative for the session.
//! - Deleting an item removes its reminders but leaves packing lists as is.

use crate::clock::{Clock, SystemClock};
use crate::db::DbError;
use crate::model::item::{normalize_condition, Item, ItemCategory, ItemId};
use crate::model::packing_list::{PackingList, PackingListId};
use crate::model::reminder::{Reminder, ReminderId, ReminderType};
use crate::repo::kv_repo::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
use crate::repo::snapshot_repo::{Collections, SnapshotRepository};
use crate::service::reminder_rules;
use log::{info, warn};
use std::path::Path;

/// Handle returned by [`GearStore::subscribe`].
pub type SubscriptionId = u64;

/// Which collection a mutation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    ItemsChanged,
    RemindersChanged,
    PackingListsChanged,
}

type Observer = Box<dyn FnMut(&StoreEvent, &Collections)>;

/// In-memory gear store persisted through a key-value backend.
pub struct GearStore<K: KeyValueStore, C: Clock = SystemClock> {
    state: Collections,
    snapshots: SnapshotRepository<K>,
    clock: C,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription_id: SubscriptionId,
}

/// Opens a store over the SQLite slot database at `path`.
///
/// # Errors
/// Returns an error when the database cannot be opened or migrated. Bad slot
/// content is not an error; affected collections start empty.
pub fn open_sqlite_store(path: impl AsRef<Path>) -> Result<GearStore<SqliteKeyValueStore>, DbError> {
    let backend = SqliteKeyValueStore::open(path)?;
    Ok(GearStore::open(backend, SystemClock))
}

/// Opens an empty store that keeps its slots in process memory.
pub fn open_memory_store() -> GearStore<MemoryKeyValueStore> {
    GearStore::open(MemoryKeyValueStore::new(), SystemClock)
}

impl<K: KeyValueStore, C: Clock> GearStore<K, C> {
    /// Loads all collections from `backend`.
    pub fn open(backend: K, clock: C) -> Self {
        let snapshots = SnapshotRepository::new(backend);
        let state = snapshots.load_all();
        info!(
            "event=store_open module=store status=ok items={} reminders={} packing_lists={}",
            state.items.len(),
            state.reminders.len(),
            state.packing_lists.len()
        );
        Self {
            state,
            snapshots,
            clock,
            observers: Vec::new(),
            next_subscription_id: 1,
        }
    }

    /// Drops subscribers and hands the backend back to the caller.
    pub fn close(self) -> K {
        info!("event=store_close module=store status=ok");
        self.snapshots.into_backend()
    }

    pub fn backend(&self) -> &K {
        self.snapshots.backend()
    }

    pub fn collections(&self) -> &Collections {
        &self.state
    }

    pub fn items(&self) -> &[Item] {
        &self.state.items
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.state.reminders
    }

    pub fn packing_lists(&self) -> &[PackingList] {
        &self.state.packing_lists
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.state.items.iter().find(|item| item.id == id)
    }

    pub fn reminder(&self, id: ReminderId) -> Option<&Reminder> {
        self.state.reminders.iter().find(|reminder| reminder.id == id)
    }

    pub fn packing_list(&self, id: PackingListId) -> Option<&PackingList> {
        self.state.packing_lists.iter().find(|list| list.id == id)
    }

    /// Registers `observer`; it is called after each persisted change.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent, &Collections) + 'static,
    {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes a subscriber. Returns `false` for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Creates (but does not add) an item purchased now by the store clock.
    pub fn new_item(&self, name: impl Into<String>, category: ItemCategory) -> Item {
        Item::new_at(name, category, self.clock.now())
    }

    /// Adds `item`, clamping its condition into `[0, 1]`.
    pub fn add_item(&mut self, mut item: Item) {
        item.condition = normalize_condition(item.condition);
        let created = self.rule_reminders(&item);
        self.state.items.push(item);
        self.commit(StoreEvent::ItemsChanged);
        self.add_rule_reminders(created);
    }

    /// Replaces the stored item with the same id, clamping its condition.
    pub fn update_item(&mut self, mut item: Item) {
        let Some(index) = self.item_index(item.id) else {
            return;
        };
        item.condition = normalize_condition(item.condition);
        let created = self.rule_reminders(&item);
        self.state.items[index] = item;
        self.commit(StoreEvent::ItemsChanged);
        self.add_rule_reminders(created);
    }

    /// Removes the item and every reminder referencing its id.
    ///
    /// Reminders are swept even when no item has `id`.
    pub fn delete_item(&mut self, id: ItemId) {
        let items_before = self.state.items.len();
        self.state.items.retain(|item| item.id != id);
        let item_removed = self.state.items.len() != items_before;

        let reminders_before = self.state.reminders.len();
        self.state.reminders.retain(|reminder| reminder.item_id != id);
        let reminders_removed = self.state.reminders.len() != reminders_before;

        if !item_removed && !reminders_removed {
            return;
        }
        self.persist();
        if item_removed {
            self.notify(StoreEvent::ItemsChanged);
        }
        if reminders_removed {
            self.notify(StoreEvent::RemindersChanged);
        }
    }

    /// Records one use of the item and re-checks its reminders.
    pub fn increment_usage(&mut self, id: ItemId) {
        let Some(index) = self.item_index(id) else {
            return;
        };
        let item = &mut self.state.items[index];
        item.usage_count = item.usage_count.saturating_add(1);

        let created = self.rule_reminders(&self.state.items[index]);
        self.commit(StoreEvent::ItemsChanged);
        self.add_rule_reminders(created);
    }

    pub fn add_reminder(&mut self, reminder: Reminder) {
        self.state.reminders.push(reminder);
        self.commit(StoreEvent::RemindersChanged);
    }

    pub fn update_reminder(&mut self, reminder: Reminder) {
        let Some(index) = self.reminder_index(reminder.id) else {
            return;
        };
        self.state.reminders[index] = reminder;
        self.commit(StoreEvent::RemindersChanged);
    }

    pub fn delete_reminder(&mut self, id: ReminderId) {
        let before = self.state.reminders.len();
        self.state.reminders.retain(|reminder| reminder.id != id);
        if self.state.reminders.len() != before {
            self.commit(StoreEvent::RemindersChanged);
        }
    }

    /// Marks the reminder done.
    ///
    /// Completing a cleaning reminder also stamps the item's last-cleaned
    /// date and resets its usage count, when the item still exists.
    pub fn complete_reminder(&mut self, id: ReminderId) {
        let Some(index) = self.reminder_index(id) else {
            return;
        };
        let reminder = &mut self.state.reminders[index];
        reminder.is_completed = true;
        let (kind, item_id) = (reminder.kind, reminder.item_id);

        let mut item_touched = false;
        if kind == ReminderType::Cleaning {
            if let Some(item_index) = self.item_index(item_id) {
                let item = &mut self.state.items[item_index];
                item.last_cleaned = Some(self.clock.now());
                item.usage_count = 0;
                item_touched = true;
            }
        }

        self.persist();
        self.notify(StoreEvent::RemindersChanged);
        if item_touched {
            self.notify(StoreEvent::ItemsChanged);
        }
    }

    pub fn add_packing_list(&mut self, list: PackingList) {
        self.state.packing_lists.push(list);
        self.commit(StoreEvent::PackingListsChanged);
    }

    pub fn update_packing_list(&mut self, list: PackingList) {
        let Some(index) = self.packing_list_index(list.id) else {
            return;
        };
        self.state.packing_lists[index] = list;
        self.commit(StoreEvent::PackingListsChanged);
    }

    pub fn delete_packing_list(&mut self, id: PackingListId) {
        let before = self.state.packing_lists.len();
        self.state.packing_lists.retain(|list| list.id != id);
        if self.state.packing_lists.len() != before {
            self.commit(StoreEvent::PackingListsChanged);
        }
    }

    /// Flips whether `item_id` is checked off in the list.
    pub fn toggle_item_in_packing_list(&mut self, list_id: PackingListId, item_id: ItemId) {
        let Some(index) = self.packing_list_index(list_id) else {
            return;
        };
        self.state.packing_lists[index].toggle_checked(item_id);
        self.commit(StoreEvent::PackingListsChanged);
    }

    fn rule_reminders(&self, item: &Item) -> Vec<Reminder> {
        reminder_rules::evaluate(item, &self.state.reminders, self.clock.now())
    }

    fn add_rule_reminders(&mut self, created: Vec<Reminder>) {
        if created.is_empty() {
            return;
        }
        for reminder in &created {
            info!(
                "event=reminder_created module=store status=ok type={} item_id={} reminder_id={}",
                reminder.kind.as_str(),
                reminder.item_id,
                reminder.id
            );
        }
        self.state.reminders.extend(created);
        self.commit(StoreEvent::RemindersChanged);
    }

    fn commit(&mut self, event: StoreEvent) {
        self.persist();
        self.notify(event);
    }

    fn persist(&mut self) {
        let report = self.snapshots.save_all(&self.state);
        if !report.is_ok() {
            warn!(
                "event=store_persist module=store status=partial failed_slots={}",
                report.failed_slots.join(",")
            );
        }
    }

    fn notify(&mut self, event: StoreEvent) {
        for (_, observer) in &mut self.observers {
            observer(&event, &self.state);
        }
    }

    fn item_index(&self, id: ItemId) -> Option<usize> {
        self.state.items.iter().position(|item| item.id == id)
    }

    fn reminder_index(&self, id: ReminderId) -> Option<usize> {
        self.state.reminders.iter().position(|reminder| reminder.id == id)
    }

    fn packing_list_index(&self, id: PackingListId) -> Option<usize> {
        self.state.packing_lists.iter().position(|list| list.id == id)
    }
}
