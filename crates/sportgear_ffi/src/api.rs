//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose gear store use-cases to Dart via FRB.
//! - Translate core records into flat, string-keyed response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens the store, runs one use-case and closes it again; no
//!   store handle outlives a call.
//! - Dates cross the boundary as epoch milliseconds.

use chrono::{DateTime, Utc};
use sportgear_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, normalize_condition,
    open_sqlite_store, ping as ping_inner, CoreConfig, GearStore, Item, ItemCategory,
    ItemListQuery, PackingList, Reminder, SqliteKeyValueStore,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

static GEAR_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path for rolling logs.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Item row returned to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct GearItemView {
    pub item_id: String,
    pub name: String,
    /// Interchange literal (`Footwear`, `Clothing`, ...).
    pub category: String,
    pub brand: Option<String>,
    pub purchase_epoch_ms: i64,
    pub has_image: bool,
    pub condition: f64,
    pub last_cleaned_epoch_ms: Option<i64>,
    pub usage_count: u32,
    pub notes: String,
}

/// Reminder row returned to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GearReminderView {
    pub reminder_id: String,
    pub item_id: String,
    /// Name of the referenced item.
    pub item_name: String,
    /// Interchange literal (`Clean`, `Replace`, `Inspect`).
    pub kind: String,
    pub due_epoch_ms: i64,
}

/// Packing list content with check state.
#[derive(Debug, Clone, PartialEq)]
pub struct PackingListView {
    pub list_id: String,
    pub name: String,
    pub sport_type: String,
    pub items: Vec<GearItemView>,
    pub checked_item_ids: Vec<String>,
    pub checked_count: u32,
    pub total_count: u32,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GearActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the created or targeted record.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl GearActionResponse {
    fn success(message: impl Into<String>, id: impl ToString) -> Self {
        Self {
            ok: true,
            id: Some(id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Item list response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsListResponse {
    pub items: Vec<GearItemView>,
    pub message: String,
}

/// Pending reminder response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemindersListResponse {
    pub items: Vec<GearReminderView>,
    pub message: String,
}

/// Packing list lookup response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct PackingListResponse {
    pub list: Option<PackingListView>,
    pub message: String,
}

/// Adds an item from the edit form.
///
/// Blank `brand` is stored as absent. `condition` is clamped to `[0, 1]`.
#[flutter_rust_bridge::frb(sync)]
pub fn item_add(
    name: String,
    category: String,
    brand: Option<String>,
    condition: f64,
    notes: String,
) -> GearActionResponse {
    let Some(category) = ItemCategory::parse(&category) else {
        return GearActionResponse::failure(format!("item_add failed: unknown category `{category}`"));
    };
    let name = name.trim().to_string();
    if name.is_empty() {
        return GearActionResponse::failure("item_add failed: name cannot be empty");
    }

    let mut item = Item::new(name, category).with_condition(normalize_condition(condition));
    item.set_brand(brand);
    item.notes = notes;
    let item_id = item.id;
    match with_store(|store| store.add_item(item)) {
        Ok(()) => GearActionResponse::success("Item added.", item_id),
        Err(err) => GearActionResponse::failure(format!("item_add failed: {err}")),
    }
}

/// Adds an item from the quick-add preset table.
#[flutter_rust_bridge::frb(sync)]
pub fn item_add_preset(index: u32) -> GearActionResponse {
    let Some(item) = usize::try_from(index).ok().and_then(Item::from_preset) else {
        return GearActionResponse::failure(format!("item_add_preset failed: no preset {index}"));
    };
    let item_id = item.id;
    match with_store(|store| store.add_item(item)) {
        Ok(()) => GearActionResponse::success("Item added.", item_id),
        Err(err) => GearActionResponse::failure(format!("item_add_preset failed: {err}")),
    }
}

/// Sets an item's condition; may create a replacement reminder.
#[flutter_rust_bridge::frb(sync)]
pub fn item_update_condition(item_id: String, condition: f64) -> GearActionResponse {
    let item_id = match parse_id(&item_id) {
        Ok(id) => id,
        Err(err) => return GearActionResponse::failure(format!("item_update_condition failed: {err}")),
    };
    let result = with_store(|store| {
        let mut item = store.item(item_id).cloned()?;
        item.condition = normalize_condition(condition);
        store.update_item(item);
        Some(())
    });
    action_response("item_update_condition", "Condition updated.", item_id, result)
}

/// Records one use of an item; may create a cleaning reminder.
#[flutter_rust_bridge::frb(sync)]
pub fn item_increment_usage(item_id: String) -> GearActionResponse {
    let item_id = match parse_id(&item_id) {
        Ok(id) => id,
        Err(err) => return GearActionResponse::failure(format!("item_increment_usage failed: {err}")),
    };
    let result = with_store(|store| {
        store.item(item_id)?;
        store.increment_usage(item_id);
        Some(())
    });
    action_response("item_increment_usage", "Usage recorded.", item_id, result)
}

/// Deletes an item and its reminders.
#[flutter_rust_bridge::frb(sync)]
pub fn item_delete(item_id: String) -> GearActionResponse {
    let item_id = match parse_id(&item_id) {
        Ok(id) => id,
        Err(err) => return GearActionResponse::failure(format!("item_delete failed: {err}")),
    };
    let result = with_store(|store| {
        store.item(item_id)?;
        store.delete_item(item_id);
        Some(())
    });
    action_response("item_delete", "Item deleted.", item_id, result)
}

/// Lists items with optional category and search filters.
#[flutter_rust_bridge::frb(sync)]
pub fn items_list(category: Option<String>, search_text: Option<String>) -> ItemsListResponse {
    let category = match category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        None => None,
        Some(raw) => match ItemCategory::parse(raw) {
            Some(category) => Some(category),
            None => {
                return ItemsListResponse {
                    items: Vec::new(),
                    message: format!("items_list failed: unknown category `{raw}`"),
                }
            }
        },
    };
    let query = ItemListQuery {
        category,
        search_text,
    };

    match with_store(|store| {
        store
            .list_items(&query)
            .into_iter()
            .map(to_item_view)
            .collect::<Vec<_>>()
    }) {
        Ok(items) => {
            let message = count_message(items.len());
            ItemsListResponse { items, message }
        }
        Err(err) => ItemsListResponse {
            items: Vec::new(),
            message: format!("items_list failed: {err}"),
        },
    }
}

/// Lists pending reminders, earliest due first.
///
/// Reminders whose item no longer exists are skipped.
#[flutter_rust_bridge::frb(sync)]
pub fn reminders_pending() -> RemindersListResponse {
    match with_store(|store| {
        let store = &*store;
        store
            .pending_reminders()
            .into_iter()
            .filter_map(|reminder| {
                store
                    .item_for_reminder(reminder)
                    .map(|item| to_reminder_view(reminder, item))
            })
            .collect::<Vec<_>>()
    }) {
        Ok(items) => {
            let message = count_message(items.len());
            RemindersListResponse { items, message }
        }
        Err(err) => RemindersListResponse {
            items: Vec::new(),
            message: format!("reminders_pending failed: {err}"),
        },
    }
}

/// Completes a reminder; cleaning also resets the item's usage.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_complete(reminder_id: String) -> GearActionResponse {
    let reminder_id = match parse_id(&reminder_id) {
        Ok(id) => id,
        Err(err) => return GearActionResponse::failure(format!("reminder_complete failed: {err}")),
    };
    let result = with_store(|store| {
        store.reminder(reminder_id)?;
        store.complete_reminder(reminder_id);
        Some(())
    });
    action_response("reminder_complete", "Reminder completed.", reminder_id, result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn reminder_delete(reminder_id: String) -> GearActionResponse {
    let reminder_id = match parse_id(&reminder_id) {
        Ok(id) => id,
        Err(err) => return GearActionResponse::failure(format!("reminder_delete failed: {err}")),
    };
    let result = with_store(|store| {
        store.reminder(reminder_id)?;
        store.delete_reminder(reminder_id);
        Some(())
    });
    action_response("reminder_delete", "Reminder deleted.", reminder_id, result)
}

/// Creates a packing list referencing `item_ids` in the given order.
#[flutter_rust_bridge::frb(sync)]
pub fn packing_list_create(
    name: String,
    sport_type: String,
    item_ids: Vec<String>,
) -> GearActionResponse {
    let item_ids = match item_ids
        .iter()
        .map(|raw| parse_id(raw))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(ids) => ids,
        Err(err) => return GearActionResponse::failure(format!("packing_list_create failed: {err}")),
    };
    let list = PackingList::new(name.trim(), sport_type.trim()).with_items(item_ids);
    let list_id = list.id;
    match with_store(|store| store.add_packing_list(list)) {
        Ok(()) => GearActionResponse::success("Packing list created.", list_id),
        Err(err) => GearActionResponse::failure(format!("packing_list_create failed: {err}")),
    }
}

/// Flips the checked state of one item in a packing list.
#[flutter_rust_bridge::frb(sync)]
pub fn packing_list_toggle(list_id: String, item_id: String) -> GearActionResponse {
    let (list_id, item_id) = match (parse_id(&list_id), parse_id(&item_id)) {
        (Ok(list_id), Ok(item_id)) => (list_id, item_id),
        (Err(err), _) | (_, Err(err)) => {
            return GearActionResponse::failure(format!("packing_list_toggle failed: {err}"))
        }
    };
    let result = with_store(|store| {
        store.packing_list(list_id)?;
        store.toggle_item_in_packing_list(list_id, item_id);
        Some(())
    });
    action_response("packing_list_toggle", "Packing list updated.", list_id, result)
}

/// Resolves a packing list with its items and check state.
#[flutter_rust_bridge::frb(sync)]
pub fn packing_list_items(list_id: String) -> PackingListResponse {
    let list_id = match parse_id(&list_id) {
        Ok(id) => id,
        Err(err) => {
            return PackingListResponse {
                list: None,
                message: format!("packing_list_items failed: {err}"),
            }
        }
    };
    match with_store(|store| {
        let store = &*store;
        store
            .packing_list(list_id)
            .map(|list| to_packing_list_view(store, list))
    }) {
        Ok(Some(view)) => PackingListResponse {
            message: format!("{}/{} packed.", view.checked_count, view.total_count),
            list: Some(view),
        },
        Ok(None) => PackingListResponse {
            list: None,
            message: format!("packing list not found: {list_id}"),
        },
        Err(err) => PackingListResponse {
            list: None,
            message: format!("packing_list_items failed: {err}"),
        },
    }
}

fn resolve_gear_db_path() -> PathBuf {
    GEAR_DB_PATH
        .get_or_init(|| CoreConfig::from_env().db_path)
        .clone()
}

fn with_store<T>(
    f: impl FnOnce(&mut GearStore<SqliteKeyValueStore>) -> T,
) -> Result<T, String> {
    let db_path = resolve_gear_db_path();
    let mut store =
        open_sqlite_store(&db_path).map_err(|err| format!("gear DB open failed: {err}"))?;
    let output = f(&mut store);
    if let Err(err) = store.close().close() {
        log::warn!("event=db_close module=ffi status=error error={err}");
    }
    Ok(output)
}

fn action_response(
    operation: &str,
    message: &str,
    id: Uuid,
    result: Result<Option<()>, String>,
) -> GearActionResponse {
    match result {
        Ok(Some(())) => GearActionResponse::success(message, id),
        Ok(None) => GearActionResponse::failure(format!("{operation} failed: not found: {id}")),
        Err(err) => GearActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid id `{raw}`"))
}

fn count_message(count: usize) -> String {
    if count == 0 {
        "No results.".to_string()
    } else {
        format!("Found {count} result(s).")
    }
}

fn epoch_ms(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

fn to_item_view(item: &Item) -> GearItemView {
    GearItemView {
        item_id: item.id.to_string(),
        name: item.name.clone(),
        category: item.category.as_str().to_string(),
        brand: item.brand.clone(),
        purchase_epoch_ms: epoch_ms(item.purchase_date),
        has_image: item.image_data.is_some(),
        condition: item.condition,
        last_cleaned_epoch_ms: item.last_cleaned.map(epoch_ms),
        usage_count: item.usage_count,
        notes: item.notes.clone(),
    }
}

fn to_reminder_view(reminder: &Reminder, item: &Item) -> GearReminderView {
    GearReminderView {
        reminder_id: reminder.id.to_string(),
        item_id: reminder.item_id.to_string(),
        item_name: item.name.clone(),
        kind: reminder.kind.as_str().to_string(),
        due_epoch_ms: epoch_ms(reminder.due_date),
    }
}

fn to_packing_list_view(
    store: &GearStore<SqliteKeyValueStore>,
    list: &PackingList,
) -> PackingListView {
    let progress = list.progress();
    PackingListView {
        list_id: list.id.to_string(),
        name: list.name.clone(),
        sport_type: list.sport_type.clone(),
        items: store
            .packing_list_items(list)
            .into_iter()
            .map(to_item_view)
            .collect(),
        checked_item_ids: list.checked_items.iter().map(Uuid::to_string).collect(),
        checked_count: u32::try_from(progress.checked).unwrap_or(u32::MAX),
        total_count: u32::try_from(progress.total).unwrap_or(u32::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, item_add, item_add_preset, item_delete,
        item_increment_usage, item_update_condition, items_list, packing_list_create,
        packing_list_items, packing_list_toggle, ping, reminder_complete, reminders_pending,
    };
    use std::sync::{Mutex, MutexGuard};
    use std::time::{SystemTime, UNIX_EPOCH};

    // Every call rewrites whole slots, so tests sharing the DB file must not
    // interleave their open/save cycles.
    static DB_LOCK: Mutex<()> = Mutex::new(());

    fn db_guard() -> MutexGuard<'static, ()> {
        DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn item_add_rejects_unknown_category_and_blank_name() {
        let _guard = db_guard();
        let bad_category = item_add(
            "Skates".to_string(),
            "Vehicles".to_string(),
            None,
            1.0,
            String::new(),
        );
        assert!(!bad_category.ok);
        assert!(bad_category.message.contains("unknown category"));

        let blank = item_add("  ".to_string(), "Other".to_string(), None, 1.0, String::new());
        assert!(!blank.ok);
    }

    #[test]
    fn added_item_is_listed_by_search_text() {
        let _guard = db_guard();
        let token = unique_token("ffi-item");
        let created = item_add(
            format!("Shoes {token}"),
            "footwear".to_string(),
            Some("  ".to_string()),
            1.0,
            "first pair".to_string(),
        );
        assert!(created.ok, "{}", created.message);
        let item_id = created.id.clone().expect("item_add should return id");

        let listed = items_list(Some("Footwear".to_string()), Some(token.clone()));
        assert_eq!(listed.items.len(), 1, "{}", listed.message);
        assert_eq!(listed.items[0].item_id, item_id);
        assert_eq!(listed.items[0].brand, None);
        assert_eq!(listed.items[0].category, "Footwear");

        let other_category = items_list(Some("Clothing".to_string()), Some(token));
        assert!(other_category.items.is_empty());
    }

    #[test]
    fn seventh_use_surfaces_cleaning_reminder_until_completed() {
        let _guard = db_guard();
        let token = unique_token("ffi-usage");
        let created = item_add(token.clone(), "Equipment".to_string(), None, 1.0, String::new());
        let item_id = created.id.expect("item_add should return id");

        for _ in 0..7 {
            let used = item_increment_usage(item_id.clone());
            assert!(used.ok, "{}", used.message);
        }

        let pending = reminders_pending();
        let reminder = pending
            .items
            .iter()
            .find(|reminder| reminder.item_id == item_id)
            .expect("cleaning reminder should be pending")
            .clone();
        assert_eq!(reminder.kind, "Clean");
        assert_eq!(reminder.item_name, token);

        let completed = reminder_complete(reminder.reminder_id.clone());
        assert!(completed.ok, "{}", completed.message);
        assert!(!reminders_pending()
            .items
            .iter()
            .any(|pending| pending.reminder_id == reminder.reminder_id));

        let listed = items_list(None, Some(token));
        assert_eq!(listed.items[0].usage_count, 0);
        assert!(listed.items[0].last_cleaned_epoch_ms.is_some());
    }

    #[test]
    fn worn_condition_surfaces_replacement_reminder() {
        let _guard = db_guard();
        let token = unique_token("ffi-worn");
        let created = item_add(token, "Clothing".to_string(), None, 0.9, String::new());
        let item_id = created.id.expect("item_add should return id");

        let updated = item_update_condition(item_id.clone(), 0.1);
        assert!(updated.ok, "{}", updated.message);

        let pending = reminders_pending();
        assert!(pending
            .items
            .iter()
            .any(|reminder| reminder.item_id == item_id && reminder.kind == "Replace"));

        let deleted = item_delete(item_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(!reminders_pending()
            .items
            .iter()
            .any(|reminder| reminder.item_id == item_id));
    }

    #[test]
    fn packing_list_toggle_updates_progress() {
        let _guard = db_guard();
        let item = item_add_preset(0);
        assert!(item.ok, "{}", item.message);
        let item_id = item.id.expect("preset add should return id");

        let list = packing_list_create(
            unique_token("ffi-list"),
            "Running".to_string(),
            vec![item_id.clone()],
        );
        assert!(list.ok, "{}", list.message);
        let list_id = list.id.expect("list create should return id");

        let toggled = packing_list_toggle(list_id.clone(), item_id.clone());
        assert!(toggled.ok, "{}", toggled.message);

        let view = packing_list_items(list_id)
            .list
            .expect("packing list should resolve");
        assert_eq!(view.checked_item_ids, vec![item_id]);
        assert_eq!((view.checked_count, view.total_count), (1, 1));
        assert_eq!(view.items.len(), 1);
    }

    #[test]
    fn unknown_ids_report_not_found() {
        let _guard = db_guard();
        let missing = uuid::Uuid::new_v4().to_string();
        let response = item_increment_usage(missing.clone());
        assert!(!response.ok);
        assert!(response.message.contains("not found"));

        let malformed = reminder_complete("not-a-uuid".to_string());
        assert!(!malformed.ok);
        assert!(malformed.message.contains("invalid id"));

        assert!(packing_list_items(missing).list.is_none());
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
