//! Maintenance reminder rules.
//!
//! Evaluated for one item right after it is created, updated or used.
//!
//! # Invariants
//! - Cleaning and replacement checks are independent.
//! - A rule never fires while an incomplete reminder of its type already
//!   references the item.

use crate::model::item::Item;
use crate::model::reminder::{Reminder, ReminderType};
use chrono::{DateTime, Utc};

/// Usage count at which gear should be cleaned.
pub const CLEANING_USAGE_THRESHOLD: u32 = 7;
/// Condition below which gear should be replaced.
pub const REPLACEMENT_CONDITION_THRESHOLD: f64 = 0.3;

pub fn needs_cleaning(item: &Item) -> bool {
    item.usage_count >= CLEANING_USAGE_THRESHOLD
}

pub fn needs_replacement(item: &Item) -> bool {
    item.condition < REPLACEMENT_CONDITION_THRESHOLD
}

/// Returns the reminders to add for `item`, each due at `now`.
pub fn evaluate(item: &Item, existing: &[Reminder], now: DateTime<Utc>) -> Vec<Reminder> {
    let checks = [
        (ReminderType::Cleaning, needs_cleaning(item)),
        (ReminderType::Replacement, needs_replacement(item)),
    ];

    checks
        .into_iter()
        .filter(|(kind, triggered)| {
            *triggered
                && !existing
                    .iter()
                    .any(|reminder| reminder.is_pending_for(item.id, *kind))
        })
        .map(|(kind, _)| Reminder::new(item.id, kind, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{evaluate, CLEANING_USAGE_THRESHOLD};
    use crate::model::item::{Item, ItemCategory};
    use crate::model::reminder::{Reminder, ReminderType};
    use chrono::Utc;

    fn worn_and_used() -> Item {
        let mut item = Item::new("Boots", ItemCategory::Footwear).with_condition(0.1);
        item.usage_count = CLEANING_USAGE_THRESHOLD;
        item
    }

    #[test]
    fn fresh_item_triggers_nothing() {
        let item = Item::new("Boots", ItemCategory::Footwear);
        assert!(evaluate(&item, &[], Utc::now()).is_empty());
    }

    #[test]
    fn both_rules_fire_independently() {
        let now = Utc::now();
        let item = worn_and_used();
        let created = evaluate(&item, &[], now);

        let kinds: Vec<ReminderType> = created.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ReminderType::Cleaning, ReminderType::Replacement]);
        assert!(created.iter().all(|r| r.item_id == item.id && r.due_date == now));
        assert!(created.iter().all(Reminder::is_pending));
    }

    #[test]
    fn condition_exactly_at_threshold_is_not_replaced() {
        let item = Item::new("Helmet", ItemCategory::Equipment).with_condition(0.3);
        assert!(evaluate(&item, &[], Utc::now()).is_empty());
    }

    #[test]
    fn incomplete_reminder_blocks_only_its_own_type() {
        let item = worn_and_used();
        let existing = vec![Reminder::new(item.id, ReminderType::Cleaning, Utc::now())];

        let created = evaluate(&item, &existing, Utc::now());
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].kind, ReminderType::Replacement);
    }

    #[test]
    fn completed_reminder_does_not_block() {
        let item = worn_and_used();
        let mut done = Reminder::new(item.id, ReminderType::Replacement, Utc::now());
        done.is_completed = true;

        let created = evaluate(&item, &[done], Utc::now());
        assert_eq!(created.len(), 2);
    }

    #[test]
    fn reminder_for_other_item_does_not_block() {
        let item = worn_and_used();
        let other = Item::new("Poles", ItemCategory::Equipment);
        let existing = vec![Reminder::new(other.id, ReminderType::Cleaning, Utc::now())];

        assert_eq!(evaluate(&item, &existing, Utc::now()).len(), 2);
    }
}
