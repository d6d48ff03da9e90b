//! Maintenance reminder model.
//!
//! # Invariants
//! - `item_id` is a reference, not ownership. The referenced item may be gone.
//! - A reminder is "incomplete" while `is_completed` is `false`.

use crate::model::item::ItemId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a reminder.
pub type ReminderId = Uuid;

/// Maintenance action a reminder asks for.
///
/// Serialized with the interchange literals `"Clean"`, `"Replace"` and
/// `"Inspect"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderType {
    #[serde(rename = "Clean")]
    Cleaning,
    #[serde(rename = "Replace")]
    Replacement,
    #[serde(rename = "Inspect")]
    Inspection,
}

impl ReminderType {
    pub const ALL: [ReminderType; 3] = [
        ReminderType::Cleaning,
        ReminderType::Replacement,
        ReminderType::Inspection,
    ];

    /// Returns the interchange literal for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cleaning => "Clean",
            Self::Replacement => "Replace",
            Self::Inspection => "Inspect",
        }
    }

    /// Parses an interchange literal, ignoring ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
    }
}

/// Maintenance reminder attached to one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: ReminderId,
    pub item_id: ItemId,
    /// Serialized as `type` to match the persisted schema.
    #[serde(rename = "type")]
    pub kind: ReminderType,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Reminder {
    /// Creates an incomplete reminder with a generated id.
    pub fn new(item_id: ItemId, kind: ReminderType, due_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            kind,
            due_date,
            is_completed: false,
        }
    }

    /// Returns whether this reminder still needs attention.
    pub fn is_pending(&self) -> bool {
        !self.is_completed
    }

    /// Returns whether this is an incomplete reminder of `kind` for `item_id`.
    pub fn is_pending_for(&self, item_id: ItemId, kind: ReminderType) -> bool {
        self.is_pending() && self.item_id == item_id && self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::{Reminder, ReminderType};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn type_serializes_with_interchange_literals() {
        let reminder = Reminder::new(Uuid::new_v4(), ReminderType::Cleaning, Utc::now());
        let value = serde_json::to_value(&reminder).unwrap();
        assert_eq!(value["type"], "Clean");
        assert_eq!(value["isCompleted"], false);
        assert!(value.get("itemId").is_some());
        assert!(value.get("dueDate").is_some());

        assert_eq!(
            serde_json::to_value(ReminderType::Replacement).unwrap(),
            "Replace"
        );
        assert_eq!(
            serde_json::to_value(ReminderType::Inspection).unwrap(),
            "Inspect"
        );
    }

    #[test]
    fn is_pending_for_requires_matching_item_kind_and_open_state() {
        let item_id = Uuid::new_v4();
        let mut reminder = Reminder::new(item_id, ReminderType::Replacement, Utc::now());
        assert!(reminder.is_pending_for(item_id, ReminderType::Replacement));
        assert!(!reminder.is_pending_for(item_id, ReminderType::Cleaning));
        assert!(!reminder.is_pending_for(Uuid::new_v4(), ReminderType::Replacement));

        reminder.is_completed = true;
        assert!(!reminder.is_pending_for(item_id, ReminderType::Replacement));
    }

    #[test]
    fn parse_round_trips_labels() {
        for kind in ReminderType::ALL {
            assert_eq!(ReminderType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ReminderType::parse("clean"), Some(ReminderType::Cleaning));
        assert_eq!(ReminderType::parse("wash"), None);
    }
}
