//! Packing list model.
//!
//! # Invariants
//! - `items` keeps insertion order and may contain duplicates.
//! - `checked_items` is a set; it is meant to be a subset of `items` but
//!   stale references are tolerated (item deletion does not clean lists).

use crate::model::item::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Stable identifier of a packing list.
pub type PackingListId = Uuid;

/// Named checklist of gear for one sport or trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingList {
    pub id: PackingListId,
    pub name: String,
    pub sport_type: String,
    pub items: Vec<ItemId>,
    /// Held as a set, persisted as a plain JSON array.
    pub checked_items: BTreeSet<ItemId>,
}

/// Checked/total counts shown on a packing list overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackingProgress {
    pub checked: usize,
    pub total: usize,
}

impl PackingProgress {
    /// Fraction of packed gear in `[0.0, 1.0]`; an empty list reports `0.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.checked as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.checked >= self.total
    }
}

impl PackingList {
    /// Creates an empty list with a generated id.
    pub fn new(name: impl Into<String>, sport_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sport_type: sport_type.into(),
            items: Vec::new(),
            checked_items: BTreeSet::new(),
        }
    }

    /// Builder-style item reference setter. Order is kept as given.
    pub fn with_items(mut self, items: impl IntoIterator<Item = ItemId>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    /// Flips the checked state of `item_id`.
    pub fn toggle_checked(&mut self, item_id: ItemId) {
        if !self.checked_items.remove(&item_id) {
            self.checked_items.insert(item_id);
        }
    }

    pub fn is_checked(&self, item_id: ItemId) -> bool {
        self.checked_items.contains(&item_id)
    }

    /// Progress over the distinct referenced items.
    ///
    /// Only checked references that are still listed in `items` count as
    /// checked.
    pub fn progress(&self) -> PackingProgress {
        let listed: BTreeSet<ItemId> = self.items.iter().copied().collect();
        PackingProgress {
            checked: self
                .checked_items
                .iter()
                .filter(|id| listed.contains(id))
                .count(),
            total: listed.len(),
        }
    }
}
