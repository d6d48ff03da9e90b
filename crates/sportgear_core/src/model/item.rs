//! Gear item model.
//!
//! # Responsibility
//! - Define the canonical inventory record and its category.
//! - Serialize the optional image payload as standard base64.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `condition` is a wear metric in `[0.0, 1.0]`, `1.0` meaning new.
//! - `brand` is `None` rather than an empty string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a gear item.
pub type ItemId = Uuid;

/// Gear category. Serialized with the interchange literals
/// (`"Footwear"`, `"Clothing"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Footwear,
    Clothing,
    Equipment,
    Accessories,
    Other,
}

impl ItemCategory {
    /// All categories in display order.
    pub const ALL: [ItemCategory; 5] = [
        ItemCategory::Footwear,
        ItemCategory::Clothing,
        ItemCategory::Equipment,
        ItemCategory::Accessories,
        ItemCategory::Other,
    ];

    /// Returns the interchange literal for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Footwear => "Footwear",
            Self::Clothing => "Clothing",
            Self::Equipment => "Equipment",
            Self::Accessories => "Accessories",
            Self::Other => "Other",
        }
    }

    /// Parses an interchange literal. Matching is case-insensitive so UI
    /// callers may pass lowercase labels.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
    }
}

/// One piece of sporting gear tracked by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    #[serde(default)]
    pub brand: Option<String>,
    pub purchase_date: DateTime<Utc>,
    /// Raw image bytes, base64 on the wire.
    #[serde(default, with = "image_base64")]
    pub image_data: Option<Vec<u8>>,
    pub condition: f64,
    #[serde(default)]
    pub last_cleaned: Option<DateTime<Utc>>,
    pub usage_count: u32,
    pub notes: String,
}

impl Item {
    /// Creates a new item with a generated id, purchased now, in new
    /// condition and never used.
    pub fn new(name: impl Into<String>, category: ItemCategory) -> Self {
        Self::with_id(Uuid::new_v4(), name, category)
    }

    /// Creates a new item with a caller-provided id.
    ///
    /// Used by import paths where identity already exists.
    pub fn with_id(id: ItemId, name: impl Into<String>, category: ItemCategory) -> Self {
        Self::with_id_at(id, name, category, Utc::now())
    }

    /// Creates an item with an explicit purchase date, usually taken from
    /// the store clock.
    pub fn new_at(
        name: impl Into<String>,
        category: ItemCategory,
        purchase_date: DateTime<Utc>,
    ) -> Self {
        Self::with_id_at(Uuid::new_v4(), name, category, purchase_date)
    }

    fn with_id_at(
        id: ItemId,
        name: impl Into<String>,
        category: ItemCategory,
        purchase_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            brand: None,
            purchase_date,
            image_data: None,
            condition: 1.0,
            last_cleaned: None,
            usage_count: 0,
            notes: String::new(),
        }
    }

    /// Sets the brand, storing blank input as `None`.
    pub fn set_brand(&mut self, brand: Option<String>) {
        self.brand = brand
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
    }

    /// Builder-style variant of [`Item::set_brand`].
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.set_brand(Some(brand.into()));
        self
    }

    /// Builder-style condition setter.
    pub fn with_condition(mut self, condition: f64) -> Self {
        self.condition = condition;
        self
    }

    /// Returns whether `needle` occurs in the name or brand, ignoring case.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .brand
                .as_deref()
                .is_some_and(|brand| brand.to_lowercase().contains(needle))
    }
}

/// Maps any input onto a storable condition: NaN becomes `1.0`, everything
/// else is clamped to `[0.0, 1.0]`.
/// Non-finite values have no JSON encoding.
pub fn normalize_condition(condition: f64) -> f64 {
    if condition.is_nan() {
        1.0
    } else {
        condition.clamp(0.0, 1.0)
    }
}

mod image_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| {
                STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}
