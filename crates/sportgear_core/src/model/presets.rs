//! Quick-add gear presets offered by the item editor.

use crate::model::item::{Item, ItemCategory};

const DEFAULT_PRESETS: &[(&str, ItemCategory)] = &[
    ("Sneakers", ItemCategory::Footwear),
    ("T-shirt", ItemCategory::Clothing),
    ("Shorts", ItemCategory::Clothing),
    ("Trousers", ItemCategory::Clothing),
    ("Jacket", ItemCategory::Clothing),
    ("Backpack", ItemCategory::Accessories),
    ("Bottle", ItemCategory::Accessories),
    ("Dumbbells", ItemCategory::Equipment),
    ("Mat", ItemCategory::Equipment),
];

/// Returns the built-in `(name, category)` presets in display order.
pub fn default_presets() -> &'static [(&'static str, ItemCategory)] {
    DEFAULT_PRESETS
}

impl Item {
    /// Creates a fresh item from the preset at `index`, if it exists.
    pub fn from_preset(index: usize) -> Option<Self> {
        DEFAULT_PRESETS
            .get(index)
            .map(|(name, category)| Item::new(*name, *category))
    }
}
