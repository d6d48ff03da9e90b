//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `sportgear_core` linkage without the Flutter/FFI runtime.
//! - Print a deterministic summary of a preset-seeded in-memory store.

use sportgear_core::{default_presets, open_memory_store, Item};

fn main() {
    println!("sportgear_core ping={}", sportgear_core::ping());
    println!("sportgear_core version={}", sportgear_core::core_version());

    let mut store = open_memory_store();
    for item in (0..default_presets().len()).filter_map(Item::from_preset) {
        store.add_item(item);
    }
    println!(
        "sportgear_core items={} reminders={} packing_lists={}",
        store.items().len(),
        store.reminders().len(),
        store.packing_lists().len()
    );
}
