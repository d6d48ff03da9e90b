//! Domain model for gear items, maintenance reminders and packing lists.
//!
//! # Responsibility
//! - Define the value records owned by the gear store.
//! - Keep the persisted JSON shape (camelCase keys, interchange enum
//!   strings) next to the types that produce it.
//!
//! # Invariants
//! - Every record is identified by a stable UUID v4.
//! - Reminders and packing lists reference items by id only; they never own
//!   item data.

pub mod item;
pub mod packing_list;
pub mod presets;
pub mod reminder;
