//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory collections and their mutation use-cases.
//! - Derive maintenance reminders and read projections for the UI layer.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod gear_store;
pub mod projections;
pub mod reminder_rules;
