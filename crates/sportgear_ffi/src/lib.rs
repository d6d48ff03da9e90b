//! Flutter bridge for the SportGear core.

pub mod api;
