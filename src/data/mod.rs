//! Loot content and its lookup registry
//!
//! Content is loaded from external RON files so tables and affixes can be
//! tuned without rebuilding, with built-in starter content as the fallback.

pub mod content;
pub mod defaults;
pub mod loader;
pub mod registry;
pub mod validation;

pub use content::{LootContent, ThreatSettings};
pub use defaults::{starter_content, starter_registry};
pub use loader::{export_default_data, read_ron, DataManager};
pub use registry::{normalize_id, Catalog, Keyed, LootRegistry};
pub use validation::{validate, Severity, ValidationIssue};
