//! POD Spy Core - research data engine for print-on-demand sellers
//!
//! Generates synthetic marketplace data (products, keywords, competitor shops,
//! niche trends), filters and sorts it for the dashboard views, persists it in a
//! SQLite key-value store and renders CSV / JSON exports.
//!
//! Types are exported via UniFFI proc-macros (#[derive(uniffi::Record/Enum)]).

pub mod database;
pub mod export;
pub mod generator;
pub mod insights;
pub mod interface;
pub mod models;
pub mod query;
mod store;
pub mod vocabulary;

pub use generator::MockDataGenerator;
pub use interface::*;
pub use query::{Query, Queryable, SortKey};
pub use store::{ResearchStore, SeedCounts, StorageKey};

uniffi::setup_scaffolding!("podspy");
