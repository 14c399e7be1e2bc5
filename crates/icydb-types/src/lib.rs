//! Thin crate that re-exports the runtime types from `icydb-core`.
//!
//! This keeps the workspace layout consistent with other top-level crates.

pub use icydb_core::types;
pub use icydb_core::types::*;
