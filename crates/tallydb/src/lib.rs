pub use tallydb_core::*;
