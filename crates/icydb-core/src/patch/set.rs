use candid::CandidType;
use serde::{Deserialize, Serialize};

///
/// SetPatch
///
/// Set operations applied in-order; `Overwrite` replaces the entire set.
///

#[derive(CandidType, Clone, Debug, Deserialize, Serialize)]
pub enum SetPatch<U> {
    Insert(U),
    Remove(U),
    Overwrite { values: Vec<U> },
    Clear,
}

///
/// TESTS
///
