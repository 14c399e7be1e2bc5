mod index_bounds;
mod key_specs;
mod lowering_plan;

pub(in crate::db) use index_bounds::raw_bounds_for_semantic_index_component_range;
pub(in crate::db) use key_specs::{IndexPrefixSpec, IndexRangeSpec};
pub(in crate::db) use lowering_plan::ExecutablePlan;
