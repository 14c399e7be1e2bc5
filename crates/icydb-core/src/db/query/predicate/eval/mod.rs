use crate::{
    db::{
        index::predicate::IndexPredicateProgram,
        query::predicate::{CompareOp, Predicate, coercion::CoercionSpec},
    },
    traits::{EntityKind, EntityValue},
    value::Value,
};

mod index_compile;
mod resolve;
mod runtime;

#[cfg(test)]
pub(crate) use runtime::{FieldPresence, Row, eval};

///
/// PredicateFieldSlots
///
/// Slot-resolved predicate program for runtime row filtering.
/// Field names are resolved once during setup; evaluation is slot-only.
///

#[derive(Clone, Debug)]
pub(crate) struct PredicateFieldSlots {
    resolved: ResolvedPredicate,
    #[cfg_attr(not(test), allow(dead_code))]
    required_slots: Vec<usize>,
}

///
/// ResolvedComparePredicate
///
/// One comparison node with a pre-resolved field slot.
///

#[derive(Clone, Debug, Eq, PartialEq)]
struct ResolvedComparePredicate {
    field_slot: Option<usize>,
    op: CompareOp,
    value: Value,
    coercion: CoercionSpec,
}

///
/// ResolvedPredicate
///
/// Predicate AST compiled to field slots for execution hot paths.
///

#[derive(Clone, Debug, Eq, PartialEq)]
enum ResolvedPredicate {
    True,
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare(ResolvedComparePredicate),
    IsNull {
        field_slot: Option<usize>,
    },
    IsMissing {
        field_slot: Option<usize>,
    },
    IsEmpty {
        field_slot: Option<usize>,
    },
    IsNotEmpty {
        field_slot: Option<usize>,
    },
    TextContains {
        field_slot: Option<usize>,
        value: Value,
    },
    TextContainsCi {
        field_slot: Option<usize>,
        value: Value,
    },
}

impl PredicateFieldSlots {
    /// Resolve a predicate into a slot-based executable form.
    #[must_use]
    pub(crate) fn resolve<E: EntityKind>(predicate: &Predicate) -> Self {
        let resolved = resolve_predicate_slots::<E>(predicate);
        let required_slots = collect_required_slots(&resolved);

        Self {
            resolved,
            required_slots,
        }
    }

    /// Return all unique field slots referenced by this compiled predicate.
    ///
    /// Contract:
    /// - sorted ascending
    /// - deduplicated
    /// - excludes unresolved/missing field references
    #[must_use]
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) const fn required_slots(&self) -> &[usize] {
        self.required_slots.as_slice()
    }

    // Compile this predicate into an index-component evaluator program for one
    // concrete index field-slot ordering.
    #[must_use]
    #[cfg_attr(not(test), allow(dead_code))]
    pub(in crate::db) fn compile_index_program(
        &self,
        index_slots: &[usize],
    ) -> Option<IndexPredicateProgram> {
        compile_index_program_from_resolved(&self.resolved, index_slots)
    }

    // Compile this predicate into an index-component evaluator program only
    // when every predicate node is supported by index-only evaluation.
    #[must_use]
    #[cfg_attr(not(test), allow(dead_code))]
    pub(in crate::db) fn compile_index_program_strict(
        &self,
        index_slots: &[usize],
    ) -> Option<IndexPredicateProgram> {
        compile_index_program_from_resolved_full(&self.resolved, index_slots)
    }
}

// Collect every resolved field slot referenced by one compiled predicate tree.
fn collect_required_slots(predicate: &ResolvedPredicate) -> Vec<usize> {
    resolve::collect_required_slots(predicate)
}

// Compile one resolved predicate tree into one index-only program.
#[cfg_attr(not(test), allow(dead_code))]
fn compile_index_program_from_resolved(
    predicate: &ResolvedPredicate,
    index_slots: &[usize],
) -> Option<IndexPredicateProgram> {
    index_compile::compile_index_program_from_resolved(predicate, index_slots)
}

// Compile one resolved predicate tree only when every node is supported.
fn compile_index_program_from_resolved_full(
    predicate: &ResolvedPredicate,
    index_slots: &[usize],
) -> Option<IndexPredicateProgram> {
    index_compile::compile_index_program_from_resolved_full(predicate, index_slots)
}

// Resolve one predicate tree from field names to field slots.
fn resolve_predicate_slots<E: EntityKind>(predicate: &Predicate) -> ResolvedPredicate {
    resolve::resolve_predicate_slots::<E>(predicate)
}

/// Evaluate one predicate against one entity using pre-resolved field slots.
#[must_use]
pub(crate) fn eval_with_slots<E: EntityValue>(entity: &E, slots: &PredicateFieldSlots) -> bool {
    runtime::eval_with_resolved_slots(entity, &slots.resolved)
}

/// TESTS
///
