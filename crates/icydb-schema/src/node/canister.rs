use crate::prelude::*;
use std::collections::BTreeMap;

///
/// Canister
///

#[derive(CandidType, Clone, Debug, Serialize)]
pub struct Canister {
    pub def: Def,
    pub memory_min: u8,
    pub memory_max: u8,
}

impl MacroNode for Canister {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl ValidateNode for Canister {
    fn validate(&self) -> Result<(), ErrorTree> {
        let mut errs = ErrorTree::new();
        let schema = schema_read();

        // Check for duplicate memory IDs across all stores for this canister.
        // The collision domain includes:
        // - DataStore.memory_id
        // - IndexStore.entry_memory_id
        // - IndexStore.fingerprint_memory_id
        let canister_path = self.def.path();
        let mut seen_ids = BTreeMap::<u8, String>::new();

        for (path, store) in schema.filter_nodes::<DataStore>(|node| node.canister == canister_path)
        {
            assert_unique_memory_id(
                store.memory_id,
                format!("DataStore `{path}`.memory_id"),
                &canister_path,
                &mut seen_ids,
                &mut errs,
            );
        }

        for (path, store) in
            schema.filter_nodes::<IndexStore>(|node| node.canister == canister_path)
        {
            assert_unique_memory_id(
                store.entry_memory_id,
                format!("IndexStore `{path}`.entry_memory_id"),
                &canister_path,
                &mut seen_ids,
                &mut errs,
            );
            assert_unique_memory_id(
                store.fingerprint_memory_id,
                format!("IndexStore `{path}`.fingerprint_memory_id"),
                &canister_path,
                &mut seen_ids,
                &mut errs,
            );
        }

        errs.result()
    }
}

fn assert_unique_memory_id(
    memory_id: u8,
    slot: String,
    canister_path: &str,
    seen_ids: &mut BTreeMap<u8, String>,
    errs: &mut ErrorTree,
) {
    if let Some(existing) = seen_ids.get(&memory_id) {
        err!(
            errs,
            "duplicate memory_id `{}` used in canister `{}`: {} conflicts with {}",
            memory_id,
            canister_path,
            existing,
            slot
        );
    } else {
        seen_ids.insert(memory_id, slot);
    }
}

impl VisitableNode for Canister {
    fn route_key(&self) -> String {
        self.def.path()
    }
}
