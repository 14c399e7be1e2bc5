use crate::{
    db::query::plan::{AccessPath, AccessPlan, ExplainAccessPath},
    value::Value,
};
use std::ops::Bound;

///
/// AccessPlanProjection
///
/// Shared visitor for projecting `AccessPlan` / `AccessPath` into
/// diagnostics-specific representations.
///
pub trait AccessPlanProjection<K> {
    type Output;

    fn by_key(&mut self, key: &K) -> Self::Output;
    fn by_keys(&mut self, keys: &[K]) -> Self::Output;
    fn key_range(&mut self, start: &K, end: &K) -> Self::Output;
    fn index_prefix(
        &mut self,
        index_name: &'static str,
        index_fields: &[&'static str],
        prefix_len: usize,
        values: &[Value],
    ) -> Self::Output;
    fn index_range(
        &mut self,
        index_name: &'static str,
        index_fields: &[&'static str],
        prefix_len: usize,
        prefix: &[Value],
        lower: &Bound<Value>,
        upper: &Bound<Value>,
    ) -> Self::Output;
    fn full_scan(&mut self) -> Self::Output;
    fn union(&mut self, children: Vec<Self::Output>) -> Self::Output;
    fn intersection(&mut self, children: Vec<Self::Output>) -> Self::Output;
}

/// Project an access plan by exhaustively walking canonical access variants.
pub fn project_access_plan<K, P>(plan: &AccessPlan<K>, projection: &mut P) -> P::Output
where
    P: AccessPlanProjection<K>,
{
    match plan {
        AccessPlan::Path(path) => project_access_path(path, projection),
        AccessPlan::Union(children) => {
            let children = children
                .iter()
                .map(|child| project_access_plan(child, projection))
                .collect();
            projection.union(children)
        }
        AccessPlan::Intersection(children) => {
            let children = children
                .iter()
                .map(|child| project_access_plan(child, projection))
                .collect();
            projection.intersection(children)
        }
    }
}

// Project one concrete path variant via the shared projection surface.
fn project_access_path<K, P>(path: &AccessPath<K>, projection: &mut P) -> P::Output
where
    P: AccessPlanProjection<K>,
{
    match path {
        AccessPath::ByKey(key) => projection.by_key(key),
        AccessPath::ByKeys(keys) => projection.by_keys(keys),
        AccessPath::KeyRange { start, end } => projection.key_range(start, end),
        AccessPath::IndexPrefix { index, values } => {
            projection.index_prefix(index.name, index.fields, values.len(), values)
        }
        AccessPath::IndexRange {
            index,
            prefix,
            lower,
            upper,
        } => projection.index_range(index.name, index.fields, prefix.len(), prefix, lower, upper),
        AccessPath::FullScan => projection.full_scan(),
    }
}

/// Project an explain access path using the same shared access-shape visitor.
pub fn project_explain_access_path<P>(access: &ExplainAccessPath, projection: &mut P) -> P::Output
where
    P: AccessPlanProjection<Value>,
{
    match access {
        ExplainAccessPath::ByKey { key } => projection.by_key(key),
        ExplainAccessPath::ByKeys { keys } => projection.by_keys(keys),
        ExplainAccessPath::KeyRange { start, end } => projection.key_range(start, end),
        ExplainAccessPath::IndexPrefix {
            name,
            fields,
            prefix_len,
            values,
        } => projection.index_prefix(name, fields, *prefix_len, values),
        ExplainAccessPath::IndexRange {
            name,
            fields,
            prefix_len,
            prefix,
            lower,
            upper,
        } => projection.index_range(name, fields, *prefix_len, prefix, lower, upper),
        ExplainAccessPath::FullScan => projection.full_scan(),
        ExplainAccessPath::Union(children) => {
            let children = children
                .iter()
                .map(|child| project_explain_access_path(child, projection))
                .collect();
            projection.union(children)
        }
        ExplainAccessPath::Intersection(children) => {
            let children = children
                .iter()
                .map(|child| project_explain_access_path(child, projection))
                .collect();
            projection.intersection(children)
        }
    }
}

///
/// TESTS
///
