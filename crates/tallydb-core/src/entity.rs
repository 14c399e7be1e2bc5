use crate::value::Value;
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

///
/// EntityKey
///
/// Opaque, totally-ordered key of one entity within its collection.
/// Key order is the scan order, so the resume cursor is just the last
/// processed key.
///

#[derive(
    Clone, Debug, Deref, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct EntityKey(String);

impl EntityKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

///
/// EntityRef
///
/// A fully-qualified reference to an entity in a named collection.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct EntityRef {
    pub collection: String,
    pub key: EntityKey,
}

impl EntityRef {
    #[must_use]
    pub fn new(collection: impl Into<String>, key: impl Into<EntityKey>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.key)
    }
}

///
/// Entity
///
/// One schema-less document: a key plus named scalar fields.
/// Collections are homogeneous only by convention; absent fields are
/// ordinary and never an error.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Entity {
    key: EntityKey,
    fields: BTreeMap<String, Value>,
}

impl Entity {
    #[must_use]
    pub fn new(key: impl Into<EntityKey>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub const fn key(&self) -> &EntityKey {
        &self.key
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Reference stored under `field`, if any.
    #[must_use]
    pub fn get_ref(&self, field: &str) -> Option<&EntityRef> {
        self.fields.get(field).and_then(Value::as_ref_value)
    }
}
