use crate::entity::{EntityKey, EntityRef};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Value
///
/// Scalar field value of a schema-less entity document.
/// References carry their target collection so chained lookups need no
/// out-of-band schema.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Date(NaiveDate),
    Int(i64),
    Ref(EntityRef),
    Text(String),
}

impl Value {
    /// Reference view, if this value points at another entity.
    #[must_use]
    pub const fn as_ref_value(&self) -> Option<&EntityRef> {
        match self {
            Self::Ref(entity_ref) => Some(entity_ref),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Render this value as a histogram bucket key.
    ///
    /// References collapse to their target key, mirroring how the datastore
    /// layer renders a key id-or-name.
    #[must_use]
    pub fn bucket_key(&self) -> String {
        match self {
            Self::Ref(entity_ref) => entity_ref.key.to_string(),
            other => other.to_string(),
        }
    }

    /// Shorthand for a reference value.
    #[must_use]
    pub fn entity_ref(collection: impl Into<String>, key: impl Into<EntityKey>) -> Self {
        Self::Ref(EntityRef::new(collection, key))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Int(i) => write!(f, "{i}"),
            Self::Ref(entity_ref) => write!(f, "{}", entity_ref.key),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}
