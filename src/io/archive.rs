//! Flat, id-referencing archive for model state.
//!
//! The archive is a collection of typed, id-keyed records. Each record
//! carries a property bag (scalar and vector typed key/value pairs) and an
//! associations map from an entity kind to an ordered list of referenced ids.
//! References may point forward — the entity graph is cyclic (an edge's use
//! chains into a loop that bounds a face side) — so references are resolved
//! only after every record has been ingested. A distinguished root lists the
//! top-level (non-use) objects.

use std::collections::BTreeMap;

use crate::model_error::ModelError;
use crate::topology::kind::EntityKind;

/// Typed key/value properties of one record.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropertyBag {
    #[serde(default)]
    pub longs: BTreeMap<String, Vec<i64>>,
    #[serde(default)]
    pub doubles: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
}

impl PropertyBag {
    pub fn set_longs(&mut self, key: &str, values: Vec<i64>) {
        self.longs.insert(key.to_string(), values);
    }

    pub fn set_doubles(&mut self, key: &str, values: Vec<f64>) {
        self.doubles.insert(key.to_string(), values);
    }

    pub fn set_text(&mut self, key: &str, value: impl Into<String>) {
        self.texts.insert(key.to_string(), value.into());
    }

    pub fn longs(&self, key: &str) -> Option<&[i64]> {
        self.longs.get(key).map(Vec::as_slice)
    }

    pub fn doubles(&self, key: &str) -> Option<&[f64]> {
        self.doubles.get(key).map(Vec::as_slice)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.texts.get(key).map(String::as_str)
    }
}

/// One typed, id-keyed object of the archive.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    pub id: u64,
    pub kind: EntityKind,
    #[serde(default)]
    pub properties: PropertyBag,
    #[serde(default)]
    pub associations: BTreeMap<EntityKind, Vec<u64>>,
}

impl Record {
    pub fn new(id: u64, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            properties: PropertyBag::default(),
            associations: BTreeMap::new(),
        }
    }

    /// Appends references under one kind tag, preserving order.
    pub fn associate(&mut self, kind: EntityKind, ids: impl IntoIterator<Item = u64>) {
        self.associations.entry(kind).or_default().extend(ids);
    }

    /// Ordered references under one kind tag.
    pub fn associated(&self, kind: EntityKind) -> &[u64] {
        self.associations.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// The single reference a record must carry under `kind`.
    pub fn required_one(&self, kind: EntityKind) -> Result<u64, ModelError> {
        match self.associated(kind) {
            &[id] => Ok(id),
            other => Err(ModelError::MalformedRecord {
                id: self.id,
                reason: format!("expected one {kind:?} association, found {}", other.len()),
            }),
        }
    }

    /// At most one reference under `kind`.
    pub fn optional_one(&self, kind: EntityKind) -> Result<Option<u64>, ModelError> {
        match self.associated(kind) {
            [] => Ok(None),
            &[id] => Ok(Some(id)),
            other => Err(ModelError::MalformedRecord {
                id: self.id,
                reason: format!(
                    "expected at most one {kind:?} association, found {}",
                    other.len()
                ),
            }),
        }
    }
}

/// Complete, portable model state.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Archive {
    /// Saved id-counter value, restored so new builds never collide.
    pub next_id: u64,
    pub records: Vec<Record>,
    /// Ids of the top-level objects (everything that is not a use object).
    pub root: Vec<u64>,
}

impl Archive {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }
}
