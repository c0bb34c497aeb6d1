//! Named numeric properties over pores or throats.
//!
//! A `PropertyStore` holds one `Vec<f64>` per fully-qualified property name
//! (`pore.diameter`, `throat.length`, ...). Every array has exactly one value
//! per element of the owning kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::network_error::{ElementKind, NetworkError};

/// Per-element scalar properties for one element kind.
///
/// Deserialization re-checks every name and length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PropertyStoreRepr")]
pub struct PropertyStore {
    kind: ElementKind,
    len: usize,
    values: BTreeMap<String, Vec<f64>>,
}

#[derive(Deserialize)]
struct PropertyStoreRepr {
    kind: ElementKind,
    len: usize,
    values: BTreeMap<String, Vec<f64>>,
}

impl TryFrom<PropertyStoreRepr> for PropertyStore {
    type Error = NetworkError;

    fn try_from(repr: PropertyStoreRepr) -> Result<Self, Self::Error> {
        let mut store = PropertyStore::new(repr.kind, repr.len);
        for (name, values) in repr.values {
            store.insert(&name, values)?;
        }
        Ok(store)
    }
}

impl PropertyStore {
    /// Creates an empty store for `len` elements of `kind`.
    pub fn new(kind: ElementKind, len: usize) -> Self {
        Self {
            kind,
            len,
            values: BTreeMap::new(),
        }
    }

    /// Element kind served by this store.
    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Number of values every property must hold.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the store covers no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `values` under `name`, replacing any previous array.
    ///
    /// `name` must carry this store's prefix (e.g. `pore.`), and `values`
    /// must have one entry per element.
    pub fn insert(
        &mut self,
        name: &str,
        values: Vec<f64>,
    ) -> Result<Option<Vec<f64>>, NetworkError> {
        self.check_name(name)?;
        if values.len() != self.len {
            return Err(NetworkError::PropertyLengthMismatch {
                name: name.to_string(),
                expected: self.len,
                found: values.len(),
            });
        }
        Ok(self.values.insert(name.to_string(), values))
    }

    /// Read-only view of property `name`.
    pub fn get(&self, name: &str) -> Result<&[f64], NetworkError> {
        self.values
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| NetworkError::missing(name))
    }

    /// Returns true if `name` is stored.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Removes property `name`, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<f64>> {
        self.values.remove(name)
    }

    /// Stored property names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    /// Appends `other`'s elements after this store's elements.
    ///
    /// Properties missing on either side are padded with `NaN`.
    pub fn append(&mut self, other: &PropertyStore) {
        let old_len = self.len;
        let new_len = old_len + other.len;
        for (name, values) in &mut self.values {
            match other.values.get(name) {
                Some(theirs) => values.extend_from_slice(theirs),
                None => values.resize(new_len, f64::NAN),
            }
        }
        for (name, theirs) in &other.values {
            if !self.values.contains_key(name) {
                let mut values = vec![f64::NAN; old_len];
                values.extend_from_slice(theirs);
                self.values.insert(name.clone(), values);
            }
        }
        self.len = new_len;
    }

    /// Grows every property by `extra` elements, padding with `NaN`.
    pub fn extend_len(&mut self, extra: usize) {
        self.len += extra;
        for values in self.values.values_mut() {
            values.resize(self.len, f64::NAN);
        }
    }

    fn check_name(&self, name: &str) -> Result<(), NetworkError> {
        match name.split_once('.') {
            Some((prefix, rest)) if prefix == self.kind.prefix() && !rest.is_empty() => Ok(()),
            _ => Err(NetworkError::InvalidPropertyName(name.to_string())),
        }
    }
}
