//! Boolean label storage for pores and throats.
//!
//! Labels map a name to the set of element indices carrying it. They are
//! used for boundary faces (`top`, `left`, ...), sub-lattice membership
//! (`primary`, `secondary`), geometry assignment, and the `surface` /
//! `internal` split.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// How several labels combine in a query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelMode {
    /// Elements carrying at least one of the labels.
    #[default]
    Union,
    /// Elements carrying every one of the labels.
    Intersection,
    /// Elements carrying none of the labels.
    Difference,
}

/// Named boolean labels over dense element indices.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    labels: BTreeMap<String, BTreeSet<usize>>,
}

impl LabelSet {
    /// Creates an empty label set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies label `name` to `index`.
    ///
    /// Returns `true` if the index was not labeled before.
    pub fn set_label(&mut self, index: usize, name: &str) -> bool {
        self.labels.entry(name.to_string()).or_default().insert(index)
    }

    /// Applies label `name` to every index in `indices`.
    pub fn set_labels<I>(&mut self, indices: I, name: &str)
    where
        I: IntoIterator<Item = usize>,
    {
        self.labels
            .entry(name.to_string())
            .or_default()
            .extend(indices);
    }

    /// Returns true if `index` carries label `name`.
    pub fn has_label(&self, index: usize, name: &str) -> bool {
        self.labels
            .get(name)
            .is_some_and(|set| set.contains(&index))
    }

    /// Returns all indices labeled `name`, ascending.
    pub fn indices(&self, name: &str) -> Vec<usize> {
        self.labels
            .get(name)
            .map_or_else(Vec::new, |set| set.iter().copied().collect())
    }

    /// Returns the number of indices labeled `name`.
    pub fn count(&self, name: &str) -> usize {
        self.labels.get(name).map_or(0, BTreeSet::len)
    }

    /// Returns all label names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.keys().map(String::as_str)
    }

    /// Returns the labels carried by `index`, sorted by name.
    pub fn labels_of(&self, index: usize) -> Vec<&str> {
        self.labels
            .iter()
            .filter(|(_, set)| set.contains(&index))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Removes label `name` entirely. Returns the number of indices it covered.
    pub fn remove_label(&mut self, name: &str) -> usize {
        self.labels.remove(name).map_or(0, |set| set.len())
    }

    /// Removes label `name` from the given indices only.
    ///
    /// Returns the number of indices that actually lost the label.
    pub fn unset_labels<I>(&mut self, indices: I, name: &str) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        let Some(set) = self.labels.get_mut(name) else {
            return 0;
        };
        let before = set.len();
        for index in indices {
            set.remove(&index);
        }
        let removed = before - set.len();
        if set.is_empty() {
            self.labels.remove(name);
        }
        removed
    }

    /// Combines the named labels according to `mode`.
    ///
    /// `universe` is the number of elements; it bounds the result of
    /// [`LabelMode::Difference`]. Missing labels behave as empty sets.
    pub fn select(&self, names: &[&str], mode: LabelMode, universe: usize) -> Vec<usize> {
        let sets: Vec<Option<&BTreeSet<usize>>> =
            names.iter().map(|name| self.labels.get(*name)).collect();
        match mode {
            LabelMode::Union => {
                let mut out = BTreeSet::new();
                for set in sets.into_iter().flatten() {
                    out.extend(set.iter().copied());
                }
                out.into_iter().collect()
            }
            LabelMode::Intersection => {
                let mut sets = sets.into_iter();
                let Some(Some(first)) = sets.next() else {
                    return Vec::new();
                };
                let Some(rest) = sets.collect::<Option<Vec<_>>>() else {
                    return Vec::new();
                };
                first
                    .iter()
                    .copied()
                    .filter(|index| rest.iter().all(|set| set.contains(index)))
                    .collect()
            }
            LabelMode::Difference => (0..universe)
                .filter(|index| {
                    sets.iter()
                        .flatten()
                        .all(|set| !set.contains(index))
                })
                .collect(),
        }
    }

    /// Appends every label of `other`, shifting its indices by `offset`.
    pub fn append_shifted(&mut self, other: &LabelSet, offset: usize) {
        for (name, set) in &other.labels {
            self.labels
                .entry(name.clone())
                .or_default()
                .extend(set.iter().map(|&index| index + offset));
        }
    }

    /// Returns true when the label set has no entries.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Largest labeled index with the label carrying it, if any.
    pub fn max_index(&self) -> Option<(&str, usize)> {
        self.labels
            .iter()
            .filter_map(|(name, set)| set.last().map(|&index| (name.as_str(), index)))
            .max_by_key(|&(_, index)| index)
    }

    /// Iterate over all labels as `(name, index)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.labels
            .iter()
            .flat_map(|(name, set)| set.iter().map(move |&index| (name.as_str(), index)))
    }
}
