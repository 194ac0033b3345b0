//! Disjoint per-key enrichment output

use std::collections::HashMap;
use ub_common::{Error, Result};

/// Rows produced by one enrichment pass, keyed by canonical scientific name
///
/// Keys are unique: inserting a key twice is a cardinality error, so a later
/// left join onto the canonical records can never duplicate a species.
/// Iteration follows insertion order.
#[derive(Debug, Clone)]
pub struct EnrichmentTable<T> {
    name: String,
    rows: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> EnrichmentTable<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a row for `key`
    pub fn insert(&mut self, key: impl Into<String>, row: T) -> Result<()> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(Error::Cardinality(format!(
                "{}: duplicate key '{}'",
                self.name, key
            )));
        }
        self.index.insert(key.clone(), self.rows.len());
        self.rows.push((key, row));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&i| &self.rows[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }
}
