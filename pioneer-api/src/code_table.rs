//! Two-sided name <-> code lookup
//!
//! Source slots and sound modes are both addressed by a numeric code on the
//! wire and by a name everywhere else. A [`CodeTable`] holds both directions
//! in one structure so the mapping stays one-to-one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{ApiError, Result};

/// A bijection between names and device codes, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(String, String)>", into = "Vec<(String, String)>")]
pub struct CodeTable {
    entries: Vec<(String, String)>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, code)` pairs, failing on the first conflict
    pub fn from_pairs<I, N, C>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let mut table = Self::new();
        for (name, code) in pairs {
            table.insert(name, code)?;
        }
        Ok(table)
    }

    /// Add a pair
    ///
    /// Returns `Ok(true)` if the pair was added and `Ok(false)` if the exact
    /// pair was already present. A name or code already mapped to something
    /// else is a [`ApiError::MappingConflict`] and leaves the table unchanged.
    pub fn insert(&mut self, name: impl Into<String>, code: impl Into<String>) -> Result<bool> {
        let name = name.into();
        let code = code.into();

        let by_name = self.by_name.get(&name).copied();
        let by_code = self.by_code.get(&code).copied();
        match (by_name, by_code) {
            (None, None) => {
                let index = self.entries.len();
                self.by_name.insert(name.clone(), index);
                self.by_code.insert(code.clone(), index);
                self.entries.push((name, code));
                Ok(true)
            }
            (Some(a), Some(b)) if a == b => Ok(false),
            (Some(index), _) | (None, Some(index)) => {
                let (existing_name, existing_code) = self.entries[index].clone();
                Err(ApiError::MappingConflict {
                    name,
                    code,
                    existing_name,
                    existing_code,
                })
            }
        }
    }

    /// The code for `name`
    pub fn code(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(|&i| self.entries[i].1.as_str())
    }

    /// The name for `code`
    pub fn name(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(|&i| self.entries[i].0.as_str())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, code)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, code)| (name.as_str(), code.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<(String, String)>> for CodeTable {
    /// Conflicting pairs are dropped; the first mapping wins
    fn from(pairs: Vec<(String, String)>) -> Self {
        let mut table = Self::new();
        for (name, code) in pairs {
            let _ = table.insert(name, code);
        }
        table
    }
}

impl From<CodeTable> for Vec<(String, String)> {
    fn from(table: CodeTable) -> Self {
        table.entries
    }
}
