//! Alias table: alias string → candidate id (many-to-one).
//!
//! Built once per document, read-only while segments are built.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type CandidateId = usize;

/// One alias registration, as hydrated from JS or JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub alias: String,
    pub id: CandidateId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasTable {
    ids: HashMap<String, CandidateId>,
    /// First alias registered per candidate
    canonical: HashMap<CandidateId, String>,
    /// Aliases in registration order
    order: Vec<String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an alias. Re-registering an alias moves it to the new id.
    pub fn insert(&mut self, alias: impl Into<String>, id: CandidateId) {
        let alias = alias.into();
        if alias.is_empty() {
            return;
        }
        self.canonical.entry(id).or_insert_with(|| alias.clone());
        if self.ids.insert(alias.clone(), id).is_none() {
            self.order.push(alias);
        }
    }

    /// Parse a name list: one character per line, aliases separated by
    /// whitespace, id = 0-based index among non-empty lines.
    pub fn from_name_list(text: &str) -> Self {
        let mut table = Self::new();
        let lines = text.lines().filter(|l| !l.trim().is_empty());
        for (id, line) in lines.enumerate() {
            for alias in line.split_whitespace() {
                table.insert(alias, id);
            }
        }
        table
    }

    /// One candidate per distinct name, ids in first-seen order
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for name in names {
            let name = name.as_ref();
            if !table.contains(name) {
                let id = table.candidate_count();
                table.insert(name, id);
            }
        }
        table
    }

    pub fn from_entries(entries: Vec<AliasEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry.alias, entry.id);
        }
        table
    }

    pub fn get(&self, alias: &str) -> Option<CandidateId> {
        self.ids.get(alias).copied()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.ids.contains_key(alias)
    }

    /// Display name for a candidate (its first registered alias)
    pub fn canonical_name(&self, id: CandidateId) -> Option<&str> {
        self.canonical.get(&id).map(|s| s.as_str())
    }

    /// All aliases, in registration order
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn candidate_count(&self) -> usize {
        self.canonical.len()
    }
}

/// Names by descending frequency, ties broken by first appearance.
///
/// Used to review tagger output before it becomes a name list.
pub fn rank_names<I, S>(names: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for name in names {
        let name = name.as_ref();
        match index.get(name) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(name.to_string(), counts.len());
                counts.push((name.to_string(), 1));
            }
        }
    }

    // stable: equal counts keep first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
