//! The per-file table of resolved module imports.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Which files each compiled source resolved as modules.
///
/// This is the contract between the compiler and the dependency audit. It
/// serializes as a JSON object from source path to the list of imported
/// paths:
///
/// ```json
/// { "/app/main.ts": ["/node_modules/lodash/index.d.ts", "/app/util.ts"] }
/// ```
///
/// Each list keeps first-seen order and holds no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportTable {
    imports: BTreeMap<String, ImportList>,
}

/// One source's imports in first-seen order, with a set for membership.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
struct ImportList {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ImportList {
    fn push(&mut self, imported: &str) -> bool {
        if !self.seen.insert(imported.to_string()) {
            return false;
        }
        self.order.push(imported.to_string());
        true
    }
}

impl PartialEq for ImportList {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for ImportList {}

impl From<Vec<String>> for ImportList {
    fn from(imports: Vec<String>) -> Self {
        let mut list = Self::default();
        for imported in &imports {
            list.push(imported);
        }
        list
    }
}

impl From<ImportList> for Vec<String> {
    fn from(list: ImportList) -> Self {
        list.order
    }
}

impl ImportTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that compiling `source` resolved `imported` as a module.
    ///
    /// Returns `false` if the pair was already recorded.
    pub fn note_import(&mut self, source: &str, imported: &str) -> bool {
        self.imports
            .entry(source.to_string())
            .or_default()
            .push(imported)
    }

    /// Returns the imports of `source` in the order they were first seen.
    pub fn imports_of(&self, source: &str) -> &[String] {
        self.imports
            .get(source)
            .map(|list| list.order.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates over sources in path order with their imports.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.imports
            .iter()
            .map(|(source, list)| (source.as_str(), list.order.as_slice()))
    }

    /// Iterates over every `(source, imported)` record.
    pub fn records(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().flat_map(|(source, imports)| {
            imports.iter().map(move |imported| (source, imported.as_str()))
        })
    }

    /// Returns the number of sources with at least one recorded import.
    pub fn len(&self) -> usize {
        self.imports.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Parses a table from its JSON form.
    ///
    /// Duplicate imports within a source's list collapse to the first.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Renders the table as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl<S: AsRef<str>, I: AsRef<str>> FromIterator<(S, I)> for ImportTable {
    fn from_iter<T: IntoIterator<Item = (S, I)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (source, imported) in iter {
            table.note_import(source.as_ref(), imported.as_ref());
        }
        table
    }
}
