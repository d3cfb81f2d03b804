//! Constant/label table loaded from a schema source
//!
//! The schema file is only scanned for declarations of the form
//!
//! ```text
//! const.NAME = value
//! label.NAME = value
//! ```
//!
//! Everything else in the file is ignored. Names are expected to be unique;
//! a repeated name is recorded as a [`DuplicateDefinition`] and the last
//! definition wins.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::{AuditError, Result};

lazy_static! {
    static ref DECLARATION: Regex =
        Regex::new(r"^\s*(const|label)\.([^\s=]+)\s*=\s*(.*?)\s*$").unwrap();
}

/// Which table a declaration belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Const,
    Label,
}

impl Category {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "const" => Some(Self::Const),
            "label" => Some(Self::Label),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Label => "label",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `category.name = value` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantEntry {
    pub name: String,
    pub category: Category,
    /// Raw right-hand side, trimmed but otherwise unparsed
    pub value: String,
}

/// A name declared more than once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateDefinition {
    pub name: String,
    /// 1-based line of the replacing declaration
    pub line: usize,
    pub previous: ConstantEntry,
    pub replacement: ConstantEntry,
}

/// Number of live entries per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub consts: usize,
    pub labels: usize,
}

/// Name-keyed table of known constant and label strings
#[derive(Debug, Clone, Default)]
pub struct ConstantTable {
    entries: BTreeMap<String, ConstantEntry>,
    duplicates: Vec<DuplicateDefinition>,
}

impl ConstantTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse the schema source at `path`
    ///
    /// A missing file is reported as [`AuditError::SchemaNotFound`] so callers
    /// can tell it apart from other I/O trouble.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AuditError::SchemaNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let table = Self::parse(&content);
        let counts = table.category_counts();
        tracing::info!(
            path = %path.display(),
            consts = counts.consts,
            labels = counts.labels,
            duplicates = table.duplicates.len(),
            "loaded constant table"
        );
        Ok(table)
    }

    /// Parse schema text; lines that are not declarations are skipped
    pub fn parse(content: &str) -> Self {
        let mut table = Self::new();
        for (index, line) in content.lines().enumerate() {
            let Some(caps) = DECLARATION.captures(line) else {
                continue;
            };
            let Some(category) = Category::parse(&caps[1]) else {
                continue;
            };
            table.insert(
                ConstantEntry {
                    name: caps[2].to_string(),
                    category,
                    value: caps[3].to_string(),
                },
                index + 1,
            );
        }
        table
    }

    /// Insert an entry, recording a duplicate if the name is taken
    pub fn insert(&mut self, entry: ConstantEntry, line: usize) {
        if let Some(previous) = self.entries.insert(entry.name.clone(), entry.clone()) {
            tracing::warn!(
                name = %entry.name,
                line,
                old = %format!("{}.{} = {}", previous.category, previous.name, previous.value),
                new = %format!("{}.{} = {}", entry.category, entry.name, entry.value),
                "duplicate schema declaration, last definition wins"
            );
            self.duplicates.push(DuplicateDefinition {
                name: entry.name.clone(),
                line,
                previous,
                replacement: entry,
            });
        }
    }

    /// True if `name` is declared
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Look up a declaration by name
    pub fn get(&self, name: &str) -> Option<&ConstantEntry> {
        self.entries.get(name)
    }

    /// Number of distinct declared names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order
    pub fn entries(&self) -> impl Iterator<Item = &ConstantEntry> {
        self.entries.values()
    }

    /// Duplicate declarations in file order
    pub fn duplicates(&self) -> &[DuplicateDefinition] {
        &self.duplicates
    }

    pub fn category_counts(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        for entry in self.entries.values() {
            match entry.category {
                Category::Const => counts.consts += 1,
                Category::Label => counts.labels += 1,
            }
        }
        counts
    }
}
