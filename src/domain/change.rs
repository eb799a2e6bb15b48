use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

/// Net effect of a revision window on a project.
///
/// `changed_files` keeps the order in which paths first qualified;
/// `deleted_files` carries no ordering promise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    pub changed_files: Vec<String>,
    pub deleted_files: BTreeSet<String>,
}

impl ChangeSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changed_files.is_empty() && self.deleted_files.is_empty()
    }

    /// Rewrites every path with `normalize`, keeping first-appearance order and
    /// dropping any duplicates the mapping produces. A path that lands in both
    /// collections stays changed only.
    pub fn map_paths(self, normalize: impl Fn(&str) -> String) -> Self {
        let mut seen = HashSet::with_capacity(self.changed_files.len());
        let changed_files = self
            .changed_files
            .iter()
            .map(|path| normalize(path.as_str()))
            .filter(|path| seen.insert(path.clone()))
            .collect();
        let deleted_files = self
            .deleted_files
            .iter()
            .map(|path| normalize(path.as_str()))
            .filter(|path| !seen.contains(path))
            .collect();

        Self {
            changed_files,
            deleted_files,
        }
    }
}
