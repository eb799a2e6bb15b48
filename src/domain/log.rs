#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Added,
    Modified,
    Replaced,
    Deleted,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Added => "A",
            ChangeAction::Modified => "M",
            ChangeAction::Replaced => "R",
            ChangeAction::Deleted => "D",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "A" => Some(ChangeAction::Added),
            "M" => Some(ChangeAction::Modified),
            "R" => Some(ChangeAction::Replaced),
            "D" => Some(ChangeAction::Deleted),
            _ => None,
        }
    }

    pub fn is_deletion(&self) -> bool {
        matches!(self, ChangeAction::Deleted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
    /// Older servers leave the kind out of the log.
    Unknown,
}

impl NodeKind {
    pub fn from_str(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "file" => NodeKind::File,
            "dir" | "directory" => NodeKind::Directory,
            _ => NodeKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedPath {
    pub path: String,
    pub action: ChangeAction,
    pub node_kind: NodeKind,
}

impl ChangedPath {
    pub fn new(path: impl Into<String>, action: ChangeAction, node_kind: NodeKind) -> Self {
        Self {
            path: path.into(),
            action,
            node_kind,
        }
    }

    pub fn file(path: impl Into<String>, action: ChangeAction) -> Self {
        Self::new(path, action, NodeKind::File)
    }
}

/// One committed revision and the paths it touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub revision: u64,
    pub changed_paths: Vec<ChangedPath>,
}

impl LogEntry {
    pub fn new(revision: u64, changed_paths: Vec<ChangedPath>) -> Self {
        Self {
            revision,
            changed_paths,
        }
    }
}
