use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::domain::change::ChangeSet;
use crate::domain::log::{LogEntry, NodeKind};
use crate::domain::path::is_under_root;
use crate::services::{DiagnosticEvent, Diagnostics};

/// Folds log entries, oldest first, into the net changes under `root_prefix`.
///
/// An add followed by a delete leaves only the delete; a delete followed by an
/// add leaves only the change and reports the revive to `diagnostics`.
/// Directories, paths outside the root and paths matched by `excluded` are
/// skipped. Paths are compared by exact string equality.
pub fn aggregate_changes<'a, I, F>(
    root_prefix: &str,
    excluded: F,
    entries: I,
    diagnostics: &dyn Diagnostics,
) -> ChangeSet
where
    I: IntoIterator<Item = &'a LogEntry>,
    F: Fn(&str) -> bool,
{
    let mut changed_files: Vec<String> = Vec::new();
    let mut changed_index: HashSet<String> = HashSet::new();
    let mut deleted_files: BTreeSet<String> = BTreeSet::new();

    for entry in entries {
        for change in &entry.changed_paths {
            if change.node_kind == NodeKind::Directory {
                continue;
            }
            let path = change.path.as_str();
            if !is_under_root(path, root_prefix) || excluded(path) {
                continue;
            }

            if change.action.is_deletion() {
                if changed_index.remove(path) {
                    changed_files.retain(|existing| existing != path);
                }
                deleted_files.insert(path.to_string());
            } else {
                if changed_index.insert(path.to_string()) {
                    changed_files.push(path.to_string());
                }
                if deleted_files.remove(path) {
                    diagnostics.record(DiagnosticEvent::PathRevived {
                        path: path.to_string(),
                        revision: entry.revision,
                    });
                }
            }
        }
    }

    debug!(
        changed = changed_files.len(),
        deleted = deleted_files.len(),
        "aggregated change set"
    );

    ChangeSet {
        changed_files,
        deleted_files,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::domain::log::{ChangeAction, ChangedPath};
    use crate::testing::RecordingDiagnostics;

    fn entry(revision: u64, changes: &[(&str, ChangeAction)]) -> LogEntry {
        LogEntry::new(
            revision,
            changes
                .iter()
                .map(|(path, action)| ChangedPath::file(*path, *action))
                .collect(),
        )
    }

    fn run(entries: &[LogEntry]) -> (ChangeSet, RecordingDiagnostics) {
        let diagnostics = RecordingDiagnostics::default();
        let set = aggregate_changes("/proj", |_| false, entries, &diagnostics);
        (set, diagnostics)
    }

    fn set(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|path| path.to_string()).collect()
    }

    #[test]
    fn add_then_modify_is_one_change() {
        let (result, diagnostics) = run(&[
            entry(1, &[("/proj/A.txt", ChangeAction::Added)]),
            entry(2, &[("/proj/A.txt", ChangeAction::Modified)]),
        ]);
        assert_eq!(result.changed_files, vec!["/proj/A.txt"]);
        assert!(result.deleted_files.is_empty());
        assert!(diagnostics.events().is_empty());
    }

    #[test]
    fn add_then_delete_is_only_a_delete() {
        let (result, _) = run(&[
            entry(1, &[("/proj/A.txt", ChangeAction::Added)]),
            entry(2, &[("/proj/A.txt", ChangeAction::Deleted)]),
        ]);
        assert!(result.changed_files.is_empty());
        assert_eq!(result.deleted_files, set(&["/proj/A.txt"]));
    }

    #[test]
    fn delete_then_readd_is_a_revive() {
        let (result, diagnostics) = run(&[
            entry(1, &[("/proj/A.txt", ChangeAction::Added)]),
            entry(2, &[("/proj/A.txt", ChangeAction::Deleted)]),
            entry(3, &[("/proj/A.txt", ChangeAction::Added)]),
        ]);
        assert_eq!(result.changed_files, vec!["/proj/A.txt"]);
        assert!(result.deleted_files.is_empty());
        assert_eq!(
            diagnostics.events(),
            vec![DiagnosticEvent::PathRevived {
                path: "/proj/A.txt".to_string(),
                revision: 3,
            }]
        );
    }

    #[test]
    fn directories_are_ignored() {
        let entries = [
            LogEntry::new(
                1,
                vec![
                    ChangedPath::new("/proj/dir", ChangeAction::Added, NodeKind::Directory),
                    ChangedPath::new("/proj/gone", ChangeAction::Deleted, NodeKind::Directory),
                ],
            ),
            LogEntry::new(
                2,
                vec![ChangedPath::new("/proj/dir", ChangeAction::Modified, NodeKind::Directory)],
            ),
        ];
        let (result, _) = run(&entries);
        assert!(result.is_empty());
    }

    #[test]
    fn unknown_node_kind_counts_as_file() {
        let entries = [LogEntry::new(
            1,
            vec![ChangedPath::new("/proj/old.txt", ChangeAction::Modified, NodeKind::Unknown)],
        )];
        let (result, _) = run(&entries);
        assert_eq!(result.changed_files, vec!["/proj/old.txt"]);
    }

    #[test]
    fn paths_outside_root_are_ignored() {
        let (result, _) = run(&[entry(
            1,
            &[
                ("/other-proj/B.txt", ChangeAction::Added),
                ("/project2/C.txt", ChangeAction::Deleted),
            ],
        )]);
        assert!(result.is_empty());
    }

    #[test]
    fn excluded_paths_are_ignored() {
        let diagnostics = RecordingDiagnostics::default();
        let entries = [entry(
            1,
            &[
                ("/proj/build/out.js", ChangeAction::Added),
                ("/proj/src/app.js", ChangeAction::Added),
                ("/proj/build/old.js", ChangeAction::Deleted),
            ],
        )];
        let result = aggregate_changes(
            "/proj",
            |path| path.starts_with("/proj/build/"),
            &entries,
            &diagnostics,
        );
        assert_eq!(result.changed_files, vec!["/proj/src/app.js"]);
        assert!(result.deleted_files.is_empty());
    }

    #[test]
    fn keeps_first_appearance_order() {
        let (result, _) = run(&[
            entry(1, &[("/proj/c", ChangeAction::Added), ("/proj/a", ChangeAction::Added)]),
            entry(2, &[("/proj/b", ChangeAction::Modified), ("/proj/c", ChangeAction::Modified)]),
            entry(3, &[("/proj/a", ChangeAction::Deleted)]),
            entry(4, &[("/proj/a", ChangeAction::Replaced)]),
        ]);
        assert_eq!(result.changed_files, vec!["/proj/c", "/proj/b", "/proj/a"]);
    }

    #[test]
    fn removal_uses_exact_path_equality() {
        let (result, _) = run(&[
            entry(1, &[("/proj/A.txt", ChangeAction::Added)]),
            entry(2, &[("/proj/a.txt", ChangeAction::Deleted)]),
        ]);
        assert_eq!(result.changed_files, vec!["/proj/A.txt"]);
        assert_eq!(result.deleted_files, set(&["/proj/a.txt"]));
    }

    #[test]
    fn no_entries_yield_empty_set() {
        let (result, _) = run(&[]);
        assert_eq!(result, ChangeSet::empty());
    }

    fn arb_action() -> impl Strategy<Value = ChangeAction> {
        prop_oneof![
            Just(ChangeAction::Added),
            Just(ChangeAction::Modified),
            Just(ChangeAction::Replaced),
            Just(ChangeAction::Deleted),
        ]
    }

    fn arb_entries() -> impl Strategy<Value = Vec<LogEntry>> {
        let path = prop_oneof![
            Just("/proj/a"),
            Just("/proj/b"),
            Just("/proj/dir/c"),
            Just("/other/d"),
        ];
        let change = (path, arb_action(), any::<bool>()).prop_map(|(path, action, is_dir)| {
            let kind = if is_dir { NodeKind::Directory } else { NodeKind::File };
            ChangedPath::new(path, action, kind)
        });
        prop::collection::vec(prop::collection::vec(change, 0..4), 0..12).prop_map(|revisions| {
            revisions
                .into_iter()
                .enumerate()
                .map(|(index, changes)| LogEntry::new(index as u64 + 1, changes))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn changed_and_deleted_are_disjoint(entries in arb_entries()) {
            let (result, _) = run(&entries);
            for path in &result.changed_files {
                prop_assert!(!result.deleted_files.contains(path));
            }
            let unique: HashSet<&String> = result.changed_files.iter().collect();
            prop_assert_eq!(unique.len(), result.changed_files.len());
            prop_assert!(result
                .changed_files
                .iter()
                .chain(result.deleted_files.iter())
                .all(|path| path.starts_with("/proj/")));
        }
    }
}
