use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::time::SystemTime;

/// One node of the comparison result tree.
///
/// `base_path` is the node's parent directory relative to the compared
/// roots; `base_path.join(name)` locates the entry under either root.
/// `different` is true whenever the entry exists on one side only, and
/// for files whenever the active file-compare mode flagged them.
/// Directory nodes inherit `different` from their children unless
/// directory comparison is ignored, in which case they are never
/// flagged. `subentries` is populated only for expanded directory nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryDiffEntry {
    pub name: String,
    pub base_path: PathBuf,
    pub is_file: bool,
    pub in_a: bool,
    pub in_b: bool,
    pub different: bool,
    pub error: Option<String>,
    pub last_update_a: Option<DateTime<Local>>,
    pub last_update_b: Option<DateTime<Local>>,
    pub length_a: Option<u64>,
    pub length_b: Option<u64>,
    pub subentries: Option<Vec<DirectoryDiffEntry>>,
}

impl DirectoryDiffEntry {
    pub fn relative_path(&self) -> PathBuf {
        self.base_path.join(&self.name)
    }

    pub fn status_char(&self) -> char {
        if self.error.is_some() {
            '!'
        } else if self.in_a && !self.in_b {
            'A'
        } else if self.in_b && !self.in_a {
            'B'
        } else if self.different {
            'M'
        } else {
            '='
        }
    }
}

pub(crate) fn local_time(time: Option<SystemTime>) -> Option<DateTime<Local>> {
    time.map(DateTime::<Local>::from)
}

/// Immutable snapshot of one directory comparison: the root entry tree
/// plus a flat list of the differing files, in tree order. Built once
/// per invocation and never mutated afterwards, so it can be shared
/// freely across threads for read-only consumption.
#[derive(Debug, Clone)]
pub struct DirectoryDiffResults {
    root: DirectoryDiffEntry,
    different_files: Vec<PathBuf>,
}

impl DirectoryDiffResults {
    pub(crate) fn new(root: DirectoryDiffEntry, different_files: Vec<PathBuf>) -> Self {
        DirectoryDiffResults {
            root,
            different_files,
        }
    }

    pub fn root(&self) -> &DirectoryDiffEntry {
        &self.root
    }

    /// Relative paths of every file entry flagged as different.
    pub fn different_files(&self) -> &[PathBuf] {
        &self.different_files
    }

    pub fn different_file_count(&self) -> usize {
        self.different_files.len()
    }
}
