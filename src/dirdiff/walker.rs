use crate::dirdiff::entry::{DirectoryDiffEntry, DirectoryDiffResults, local_time};
use crate::dirdiff::file_compare::{DEFAULT_TIME_PRECISION_SECS, DirFileMode, files_differ};
use crate::dirdiff::file_filter::FileFilter;
use crate::dirdiff::merge_index::merge_by_name;
use crate::dirdiff::ordering::name_cmp;
use anyhow::Context;
use derive_new::new;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Options for one directory tree comparison.
#[derive(Debug, Clone)]
pub struct DirDiffOptions {
    pub recursive: bool,
    pub show_only_in_a: bool,
    pub show_only_in_b: bool,
    pub show_different: bool,
    pub show_same: bool,
    /// Never flag directory nodes as different, regardless of children.
    pub ignore_directory_comparison: bool,
    pub file_filter: Option<FileFilter>,
    pub file_mode: DirFileMode,
    pub time_precision_secs: f64,
}

impl Default for DirDiffOptions {
    fn default() -> Self {
        DirDiffOptions {
            recursive: true,
            show_only_in_a: true,
            show_only_in_b: true,
            show_different: true,
            show_same: false,
            ignore_directory_comparison: false,
            file_filter: None,
            file_mode: DirFileMode::default(),
            time_precision_secs: DEFAULT_TIME_PRECISION_SECS,
        }
    }
}

/// Compares two directory trees level by level.
///
/// Each level merges the name-sorted subdirectory and file listings of
/// both sides; paired subdirectories recurse, one-sided entries are
/// unconditionally different, and file pairs run through the configured
/// file-compare mode. The traversal is an explicit work-stack DFS over
/// an index-addressed arena with a bottom-up pass bubbling `different`
/// from children to parents, so stack depth stays bounded and no node is
/// mutated through shared pointers.
#[derive(new)]
pub struct DirectoryTreeDiffer<'o> {
    options: &'o DirDiffOptions,
}

impl DirectoryTreeDiffer<'_> {
    pub fn execute(&self, dir_a: &Path, dir_b: &Path) -> anyhow::Result<DirectoryDiffResults> {
        self.execute_cancellable(dir_a, dir_b, &AtomicBool::new(false))
    }

    /// Like [`execute`](Self::execute) but checks `cancel` at every
    /// per-entry iteration boundary. A cancelled run fails; partial
    /// results are never returned.
    pub fn execute_cancellable(
        &self,
        dir_a: &Path,
        dir_b: &Path,
        cancel: &AtomicBool,
    ) -> anyhow::Result<DirectoryDiffResults> {
        let root_a = canonical_dir(dir_a)?;
        let root_b = canonical_dir(dir_b)?;

        // Comparing a directory to itself: content checks are pointless.
        let skip_byte_compare = root_a == root_b;
        if skip_byte_compare {
            debug!("both roots resolve to {}, skipping byte comparisons", root_a.display());
        }

        let mut arena = vec![Node::root()];
        let mut stack = vec![WorkItem {
            node: 0,
            dir_a: root_a,
            dir_b: root_b,
            rel: PathBuf::new(),
        }];

        while let Some(item) = stack.pop() {
            self.check_cancelled(cancel)?;
            self.expand(&mut arena, &mut stack, item, skip_byte_compare, cancel)?;
        }

        bubble_differences(&mut arena, self.options.ignore_directory_comparison);
        let root = materialize(arena);
        let different_files = collect_different_files(&root);

        Ok(DirectoryDiffResults::new(root, different_files))
    }

    fn expand(
        &self,
        arena: &mut Vec<Node>,
        stack: &mut Vec<WorkItem>,
        item: WorkItem,
        skip_byte_compare: bool,
        cancel: &AtomicBool,
    ) -> anyhow::Result<()> {
        arena[item.node].expanded = true;

        let listed = list_level(&item.dir_a).and_then(|a| Ok((a, list_level(&item.dir_b)?)));
        let ((dirs_a, files_a), (dirs_b, files_b)) = match listed {
            Ok(listings) => listings,
            // The root must be listable; deeper failures stay local to
            // their node.
            Err(e) if item.node == 0 => return Err(e),
            Err(e) => {
                let node = &mut arena[item.node];
                node.error = Some(e.to_string());
                node.different = true;
                return Ok(());
            }
        };

        for (sub_a, sub_b) in merge_by_name(&dirs_a, &dirs_b, |e: &FsEntry| e.name.as_str()) {
            self.check_cancelled(cancel)?;

            let in_a = sub_a.is_some();
            let in_b = sub_b.is_some();
            if !self.include_one_sided(in_a, in_b) {
                continue;
            }

            let child = Node::from_pair(sub_a, sub_b, &item.rel, false);
            let name = child.name.clone();
            let idx = push_child(arena, item.node, child);

            if let (Some(a), Some(b)) = (sub_a, sub_b)
                && self.options.recursive
            {
                stack.push(WorkItem {
                    node: idx,
                    dir_a: a.path.clone(),
                    dir_b: b.path.clone(),
                    rel: item.rel.join(&name),
                });
            }
        }

        let files_a = self.filter_files(files_a);
        let files_b = self.filter_files(files_b);

        for (file_a, file_b) in merge_by_name(&files_a, &files_b, |e: &FsEntry| e.name.as_str()) {
            self.check_cancelled(cancel)?;

            let in_a = file_a.is_some();
            let in_b = file_b.is_some();

            if let (Some(a), Some(b)) = (file_a, file_b) {
                let mut child = Node::from_pair(file_a, file_b, &item.rel, true);
                match files_differ(
                    &a.path,
                    &b.path,
                    self.options.file_mode,
                    self.options.time_precision_secs,
                    skip_byte_compare,
                ) {
                    Ok(different) => child.different = different,
                    Err(e) => {
                        child.error = Some(e.to_string());
                        child.different = true;
                    }
                }

                let include = if child.different {
                    self.options.show_different
                } else {
                    self.options.show_same
                };
                if include {
                    push_child(arena, item.node, child);
                }
            } else if self.include_one_sided(in_a, in_b) {
                push_child(arena, item.node, Node::from_pair(file_a, file_b, &item.rel, true));
            }
        }

        Ok(())
    }

    fn include_one_sided(&self, in_a: bool, in_b: bool) -> bool {
        match (in_a, in_b) {
            (true, false) => self.options.show_only_in_a,
            (false, true) => self.options.show_only_in_b,
            _ => true,
        }
    }

    fn filter_files(&self, files: Vec<FsEntry>) -> Vec<FsEntry> {
        match &self.options.file_filter {
            Some(filter) => filter.apply(files, |e: &FsEntry| e.name.as_str()),
            None => files,
        }
    }

    fn check_cancelled(&self, cancel: &AtomicBool) -> anyhow::Result<()> {
        if cancel.load(Ordering::Relaxed) {
            anyhow::bail!("Directory comparison cancelled");
        }
        Ok(())
    }
}

/// Snapshot of one file-system entry, read once at listing time.
#[derive(Debug, Clone)]
struct FsEntry {
    name: String,
    path: PathBuf,
    length: u64,
    modified: Option<SystemTime>,
}

struct WorkItem {
    node: usize,
    dir_a: PathBuf,
    dir_b: PathBuf,
    rel: PathBuf,
}

#[derive(Debug)]
struct Node {
    name: String,
    base_path: PathBuf,
    is_file: bool,
    in_a: bool,
    in_b: bool,
    different: bool,
    error: Option<String>,
    last_update_a: Option<SystemTime>,
    last_update_b: Option<SystemTime>,
    length_a: Option<u64>,
    length_b: Option<u64>,
    children: Vec<usize>,
    expanded: bool,
}

impl Node {
    fn root() -> Self {
        Node {
            name: String::new(),
            base_path: PathBuf::new(),
            is_file: false,
            in_a: true,
            in_b: true,
            different: false,
            error: None,
            last_update_a: None,
            last_update_b: None,
            length_a: None,
            length_b: None,
            children: Vec::new(),
            expanded: false,
        }
    }

    fn from_pair(a: Option<&FsEntry>, b: Option<&FsEntry>, rel: &Path, is_file: bool) -> Self {
        let present = a.or(b).expect("merge rows always have at least one side");

        Node {
            name: present.name.clone(),
            base_path: rel.to_path_buf(),
            is_file,
            in_a: a.is_some(),
            in_b: b.is_some(),
            // One-sided entries are different by definition.
            different: a.is_some() != b.is_some(),
            error: None,
            last_update_a: a.and_then(|e| e.modified),
            last_update_b: b.and_then(|e| e.modified),
            length_a: a.map(|e| e.length).filter(|_| is_file),
            length_b: b.map(|e| e.length).filter(|_| is_file),
            children: Vec::new(),
            expanded: false,
        }
    }
}

fn canonical_dir(dir: &Path) -> anyhow::Result<PathBuf> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }
    std::fs::canonicalize(dir).with_context(|| format!("Failed to resolve {}", dir.display()))
}

/// One-level listing split into name-sorted subdirectories and files.
fn list_level(dir: &Path) -> anyhow::Result<(Vec<FsEntry>, Vec<FsEntry>)> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let metadata = entry
            .metadata()
            .with_context(|| format!("Failed to stat {}", entry.path().display()))?;

        let fs_entry = FsEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
            length: metadata.len(),
            modified: metadata.modified().ok(),
        };

        if metadata.is_dir() {
            dirs.push(fs_entry);
        } else {
            files.push(fs_entry);
        }
    }

    dirs.sort_by(|x, y| name_cmp(&x.name, &y.name));
    files.sort_by(|x, y| name_cmp(&x.name, &y.name));

    Ok((dirs, files))
}

fn push_child(arena: &mut Vec<Node>, parent: usize, child: Node) -> usize {
    let idx = arena.len();
    arena.push(child);
    arena[parent].children.push(idx);
    idx
}

/// Bottom-up pass bubbling `different` from children to parents.
/// Children always sit at higher arena indices than their parent, so a
/// single reverse sweep sees every child before its parent.
fn bubble_differences(arena: &mut [Node], ignore_directory_comparison: bool) {
    for idx in (0..arena.len()).rev() {
        if arena[idx].is_file {
            continue;
        }

        if ignore_directory_comparison {
            arena[idx].different = false;
        } else {
            let child_different = arena[idx]
                .children
                .iter()
                .any(|&child| arena[child].different);
            arena[idx].different = arena[idx].different || child_different;
        }
    }
}

/// Converts the arena into the owned entry tree without recursion:
/// walking indices in reverse lets every node collect its already-built
/// children.
fn materialize(mut arena: Vec<Node>) -> DirectoryDiffEntry {
    let mut slots: Vec<Option<DirectoryDiffEntry>> = arena.iter().map(|_| None).collect();

    for idx in (0..arena.len()).rev() {
        let children = std::mem::take(&mut arena[idx].children);
        let subentries = if arena[idx].is_file || !arena[idx].expanded {
            None
        } else {
            Some(
                children
                    .into_iter()
                    .map(|child| slots[child].take().expect("children resolve before parents"))
                    .collect(),
            )
        };

        let node = &mut arena[idx];
        slots[idx] = Some(DirectoryDiffEntry {
            name: std::mem::take(&mut node.name),
            base_path: std::mem::take(&mut node.base_path),
            is_file: node.is_file,
            in_a: node.in_a,
            in_b: node.in_b,
            different: node.different,
            error: node.error.take(),
            last_update_a: local_time(node.last_update_a),
            last_update_b: local_time(node.last_update_b),
            length_a: node.length_a,
            length_b: node.length_b,
            subentries,
        });
    }

    slots[0].take().expect("arena always holds the root")
}

fn collect_different_files(root: &DirectoryDiffEntry) -> Vec<PathBuf> {
    let mut different = Vec::new();
    let mut stack = vec![root];

    while let Some(entry) = stack.pop() {
        if entry.is_file && entry.different {
            different.push(entry.relative_path());
        }
        if let Some(subentries) = &entry.subentries {
            stack.extend(subentries.iter().rev());
        }
    }

    different
}
