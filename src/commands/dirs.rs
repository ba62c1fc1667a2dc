use crate::dirdiff::entry::DirectoryDiffEntry;
use crate::dirdiff::walker::{DirDiffOptions, DirectoryTreeDiffer};
use colored::{ColoredString, Colorize};
use std::io::Write;
use std::path::Path;

/// Compares two directory trees and prints the result tree. Returns
/// whether any differences were found.
pub fn run(
    writer: &mut dyn Write,
    dir_a: &Path,
    dir_b: &Path,
    options: &DirDiffOptions,
) -> anyhow::Result<bool> {
    let results = DirectoryTreeDiffer::new(options).execute(dir_a, dir_b)?;

    writeln!(
        writer,
        "{}",
        format!("Comparing {} against {}", dir_a.display(), dir_b.display()).dimmed()
    )?;

    let mut stack: Vec<(&DirectoryDiffEntry, usize)> = results
        .root()
        .subentries
        .as_deref()
        .unwrap_or_default()
        .iter()
        .rev()
        .map(|entry| (entry, 0))
        .collect();

    while let Some((entry, depth)) = stack.pop() {
        writeln!(writer, "{}", render_entry(entry, depth))?;

        if let Some(subentries) = &entry.subentries {
            stack.extend(subentries.iter().rev().map(|sub| (sub, depth + 1)));
        }
    }

    let count = results.different_file_count();
    let summary = format!("{} differing file(s)", count);
    writeln!(
        writer,
        "{}",
        if count == 0 {
            summary.green().bold()
        } else {
            summary.yellow().bold()
        }
    )?;

    Ok(count > 0 || results.root().different)
}

fn render_entry(entry: &DirectoryDiffEntry, depth: usize) -> ColoredString {
    let suffix = if entry.is_file { "" } else { "/" };
    let note = entry
        .error
        .as_deref()
        .map(|error| format!("  ({})", error))
        .unwrap_or_default();
    let line = format!(
        "{}{} {}{}{}",
        "  ".repeat(depth),
        entry.status_char(),
        entry.name,
        suffix,
        note
    );

    match entry.status_char() {
        '!' => line.red().bold(),
        'A' => line.red(),
        'B' => line.green(),
        'M' => line.yellow(),
        _ => line.normal(),
    }
}
