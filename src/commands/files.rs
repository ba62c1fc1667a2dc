use crate::diff::line::DiffLine;
use crate::diff::script::EditKind;
use crate::diff::text::{DiffOptions, TextDiffResult, diff_files};
use colored::Colorize;
use std::io::Write;
use std::path::Path;

/// Compares two files and prints the edit script. Returns whether the
/// inputs differ.
pub fn run(
    writer: &mut dyn Write,
    path_a: &Path,
    path_b: &Path,
    options: &DiffOptions,
) -> anyhow::Result<bool> {
    let Some(result) = diff_files(path_a, path_b, options)? else {
        writeln!(
            writer,
            "{}",
            format!(
                "Skipped: {} or {} does not exist",
                path_a.display(),
                path_b.display()
            )
            .yellow()
        )?;
        return Ok(false);
    };

    print_result(writer, &result)?;
    Ok(!result.script.is_empty())
}

fn print_result(writer: &mut dyn Write, result: &TextDiffResult) -> anyhow::Result<()> {
    writeln!(
        writer,
        "{}",
        format!("Comparing as {}", result.kind.as_str()).dimmed()
    )?;

    if result.script.is_empty() {
        writeln!(writer, "{}", "Inputs are identical".green())?;
        return Ok(());
    }

    for edit in result.script.edits() {
        match edit.kind {
            EditKind::Delete => {
                print_side(writer, &result.lines_a, edit.start_a, edit.length, '-')?;
            }
            EditKind::Insert => {
                print_side(writer, &result.lines_b, edit.start_b, edit.length, '+')?;
            }
            EditKind::Change => {
                print_side(writer, &result.lines_a, edit.start_a, edit.length, '-')?;
                print_side(writer, &result.lines_b, edit.start_b, edit.length, '+')?;
            }
            EditKind::None => {}
        }
    }

    let (inserts, deletes, changes) = result.script.counts();
    writeln!(
        writer,
        "{}",
        format!(
            "{} inserted, {} deleted, {} changed, similarity {:.1}%",
            inserts,
            deletes,
            changes,
            result.script.similarity() * 100.0
        )
        .bold()
    )?;

    Ok(())
}

fn print_side(
    writer: &mut dyn Write,
    lines: &[DiffLine],
    start: usize,
    length: usize,
    marker: char,
) -> anyhow::Result<()> {
    for (offset, line) in lines.iter().skip(start).take(length).enumerate() {
        let text = format!("{:>5} {} {}", start + offset + 1, marker, line.render());
        let colored = match marker {
            '-' => text.red(),
            _ => text.green(),
        };
        writeln!(writer, "{}", colored)?;
    }
    Ok(())
}
