//! Text and file diff pipeline
//!
//! Turns two logical inputs (file paths or raw strings) into comparable
//! line sequences and runs the sequence matcher over them. The compare
//! type drives a cascade: binary content goes through the chunk differ,
//! XML is normalized first so structurally equivalent documents compare
//! line-equal, and everything else is split into plain text lines.
//! Comparison keys are normalized per the active options; the retained
//! line content is never touched.

use crate::diff::binary::{binary_diff, binary_diff_lines};
use crate::diff::classifier::{self, ContentKind};
use crate::diff::line::DiffLine;
use crate::diff::script::EditScript;
use crate::diff::sequence_matcher::{DiffAlgorithm, SequenceMatcher};
use crate::diff::xml::normalize_xml;
use anyhow::Context;
use log::debug;
use std::path::Path;

/// Which comparison strategy to force, or `Auto` to let the classifier
/// cascade decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareType {
    #[default]
    Auto,
    Text,
    Xml,
    Binary,
}

impl CompareType {
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(CompareType::Auto),
            "text" => Some(CompareType::Text),
            "xml" => Some(CompareType::Xml),
            "binary" => Some(CompareType::Binary),
            _ => None,
        }
    }
}

/// Options for a single text/file comparison. Normalization options act
/// on comparison keys only.
#[derive(Debug, Clone)]
pub struct DiffOptions {
    pub compare_type: CompareType,
    pub ignore_case: bool,
    pub ignore_text_whitespace: bool,
    pub ignore_xml_whitespace: bool,
    /// Disables change-run grouping, forcing pure insert/delete output.
    pub show_change_as_delete_insert: bool,
    pub binary_footprint_length: usize,
    /// Used for display-column math only, never for comparison.
    pub spaces_per_tab: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions {
            compare_type: CompareType::Auto,
            ignore_case: false,
            ignore_text_whitespace: false,
            ignore_xml_whitespace: false,
            show_change_as_delete_insert: false,
            binary_footprint_length: crate::diff::binary::DEFAULT_FOOTPRINT_LENGTH,
            spaces_per_tab: 4,
        }
    }
}

/// The outcome of one comparison: both retained line sequences, the edit
/// script between them, and the strategy that was actually applied.
#[derive(Debug, Clone)]
pub struct TextDiffResult {
    pub lines_a: Vec<DiffLine>,
    pub lines_b: Vec<DiffLine>,
    pub script: EditScript,
    pub kind: ContentKind,
}

/// Compares two files. Returns `Ok(None)` when either path does not
/// exist; the comparison is skipped rather than failed.
pub fn diff_files(
    path_a: &Path,
    path_b: &Path,
    options: &DiffOptions,
) -> anyhow::Result<Option<TextDiffResult>> {
    if !path_a.exists() || !path_b.exists() {
        debug!(
            "skipping comparison, missing input: {} / {}",
            path_a.display(),
            path_b.display()
        );
        return Ok(None);
    }

    let bytes_a = std::fs::read(path_a)
        .with_context(|| format!("Failed to read {}", path_a.display()))?;
    let bytes_b = std::fs::read(path_b)
        .with_context(|| format!("Failed to read {}", path_b.display()))?;

    diff_bytes(&bytes_a, &bytes_b, options).map(Some)
}

/// Compares two in-memory strings through the same cascade as files.
pub fn diff_strings(a: &str, b: &str, options: &DiffOptions) -> anyhow::Result<TextDiffResult> {
    diff_bytes(a.as_bytes(), b.as_bytes(), options)
}

fn diff_bytes(
    bytes_a: &[u8],
    bytes_b: &[u8],
    options: &DiffOptions,
) -> anyhow::Result<TextDiffResult> {
    let force_binary = options.compare_type == CompareType::Binary;
    let auto_binary = options.compare_type == CompareType::Auto
        && (classifier::is_binary_bytes(bytes_a) || classifier::is_binary_bytes(bytes_b));

    if force_binary || auto_binary {
        return Ok(diff_binary(bytes_a, bytes_b, options));
    }

    let text_a = String::from_utf8_lossy(bytes_a);
    let text_b = String::from_utf8_lossy(bytes_b);

    diff_decoded(&text_a, &text_b, options)
}

fn diff_binary(bytes_a: &[u8], bytes_b: &[u8], options: &DiffOptions) -> TextDiffResult {
    let footprint = options.binary_footprint_length;
    let ops = binary_diff(bytes_a, bytes_b, footprint);
    let (lines_a, lines_b) = binary_diff_lines(bytes_a, bytes_b, &ops, footprint);

    // Case and whitespace options are meaningless for raw bytes; chunk
    // keys are compared as-is.
    let script = match_lines(&lines_a, &lines_b, options);

    TextDiffResult {
        lines_a,
        lines_b,
        script,
        kind: ContentKind::Binary,
    }
}

fn diff_decoded(
    text_a: &str,
    text_b: &str,
    options: &DiffOptions,
) -> anyhow::Result<TextDiffResult> {
    if matches!(options.compare_type, CompareType::Xml | CompareType::Auto) {
        match try_xml(text_a, text_b, options) {
            Ok(Some(result)) => return Ok(result),
            Ok(None) => debug!("auto mode: not well-formed XML, comparing as plain text"),
            Err(e) => return Err(e),
        }
    }

    let lines_a = text_lines(text_a, options);
    let lines_b = text_lines(text_b, options);
    let script = match_lines(&lines_a, &lines_b, options);

    Ok(TextDiffResult {
        lines_a,
        lines_b,
        script,
        kind: ContentKind::Text,
    })
}

/// Attempts the XML strategy. Each side is parsed at most once: when side
/// A fails in auto mode, side B is never touched. In forced XML mode a
/// parse failure names the failing side.
fn try_xml(
    text_a: &str,
    text_b: &str,
    options: &DiffOptions,
) -> anyhow::Result<Option<TextDiffResult>> {
    let forced = options.compare_type == CompareType::Xml;
    let strip = options.ignore_xml_whitespace;

    let normalized_a = match normalize_xml(text_a, strip) {
        Ok(lines) => lines,
        Err(e) if forced => return Err(e.context("left input is not well-formed XML")),
        Err(_) => return Ok(None),
    };
    let normalized_b = match normalize_xml(text_b, strip) {
        Ok(lines) => lines,
        Err(e) if forced => return Err(e.context("right input is not well-formed XML")),
        Err(_) => return Ok(None),
    };

    let lines_a = owned_lines(normalized_a, options);
    let lines_b = owned_lines(normalized_b, options);
    let script = match_lines(&lines_a, &lines_b, options);

    Ok(Some(TextDiffResult {
        lines_a,
        lines_b,
        script,
        kind: ContentKind::Xml,
    }))
}

fn match_lines(lines_a: &[DiffLine], lines_b: &[DiffLine], options: &DiffOptions) -> EditScript {
    SequenceMatcher::new(
        lines_a,
        lines_b,
        |x: &DiffLine, y: &DiffLine| x.key() == y.key(),
        !options.show_change_as_delete_insert,
    )
    .script()
}

/// Splits text into lines without losing content: every character belongs
/// to exactly one line, minus the `\n`/`\r\n` terminators themselves.
fn text_lines(text: &str, options: &DiffOptions) -> Vec<DiffLine> {
    if text.is_empty() {
        return Vec::new();
    }

    // A trailing terminator would otherwise yield a phantom empty line.
    let body = text.strip_suffix('\n').unwrap_or(text);
    body.split('\n')
        .map(|raw| raw.strip_suffix('\r').unwrap_or(raw))
        .map(|raw| line_from(raw.to_string(), options))
        .collect()
}

fn owned_lines(lines: Vec<String>, options: &DiffOptions) -> Vec<DiffLine> {
    lines
        .into_iter()
        .map(|line| line_from(line, options))
        .collect()
}

fn line_from(raw: String, options: &DiffOptions) -> DiffLine {
    DiffLine::text(raw, options.ignore_case, options.ignore_text_whitespace)
}

/// Character-level diff of one line pair, for rendering the interior of a
/// changed line. Runs on demand so the common case stays linear in the
/// number of lines; the same normalization as the line comparison
/// applies.
pub fn intra_line_diff(
    line_a: &DiffLine,
    line_b: &DiffLine,
    options: &DiffOptions,
) -> EditScript {
    let chars_a: Vec<char> = line_a.key().chars().collect();
    let chars_b: Vec<char> = line_b.key().chars().collect();

    SequenceMatcher::new(
        &chars_a,
        &chars_b,
        |x: &char, y: &char| x == y,
        !options.show_change_as_delete_insert,
    )
    .script()
}
