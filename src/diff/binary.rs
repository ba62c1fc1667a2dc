//! Byte-level binary diffing
//!
//! Computes an add/copy description of how to rebuild stream B out of
//! stream A at a configurable block granularity (the footprint), then
//! re-expresses that description as synthetic chunk lines so the same
//! sequence matcher and rendering path used for text works on binary
//! content unmodified.

use crate::diff::line::DiffLine;
use log::debug;
use std::collections::HashMap;

/// Default block granularity for binary matching.
pub const DEFAULT_FOOTPRINT_LENGTH: usize = 8;

/// One operation rebuilding B from A: either a run copied out of A or a
/// run of bytes taken from B itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Copy { a_offset: usize, length: usize },
    Add { b_offset: usize, length: usize },
}

/// Computes the add/copy list for rebuilding `b` from `a`.
///
/// A footprint table indexes every aligned block of `a`; `b` is scanned
/// byte by byte, and each table hit is extended forward as far as the
/// streams agree. Total: any two inputs produce a valid op list.
pub fn binary_diff(a: &[u8], b: &[u8], footprint_length: usize) -> Vec<BinaryOp> {
    let footprint = footprint_length.max(1);

    let mut table: HashMap<&[u8], Vec<usize>> = HashMap::new();
    if a.len() >= footprint {
        for start in (0..=a.len() - footprint).step_by(footprint) {
            table.entry(&a[start..start + footprint]).or_default().push(start);
        }
    }

    let mut ops = Vec::new();
    let mut pos = 0usize;
    let mut pending_add = 0usize;

    while pos + footprint <= b.len() {
        let window = &b[pos..pos + footprint];
        let matched = table.get(window).map(|candidates| {
            candidates
                .iter()
                .map(|&start| (start, common_run(&a[start..], &b[pos..])))
                .max_by_key(|&(_, length)| length)
                .unwrap()
        });

        match matched {
            Some((a_offset, length)) if length >= footprint => {
                if pending_add < pos {
                    ops.push(BinaryOp::Add {
                        b_offset: pending_add,
                        length: pos - pending_add,
                    });
                }
                ops.push(BinaryOp::Copy { a_offset, length });
                pos += length;
                pending_add = pos;
            }
            _ => pos += 1,
        }
    }

    if pending_add < b.len() {
        ops.push(BinaryOp::Add {
            b_offset: pending_add,
            length: b.len() - pending_add,
        });
    }

    debug!(
        "binary diff: {} bytes vs {} bytes -> {} ops (footprint {})",
        a.len(),
        b.len(),
        ops.len(),
        footprint
    );

    ops
}

fn common_run(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Expands the op list into synthetic chunk lines for both sides.
///
/// Copied regions chunk identically on both sides, so the matcher aligns
/// them; bytes of A skipped over by the copy walk appear only on the A
/// side, added bytes only on the B side. Copies reaching back before the
/// current position in A emit B-side lines only, since those bytes are
/// already present on the A side.
pub fn binary_diff_lines(
    a: &[u8],
    b: &[u8],
    ops: &[BinaryOp],
    footprint_length: usize,
) -> (Vec<DiffLine>, Vec<DiffLine>) {
    let footprint = footprint_length.max(1);
    let mut lines_a = Vec::new();
    let mut lines_b = Vec::new();
    let mut a_pos = 0usize;
    let mut b_pos = 0usize;

    for op in ops {
        match *op {
            BinaryOp::Copy { a_offset, length } => {
                if a_offset >= a_pos {
                    push_chunks(&mut lines_a, &a[a_pos..a_offset], a_pos, footprint);
                    push_chunks(&mut lines_a, &a[a_offset..a_offset + length], a_offset, footprint);
                    a_pos = a_offset + length;
                }
                push_chunks(&mut lines_b, &b[b_pos..b_pos + length], b_pos, footprint);
                b_pos += length;
            }
            BinaryOp::Add { b_offset, length } => {
                push_chunks(&mut lines_b, &b[b_offset..b_offset + length], b_offset, footprint);
                b_pos = b_offset + length;
            }
        }
    }

    push_chunks(&mut lines_a, &a[a_pos..], a_pos, footprint);

    (lines_a, lines_b)
}

fn push_chunks(lines: &mut Vec<DiffLine>, bytes: &[u8], start_offset: usize, footprint: usize) {
    for (i, chunk) in bytes.chunks(footprint).enumerate() {
        let offset = (start_offset + i * footprint) as u64;
        lines.push(DiffLine::binary_chunk(offset, chunk.to_vec()));
    }
}
