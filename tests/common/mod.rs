#![allow(dead_code)]

use sidediff::diff::script::{EditKind, EditScript};

/// Replays an edit script against sequence A, producing the sequence the
/// script claims B to be. Gaps between edits are implicit equal runs.
pub fn apply_edit_script<T: Clone>(a: &[T], b: &[T], script: &EditScript) -> Vec<T> {
    let mut rebuilt = Vec::new();
    let mut position = 0usize;

    for edit in script.edits() {
        rebuilt.extend_from_slice(&a[position..edit.start_a]);

        match edit.kind {
            EditKind::Delete => {
                position = edit.start_a + edit.length;
            }
            EditKind::Insert => {
                rebuilt.extend_from_slice(&b[edit.start_b..edit.start_b + edit.length]);
                position = edit.start_a;
            }
            EditKind::Change => {
                rebuilt.extend_from_slice(&b[edit.start_b..edit.start_b + edit.length]);
                position = edit.start_a + edit.length;
            }
            EditKind::None => {}
        }
    }

    rebuilt.extend_from_slice(&a[position..]);
    rebuilt
}
