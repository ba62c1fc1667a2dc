use derive_new::new;

/// The kind of operation an [`Edit`] run performs on sequence A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Equal run. Never materialized in a script; gaps between edits are
    /// implicit `None` runs.
    None,
    Insert,
    Delete,
    Change,
}

/// One contiguous run of an operation at an alignment point.
///
/// `start_a`/`start_b` always index the original, un-normalized sequences,
/// even when the matcher compared normalized keys. For an `Insert`,
/// `start_a` is the position in A the run is inserted before; for a
/// `Delete`, `start_b` is the position in B the run aligns with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Edit {
    pub kind: EditKind,
    pub start_a: usize,
    pub start_b: usize,
    pub length: usize,
}

impl Edit {
    /// Edit length where a `Change` counts double, since it stands for a
    /// paired delete and insert.
    pub fn weighted_length(&self) -> usize {
        match self.kind {
            EditKind::Change => 2 * self.length,
            _ => self.length,
        }
    }
}

/// Ordered list of edit runs transforming sequence A into sequence B,
/// plus a similarity measure over the two inputs.
///
/// Edits are ascending by `start_a` and by `start_b` and never overlap.
/// An empty script means the sequences are equal under the comparer that
/// produced it, and only then is `similarity` exactly `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct EditScript {
    edits: Vec<Edit>,
    similarity: f64,
}

impl EditScript {
    /// Builds a script from its runs and the two input lengths, deriving
    /// similarity from the total weighted edit length.
    pub fn new(edits: Vec<Edit>, len_a: usize, len_b: usize) -> Self {
        let combined = len_a + len_b;
        let total: usize = edits.iter().map(Edit::weighted_length).sum();
        let similarity = if combined == 0 {
            1.0
        } else {
            1.0 - total as f64 / combined as f64
        };

        EditScript { edits, similarity }
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Normalized measure in `[0, 1]` of how much of A equals B.
    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    pub fn total_edit_length(&self) -> usize {
        self.edits.iter().map(Edit::weighted_length).sum()
    }

    /// Run totals as `(inserts, deletes, changes)`.
    pub fn counts(&self) -> (usize, usize, usize) {
        self.edits.iter().fold((0, 0, 0), |(i, d, c), edit| {
            match edit.kind {
                EditKind::Insert => (i + edit.length, d, c),
                EditKind::Delete => (i, d + edit.length, c),
                EditKind::Change => (i, d, c + edit.length),
                EditKind::None => (i, d, c),
            }
        })
    }

    /// Start position (in A) of the first edit after `line`.
    pub fn next_edit_after(&self, line: usize) -> Option<usize> {
        self.edits
            .iter()
            .map(|edit| edit.start_a)
            .find(|&start| start > line)
    }

    /// Start position (in A) of the last edit before `line`.
    ///
    /// Returns the prior edit's start line, not its end line; navigation
    /// callers depend on landing at the top of the previous run.
    pub fn prev_edit_before(&self, line: usize) -> Option<usize> {
        self.edits
            .iter()
            .rev()
            .map(|edit| edit.start_a)
            .find(|&start| start < line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_script() -> EditScript {
        EditScript::new(
            vec![
                Edit::new(EditKind::Delete, 1, 1, 2),
                Edit::new(EditKind::Change, 5, 4, 1),
                Edit::new(EditKind::Insert, 9, 7, 3),
            ],
            10,
            10,
        )
    }

    #[test]
    fn change_counts_double_in_total_length() {
        let script = sample_script();
        assert_eq!(script.total_edit_length(), 2 + 2 + 3);
    }

    #[test]
    fn counts_split_by_kind() {
        let script = sample_script();
        assert_eq!(script.counts(), (3, 2, 1));
    }

    #[test]
    fn similarity_of_empty_script_is_one() {
        let script = EditScript::new(Vec::new(), 5, 5);
        assert!(script.is_empty());
        assert_eq!(script.similarity(), 1.0);
    }

    #[test]
    fn similarity_of_empty_inputs_is_one() {
        let script = EditScript::new(Vec::new(), 0, 0);
        assert_eq!(script.similarity(), 1.0);
    }

    #[test]
    fn similarity_stays_in_bounds() {
        let script = sample_script();
        assert!(script.similarity() > 0.0 && script.similarity() < 1.0);

        // Everything deleted, everything inserted.
        let disjoint = EditScript::new(
            vec![
                Edit::new(EditKind::Delete, 0, 0, 4),
                Edit::new(EditKind::Insert, 4, 0, 4),
            ],
            4,
            4,
        );
        assert_eq!(disjoint.similarity(), 0.0);
    }

    #[test]
    fn next_edit_skips_to_following_start() {
        let script = sample_script();
        assert_eq!(script.next_edit_after(1), Some(5));
        assert_eq!(script.next_edit_after(9), None);
    }

    #[test]
    fn prev_edit_returns_start_of_prior_run() {
        let script = sample_script();
        // The run starting at 1 spans two lines; navigation still lands on
        // its start, not its end.
        assert_eq!(script.prev_edit_before(5), Some(1));
        assert_eq!(script.prev_edit_before(1), None);
    }
}
