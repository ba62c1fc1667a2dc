use crate::diff::script::{Edit, EditKind, EditScript};
use derive_new::new;

/// A diff algorithm over two sequences, split into its classic phases:
/// a forward pass recording per-distance frontiers, a backtrack pass
/// recovering the edit path, and a final conversion into an edit script.
pub trait DiffAlgorithm {
    type Trace;
    type EditPath;

    fn compute_shortest_edit(&self) -> Self::Trace;
    fn backtrack(&self) -> Self::EditPath;
    fn script(&self) -> EditScript;
}

/// Greedy O((N+M)·D) Myers diff over diagonals `k = x - y`.
///
/// Equivalence is decided by the caller-supplied predicate, never by raw
/// value equality; callers compare normalized keys while the emitted edit
/// indices keep pointing into the original slices. When `group_changes`
/// is set, an adjacent delete/insert run pair of equal length at one
/// alignment point is reported as a single `Change` run.
#[derive(new)]
pub struct SequenceMatcher<'d, T, E>
where
    E: Fn(&T, &T) -> bool,
{
    a: &'d [T],
    b: &'d [T],
    equivalent: E,
    group_changes: bool,
}

/// One raw step of the edit path: `(kind, a_index, b_index)` where the
/// indices are the positions the step consumed (or aligned with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Equal,
    Insert,
    Delete,
}

impl<'d, T, E> DiffAlgorithm for SequenceMatcher<'d, T, E>
where
    E: Fn(&T, &T) -> bool,
{
    type Trace = Vec<Vec<isize>>;
    type EditPath = Vec<(isize, isize, isize, isize)>;

    fn compute_shortest_edit(&self) -> Self::Trace {
        let (n, m) = (self.a.len() as isize, self.b.len() as isize);
        let offset = (n + m) as usize;

        let mut v = vec![0; 2 * offset + 1];
        let mut trace = Vec::new();

        if offset == 0 {
            // both sequences empty, the end point is already reached
            trace.push(v);
            return trace;
        }

        for d in 0..=(n + m) {
            trace.push(v.clone());

            for k in (-d..=d).step_by(2) {
                let idx = (offset as isize + k) as usize;

                let mut x = if k == -d {
                    // we could have only come from k+1, thus an insertion
                    v[idx + 1]
                } else if k == d {
                    // we could have only come from k-1, thus a deletion
                    v[idx - 1] + 1
                } else {
                    // we could have come from either k-1 (deletion) or k+1 (insertion)
                    let x_del = v[idx - 1] + 1;
                    let x_ins = v[idx + 1];
                    if x_del > x_ins { x_del } else { x_ins }
                };

                let mut y = x - k;
                while x < n
                    && y < m
                    && (self.equivalent)(&self.a[x as usize], &self.b[y as usize])
                {
                    // snake
                    x += 1;
                    y += 1;
                }

                v[idx] = x;

                if x >= n && y >= m {
                    return trace;
                }
            }
        }

        trace
    }

    fn backtrack(&self) -> Self::EditPath {
        let (mut x, mut y) = (self.a.len() as isize, self.b.len() as isize);
        let offset = (x + y) as usize;
        let mut edit_path = Vec::new();

        if offset == 0 {
            return edit_path;
        }

        let trace = self.compute_shortest_edit();

        for (d, v) in trace.iter().enumerate().rev() {
            let k = x - y;

            let prev_k = if k == -(d as isize) {
                k + 1
            } else if k == (d as isize) {
                k - 1
            } else {
                let k_del = k - 1;
                let k_ins = k + 1;
                if v[(offset as isize + k_del) as usize] + 1 > v[(offset as isize + k_ins) as usize]
                {
                    k_del
                } else {
                    k_ins
                }
            };

            let prev_x = v[(offset as isize + prev_k) as usize];
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                edit_path.push((x - 1, y - 1, x, y));
                x -= 1;
                y -= 1;
            }

            if d > 0 {
                edit_path.push((prev_x, prev_y, x, y));
            }

            (x, y) = (prev_x, prev_y);
        }

        edit_path
    }

    fn script(&self) -> EditScript {
        let steps = self.steps();
        let runs = self.coalesce(&steps);
        let edits = if self.group_changes {
            group_changes(runs)
        } else {
            runs
        };

        EditScript::new(edits, self.a.len(), self.b.len())
    }
}

impl<'d, T, E> SequenceMatcher<'d, T, E>
where
    E: Fn(&T, &T) -> bool,
{
    /// Edit path re-read in forward order as a stream of positioned steps.
    fn steps(&self) -> Vec<(Step, usize, usize)> {
        let mut path = self.backtrack();
        path.reverse();

        let mut steps = Vec::with_capacity(path.len());
        let (mut ai, mut bi) = (0usize, 0usize);

        for (prev_x, prev_y, x, y) in path {
            if x == prev_x {
                // only y increased
                if prev_y < self.b.len() as isize {
                    steps.push((Step::Insert, ai, bi));
                    bi += 1;
                }
            } else if y == prev_y {
                // only x increased
                if prev_x < self.a.len() as isize {
                    steps.push((Step::Delete, ai, bi));
                    ai += 1;
                }
            } else {
                // diagonal move
                if prev_x < self.a.len() as isize {
                    steps.push((Step::Equal, ai, bi));
                    ai += 1;
                    bi += 1;
                }
            }
        }

        steps
    }

    /// Coalesces consecutive same-kind steps into single runs. Equal steps
    /// are dropped; they stay implicit in the script.
    fn coalesce(&self, steps: &[(Step, usize, usize)]) -> Vec<Edit> {
        let mut runs: Vec<Edit> = Vec::new();

        for &(step, ai, bi) in steps {
            let kind = match step {
                Step::Equal => continue,
                Step::Insert => EditKind::Insert,
                Step::Delete => EditKind::Delete,
            };

            match runs.last_mut() {
                Some(run)
                    if run.kind == kind
                        && run.start_a + run_a_extent(run) == ai
                        && run.start_b + run_b_extent(run) == bi =>
                {
                    run.length += 1;
                }
                _ => runs.push(Edit::new(kind, ai, bi, 1)),
            }
        }

        runs
    }
}

fn run_a_extent(run: &Edit) -> usize {
    match run.kind {
        EditKind::Insert => 0,
        _ => run.length,
    }
}

fn run_b_extent(run: &Edit) -> usize {
    match run.kind {
        EditKind::Delete => 0,
        _ => run.length,
    }
}

/// Merges adjacent delete/insert run pairs of equal length into `Change`
/// runs. Two runs are adjacent only when no equal run separates them,
/// which is visible in their positions alone.
fn group_changes(runs: Vec<Edit>) -> Vec<Edit> {
    let mut grouped: Vec<Edit> = Vec::with_capacity(runs.len());

    for run in runs {
        let paired = match grouped.last() {
            Some(prev) => match (prev.kind, run.kind) {
                (EditKind::Delete, EditKind::Insert) => {
                    prev.length == run.length
                        && run.start_a == prev.start_a + prev.length
                        && run.start_b == prev.start_b
                }
                (EditKind::Insert, EditKind::Delete) => {
                    prev.length == run.length
                        && run.start_a == prev.start_a
                        && run.start_b == prev.start_b + prev.length
                }
                _ => false,
            },
            None => false,
        };

        if paired {
            let prev = grouped.pop().unwrap();
            let (start_a, start_b) = match prev.kind {
                EditKind::Delete => (prev.start_a, run.start_b),
                _ => (run.start_a, prev.start_b),
            };
            grouped.push(Edit::new(EditKind::Change, start_a, start_b, run.length));
        } else {
            grouped.push(run);
        }
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn diff<T: Eq>(a: &[T], b: &[T], group_changes: bool) -> EditScript {
        SequenceMatcher::new(a, b, |x: &T, y: &T| x == y, group_changes).script()
    }

    #[fixture]
    fn string_inputs() -> (Vec<char>, Vec<char>) {
        ("abcabba".chars().collect(), "cbabac".chars().collect())
    }

    #[rstest]
    fn classic_myers_example_produces_minimal_runs(string_inputs: (Vec<char>, Vec<char>)) {
        let (a, b) = string_inputs;
        let script = diff(&a, &b, false);

        let expected = vec![
            Edit::new(EditKind::Delete, 0, 0, 2),
            Edit::new(EditKind::Insert, 3, 1, 1),
            Edit::new(EditKind::Delete, 5, 4, 1),
            Edit::new(EditKind::Insert, 7, 5, 1),
        ];
        assert_eq!(script.edits(), &expected[..]);
        assert_eq!(script.total_edit_length(), 5);
    }

    #[test]
    fn single_replacement_groups_into_change() {
        let a = ["a", "b", "c"];
        let b = ["a", "x", "c"];

        let script = diff(&a, &b, true);
        assert_eq!(script.edits(), &[Edit::new(EditKind::Change, 1, 1, 1)]);
    }

    #[test]
    fn single_replacement_without_grouping_stays_delete_insert() {
        let a = ["a", "b", "c"];
        let b = ["a", "x", "c"];

        let script = diff(&a, &b, false);
        assert_eq!(script.edits().len(), 2);
        assert_eq!(script.edits()[0].kind, EditKind::Delete);
        assert_eq!(script.edits()[0].start_a, 1);
        assert_eq!(script.edits()[0].length, 1);
        assert_eq!(script.edits()[1].kind, EditKind::Insert);
        assert_eq!(script.edits()[1].start_b, 1);
        assert_eq!(script.edits()[1].length, 1);
    }

    #[test]
    fn unequal_replacement_runs_do_not_group() {
        let a = ["a", "b", "c", "d"];
        let b = ["a", "x", "d"];

        let script = diff(&a, &b, true);
        assert!(
            script
                .edits()
                .iter()
                .all(|edit| edit.kind != EditKind::Change)
        );
    }

    #[test]
    fn equal_sequences_yield_empty_script() {
        let a = ["one", "two", "three"];
        let script = diff(&a, &a, true);

        assert!(script.is_empty());
        assert_eq!(script.similarity(), 1.0);
    }

    #[test]
    fn both_empty_sequences_yield_empty_script() {
        let a: [&str; 0] = [];
        let script = diff(&a, &a, true);

        assert!(script.is_empty());
        assert_eq!(script.similarity(), 1.0);
    }

    #[test]
    fn empty_against_nonempty_is_pure_insertion() {
        let a: [&str; 0] = [];
        let b = ["x", "y"];

        let script = diff(&a, &b, true);
        assert_eq!(script.edits(), &[Edit::new(EditKind::Insert, 0, 0, 2)]);
        assert_eq!(script.similarity(), 0.0);
    }

    #[test]
    fn equivalence_uses_keys_but_indices_point_at_originals() {
        let a = ["Alpha", "BETA", "gamma"];
        let b = ["alpha", "beta", "DELTA"];

        let matcher = SequenceMatcher::new(&a, &b, |x: &&str, y: &&str| {
            x.to_lowercase() == y.to_lowercase()
        }, true);
        let script = matcher.script();

        assert_eq!(script.edits(), &[Edit::new(EditKind::Change, 2, 2, 1)]);
        // The index still addresses the original, un-folded element.
        assert_eq!(a[script.edits()[0].start_a], "gamma");
    }

    #[test]
    fn multi_line_replacement_groups_as_one_change_run() {
        let a = ["keep", "old1", "old2", "keep2"];
        let b = ["keep", "new1", "new2", "keep2"];

        let script = diff(&a, &b, true);
        assert_eq!(script.edits(), &[Edit::new(EditKind::Change, 1, 1, 2)]);
        assert_eq!(script.total_edit_length(), 4);
    }
}
