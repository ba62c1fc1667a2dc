use crate::dirdiff::ordering::name_cmp;
use std::cmp::Ordering;

/// Merges two name-sorted entry slices into one ordered sequence of
/// paired-or-singleton rows.
///
/// Entries whose names compare equal under the ordering comparer pair
/// up; entries present on one side only appear alone. The output order
/// is the sorted union of both inputs. This is a linear merge and relies
/// on both inputs being pre-sorted by the same comparer; callers that
/// cannot guarantee that must sort first.
pub fn merge_by_name<'e, T, F>(
    a: &'e [T],
    b: &'e [T],
    name_of: F,
) -> Vec<(Option<&'e T>, Option<&'e T>)>
where
    F: Fn(&T) -> &str,
{
    debug_assert!(is_sorted(a, &name_of), "left side must be pre-sorted");
    debug_assert!(is_sorted(b, &name_of), "right side must be pre-sorted");

    let mut merged = Vec::with_capacity(a.len().max(b.len()));
    let (mut i, mut j) = (0usize, 0usize);

    while i < a.len() && j < b.len() {
        match name_cmp(name_of(&a[i]), name_of(&b[j])) {
            Ordering::Equal => {
                merged.push((Some(&a[i]), Some(&b[j])));
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                merged.push((Some(&a[i]), None));
                i += 1;
            }
            Ordering::Greater => {
                merged.push((None, Some(&b[j])));
                j += 1;
            }
        }
    }

    merged.extend(a[i..].iter().map(|entry| (Some(entry), None)));
    merged.extend(b[j..].iter().map(|entry| (None, Some(entry))));

    merged
}

fn is_sorted<T, F: Fn(&T) -> &str>(entries: &[T], name_of: &F) -> bool {
    entries
        .windows(2)
        .all(|pair| name_cmp(name_of(&pair[0]), name_of(&pair[1])) != Ordering::Greater)
}
