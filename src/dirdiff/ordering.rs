use std::cmp::Ordering;

/// Deterministic, case-insensitive, locale-independent ordering over
/// file-system names. Each character is folded through its uppercase
/// mapping and compared by code point, so the order never depends on the
/// active locale. All sorting and merging of directory entries goes
/// through this single comparer.
pub fn name_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().map(fold);
    let mut right = b.chars().map(fold);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match x.cmp(&y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

pub fn names_equal(a: &str, b: &str) -> bool {
    name_cmp(a, b) == Ordering::Equal
}

fn fold(c: char) -> char {
    if c.is_ascii() {
        c.to_ascii_uppercase()
    } else {
        c.to_uppercase().next().unwrap_or(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ordering_ignores_case() {
        assert_eq!(name_cmp("alpha", "ALPHA"), Ordering::Equal);
        assert_eq!(name_cmp("Beta", "alpha"), Ordering::Greater);
        assert_eq!(name_cmp("alpha", "BETA"), Ordering::Less);
    }

    #[test]
    fn prefix_orders_before_extension() {
        assert_eq!(name_cmp("file", "file.txt"), Ordering::Less);
    }

    #[test]
    fn sorting_is_stable_across_case_variants() {
        let mut names = vec!["Zeta", "alpha", "BETA", "gamma"];
        names.sort_by(|a, b| name_cmp(a, b));
        assert_eq!(names, vec!["alpha", "BETA", "gamma", "Zeta"]);
    }

    #[test]
    fn equality_matches_the_comparer() {
        assert!(names_equal("README.md", "readme.MD"));
        assert!(!names_equal("a.txt", "b.txt"));
    }
}
