use anyhow::Context;
use regex::{Regex, RegexBuilder};

/// Include/exclude specification over one or more `;`-separated file
/// masks (`*.rs;*.toml`). Masks match whole file names, case
/// insensitively.
///
/// With `include == false` the filter computes the complement of the
/// matched set against the directory's full listing by sorted-set
/// subtraction, not by negating the match per file.
#[derive(Debug, Clone)]
pub struct FileFilter {
    masks: Vec<Regex>,
    include: bool,
    pattern: String,
}

impl FileFilter {
    pub fn new(pattern: &str, include: bool) -> anyhow::Result<Self> {
        let masks = pattern
            .split(';')
            .map(str::trim)
            .filter(|mask| !mask.is_empty())
            .map(mask_to_regex)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(FileFilter {
            masks,
            include,
            pattern: pattern.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_include(&self) -> bool {
        self.include
    }

    pub fn matches(&self, name: &str) -> bool {
        self.masks.iter().any(|mask| mask.is_match(name))
    }

    /// Applies the filter to one directory's name-sorted file listing.
    pub fn apply<T, F>(&self, entries: Vec<T>, name_of: F) -> Vec<T>
    where
        F: Fn(&T) -> &str,
    {
        let matched: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.matches(name_of(entry)))
            .map(|(i, _)| i)
            .collect();

        if self.include {
            let matched: std::collections::HashSet<usize> = matched.into_iter().collect();
            entries
                .into_iter()
                .enumerate()
                .filter(|(i, _)| matched.contains(i))
                .map(|(_, entry)| entry)
                .collect()
        } else {
            // Sorted-set subtraction: walk the full listing and the
            // matched subsequence in lockstep.
            let mut next_match = matched.into_iter().peekable();
            entries
                .into_iter()
                .enumerate()
                .filter(|(i, _)| {
                    if next_match.peek() == Some(i) {
                        next_match.next();
                        false
                    } else {
                        true
                    }
                })
                .map(|(_, entry)| entry)
                .collect()
        }
    }
}

/// Translates a file mask into an anchored, case-insensitive regex.
/// `*` matches any run of characters, `?` a single one; everything else
/// is literal.
fn mask_to_regex(mask: &str) -> anyhow::Result<Regex> {
    let mut source = String::with_capacity(mask.len() + 4);
    source.push('^');
    for c in mask.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            _ => source.push_str(&regex::escape(&c.to_string())),
        }
    }
    source.push('$');

    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .with_context(|| format!("Invalid file mask: {}", mask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn apply(filter: &FileFilter, names: &[&str]) -> Vec<String> {
        filter.apply(
            names.iter().map(|n| n.to_string()).collect(),
            |n: &String| n.as_str(),
        )
    }

    #[test]
    fn include_keeps_only_matching_files() {
        let filter = FileFilter::new("*.cs", true).unwrap();
        let kept = apply(&filter, &["a.cs", "a.txt"]);
        assert_eq!(kept, vec!["a.cs"]);
    }

    #[test]
    fn exclude_is_the_set_complement() {
        let filter = FileFilter::new("*.cs", false).unwrap();
        let names = ["a.cs", "a.txt", "b.cs", "b.txt", "c.md"];
        let kept = apply(&filter, &names);
        assert_eq!(kept, vec!["a.txt", "b.txt", "c.md"]);
    }

    #[test]
    fn masks_are_case_insensitive() {
        let filter = FileFilter::new("*.CS", true).unwrap();
        let kept = apply(&filter, &["a.cs", "B.Cs", "c.rs"]);
        assert_eq!(kept, vec!["a.cs", "B.Cs"]);
    }

    #[test]
    fn multiple_masks_match_any() {
        let filter = FileFilter::new("*.rs;*.toml", true).unwrap();
        let kept = apply(&filter, &["Cargo.toml", "lib.rs", "notes.md"]);
        assert_eq!(kept, vec!["Cargo.toml", "lib.rs"]);
    }

    #[test]
    fn question_mark_matches_one_character() {
        let filter = FileFilter::new("a?.txt", true).unwrap();
        let kept = apply(&filter, &["a1.txt", "a22.txt", "a.txt"]);
        assert_eq!(kept, vec!["a1.txt"]);
    }

    #[test]
    fn literal_dots_do_not_act_as_wildcards() {
        let filter = FileFilter::new("a.txt", true).unwrap();
        let kept = apply(&filter, &["a.txt", "axtxt"]);
        assert_eq!(kept, vec!["a.txt"]);
    }
}
