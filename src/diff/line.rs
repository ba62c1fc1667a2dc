use std::fmt::Write as _;

/// Width of the rendered offset prefix on binary chunk lines, including
/// the separator: `XXXXXXXX: `.
pub const BINARY_PREFIX_LENGTH: usize = 10;

/// What a comparison line holds: a text line or a chunk of binary data
/// at a known offset. Binary chunks render with a fixed-width offset
/// prefix that never participates in comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineContent {
    Text(String),
    BinaryChunk { offset: u64, bytes: Vec<u8> },
}

/// One element of a diffable sequence: the retained original content plus
/// the normalized key the matcher compares. Keys are built once, at
/// construction, from the active comparison options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    content: LineContent,
    key: String,
}

impl DiffLine {
    pub fn text(raw: String, ignore_case: bool, ignore_whitespace: bool) -> Self {
        let key = normalize_key(&raw, ignore_case, ignore_whitespace);
        DiffLine {
            content: LineContent::Text(raw),
            key,
        }
    }

    pub fn binary_chunk(offset: u64, bytes: Vec<u8>) -> Self {
        let key = hex_pairs(&bytes);
        DiffLine {
            content: LineContent::BinaryChunk { offset, bytes },
            key,
        }
    }

    pub fn content(&self) -> &LineContent {
        &self.content
    }

    /// The normalized comparison key. For binary chunks this is the hex
    /// body without the offset prefix.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The rendered form shown to the user.
    pub fn render(&self) -> String {
        match &self.content {
            LineContent::Text(text) => text.clone(),
            LineContent::BinaryChunk { offset, bytes } => {
                format!("{:08X}: {}", offset, hex_pairs(bytes))
            }
        }
    }

    /// Display width of the rendered line with tabs expanded to the next
    /// tab stop. Display math only; keys are never tab-expanded.
    pub fn display_width(&self, spaces_per_tab: usize) -> usize {
        let rendered = self.render();
        let mut width = 0usize;
        for c in rendered.chars() {
            if c == '\t' && spaces_per_tab > 0 {
                width += spaces_per_tab - width % spaces_per_tab;
            } else {
                width += 1;
            }
        }
        width
    }
}

fn normalize_key(raw: &str, ignore_case: bool, ignore_whitespace: bool) -> String {
    let trimmed = if ignore_whitespace { raw.trim() } else { raw };
    if ignore_case {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    }
}

fn hex_pairs(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02X}", byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_key_honors_case_and_whitespace_options() {
        let plain = DiffLine::text("  Hello World ".into(), false, false);
        assert_eq!(plain.key(), "  Hello World ");

        let folded = DiffLine::text("  Hello World ".into(), true, true);
        assert_eq!(folded.key(), "hello world");
        // The retained content is untouched by normalization.
        assert_eq!(folded.render(), "  Hello World ");
    }

    #[test]
    fn binary_chunk_key_excludes_offset_prefix() {
        let left = DiffLine::binary_chunk(0x10, vec![0xDE, 0xAD, 0xBE, 0xEF]);
        let right = DiffLine::binary_chunk(0x400, vec![0xDE, 0xAD, 0xBE, 0xEF]);

        assert_eq!(left.key(), right.key());
        assert_ne!(left.render(), right.render());
        assert_eq!(left.render(), "00000010: DE AD BE EF");
    }

    #[test]
    fn rendered_prefix_has_fixed_width() {
        let line = DiffLine::binary_chunk(0xAB, vec![0x01]);
        let rendered = line.render();
        assert_eq!(&rendered[..BINARY_PREFIX_LENGTH], "000000AB: ");
    }

    #[test]
    fn display_width_expands_tabs_to_stops() {
        let line = DiffLine::text("a\tb".into(), false, false);
        assert_eq!(line.display_width(4), 5);
        assert_eq!(line.display_width(8), 9);

        let no_tabs = DiffLine::text("abc".into(), false, false);
        assert_eq!(no_tabs.display_width(4), 3);
    }
}
