//! Content classification for comparison inputs
//!
//! Decides whether an input is binary, plain text, or XML so the right
//! diff strategy can run. Binary detection follows the usual sniffing
//! rules: a recognized byte order mark means the content is encoded text,
//! otherwise any NUL byte marks it as binary. XML is never sniffed here;
//! the text pipeline decides it by attempting normalization.

use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Byte order marks that identify an explicitly encoded text stream.
/// Longer marks come first so UTF-32 LE is not mistaken for UTF-16 LE.
const BYTE_ORDER_MARKS: [&[u8]; 5] = [
    &[0x00, 0x00, 0xFE, 0xFF], // UTF-32 BE
    &[0xFF, 0xFE, 0x00, 0x00], // UTF-32 LE
    &[0xEF, 0xBB, 0xBF],       // UTF-8
    &[0xFE, 0xFF],             // UTF-16 BE
    &[0xFF, 0xFE],             // UTF-16 LE
];

/// How a comparison input was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    NotExisting,
    Binary,
    Text,
    Xml,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::NotExisting => "missing",
            ContentKind::Binary => "binary",
            ContentKind::Text => "text",
            ContentKind::Xml => "xml",
        }
    }
}

pub fn has_byte_order_mark(bytes: &[u8]) -> bool {
    BYTE_ORDER_MARKS.iter().any(|bom| bytes.starts_with(bom))
}

/// True when the bytes look like raw binary data: no byte order mark and
/// at least one NUL byte somewhere in the stream.
pub fn is_binary_bytes(bytes: &[u8]) -> bool {
    if has_byte_order_mark(bytes) {
        return false;
    }

    bytes.contains(&0)
}

/// Classifies a file without reading it fully: the byte order mark check
/// only needs the first few bytes, and the NUL scan stops at the first
/// hit.
pub fn classify_file(path: &Path) -> anyhow::Result<ContentKind> {
    if !path.exists() {
        return Ok(ContentKind::NotExisting);
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut first_chunk = true;
    loop {
        let buf = reader
            .fill_buf()
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if buf.is_empty() {
            return Ok(ContentKind::Text);
        }

        if first_chunk && has_byte_order_mark(buf) {
            return Ok(ContentKind::Text);
        }
        first_chunk = false;

        if buf.contains(&0) {
            return Ok(ContentKind::Binary);
        }

        let consumed = buf.len();
        reader.consume(consumed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::fixture::FileWriteBin;
    use assert_fs::prelude::PathChild;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::plain_ascii(b"hello world".as_slice(), false)]
    #[case::empty(b"".as_slice(), false)]
    #[case::nul_byte(b"he\x00llo".as_slice(), true)]
    #[case::leading_nul(b"\x00\x01\x02".as_slice(), true)]
    fn binary_sniffing_by_nul_byte(#[case] bytes: &[u8], #[case] expected: bool) {
        assert_eq!(is_binary_bytes(bytes), expected);
    }

    #[rstest]
    #[case::utf8(b"\xEF\xBB\xBFhello".as_slice())]
    #[case::utf16_le(b"\xFF\xFEh\x00e\x00".as_slice())]
    #[case::utf16_be(b"\xFE\xFF\x00h\x00e".as_slice())]
    #[case::utf32_le(b"\xFF\xFE\x00\x00h\x00\x00\x00".as_slice())]
    fn byte_order_mark_means_text_despite_nul_bytes(#[case] bytes: &[u8]) {
        assert!(has_byte_order_mark(bytes));
        assert!(!is_binary_bytes(bytes));
    }

    #[test]
    fn classify_missing_file() {
        let dir = assert_fs::TempDir::new().unwrap();
        let kind = classify_file(dir.child("nope.txt").path()).unwrap();
        assert_eq!(kind, ContentKind::NotExisting);
    }

    #[test]
    fn classify_text_and_binary_files() {
        let dir = assert_fs::TempDir::new().unwrap();

        let text = dir.child("a.txt");
        text.write_binary(b"line one\nline two\n").unwrap();
        assert_eq!(classify_file(text.path()).unwrap(), ContentKind::Text);

        let binary = dir.child("a.bin");
        binary.write_binary(b"\x7FELF\x00\x01\x02").unwrap();
        assert_eq!(classify_file(binary.path()).unwrap(), ContentKind::Binary);
    }
}
