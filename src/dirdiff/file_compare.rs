use anyhow::Context;
use bitflags::bitflags;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::SystemTime;

/// Tolerance window for the timestamp check. Two seconds covers
/// coarse-resolution file systems (FAT stores modification times at a
/// 2-second granularity while NTFS keeps 100ns).
pub const DEFAULT_TIME_PRECISION_SECS: f64 = 2.0;

bitflags! {
    /// Which equality checks classify two files as different. Checks run
    /// cheapest first and short-circuit on the first difference found.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct DirFileMode: u32 {
        /// Compare byte lengths.
        const LENGTH = 0b0001;
        /// Compare modification times within the precision window.
        const TIME = 0b0010;
        /// Full byte-by-byte content comparison.
        const BYTES = 0b0100;
        /// During the byte comparison, skip past runs of `\r`/`\n` on
        /// both sides at a mismatch point instead of flagging them.
        const IGNORE_EOL = 0b1000;
    }
}

impl DirFileMode {
    pub fn try_parse(s: &str) -> Option<Self> {
        let mut mode = Self::empty();

        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part {
                "length" => mode |= Self::LENGTH,
                "time" => mode |= Self::TIME,
                "bytes" => mode |= Self::BYTES,
                _ => return None,
            }
        }

        Some(mode)
    }
}

impl Default for DirFileMode {
    fn default() -> Self {
        Self::BYTES
    }
}

/// Decides whether two files differ under `mode`.
///
/// `skip_byte_compare` is set when the two roots are the same canonical
/// directory; comparing a file to itself byte by byte is pointless.
pub fn files_differ(
    path_a: &Path,
    path_b: &Path,
    mode: DirFileMode,
    time_precision_secs: f64,
    skip_byte_compare: bool,
) -> anyhow::Result<bool> {
    let meta_a = std::fs::metadata(path_a)
        .with_context(|| format!("Failed to stat {}", path_a.display()))?;
    let meta_b = std::fs::metadata(path_b)
        .with_context(|| format!("Failed to stat {}", path_b.display()))?;

    if mode.contains(DirFileMode::LENGTH) && meta_a.len() != meta_b.len() {
        return Ok(true);
    }

    if mode.contains(DirFileMode::TIME) {
        let time_a = meta_a.modified()?;
        let time_b = meta_b.modified()?;
        if !times_match(time_a, time_b, time_precision_secs) {
            return Ok(true);
        }
    }

    if mode.contains(DirFileMode::BYTES) && !skip_byte_compare {
        let ignore_eol = mode.contains(DirFileMode::IGNORE_EOL);
        return bytes_differ(path_a, path_b, ignore_eol).with_context(|| {
            format!(
                "Failed comparing {} against {}",
                path_a.display(),
                path_b.display()
            )
        });
    }

    Ok(false)
}

fn times_match(a: SystemTime, b: SystemTime, precision_secs: f64) -> bool {
    let delta = match a.duration_since(b) {
        Ok(d) => d,
        Err(e) => e.duration(),
    };
    delta.as_secs_f64() <= precision_secs
}

fn bytes_differ(path_a: &Path, path_b: &Path, ignore_eol: bool) -> anyhow::Result<bool> {
    let mut left = ByteStream::open(path_a)?;
    let mut right = ByteStream::open(path_b)?;

    loop {
        match (left.peek()?, right.peek()?) {
            (None, None) => return Ok(false),
            (Some(x), Some(y)) if x == y => {
                left.advance();
                right.advance();
            }
            (a, b) => {
                let both_at_eol = a.is_none_or(is_eol) && b.is_none_or(is_eol);
                if ignore_eol && both_at_eol {
                    left.skip_eol_run()?;
                    right.skip_eol_run()?;
                } else {
                    return Ok(true);
                }
            }
        }
    }
}

fn is_eol(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// Buffered single-byte lookahead over a file.
struct ByteStream {
    reader: BufReader<File>,
    peeked: Option<u8>,
}

impl ByteStream {
    fn open(path: &Path) -> anyhow::Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(ByteStream {
            reader: BufReader::new(file),
            peeked: None,
        })
    }

    fn peek(&mut self) -> io::Result<Option<u8>> {
        if self.peeked.is_none() {
            let buf = self.reader.fill_buf()?;
            if let Some(&byte) = buf.first() {
                self.reader.consume(1);
                self.peeked = Some(byte);
            }
        }
        Ok(self.peeked)
    }

    fn advance(&mut self) {
        self.peeked = None;
    }

    fn skip_eol_run(&mut self) -> io::Result<()> {
        while let Some(byte) = self.peek()? {
            if !is_eol(byte) {
                break;
            }
            self.advance();
        }
        Ok(())
    }
}
