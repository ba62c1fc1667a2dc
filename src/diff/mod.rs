//! Diff computation
//!
//! This module implements the comparison engine for two inputs:
//!
//! - `sequence_matcher`: generalized Myers shortest-edit-script diff
//! - `script`: edit runs and script-level similarity
//! - `classifier`: binary/text/XML content sniffing
//! - `line`: text and binary-chunk comparison lines
//! - `binary`: byte-level add/copy diffing at block granularity
//! - `xml`: XML normalization for structural comparison
//! - `text`: the pipeline tying classification, normalization, and the
//!   matcher together
//!
//! The matcher diffs on normalized comparison keys while every emitted
//! index keeps addressing the original, un-normalized sequences.

pub mod binary;
pub mod classifier;
pub mod line;
pub mod script;
pub mod sequence_matcher;
pub mod text;
pub mod xml;
