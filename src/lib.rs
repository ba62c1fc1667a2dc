//! Comparison engine for text, files, and directory trees
//!
//! The engine is a pure computation layer: every public operation is a
//! synchronous function from inputs and options to an immutable result.
//! `diff` holds the sequence/text/binary machinery, `dirdiff` the
//! structural directory differ, and `commands` the CLI rendering on top.

pub mod commands;
pub mod diff;
pub mod dirdiff;
