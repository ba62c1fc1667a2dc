//! Directory tree comparison
//!
//! This module implements the structural differ over two directory
//! trees:
//!
//! - `ordering`: the single case-insensitive name comparer
//! - `merge_index`: linear merge of two sorted entry listings
//! - `file_filter`: include/exclude file masks
//! - `file_compare`: per-file-pair equality checks (length/time/bytes)
//! - `entry`: the immutable result tree
//! - `walker`: the level-by-level tree differ
//!
//! The walk reads file-system state once per node; errors reading one
//! entry stay on that entry and never abort the surrounding traversal.

pub mod entry;
pub mod file_compare;
pub mod file_filter;
pub mod merge_index;
pub mod ordering;
pub mod walker;
