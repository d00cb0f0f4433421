//! Shared utilities.
//!
//! Placeholder checksums and lexical helpers for fragment paths.

pub mod hash;
pub mod path;
