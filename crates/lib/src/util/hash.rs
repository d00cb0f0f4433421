//! Deterministic checksums for generated node names.

use sha2::{Digest, Sha256};

use super::path;

/// Number of hex digits appended to placeholder node names.
pub const PLACEHOLDER_HASH_LEN: usize = 8;

/// First 32 bits of the SHA-256 of `input`, as 8 lowercase hex digits.
pub fn short_checksum(input: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(input.as_bytes());
  let full = format!("{:x}", hasher.finalize());
  full[..PLACEHOLDER_HASH_LEN].to_string()
}

/// Name of the phony node guarding a package build of `output`.
///
/// The checksum covers the full output path, so outputs sharing a base name
/// in different directories get different placeholders.
pub fn placeholder_name(output: &str) -> String {
  format!("{}-{}", path::basename(output), short_checksum(output))
}
