//! Lexical path helpers for paths written into ninja fragments.
//!
//! Fragment paths are always `/`-separated and relative to the project root,
//! so these helpers work on strings and never touch the filesystem.

/// Normalize a `/`-separated path without touching the filesystem.
///
/// Drops empty and `.` segments and folds `..` into the preceding segment.
/// Leading `..` segments of a relative path are kept. An absolute path never
/// climbs above `/`. The empty path normalizes to the empty string.
pub fn normalize(path: &str) -> String {
  let absolute = path.starts_with('/');
  let mut segments: Vec<&str> = Vec::new();

  for segment in path.split('/') {
    match segment {
      "" | "." => {}
      ".." => match segments.last() {
        Some(&"..") | None if !absolute => segments.push(".."),
        Some(&"..") | None => {}
        Some(_) => {
          segments.pop();
        }
      },
      other => segments.push(other),
    }
  }

  let joined = segments.join("/");
  if absolute { format!("/{}", joined) } else { joined }
}

/// Join `parts` onto `base` and normalize the result.
///
/// An absolute part discards everything before it.
pub fn join<S: AsRef<str>>(base: &str, parts: &[S]) -> String {
  let mut joined = base.to_string();
  for part in parts {
    let part = part.as_ref();
    if part.starts_with('/') {
      joined = part.to_string();
    } else if !part.is_empty() {
      if !joined.is_empty() && !joined.ends_with('/') {
        joined.push('/');
      }
      joined.push_str(part);
    }
  }
  normalize(&joined)
}

/// Whether a normalized relative path climbs above its starting directory.
pub fn escapes_root(normalized: &str) -> bool {
  normalized == ".." || normalized.starts_with("../") || normalized.starts_with('/')
}

/// Render a normalized path for display or for a fragment; the empty path is `.`.
pub fn display(normalized: &str) -> &str {
  if normalized.is_empty() { "." } else { normalized }
}

/// Final segment of a `/`-separated path.
pub fn basename(path: &str) -> &str {
  path.rsplit('/').next().unwrap_or(path)
}

/// Everything before the final segment, or the empty string.
pub fn dirname(path: &str) -> &str {
  match path.rfind('/') {
    Some(0) => "/",
    Some(idx) => &path[..idx],
    None => "",
  }
}
