//! Lazily-created fragment files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::consts::{FRAGMENT_EXT, ROOT_FRAGMENT};
use crate::error::{Error, Result};
use crate::util::path;

enum FragmentState {
  Unopened,
  Open(BufWriter<File>),
  Closed { written: bool },
}

/// The statement file owned by one context.
///
/// Nothing touches the filesystem until the first [`Fragment::write`]; a
/// context that never emits a statement never creates a file. The file is
/// truncated on open, so a regeneration run replaces stale output.
pub struct Fragment {
  /// Path written into `include` statements, relative to the project root.
  path: String,
  file: PathBuf,
  state: FragmentState,
}

impl Fragment {
  pub fn new(root: &Path, ninja_outdir: &str, srcdir: &str) -> Self {
    let path = path::join(ninja_outdir, &[file_name(srcdir)]);
    let file = root.join(&path);
    Self {
      path,
      file,
      state: FragmentState::Unopened,
    }
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  /// Whether the next write will create the file.
  pub fn is_unopened(&self) -> bool {
    matches!(self.state, FragmentState::Unopened)
  }


  pub fn write(&mut self, text: &str) -> Result<()> {
    if let FragmentState::Unopened = self.state {
      self.state = FragmentState::Open(self.open()?);
    }
    match &mut self.state {
      FragmentState::Open(writer) => writer.write_all(text.as_bytes()).map_err(|source| Error::Io {
        path: self.file.clone(),
        source,
      }),
      _ => Err(Error::FragmentClosed {
        fragment: self.path.clone(),
      }),
    }
  }

  /// Flush and close the file.
  ///
  /// Returns the include path when a file was written. Closing twice is a
  /// no-op.
  pub fn close(&mut self) -> Result<Option<&str>> {
    let state = std::mem::replace(&mut self.state, FragmentState::Closed { written: false });
    let written = match state {
      FragmentState::Unopened => false,
      FragmentState::Open(mut writer) => {
        writer.flush().map_err(|source| Error::Io {
          path: self.file.clone(),
          source,
        })?;
        true
      }
      FragmentState::Closed { written } => written,
    };
    self.state = FragmentState::Closed { written };
    Ok(if written { Some(self.path.as_str()) } else { None })
  }

  fn open(&self) -> Result<BufWriter<File>> {
    if let Some(parent) = self.file.parent() {
      fs::create_dir_all(parent).map_err(|source| Error::Io {
        path: parent.to_path_buf(),
        source,
      })?;
    }
    let file = File::create(&self.file).map_err(|source| Error::Io {
      path: self.file.clone(),
      source,
    })?;
    info!(fragment = %self.file.display(), "writing fragment");
    Ok(BufWriter::new(file))
  }
}

/// Fragment file name for a normalized source subdirectory.
///
/// Path separators become `_`; the root context uses `root.ninja`.
pub fn file_name(srcdir: &str) -> String {
  if srcdir.is_empty() {
    ROOT_FRAGMENT.to_string()
  } else {
    format!("{}{}", srcdir.replace('/', "_"), FRAGMENT_EXT)
  }
}
