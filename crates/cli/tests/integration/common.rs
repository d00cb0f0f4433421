//! Shared test helpers for CLI integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Path of the bundled demo project.
pub fn demo_path() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("..")
    .join("..")
    .join("demos")
    .join("uniqos")
}

fn copy_dir(from: &Path, to: &Path) {
  fs::create_dir_all(to).unwrap();
  for entry in fs::read_dir(from).unwrap() {
    let entry = entry.unwrap();
    let target = to.join(entry.file_name());
    if entry.file_type().unwrap().is_dir() {
      copy_dir(&entry.path(), &target);
    } else {
      fs::copy(entry.path(), &target).unwrap();
    }
  }
}

/// Isolated project directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create an empty project.
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Create a copy of the demo project.
  pub fn from_demo() -> Self {
    let env = Self::empty();
    copy_dir(&demo_path(), env.temp.path());
    env
  }

  /// Project root, canonicalized.
  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    let path = self.temp.path().join(relative_path);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
  }

  pub fn exists(&self, relative_path: &str) -> bool {
    self.temp.path().join(relative_path).exists()
  }

  /// Get a pre-configured Command for the ninjaconf binary.
  ///
  /// Runs against this project's root with `CARGO`, `LD` and `RUST_LOG`
  /// cleared, so the default toolchain is written.
  pub fn ninjaconf_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("ninjaconf");
    cmd.arg("--root").arg(self.root());
    cmd.env_remove("CARGO").env_remove("LD").env_remove("RUST_LOG");
    cmd
  }
}
