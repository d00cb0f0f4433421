//! Implementation of the `ninjaconf options` command.

use std::path::Path;

use anyhow::{Context, Result};
use ninjaconf_lib::option::OptionStore;

use crate::output::{OutputFormat, plural, print_info, print_json};

pub fn cmd_options(root: &Path, format: OutputFormat) -> Result<()> {
  let options = OptionStore::load(root).context("Failed to load options")?;

  if format.is_json() {
    return print_json(&options);
  }

  for (key, value) in options.iter() {
    println!("{} = {}", key, value);
  }
  print_info(&format!("{} (build mode: {})", plural(options.len(), "option"), options.build_mode()));
  Ok(())
}
