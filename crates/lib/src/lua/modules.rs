//! `configure.lua` files as configuration modules.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use mlua::prelude::*;
use tracing::debug;

use crate::consts::{MODULE_ENTRY, MODULE_FILE};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::lua::{loaders, runtime};
use crate::modules::ModuleResolver;
use crate::util::path;

/// Resolves each source subdirectory to `<root>/<srcdir>/configure.lua`.
///
/// All modules of a run share one Lua state, so helpers loaded with
/// `require` are evaluated once. Module files themselves are loaded fresh
/// for every context.
pub struct LuaModules {
  lua: Lua,
  root: PathBuf,
}

impl LuaModules {
  /// Create the resolver for the project at `root`, which must exist.
  pub fn new(root: &Path) -> Result<Self> {
    let root = dunce::canonicalize(root).map_err(|source| Error::Io {
      path: root.to_path_buf(),
      source,
    })?;
    let lua = runtime::create_runtime(&root).map_err(Error::Runtime)?;
    Ok(Self { lua, root })
  }

  /// Path of the module file for `srcdir`.
  pub fn module_path(&self, srcdir: &str) -> PathBuf {
    let mut path = self.root.clone();
    path.extend(srcdir.split('/').filter(|c| !c.is_empty()));
    path.push(MODULE_FILE);
    path
  }
}

impl ModuleResolver for LuaModules {
  fn configure(&self, ctx: &mut Context) -> Result<()> {
    let srcdir = path::display(ctx.srcdir()).to_string();
    let module_path = self.module_path(ctx.srcdir());

    let source = match fs::read_to_string(&module_path) {
      Ok(source) => source,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(Error::ModuleNotFound {
          srcdir,
          searched: module_path.display().to_string(),
        });
      }
      Err(source) => {
        return Err(Error::ReadModule {
          path: module_path,
          source,
        });
      }
    };

    debug!(srcdir = %srcdir, path = %module_path.display(), "loading module");
    let module = loaders::load_module(&self.lua, &module_path, &source)
      .and_then(|module| module.entry_point())
      .map_err(|source| Error::Lua {
        srcdir: srcdir.clone(),
        source,
      })?;
    let Some(entry) = module else {
      return Err(Error::Module {
        srcdir,
        reason: format!("{} does not define a `{}` function", MODULE_FILE, MODULE_ENTRY),
      });
    };

    let session = Rc::clone(ctx.session());
    let result = self.lua.scope(|scope| {
      let handle = scope.create_userdata_ref_mut(ctx)?;
      entry.call::<()>(handle)
    });

    // A failure raised through the context wins over whatever the module
    // turned it into, including nothing at all if it was caught.
    if let Some(failure) = session.take_failure() {
      return Err(failure);
    }
    result.map_err(|source| Error::Lua { srcdir, source })
  }
}
