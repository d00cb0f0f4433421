//! Loading configuration modules into private environments.
//!
//! Every module runs in its own environment table: reads fall through to the
//! Lua globals, while assignments (including a top-level `function config`)
//! stay in the module's table. Each environment also carries `__dir`, the
//! absolute directory of the module file.

use std::path::Path;

use mlua::prelude::*;

use crate::consts::MODULE_ENTRY;

/// A loaded, not yet invoked, configuration module.
pub struct LoadedModule {
  /// Value returned by the chunk.
  pub value: LuaValue,
  /// The chunk's private environment.
  pub env: LuaTable,
}

impl LoadedModule {
  /// Locate the `config` entry point.
  ///
  /// Accepted shapes, in order: the chunk returns a function; the chunk
  /// returns a table with a `config` function; the chunk defines `config` in
  /// its environment.
  pub fn entry_point(&self) -> LuaResult<Option<LuaFunction>> {
    match &self.value {
      LuaValue::Function(f) => return Ok(Some(f.clone())),
      LuaValue::Table(t) => {
        if let LuaValue::Function(f) = t.get::<LuaValue>(MODULE_ENTRY)? {
          return Ok(Some(f));
        }
      }
      _ => {}
    }
    match self.env.raw_get::<LuaValue>(MODULE_ENTRY)? {
      LuaValue::Function(f) => Ok(Some(f)),
      _ => Ok(None),
    }
  }
}

/// Create a module environment inheriting from the globals.
pub fn module_env(lua: &Lua, dir: &Path) -> LuaResult<LuaTable> {
  let env = lua.create_table()?;
  env.set("__dir", dir.to_string_lossy().into_owned())?;

  let mt = lua.create_table()?;
  mt.set("__index", lua.globals())?;
  env.set_metatable(Some(mt))?;
  Ok(env)
}

/// Evaluate `source` (the content of the module at `path`) in a fresh
/// environment.
pub fn load_module(lua: &Lua, path: &Path, source: &str) -> LuaResult<LoadedModule> {
  let dir = path.parent().unwrap_or(Path::new("."));
  let env = module_env(lua, dir)?;

  let value = lua
    .load(source)
    .set_name(format!("@{}", path.display()))
    .set_environment(env.clone())
    .eval::<LuaValue>()?;

  Ok(LoadedModule { value, env })
}
