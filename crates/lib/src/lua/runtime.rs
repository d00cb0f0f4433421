use std::path::Path;

use mlua::prelude::*;

use crate::lua::globals;

/// Create the Lua runtime shared by every configuration module of a run.
///
/// `package.path` is extended with the project's `lua/` directory so modules
/// can `require` shared helpers, and the `ninja` global table is registered.
pub fn create_runtime(root: &Path) -> LuaResult<Lua> {
  let lua = Lua::new();

  let package = lua.globals().get::<LuaTable>("package")?;
  let package_path = package.get::<String>("path")?;
  let lua_dir = root.join("lua").to_string_lossy().replace('\\', "/");
  let new_package_path = format!("{0}/?.lua;{0}/?/init.lua;{1}", lua_dir, package_path);
  package.set("path", new_package_path)?;

  globals::register_globals(&lua)?;

  Ok(lua)
}
