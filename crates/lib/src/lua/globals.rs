//! The `ninja` global table.
//!
//! - `ninja.version` - generator version
//! - `ninja.getenv(name[, default])` - environment lookup with fallback
//! - `ninja.path` - lexical path helpers

use mlua::prelude::*;

use super::helpers;

pub fn register_globals(lua: &Lua) -> LuaResult<()> {
  let ninja = lua.create_table()?;

  ninja.set("version", env!("CARGO_PKG_VERSION"))?;

  ninja.set(
    "getenv",
    lua.create_function(|_, (name, default): (String, Option<String>)| {
      Ok(std::env::var(&name).ok().or(default))
    })?,
  )?;

  ninja.set("path", helpers::path::create_path_helpers(lua)?)?;

  lua.globals().set("ninja", ninja)?;
  Ok(())
}
