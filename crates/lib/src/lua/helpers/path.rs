use mlua::prelude::*;

use crate::util::path;

/// Create the `ninja.path` table.
///
/// The helpers are lexical and `/`-separated, matching the paths written into
/// fragments.
pub fn create_path_helpers(lua: &Lua) -> LuaResult<LuaTable> {
  let table = lua.create_table()?;

  // ninja.path.join(...) - join and normalize segments
  table.set(
    "join",
    lua.create_function(|_, segments: LuaVariadic<String>| {
      let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
      Ok(path::display(&path::join("", &segments)).to_string())
    })?,
  )?;

  table.set(
    "normalize",
    lua.create_function(|_, p: String| Ok(path::display(&path::normalize(&p)).to_string()))?,
  )?;

  table.set(
    "basename",
    lua.create_function(|_, p: String| Ok(path::basename(&p).to_string()))?,
  )?;

  table.set(
    "dirname",
    lua.create_function(|_, p: String| Ok(path::dirname(&p).to_string()))?,
  )?;

  Ok(table)
}
