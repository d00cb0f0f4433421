//! `Context` as Lua userdata.
//!
//! Configuration modules receive their context as the single argument of
//! `config` and call it with method syntax:
//!
//! ```lua
//! return {
//!   config = function(x)
//!     x:rule("qemu", "qemu-system-x86_64 $opts")
//!     x:recurse("util")
//!     x:build("run", "qemu", { variables = { { "opts", "-drive format=raw,file=boot.bin" } } })
//!   end,
//! }
//! ```
//!
//! Errors raised by the context are recorded on the session before they are
//! turned into Lua errors, so the original error reaches the driver unchanged.

use std::collections::BTreeMap;

use mlua::prelude::*;
use mlua::{FromLuaMulti, LuaSerdeExt};

use crate::context::{CargoBuild, Context};
use crate::error::Error;
use crate::ninja::{Build, Rule};

fn to_lua_error(ctx: &Context, err: Error) -> LuaError {
  LuaError::external(ctx.session().record_failure(err))
}

/// Malformed arguments are statement errors of the calling directory.
fn invalid_argument(ctx: &Context, err: LuaError) -> LuaError {
  to_lua_error(ctx, ctx.invalid(err.to_string()))
}

fn arguments<T: FromLuaMulti>(lua: &Lua, ctx: &Context, args: LuaMultiValue) -> LuaResult<T> {
  lua.unpack_multi(args).map_err(|e| invalid_argument(ctx, e))
}

/// Whether every key of `t` is one of `1..=#t`.
fn is_sequence(t: &LuaTable) -> LuaResult<bool> {
  let mut count = 0;
  for pair in t.pairs::<LuaValue, LuaValue>() {
    pair?;
    count += 1;
  }
  Ok(count == t.raw_len())
}

/// A string, a list of strings, or nil.
fn string_list(value: LuaValue) -> LuaResult<Vec<String>> {
  match value {
    LuaValue::Nil => Ok(Vec::new()),
    LuaValue::String(s) => Ok(vec![s.to_str()?.to_string()]),
    LuaValue::Table(t) if is_sequence(&t)? => t.sequence_values::<String>().collect(),
    LuaValue::Table(_) => Err(LuaError::external(
      "expected a list of strings, got a table with named keys",
    )),
    other => Err(LuaError::external(format!(
      "expected a string or a list of strings, got {}",
      other.type_name()
    ))),
  }
}

/// Edge variables: a list of `{name, value}` pairs (order kept) or a map
/// (sorted by name). A table cannot be both.
fn variables(value: LuaValue) -> LuaResult<Vec<(String, String)>> {
  match value {
    LuaValue::Nil => Ok(Vec::new()),
    LuaValue::Table(t) if t.raw_len() > 0 => {
      if !is_sequence(&t)? {
        return Err(LuaError::external(
          "variables mix `{name, value}` pairs with named keys",
        ));
      }
      let mut vars = Vec::new();
      for pair in t.sequence_values::<LuaTable>() {
        let pair = pair?;
        vars.push((pair.get::<String>(1)?, pair.get::<String>(2)?));
      }
      Ok(vars)
    }
    LuaValue::Table(t) => {
      let sorted: BTreeMap<String, String> = t.pairs::<String, String>().collect::<LuaResult<_>>()?;
      Ok(sorted.into_iter().collect())
    }
    other => Err(LuaError::external(format!(
      "variables must be a table, got {}",
      other.type_name()
    ))),
  }
}

fn parse_rule(name: String, command: String, opts: Option<LuaTable>) -> LuaResult<Rule> {
  let mut rule = Rule::new(name, command);
  if let Some(opts) = opts {
    rule.description = opts.get("description")?;
    rule.depfile = opts.get("depfile")?;
    rule.generator = opts.get::<Option<bool>>("generator")?.unwrap_or(false);
    rule.pool = opts.get("pool")?;
    rule.restat = opts.get::<Option<bool>>("restat")?.unwrap_or(false);
    rule.rspfile = opts.get("rspfile")?;
    rule.rspfile_content = opts.get("rspfile_content")?;
    rule.deps = opts.get("deps")?;
  }
  Ok(rule)
}

fn parse_build(outputs: LuaValue, rule: String, opts: Option<LuaTable>) -> LuaResult<Build> {
  let mut build = Build::new(string_list(outputs)?, rule);
  if let Some(opts) = opts {
    build.inputs = string_list(opts.get("inputs")?)?;
    build.implicit = string_list(opts.get("implicit")?)?;
    build.order_only = string_list(opts.get("order_only")?)?;
    build.implicit_outputs = string_list(opts.get("implicit_outputs")?)?;
    build.variables = variables(opts.get("variables")?)?;
    build.pool = opts.get("pool")?;
  }
  Ok(build)
}

fn parse_cargo(output: String, subcommand: String, opts: Option<LuaTable>) -> LuaResult<CargoBuild> {
  let mut request = CargoBuild::new(output, subcommand);
  if let Some(opts) = opts {
    request.package = opts.get("pkg")?;
    if let Some(dir) = opts.get::<Option<String>>("dir")? {
      request.dir = dir;
    }
    request.target = opts.get("triple")?;
    request.linker_script = opts.get("ldscript")?;
    request.rustflags = opts.get("rustflags")?;
    request.features = string_list(opts.get("features")?)?;
    request.map_file = opts.get("mapfile")?;
  }
  Ok(request)
}

fn path_parts(parts: &LuaVariadic<String>) -> Vec<&str> {
  parts.iter().map(String::as_str).collect()
}

impl LuaUserData for Context {
  fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
    methods.add_method_mut("recurse", |lua, this, args: LuaMultiValue| {
      let relpath: String = arguments(lua, this, args)?;
      this.recurse(&relpath).map_err(|e| to_lua_error(this, e))
    });

    methods.add_method_mut("variable", |lua, this, args: LuaMultiValue| {
      let (name, value, indent): (String, String, Option<usize>) = arguments(lua, this, args)?;
      this
        .variable(&name, &value, indent.unwrap_or(0))
        .map_err(|e| to_lua_error(this, e))
    });

    methods.add_method_mut("rule", |lua, this, args: LuaMultiValue| {
      let (name, command, opts): (String, String, Option<LuaTable>) = arguments(lua, this, args)?;
      let rule = parse_rule(name, command, opts).map_err(|e| invalid_argument(this, e))?;
      this.rule(&rule).map_err(|e| to_lua_error(this, e))
    });

    methods.add_method_mut("build", |lua, this, args: LuaMultiValue| {
      let (outputs, rule, opts): (LuaValue, String, Option<LuaTable>) = arguments(lua, this, args)?;
      let build = parse_build(outputs, rule, opts).map_err(|e| invalid_argument(this, e))?;
      this.build(&build).map_err(|e| to_lua_error(this, e))
    });

    methods.add_method_mut("default", |lua, this, args: LuaMultiValue| {
      let target: String = arguments(lua, this, args)?;
      this.default(&target).map_err(|e| to_lua_error(this, e))
    });

    methods.add_method_mut("build_cargo", |lua, this, args: LuaMultiValue| {
      let (output, subcommand, opts): (String, String, Option<LuaTable>) = arguments(lua, this, args)?;
      let request = parse_cargo(output, subcommand, opts).map_err(|e| invalid_argument(this, e))?;
      this.build_cargo(&request).map_err(|e| to_lua_error(this, e))
    });

    methods.add_method("opt", |lua, this, args: LuaMultiValue| {
      let key: String = arguments(lua, this, args)?;
      let value = this.opt(&key).map_err(|e| to_lua_error(this, e))?;
      lua.to_value(value)
    });

    methods.add_method("has_opt", |lua, this, args: LuaMultiValue| {
      let key: String = arguments(lua, this, args)?;
      Ok(this.options().contains(&key))
    });

    // Feature toggles: `false`, `0` and `""` are off, as is an absent key.
    methods.add_method("enabled", |lua, this, args: LuaMultiValue| {
      let key: String = arguments(lua, this, args)?;
      Ok(this.options().is_enabled(&key))
    });

    methods.add_method("buildmode", |_, this, ()| Ok(this.buildmode().as_str()));

    methods.add_method("srcdir", |_, this, ()| Ok(this.srcdir().to_string()));

    methods.add_method("srcpath", |lua, this, args: LuaMultiValue| {
      let parts: LuaVariadic<String> = arguments(lua, this, args)?;
      Ok(this.srcpath(&path_parts(&parts)))
    });

    methods.add_method("outpath", |lua, this, args: LuaMultiValue| {
      let parts: LuaVariadic<String> = arguments(lua, this, args)?;
      Ok(this.outpath(&path_parts(&parts)))
    });

    methods.add_method("outroot", |lua, this, args: LuaMultiValue| {
      let parts: LuaVariadic<String> = arguments(lua, this, args)?;
      Ok(this.outroot(&path_parts(&parts)))
    });
  }
}
