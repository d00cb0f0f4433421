use std::fmt::Write;

/// Indentation unit for lines nested under a `rule` or `build` statement.
const INDENT: &str = "  ";

/// A named command template.
///
/// Optional metadata is only emitted when present; empty strings count as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
  pub name: String,
  pub command: String,
  pub description: Option<String>,
  pub depfile: Option<String>,
  pub generator: bool,
  pub pool: Option<String>,
  pub restat: bool,
  pub rspfile: Option<String>,
  pub rspfile_content: Option<String>,
  pub deps: Option<String>,
}

impl Rule {
  pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      command: command.into(),
      ..Default::default()
    }
  }

  pub fn validate(&self) -> Result<(), String> {
    validate_name("rule name", &self.name)?;
    validate_value("command", &self.command)?;
    for (field, value) in self.metadata() {
      validate_value(field, &value)?;
    }
    if let Some(pool) = present(&self.pool) {
      validate_name("pool", pool)?;
    }
    Ok(())
  }

  /// Metadata lines in emission order, skipping absent fields.
  fn metadata(&self) -> Vec<(&'static str, String)> {
    let mut lines = Vec::new();
    if let Some(v) = present(&self.description) {
      lines.push(("description", v.to_string()));
    }
    if let Some(v) = present(&self.depfile) {
      lines.push(("depfile", v.to_string()));
    }
    if self.generator {
      lines.push(("generator", "1".to_string()));
    }
    if let Some(v) = present(&self.pool) {
      lines.push(("pool", v.to_string()));
    }
    if self.restat {
      lines.push(("restat", "1".to_string()));
    }
    if let Some(v) = present(&self.rspfile) {
      lines.push(("rspfile", v.to_string()));
    }
    if let Some(v) = present(&self.rspfile_content) {
      lines.push(("rspfile_content", v.to_string()));
    }
    if let Some(v) = present(&self.deps) {
      lines.push(("deps", v.to_string()));
    }
    lines
  }

  pub fn render(&self) -> String {
    let mut out = format!("rule {}\n", self.name);
    out.push_str(&render_variable("command", &self.command, 1));
    for (key, value) in self.metadata() {
      out.push_str(&render_variable(key, &value, 1));
    }
    out
  }
}

/// One build edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Build {
  pub outputs: Vec<String>,
  pub implicit_outputs: Vec<String>,
  pub rule: String,
  pub inputs: Vec<String>,
  pub implicit: Vec<String>,
  pub order_only: Vec<String>,
  /// Per-edge variable overrides, emitted in this order.
  pub variables: Vec<(String, String)>,
  pub pool: Option<String>,
}

impl Build {
  pub fn new(outputs: impl Into<Vec<String>>, rule: impl Into<String>) -> Self {
    Self {
      outputs: outputs.into(),
      rule: rule.into(),
      ..Default::default()
    }
  }

  /// Every path this edge produces.
  pub fn all_outputs(&self) -> impl Iterator<Item = &str> {
    self.outputs.iter().chain(self.implicit_outputs.iter()).map(String::as_str)
  }

  pub fn validate(&self) -> Result<(), String> {
    if self.outputs.iter().all(|o| o.is_empty()) {
      return Err("build edge has no outputs".to_string());
    }
    validate_name("rule name", &self.rule)?;
    let paths = self
      .all_outputs()
      .chain(self.inputs.iter().map(String::as_str))
      .chain(self.implicit.iter().map(String::as_str))
      .chain(self.order_only.iter().map(String::as_str));
    for path in paths {
      validate_value("path", path)?;
    }
    for (name, value) in &self.variables {
      validate_name("variable name", name)?;
      validate_value(name, value)?;
    }
    if let Some(pool) = present(&self.pool) {
      validate_name("pool", pool)?;
    }
    Ok(())
  }

  pub fn render(&self) -> String {
    let mut line = String::from("build ");
    line.push_str(&join(&self.outputs));
    if !is_blank(&self.implicit_outputs) {
      line.push_str(" | ");
      line.push_str(&join(&self.implicit_outputs));
    }
    line.push_str(" : ");
    line.push_str(&self.rule);

    let mut inputs = Vec::new();
    if !is_blank(&self.inputs) {
      inputs.push(join(&self.inputs));
    }
    if !is_blank(&self.implicit) {
      inputs.push("|".to_string());
      inputs.push(join(&self.implicit));
    }
    if !is_blank(&self.order_only) {
      inputs.push("||".to_string());
      inputs.push(join(&self.order_only));
    }
    for token in inputs {
      line.push(' ');
      line.push_str(&token);
    }
    line.push('\n');

    if let Some(pool) = present(&self.pool) {
      line.push_str(&render_variable("pool", pool, 1));
    }
    for (key, value) in &self.variables {
      line.push_str(&render_variable(key, value, 1));
    }
    line
  }
}

/// `<indent>name = value`
pub fn render_variable(name: &str, value: &str, indent: usize) -> String {
  let mut out = String::new();
  for _ in 0..indent {
    out.push_str(INDENT);
  }
  let _ = writeln!(out, "{} = {}", name, value);
  out
}

pub fn render_default(target: &str) -> String {
  format!("default {}\n", target)
}

pub fn render_include(path: &str) -> String {
  format!("include {}\n", path)
}

/// Join a multi-valued field with single spaces, skipping empty entries.
pub fn join(values: &[String]) -> String {
  values
    .iter()
    .filter(|v| !v.is_empty())
    .map(String::as_str)
    .collect::<Vec<_>>()
    .join(" ")
}

fn is_blank(values: &[String]) -> bool {
  values.iter().all(|v| v.is_empty())
}

fn present(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|v| !v.is_empty())
}

pub fn validate_name(what: &str, name: &str) -> Result<(), String> {
  if name.is_empty() {
    return Err(format!("{} is empty", what));
  }
  if name.chars().any(char::is_whitespace) {
    return Err(format!("{} '{}' contains whitespace", what, name.escape_default()));
  }
  Ok(())
}

pub fn validate_value(what: &str, value: &str) -> Result<(), String> {
  if value.contains('\n') || value.contains('\r') {
    return Err(format!("{} '{}' contains a line break", what, value.escape_default()));
  }
  Ok(())
}
