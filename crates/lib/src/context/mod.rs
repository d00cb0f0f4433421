//! The configuration context tree.
//!
//! A [`Context`] is bound to one source subdirectory of the project. Its
//! configuration module writes statements through it, and
//! [`Context::recurse`] descends into a subdirectory: the child is created,
//! its module runs to completion, and only then is the child's fragment
//! included into the parent. Recursion is synchronous and depth-first, so a
//! context never sees a partially written sibling or ancestor fragment.
//!
//! Everything shared by the tree (layout, options, the module resolver and
//! the run-wide graph index) lives in one reference-counted [`Session`].

mod cargo;

pub use cargo::*;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::debug;

use crate::consts::{DEFAULT_NINJA_OUT_DIR, DEFAULT_OUT_DIR, PHONY_RULE};
use crate::error::{Error, Result};
use crate::modules::ModuleResolver;
use crate::ninja::{self, Build, Fragment, Rule};
use crate::option::{BuildMode, OptionStore, OptionValue};
use crate::util::path;

/// Where a project lives and where generated files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
  /// Project root; module and fragment paths are resolved against it.
  pub root: PathBuf,
  /// Build output directory, relative to the root.
  pub outdir: String,
  /// Fragment output directory, relative to the root.
  pub ninja_outdir: String,
}

impl ProjectLayout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      outdir: DEFAULT_OUT_DIR.to_string(),
      ninja_outdir: DEFAULT_NINJA_OUT_DIR.to_string(),
    }
  }
}

/// Names declared so far in this run, in flattened include order.
#[derive(Debug, Default)]
struct GraphIndex {
  outputs: BTreeSet<String>,
  rules: BTreeSet<String>,
  fragments: BTreeSet<String>,
  /// Fragments in the order they were closed.
  written: Vec<String>,
  /// Source subdirectories currently being configured, root first.
  active: Vec<String>,
  builds: usize,
}

/// State shared by every context of one generation run.
pub struct Session {
  layout: ProjectLayout,
  options: OptionStore,
  resolver: Box<dyn ModuleResolver>,
  index: RefCell<GraphIndex>,
  failure: RefCell<Option<Error>>,
}

impl Session {
  pub fn new(layout: ProjectLayout, options: OptionStore, resolver: Box<dyn ModuleResolver>) -> Self {
    Self {
      layout,
      options,
      resolver,
      index: RefCell::new(GraphIndex::default()),
      failure: RefCell::new(None),
    }
  }

  pub fn layout(&self) -> &ProjectLayout {
    &self.layout
  }

  pub fn options(&self) -> &OptionStore {
    &self.options
  }

  /// Fragment include paths written so far, in completion order.
  pub fn written_fragments(&self) -> Vec<String> {
    self.index.borrow().written.clone()
  }

  pub fn rule_count(&self) -> usize {
    self.index.borrow().rules.len()
  }

  pub fn build_count(&self) -> usize {
    self.index.borrow().builds
  }

  /// Remember the first failure raised inside a module run.
  ///
  /// Errors cross the Lua boundary as plain messages; the original is kept
  /// here so it can be returned unchanged once the module call unwinds, even
  /// if the module caught the message.
  pub(crate) fn record_failure(&self, err: Error) -> String {
    let message = err.to_string();
    let mut slot = self.failure.borrow_mut();
    if slot.is_none() {
      *slot = Some(err);
    }
    message
  }

  pub(crate) fn take_failure(&self) -> Option<Error> {
    self.failure.borrow_mut().take()
  }
}

/// One node of the configuration tree.
pub struct Context {
  session: Rc<Session>,
  srcdir: String,
  fragment: Fragment,
}

impl Context {
  /// The root context (empty source subdirectory) of a new run.
  pub fn new_root(session: Rc<Session>) -> Self {
    Self::child(session, String::new())
  }

  fn child(session: Rc<Session>, srcdir: String) -> Self {
    let layout = session.layout();
    let fragment = Fragment::new(&layout.root, &layout.ninja_outdir, &srcdir);
    Self {
      session,
      srcdir,
      fragment,
    }
  }

  pub fn session(&self) -> &Rc<Session> {
    &self.session
  }

  /// Normalized source subdirectory; empty for the root.
  pub fn srcdir(&self) -> &str {
    &self.srcdir
  }

  pub fn options(&self) -> &OptionStore {
    &self.session.options
  }

  pub fn opt(&self, key: &str) -> Result<&OptionValue> {
    self.session.options.get(key).ok_or_else(|| Error::UnknownOption {
      key: key.to_string(),
      srcdir: self.display_dir().to_string(),
    })
  }

  pub fn buildmode(&self) -> BuildMode {
    self.session.options.build_mode()
  }

  /// `srcdir/parts...`, normalized.
  pub fn srcpath<S: AsRef<str>>(&self, parts: &[S]) -> String {
    path::display(&path::join(&self.srcdir, parts)).to_string()
  }

  /// `outdir/srcdir/parts...`, normalized.
  pub fn outpath<S: AsRef<str>>(&self, parts: &[S]) -> String {
    let base = path::join(&self.session.layout.outdir, &[self.srcdir.as_str()]);
    path::display(&path::join(&base, parts)).to_string()
  }

  /// `outdir/parts...`, normalized.
  pub fn outroot<S: AsRef<str>>(&self, parts: &[S]) -> String {
    path::display(&path::join(&self.session.layout.outdir, parts)).to_string()
  }

  /// Configure the subdirectory `relpath` and include its fragment.
  pub fn recurse(&mut self, relpath: &str) -> Result<()> {
    let srcdir = path::join(&self.srcdir, &[relpath]);
    if path::escapes_root(&srcdir) {
      return Err(Error::InvalidPath { path: srcdir });
    }

    {
      let mut index = self.session.index.borrow_mut();
      if index.active.contains(&srcdir) {
        return Err(Error::AlreadyActive {
          srcdir: path::display(&srcdir).to_string(),
        });
      }
      index.active.push(srcdir.clone());
    }

    debug!(parent = %self.display_dir(), srcdir = %path::display(&srcdir), "recursing");
    let mut child = Context::child(Rc::clone(&self.session), srcdir);
    let result = self.session.resolver.configure(&mut child);
    self.session.index.borrow_mut().active.pop();
    result?;

    if let Some(include) = child.finish()? {
      self.emit(&ninja::render_include(&include))?;
    }
    Ok(())
  }

  /// Run this context's own module; used by the driver for the root.
  pub fn configure(&mut self) -> Result<()> {
    let session = Rc::clone(&self.session);
    session.index.borrow_mut().active.push(self.srcdir.clone());
    let result = session.resolver.configure(self);
    session.index.borrow_mut().active.pop();
    result
  }

  pub fn variable(&mut self, name: &str, value: &str, indent: usize) -> Result<()> {
    ninja::validate_name("variable name", name)
      .and_then(|_| ninja::validate_value(name, value))
      .map_err(|reason| self.invalid(reason))?;
    self.emit(&ninja::render_variable(name, value, indent))
  }

  pub fn rule(&mut self, rule: &Rule) -> Result<()> {
    rule.validate().map_err(|reason| self.invalid(reason))?;
    if rule.name == PHONY_RULE || !self.session.index.borrow_mut().rules.insert(rule.name.clone()) {
      return Err(Error::DuplicateRule {
        rule: rule.name.clone(),
        srcdir: self.display_dir().to_string(),
      });
    }
    self.emit(&rule.render())
  }

  pub fn build(&mut self, build: &Build) -> Result<()> {
    build.validate().map_err(|reason| self.invalid(reason))?;
    {
      let mut index = self.session.index.borrow_mut();
      if build.rule != PHONY_RULE && !index.rules.contains(&build.rule) {
        return Err(Error::UnknownRule {
          rule: build.rule.clone(),
          srcdir: self.display_dir().to_string(),
        });
      }
      for output in build.all_outputs().filter(|o| !o.is_empty()) {
        if !index.outputs.insert(output.to_string()) {
          return Err(Error::DuplicateOutput {
            output: output.to_string(),
            srcdir: self.display_dir().to_string(),
          });
        }
      }
      index.builds += 1;
    }
    self.emit(&build.render())
  }

  pub fn default(&mut self, target: &str) -> Result<()> {
    if target.is_empty() {
      return Err(self.invalid("default target is empty".to_string()));
    }
    ninja::validate_value("default target", target).map_err(|reason| self.invalid(reason))?;
    self.emit(&ninja::render_default(target))
  }

  /// Close the fragment and report its include path if anything was written.
  pub fn finish(mut self) -> Result<Option<String>> {
    let include = self.fragment.close()?.map(str::to_string);
    if let Some(ref path) = include {
      debug!(srcdir = %self.display_dir(), fragment = %path, "closed fragment");
      self.session.index.borrow_mut().written.push(path.clone());
    }
    Ok(include)
  }

  fn emit(&mut self, text: &str) -> Result<()> {
    if self.fragment.is_unopened() {
      let fragment = self.fragment.path().to_string();
      if !self.session.index.borrow_mut().fragments.insert(fragment.clone()) {
        return Err(Error::DuplicateFragment {
          fragment,
          srcdir: self.display_dir().to_string(),
        });
      }
    }
    self.fragment.write(text)
  }

  fn display_dir(&self) -> &str {
    path::display(&self.srcdir)
  }

  pub(crate) fn invalid(&self, reason: String) -> Error {
    Error::InvalidStatement {
      srcdir: self.display_dir().to_string(),
      reason,
    }
  }
}
