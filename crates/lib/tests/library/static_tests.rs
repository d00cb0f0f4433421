//! Generation through Rust configuration functions.

use ninjaconf_lib::Error;
use ninjaconf_lib::context::CargoBuild;
use ninjaconf_lib::modules::StaticModules;
use ninjaconf_lib::ninja::{Build, Rule};

use super::common::{ROOT_PRELUDE, TestProject};

fn phony(output: &str) -> Build {
  Build::new(vec![output.to_string()], "phony")
}

#[test]
fn registered_functions_configure_the_tree() {
  let project = TestProject::new();
  let mut modules = StaticModules::new();
  modules
    .register("", |ctx| {
      ctx.recurse("util")?;
      ctx.default("util")
    })
    .register("util", |ctx| ctx.build(&phony("util")));

  let report = project.generate_static(modules).unwrap();

  assert_eq!(project.read("target/ninja/util.ninja"), "build util : phony\n");
  assert_eq!(
    project.read("target/ninja/root.ninja"),
    format!("{}include target/ninja/util.ninja\ndefault util\n", ROOT_PRELUDE)
  );
  assert_eq!(report.builds, 1);
  assert_eq!(report.rules, 1);
}

#[test]
fn duplicate_output_is_rejected_across_contexts() {
  let project = TestProject::new();
  let mut modules = StaticModules::new();
  modules
    .register("", |ctx| {
      ctx.build(&phony("all"))?;
      ctx.recurse("util")
    })
    .register("util", |ctx| ctx.build(&phony("all")));

  let err = project.generate_static(modules).unwrap_err();
  match err {
    Error::DuplicateOutput { output, srcdir } => {
      assert_eq!(output, "all");
      assert_eq!(srcdir, "util");
    }
    other => panic!("unexpected error: {:?}", other),
  }
}

#[test]
fn implicit_outputs_count_as_outputs() {
  let project = TestProject::new();
  let mut modules = StaticModules::new();
  modules.register("", |ctx| {
    ctx.build(&Build {
      implicit_outputs: vec!["kernel.map".into()],
      ..phony("kernel")
    })?;
    ctx.build(&phony("kernel.map"))
  });

  let err = project.generate_static(modules).unwrap_err();
  assert!(matches!(err, Error::DuplicateOutput { ref output, .. } if output == "kernel.map"), "got {:?}", err);
}

#[test]
fn rule_is_declared_once_per_run() {
  let project = TestProject::new();
  let mut modules = StaticModules::new();
  modules.register("", |ctx| ctx.rule(&Rule::new("cargo", "cargo build")));

  let err = project.generate_static(modules).unwrap_err();
  assert!(matches!(err, Error::DuplicateRule { ref rule, .. } if rule == "cargo"), "got {:?}", err);
}

#[test]
fn phony_cannot_be_redeclared() {
  let project = TestProject::new();
  let mut modules = StaticModules::new();
  modules.register("", |ctx| ctx.rule(&Rule::new("phony", "true")));

  let err = project.generate_static(modules).unwrap_err();
  assert!(matches!(err, Error::DuplicateRule { .. }), "got {:?}", err);
}

#[test]
fn rules_declared_later_are_unknown() {
  let project = TestProject::new();
  let mut modules = StaticModules::new();
  modules.register("", |ctx| {
    ctx.build(&Build::new(vec!["boot.bin".to_string()], "qemu"))?;
    ctx.rule(&Rule::new("qemu", "qemu-system-x86_64 $in"))
  });

  let err = project.generate_static(modules).unwrap_err();
  assert!(matches!(err, Error::UnknownRule { ref rule, .. } if rule == "qemu"), "got {:?}", err);
}

#[test]
fn colliding_fragment_names_are_rejected() {
  let project = TestProject::new();
  let mut modules = StaticModules::new();
  modules
    .register("", |ctx| {
      ctx.recurse("a/b")?;
      ctx.recurse("a_b")
    })
    .register("a/b", |ctx| ctx.variable("x", "1", 0))
    .register("a_b", |ctx| ctx.variable("y", "2", 0));

  let err = project.generate_static(modules).unwrap_err();
  match err {
    Error::DuplicateFragment { fragment, srcdir } => {
      assert_eq!(fragment, "target/ninja/a_b.ninja");
      assert_eq!(srcdir, "a_b");
    }
    other => panic!("unexpected error: {:?}", other),
  }
}

#[test]
fn statements_with_line_breaks_are_rejected() {
  let project = TestProject::new();
  let mut modules = StaticModules::new();
  modules.register("", |ctx| ctx.variable("cflags", "-O2\nbuild evil : phony", 0));

  let err = project.generate_static(modules).unwrap_err();
  assert!(matches!(err, Error::InvalidStatement { ref srcdir, .. } if srcdir == "."), "got {:?}", err);
}

#[test]
fn cargo_requests_honor_debug_mode() {
  let project = TestProject::new();
  project.write("option.toml", "BUILDMODE = \"debug\"\n");
  let mut modules = StaticModules::new();
  modules.register("", |ctx| {
    let output = ctx.outroot(&["x86_64-uniqos", ctx.buildmode().as_str(), "libutil.rlib"]);
    ctx.build_cargo(&CargoBuild {
      package: Some("util".into()),
      features: vec!["log".into()],
      ..CargoBuild::new(output, "build")
    })
  });

  project.generate_static(modules).unwrap();

  let root = project.read("target/ninja/root.ninja");
  assert!(root.contains("build target/x86_64-uniqos/debug/libutil.rlib : cargo libutil.rlib-"));
  assert!(root.contains("  opts = -putil --features 'log'\n"));
  assert!(!root.contains("--release"));
}

#[test]
fn failed_run_leaves_flushed_fragments_for_the_next_run() {
  let project = TestProject::new();
  let mut failing = StaticModules::new();
  failing
    .register("", |ctx| ctx.recurse("util"))
    .register("util", |ctx| {
      ctx.variable("partial", "1", 0)?;
      ctx.build(&Build::new(vec!["x".to_string()], "missing"))
    });
  assert!(project.generate_static(failing).is_err());
  assert_eq!(project.read("target/ninja/util.ninja"), "partial = 1\n");

  let mut fixed = StaticModules::new();
  fixed
    .register("", |ctx| ctx.recurse("util"))
    .register("util", |ctx| ctx.variable("complete", "1", 0));
  project.generate_static(fixed).unwrap();
  assert_eq!(project.read("target/ninja/util.ninja"), "complete = 1\n");
}
