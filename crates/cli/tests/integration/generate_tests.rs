//! Generate command integration tests.

use predicates::prelude::*;
use serde_json::Value;

use super::common::TestEnv;

#[test]
fn demo_project_generates() {
  let env = TestEnv::from_demo();

  env
    .ninjaconf_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Generated 3 fragments"));

  let root = env.read_file("target/ninja/root.ninja");
  assert!(root.starts_with("builddir = target\nCARGO = cargo\nLD = ld\nrule cargo\n"));
  let util = root.find("include target/ninja/util.ninja").unwrap();
  let multiboot = root.find("include target/ninja/arch_x86_64_multiboot.ninja").unwrap();
  assert!(util < multiboot);
  assert!(root.contains("build target/uniqos.iso : mb_iso | target/i686-uniqos/release/multiboot\n"));
  assert!(root.contains("default target/uniqos.iso\n"));
  assert!(!env.exists("target/ninja/arch_x86_64.ninja"));

  let multiboot = env.read_file("target/ninja/arch_x86_64_multiboot.ninja");
  assert!(multiboot.contains(
    "  opts = -pmultiboot --target arch/x86_64/multiboot/i686-uniqos.json \
     --features 'multiboot/boot_multiboot2' --release\n"
  ));
  assert!(multiboot.contains("  rustflags = -Clink-arg=-Tarch/x86_64/multiboot/multiboot.ld -Clink-arg=-nostdlib\n"));
}

#[test]
fn demo_options_change_the_graph() {
  let env = TestEnv::from_demo();
  env.write_file("option.toml", &env.read_file("option.toml.example"));

  env.ninjaconf_cmd().arg("generate").assert().success();

  let root = env.read_file("target/ninja/root.ninja");
  assert!(root.contains("build target/x86_64-uniqos/debug/bootimage-uniqos.bin : bootimage _bootimage-uniqos.bin"));
  assert!(root.contains("default target/x86_64-uniqos/debug/bootimage-uniqos.bin\n"));

  let multiboot = env.read_file("target/ninja/arch_x86_64_multiboot.ninja");
  assert!(!multiboot.contains("--release"));
  assert!(multiboot.contains("-Clink-arg=-Map,target/i686-uniqos/debug/multiboot.map"));
}

#[test]
fn zero_option_disables_the_multiboot_kernel() {
  let env = TestEnv::from_demo();
  env.write_file("option.toml", "boot_multiboot2 = 0\nMAPFILE = \"\"\n");

  env.ninjaconf_cmd().assert().success();

  let root = env.read_file("target/ninja/root.ninja");
  assert!(!root.contains("mb_iso"));
  assert!(!root.contains("include target/ninja/arch_x86_64_multiboot.ninja"));
  assert!(!env.exists("target/ninja/arch_x86_64_multiboot.ninja"));
  assert!(root.contains("default target/uniqos.iso\n"));
}

#[test]
fn regeneration_is_byte_identical() {
  let env = TestEnv::from_demo();

  env.ninjaconf_cmd().assert().success();
  let first = env.read_file("target/ninja/util.ninja");
  env.ninjaconf_cmd().assert().success();

  assert_eq!(env.read_file("target/ninja/util.ninja"), first);
}

#[test]
fn toolchain_comes_from_environment() {
  let env = TestEnv::empty();
  env.write_file("configure.lua", "return function(x) end");

  env
    .ninjaconf_cmd()
    .env("CARGO", "xargo")
    .env("LD", "ld.lld")
    .assert()
    .success();

  let root = env.read_file("target/ninja/root.ninja");
  assert!(root.starts_with("builddir = target\nCARGO = xargo\nLD = ld.lld\n"));
}

#[test]
fn output_directories_are_configurable() {
  let env = TestEnv::empty();
  env.write_file("configure.lua", r#"return function(x) x:variable("out", x:outroot("kernel")) end"#);

  env
    .ninjaconf_cmd()
    .arg("--out")
    .arg("build")
    .arg("--ninja-out")
    .arg("build/graph")
    .assert()
    .success();

  let root = env.read_file("build/graph/root.ninja");
  assert!(root.starts_with("builddir = build\n"));
  assert!(root.ends_with("out = build/kernel\n"));
}

#[test]
fn json_report() {
  let env = TestEnv::from_demo();

  let output = env.ninjaconf_cmd().arg("generate").arg("--format").arg("json").output().unwrap();
  assert!(output.status.success());

  let report: Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["root_fragment"], "target/ninja/root.ninja");
  assert_eq!(report["fragments"].as_array().unwrap().len(), 3);
  assert_eq!(report["fragments"][2], "target/ninja/root.ninja");
}

#[test]
fn failing_module_names_its_directory() {
  let env = TestEnv::empty();
  env.write_file("configure.lua", r#"return function(x) x:recurse("arch/x86_64") end"#);
  env.write_file("arch/x86_64/configure.lua", r#"return function(x) x:build("k", "link") end"#);

  env
    .ninjaconf_cmd()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("arch/x86_64"))
    .stderr(predicate::str::contains("undeclared rule 'link'"));
}

#[test]
fn verbose_logs_module_runs() {
  let env = TestEnv::empty();
  env.write_file("configure.lua", r#"return function(x) x:recurse("util") end"#);
  env.write_file("util/configure.lua", r#"return function(x) x:variable("a", "1") end"#);

  env
    .ninjaconf_cmd()
    .arg("-v")
    .assert()
    .success()
    .stderr(predicate::str::contains("recursing"));
}
