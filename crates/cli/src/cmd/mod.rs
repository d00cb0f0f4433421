mod generate;
mod options;

pub use generate::cmd_generate;
pub use options::cmd_options;

/// Lift a library error into `anyhow`, keeping its message.
fn lib_error(err: ninjaconf_lib::Error) -> anyhow::Error {
  anyhow::anyhow!("{}", err)
}
