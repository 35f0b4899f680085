//! # yearlint
//!
//! A tool that validates copyright header years against git history.

use anyhow::Result;

use yearlint::cli::{Cli, run_check};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run_check(cli.get_check_args())
}
