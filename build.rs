use std::process::Command;

fn main() {
  embed_build_info();
  set_rerun_conditions();
}

fn embed_build_info() {
  // Capture the current Git commit hash for version identification.
  // Empty when Git is unavailable or the build is not from a checkout, so
  // the env vars always exist for env! at compile time.
  let git_hash = command_output("git", &["rev-parse", "--short", "HEAD"]);
  println!("cargo:rustc-env=GIT_HASH={git_hash}");

  // Capture the commit date in YYYY-MM-DD format.
  let git_date = command_output("git", &["log", "-1", "--format=%cs"]);
  println!("cargo:rustc-env=GIT_DATE={git_date}");
}

fn command_output(program: &str, args: &[&str]) -> String {
  Command::new(program)
    .args(args)
    .output()
    .ok()
    .filter(|output| output.status.success())
    .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
    .unwrap_or_default()
}

fn set_rerun_conditions() {
  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=.git/HEAD");
}
