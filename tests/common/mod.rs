//! Shared integration-test helpers for running the `fieldlab` binary.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Run the binary with `args` and capture its output.
///
/// Panics if the process cannot be spawned.
pub fn run_fieldlab(args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_fieldlab");
    Command::new(bin)
        .args(args)
        .output()
        .expect("failed to spawn fieldlab")
}

/// Write `content` to `name` under `dir` and return the path.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("failed to write fixture");
    path
}

/// Stdout as UTF-8.
pub fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as UTF-8.
pub fn stderr_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
