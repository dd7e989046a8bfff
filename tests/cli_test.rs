//! Exercises the compiled binary's exit codes for malformed invocations.
//!
//! spec.md §6/§7 require `InvalidArgs` (missing arguments, a non-numeric
//! `N`, an unknown subcommand) to exit 1, not clap's default usage-error
//! code of 2.

use std::process::Command;

fn stackwire() -> Command {
    Command::new(env!("CARGO_BIN_EXE_stackwire"))
}

#[test]
fn missing_subcommand_exits_1() {
    let status = stackwire().status().unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn unknown_subcommand_exits_1() {
    let status = stackwire().arg("frobnicate").status().unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn non_numeric_var_count_exits_1() {
    let status = stackwire()
        .args(["client", "127.0.0.1", "9999", "not-a-number"])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn missing_client_arguments_exits_1() {
    let status = stackwire().args(["client", "127.0.0.1"]).status().unwrap();
    assert_eq!(status.code(), Some(1));
}
