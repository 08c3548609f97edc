//! Runs the solver binary for the integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::io::Read;
use std::path::PathBuf;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;

use wait_timeout::ChildExt;

#[derive(Debug)]
pub(crate) struct SolverOutput {
    pub(crate) status: ExitStatus,
    pub(crate) stdout: String,
}

impl SolverOutput {
    /// The lines describing a solution, without the separators.
    pub(crate) fn solutions(&self) -> Vec<&str> {
        self.stdout
            .lines()
            .filter(|line| line.starts_with('('))
            .collect()
    }
}

pub(crate) fn run_solver<'a>(args: impl IntoIterator<Item = &'a str>) -> SolverOutput {
    const TEST_TIMEOUT: Duration = Duration::from_secs(60);

    let solver = PathBuf::from(env!("CARGO_BIN_EXE_quince-solver"));

    let mut child = Command::new(solver)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run solver.");

    let status = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs()),
        Ok(Some(status)) => status,
        Err(e) => panic!("error starting solver: {e}"),
    };

    let mut stdout = String::new();
    let _ = child
        .stdout
        .take()
        .expect("stdout is piped")
        .read_to_string(&mut stdout)
        .expect("output is valid UTF-8");

    SolverOutput { status, stdout }
}
