//! Shared test helpers for runtime adapter tests.
//!
//! `ScriptedRunner` answers each command with the next canned output and
//! records the full argument list.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::CommandRunner;

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn fail_output(stdout: &[u8], stderr: &[u8]) -> Output {
    Output {
        status: exit_status(1),
        stdout: stdout.to_vec(),
        stderr: stderr.to_vec(),
    }
}

/// `wsl.exe` writes its console output as UTF-16LE.
pub fn utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// One recorded invocation: program, arguments, and timeout when overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

#[derive(Default)]
pub struct ScriptedRunner {
    outputs: RefCell<VecDeque<Output>>,
    pub invocations: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new(outputs: impl IntoIterator<Item = Output>) -> Self {
        Self {
            outputs: RefCell::new(outputs.into_iter().collect()),
            invocations: RefCell::new(Vec::new()),
        }
    }

    fn answer(&self, program: &str, args: &[&str], timeout: Option<Duration>) -> Result<Output> {
        self.invocations.borrow_mut().push(Invocation {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            timeout,
        });
        self.outputs
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("unexpected command: {program} {}", args.join(" ")))
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.answer(program, args, None)
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        self.answer(program, args, Some(timeout))
    }
}
