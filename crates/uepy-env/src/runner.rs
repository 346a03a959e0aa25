//! CommandRunner trait: the seam between the installer and real processes.
//!
//! `SystemRunner` spawns processes with piped output and waits for them; no
//! timeout is applied. Tests substitute a scripted runner.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of one finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a program to completion and captures its output.
pub trait CommandRunner {
    /// `envs` are added on top of the inherited environment.
    fn run(&self, program: &Path, args: &[&str], envs: &[(String, String)])
        -> io::Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(
        &self,
        program: &Path,
        args: &[&str],
        envs: &[(String, String)],
    ) -> io::Result<CommandOutput> {
        (**self).run(program, args, envs)
    }
}

/// Blocking `std::process::Command` runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &Path,
        args: &[&str],
        envs: &[(String, String)],
    ) -> io::Result<CommandOutput> {
        let out = Command::new(program)
            .args(args)
            .envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;
        Ok(CommandOutput {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}

/// Shell-style rendering of a command line for log and error messages.
pub fn describe(program: &Path, args: &[&str]) -> String {
    let mut s = program.display().to_string();
    for arg in args {
        s.push(' ');
        if arg.contains(char::is_whitespace) {
            s.push('"');
            s.push_str(arg);
            s.push('"');
        } else {
            s.push_str(arg);
        }
    }
    s
}
