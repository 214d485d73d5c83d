// Copyright 2019-2021 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: GPL-2.0-or-later

use std::io;
use std::process::Command;

/// Captured result of a command line run by a [`ShellExecutor`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawOutput {
    pub stdout: String,
    pub exit_code: i32,
    pub stderr: String,
}

impl RawOutput {
    /// Creates the output of a successful command.
    pub fn success<S: Into<String>>(stdout: S) -> Self {
        Self {
            stdout: stdout.into(),
            exit_code: 0,
            stderr: String::new(),
        }
    }

    /// Creates the output of a failed command.
    pub fn failure<S: Into<String>>(exit_code: i32, stderr: S) -> Self {
        Self {
            stdout: String::new(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the first non-blank line of the diagnostic stream.
    pub fn diagnostic(&self) -> &str {
        self.stderr
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
    }
}

/// Runs command lines synchronously and captures their output.
///
/// Implementations that are used from several threads at once must be able to run
/// independent processes concurrently. Timeouts are up to the implementation.
pub trait ShellExecutor {
    fn execute(&self, command_line: &str) -> io::Result<RawOutput>;
}

impl<S> ShellExecutor for &S
where
    S: ShellExecutor + ?Sized,
{
    fn execute(&self, command_line: &str) -> io::Result<RawOutput> {
        (**self).execute(command_line)
    }
}

impl<S> ShellExecutor for Box<S>
where
    S: ShellExecutor + ?Sized,
{
    fn execute(&self, command_line: &str) -> io::Result<RawOutput> {
        (**self).execute(command_line)
    }
}

/// Runs command lines through the command interpreter of the operating system.
///
/// This is `cmd /c` on Windows, where the command line is passed on verbatim, and `sh -c` everywhere else.
#[derive(Clone, Debug)]
pub struct SystemShell {
    program: String,
    flag: String,
}

impl SystemShell {
    pub fn new() -> Self {
        if cfg!(windows) {
            Self::with_interpreter("cmd", "/c")
        } else {
            Self::with_interpreter("sh", "-c")
        }
    }

    /// Uses `program` with the given command flag as the command interpreter.
    pub fn with_interpreter<P, F>(program: P, flag: F) -> Self
    where
        P: Into<String>,
        F: Into<String>,
    {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }

    #[cfg(windows)]
    fn command(&self, command_line: &str) -> Command {
        use std::os::windows::process::CommandExt;

        // `cmd` does its own argument splitting, so the quotes must reach it untouched.
        let mut command = Command::new(&self.program);
        command.arg(&self.flag).raw_arg(command_line);
        command
    }

    #[cfg(not(windows))]
    fn command(&self, command_line: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.arg(&self.flag).arg(command_line);
        command
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellExecutor for SystemShell {
    fn execute(&self, command_line: &str) -> io::Result<RawOutput> {
        let output = self.command(command_line).output()?;

        Ok(RawOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            // A process killed by a signal has no exit code.
            exit_code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
