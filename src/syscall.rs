// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Subprocess helpers.

use std::{
    collections::BTreeMap,
    env,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Command,
};
use tracing::debug;

/// Check if command can be found.
///
/// Commands containing a path separator are checked directly, everything
/// else is searched for through `$PATH`.
pub fn command_exists(command: &str) -> bool {
    if command.contains(std::path::MAIN_SEPARATOR) {
        return Path::new(command).is_file();
    }

    env::var_os("PATH")
        .map(|paths| {
            env::split_paths(&paths)
                .map(|dir| dir.join(command))
                .any(|path: PathBuf| path.is_file())
        })
        .unwrap_or(false)
}

/// Run command while inheriting the current terminal.
///
/// Blocks until the command exits.
///
/// # Errors
///
/// - Return [`SyscallError::Spawn`] if command cannot be executed.
/// - Return [`SyscallError::Failed`] if command exits unsuccessfully.
pub fn syscall_interactive(
    cmd: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
    envs: &BTreeMap<String, String>,
) -> Result<()> {
    syscall_interactive_in(cmd, args, envs, None)
}

/// Run command while inheriting the current terminal from target working
/// directory.
///
/// # Errors
///
/// - Return [`SyscallError::Spawn`] if command cannot be executed.
/// - Return [`SyscallError::Failed`] if command exits unsuccessfully.
pub fn syscall_interactive_in(
    cmd: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
    envs: &BTreeMap<String, String>,
    cwd: Option<&Path>,
) -> Result<()> {
    let args = args
        .into_iter()
        .map(|arg| arg.as_ref().to_os_string())
        .collect::<Vec<_>>();
    let command = render_command(cmd.as_ref(), &args);
    debug!("run {command}");

    let mut process = Command::new(cmd.as_ref());
    process.args(&args).envs(envs);
    if let Some(cwd) = cwd {
        process.current_dir(cwd);
    }

    let status = process
        .spawn()
        .and_then(|mut child| child.wait())
        .map_err(|err| SyscallError::Spawn {
            source: err,
            command: command.clone(),
        })?;

    if !status.success() {
        return Err(SyscallError::Failed {
            command,
            message: status.to_string(),
        });
    }

    Ok(())
}

/// Run command and capture its output.
///
/// Returns stdout with trailing newlines chomped.
///
/// # Errors
///
/// - Return [`SyscallError::Spawn`] if command cannot be executed.
/// - Return [`SyscallError::Failed`] with stderr if command exits
///   unsuccessfully.
pub fn syscall_non_interactive(
    cmd: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
    envs: &BTreeMap<String, String>,
) -> Result<String> {
    let args = args
        .into_iter()
        .map(|arg| arg.as_ref().to_os_string())
        .collect::<Vec<_>>();
    let command = render_command(cmd.as_ref(), &args);
    debug!("run {command}");

    let output = Command::new(cmd.as_ref())
        .args(&args)
        .envs(envs)
        .output()
        .map_err(|err| SyscallError::Spawn {
            source: err,
            command: command.clone(),
        })?;
    let stdout = String::from_utf8_lossy(output.stdout.as_slice()).into_owned();
    let stderr = String::from_utf8_lossy(output.stderr.as_slice()).into_owned();

    if !output.status.success() {
        return Err(SyscallError::Failed {
            command,
            message: chomp(stderr),
        });
    }

    Ok(chomp(stdout))
}

fn render_command(cmd: &OsStr, args: &[OsString]) -> String {
    let mut out = cmd.to_string_lossy().into_owned();
    for arg in args {
        out.push(' ');
        out.push_str(&arg.to_string_lossy());
    }
    out
}

// INVARIANT: Chomp trailing newlines.
fn chomp(message: String) -> String {
    message
        .strip_suffix("\r\n")
        .or(message.strip_suffix('\n'))
        .map(ToString::to_string)
        .unwrap_or(message)
}

/// Subprocess error types.
#[derive(Debug, thiserror::Error)]
pub enum SyscallError {
    /// Command could not be executed.
    #[error("failed to run {command:?}")]
    Spawn {
        #[source]
        source: std::io::Error,
        command: String,
    },

    /// Command exited unsuccessfully.
    #[error("command {command:?} failed: {message}")]
    Failed { command: String, message: String },
}

/// Friendly result alias :3
pub type Result<T, E = SyscallError> = std::result::Result<T, E>;
