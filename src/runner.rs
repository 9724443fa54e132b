use std::ffi::OsString;
use std::io;
use std::process::Command;

use crate::error::{FslxError, FslxResult};

/// Captured output of a successful external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
}

/// Abstraction over launching an external binary and waiting for it.
///
/// The dispatcher only ever talks to tools through this trait, so tests
/// substitute a scripted implementation instead of spawning processes.
/// `Sync` because parallel-capable operations fan out across inputs.
pub trait ToolRunner: Sync {
    /// Run `argv[0]` with the remaining elements as arguments, blocking
    /// until it exits.
    ///
    /// # Errors
    ///
    /// Fails with [`FslxError::ToolNotFound`] when the binary is absent,
    /// [`FslxError::ToolFailed`] on a non-zero exit status, and
    /// [`FslxError::Io`] for other spawn failures.
    fn run(&self, argv: &[OsString]) -> FslxResult<ToolOutput>;
}

/// [`ToolRunner`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, argv: &[OsString]) -> FslxResult<ToolOutput> {
        let (tool, args) = argv.split_first().ok_or_else(|| FslxError::InvalidOperation {
            detail: "empty command line".to_string(),
        })?;
        let tool_name = tool.to_string_lossy().into_owned();

        let output = Command::new(tool).args(args).output().map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                FslxError::ToolNotFound { tool: tool_name.clone() }
            } else {
                FslxError::Io(err)
            }
        })?;

        if !output.status.success() {
            return Err(FslxError::ToolFailed {
                tool: tool_name,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
