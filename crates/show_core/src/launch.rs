//! Process launching for built viewer commands

use crate::error::{Result, ViewerError};
use std::process::Command;

/// What happened to a launched viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Started in the background
    Spawned { pid: u32 },
    /// Ran to completion with a successful status
    Exited { code: Option<i32> },
}

/// Starts a viewer from an argument vector.
///
/// `argv[0]` is the program; the rest are passed as-is with no further
/// quoting or splitting.
pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, argv: &[String], wait: bool) -> Result<LaunchOutcome>;
}

/// Launches viewers as child processes of this one
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, argv: &[String], wait: bool) -> Result<LaunchOutcome> {
        let (program, args) = argv.split_first().ok_or(ViewerError::EmptyCommand)?;

        let mut child = Command::new(program)
            .args(args)
            .spawn()
            .map_err(|e| ViewerError::launch(program.as_str(), e))?;

        tracing::info!("Launched {} (pid {})", program, child.id());

        if !wait {
            return Ok(LaunchOutcome::Spawned { pid: child.id() });
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(ViewerError::ProcessFailed {
                program: program.clone(),
                code: status.code(),
            });
        }

        tracing::debug!("{} exited with {}", program, status);
        Ok(LaunchOutcome::Exited {
            code: status.code(),
        })
    }
}
