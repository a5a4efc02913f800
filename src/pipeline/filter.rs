// src/pipeline/filter.rs

//! External filter commands.
//!
//! The script transpiler and minifier are external collaborators: shell
//! commands that read source bytes on stdin and write transformed bytes
//! to stdout. A non-zero exit is a transform error carrying the
//! command's stderr.

use std::path::Path;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::errors::{Result, SitepipeError};

/// Pipe `input` through `cmd` (run via `sh -c`), returning its stdout.
pub async fn run_filter(
    task: &'static str,
    input_path: &Path,
    cmd: &str,
    input: Vec<u8>,
) -> Result<Vec<u8>> {
    debug!(task, cmd, path = ?input_path, "running filter command");

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning filter command {cmd:?}"))?;

    let mut stdin = child
        .stdin
        .take()
        .context("filter command stdin unavailable")?;

    // Feed stdin concurrently so a chatty command can't deadlock on a
    // full pipe.
    let writer = tokio::spawn(async move {
        let _ = stdin.write_all(&input).await;
        // stdin drops here, closing the pipe.
    });

    let output = child
        .wait_with_output()
        .await
        .with_context(|| format!("waiting for filter command {cmd:?}"))?;
    let _ = writer.await;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(SitepipeError::Transform {
            task,
            path: input_path.to_path_buf(),
            message: if stderr.is_empty() {
                format!("filter command {cmd:?} exited with {}", output.status)
            } else {
                stderr
            },
        });
    }

    Ok(output.stdout)
}

/// Run `cmd` via `sh -c` with extra environment variables, discarding
/// stdout. Used by generators that write files themselves (icon fonts).
pub async fn run_generator(
    task: &'static str,
    subject: &Path,
    cmd: &str,
    env: &[(&str, String)],
) -> Result<()> {
    debug!(task, cmd, "running generator command");

    let mut command = Command::new("sh");
    command.arg("-c").arg(cmd);
    for (key, value) in env {
        command.env(key, value);
    }

    let output = command
        .output()
        .await
        .with_context(|| format!("running generator command {cmd:?}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(SitepipeError::Transform {
            task,
            path: subject.to_path_buf(),
            message: if stderr.is_empty() {
                format!("generator command {cmd:?} exited with {}", output.status)
            } else {
                stderr
            },
        });
    }

    Ok(())
}
