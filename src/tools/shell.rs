//! Bounded streaming execution of shell commands.
//!
//! The command runs under `sh -c` with stderr folded into stdout. Output is
//! consumed line by line, handed to a callback for live display and
//! accumulated. A wall-clock deadline measured from launch bounds the whole
//! run; on expiry the process group is killed and a marker line is appended.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Result text when a command produced no output.
pub const EMPTY_OUTPUT: &str = "(empty)";

/// Marker appended when the deadline expires.
pub fn timeout_marker(timeout: Duration) -> String {
    format!("(timed out after {}s)", timeout.as_secs())
}

/// Runs `command` in `cwd`, streaming each output line to `on_line`.
///
/// Returns the combined output trimmed of surrounding whitespace, or
/// [`EMPTY_OUTPUT`]. A timeout is not an error: the partial output is
/// returned with [`timeout_marker`] on its own last line.
///
/// # Errors
///
/// Returns an error only if the shell cannot be spawned or waited on.
pub async fn run_streaming<F>(command: &str, cwd: &Path, timeout: Duration, mut on_line: F) -> Result<String>
where
    F: FnMut(&str) + Send,
{
    let deadline = Instant::now() + timeout;

    let mut cmd = Command::new("sh");
    // `exec 2>&1` makes every later write to stderr share stdout's pipe.
    cmd.arg("-c")
        .arg(format!("exec 2>&1\n{}", command))
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to execute command: {}", command))?;
    debug!(pid = ?child.id(), timeout_secs = timeout.as_secs(), "run_streaming: spawned");

    let stdout = child.stdout.take().context("child stdout was not captured")?;
    let mut reader = BufReader::new(stdout);
    let mut output = String::new();
    let mut buf = Vec::new();
    let mut timed_out = false;

    loop {
        buf.clear();
        match timeout_at(deadline, reader.read_until(b'\n', &mut buf)).await {
            Ok(Ok(0)) => break,
            Ok(Ok(_)) => {
                let line = String::from_utf8_lossy(&buf);
                on_line(line.trim_end_matches(['\n', '\r']));
                output.push_str(&line);
            }
            Ok(Err(e)) => {
                warn!(error = %e, "run_streaming: read failed, treating as end of output");
                break;
            }
            Err(_) => {
                // A partially read line is still output.
                output.push_str(&String::from_utf8_lossy(&buf));
                timed_out = true;
                break;
            }
        }
    }

    if !timed_out {
        match timeout_at(deadline, child.wait()).await {
            Ok(status) => {
                let status = status.context("failed to wait for command")?;
                debug!(code = ?status.code(), "run_streaming: exited");
            }
            Err(_) => timed_out = true,
        }
    }

    if timed_out {
        warn!(timeout_secs = timeout.as_secs(), "run_streaming: deadline expired, killing");
        terminate(&mut child).await;
        output.push('\n');
        output.push_str(&timeout_marker(timeout));
    }

    let trimmed = output.trim();
    Ok(if trimmed.is_empty() {
        EMPTY_OUTPUT.to_string()
    } else {
        trimmed.to_string()
    })
}

/// Kills the child's whole process group, then the child itself, and reaps it.
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            debug!(pid, error = %e, "terminate: killpg failed");
        }
    }
    if let Err(e) = child.kill().await {
        debug!(error = %e, "terminate: kill failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(command: &str, timeout: Duration) -> (String, Vec<String>) {
        let dir = std::env::current_dir().unwrap();
        let mut lines = Vec::new();
        let output = run_streaming(command, &dir, timeout, |l| lines.push(l.to_string()))
            .await
            .unwrap();
        (output, lines)
    }

    #[tokio::test]
    async fn test_streams_each_line() {
        let (output, lines) = run("echo one; echo two", Duration::from_secs(5)).await;
        assert_eq!(output, "one\ntwo");
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_stderr_is_merged() {
        let (output, _) = run("echo out; echo err 1>&2; echo out2", Duration::from_secs(5)).await;
        assert_eq!(output, "out\nerr\nout2");
    }

    #[tokio::test]
    async fn test_empty_output() {
        let (output, lines) = run("true", Duration::from_secs(5)).await;
        assert_eq!(output, "(empty)");
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn test_output_is_trimmed() {
        let (output, _) = run("printf '\\n  hi  \\n\\n'", Duration::from_secs(5)).await;
        assert_eq!(output, "hi");
    }

    #[tokio::test]
    async fn test_nonzero_exit_still_returns_output() {
        let (output, _) = run("echo failing; exit 3", Duration::from_secs(5)).await;
        assert_eq!(output, "failing");
    }

    #[tokio::test]
    async fn test_timeout_appends_marker_and_keeps_partial_output() {
        let (output, lines) = run("echo started; sleep 30; echo never", Duration::from_secs(1)).await;
        assert!(output.starts_with("started"));
        assert!(output.ends_with("(timed out after 1s)"));
        assert!(!output.contains("never"));
        assert_eq!(lines, vec!["started"]);
    }

    #[tokio::test]
    async fn test_silent_timeout_is_only_the_marker() {
        let (output, _) = run("sleep 30", Duration::from_secs(1)).await;
        assert_eq!(output, "(timed out after 1s)");
    }

    #[test]
    fn test_timeout_marker_format() {
        assert_eq!(timeout_marker(Duration::from_secs(30)), "(timed out after 30s)");
        assert_eq!(timeout_marker(Duration::from_secs(60)), "(timed out after 60s)");
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_timeout_terminates_process_group() {
        let (output, lines) = run("sleep 30 & echo $!; wait", Duration::from_secs(1)).await;
        assert!(output.ends_with("(timed out after 1s)"));
        let pid: u32 = lines[0].trim().parse().unwrap();

        // Killed processes may linger briefly as zombies until reaped.
        let mut gone = false;
        for _ in 0..50 {
            match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
                Err(_) => {
                    gone = true;
                    break;
                }
                Ok(stat) if stat.contains(") Z ") => {
                    gone = true;
                    break;
                }
                Ok(_) => tokio::time::sleep(Duration::from_millis(20)).await,
            }
        }
        assert!(gone, "background sleep {} survived the timeout", pid);
    }
}
