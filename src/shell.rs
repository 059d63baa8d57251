//! Shell command execution.
//!
//! Entry procedures and version queries are external processes. This module
//! provides a capturing runner for short probes and a streaming runner for
//! long-lived `run()` steps whose output should appear live.

use crate::error::{FreshenError, Result};
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the command exited zero.
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Extra environment variables (merged with the process env).
    pub env: HashMap<String, String>,
}

/// Output line from a streaming execution.
#[derive(Debug, Clone)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Callback for streaming output.
pub type OutputCallback = Box<dyn Fn(OutputLine) + Send>;

fn build_command(command: &str, options: &CommandOptions) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c");
    cmd.arg(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd
}

/// Execute a command, capturing stdout and stderr.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let output = build_command(command, options)
        .output()
        .map_err(|_| FreshenError::CommandFailed {
            command: command.to_string(),
            code: None,
        })?;

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration: start.elapsed(),
        success: output.status.success(),
    })
}

/// Execute a command, streaming each output line through `callback` while
/// also collecting the full output for the result.
pub fn execute_streaming(
    command: &str,
    options: &CommandOptions,
    callback: OutputCallback,
) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = build_command(command, options);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|_| FreshenError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    let stdout = child.stdout.take().expect("child stdout was piped");
    let stderr = child.stderr.take().expect("child stderr was piped");

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle = thread::spawn(move || {
        let reader = BufReader::new(stdout);
        let mut collected = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            collected.push_str(&line);
            collected.push('\n');
            let _ = tx_stdout.send(OutputLine::Stdout(line));
        }
        collected
    });

    let stderr_handle = thread::spawn(move || {
        let reader = BufReader::new(stderr);
        let mut collected = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            collected.push_str(&line);
            collected.push('\n');
            let _ = tx_stderr.send(OutputLine::Stderr(line));
        }
        collected
    });

    for line in rx {
        callback(line);
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child.wait().map_err(|_| FreshenError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    Ok(CommandResult {
        exit_code: status.code(),
        stdout: stdout_output,
        stderr: stderr_output,
        duration: start.elapsed(),
        success: status.success(),
    })
}

/// Render a duration the way step summaries print it.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{}s", secs, millis / 100)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[test]
    fn execute_successful_command() {
        let result = execute("echo hello", &CommandOptions::default()).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let result = execute("exit 7", &CommandOptions::default()).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(7));
    }

    #[test]
    fn execute_with_env() {
        let mut options = CommandOptions::default();
        options
            .env
            .insert("MY_VAR".to_string(), "my_value".to_string());

        let result = execute("echo $MY_VAR", &options).unwrap();
        assert!(result.stdout.contains("my_value"));
    }

    #[test]
    fn execute_with_cwd() {
        let temp = TempDir::new().unwrap();
        let options = CommandOptions {
            cwd: Some(temp.path().to_path_buf()),
            ..Default::default()
        };

        let result = execute("pwd", &options).unwrap();
        assert!(result.success);
    }

    #[test]
    fn execute_streaming_captures_both_streams() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_clone = Arc::clone(&lines);

        let callback: OutputCallback = Box::new(move |line| {
            lines_clone.lock().unwrap().push(line);
        });

        let result = execute_streaming(
            "echo out && echo err >&2",
            &CommandOptions::default(),
            callback,
        )
        .unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("out"));
        assert!(result.stderr.contains("err"));

        let captured = lines.lock().unwrap();
        assert!(captured.iter().any(|l| matches!(l, OutputLine::Stdout(_))));
        assert!(captured.iter().any(|l| matches!(l, OutputLine::Stderr(_))));
    }

    #[test]
    fn format_duration_formats_correctly() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.0s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
    }
}
