//! Streaming subprocess execution.

use std::os::unix::process::ExitStatusExt as _;

use tokio::io::{AsyncBufReadExt as _, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::{MvtCommand, StepOutcome};

/// Runs `command` to completion, calling `on_line` for every non-empty output
/// line from stdout and stderr as it arrives.
///
/// Cancelling `cancel` kills the child and returns [`StepOutcome::Stopped`]
/// without waiting for pipes held open by grandchildren. This also holds after
/// the child closed its output but is still running.
pub async fn run_streaming(
    command: &MvtCommand,
    cancel: &CancellationToken,
    mut on_line: impl FnMut(String),
) -> StepOutcome {
    let mut child = match command.to_process_command().spawn() {
        Ok(child) => child,
        Err(error) => {
            warn!(program = command.program(), %error, "failed to spawn process");

            return StepOutcome::Error(error.to_string());
        }
    };
    debug!(command = %command.display(), pid = ?child.id(), "process spawned");

    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(tokio::spawn(capture_lines(stdout, line_tx.clone())));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(tokio::spawn(capture_lines(stderr, line_tx.clone())));
    }
    drop(line_tx);

    let outcome = loop {
        tokio::select! {
            () = cancel.cancelled() => break stop_child(&mut child).await,
            line = line_rx.recv() => {
                if let Some(line) = line {
                    on_line(line);
                    continue;
                }

                break wait_for_exit(&mut child, cancel).await;
            }
        }
    };

    for reader in readers {
        reader.abort();
    }
    debug!(command = %command.display(), ?outcome, "process finished");

    outcome
}

/// Waits for a child whose output is exhausted, still honouring `cancel`.
async fn wait_for_exit(child: &mut Child, cancel: &CancellationToken) -> StepOutcome {
    tokio::select! {
        () = cancel.cancelled() => stop_child(child).await,
        status = child.wait() => match status {
            Ok(status) if status.signal().is_some() => StepOutcome::Stopped,
            Ok(status) => StepOutcome::Exited(status.code().unwrap_or(1)),
            Err(error) => StepOutcome::Error(error.to_string()),
        },
    }
}

async fn stop_child(child: &mut Child) -> StepOutcome {
    if let Err(error) = child.kill().await {
        warn!(%error, "failed to kill process");
    }

    StepOutcome::Stopped
}

/// Forwards each line of `source` with trailing `\r`/`\n` removed, skipping
/// empty lines. Invalid UTF-8 is replaced rather than ending the stream.
async fn capture_lines<R: AsyncRead + Unpin>(
    source: R,
    line_tx: mpsc::UnboundedSender<String>,
) {
    let mut reader = BufReader::new(source);
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            continue;
        }
        if line_tx.send(line.to_string()).is_err() {
            break;
        }
    }
}
