//! Background tasks: job execution, tool probing and report generation.
//!
//! Tasks never touch [`App`](crate::app::App) state; they emit
//! [`AppEvent`]s that the reducer applies on the UI task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::app::report::ReportRequest;
use crate::app::{AppEvent, Tab};
use crate::domain::{Job, JobLine};
use crate::infra::probe::ToolProbe;
use crate::infra::process;

/// Control handle of a running job.
pub struct JobHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl JobHandle {
    /// Requests the running process to be killed.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopping(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the job task to end, returning `false` on timeout.
    pub async fn join(self, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, self.task).await {
            Ok(Err(error)) => {
                warn!(%error, "job task failed");

                true
            }
            Ok(Ok(())) => true,
            Err(_) => false,
        }
    }
}

/// Stateless helpers for background tasks.
pub(super) struct TaskService;

impl TaskService {
    /// Runs the steps of `job` sequentially on a tokio task, streaming output
    /// into `tab`'s console.
    pub(super) fn spawn_job(
        job: Job,
        tab: Tab,
        app_event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> JobHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(Self::run_job(job, tab, cancel.clone(), app_event_tx));

        JobHandle { cancel, task }
    }

    async fn run_job(
        job: Job,
        tab: Tab,
        cancel: CancellationToken,
        app_event_tx: mpsc::UnboundedSender<AppEvent>,
    ) {
        let emit = |lines: Vec<JobLine>| {
            for line in lines {
                let _ = app_event_tx.send(AppEvent::JobOutput { tab, line });
            }
        };

        emit(job.intro_lines());
        let mut outcomes = Vec::with_capacity(job.steps().len());
        for (index, step) in job.steps().iter().enumerate() {
            emit(job.before_step_lines(index));
            info!(tab = tab.title(), command = %step.command.display(), "running command");

            let outcome = process::run_streaming(&step.command, &cancel, |text| {
                let _ = app_event_tx.send(AppEvent::JobOutput {
                    tab,
                    line: JobLine::output(text),
                });
            })
            .await;
            info!(tab = tab.title(), ?outcome, "command finished");

            emit(job.step_lines(index, &outcome));
            let stopped = outcome.is_stopped();
            outcomes.push(outcome);
            if stopped {
                break;
            }
        }
        emit(job.summary_lines(&outcomes));

        let _ = app_event_tx.send(AppEvent::JobFinished {
            tab,
            summary: Job::summary(&outcomes),
        });
    }

    /// Probes the MVT installation and reports the result.
    pub(super) fn spawn_tool_check(
        probe: Arc<dyn ToolProbe>,
        app_event_tx: mpsc::UnboundedSender<AppEvent>,
    ) {
        tokio::spawn(async move {
            let status = probe.probe().await;
            let _ = app_event_tx.send(AppEvent::ToolStatusUpdated { status });
        });
    }

    /// Generates the PDF report on the blocking pool.
    pub(super) fn spawn_report(
        request: ReportRequest,
        app_event_tx: mpsc::UnboundedSender<AppEvent>,
    ) {
        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || {
                mvt_report::generate_report(
                    &request.scan_dir,
                    request.device_type,
                    request.file_name.as_deref(),
                )
                .map_err(|error| error.to_string())
            })
            .await
            .unwrap_or_else(|join_error| Err(join_error.to_string()));

            if let Err(error) = &result {
                warn!(%error, "report generation failed");
            }
            let _ = app_event_tx.send(AppEvent::ReportFinished { result });
        });
    }
}
