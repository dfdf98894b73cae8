//! App-layer composition root and shared state container.
//!
//! This module wires app submodules and exposes [`App`] and [`TabState`]
//! used by runtime mode handlers and UI pages.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use time::UtcOffset;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{
    Action, FieldId, FieldKind, Form, Job, JobLine, JobSummary, LineKind,
};
use crate::infra::paths;
use crate::infra::probe::{INSTALL_WARNING_MESSAGE, INSTALL_WARNING_TITLE, ToolProbe, ToolStatus};

pub mod console;
pub mod mode;
pub mod picker;
mod report;
pub mod tab;
mod task;

pub use console::{Console, ConsoleLine};
pub use mode::AppMode;
pub use picker::PathPicker;
pub use tab::{Tab, TabManager};
pub use task::JobHandle;

use report::ReportRequest;
use task::TaskService;

/// Internal app events emitted by background tasks.
///
/// Producers should emit events only; state mutation is centralized in
/// [`App::apply_app_events`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum AppEvent {
    /// One console line produced by the job running in `tab`.
    JobOutput { tab: Tab, line: JobLine },
    /// Indicates the job running in `tab` has ended.
    JobFinished { tab: Tab, summary: JobSummary },
    /// Indicates the MVT installation probe has completed.
    ToolStatusUpdated { status: ToolStatus },
    /// Indicates report generation ended with the written path or an error.
    ReportFinished { result: Result<PathBuf, String> },
}

#[derive(Default)]
struct AppEventBatch {
    finished_jobs: Vec<(Tab, JobSummary)>,
    job_lines: Vec<(Tab, JobLine)>,
    report_result: Option<Result<PathBuf, String>>,
    tool_status: Option<ToolStatus>,
}

/// Form, console and running job of one tab.
pub struct TabState {
    pub console: Console,
    pub form: Form,
    job: Option<JobHandle>,
}

impl TabState {
    fn new(tab: Tab) -> Self {
        Self {
            console: Console::new(),
            form: tab.form(),
            job: None,
        }
    }

    /// Returns whether a job was started and its end not yet applied.
    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    /// Returns whether a stop was requested for the running job.
    pub fn is_stopping(&self) -> bool {
        self.job.as_ref().is_some_and(JobHandle::is_stopping)
    }
}

/// Application state shared by the runtime loop and the renderer.
pub struct App {
    pub mode: AppMode,
    pub tabs: TabManager,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    ioc_dir: PathBuf,
    pending_install_warning: bool,
    report_in_flight: bool,
    status_message: String,
    tab_states: [TabState; 4],
    tool_status: ToolStatus,
    utc_offset: UtcOffset,
}

impl App {
    /// Builds the initial state. `utc_offset` stamps console lines in local
    /// time.
    pub fn new(config: &Config, utc_offset: UtcOffset) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            mode: AppMode::Normal,
            tabs: TabManager::new(),
            event_rx,
            event_tx,
            ioc_dir: config.ioc_dir.clone(),
            pending_install_warning: false,
            report_in_flight: false,
            status_message: "Ready - MVT GUI Dashboard".to_string(),
            tab_states: Tab::ALL.map(TabState::new),
            tool_status: ToolStatus::Checking,
            utc_offset,
        }
    }

    pub fn current_tab(&self) -> Tab {
        self.tabs.current()
    }

    pub fn tab_state(&self, tab: Tab) -> &TabState {
        &self.tab_states[tab.index()]
    }

    pub fn tab_state_mut(&mut self, tab: Tab) -> &mut TabState {
        &mut self.tab_states[tab.index()]
    }

    pub fn current_state(&self) -> &TabState {
        self.tab_state(self.current_tab())
    }

    pub fn current_state_mut(&mut self) -> &mut TabState {
        self.tab_state_mut(self.current_tab())
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn tool_status(&self) -> ToolStatus {
        self.tool_status
    }

    pub fn ioc_dir(&self) -> &Path {
        &self.ioc_dir
    }

    pub fn is_report_in_flight(&self) -> bool {
        self.report_in_flight
    }

    /// Returns how many tabs have a job or report in progress.
    pub fn busy_count(&self) -> usize {
        let jobs = self
            .tab_states
            .iter()
            .filter(|state| state.is_running())
            .count();

        jobs + usize::from(self.report_in_flight)
    }

    pub fn next_tab(&mut self) {
        self.tabs.next();
    }

    pub fn previous_tab(&mut self) {
        self.tabs.previous();
    }

    pub fn focus_next(&mut self) {
        self.current_state_mut().form.focus_next();
    }

    pub fn focus_previous(&mut self) {
        self.current_state_mut().form.focus_previous();
    }

    /// Edits a text field, flips a toggle, cycles a choice, or runs the
    /// focused action.
    pub fn activate_focused(&mut self) {
        let form = &mut self.current_state_mut().form;
        if let Some(field) = form.focused_field_mut() {
            if field.is_text_input() {
                let draft = field.value.clone();
                self.mode = AppMode::Editing { draft };
            } else {
                field.activate();
            }

            return;
        }

        if let Some(action) = form.focused_action() {
            self.run_action(action);
        }
    }

    /// Stores the edited value into the focused field and leaves edit mode.
    pub fn commit_edit(&mut self, draft: &str) {
        let tab = self.current_tab();
        if let Some(id) = self.current_state().form.focused_field().map(|field| field.id) {
            self.set_field_value(tab, id, draft);
        }

        self.set_normal_mode();
    }

    pub fn cancel_edit(&mut self) {
        self.set_normal_mode();
    }

    /// Opens the path picker for the focused path field. Returns `false`
    /// when the focused element is not a path field.
    pub fn open_path_picker(&mut self) -> bool {
        let Some(field) = self
            .current_state()
            .form
            .focused_field()
            .filter(|field| field.is_path())
        else {
            return false;
        };

        let directories_only = matches!(field.kind, FieldKind::Path { directory: true });
        let value = field.value.trim();
        let start = if value.is_empty() {
            dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
        } else {
            paths::expand_tilde(value)
        };
        let picker = PathPicker::open(field.id, &start, directories_only);
        self.mode = AppMode::PathPicker(picker);

        true
    }

    /// Fills the picker's field with `path` and closes the picker.
    pub fn apply_picked_path(&mut self, field: FieldId, path: &Path) {
        let tab = self.current_tab();
        self.set_field_value(tab, field, &path.to_string_lossy());
        self.set_normal_mode();
    }

    pub fn cancel_path_picker(&mut self) {
        self.set_normal_mode();
    }

    pub fn dismiss_message(&mut self) {
        self.set_normal_mode();
    }

    /// Validates the form of the current tab and starts the action.
    pub fn run_action(&mut self, action: Action) {
        let tab = self.current_tab();
        if self.tab_state(tab).is_running() {
            self.status_message = "A command is already running in this tab".to_string();

            return;
        }

        match action.job(&self.tab_state(tab).form, &self.ioc_dir) {
            Ok(Some(job)) => self.start_job(tab, job),
            Ok(None) => self.start_report(),
            Err(error) => {
                info!(%error, "form validation failed");
                self.show_message("Input Required", &error.to_string());
            }
        }
    }

    /// Starts `job` in `tab`, clearing its console.
    pub fn start_job(&mut self, tab: Tab, job: Job) {
        self.status_message = job.title();
        let event_tx = self.event_tx.clone();
        let state = self.tab_state_mut(tab);
        state.console.clear();
        state.job = Some(TaskService::spawn_job(job, tab, event_tx));
    }

    /// Requests the job of the current tab to stop.
    pub fn stop_current_job(&mut self) {
        match &self.current_state().job {
            Some(job) => {
                job.stop();
                self.status_message = "Stopping...".to_string();
            }
            None => self.status_message = "No command is running".to_string(),
        }
    }

    /// Kills every running job and waits up to `timeout` for each to end.
    /// Called on quit.
    pub async fn shutdown_jobs(&mut self, timeout: Duration) {
        let jobs: Vec<(Tab, JobHandle)> = Tab::ALL
            .into_iter()
            .filter_map(|tab| Some((tab, self.tab_state_mut(tab).job.take()?)))
            .collect();
        for (_, job) in &jobs {
            job.stop();
        }

        for (tab, job) in jobs {
            if !job.join(timeout).await {
                warn!(tab = tab.title(), "job did not stop in time");
            }
        }
    }

    pub fn clear_console(&mut self) {
        self.current_state_mut().console.clear();
    }

    pub fn scroll_console_up(&mut self, rows: u16) {
        self.current_state_mut().console.scroll_up(rows);
    }

    pub fn scroll_console_down(&mut self, rows: u16) {
        self.current_state_mut().console.scroll_down(rows);
    }

    pub fn follow_console_tail(&mut self) {
        self.current_state_mut().console.follow_tail();
    }

    /// Starts the installation probe in the background.
    pub fn start_tool_check(&mut self, probe: Arc<dyn ToolProbe>) {
        self.tool_status = ToolStatus::Checking;
        TaskService::spawn_tool_check(probe, self.event_tx.clone());
    }

    /// Marks the installation as unchecked without running the probe.
    pub fn skip_tool_check(&self) {
        self.emit_app_event(AppEvent::ToolStatusUpdated {
            status: ToolStatus::Skipped,
        });
    }

    /// Applies one or more queued app events through a single reducer path.
    ///
    /// This method drains currently queued app events, then applies console
    /// output before job completions so summaries land after the output.
    pub(crate) fn apply_app_events(&mut self, first_event: AppEvent) {
        let drained_events = self.drain_app_events(first_event);
        let event_batch = Self::reduce_app_events(drained_events);

        self.apply_app_event_batch(event_batch);
    }

    /// Enqueues an app event onto the internal app event bus.
    pub(crate) fn emit_app_event(&self, event: AppEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Processes currently queued app events without waiting.
    pub(crate) fn process_pending_app_events(&mut self) {
        let Ok(first_event) = self.event_rx.try_recv() else {
            return;
        };

        self.apply_app_events(first_event);
    }

    /// Waits for the next internal app event.
    pub(crate) async fn next_app_event(&mut self) -> Option<AppEvent> {
        self.event_rx.recv().await
    }

    fn drain_app_events(&mut self, first_event: AppEvent) -> Vec<AppEvent> {
        let mut events = vec![first_event];
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }

        events
    }

    fn reduce_app_events(events: Vec<AppEvent>) -> AppEventBatch {
        let mut event_batch = AppEventBatch::default();
        for event in events {
            event_batch.collect_event(event);
        }

        event_batch
    }

    fn apply_app_event_batch(&mut self, event_batch: AppEventBatch) {
        for (tab, line) in event_batch.job_lines {
            let offset = self.utc_offset;
            self.tab_state_mut(tab).console.push(line, offset);
        }

        for (tab, summary) in event_batch.finished_jobs {
            self.apply_job_finished(tab, summary);
        }

        if let Some(status) = event_batch.tool_status {
            self.apply_tool_status(status);
        }

        if let Some(result) = event_batch.report_result {
            self.apply_report_finished(result);
        }
    }

    fn apply_job_finished(&mut self, tab: Tab, summary: JobSummary) {
        self.tab_state_mut(tab).job = None;
        let outcome = match summary {
            JobSummary::Succeeded => "command completed",
            JobSummary::Failed => "command failed",
            JobSummary::Stopped => "command stopped",
        };
        self.status_message = format!("{}: {outcome}", tab.title());
    }

    fn apply_tool_status(&mut self, status: ToolStatus) {
        self.tool_status = status;
        if status == ToolStatus::Ready {
            self.status_message = "Ready - MVT installation verified".to_string();
        }
        if !status.needs_attention() {
            return;
        }

        warn!(status = status.label(), "MVT installation needs attention");
        if self.mode == AppMode::Normal {
            self.show_message(INSTALL_WARNING_TITLE, INSTALL_WARNING_MESSAGE);
        } else {
            self.pending_install_warning = true;
        }
    }

    fn apply_report_finished(&mut self, result: Result<PathBuf, String>) {
        self.report_in_flight = false;
        let offset = self.utc_offset;

        match result {
            Ok(path) => {
                let display = paths::display_path(&path);
                info!(path = %path.display(), "report generated");
                self.tab_state_mut(Tab::Report).console.push(
                    JobLine::new(LineKind::Success, format!("PDF report saved to {display}")),
                    offset,
                );
                self.status_message = "PDF report generated".to_string();
                self.show_message("Report Generated", &format!("PDF report saved to {display}"));
            }
            Err(error) => {
                self.tab_state_mut(Tab::Report).console.push(
                    JobLine::new(
                        LineKind::Failure,
                        format!("Report generation failed: {error}"),
                    ),
                    offset,
                );
                self.status_message = "PDF report generation failed".to_string();
                self.show_message("Report Failed", &error);
            }
        }
    }

    fn start_report(&mut self) {
        if self.report_in_flight {
            self.status_message = "A report is already being generated".to_string();

            return;
        }

        let request = match ReportRequest::from_form(&self.tab_state(Tab::Report).form) {
            Ok(request) => request,
            Err(error) => {
                self.show_message("Input Required", &error.to_string());

                return;
            }
        };

        let offset = self.utc_offset;
        let console = &mut self.tab_state_mut(Tab::Report).console;
        console.clear();
        console.push(
            JobLine::new(
                LineKind::Info,
                format!(
                    "Generating PDF report from {}...",
                    paths::display_path(&request.scan_dir)
                ),
            ),
            offset,
        );
        self.status_message = "Generating PDF report...".to_string();
        self.report_in_flight = true;
        TaskService::spawn_report(request, self.event_tx.clone());
    }

    /// Writes a field value. Setting an analysis output path also fills an
    /// empty report directory.
    fn set_field_value(&mut self, tab: Tab, id: FieldId, value: &str) {
        self.tab_state_mut(tab).form.set_text(id, value);

        let is_analysis_output = matches!(tab, Tab::Ios | Tab::Android) && id == FieldId::OutputPath;
        let report_form = &mut self.tab_state_mut(Tab::Report).form;
        if is_analysis_output && report_form.text(FieldId::ScanDir).is_empty() {
            report_form.set_text(FieldId::ScanDir, value.trim());
        }
    }

    fn show_message(&mut self, title: &str, message: &str) {
        self.mode = AppMode::Message {
            title: title.to_string(),
            message: message.to_string(),
        };
    }

    /// Returns to normal mode, surfacing a deferred installation warning.
    fn set_normal_mode(&mut self) {
        self.mode = AppMode::Normal;

        if std::mem::take(&mut self.pending_install_warning) {
            self.show_message(INSTALL_WARNING_TITLE, INSTALL_WARNING_MESSAGE);
        }
    }
}

impl AppEventBatch {
    fn collect_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::JobOutput { tab, line } => {
                self.job_lines.push((tab, line));
            }
            AppEvent::JobFinished { tab, summary } => {
                self.finished_jobs.push((tab, summary));
            }
            AppEvent::ToolStatusUpdated { status } => {
                self.tool_status = Some(status);
            }
            AppEvent::ReportFinished { result } => {
                self.report_result = Some(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::domain::{IosAction, MvtCommand, UtilityAction};
    use crate::infra::probe::MockToolProbe;

    fn test_app() -> App {
        let config = Config {
            ioc_dir: PathBuf::from("/data/mvt/indicators"),
            home: PathBuf::from("/tmp/mvtty"),
            skip_tool_check: true,
        };

        App::new(&config, UtcOffset::UTC)
    }

    fn console_texts(app: &App, tab: Tab) -> Vec<String> {
        app.tab_state(tab)
            .console
            .lines()
            .iter()
            .map(|line| line.text.clone())
            .collect()
    }

    /// Applies app events until the job in `tab` finishes.
    async fn wait_for_job(app: &mut App, tab: Tab) {
        while app.tab_state(tab).is_running() {
            let event = tokio::time::timeout(Duration::from_secs(10), app.next_app_event())
                .await
                .expect("job timed out")
                .expect("channel closed");
            app.apply_app_events(event);
        }
    }

    #[test]
    fn test_app_event_batch_keeps_line_order_per_tab() {
        // Arrange
        let mut event_batch = AppEventBatch::default();

        // Act
        event_batch.collect_event(AppEvent::JobOutput {
            tab: Tab::Ios,
            line: JobLine::output("first"),
        });
        event_batch.collect_event(AppEvent::JobOutput {
            tab: Tab::Android,
            line: JobLine::output("other"),
        });
        event_batch.collect_event(AppEvent::JobOutput {
            tab: Tab::Ios,
            line: JobLine::output("second"),
        });
        event_batch.collect_event(AppEvent::JobFinished {
            tab: Tab::Ios,
            summary: JobSummary::Succeeded,
        });

        // Assert
        let ios_lines: Vec<&str> = event_batch
            .job_lines
            .iter()
            .filter(|(tab, _)| *tab == Tab::Ios)
            .map(|(_, line)| line.text.as_str())
            .collect();
        assert_eq!(ios_lines, ["first", "second"]);
        assert_eq!(
            event_batch.finished_jobs,
            vec![(Tab::Ios, JobSummary::Succeeded)]
        );
    }

    #[test]
    fn test_app_event_batch_keeps_latest_tool_status() {
        // Arrange
        let mut event_batch = AppEventBatch::default();

        // Act
        event_batch.collect_event(AppEvent::ToolStatusUpdated {
            status: ToolStatus::Missing,
        });
        event_batch.collect_event(AppEvent::ToolStatusUpdated {
            status: ToolStatus::Ready,
        });

        // Assert
        assert_eq!(event_batch.tool_status, Some(ToolStatus::Ready));
    }

    #[test]
    fn test_process_pending_app_events_applies_output_to_console() {
        // Arrange
        let mut app = test_app();
        app.emit_app_event(AppEvent::JobOutput {
            tab: Tab::Utilities,
            line: JobLine::output("mvt 2.5.0"),
        });

        // Act
        app.process_pending_app_events();

        // Assert
        assert_eq!(console_texts(&app, Tab::Utilities), ["mvt 2.5.0"]);
        assert!(app.tab_state(Tab::Ios).console.is_empty());
    }

    #[test]
    fn test_run_action_shows_validation_message() {
        // Arrange
        let mut app = test_app();

        // Act
        app.run_action(Action::Ios(IosAction::DecryptBackup));

        // Assert
        assert_eq!(
            app.mode,
            AppMode::Message {
                title: "Input Required".to_string(),
                message: "Please select a backup path".to_string(),
            }
        );
        assert!(!app.current_state().is_running());
    }

    #[test]
    fn test_activate_focused_enters_edit_mode_with_current_value() {
        // Arrange
        let mut app = test_app();
        app.current_state_mut()
            .form
            .set_text(FieldId::BackupPath, "/backups");

        // Act
        app.activate_focused();

        // Assert
        assert_eq!(
            app.mode,
            AppMode::Editing {
                draft: "/backups".to_string()
            }
        );
    }

    #[test]
    fn test_commit_edit_prefills_report_directory_from_output_path() {
        // Arrange
        let mut app = test_app();
        app.focus_next();
        app.activate_focused();

        // Act
        app.commit_edit("/cases/7/results");

        // Assert
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(
            app.tab_state(Tab::Ios).form.text(FieldId::OutputPath),
            "/cases/7/results"
        );
        assert_eq!(
            app.tab_state(Tab::Report).form.text(FieldId::ScanDir),
            "/cases/7/results"
        );
    }

    #[test]
    fn test_open_path_picker_requires_path_field() {
        // Arrange
        let dir = tempdir().expect("failed to create temp dir");
        let mut app = test_app();
        app.current_state_mut()
            .form
            .set_text(FieldId::BackupPath, &dir.path().to_string_lossy());

        // Act
        let opened = app.open_path_picker();
        app.cancel_path_picker();
        app.focus_previous();
        let opened_on_action = app.open_path_picker();

        // Assert
        assert!(opened);
        assert!(!opened_on_action);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_tool_status_warning_is_deferred_while_editing() {
        // Arrange
        let mut app = test_app();
        app.mode = AppMode::Editing {
            draft: String::new(),
        };

        // Act
        app.apply_app_events(AppEvent::ToolStatusUpdated {
            status: ToolStatus::Missing,
        });
        let mode_while_editing = app.mode.clone();
        app.cancel_edit();

        // Assert
        assert_eq!(
            mode_while_editing,
            AppMode::Editing {
                draft: String::new()
            }
        );
        assert_eq!(app.tool_status(), ToolStatus::Missing);
        assert!(matches!(
            app.mode,
            AppMode::Message { ref title, .. } if title == INSTALL_WARNING_TITLE
        ));
    }

    #[test]
    fn test_skip_tool_check_marks_status_unchecked() {
        // Arrange
        let mut app = test_app();

        // Act
        app.skip_tool_check();
        app.process_pending_app_events();

        // Assert
        assert_eq!(app.tool_status(), ToolStatus::Skipped);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[tokio::test]
    async fn test_start_tool_check_applies_mocked_probe_result() {
        // Arrange
        let mut app = test_app();
        let mut probe = MockToolProbe::new();
        probe.expect_probe().returning(|| ToolStatus::Ready);

        // Act
        app.start_tool_check(Arc::new(probe));
        let event = app.next_app_event().await.expect("channel closed");
        app.apply_app_events(event);

        // Assert
        assert_eq!(app.tool_status(), ToolStatus::Ready);
        assert_eq!(app.status_message(), "Ready - MVT installation verified");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[tokio::test]
    async fn test_start_job_streams_into_tab_console() {
        // Arrange
        let mut app = test_app();
        let job = Job::single(MvtCommand::new("sh").arg("-c").arg("echo checked"));

        // Act
        app.start_job(Tab::Android, job);
        let running = app.tab_state(Tab::Android).is_running();
        wait_for_job(&mut app, Tab::Android).await;

        // Assert
        assert!(running);
        assert_eq!(
            console_texts(&app, Tab::Android),
            [
                "Executing: sh -c echo checked",
                "checked",
                "Command completed successfully!"
            ]
        );
        assert_eq!(app.status_message(), "Android Analysis: command completed");
        assert_eq!(app.busy_count(), 0);
    }

    #[tokio::test]
    async fn test_run_action_rejects_second_job_in_same_tab() {
        // Arrange
        let mut app = test_app();
        app.tabs.set(Tab::Utilities);
        app.start_job(
            Tab::Utilities,
            Job::single(MvtCommand::new("sh").arg("-c").arg("sleep 30")),
        );

        // Act
        app.run_action(Action::Utility(UtilityAction::VersionCheck));
        let status = app.status_message().to_string();
        app.stop_current_job();
        wait_for_job(&mut app, Tab::Utilities).await;

        // Assert
        assert_eq!(status, "A command is already running in this tab");
        assert_eq!(
            console_texts(&app, Tab::Utilities).last().map(String::as_str),
            Some("Stopped by user.")
        );
        assert_eq!(app.status_message(), "Utilities: command stopped");
    }

    #[tokio::test]
    async fn test_shutdown_jobs_stops_every_tab_and_waits() {
        // Arrange
        let mut app = test_app();
        app.start_job(
            Tab::Ios,
            Job::single(MvtCommand::new("sh").arg("-c").arg("sleep 30")),
        );
        app.start_job(
            Tab::Android,
            Job::single(MvtCommand::new("sh").arg("-c").arg("sleep 30")),
        );

        // Act
        tokio::time::timeout(
            Duration::from_secs(10),
            app.shutdown_jobs(Duration::from_secs(5)),
        )
        .await
        .expect("shutdown timed out");

        // Assert
        assert!(!app.tab_state(Tab::Ios).is_running());
        assert!(!app.tab_state(Tab::Android).is_running());
        let mut stopped_tabs = Vec::new();
        while let Ok(event) = app.event_rx.try_recv() {
            if let AppEvent::JobFinished { tab, summary } = event {
                assert_eq!(summary, JobSummary::Stopped);
                stopped_tabs.push(tab);
            }
        }
        stopped_tabs.sort_by_key(|tab| tab.index());
        assert_eq!(stopped_tabs, [Tab::Ios, Tab::Android]);
    }

    #[tokio::test]
    async fn test_generate_report_writes_pdf_and_shows_message() {
        // Arrange
        let dir = tempdir().expect("failed to create temp dir");
        let info = serde_json::json!({"target_path": "/cases/7", "mvt_version": "2.5.0"});
        fs::write(dir.path().join("info.json"), info.to_string()).expect("failed to write fixture");
        let mut app = test_app();
        app.tabs.set(Tab::Report);
        app.current_state_mut()
            .form
            .set_text(FieldId::ScanDir, &dir.path().to_string_lossy());
        app.current_state_mut()
            .form
            .set_text(FieldId::FileName, "case-7");

        // Act
        app.run_action(Action::GenerateReport);
        let in_flight = app.is_report_in_flight();
        let event = tokio::time::timeout(Duration::from_secs(30), app.next_app_event())
            .await
            .expect("report timed out")
            .expect("channel closed");
        app.apply_app_events(event);

        // Assert
        assert!(in_flight);
        assert!(!app.is_report_in_flight());
        assert!(dir.path().join("case-7.pdf").is_file());
        assert!(matches!(
            app.mode,
            AppMode::Message { ref title, .. } if title == "Report Generated"
        ));
    }
}
