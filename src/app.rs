use eframe::egui;
use std::time::Duration;

use crate::command::{self, ValidationError};
use crate::config::Settings;
use crate::download::{self, DownloadError, DownloadOutcome, DownloadTask};
use crate::localizations::Localizations;
use crate::models::{AppState, UserMessage};
use crate::network::{ConnectivityProbe, HttpProbe};
use crate::ui;

const REPAINT_WHILE_BUSY: Duration = Duration::from_millis(200);

pub struct YtdlApp {
    pub state: AppState,
    localizer: Localizations,
    settings: Settings,
    probe: Box<dyn ConnectivityProbe>,
    task: Option<DownloadTask>,
}

impl YtdlApp {
    pub fn new(settings: Settings) -> Self {
        let probe = HttpProbe::new(settings.probe_url.clone(), settings.probe_timeout());
        Self::with_probe(settings, Box::new(probe))
    }

    pub fn with_probe(settings: Settings, probe: Box<dyn ConnectivityProbe>) -> Self {
        let localizer = Localizations::new(settings.language.as_deref());
        log::debug!("messages in {}", localizer.current());
        let state = AppState {
            status: localizer.text("status-ready"),
            ..Default::default()
        };

        Self {
            state,
            localizer,
            settings,
            probe,
            task: None,
        }
    }

    /// Handles a Download request. Ignored while a download is running.
    pub fn submit(&mut self) {
        if self.task.is_some() {
            return;
        }

        match self.launch() {
            Ok(task) => {
                self.task = Some(task);
                self.state.is_downloading = true;
                self.state.message = None;
                self.state.status = self.localizer.text("status-downloading");
            }
            Err(message) => self.report(message),
        }
    }

    fn launch(&self) -> Result<DownloadTask, UserMessage> {
        if !self.probe.is_connected() {
            return Err(UserMessage::NetworkError);
        }

        let snapshot = self.state.form.clone();
        let plan = command::build(&snapshot).map_err(|err| {
            log::info!("form rejected: {err}");
            validation_message(&err)
        })?;
        log::info!("running {plan}");
        log::debug!("saving to {}", plan.output_template);

        download::ensure_directory(&plan.output_folder)
            .and_then(|()| download::resolve_executable(&plan, self.settings.ytdlp_path.as_deref()))
            .and_then(|program| DownloadTask::start(&program, &plan))
            .map_err(|err| {
                log::error!("could not start download: {err}");
                download_message(&err)
            })
    }

    pub fn cancel(&mut self) {
        if let Some(task) = &self.task {
            task.cancel();
        }
    }

    /// Picks up the result of a finished download, if any.
    pub fn poll_task(&mut self) {
        let Some(outcome) = self.task.as_ref().and_then(DownloadTask::poll) else {
            return;
        };
        self.task = None;
        self.state.is_downloading = false;

        match outcome {
            DownloadOutcome::Completed => {
                log::info!("download finished");
                self.state.status = self.localizer.text("status-complete");
                self.state.message = Some(UserMessage::DownloadComplete);
            }
            DownloadOutcome::Cancelled => {
                self.state.status = self.localizer.text("status-cancelled");
            }
            DownloadOutcome::Failed(err) => {
                log::error!("download failed: {err}");
                self.report(download_message(&err));
            }
        }
    }

    fn report(&mut self, message: UserMessage) {
        let (_, body) = message.keys();
        self.state.status = self.localizer.text(body);
        self.state.message = Some(message);
    }

    pub fn update_ui(&mut self, ctx: &egui::Context) {
        let mut submit = false;
        let mut cancel = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.localizer.text("app-title"));
            ui.add_space(12.0);

            let url_response = ui::render_url_input(ui, &mut self.state.form, &self.localizer);
            if url_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }
            ui.add_space(8.0);

            ui::render_output_folder(ui, &mut self.state.form, &self.localizer);
            ui.add_space(8.0);
            ui::render_media_selector(ui, &mut self.state.form, &self.localizer);
            ui.add_space(8.0);
            ui::render_rename_input(ui, &mut self.state.form, &self.localizer);
            ui.add_space(8.0);
            ui::render_advanced_options(ui, &mut self.state.form, &self.localizer);
            ui.add_space(12.0);

            ui::render_status(ui, &self.state);
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                let busy = self.state.is_downloading;
                if ui
                    .add_enabled(!busy, ui::primary_button(self.localizer.text("download-button")))
                    .clicked()
                {
                    submit = true;
                }
                if ui
                    .add_enabled(busy, ui::secondary_button(self.localizer.text("cancel-button")))
                    .clicked()
                {
                    cancel = true;
                }
            });
        });

        ui::render_message(ctx, &mut self.state, &self.localizer);

        if submit {
            self.submit();
        }
        if cancel {
            self.cancel();
        }
    }
}

fn validation_message(err: &ValidationError) -> UserMessage {
    match err {
        ValidationError::EmptyUrl => UserMessage::EmptyUrl,
        ValidationError::InvalidTimeRange { .. } => UserMessage::InvalidTimeRange,
        ValidationError::MalformedDuration { .. } => UserMessage::MalformedTime,
    }
}

fn download_message(err: &DownloadError) -> UserMessage {
    match err {
        DownloadError::InvalidUrl => UserMessage::InvalidUrl,
        DownloadError::ToolFailed { .. } | DownloadError::Environment(_) => UserMessage::DownloadFailed,
    }
}

impl eframe::App for YtdlApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_task();
        self.update_ui(ctx);

        if self.state.is_downloading {
            ctx.request_repaint_after(REPAINT_WHILE_BUSY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormState;

    struct FixedProbe(bool);

    impl ConnectivityProbe for FixedProbe {
        fn is_connected(&self) -> bool {
            self.0
        }
    }

    fn app(online: bool, settings: Settings) -> YtdlApp {
        let settings = Settings {
            language: Some("en-US".to_string()),
            ..settings
        };
        YtdlApp::with_probe(settings, Box::new(FixedProbe(online)))
    }

    fn submit_form(app: &mut YtdlApp, form: FormState) {
        app.state.form = form;
        app.submit();
    }

    #[test]
    fn offline_aborts_before_validation() {
        let mut app = app(false, Settings::default());
        app.submit();

        assert_eq!(app.state.message, Some(UserMessage::NetworkError));
        assert_eq!(app.state.status, "Please check your internet connection and try again.");
        assert!(!app.state.is_downloading);
    }

    #[test]
    fn validation_errors_map_to_messages() {
        let mut app = app(true, Settings::default());

        submit_form(&mut app, FormState::default());
        assert_eq!(app.state.message, Some(UserMessage::EmptyUrl));

        submit_form(
            &mut app,
            FormState {
                url: "https://x/y".to_string(),
                start_time: "00:01:00".to_string(),
                end_time: "00:00:30".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(app.state.message, Some(UserMessage::InvalidTimeRange));

        submit_form(
            &mut app,
            FormState {
                url: "https://x/y".to_string(),
                start_time: "1 minute".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(app.state.message, Some(UserMessage::MalformedTime));
        assert!(app.task.is_none());
    }

    #[test]
    fn download_failures_map_to_messages() {
        assert_eq!(download_message(&DownloadError::InvalidUrl), UserMessage::InvalidUrl);
        assert_eq!(
            download_message(&DownloadError::Environment("missing".to_string())),
            UserMessage::DownloadFailed
        );
        assert_eq!(
            download_message(&DownloadError::ToolFailed {
                exit_code: Some(1),
                stderr: String::new(),
            }),
            UserMessage::DownloadFailed
        );
    }

    #[cfg(unix)]
    fn run_to_end(app: &mut YtdlApp) {
        for _ in 0..100 {
            app.poll_task();
            if !app.state.is_downloading {
                return;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        panic!("download did not finish");
    }

    #[cfg(unix)]
    #[test]
    fn runs_configured_program_into_created_folder() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("media");
        let settings = Settings {
            ytdlp_path: Some(which::which("true").unwrap()),
            ..Settings::default()
        };
        let mut app = app(true, settings);

        submit_form(
            &mut app,
            FormState {
                url: "https://x/y".to_string(),
                output_folder: folder.to_string_lossy().to_string(),
                ..Default::default()
            },
        );
        assert!(folder.is_dir());
        assert!(app.state.is_downloading);
        assert_eq!(app.state.status, "Downloading...");

        run_to_end(&mut app);
        assert_eq!(app.state.message, Some(UserMessage::DownloadComplete));
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_reports_generic_failure() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            ytdlp_path: Some(which::which("false").unwrap()),
            ..Settings::default()
        };
        let mut app = app(true, settings);

        submit_form(
            &mut app,
            FormState {
                url: "https://x/y".to_string(),
                output_folder: dir.path().to_string_lossy().to_string(),
                ..Default::default()
            },
        );
        run_to_end(&mut app);
        assert_eq!(app.state.message, Some(UserMessage::DownloadFailed));
    }
}
