use eframe::egui;
use tracing_subscriber::EnvFilter;

mod app;
mod command;
mod config;
mod download;
mod localizations;
mod models;
mod network;
mod theme;
mod ui;

use app::YtdlApp;
use config::Settings;

fn main() -> eframe::Result<()> {
    // Also picks up `log` records through the tracing-log bridge.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ytdlp_form=info")),
        )
        .init();

    let settings = Settings::load();
    log::debug!("settings: {settings:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([560.0, 620.0])
            .with_min_inner_size([480.0, 520.0])
            .with_title("yt-dlp Downloader"),
        ..Default::default()
    };

    let app = YtdlApp::new(settings);

    eframe::run_native(
        "yt-dlp Downloader",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Box::new(app)
        }),
    )
}
