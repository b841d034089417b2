use eframe::egui;
use rfd::FileDialog;
use std::path::Path;

use crate::command::DEFAULT_OUTPUT_FOLDER;
use crate::localizations::Localizations;
use crate::models::{AppState, AudioFormat, FormState, MediaKind, VideoFormat};
use crate::theme::*;

fn labeled_input(
    ui: &mut egui::Ui,
    label: String,
    value: &mut String,
    hint: String,
    width: f32,
) -> egui::Response {
    ui.label(label);
    egui::Frame::group(ui.style())
        .fill(INPUT_BG)
        .stroke(egui::Stroke::new(1.0, BORDER_COLOR))
        .rounding(ROUNDING_FRAME)
        .show(ui, |ui| {
            ui.add_sized(
                [width, INPUT_HEIGHT],
                egui::TextEdit::singleline(value)
                    .hint_text(hint)
                    .frame(false)
                    .font(egui::FontId::proportional(15.0)),
            )
        })
        .inner
}

pub fn render_url_input(ui: &mut egui::Ui, form: &mut FormState, localizer: &Localizations) -> egui::Response {
    let width = ui.available_width() - 16.0;
    labeled_input(
        ui,
        localizer.text("url-label"),
        &mut form.url,
        localizer.text("url-placeholder"),
        width,
    )
}

pub fn render_output_folder(ui: &mut egui::Ui, form: &mut FormState, localizer: &Localizations) {
    ui.label(localizer.text("output-folder-label"));

    ui.horizontal(|ui| {
        egui::Frame::group(ui.style())
            .fill(INPUT_BG)
            .stroke(egui::Stroke::new(1.0, BORDER_COLOR))
            .rounding(ROUNDING_FRAME)
            .show(ui, |ui| {
                ui.add_sized(
                    [ui.available_width() - 120.0, INPUT_HEIGHT],
                    egui::TextEdit::singleline(&mut form.output_folder)
                        .hint_text(DEFAULT_OUTPUT_FOLDER)
                        .frame(false),
                );
            });

        let button = egui::Button::new(egui::RichText::new(localizer.text("browse-button")).size(14.0))
            .min_size(egui::vec2(100.0, INPUT_HEIGHT + 4.0))
            .rounding(ROUNDING_FRAME);

        if ui.add(button).clicked() {
            let start = match form.output_folder.trim() {
                "" => Path::new("."),
                folder => Path::new(folder),
            };
            if let Some(path) = FileDialog::new().set_directory(start).pick_folder() {
                form.output_folder = path.to_string_lossy().to_string();
            }
        }
    });
}

/// Audio/Video choice plus the format group for whichever kind is active.
pub fn render_media_selector(ui: &mut egui::Ui, form: &mut FormState, localizer: &Localizations) {
    ui.horizontal(|ui| {
        ui.label(localizer.text("media-kind-label"));
        ui.radio_value(&mut form.media_kind, MediaKind::Audio, localizer.text("media-audio"));
        ui.radio_value(&mut form.media_kind, MediaKind::Video, localizer.text("media-video"));
    });

    ui.horizontal(|ui| match form.media_kind {
        MediaKind::Audio => {
            ui.label(egui::RichText::new(localizer.text("audio-format-label")).color(SECONDARY_TEXT));
            for format in AudioFormat::ALL {
                ui.radio_value(&mut form.audio_format, format, format.as_str());
            }
        }
        MediaKind::Video => {
            ui.label(egui::RichText::new(localizer.text("video-format-label")).color(SECONDARY_TEXT));
            for format in VideoFormat::ALL {
                ui.radio_value(&mut form.video_format, format, format.as_str());
            }
        }
    });
}

pub fn render_rename_input(ui: &mut egui::Ui, form: &mut FormState, localizer: &Localizations) {
    let width = ui.available_width() - 16.0;
    labeled_input(
        ui,
        localizer.text("rename-label"),
        &mut form.output_name,
        localizer.text("rename-placeholder"),
        width,
    );
}

pub fn render_advanced_options(ui: &mut egui::Ui, form: &mut FormState, localizer: &Localizations) {
    egui::CollapsingHeader::new(localizer.text("advanced-options"))
        .default_open(false)
        .show(ui, |ui| {
            labeled_input(
                ui,
                localizer.text("start-time-label"),
                &mut form.start_time,
                localizer.text("time-placeholder"),
                120.0,
            );
            labeled_input(
                ui,
                localizer.text("end-time-label"),
                &mut form.end_time,
                localizer.text("time-placeholder"),
                120.0,
            );
        });
}

pub fn render_status(ui: &mut egui::Ui, state: &AppState) {
    egui::Frame::group(ui.style())
        .fill(STATUS_BG)
        .rounding(8.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                if state.is_downloading {
                    ui.spinner();
                }
                let color = match state.message {
                    Some(message) if message.is_error() => TEXT_ERROR,
                    Some(_) => TEXT_SUCCESS,
                    None => egui::Color32::DARK_GRAY,
                };
                ui.label(egui::RichText::new(&state.status).color(color));
            });
        });
}

/// Modal for the pending message; closing it clears `state.message`.
pub fn render_message(ctx: &egui::Context, state: &mut AppState, localizer: &Localizations) {
    let Some(message) = state.message else {
        return;
    };
    let (title_key, body_key) = message.keys();
    let body_color = if message.is_error() { TEXT_ERROR } else { TEXT_SUCCESS };

    egui::Window::new(localizer.text(title_key))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(localizer.text(body_key)).color(body_color));
            ui.add_space(10.0);
            if ui.button(localizer.text("ok-button")).clicked() {
                state.message = None;
            }
        });
}

pub fn primary_button(text: String) -> impl egui::Widget {
    egui::Button::new(
        egui::RichText::new(text)
            .size(BUTTON_FONT_SIZE)
            .color(BUTTON_MAIN_TEXT),
    )
    .min_size(MIN_SIZE_BUTTON)
    .fill(PRIMARY_BUTTON_BG)
    .rounding(ROUNDING_BUTTON)
    .stroke(egui::Stroke::new(1.0, BORDER_COLOR))
}

pub fn secondary_button(text: String) -> impl egui::Widget {
    egui::Button::new(
        egui::RichText::new(text)
            .size(BUTTON_FONT_SIZE)
            .color(BUTTON_SECONDARY_TEXT),
    )
    .min_size(MIN_SIZE_BUTTON)
    .fill(SECONDARY_BUTTON_BG)
    .rounding(ROUNDING_BUTTON)
    .stroke(egui::Stroke::new(1.0, BORDER_COLOR))
}
