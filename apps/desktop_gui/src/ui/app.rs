use std::{collections::HashMap, path::Path, time::Duration};

use chrono::Local;
use client_core::{
    load_settings, BlitzVerdict, FormController, PredictionError, Settings,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::{RichText, TextureHandle};
use shared::{
    domain::{FieldEdit, FormationFlag, NumericField, PassLength, PassLocation},
    protocol::InsightKind,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::images::PreviewImage;

const BLITZ_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);
const NO_BLITZ_COLOR: egui::Color32 = egui::Color32::from_rgb(22, 163, 74);

#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub settings: Settings,
    /// Set when the configured settings could not be used and defaults apply.
    pub warning: Option<String>,
}

impl StartupConfig {
    pub fn resolve(config: Option<&Path>, backend_url: Option<&str>) -> Self {
        let mut warning = None;
        let mut settings = match load_settings(config) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("falling back to default settings: {err}");
                warning = Some(format!("Using default settings: {err}"));
                Settings::default()
            }
        };
        if let Some(raw) = backend_url {
            match settings.clone().with_backend_url(raw) {
                Ok(updated) => settings = updated,
                Err(err) => {
                    tracing::warn!("ignoring --backend-url: {err}");
                    warning = Some(format!("Ignoring --backend-url: {err}"));
                }
            }
        }
        Self { settings, warning }
    }
}

enum InsightTile {
    Loading,
    Ready {
        image: PreviewImage,
        texture: Option<TextureHandle>,
    },
    Unavailable(String),
}

pub struct BlitzWatchApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    form: FormController,
    insights: HashMap<InsightKind, InsightTile>,
    status: String,
}

impl BlitzWatchApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            form: FormController::new(),
            insights: InsightKind::ALL
                .into_iter()
                .map(|kind| (kind, InsightTile::Loading))
                .collect(),
            status: startup
                .warning
                .unwrap_or_else(|| "Backend worker starting...".to_string()),
        };
        if !dispatch_backend_command(&app.cmd_tx, BackendCommand::FetchInsights, &mut app.status)
        {
            let reason = app.status.clone();
            app.mark_insights_unavailable(&reason);
        }
        app
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.status = message,
            UiEvent::PredictionFinished(result) => {
                let _ = self.form.complete_submission(result);
            }
            UiEvent::InsightLoaded { kind, image } => {
                self.insights.insert(
                    kind,
                    InsightTile::Ready {
                        image,
                        texture: None,
                    },
                );
            }
            UiEvent::InsightFailed { kind, reason } => {
                self.insights.insert(kind, InsightTile::Unavailable(reason));
            }
            UiEvent::WorkerFailed(reason) => {
                tracing::error!("backend worker failed: {reason}");
                if self.form.is_submitting() {
                    let _ = self
                        .form
                        .complete_submission(Err(PredictionError::Unavailable(reason.clone())));
                }
                self.mark_insights_unavailable(&reason);
                self.status = reason;
            }
        }
    }

    fn mark_insights_unavailable(&mut self, reason: &str) {
        for tile in self.insights.values_mut() {
            if matches!(tile, InsightTile::Loading) {
                *tile = InsightTile::Unavailable(reason.to_string());
            }
        }
    }

    fn submit(&mut self) {
        let request = self.form.begin_submission();
        if !dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Predict { request },
            &mut self.status,
        ) {
            let _ = self
                .form
                .complete_submission(Err(PredictionError::Unavailable(self.status.clone())));
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let record = self.form.record().clone();
        let mut edits = Vec::new();

        egui::Grid::new("situation_grid")
            .num_columns(3)
            .spacing([24.0, 10.0])
            .show(ui, |ui| {
                for field in NumericField::ALL {
                    ui.label(RichText::new(field.label()).strong());
                    let mut value = record.numeric(field);
                    if ui.add(egui::DragValue::new(&mut value)).changed() {
                        edits.push(FieldEdit::Numeric(field, value));
                    }
                    ui.weak(field.hint());
                    ui.end_row();
                }

                ui.label(RichText::new("Pass Location").strong());
                let mut location = record.pass_location;
                egui::ComboBox::from_id_salt("pass_location")
                    .selected_text(location.label())
                    .show_ui(ui, |ui| {
                        for choice in PassLocation::ALL.iter().copied() {
                            ui.selectable_value(&mut location, choice, choice.label());
                        }
                    });
                if location != record.pass_location {
                    edits.push(FieldEdit::PassLocation(location));
                }
                ui.end_row();

                ui.label(RichText::new("Pass Length").strong());
                let mut length = record.pass_length;
                egui::ComboBox::from_id_salt("pass_length")
                    .selected_text(length.label())
                    .show_ui(ui, |ui| {
                        for choice in PassLength::ALL.iter().copied() {
                            ui.selectable_value(&mut length, choice, choice.label());
                        }
                    });
                if length != record.pass_length {
                    edits.push(FieldEdit::PassLength(length));
                }
                ui.end_row();

                for flag in FormationFlag::ALL {
                    ui.label("");
                    let mut checked = record.flag(flag);
                    if ui.checkbox(&mut checked, flag.label()).changed() {
                        edits.push(FieldEdit::Flag(flag, checked));
                    }
                    ui.end_row();
                }
            });

        for edit in edits {
            self.form.edit(edit);
        }
    }

    fn show_submit(&mut self, ui: &mut egui::Ui) {
        let submitting = self.form.is_submitting();
        let button = egui::Button::new(RichText::new("Predict Blitz").size(18.0).strong())
            .min_size(egui::vec2(ui.available_width(), 40.0));
        if ui.add_enabled(!submitting, button).clicked() {
            self.submit();
        }
        if submitting {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Waiting for the prediction service...");
            });
        }
    }

    fn show_result(&self, ui: &mut egui::Ui) {
        let Some(outcome) = self.form.result() else {
            return;
        };
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label("Blitz Probability:");
                ui.label(RichText::new(outcome.percent()).strong());
            });
            let color = match outcome.verdict {
                BlitzVerdict::BlitzLikely => BLITZ_COLOR,
                BlitzVerdict::NoBlitz => NO_BLITZ_COLOR,
            };
            ui.label(
                RichText::new(format!("→ {}", outcome.verdict.label()))
                    .size(18.0)
                    .strong()
                    .color(color),
            );
            ui.weak(format!(
                "at {}",
                outcome.predicted_at.with_timezone(&Local).format("%H:%M:%S")
            ));
        });
    }

    fn show_insights(&mut self, ui: &mut egui::Ui) {
        ui.heading("Model Insights");
        ui.add_space(6.0);
        let insights = &mut self.insights;
        ui.columns(InsightKind::ALL.len(), |columns| {
            for (column, kind) in columns.iter_mut().zip(InsightKind::ALL) {
                column.label(RichText::new(kind.title()).strong());
                let tile = insights.entry(kind).or_insert(InsightTile::Loading);
                match tile {
                    InsightTile::Loading => {
                        column.spinner();
                    }
                    InsightTile::Unavailable(reason) => {
                        column
                            .weak(format!("[{}]", kind.title()))
                            .on_hover_text(reason.as_str());
                    }
                    InsightTile::Ready { image, texture } => {
                        let ctx = column.ctx().clone();
                        let texture = texture.get_or_insert_with(|| {
                            ctx.load_texture(
                                format!("insight_{}", kind.slug()),
                                egui::ColorImage::from_rgba_unmultiplied(
                                    [image.width, image.height],
                                    &image.rgba,
                                ),
                                egui::TextureOptions::LINEAR,
                            )
                        });
                        let width = column.available_width();
                        column.add(egui::Image::from_texture(&*texture).max_width(width));
                    }
                }
            }
        });
    }

    fn show_notice_window(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.form.pending_notice().cloned() else {
            return;
        };
        let mut acknowledged = false;
        egui::Window::new(notice.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(format!("⚠ {}", notice.message())).strong());
                ui.add_space(4.0);
                ui.weak(notice.detail());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    acknowledged = true;
                }
            });
        if acknowledged {
            self.form.acknowledge_notice();
        }
    }
}

impl eframe::App for BlitzWatchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        let blocked = self.form.pending_notice().is_some();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(self.status.as_str());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading(RichText::new("BlitzWatch Predictor").size(30.0).strong());
                    });
                    ui.add_space(12.0);
                    self.show_form(ui);
                    ui.add_space(12.0);
                    self.show_submit(ui);
                    ui.add_space(12.0);
                    self.show_result(ui);
                    ui.add_space(18.0);
                    self.show_insights(ui);
                });
            });
        });

        self.show_notice_window(ctx);
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
