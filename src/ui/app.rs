//! Main application struct and eframe integration

use crate::ui::components::{InputBar, MessageList, RolePrompt, Sidebar};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use std::time::{Duration, Instant};

/// Main Parley application
pub struct ParleyApp {
    /// Application state
    state: AppState,
    /// Visual theme
    theme: Theme,
}

impl ParleyApp {
    /// Create the application around a ready state
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self { state, theme }
    }

    /// Accept dropped image files as staged attachments
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<_> = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(path) = file.path {
                if crate::image::is_supported_image(&path) {
                    self.state.attach_image(&path);
                }
            }
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("☰").on_hover_text("Toggle sidebar").clicked() {
                        self.state.sidebar_open = !self.state.sidebar_open;
                    }

                    ui.label(
                        RichText::new("Parley")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new("Voice Chat")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.state.capture.is_listening() {
                            ui.label(
                                RichText::new("🎤 Listening...")
                                    .size(13.0)
                                    .color(self.theme.listening),
                            );
                        }
                    });
                });
            });
    }

    fn show_sidebar(&mut self, ctx: &egui::Context) {
        if !self.state.sidebar_open {
            return;
        }

        SidePanel::left("sidebar")
            .resizable(false)
            .default_width(220.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(self.theme.spacing_sm),
            )
            .show(ctx, |ui| {
                Sidebar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_input_area(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.vertical(|ui| {
                    RolePrompt::new(&mut self.state, &self.theme).show(ui);
                    InputBar::new(&mut self.state, &self.theme).show(ui);
                });
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                MessageList::new(&self.state, &self.theme).show(ui);
            });
    }
}

impl eframe::App for ParleyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain worker events and fire capture deadlines
        self.state.poll(Instant::now());

        self.handle_dropped_files(ctx);

        self.show_header(ctx);
        self.show_sidebar(ctx);
        self.show_input_area(ctx);
        self.show_content(ctx);

        // Deadlines need the loop to keep turning while listening
        if self.state.needs_repaint() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
