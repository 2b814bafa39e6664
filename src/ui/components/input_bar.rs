//! Input bar component
//!
//! Text input, mic toggle, staged-image indicator, and send button. Images
//! arrive by dropping a file onto the window (handled in the app) and show
//! up here as a removable chip.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

/// Input bar for text and voice input
pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                if self.state.pending_image.is_some() {
                    self.show_image_chip(ui);
                    ui.add_space(self.theme.spacing_sm);
                }

                ui.horizontal(|ui| {
                    self.show_mic_button(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_text_input(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_send_button(ui);
                });
            });
    }

    fn show_image_chip(&mut self, ui: &mut egui::Ui) {
        let name = self
            .state
            .pending_image
            .as_ref()
            .map(|i| i.file_name.clone())
            .unwrap_or_default();

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("🖼 {}", name))
                    .small()
                    .color(self.theme.text_secondary),
            );
            if ui.small_button("✕").on_hover_text("Remove image").clicked() {
                self.state.pending_image = None;
            }
        });
    }

    fn show_mic_button(&mut self, ui: &mut egui::Ui) {
        let listening = self.state.capture.is_listening();

        let (icon, color) = if listening {
            ("⏹", self.theme.listening)
        } else {
            ("🎤", self.theme.text_secondary)
        };

        let button = egui::Button::new(RichText::new(icon).size(20.0).color(color))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding);

        let button = if listening {
            button.fill(self.theme.listening.gamma_multiply(0.2))
        } else {
            button
        };

        let response = ui.add(button);
        let rect = response.rect;

        if response
            .on_hover_text(if listening {
                "Stop listening"
            } else {
                "Start listening"
            })
            .clicked()
        {
            self.state.toggle_listening();
        }

        if listening {
            // Pulsing ring while the microphone is open
            let t = ui.ctx().input(|i| i.time);
            let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;

            ui.painter().circle_stroke(
                rect.center(),
                rect.width() / 2.0 + 2.0 + pulse * 3.0,
                egui::Stroke::new(
                    2.0 * pulse,
                    self.theme.listening.gamma_multiply(1.0 - pulse * 0.5),
                ),
            );
            ui.ctx().request_repaint();
        }
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        let available_width = ui.available_width() - 60.0;

        let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
            .hint_text("Type a message or drop an image...")
            .desired_width(available_width)
            .font(egui::TextStyle::Body)
            .margin(egui::Margin::symmetric(12.0, 8.0));

        let response = ui.add(text_edit);

        if response.has_focus() {
            let enter = ui.input(|i| i.key_pressed(Key::Enter));
            if enter {
                self.state.send_input();
                response.request_focus();
            }
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send = !self.state.input_text.trim().is_empty()
            || self.state.pending_image.is_some();

        let fill = if can_send {
            self.theme.primary
        } else {
            self.theme.text_muted
        };

        let button = egui::Button::new(
            RichText::new("➤").size(18.0).color(egui::Color32::WHITE),
        )
        .min_size(Vec2::splat(44.0))
        .rounding(self.theme.button_rounding)
        .fill(fill);

        let response = ui.add_enabled(can_send, button);
        if response.clicked() {
            self.state.send_input();
        }
        response.on_hover_text("Send message (Enter)");
    }
}
