//! Message list component
//!
//! Renders the active chat as bubbles, the interim transcript while
//! listening, and the processing indicator while a turn is in flight.

use crate::chat::Message;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

/// Scrollable message area for the active chat
pub struct MessageList<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("messages")
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);

                for message in &self.state.store.active_chat().messages {
                    self.show_bubble(ui, message);
                    ui.add_space(self.theme.spacing_sm);
                }

                if self.state.is_processing {
                    self.show_processing(ui);
                }

                if !self.state.capture.interim().is_empty()
                    || !self.state.capture.buffer().is_empty()
                {
                    self.show_transcript(ui);
                }

                if let Some(error) = &self.state.last_error {
                    ui.label(RichText::new(error).small().color(self.theme.error));
                }

                ui.add_space(self.theme.spacing);
            });
    }

    fn show_bubble(&self, ui: &mut egui::Ui, message: &Message) {
        let (layout, fill, text_color) = if message.is_user() {
            (
                egui::Layout::right_to_left(egui::Align::TOP),
                self.theme.bubble_user,
                egui::Color32::WHITE,
            )
        } else {
            (
                egui::Layout::left_to_right(egui::Align::TOP),
                self.theme.bubble_bot,
                self.theme.text_primary,
            )
        };

        ui.with_layout(layout, |ui| {
            egui::Frame::none()
                .fill(fill)
                .rounding(self.theme.card_rounding)
                .inner_margin(self.theme.spacing_sm * 1.5)
                .show(ui, |ui| {
                    ui.set_max_width(ui.available_width() * 0.75);
                    ui.vertical(|ui| {
                        if let Some(image) = &message.image {
                            ui.label(
                                RichText::new(format!("🖼 {}", image.file_name))
                                    .small()
                                    .color(self.theme.text_muted),
                            );
                        }
                        if !message.content.is_empty() {
                            ui.label(RichText::new(&message.content).color(text_color));
                        }
                        ui.label(
                            RichText::new(message.timestamp.format("%H:%M").to_string())
                                .small()
                                .color(self.theme.text_muted),
                        );
                    });
                });
        });
    }

    fn show_processing(&self, ui: &mut egui::Ui) {
        // Three dots cycling on the frame clock
        let t = ui.ctx().input(|i| i.time);
        let phase = ((t * 2.0) as usize) % 3;
        let dots: String = (0..3)
            .map(|i| if i == phase { '●' } else { '○' })
            .collect();

        ui.horizontal(|ui| {
            ui.label(RichText::new(dots).color(self.theme.text_muted));
        });
        ui.ctx().request_repaint();
    }

    /// Live transcript: settled fragments upright, the interim tail italic
    fn show_transcript(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new("🎤").color(self.theme.listening));
                    let settled = self.state.capture.buffer().as_str();
                    if !settled.is_empty() {
                        ui.label(RichText::new(settled).color(self.theme.text_secondary));
                    }
                    if !self.state.capture.interim().is_empty() {
                        ui.label(
                            RichText::new(self.state.capture.interim())
                                .italics()
                                .color(self.theme.text_muted),
                        );
                    }
                });
            });
    }
}
