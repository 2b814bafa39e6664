//! Chat sidebar component
//!
//! Lists chats, highlights the active one, and exposes new/delete actions.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText};
use uuid::Uuid;

/// Sidebar with the chat list and new-chat button
pub struct Sidebar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> Sidebar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.add_space(self.theme.spacing_sm);

        let new_chat = egui::Button::new(
            RichText::new("＋ New Chat").color(egui::Color32::WHITE),
        )
        .fill(self.theme.primary)
        .rounding(self.theme.button_rounding)
        .min_size(egui::Vec2::new(ui.available_width(), 32.0));

        if ui.add(new_chat).clicked() {
            self.state.new_chat();
        }

        ui.add_space(self.theme.spacing_sm);
        ui.separator();

        let active = self.state.store.active_id();
        let mut selected: Option<Uuid> = None;
        let mut deleted: Option<Uuid> = None;

        egui::ScrollArea::vertical()
            .id_salt("chat_list")
            .show(ui, |ui| {
                for chat in self.state.store.chats() {
                    let is_active = chat.id == active;
                    ui.horizontal(|ui| {
                        let title = if is_active {
                            RichText::new(&chat.title)
                                .color(self.theme.text_primary)
                                .strong()
                        } else {
                            RichText::new(&chat.title).color(self.theme.text_secondary)
                        };

                        let row = egui::Button::new(title)
                            .fill(if is_active {
                                self.theme.bg_tertiary
                            } else {
                                egui::Color32::TRANSPARENT
                            })
                            .rounding(self.theme.button_rounding)
                            .min_size(egui::Vec2::new(ui.available_width() - 32.0, 28.0));

                        if ui.add(row).clicked() {
                            selected = Some(chat.id);
                        }

                        let delete = egui::Button::new(
                            RichText::new("🗑").color(self.theme.text_muted),
                        )
                        .fill(egui::Color32::TRANSPARENT)
                        .rounding(self.theme.button_rounding);

                        if ui.add(delete).on_hover_text("Delete chat").clicked() {
                            deleted = Some(chat.id);
                        }
                    });
                }
            });

        if let Some(id) = selected {
            self.state.select_chat(id);
        }
        if let Some(id) = deleted {
            self.state.delete_chat(id);
        }
    }
}
