//! Role-selection prompt
//!
//! Shown below the greeting until a role is chosen for the conversation.

use crate::roles::ROLES;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

/// Row of role buttons
pub struct RolePrompt<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> RolePrompt<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        if self.state.role.is_some() {
            return;
        }

        ui.horizontal_wrapped(|ui| {
            ui.label(
                RichText::new("Role:")
                    .small()
                    .color(self.theme.text_muted),
            );
            let mut chosen = None;
            for role in ROLES {
                let button = egui::Button::new(
                    RichText::new(role.label).color(self.theme.text_primary),
                )
                .fill(self.theme.bg_tertiary)
                .rounding(self.theme.button_rounding);

                if ui.add(button).clicked() {
                    chosen = Some(*role);
                }
            }
            if let Some(role) = chosen {
                self.state.select_role(role);
            }
        });
    }
}
