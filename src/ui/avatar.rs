//! Default avatar rendering: a colored disc with the participant's initial
//! and a presence dot. The disc color comes from [`participant_color`], so
//! the avatar matches the name header; renderers that can resolve
//! `Participant::avatar` to an image replace this through the
//! [`AvatarRenderer`] seam.

use eframe::egui::{self, Align2, Color32, FontFamily, FontId, Sense, Stroke};

use crate::model::Participant;
use crate::ui::renderers::AvatarRenderer;
use crate::ui::theme::{participant_color, TranscriptTheme};

pub struct InitialsAvatarRenderer {
    pub size: f32,
}

impl Default for InitialsAvatarRenderer {
    fn default() -> Self {
        Self { size: 32.0 }
    }
}

fn initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

impl AvatarRenderer for InitialsAvatarRenderer {
    fn render(&mut self, ui: &mut egui::Ui, participant: &Participant, theme: &TranscriptTheme) {
        let size = self.size;
        let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), Sense::hover());
        let radius = size / 2.0;
        let painter = ui.painter();

        painter.circle_filled(rect.center(), radius, participant_color(&participant.name));
        painter.circle_stroke(
            rect.center(),
            radius,
            Stroke::new(1.5, Color32::from_white_alpha(15)),
        );
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            initial(&participant.name),
            FontId::new(size * 0.45, FontFamily::Proportional),
            Color32::WHITE,
        );

        // Presence dot in the lower-right corner.
        let dot_radius = size * 0.14;
        let dot_center = rect.right_bottom() - egui::vec2(dot_radius, dot_radius);
        let presence = if participant.is_online {
            theme.online
        } else {
            theme.offline
        };
        painter.circle_filled(dot_center, dot_radius, presence);
        painter.circle_stroke(dot_center, dot_radius, Stroke::new(1.5, theme.background));

        response.on_hover_text(&participant.name);
    }
}
