//! Color themes and styling utilities for the transcript view.
//!
//! The theme is a small semantic palette rather than a full design system:
//! background and hover surfaces, a three-level text hierarchy, link and
//! presence colors. Participant name colors are derived deterministically
//! from the name so the same speaker keeps the same color across sessions
//! and machines.

use eframe::egui::Color32;

/// Semantic colors for one transcript surface.
#[derive(Clone, Debug)]
pub struct TranscriptTheme {
    pub name: String,
    /// Transcript background.
    pub background: Color32,
    /// Hover highlight behind one item.
    pub item_hover: Color32,
    /// Main message text.
    pub text_primary: Color32,
    /// Supporting text (participant names fall back to this when uncolored).
    pub text_secondary: Color32,
    /// De-emphasized text (time labels, offline markers).
    pub text_muted: Color32,
    /// Hyperlinks inside message text.
    pub link: Color32,
    /// Presence indicator for online participants.
    pub online: Color32,
    /// Presence indicator for offline participants.
    pub offline: Color32,
    /// Centered system notices (joins, recording markers).
    pub system_text: Color32,
}

impl TranscriptTheme {
    /// Dark theme, the primary design.
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            background: Color32::from_rgb(24, 25, 31),
            item_hover: Color32::from_rgb(37, 38, 48),
            text_primary: Color32::from_rgb(235, 236, 240),
            text_secondary: Color32::from_rgb(185, 187, 190),
            text_muted: Color32::from_rgb(114, 118, 125),
            link: Color32::from_rgb(88, 156, 242),
            online: Color32::from_rgb(67, 181, 129),
            offline: Color32::from_rgb(116, 127, 141),
            system_text: Color32::from_rgb(148, 155, 164),
        }
    }

    /// Light theme, inverted from dark.
    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            background: Color32::from_rgb(252, 252, 253),
            item_hover: Color32::from_rgb(240, 241, 244),
            text_primary: Color32::from_rgb(24, 25, 28),
            text_secondary: Color32::from_rgb(79, 86, 96),
            text_muted: Color32::from_rgb(130, 138, 150),
            link: Color32::from_rgb(28, 100, 210),
            online: Color32::from_rgb(35, 134, 84),
            offline: Color32::from_rgb(116, 127, 141),
            system_text: Color32::from_rgb(96, 104, 116),
        }
    }
}

/// Participant color palette.
///
/// Distinct, saturated colors that hold up against both themes. Use
/// [`participant_color`] rather than indexing this directly.
const PARTICIPANT_COLORS: [Color32; 12] = [
    Color32::from_rgb(231, 76, 60),   // red
    Color32::from_rgb(46, 204, 113),  // emerald
    Color32::from_rgb(52, 152, 219),  // blue
    Color32::from_rgb(155, 89, 182),  // purple
    Color32::from_rgb(230, 126, 34),  // orange
    Color32::from_rgb(26, 188, 156),  // turquoise
    Color32::from_rgb(236, 100, 166), // pink
    Color32::from_rgb(41, 128, 185),  // deep blue
    Color32::from_rgb(243, 156, 18),  // amber
    Color32::from_rgb(22, 160, 133),  // sea green
    Color32::from_rgb(211, 84, 0),    // pumpkin
    Color32::from_rgb(102, 178, 255), // light blue
];

/// Deterministic color for a participant name, using an FNV-1a hash so the
/// same name always maps to the same palette entry.
pub fn participant_color(name: &str) -> Color32 {
    let mut hash: u64 = 1469598103934665603u64;
    for b in name.as_bytes() {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(1099511628211u64);
    }
    let idx = (hash as usize) % PARTICIPANT_COLORS.len();
    PARTICIPANT_COLORS[idx]
}
