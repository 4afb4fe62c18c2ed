//! Renderer seams for message bodies and avatars.
//!
//! The transcript item owns suppression, scheduling, and layout; what a
//! message or an avatar actually looks like is delegated through these
//! traits. [`crate::ui::TextMessageRenderer`] and
//! [`crate::ui::InitialsAvatarRenderer`] are the defaults; embedders swap in
//! their own to change presentation without touching the item machinery.

use crossbeam_channel::Sender;

use eframe::egui;

use crate::model::{ChatMessage, Participant};
use crate::ui::message::TextSegment;
use crate::ui::theme::TranscriptTheme;

/// Report that a message was painted while unread.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadReceipt {
    /// Scroll region the reporting item lives in.
    pub region: String,
    /// Timestamp of the message that was painted.
    pub message_time: i64,
}

/// Read-state inputs handed to every message renderer, untouched. The item
/// forwards these without interpreting them; whether and how to report reads
/// is entirely the renderer's business.
#[derive(Clone, Default)]
pub struct ReadTracking {
    /// Timestamp of the newest message the local user has read, if known.
    pub last_read_time: Option<i64>,
    /// Where to report painted-while-unread messages.
    pub mark_read: Option<Sender<ReadReceipt>>,
}

impl ReadTracking {
    /// No read tracking at all; renderers see `None` on both fields.
    pub fn disabled() -> Self {
        Self::default()
    }
}

/// Everything a message renderer gets for one message.
pub struct MessageContext<'a> {
    pub message: &'a ChatMessage,
    /// Message text pre-split into plain runs and links.
    pub segments: &'a [TextSegment],
    pub theme: &'a TranscriptTheme,
    pub read_tracking: &'a ReadTracking,
    /// Scroll region of the item painting this message.
    pub region: &'a str,
}

/// Renders one message body.
pub trait MessageRenderer {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &MessageContext<'_>);
}

/// Renders the avatar block next to a user group.
pub trait AvatarRenderer {
    fn render(&mut self, ui: &mut egui::Ui, participant: &Participant, theme: &TranscriptTheme);
}
