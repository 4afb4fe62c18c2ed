//! Default message body rendering with URL detection.

use eframe::egui::{self, RichText};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::ChatMessage;
use crate::ui::renderers::{MessageContext, MessageRenderer, ReadReceipt};

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(https?://|www\.)[\w\-\.\/~%&=:+?#]+").expect("URL regex pattern is valid")
});

/// One run of message text: either plain prose or a clickable link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
    Plain(String),
    Link(String),
}

/// A message with its text pre-split for painting. Segmentation runs once
/// when content is applied, not on every frame.
#[derive(Debug, Clone)]
pub struct PreparedMessage {
    pub message: ChatMessage,
    pub segments: Vec<TextSegment>,
}

impl PreparedMessage {
    pub fn prepare(message: ChatMessage) -> Self {
        let segments = segment_text(&message.text);
        Self { message, segments }
    }
}

/// Split message text into plain runs and URLs.
pub fn segment_text(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for m in URL_RE.find_iter(text) {
        if m.start() > cursor {
            segments.push(TextSegment::Plain(text[cursor..m.start()].to_string()));
        }
        segments.push(TextSegment::Link(m.as_str().to_string()));
        cursor = m.end();
    }
    if cursor < text.len() {
        segments.push(TextSegment::Plain(text[cursor..].to_string()));
    }
    segments
}

/// href for a detected link; bare `www.` URLs get a scheme so the OS opens
/// them in a browser instead of failing.
fn link_target(url: &str) -> String {
    if url.starts_with("www.") {
        format!("https://{}", url)
    } else {
        url.to_string()
    }
}

/// Default message renderer: wrapped text with inline hyperlinks, reporting
/// unread messages through the read-tracking channel when one is attached.
///
/// Plain runs take the surrounding text color, so the item can tint user
/// and system variants differently without the renderer knowing which it
/// is painting.
#[derive(Default)]
pub struct TextMessageRenderer;

impl MessageRenderer for TextMessageRenderer {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &MessageContext<'_>) {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            for segment in ctx.segments {
                match segment {
                    TextSegment::Plain(text) => {
                        ui.label(text.as_str());
                    }
                    TextSegment::Link(url) => {
                        ui.hyperlink_to(
                            RichText::new(url).color(ctx.theme.link),
                            link_target(url),
                        );
                    }
                }
            }
        });

        let unread = ctx
            .read_tracking
            .last_read_time
            .map_or(true, |last| ctx.message.time > last);
        if unread {
            if let Some(tx) = &ctx.read_tracking.mark_read {
                let _ = tx.send(ReadReceipt {
                    region: ctx.region.to_string(),
                    message_time: ctx.message.time,
                });
            }
        }
    }
}
