//! Integration tests for the transcript view.
//!
//! These drive whole frames through a headless egui context: mount an item
//! into a scroll region, feed it geometry events and content, and observe
//! what it paints and when it rebuilds.

use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;
use eframe::egui;

use crate::item::{GroupContent, ItemPresenter, TranscriptItem, VISIBILITY_DEBOUNCE};
use crate::model::{ChatMessage, MessageGroup, Participant};
use crate::render_state::RenderState;
use crate::scroll::ScrollRegions;
use crate::ui::{
    AvatarRenderer, MessageContext, MessageRenderer, ReadTracking, TextMessageRenderer,
    TranscriptTheme,
};
use crate::viewport::Viewport;

const REGION: &str = "transcript";

/// Message renderer double that records every delegated call.
#[derive(Default)]
struct RecordingMessageRenderer {
    texts: Vec<String>,
}

impl MessageRenderer for RecordingMessageRenderer {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &MessageContext<'_>) {
        self.texts.push(ctx.message.text.clone());
        ui.label(ctx.message.text.as_str());
    }
}

/// Avatar renderer double that records which participant it was handed.
#[derive(Default)]
struct RecordingAvatarRenderer {
    participants: Vec<Participant>,
}

impl AvatarRenderer for RecordingAvatarRenderer {
    fn render(&mut self, ui: &mut egui::Ui, participant: &Participant, _theme: &TranscriptTheme) {
        self.participants.push(participant.clone());
        ui.allocate_exact_size(egui::vec2(24.0, 24.0), egui::Sense::hover());
    }
}

fn frame_input() -> egui::RawInput {
    egui::RawInput {
        screen_rect: Some(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(320.0, 480.0),
        )),
        ..Default::default()
    }
}

/// Run one frame with the item as the only content, returning everything
/// egui would paint.
fn run_frame(
    ctx: &egui::Context,
    item: &mut TranscriptItem,
    content: GroupContent<'_>,
    message_renderer: &mut dyn MessageRenderer,
    avatar_renderer: &mut dyn AvatarRenderer,
    theme: &TranscriptTheme,
    now: Instant,
) -> egui::FullOutput {
    ctx.run(frame_input(), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            // Reborrow so the frame closure stays callable across passes.
            let mut presenter = ItemPresenter {
                message_renderer: &mut *message_renderer,
                avatar_renderer: &mut *avatar_renderer,
                theme,
                twelve_hour_clock: false,
            };
            item.show(ui, content, &mut presenter, now);
        });
    })
}

fn collect_texts(shape: &egui::Shape, out: &mut Vec<String>) {
    match shape {
        egui::Shape::Text(text) => out.push(text.galley.job.text.clone()),
        egui::Shape::Vec(shapes) => {
            for inner in shapes {
                collect_texts(inner, out);
            }
        }
        _ => {}
    }
}

fn painted_texts(output: &egui::FullOutput) -> Vec<String> {
    let mut out = Vec::new();
    for clipped in &output.shapes {
        collect_texts(&clipped.shape, &mut out);
    }
    out
}

fn region_with_viewport(viewport: Viewport) -> ScrollRegions {
    let mut regions = ScrollRegions::new();
    regions.register(REGION).resized(viewport);
    regions
}

/// System variant: no avatar, one delegated call per message.
#[test]
fn test_system_group_delegates_without_avatar() {
    let ctx = egui::Context::default();
    let mut regions = region_with_viewport(Viewport::new(0.0, 480.0));
    let t0 = Instant::now();
    let mut item = TranscriptItem::mount(&mut regions, REGION).unwrap();

    let group = MessageGroup::single(ChatMessage::new(1, "hi", 1_000));
    let tracking = ReadTracking::disabled();
    let content = GroupContent {
        participant: None,
        messages: &group,
        group_time: 1_000,
        read_tracking: &tracking,
    };

    let mut messages = RecordingMessageRenderer::default();
    let mut avatars = RecordingAvatarRenderer::default();
    let theme = TranscriptTheme::dark();
    run_frame(&ctx, &mut item, content, &mut messages, &mut avatars, &theme, t0);

    assert_eq!(messages.texts, vec!["hi".to_string()]);
    assert!(avatars.participants.is_empty());
    assert_eq!(item.applied_renders(), 1);
}

/// User variant: avatar delegated, name and offline marker painted.
#[test]
fn test_offline_speaker_header() {
    let ctx = egui::Context::default();
    let mut regions = region_with_viewport(Viewport::new(0.0, 480.0));
    let t0 = Instant::now();
    let mut item = TranscriptItem::mount(&mut regions, REGION).unwrap();

    let bob = Participant::new("Bob", false);
    let group = MessageGroup::single(ChatMessage::new(1, "back soon", 1_000));
    let tracking = ReadTracking::disabled();
    let content = GroupContent {
        participant: Some(&bob),
        messages: &group,
        group_time: 1_000,
        read_tracking: &tracking,
    };

    let mut messages = RecordingMessageRenderer::default();
    let mut avatars = RecordingAvatarRenderer::default();
    let theme = TranscriptTheme::dark();
    let output = run_frame(&ctx, &mut item, content, &mut messages, &mut avatars, &theme, t0);

    assert_eq!(avatars.participants.len(), 1);
    assert_eq!(avatars.participants[0].name, "Bob");
    assert!(!avatars.participants[0].is_online);

    let painted = painted_texts(&output);
    assert!(painted.iter().any(|t| t == "Bob"));
    assert!(painted.iter().any(|t| t == "(offline)"));
}

/// Mount, paint once, measure: an item inside the viewport settles as
/// visible and clean without any scroll event.
#[test]
fn test_initial_visibility_settles() {
    let ctx = egui::Context::default();
    let mut regions = region_with_viewport(Viewport::new(0.0, 480.0));
    let t0 = Instant::now();
    let mut item = TranscriptItem::mount(&mut regions, REGION).unwrap();

    let alice = Participant::new("alice", true);
    let group = MessageGroup::single(ChatMessage::new(1, "hello", 1_000));
    let tracking = ReadTracking::disabled();
    let content = GroupContent {
        participant: Some(&alice),
        messages: &group,
        group_time: 1_000,
        read_tracking: &tracking,
    };

    let mut messages = RecordingMessageRenderer::default();
    let mut avatars = RecordingAvatarRenderer::default();
    let theme = TranscriptTheme::dark();

    // Frame 1: initial build and first paint; visibility not yet measured.
    run_frame(&ctx, &mut item, content, &mut messages, &mut avatars, &theme, t0);
    assert_eq!(item.state(), RenderState::Hidden);

    // Frame 2: the mount-time layout read runs against that first paint.
    // No scroll event and no quiet window are involved.
    run_frame(&ctx, &mut item, content, &mut messages, &mut avatars, &theme, t0);

    assert_eq!(item.state(), RenderState::VisibleClean);
    assert_eq!(item.applied_renders(), 1);
}

/// The full suppression round trip: buffer while off-screen, paint stale,
/// catch up in exactly one rebuild on return.
#[test]
fn test_offscreen_changes_buffer_and_apply_on_return() {
    let ctx = egui::Context::default();
    let mut regions = region_with_viewport(Viewport::new(0.0, 480.0));
    let t0 = Instant::now();
    let mut item = TranscriptItem::mount(&mut regions, REGION).unwrap();

    let alice = Participant::new("alice", true);
    let mut group = MessageGroup::new(vec![
        ChatMessage::new(1, "first", 1_000),
        ChatMessage::new(2, "second", 2_000),
    ])
    .unwrap();
    let tracking = ReadTracking::disabled();

    let mut messages = RecordingMessageRenderer::default();
    let mut avatars = RecordingAvatarRenderer::default();
    let theme = TranscriptTheme::dark();

    macro_rules! frame {
        ($now:expr) => {{
            let content = GroupContent {
                participant: Some(&alice),
                messages: &group,
                group_time: 1_000,
                read_tracking: &tracking,
            };
            messages.texts.clear();
            run_frame(&ctx, &mut item, content, &mut messages, &mut avatars, &theme, $now)
        }};
    }

    // Settle as visible: first paint, then the mount-time measure.
    frame!(t0);
    frame!(t0);
    assert_eq!(item.state(), RenderState::VisibleClean);
    assert_eq!(item.applied_renders(), 1);

    // Scroll far past the item.
    regions
        .get_mut(REGION)
        .unwrap()
        .scrolled(Viewport::new(2_000.0, 480.0));
    let t1 = t0 + Duration::from_millis(10);
    frame!(t1);
    let t2 = t1 + VISIBILITY_DEBOUNCE;
    frame!(t2);
    frame!(t2);
    assert!(!item.is_visible());

    // A third message arrives while hidden: buffered, not applied, and the
    // frame still paints the two-message snapshot.
    group.push(ChatMessage::new(3, "third", 3_000));
    frame!(t2);
    assert_eq!(item.state(), RenderState::HiddenPending);
    assert_eq!(item.applied_renders(), 1);
    assert_eq!(messages.texts, vec!["first".to_string(), "second".to_string()]);

    // Further frames while hidden keep coalescing without rebuilding.
    frame!(t2);
    assert_eq!(item.applied_renders(), 1);

    // Scroll back: exactly one rebuild reflecting all three messages.
    regions
        .get_mut(REGION)
        .unwrap()
        .scrolled(Viewport::new(0.0, 480.0));
    let t3 = t2 + Duration::from_millis(10);
    frame!(t3);
    let t4 = t3 + VISIBILITY_DEBOUNCE;
    frame!(t4);
    frame!(t4);

    assert_eq!(item.state(), RenderState::VisibleClean);
    assert!(!item.has_pending_changes());
    assert_eq!(item.applied_renders(), 2);
    assert_eq!(
        messages.texts,
        vec!["first".to_string(), "second".to_string(), "third".to_string()]
    );

    // And it stays settled.
    frame!(t4);
    assert_eq!(item.applied_renders(), 2);
}

/// A visible item applies new data in the same frame it arrives.
#[test]
fn test_visible_item_applies_new_data_immediately() {
    let ctx = egui::Context::default();
    let mut regions = region_with_viewport(Viewport::new(0.0, 480.0));
    let t0 = Instant::now();
    let mut item = TranscriptItem::mount(&mut regions, REGION).unwrap();

    let alice = Participant::new("alice", true);
    let mut group = MessageGroup::single(ChatMessage::new(1, "one", 1_000));
    let tracking = ReadTracking::disabled();

    let mut messages = RecordingMessageRenderer::default();
    let mut avatars = RecordingAvatarRenderer::default();
    let theme = TranscriptTheme::dark();

    macro_rules! frame {
        ($now:expr) => {{
            let content = GroupContent {
                participant: Some(&alice),
                messages: &group,
                group_time: 1_000,
                read_tracking: &tracking,
            };
            messages.texts.clear();
            run_frame(&ctx, &mut item, content, &mut messages, &mut avatars, &theme, $now)
        }};
    }

    // First paint, then the mount-time measure.
    frame!(t0);
    frame!(t0);
    assert!(item.is_visible());
    assert_eq!(item.applied_renders(), 1);

    group.push(ChatMessage::new(2, "two", 2_000));
    frame!(t0);

    assert_eq!(item.applied_renders(), 2);
    assert_eq!(messages.texts, vec!["one".to_string(), "two".to_string()]);
    assert_eq!(item.state(), RenderState::VisibleClean);
}

/// Dropping an item detaches it from the region on the next broadcast;
/// unmounting detaches immediately.
#[test]
fn test_teardown_detaches_from_region() {
    let mut regions = region_with_viewport(Viewport::new(0.0, 480.0));

    let dropped = TranscriptItem::mount(&mut regions, REGION).unwrap();
    let unmounted = TranscriptItem::mount(&mut regions, REGION).unwrap();
    assert_eq!(regions.get_mut(REGION).unwrap().subscriber_count(), 2);

    drop(dropped);
    unmounted.unmount(&mut regions);
    assert_eq!(regions.get_mut(REGION).unwrap().subscriber_count(), 1);

    regions
        .get_mut(REGION)
        .unwrap()
        .scrolled(Viewport::new(0.0, 480.0));
    assert_eq!(regions.get_mut(REGION).unwrap().subscriber_count(), 0);
}

/// Read-tracking inputs flow through to the default renderer, which reports
/// only messages newer than the last-read watermark.
#[test]
fn test_read_receipts_flow_through_default_renderer() {
    let ctx = egui::Context::default();
    let mut regions = region_with_viewport(Viewport::new(0.0, 480.0));
    let t0 = Instant::now();
    let mut item = TranscriptItem::mount(&mut regions, REGION).unwrap();

    let alice = Participant::new("alice", true);
    let group = MessageGroup::new(vec![
        ChatMessage::new(1, "seen already", 1_000),
        ChatMessage::new(2, "fresh", 2_000),
    ])
    .unwrap();

    let (tx, rx) = unbounded();
    let tracking = ReadTracking {
        last_read_time: Some(1_500),
        mark_read: Some(tx),
    };
    let content = GroupContent {
        participant: Some(&alice),
        messages: &group,
        group_time: 1_000,
        read_tracking: &tracking,
    };

    let mut renderer = TextMessageRenderer;
    let mut avatars = RecordingAvatarRenderer::default();
    let theme = TranscriptTheme::dark();
    run_frame(&ctx, &mut item, content, &mut renderer, &mut avatars, &theme, t0);

    let receipts: Vec<_> = rx.try_iter().collect();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].region, REGION);
    assert_eq!(receipts[0].message_time, 2_000);
}
