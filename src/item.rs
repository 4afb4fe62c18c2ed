//! One transcript list entry: a message group plus the visibility tracking
//! and change buffering that decide when its content is rebuilt.
//!
//! Painting and rebuilding are different things here. The item paints its
//! last applied snapshot every frame, which is cheap. Rebuilding the
//! snapshot (cloning the group, splitting out URLs, cloning the speaker)
//! only happens when the item is visible and owes a rebuild, as decided by
//! [`ChangeBuffer`]. An off-screen item that keeps receiving messages paints
//! its stale snapshot until it scrolls back in, then catches up in a single
//! rebuild.
//!
//! Visibility itself is recomputed lazily: geometry events from the item's
//! [`ScrollRegion`](crate::scroll::ScrollRegion) poke a debounced recheck;
//! once the events go quiet the item defers one frame and then measures its
//! painted rectangle against the viewport plus a prefetch margin. The one
//! exception is the mount-time check, which runs on the frame after the
//! first paint instead of waiting out a quiet window.

use std::time::{Duration, Instant};

use eframe::egui;

use crate::error::TranscriptError;
use crate::model::{MessageGroup, Participant};
use crate::render_state::{ChangeBuffer, RenderState};
use crate::schedule::{DebouncedTask, LayoutProbe};
use crate::scroll::{ScrollRegions, ScrollSubscription};
use crate::ui::{
    format_clock, participant_color, AvatarRenderer, MessageContext, MessageRenderer,
    PreparedMessage, ReadTracking, TranscriptTheme,
};
use crate::viewport::{is_within_viewport, ItemBounds};

/// Quiet window after the last geometry event before visibility is
/// recomputed. Scroll wheels and flings emit bursts; one recheck per burst
/// is enough.
pub const VISIBILITY_DEBOUNCE: Duration = Duration::from_millis(50);

/// Per-cycle inputs for one item, supplied by the list controller. The item
/// never holds onto these beyond the snapshot it applies.
#[derive(Clone, Copy)]
pub struct GroupContent<'a> {
    /// Speaker behind the group; absent for system-originated entries.
    pub participant: Option<&'a Participant>,
    pub messages: &'a MessageGroup,
    /// Timestamp shown in the group header (epoch ms).
    pub group_time: i64,
    /// Read-state inputs forwarded verbatim to each message renderer.
    pub read_tracking: &'a ReadTracking,
}

/// Presentation collaborators for one `show` call.
pub struct ItemPresenter<'a> {
    pub message_renderer: &'a mut dyn MessageRenderer,
    pub avatar_renderer: &'a mut dyn AvatarRenderer,
    pub theme: &'a TranscriptTheme,
    pub twelve_hour_clock: bool,
}

/// Applied content, cloned at rebuild time. What gets painted between
/// rebuilds, however stale.
#[derive(Debug)]
struct GroupSnapshot {
    participant: Option<Participant>,
    group_time: i64,
    messages: Vec<PreparedMessage>,
}

/// A group entry mounted into a scroll region.
#[derive(Debug)]
pub struct TranscriptItem {
    subscription: ScrollSubscription,
    recheck: DebouncedTask,
    probe: LayoutProbe,
    buffer: ChangeBuffer,
    snapshot: Option<GroupSnapshot>,
    last_rect: Option<egui::Rect>,
    applied_renders: u64,
}

impl TranscriptItem {
    /// Mount into `region_id`. Failing to find the region is a configuration
    /// error: an item cannot track visibility without a scroll region to
    /// observe. Initial visibility is measured right after the first painted
    /// frame, without waiting for a scroll event.
    pub fn mount(regions: &mut ScrollRegions, region_id: &str) -> Result<Self, TranscriptError> {
        let subscription = regions.subscribe(region_id)?;
        Ok(Self {
            subscription,
            recheck: DebouncedTask::new(VISIBILITY_DEBOUNCE),
            probe: LayoutProbe::new(),
            buffer: ChangeBuffer::new(),
            snapshot: None,
            last_rect: None,
            applied_renders: 0,
        })
    }

    /// Detach from the scroll region immediately instead of waiting for the
    /// dropped channel to be pruned on the next broadcast.
    pub fn unmount(self, regions: &mut ScrollRegions) {
        if let Some(region) = regions.get_mut(self.subscription.region()) {
            region.detach(self.subscription.listener());
        }
    }

    pub fn state(&self) -> RenderState {
        self.buffer.state()
    }

    pub fn is_visible(&self) -> bool {
        self.buffer.is_visible()
    }

    pub fn has_pending_changes(&self) -> bool {
        self.buffer.has_pending_changes()
    }

    /// How many times a snapshot has been applied (initial build included).
    pub fn applied_renders(&self) -> u64 {
        self.applied_renders
    }

    pub fn region(&self) -> &str {
        self.subscription.region()
    }

    /// Drive one frame: pull geometry events, run due visibility work,
    /// buffer or apply content changes, and paint the applied snapshot.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        content: GroupContent<'_>,
        presenter: &mut ItemPresenter<'_>,
        now: Instant,
    ) {
        // Geometry events restart the quiet window rather than measuring
        // immediately; a scroll burst collapses into one recheck.
        if self.subscription.drain() {
            self.recheck.poke(now);
        }

        // A probe armed on an earlier frame reads the layout recorded by
        // that frame. Measuring before arming keeps the read one frame
        // behind the decision to measure, after layout has settled.
        if self.probe.take() {
            self.apply_visibility();
        }
        if self.recheck.fire(now) {
            self.probe.arm();
        }

        // Change detection runs against the applied snapshot, and only when
        // no backlog is buffered already; while suppressed, further updates
        // coalesce without being compared.
        if let Some(snapshot) = &self.snapshot {
            self.buffer
                .record_incoming(|| snapshot_differs(snapshot, &content));
        }

        // The gate: the first build is unconditional, after that a rebuild
        // requires being visible with a backlog.
        if self.snapshot.is_none() || self.buffer.take_pending_render() {
            self.snapshot = Some(build_snapshot(&content));
            self.applied_renders += 1;
        }

        let background = ui.painter().add(egui::Shape::Noop);
        let mut painted = None;
        if let Some(snapshot) = &self.snapshot {
            let region = self.subscription.region();
            let inner = ui.scope(|ui| {
                paint_group(ui, snapshot, content.read_tracking, presenter, region);
            });
            painted = Some(inner.response.rect);
        }

        if let Some(rect) = painted {
            if ui.rect_contains_pointer(rect) {
                ui.painter().set(
                    background,
                    egui::Shape::rect_filled(
                        rect.expand(2.0),
                        egui::CornerRadius::same(4),
                        presenter.theme.item_hover,
                    ),
                );
            }
            // The mount-time visibility check: the first completed layout is
            // measured on the next frame, no scroll event required.
            if self.last_rect.is_none() {
                self.probe.arm();
            }
            self.last_rect = Some(rect);
        }
    }

    /// Decide visibility from the last painted rectangle and the freshest
    /// viewport geometry. No rectangle yet means the item has not completed
    /// a layout pass; it is treated as off-screen and measured again on the
    /// next geometry event.
    fn apply_visibility(&mut self) {
        let viewport = self.subscription.viewport();
        let visible = match self.last_rect {
            Some(rect) => {
                let bounds = ItemBounds::relative_to(rect, viewport);
                is_within_viewport(bounds, viewport.height)
            }
            None => false,
        };
        self.buffer.set_visible(visible);
    }
}

/// Count and speaker identity only. Text edits inside an existing message
/// do not count as a change; the feed appends, it does not rewrite.
fn snapshot_differs(snapshot: &GroupSnapshot, content: &GroupContent<'_>) -> bool {
    if snapshot.messages.len() != content.messages.len() {
        return true;
    }
    match (&snapshot.participant, content.participant) {
        (None, None) => false,
        (Some(applied), Some(incoming)) => !applied.identity_eq(incoming),
        _ => true,
    }
}

fn build_snapshot(content: &GroupContent<'_>) -> GroupSnapshot {
    GroupSnapshot {
        participant: content.participant.cloned(),
        group_time: content.group_time,
        messages: content
            .messages
            .messages()
            .iter()
            .map(|message| PreparedMessage::prepare(message.clone()))
            .collect(),
    }
}

fn paint_group(
    ui: &mut egui::Ui,
    snapshot: &GroupSnapshot,
    read_tracking: &ReadTracking,
    presenter: &mut ItemPresenter<'_>,
    region: &str,
) {
    match &snapshot.participant {
        Some(participant) => {
            paint_user_group(ui, snapshot, participant, read_tracking, presenter, region)
        }
        None => paint_system_group(ui, snapshot, read_tracking, presenter, region),
    }
}

/// User variant: avatar, name header with offline marker and group clock,
/// then each message keyed by its id.
fn paint_user_group(
    ui: &mut egui::Ui,
    snapshot: &GroupSnapshot,
    participant: &Participant,
    read_tracking: &ReadTracking,
    presenter: &mut ItemPresenter<'_>,
    region: &str,
) {
    let time_label = format_clock(snapshot.group_time, presenter.twelve_hour_clock);
    ui.horizontal(|ui| {
        presenter.avatar_renderer.render(ui, participant, presenter.theme);
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(&participant.name)
                        .strong()
                        .color(participant_color(&participant.name)),
                );
                if !participant.is_online {
                    ui.label(
                        egui::RichText::new("(offline)")
                            .italics()
                            .color(presenter.theme.text_muted),
                    );
                }
                ui.label(
                    egui::RichText::new(time_label)
                        .small()
                        .color(presenter.theme.text_muted),
                );
            });
            ui.scope(|ui| {
                ui.visuals_mut().override_text_color = Some(presenter.theme.text_primary);
                for (index, prepared) in snapshot.messages.iter().enumerate() {
                    // Stable widget identity per message; positional
                    // fallback when the feed supplies no id.
                    let key = prepared.message.id.unwrap_or(index as u64);
                    ui.push_id(key, |ui| {
                        presenter.message_renderer.render(
                            ui,
                            &MessageContext {
                                message: &prepared.message,
                                segments: &prepared.segments,
                                theme: presenter.theme,
                                read_tracking,
                                region,
                            },
                        );
                    });
                }
            });
        });
    });
}

/// System variant: no avatar, no header, messages keyed positionally.
fn paint_system_group(
    ui: &mut egui::Ui,
    snapshot: &GroupSnapshot,
    read_tracking: &ReadTracking,
    presenter: &mut ItemPresenter<'_>,
    region: &str,
) {
    ui.scope(|ui| {
        ui.visuals_mut().override_text_color = Some(presenter.theme.system_text);
        for (index, prepared) in snapshot.messages.iter().enumerate() {
            ui.push_id(index, |ui| {
                presenter.message_renderer.render(
                    ui,
                    &MessageContext {
                        message: &prepared.message,
                        segments: &prepared.segments,
                        theme: presenter.theme,
                        read_tracking,
                        region,
                    },
                );
            });
        }
    });
}
