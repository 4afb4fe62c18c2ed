//! Transcript view demo.
//!
//! Architecture:
//! - Main thread: runs the egui transcript UI
//! - Feed thread: produces a scripted conversation
//! - Communication via crossbeam channels
//!
//! The transcript registers one scroll region; every message group mounts a
//! [`TranscriptItem`] into it. Scroll and resize deltas from the
//! `ScrollArea` are reported to the region each frame, which is what drives
//! the items' visibility tracking and render suppression. The optional
//! state overlay shows each item's suppression state live.

use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;

use transcript_view::config::{self, ViewerSettings, DEFAULT_REGION};
use transcript_view::item::{GroupContent, ItemPresenter, TranscriptItem};
use transcript_view::model::{ChatMessage, MessageGroup, Participant};
use transcript_view::scroll::ScrollRegions;
use transcript_view::ui::{
    InitialsAvatarRenderer, ReadReceipt, ReadTracking, TextMessageRenderer, TranscriptTheme,
};
use transcript_view::viewport::Viewport;

/// Events sent from the feed thread to the UI.
#[derive(Debug, Clone)]
enum FeedEvent {
    /// Open a new user-attributed group with its first message.
    UserGroup {
        participant: Participant,
        message: ChatMessage,
    },
    /// Append to the most recent group of this speaker.
    Append { speaker: String, message: ChatMessage },
    /// Open a system-message group.
    SystemGroup { message: ChatMessage },
    /// Flip a speaker's online status in every group they appear in.
    Presence { speaker: String, online: bool },
}

/// Scripted conversation. Early groups keep receiving appends long after
/// the transcript has scrolled past them, which is exactly the case the
/// render suppression exists for.
fn run_feed(feed_tx: Sender<FeedEvent>) {
    let mut id = 0u64;
    let mut msg = |text: &str| {
        id += 1;
        ChatMessage::new(id, text, Utc::now().timestamp_millis())
    };

    let opening = [
        FeedEvent::SystemGroup {
            message: ChatMessage::system("maya joined the room", Utc::now().timestamp_millis()),
        },
        FeedEvent::UserGroup {
            participant: Participant::new("maya", true),
            message: msg("hey everyone"),
        },
        FeedEvent::Append {
            speaker: "maya".into(),
            message: msg("is the dashboard down for anyone else? https://status.example.com"),
        },
        FeedEvent::UserGroup {
            participant: Participant::new("jonas", true),
            message: msg("loads fine here"),
        },
        FeedEvent::SystemGroup {
            message: ChatMessage::system("recording started", Utc::now().timestamp_millis()),
        },
        FeedEvent::UserGroup {
            participant: Participant::new("priya", true),
            message: msg("try www.example.com/incidents first"),
        },
    ];
    for event in opening {
        if feed_tx.send(event).is_err() {
            return;
        }
        thread::sleep(Duration::from_millis(600));
    }

    let speakers = ["maya", "jonas", "priya"];
    let lines = [
        "ok that worked",
        "deploy went out at noon, see https://ci.example.com/builds/1881",
        "can someone restart the ingest worker?",
        "done",
        "metrics are recovering",
        "still seeing timeouts from eu-west",
        "same, filing a ticket",
        "fixed in the follow-up release",
    ];

    let mut round = 0usize;
    loop {
        let speaker = speakers[round % speakers.len()];
        let line = lines[round % lines.len()];
        // Fresh group every few messages, otherwise append to the speaker's
        // last group so old entries keep changing off-screen.
        let event = if round % 4 == 0 {
            FeedEvent::UserGroup {
                participant: Participant::new(speaker, true),
                message: msg(line),
            }
        } else {
            FeedEvent::Append {
                speaker: speaker.into(),
                message: msg(line),
            }
        };
        if feed_tx.send(event).is_err() {
            return;
        }

        if round % 11 == 5 {
            let flip = FeedEvent::Presence {
                speaker: "jonas".into(),
                online: (round / 11) % 2 == 0,
            };
            if feed_tx.send(flip).is_err() {
                return;
            }
        }
        if round % 9 == 8 {
            let notice = FeedEvent::SystemGroup {
                message: ChatMessage::system(
                    "connection quality degraded",
                    Utc::now().timestamp_millis(),
                ),
            };
            if feed_tx.send(notice).is_err() {
                return;
            }
        }

        round += 1;
        thread::sleep(Duration::from_millis(900));
    }
}

/// One transcript entry: its content plus the mounted item that renders it.
struct GroupEntry {
    participant: Option<Participant>,
    group: MessageGroup,
    group_time: i64,
    item: TranscriptItem,
}

struct TranscriptApp {
    feed_rx: Receiver<FeedEvent>,

    regions: ScrollRegions,
    entries: Vec<GroupEntry>,

    settings: ViewerSettings,
    theme: TranscriptTheme,
    message_renderer: TextMessageRenderer,
    avatar_renderer: InitialsAvatarRenderer,

    read_tx: Sender<ReadReceipt>,
    read_rx: Receiver<ReadReceipt>,
    last_read_time: Option<i64>,

    // Last geometry reported to the region, for change detection.
    last_offset: Option<f32>,
    last_viewport: Option<Viewport>,
}

impl TranscriptApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = config::load_settings().unwrap_or_default();
        let theme = settings.theme();
        apply_visuals(&cc.egui_ctx, &settings);

        let mut regions = ScrollRegions::new();
        regions.register(DEFAULT_REGION);

        let (feed_tx, feed_rx) = unbounded();
        thread::spawn(move || run_feed(feed_tx));

        let (read_tx, read_rx) = unbounded();

        Self {
            feed_rx,
            regions,
            entries: Vec::new(),
            settings,
            theme,
            message_renderer: TextMessageRenderer,
            avatar_renderer: InitialsAvatarRenderer::default(),
            read_tx,
            read_rx,
            last_read_time: None,
            last_offset: None,
            last_viewport: None,
        }
    }

    fn process_events(&mut self) {
        while let Ok(event) = self.feed_rx.try_recv() {
            match event {
                FeedEvent::UserGroup {
                    participant,
                    message,
                } => {
                    self.push_entry(Some(participant), message);
                }
                FeedEvent::SystemGroup { message } => {
                    self.push_entry(None, message);
                }
                FeedEvent::Append { speaker, message } => {
                    let found = self.entries.iter().rposition(|entry| {
                        entry
                            .participant
                            .as_ref()
                            .is_some_and(|p| p.name == speaker)
                    });
                    match found {
                        Some(index) => self.entries[index].group.push(message),
                        // Speaker has no group yet; open one.
                        None => self.push_entry(Some(Participant::new(speaker, true)), message),
                    }
                }
                FeedEvent::Presence { speaker, online } => {
                    for entry in &mut self.entries {
                        if let Some(participant) = &mut entry.participant {
                            if participant.name == speaker {
                                participant.is_online = online;
                            }
                        }
                    }
                }
            }
        }

        while let Ok(receipt) = self.read_rx.try_recv() {
            let newest = self.last_read_time.unwrap_or(i64::MIN);
            if receipt.message_time > newest {
                self.last_read_time = Some(receipt.message_time);
            }
        }
    }

    fn push_entry(&mut self, participant: Option<Participant>, first: ChatMessage) {
        let group_time = first.time;
        match TranscriptItem::mount(&mut self.regions, DEFAULT_REGION) {
            Ok(item) => self.entries.push(GroupEntry {
                participant,
                group: MessageGroup::single(first),
                group_time,
                item,
            }),
            Err(e) => log::error!("failed to mount transcript item: {}", e),
        }
    }

    fn top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Transcript");
                ui.separator();

                let mut switched = false;
                if ui
                    .selectable_label(self.settings.theme == "dark", "Dark")
                    .clicked()
                {
                    self.settings.theme = "dark".into();
                    switched = true;
                }
                if ui
                    .selectable_label(self.settings.theme == "light", "Light")
                    .clicked()
                {
                    self.settings.theme = "light".into();
                    switched = true;
                }
                if switched {
                    self.theme = self.settings.theme();
                    apply_visuals(ctx, &self.settings);
                }

                ui.separator();
                ui.checkbox(&mut self.settings.twelve_hour_clock, "12-hour clock");
                ui.checkbox(&mut self.settings.show_state_overlay, "State overlay");
            });
        });
    }

    fn status_panel(&self, ctx: &egui::Context) {
        let suppressed = self
            .entries
            .iter()
            .filter(|entry| entry.item.has_pending_changes() && !entry.item.is_visible())
            .count();
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!(
                    "{} groups · {} buffering off-screen · read up to {}",
                    self.entries.len(),
                    suppressed,
                    self.last_read_time
                        .map(|t| transcript_view::ui::format_clock(t, self.settings.twelve_hour_clock))
                        .unwrap_or_else(|| "—".into()),
                ))
                .small()
                .color(self.theme.text_muted),
            );
        });
    }

    fn state_overlay(&self, ctx: &egui::Context) {
        egui::Window::new("Item states")
            .default_width(260.0)
            .show(ctx, |ui| {
                for (index, entry) in self.entries.iter().enumerate() {
                    let who = entry
                        .participant
                        .as_ref()
                        .map(|p| p.name.as_str())
                        .unwrap_or("system");
                    ui.label(format!(
                        "#{index} {who}: {:?}, {} msgs, {} renders",
                        entry.item.state(),
                        entry.group.len(),
                        entry.item.applied_renders(),
                    ));
                }
            });
    }

    fn transcript_panel(&mut self, ctx: &egui::Context, now: Instant) {
        let read_tracking = ReadTracking {
            last_read_time: self.last_read_time,
            mark_read: Some(self.read_tx.clone()),
        };
        let mut presenter = ItemPresenter {
            message_renderer: &mut self.message_renderer,
            avatar_renderer: &mut self.avatar_renderer,
            theme: &self.theme,
            twelve_hour_clock: self.settings.twelve_hour_clock,
        };
        let entries = &mut self.entries;

        let output = egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(self.theme.background))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        ui.spacing_mut().item_spacing.y = 10.0;
                        for entry in entries.iter_mut() {
                            let content = GroupContent {
                                participant: entry.participant.as_ref(),
                                messages: &entry.group,
                                group_time: entry.group_time,
                                read_tracking: &read_tracking,
                            };
                            entry.item.show(ui, content, &mut presenter, now);
                        }
                    })
            })
            .inner;

        // Report geometry deltas to the scroll region; items pick them up
        // through their subscriptions.
        let viewport = Viewport::new(output.inner_rect.top(), output.inner_rect.height());
        let offset = output.state.offset.y;
        if let Some(region) = self.regions.get_mut(DEFAULT_REGION) {
            if self.last_viewport != Some(viewport) {
                region.resized(viewport);
            } else if self.last_offset != Some(offset) {
                region.scrolled(viewport);
            }
        }
        self.last_viewport = Some(viewport);
        self.last_offset = Some(offset);
    }
}

impl eframe::App for TranscriptApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.process_events();

        // Keep polling the feed and the debounced visibility work.
        ctx.request_repaint_after(Duration::from_millis(50));

        self.top_panel(ctx);
        self.status_panel(ctx);
        self.transcript_panel(ctx, now);
        if self.settings.show_state_overlay {
            self.state_overlay(ctx);
        }
    }
}

impl Drop for TranscriptApp {
    fn drop(&mut self) {
        if let Err(e) = config::save_settings(&self.settings) {
            log::warn!("failed to save settings: {}", e);
        }
    }
}

fn apply_visuals(ctx: &egui::Context, settings: &ViewerSettings) {
    if settings.theme == "light" {
        ctx.set_visuals(egui::Visuals::light());
    } else {
        ctx.set_visuals(egui::Visuals::dark());
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([460.0, 680.0])
            .with_min_inner_size([320.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Transcript View",
        options,
        Box::new(|cc| Ok(Box::new(TranscriptApp::new(cc)))),
    )
}
