//! Scroll-region event distribution.
//!
//! A [`ScrollRegion`] stands for one scrollable transcript surface. Items
//! subscribe to the region they live in and *pull* geometry events from
//! their subscription each frame; the region never calls into an item, so a
//! torn-down item can never be reached by a stale notification. Dropping a
//! [`ScrollSubscription`] disconnects its channel and the region prunes the
//! dead listener on the next broadcast.

use std::collections::HashMap;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::error::TranscriptError;
use crate::viewport::Viewport;

/// Geometry notifications sent from a scroll region to its subscribers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollEvent {
    /// The region scrolled; carries the new viewport geometry.
    Scrolled { viewport: Viewport },
    /// The region was resized; carries the new viewport geometry.
    Resized { viewport: Viewport },
}

impl ScrollEvent {
    /// The viewport geometry carried by the event.
    pub fn viewport(self) -> Viewport {
        match self {
            ScrollEvent::Scrolled { viewport } | ScrollEvent::Resized { viewport } => viewport,
        }
    }
}

/// Identifies one subscriber within a region, for eager detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

/// One scrollable surface and the listeners attached to it.
pub struct ScrollRegion {
    id: String,
    viewport: Viewport,
    subscribers: Vec<(ListenerId, Sender<ScrollEvent>)>,
    next_listener: u64,
}

impl ScrollRegion {
    fn new(id: String) -> Self {
        Self {
            id,
            viewport: Viewport::new(0.0, 0.0),
            subscribers: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Last geometry the region reported.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Attach a listener. The subscription starts from the region's current
    /// geometry, so a subscriber has a usable viewport before any event
    /// arrives.
    pub fn subscribe(&mut self) -> ScrollSubscription {
        let listener = ListenerId(self.next_listener);
        self.next_listener += 1;
        let (tx, rx) = unbounded();
        self.subscribers.push((listener, tx));
        ScrollSubscription {
            region: self.id.clone(),
            listener,
            rx,
            viewport: self.viewport,
        }
    }

    /// Remove a listener without waiting for channel disconnect.
    pub fn detach(&mut self, listener: ListenerId) {
        self.subscribers.retain(|(id, _)| *id != listener);
    }

    /// Report a scroll position change and notify all listeners.
    pub fn scrolled(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.broadcast(ScrollEvent::Scrolled { viewport });
    }

    /// Report a geometry change and notify all listeners.
    pub fn resized(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.broadcast(ScrollEvent::Resized { viewport });
    }

    fn broadcast(&mut self, event: ScrollEvent) {
        let region = &self.id;
        self.subscribers.retain(|(listener, tx)| {
            if tx.send(event).is_ok() {
                true
            } else {
                log::debug!("region {}: pruning disconnected listener {:?}", region, listener);
                false
            }
        });
    }
}

/// Registry of scroll regions, keyed by region id.
#[derive(Default)]
pub struct ScrollRegions {
    regions: HashMap<String, ScrollRegion>,
}

impl ScrollRegions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a region (or return the existing one with that id).
    pub fn register(&mut self, id: impl Into<String>) -> &mut ScrollRegion {
        let id = id.into();
        self.regions
            .entry(id.clone())
            .or_insert_with(|| ScrollRegion::new(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ScrollRegion> {
        self.regions.get_mut(id)
    }

    /// Subscribe to a registered region.
    pub fn subscribe(&mut self, id: &str) -> Result<ScrollSubscription, TranscriptError> {
        self.regions
            .get_mut(id)
            .map(|region| region.subscribe())
            .ok_or_else(|| TranscriptError::RegionNotFound(id.to_string()))
    }
}

/// A listener's end of a region's event channel, plus the last viewport it
/// observed. Dropping the subscription detaches the listener.
#[derive(Debug)]
pub struct ScrollSubscription {
    region: String,
    listener: ListenerId,
    rx: Receiver<ScrollEvent>,
    viewport: Viewport,
}

impl ScrollSubscription {
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn listener(&self) -> ListenerId {
        self.listener
    }

    /// Last viewport geometry observed through this subscription.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Pull all pending events, keeping only the latest geometry. Returns
    /// true when at least one event arrived since the last drain.
    pub fn drain(&mut self) -> bool {
        let mut moved = false;
        while let Ok(event) = self.rx.try_recv() {
            self.viewport = event.viewport();
            moved = true;
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_starts_from_current_geometry() {
        let mut regions = ScrollRegions::new();
        regions.register("transcript").resized(Viewport::new(0.0, 600.0));

        let sub = regions.subscribe("transcript").unwrap();
        assert_eq!(sub.viewport(), Viewport::new(0.0, 600.0));
    }

    #[test]
    fn test_subscribe_to_unknown_region_fails() {
        let mut regions = ScrollRegions::new();
        let err = regions.subscribe("nowhere").unwrap_err();
        assert!(matches!(err, TranscriptError::RegionNotFound(ref id) if id == "nowhere"));
    }

    #[test]
    fn test_drain_reports_movement_and_latest_geometry() {
        let mut regions = ScrollRegions::new();
        regions.register("transcript");
        let mut sub = regions.subscribe("transcript").unwrap();

        assert!(!sub.drain());

        let region = regions.get_mut("transcript").unwrap();
        region.scrolled(Viewport::new(10.0, 600.0));
        region.scrolled(Viewport::new(40.0, 600.0));
        region.resized(Viewport::new(40.0, 480.0));

        // One drain swallows the whole burst and keeps the last geometry.
        assert!(sub.drain());
        assert_eq!(sub.viewport(), Viewport::new(40.0, 480.0));
        assert!(!sub.drain());
    }

    #[test]
    fn test_all_subscribers_receive_broadcasts() {
        let mut regions = ScrollRegions::new();
        regions.register("transcript");
        let mut first = regions.subscribe("transcript").unwrap();
        let mut second = regions.subscribe("transcript").unwrap();

        regions
            .get_mut("transcript")
            .unwrap()
            .scrolled(Viewport::new(5.0, 300.0));

        assert!(first.drain());
        assert!(second.drain());
        assert_eq!(first.viewport(), second.viewport());
    }

    #[test]
    fn test_dropped_subscription_is_pruned_on_next_broadcast() {
        let mut regions = ScrollRegions::new();
        regions.register("transcript");
        let sub = regions.subscribe("transcript").unwrap();
        let _kept = regions.subscribe("transcript").unwrap();

        let region = regions.get_mut("transcript").unwrap();
        assert_eq!(region.subscriber_count(), 2);

        drop(sub);
        region.scrolled(Viewport::new(0.0, 300.0));
        assert_eq!(region.subscriber_count(), 1);
    }

    #[test]
    fn test_detach_removes_listener_immediately() {
        let mut regions = ScrollRegions::new();
        regions.register("transcript");
        let sub = regions.subscribe("transcript").unwrap();

        let region = regions.get_mut("transcript").unwrap();
        region.detach(sub.listener());
        assert_eq!(region.subscriber_count(), 0);
    }
}
