//! Transcript view library.
//!
//! Renders entries of a scrolling chat transcript with render suppression:
//! off-screen items buffer incoming content changes instead of rebuilding,
//! and catch up in one rebuild when they scroll back into view. See
//! [`item::TranscriptItem`] for the per-entry state machine and
//! [`render_state::ChangeBuffer`] for the suppression logic itself.

pub mod config;
pub mod error;
pub mod item;
pub mod model;
pub mod render_state;
pub mod schedule;
pub mod scroll;
pub mod ui;
pub mod viewport;

#[cfg(test)]
mod integration_tests;
