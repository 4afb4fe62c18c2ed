//! Render-suppression state machine.
//!
//! A transcript item is cheap to paint but comparatively expensive to
//! rebuild (snapshot refresh, text segmentation, time formatting). Off-screen
//! items therefore buffer the *fact* that new data arrived instead of
//! rebuilding; the rebuild runs once, when the item is next visible.

/// The four logical states of one transcript item: visibility crossed with
/// whether un-applied data is owed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// Off-screen, applied snapshot current.
    Hidden,
    /// Off-screen with un-applied data buffered for the next appearance.
    HiddenPending,
    /// On-screen, applied snapshot current.
    VisibleClean,
    /// On-screen with un-applied data; the only state that rebuilds.
    VisiblePending,
}

impl RenderState {
    pub fn is_visible(self) -> bool {
        matches!(self, RenderState::VisibleClean | RenderState::VisiblePending)
    }

    pub fn has_pending_changes(self) -> bool {
        matches!(self, RenderState::HiddenPending | RenderState::VisiblePending)
    }
}

/// Owns the state and exposes the three transitions: data arrival,
/// visibility recomputation, and the render gate.
#[derive(Debug)]
pub struct ChangeBuffer {
    state: RenderState,
}

impl ChangeBuffer {
    /// Items mount off-screen with no backlog; the initial visibility
    /// recheck decides real visibility shortly after.
    pub fn new() -> Self {
        Self {
            state: RenderState::Hidden,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    pub fn has_pending_changes(&self) -> bool {
        self.state.has_pending_changes()
    }

    /// Record incoming data. `changed` decides whether the new data differs
    /// from the applied snapshot; it is **not** invoked while a backlog is
    /// already buffered, so updates coalesce until the backlog is consumed.
    pub fn record_incoming(&mut self, changed: impl FnOnce() -> bool) {
        if self.state.has_pending_changes() {
            return;
        }
        if changed() {
            self.state = match self.state {
                RenderState::Hidden => RenderState::HiddenPending,
                RenderState::VisibleClean => RenderState::VisiblePending,
                // Pending states were filtered out above.
                other => other,
            };
        }
    }

    /// Apply a visibility recomputation. Moving on-screen with a backlog
    /// routes through `VisiblePending` so the gated rebuild consumes it;
    /// moving off-screen keeps any backlog for the next appearance.
    pub fn set_visible(&mut self, visible: bool) {
        self.state = match (self.state, visible) {
            (RenderState::Hidden, true) => RenderState::VisibleClean,
            (RenderState::HiddenPending, true) => RenderState::VisiblePending,
            (RenderState::VisibleClean, false) => RenderState::Hidden,
            (RenderState::VisiblePending, false) => RenderState::HiddenPending,
            (unchanged, _) => unchanged,
        };
    }

    /// Render gate: true releases exactly one rebuild and clears the
    /// backlog, so the flag never lingers past the render that consumed it.
    pub fn take_pending_render(&mut self) -> bool {
        if self.state == RenderState::VisiblePending {
            self.state = RenderState::VisibleClean;
            true
        } else {
            false
        }
    }
}

impl Default for ChangeBuffer {
    fn default() -> Self {
        Self::new()
    }
}
