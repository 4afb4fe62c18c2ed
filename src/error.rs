//! Error taxonomy for the transcript item.
//!
//! Only caller bugs surface as errors: a scroll region that was never
//! registered, or a message group that violates the non-empty contract.
//! Transient layout reads (bounds not yet available) are not errors; the
//! visibility tracker resolves them to "not visible" and retries on the next
//! scroll or resize event.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptError {
    /// The ambient scroll region named at mount time is not registered.
    /// Fatal configuration error; there is nothing to observe.
    #[error("scroll region `{0}` is not registered")]
    RegionNotFound(String),

    /// A message group must contain at least one message. An empty group
    /// indicates an upstream contract violation and is never rendered.
    #[error("message group must contain at least one message")]
    EmptyGroup,
}
