//! Presentation layer for the transcript view:
//! - `renderers`: the message/avatar delegation seams
//! - `message`: default text rendering and URL segmentation
//! - `avatar`: default initials avatar
//! - `theme`: color palettes and participant colors
//! - `time`: clock labels for group headers

mod avatar;
mod message;
mod renderers;
mod theme;
mod time;

pub use avatar::*;
pub use message::*;
pub use renderers::*;
pub use theme::*;
pub use time::*;
