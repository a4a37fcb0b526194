//! Multi-part document preview
//!
//! The session state machine plus the two collaborators it talks to: a
//! renderer that opens documents and rasterizes pages, and a file saver
//! that receives downloads.

mod config;
mod renderer;
mod saver;
mod session;

pub use config::PreviewConfig;
pub use renderer::{DocumentHandle, DocumentRenderer, RenderedPage};
pub use saver::{DirectorySaver, FileSaver};
pub use session::{
    DisplayedPage, Part, PartSummary, PreviewSession, RenderOutcome, SessionStatus,
};
