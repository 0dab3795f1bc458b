//! Now-playing synchronization for the Deezer tray companion.
//!
//! Snapshots scraped from the page arrive at an arbitrary rate. The
//! [`Synchronizer`] drops repeats, runs at most one cover-fetch-and-rebuild
//! cycle at a time and hands the resulting [`CurrentTrack`] to a
//! [`Renderer`], normally the tray-backed [`MenuRenderer`].

mod actions;
mod renderer;
mod source;
mod synchronizer;
mod track;

pub use actions::{Flow, PageBridge, dispatch};
pub use renderer::{DEFAULT_POPUP_DELAY, MenuRenderer, Renderer, RenderFuture};
pub use source::{CoverFuture, CoverSource, resolve_cover};
pub use synchronizer::{CompletedCycle, Synchronizer, UpdateCycle};
pub use track::{CurrentTrack, LOADING_TITLE, UNKNOWN_ARTIST, UNKNOWN_TRACK};
