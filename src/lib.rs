//! Workspace umbrella crate.
//!
//! Re-exports the player façade and the playback backends behind the
//! `desktop-shims` feature so host applications can depend on `hybrid-audio`
//! instead of wiring each workspace crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_playback as playback;
#[cfg(feature = "desktop-shims")]
pub use core_service::*;
