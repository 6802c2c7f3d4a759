//! Player façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (media element
//! factory, plugin embedder, capability detector, interval scheduler) into a
//! single [`Player`]. The player picks the native or plugin backend once, at
//! construction, and exposes one event and state model for both.
//!
//! Desktop hosts typically enable the `desktop-shims` feature, which
//! re-exports the tokio-backed scheduler from `bridge-desktop`.
//!
//! ```no_run
//! use bridge_traits::capability::{Capabilities, StaticCapabilities};
//! use bridge_traits::playback::MediaElementFactory;
//! use bridge_traits::timer::ManualIntervalScheduler;
//! use core_runtime::events::{listener, EventKind, Observable};
//! use core_service::{Player, PlayerDependencies, PlayerOptions};
//! use std::rc::Rc;
//!
//! # fn run(factory: Rc<dyn MediaElementFactory>) -> core_service::Result<()> {
//! let deps = PlayerDependencies::builder()
//!     .capabilities(Rc::new(StaticCapabilities(Capabilities::native())))
//!     .media_factory(factory)
//!     .scheduler(Rc::new(ManualIntervalScheduler::new()))
//!     .build()?;
//!
//! let player = Player::new(PlayerOptions::new(), deps)?;
//! player.on(EventKind::Ended, listener(|_| println!("track finished")));
//! player.load("https://example.com/track.mp3")?;
//! player.play()?;
//! # Ok(())
//! # }
//! ```

pub mod dependencies;
pub mod error;
pub mod options;
pub mod player;

pub use dependencies::{PlayerDependencies, PlayerDependenciesBuilder};
pub use error::{CoreError, Result};
pub use options::{PlayerOptions, ReadyCallback};
pub use player::Player;

#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
pub use bridge_desktop::TokioIntervalScheduler;
