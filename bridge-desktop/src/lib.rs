//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop hosts
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! Desktop builds have no browser event loop, so the timer capability the
//! native adapter needs for progress polling is provided here on top of Tokio:
//! - `TokioIntervalScheduler` runs intervals as local tasks on a `LocalSet`
//!
//! Clocks and log sinks come from `bridge-traits` directly
//! (`SystemClock`, `ConsoleLogger`).
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::TokioIntervalScheduler;
//! use std::rc::Rc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let scheduler = Rc::new(TokioIntervalScheduler::new());
//!     // Hand `scheduler` to the player dependencies, then drive it:
//!     scheduler.run_until(tokio::signal::ctrl_c()).await.ok();
//! }
//! ```

mod timer;

pub use timer::TokioIntervalScheduler;
