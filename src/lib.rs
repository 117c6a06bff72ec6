//! Appliance energy tracker: per-device ON/OFF timers, an undoable device
//! registry, and energy cost estimates.

/// REST API over a shared registry.
#[cfg(feature = "api")]
pub mod api;
pub mod cli;
/// Injectable monotonic time sources.
pub mod clock;
pub mod config;
pub mod cost;
pub mod devices;
pub mod error;
pub mod io;
pub mod logging;
pub mod registry;
pub mod report;
/// Interactive terminal front end.
#[cfg(feature = "tui")]
pub mod tui;
