//! Live visualization buffers
//!
//! Short, time-bounded angle history that live charts read every frame.

pub mod rolling_window;

pub use rolling_window::{RollingWindowBuffer, WindowStats, DEFAULT_WINDOW_SECONDS};
