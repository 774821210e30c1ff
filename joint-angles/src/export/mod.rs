//! Report and log export
//!
//! - [`angle_log`]: append-only text log of recorded samples
//! - [`series_csv`]: long-format CSV of every joint series
//! - [`markdown`]: per-joint summary table

pub mod angle_log;
pub mod markdown;
pub mod series_csv;

pub use angle_log::{format_line, parse_line, AngleLog};
pub use markdown::MarkdownBuilder;
