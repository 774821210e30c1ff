//! Wall-clock time
//!
//! Session logic runs on the timestamps carried by each pose sample. The
//! wall clock is read only to stamp angle log lines.

pub mod clock;

pub use clock::unix_now_secs;
