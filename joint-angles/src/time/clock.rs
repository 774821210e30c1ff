//! Wall-clock stamps for persisted logs
//!
//! Frame timestamps come from the pose source and drive throttling and
//! windowing. Only the angle log needs real time, captured once when a
//! recording is armed.

/// Wall-clock seconds since the Unix epoch, with sub-second precision
pub fn unix_now_secs() -> f64 {
    let now = chrono::Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_time_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(unix_now_secs() > 1_577_836_800.0);
    }
}
