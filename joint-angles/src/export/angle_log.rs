//! Append-only Angle Log
//!
//! One line per recorded sample:
//!
//! ```text
//! 1700000000.25: knee_l:172,knee_r:175,ankle_l:88,ankle_r:91,hip_l:168,hip_r:170
//! ```
//!
//! The timestamp is wall-clock Unix seconds with two decimals. Degrees are
//! truncated toward zero and joints appear in canonical order. Non-finite
//! angles are left out of the line.

use crate::analysis::{JointAngles, JointName};
use crate::workflow::recording::{CompletedRecording, RecordedSample};
use crate::{Error, Result};
use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Format one log line, without the trailing newline
pub fn format_line(unix_seconds: f64, angles: &JointAngles) -> String {
    let mut line = format!("{unix_seconds:.2}:");
    let mut first = true;
    for (joint, degrees) in angles.iter().filter(|(_, d)| d.is_finite()) {
        let sep = if first { ' ' } else { ',' };
        first = false;
        // Writing to a String cannot fail
        let _ = write!(line, "{sep}{joint}:{}", degrees.trunc() as i64);
    }
    line
}

/// Parse a line written by [`format_line`]
pub fn parse_line(line: &str) -> Result<(f64, JointAngles)> {
    let line = line.trim_end();
    let (stamp, body) = line
        .split_once(':')
        .ok_or_else(|| Error::LogFormat(format!("missing timestamp separator in '{line}'")))?;

    let unix_seconds: f64 = stamp
        .trim()
        .parse()
        .map_err(|_| Error::LogFormat(format!("invalid timestamp '{stamp}'")))?;

    let mut angles = JointAngles::new();
    let body = body.trim();
    if body.is_empty() {
        return Ok((unix_seconds, angles));
    }

    for field in body.split(',') {
        let (name, degrees) = field
            .split_once(':')
            .ok_or_else(|| Error::LogFormat(format!("invalid field '{field}'")))?;
        let joint: JointName = name.trim().parse()?;
        let degrees: i64 = degrees
            .trim()
            .parse()
            .map_err(|_| Error::LogFormat(format!("invalid degrees '{degrees}' for {joint}")))?;
        angles.insert(joint, degrees as f64);
    }

    Ok((unix_seconds, angles))
}

/// Read every line of a log file
pub fn read_log(path: &Path) -> Result<Vec<(f64, JointAngles)>> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = parse_line(&line).map_err(|e| match e {
            Error::LogFormat(msg) => Error::LogFormat(format!("line {}: {}", index + 1, msg)),
            other => other,
        })?;
        entries.push(entry);
    }

    Ok(entries)
}

/// Rebuild a recording from a log file. Elapsed time is measured from the
/// first line.
pub fn load_recording(path: &Path) -> Result<CompletedRecording> {
    let entries = read_log(path)?;
    let origin = entries.first().map_or(0.0, |(t, _)| *t);

    let samples = entries
        .into_iter()
        .map(|(t, angles)| RecordedSample {
            elapsed_seconds: (t - origin).max(0.0),
            angles,
        })
        .collect();

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("angle-log")
        .to_string();

    Ok(CompletedRecording::from_samples(name, samples))
}

/// Append-only writer, flushed after every line
pub struct AngleLog {
    path: PathBuf,
    writer: BufWriter<File>,
    lines_written: u64,
}

impl AngleLog {
    /// Open for appending, creating the file and its parent directories
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(path.as_ref(), OpenOptions::new().create(true).append(true))
    }

    /// Start a fresh log, discarding any lines already at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(
            path.as_ref(),
            OpenOptions::new().create(true).write(true).truncate(true),
        )
    }

    fn with_options(path: &Path, options: &OpenOptions) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = options.open(path)?;
        tracing::debug!(path = %path.display(), "Opened angle log");

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            lines_written: 0,
        })
    }

    /// Write one line and flush it
    pub fn append(&mut self, unix_seconds: f64, angles: &JointAngles) -> Result<()> {
        writeln!(self.writer, "{}", format_line(unix_seconds, angles))?;
        self.writer.flush()?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines written through this handle
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn angles(values: &[(JointName, f64)]) -> JointAngles {
        values.iter().copied().collect()
    }

    #[test]
    fn test_format_line_canonical_order_and_truncation() {
        let line = format_line(
            1_700_000_000.256,
            &angles(&[
                (JointName::HipR, 170.9),
                (JointName::KneeL, 172.4),
                (JointName::AnkleL, 88.99),
            ]),
        );
        assert_eq!(line, "1700000000.26: knee_l:172,ankle_l:88,hip_r:170");
    }

    #[test]
    fn test_format_line_skips_non_finite() {
        let line = format_line(1.0, &angles(&[(JointName::KneeL, f64::NAN), (JointName::KneeR, 5.5)]));
        assert_eq!(line, "1.00: knee_r:5");
    }

    #[test]
    fn test_format_empty_angles() {
        assert_eq!(format_line(2.5, &JointAngles::new()), "2.50:");
        let (t, parsed) = parse_line("2.50:").unwrap();
        assert_eq!(t, 2.5);
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_parse_line() {
        let (t, parsed) = parse_line("1700000000.26: knee_l:172,ankle_l:88,hip_r:170\n").unwrap();
        assert_eq!(t, 1_700_000_000.26);
        assert_eq!(parsed.get(JointName::KneeL), Some(172.0));
        assert_eq!(parsed.get(JointName::AnkleL), Some(88.0));
        assert_eq!(parsed.get(JointName::HipR), Some(170.0));
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        for bad in [
            "no separator",
            "abc: knee_l:1",
            "1.00: knee_l",
            "1.00: elbow_l:12",
            "1.00: knee_l:twelve",
        ] {
            assert!(
                matches!(parse_line(bad), Err(Error::LogFormat(_))),
                "accepted '{bad}'"
            );
        }
    }

    #[test]
    fn test_append_creates_parents_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("angles.log");

        let mut log = AngleLog::open(&path).unwrap();
        log.append(100.0, &angles(&[(JointName::KneeL, 90.0)])).unwrap();
        assert_eq!(log.lines_written(), 1);
        drop(log);

        // Reopening appends rather than truncating
        let mut log = AngleLog::open(&path).unwrap();
        log.append(100.5, &angles(&[(JointName::KneeL, 95.0)])).unwrap();
        assert_eq!(log.path(), path.as_path());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "100.00: knee_l:90\n100.50: knee_l:95\n");
    }

    #[test]
    fn test_create_discards_previous_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("angles.log");

        let mut log = AngleLog::create(&path).unwrap();
        log.append(1.0, &angles(&[(JointName::KneeL, 10.0)])).unwrap();
        log.append(2.0, &angles(&[(JointName::KneeL, 20.0)])).unwrap();
        drop(log);

        let mut log = AngleLog::create(&path).unwrap();
        log.append(5.0, &angles(&[(JointName::KneeL, 50.0)])).unwrap();
        drop(log);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "5.00: knee_l:50\n");
    }

    #[test]
    fn test_line_is_flushed_immediately() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("angles.log");

        let mut log = AngleLog::open(&path).unwrap();
        log.append(1.0, &angles(&[(JointName::HipL, 1.0)])).unwrap();

        // Handle still open
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1.00: hip_l:1\n");
    }

    #[test]
    fn test_load_recording_from_log() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("squat.log");
        std::fs::write(&path, "10.00: knee_l:170\n\n10.50: knee_l:120,hip_l:100\n").unwrap();

        let recording = load_recording(&path).unwrap();
        assert_eq!(recording.metadata().name, "squat");
        assert_eq!(recording.len(), 2);
        assert_eq!(recording.samples()[1].elapsed_seconds, 0.5);
        assert_eq!(recording.metadata().duration_ms, 500);
    }

    #[test]
    fn test_read_log_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.log");
        std::fs::write(&path, "1.00: knee_l:1\ngarbage\n").unwrap();

        match read_log(&path) {
            Err(Error::LogFormat(msg)) => assert!(msg.starts_with("line 2"), "{msg}"),
            other => panic!("expected LogFormat, got {other:?}"),
        }
    }
}
