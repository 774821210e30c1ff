//! Pose Sample Sources
//!
//! A [`PoseSource`] yields timestamped detections one at a time. The core never
//! runs a pose estimator itself; it consumes whatever upstream produced.
//!
//! The JSON Lines format holds one frame per line:
//!
//! ```text
//! {"t": 0.033, "landmarks": {"LEFT_HIP": [0.41, 0.52, 0.98], "LEFT_KNEE": [0.40, 0.71]}}
//! {"t": 0.066, "landmarks": null}
//! ```
//!
//! Each landmark is `[x, y]` or `[x, y, visibility]`. A `null` or missing
//! `landmarks` field means no person was detected in that frame.

use super::types::{Detection, Landmark, LandmarkFrame, LandmarkPoint, PoseSample};
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Producer of pose samples in frame order
pub trait PoseSource {
    /// Next sample, or `None` once the source is exhausted
    fn next_sample(&mut self) -> Result<Option<PoseSample>>;
}

/// One line of the JSON Lines format
#[derive(Debug, Deserialize)]
struct FrameRecord {
    t: f64,
    #[serde(default)]
    landmarks: Option<BTreeMap<String, Vec<f64>>>,
}

/// Reads pose samples from a JSON Lines stream
pub struct JsonLinesSource<R> {
    reader: R,
    line_number: usize,
    buf: String,
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a JSON Lines file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::Source(format!("cannot open pose file {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "Opened pose source");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Wrap any buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buf: String::new(),
        }
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn parse_record(&self, line: &str) -> Result<PoseSample> {
        let record: FrameRecord = serde_json::from_str(line)
            .map_err(|e| Error::Source(format!("line {}: {}", self.line_number, e)))?;

        if !record.t.is_finite() {
            return Err(Error::Source(format!(
                "line {}: timestamp must be finite",
                self.line_number
            )));
        }

        let Some(landmarks) = record.landmarks else {
            return Ok(PoseSample::new(record.t, Detection::NotDetected));
        };

        let mut frame = LandmarkFrame::new();
        for (name, values) in landmarks {
            let landmark: Landmark = name.parse().map_err(|_| {
                Error::Source(format!("line {}: unknown landmark '{}'", self.line_number, name))
            })?;
            let point = match values.as_slice() {
                [x, y] => LandmarkPoint::new(*x, *y),
                [x, y, visibility] => LandmarkPoint::with_visibility(*x, *y, *visibility),
                other => {
                    return Err(Error::Source(format!(
                        "line {}: landmark {} needs 2 or 3 values, got {}",
                        self.line_number,
                        name,
                        other.len()
                    )))
                }
            };
            frame.insert(landmark, point);
        }

        Ok(PoseSample::new(record.t, Detection::Detected(frame)))
    }
}

impl<R: BufRead> PoseSource for JsonLinesSource<R> {
    fn next_sample(&mut self) -> Result<Option<PoseSample>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            return self.parse_record(line).map(Some);
        }
    }
}

/// Replays samples held in memory
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    samples: VecDeque<PoseSample>,
}

impl VecSource {
    pub fn new(samples: impl IntoIterator<Item = PoseSample>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    /// Samples not yet yielded
    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl PoseSource for VecSource {
    fn next_sample(&mut self) -> Result<Option<PoseSample>> {
        Ok(self.samples.pop_front())
    }
}
