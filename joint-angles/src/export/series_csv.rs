//! CSV Series Export
//!
//! Long format, one row per point: `joint,elapsed_seconds,degrees`. Rows are
//! grouped by joint in canonical order and keep recording order within a joint.

use crate::analysis::JointName;
use crate::workflow::SessionReport;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

const HEADER: [&str; 3] = ["joint", "elapsed_seconds", "degrees"];

#[derive(Serialize)]
struct SeriesRow<'a> {
    joint: &'a str,
    elapsed_seconds: f64,
    degrees: f64,
}

impl SessionReport {
    /// Write every series to a CSV file
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv_to(file)?;
        tracing::debug!(path = %path.display(), rows = self.point_count(), "Wrote CSV report");
        Ok(())
    }

    /// Write every series as CSV to any writer
    pub fn write_csv_to<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        wtr.write_record(HEADER)?;

        for (joint, series) in self.iter() {
            for &(elapsed_seconds, degrees) in series {
                wtr.serialize(SeriesRow {
                    joint: joint.as_str(),
                    elapsed_seconds,
                    degrees,
                })?;
            }
        }

        wtr.flush()?;
        Ok(())
    }
}

/// Read a file written by [`SessionReport::write_csv`] back into per-joint series
pub fn read_series(path: &Path) -> Result<BTreeMap<JointName, Vec<(f64, f64)>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)?;

    let mut series: BTreeMap<JointName, Vec<(f64, f64)>> = BTreeMap::new();
    for (line_idx, row) in rdr.records().enumerate() {
        let rec = row?;
        // +2 for the header line
        let line = line_idx + 2;
        let field = |idx: usize| {
            rec.get(idx)
                .map(str::trim)
                .ok_or_else(|| Error::Export(format!("line {line}: missing column {}", HEADER[idx])))
        };

        let name = field(0)?;
        let joint: JointName = name
            .parse()
            .map_err(|_| Error::Export(format!("line {line}: unknown joint '{name}'")))?;
        let parse_f64 = |idx: usize| -> Result<f64> {
            let s = field(idx)?;
            s.parse()
                .map_err(|_| Error::Export(format!("line {line}: invalid {} '{s}'", HEADER[idx])))
        };

        series
            .entry(joint)
            .or_default()
            .push((parse_f64(1)?, parse_f64(2)?));
    }

    Ok(series)
}
