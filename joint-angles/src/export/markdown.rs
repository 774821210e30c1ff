//! Markdown Session Summary

use crate::analysis::JointName;
use crate::workflow::SessionReport;
use std::fmt::Write;

/// Markdown builder for session summaries
pub struct MarkdownBuilder {
    /// Buffer for building markdown
    buffer: String,
}

impl MarkdownBuilder {
    /// Create a new markdown builder
    pub fn new() -> Self {
        Self {
            buffer: String::with_capacity(2048),
        }
    }

    /// Build the summary document for a report
    pub fn build(&mut self, report: &SessionReport) -> String {
        self.buffer.clear();

        // Writing to a String is infallible, so these cannot fail
        self.write_header(report).expect("write to String");
        self.write_summary_table(report).expect("write to String");

        std::mem::take(&mut self.buffer)
    }

    fn write_header(&mut self, report: &SessionReport) -> std::fmt::Result {
        let metadata = report.metadata();
        writeln!(self.buffer, "# Session Report: {}", metadata.name)?;
        writeln!(self.buffer)?;
        writeln!(self.buffer, "- **Recording ID:** {}", metadata.id)?;
        writeln!(
            self.buffer,
            "- **Started:** {}",
            metadata.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.buffer, "- **Duration:** {:.2} s", report.duration_seconds())?;
        writeln!(self.buffer, "- **Samples:** {}", metadata.sample_count)?;
        writeln!(self.buffer)?;
        Ok(())
    }

    fn write_summary_table(&mut self, report: &SessionReport) -> std::fmt::Result {
        writeln!(self.buffer, "## Joint Summary")?;
        writeln!(self.buffer)?;
        writeln!(
            self.buffer,
            "| Joint | Samples | Min (°) | Max (°) | Mean (°) | Range of Motion (°) |"
        )?;
        writeln!(
            self.buffer,
            "|-------|---------|---------|---------|----------|---------------------|"
        )?;

        for joint in JointName::ALL {
            match report.summary(joint) {
                Some(s) => writeln!(
                    self.buffer,
                    "| {} | {} | {:.1} | {:.1} | {:.1} | {:.1} |",
                    joint, s.samples, s.min, s.max, s.mean, s.range_of_motion
                )?,
                None => writeln!(self.buffer, "| {} | 0 | - | - | - | - |", joint)?,
            }
        }

        if report.is_empty() {
            writeln!(self.buffer)?;
            writeln!(self.buffer, "_No samples were recorded in this session._")?;
        }
        Ok(())
    }
}

impl Default for MarkdownBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionReport {
    /// Summary table per joint plus session metadata
    pub fn to_markdown(&self) -> String {
        MarkdownBuilder::new().build(self)
    }
}
