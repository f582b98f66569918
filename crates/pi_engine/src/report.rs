//! Progress reports and their destinations.
//!
//! One [`ProgressReport`] is produced per aggregation cycle. Its
//! [`Display`](std::fmt::Display) form is the single human-readable progress
//! line; a [`ProgressSink`] decides where that line goes.

use std::fmt;
use std::io::{self, Write};

use chrono::{DateTime, Utc};
use num_rational::BigRational;

use crate::error::EstimatorError;
use crate::ratio::{format_decimal, REPORT_DIGITS};

/// Timestamp layout of progress lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Snapshot of the computation after one aggregation cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressReport {
    /// Wall-clock time the report was produced.
    pub timestamp: DateTime<Utc>,
    /// Current estimate `4 * inside / total`.
    pub pi: BigRational,
    /// Absolute change of the estimate since the previous checkpoint.
    pub delta: BigRational,
    /// Points inside, including prior runs.
    pub inside: u64,
    /// Points sampled, including prior runs.
    pub total: u64,
    /// Points inside, this process only.
    pub run_inside: u64,
    /// Points sampled, this process only.
    pub run_total: u64,
    /// Samples per second since the previous checkpoint, in thousands.
    pub throughput_k: BigRational,
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time: {}, pi: {}, delta: {}, in/total (sum): {}/{}, in/total (this run): {}/{}, iterations per sec: {}K",
            self.timestamp.format(TIMESTAMP_FORMAT),
            format_decimal(&self.pi, REPORT_DIGITS),
            format_decimal(&self.delta, REPORT_DIGITS),
            self.inside,
            self.total,
            self.run_inside,
            self.run_total,
            format_decimal(&self.throughput_k, 0),
        )
    }
}

/// Destination for progress reports.
pub trait ProgressSink {
    /// Emits one report.
    fn emit(&mut self, report: &ProgressReport) -> Result<(), EstimatorError>;
}

/// Writes one line per report to any [`Write`] implementation.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    /// Sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ProgressSink for WriterSink<W> {
    fn emit(&mut self, report: &ProgressReport) -> Result<(), EstimatorError> {
        writeln!(self.writer, "{report}")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressReport) -> Result<(), EstimatorError>,
{
    fn emit(&mut self, report: &ProgressReport) -> Result<(), EstimatorError> {
        self(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use num_bigint::BigInt;

    fn sample_report() -> ProgressReport {
        ProgressReport {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 31, 9, 5, 7).unwrap(),
            pi: BigRational::new(BigInt::from(3), BigInt::from(2)),
            delta: BigRational::new(BigInt::from(1), BigInt::from(8)),
            inside: 3,
            total: 8,
            run_inside: 1,
            run_total: 4,
            throughput_k: BigRational::new(BigInt::from(12_345), BigInt::from(2)),
        }
    }

    #[test]
    fn test_report_line_layout() {
        let line = sample_report().to_string();

        assert_eq!(
            line,
            "time: 2024-03-31 09:05:07, \
             pi: 1.500000000000000000000000000000, \
             delta: 0.125000000000000000000000000000, \
             in/total (sum): 3/8, \
             in/total (this run): 1/4, \
             iterations per sec: 6173K"
        );
    }

    #[test]
    fn test_writer_sink_writes_lines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit(&sample_report()).unwrap();
        sink.emit(&sample_report()).unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("time: 2024-03-31 09:05:07"));
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        let mut sink = |report: &ProgressReport| {
            seen.push(report.total);
            Ok::<(), EstimatorError>(())
        };
        sink.emit(&sample_report()).unwrap();

        assert_eq!(seen, vec![8]);
    }
}
