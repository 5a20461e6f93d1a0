//! # Report Writing
//!
//! Pipelines emit one row per individual, either as a tab-separated table
//! with a header line or as JSON Lines.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;

/// Report encoding
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated table with a header line
    #[default]
    Tsv,
    /// One JSON object per line
    Json,
}

/// A row a pipeline can report
pub trait ReportRow: Serialize {
    /// Column names, in the order of [`ReportRow::fields`]
    fn header() -> &'static [&'static str];

    /// Column values rendered for the TSV table
    fn fields(&self) -> Vec<String>;
}

/// Buffered writer for pipeline reports
pub struct ReportWriter {
    out: Box<dyn Write + Send>,
    format: OutputFormat,
    wrote_header: bool,
}

impl ReportWriter {
    /// Write to `path`, or to stdout when no path is given
    pub fn create(path: Option<&Path>, format: OutputFormat) -> Result<Self> {
        let out: Box<dyn Write + Send> = match path {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(BufWriter::new(io::stdout())),
        };
        Ok(Self::from_writer(out, format))
    }

    pub fn from_writer(out: Box<dyn Write + Send>, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            wrote_header: false,
        }
    }

    pub fn write_rows<R: ReportRow>(&mut self, rows: &[R]) -> Result<()> {
        match self.format {
            OutputFormat::Tsv => {
                if !self.wrote_header {
                    writeln!(self.out, "{}", R::header().join("\t"))?;
                    self.wrote_header = true;
                }
                for row in rows {
                    writeln!(self.out, "{}", row.fields().join("\t"))?;
                }
            }
            OutputFormat::Json => {
                for row in rows {
                    serde_json::to_writer(&mut self.out, row).map_err(io::Error::from)?;
                    writeln!(self.out)?;
                }
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for ReportWriter {
    fn drop(&mut self) {
        if let Err(e) = self.out.flush() {
            warn!(error = %e, "failed to flush report on drop");
        }
    }
}
