//! Report Descriptors
//!
//! After a step has run, its output reports are handed to parsers. This
//! module names those parsers and describes where each report lives.
//!
//! - [`ReportParser`]: identifies the parser for a report file
//! - [`ReportFile`]: a parser paired with the path it should read
//! - [`AnalysisSample`]: the analyzed sample a step reports on

pub mod sample;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use sample::{AnalysisSample, SampleDirectory};

/// Parser able to read a step's report file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportParser {
    /// Qualimap bamqc `genome_results.txt`.
    QualiMap,
    /// Picard MarkDuplicates `.metrics` file.
    PicardMarkDuplicates,
}

impl ReportParser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QualiMap => "qualimap",
            Self::PicardMarkDuplicates => "picard_mark_duplicates",
        }
    }
}

impl fmt::Display for ReportParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report file and the parser that reads it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub parser: ReportParser,
    pub path: PathBuf,
}

impl ReportFile {
    pub fn new(parser: ReportParser, path: impl Into<PathBuf>) -> Self {
        Self {
            parser,
            path: path.into(),
        }
    }
}
