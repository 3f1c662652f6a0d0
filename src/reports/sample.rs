//! Analyzed samples.

use std::path::{Path, PathBuf};

/// A sample whose Sarek results can be searched for reports.
pub trait AnalysisSample {
    /// Directory holding this sample's analysis results.
    fn sample_analysis_path(&self) -> PathBuf;

    /// Identifier of the sample.
    fn sampleid(&self) -> &str;
}

/// A sample whose results live in `<analysis_dir>/<sampleid>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleDirectory {
    sampleid: String,
    analysis_dir: PathBuf,
}

impl SampleDirectory {
    pub fn new(sampleid: impl Into<String>, analysis_dir: impl Into<PathBuf>) -> Self {
        Self {
            sampleid: sampleid.into(),
            analysis_dir: analysis_dir.into(),
        }
    }

    /// The project-level analysis directory.
    pub fn analysis_dir(&self) -> &Path {
        &self.analysis_dir
    }
}

impl AnalysisSample for SampleDirectory {
    fn sample_analysis_path(&self) -> PathBuf {
        self.analysis_dir.join(&self.sampleid)
    }

    fn sampleid(&self) -> &str {
        &self.sampleid
    }
}
