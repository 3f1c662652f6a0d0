//! Sarek Workflow Steps
//!
//! Concrete steps of the Sarek pipeline. Each step differs only in its
//! script, its tool whitelist and, for preprocessing, the reports it locates.
//!
//! | Step | Script | Tools |
//! |---|---|---|
//! | [`PreprocessingStep`] | `main.nf` | none |
//! | [`GermlineVcStep`] | `germlineVC.nf` | haplotypecaller, strelka, manta |
//! | [`AnnotateStep`] | `annotate.nf` | snpeff, vep |
//! | [`MultiQcStep`] | `runMultiQC.nf` | none |

use std::fmt;
use std::fs;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::arguments::ArgValue;
use super::step::{short_type_name, StepConfig, WorkflowStep};
use crate::error::{Result, StepError};
use crate::reports::{AnalysisSample, ReportFile, ReportParser};

/// Mapping, alignment and duplicate marking (`main.nf`).
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessingStep {
    config: StepConfig,
}

impl PreprocessingStep {
    pub const SCRIPT: &'static str = "main.nf";
    pub const AVAILABLE_TOOLS: &'static [&'static str] = &[];

    pub fn new<I, K>(nf_path: impl Into<String>, sarek_path: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = (K, ArgValue)>,
        K: Into<String>,
    {
        Self {
            config: StepConfig::new(nf_path, sarek_path, args, Self::AVAILABLE_TOOLS),
        }
    }

    /// Locates the Qualimap and MarkDuplicates reports for an analyzed sample.
    ///
    /// The Qualimap path is returned without checking that it exists. The
    /// MarkDuplicates directory must contain exactly one `*.metrics` entry;
    /// its name depends on whether the sample was run from one or several
    /// fastq pairs.
    pub fn locate_reports(sample: &dyn AnalysisSample) -> Result<Vec<ReportFile>> {
        let step = short_type_name::<Self>();
        let report_dir = sample.sample_analysis_path().join("Reports");
        let markdups_dir = report_dir.join("MarkDuplicates");

        let mut metric_files = Vec::new();
        for entry in fs::read_dir(&markdups_dir).map_err(|e| StepError::io(&markdups_dir, e))? {
            let entry = entry.map_err(|e| StepError::io(&markdups_dir, e))?;
            if entry.file_name().as_encoded_bytes().ends_with(b".metrics") {
                metric_files.push(entry.path());
            }
        }
        debug!(
            "Found {} metrics file(s) in {}",
            metric_files.len(),
            markdups_dir.display()
        );

        let markdups_metrics = match metric_files.as_slice() {
            [] => {
                return Err(StepError::Parser {
                    step,
                    message: format!(
                        "no metrics file for MarkDuplicates found for sample {} in {}",
                        sample.sampleid(),
                        markdups_dir.display()
                    ),
                })
            }
            [single] => single.clone(),
            _ => {
                return Err(StepError::Parser {
                    step,
                    message: format!(
                        "multiple metrics files for MarkDuplicates found for sample {} in {}",
                        sample.sampleid(),
                        markdups_dir.display()
                    ),
                })
            }
        };

        let reports = vec![
            ReportFile::new(
                ReportParser::QualiMap,
                report_dir
                    .join("bamQC")
                    .join(sample.sampleid())
                    .join("genome_results.txt"),
            ),
            ReportFile::new(ReportParser::PicardMarkDuplicates, markdups_metrics),
        ];
        info!(
            "Located {} report files for sample {}",
            reports.len(),
            sample.sampleid()
        );
        Ok(reports)
    }
}

impl WorkflowStep for PreprocessingStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn available_tools(&self) -> &'static [&'static str] {
        Self::AVAILABLE_TOOLS
    }

    fn relative_script_path(&self) -> Result<&'static str> {
        Ok(Self::SCRIPT)
    }

    fn report_files(&self, sample: &dyn AnalysisSample) -> Result<Vec<ReportFile>> {
        Self::locate_reports(sample)
    }
}

/// Germline variant calling (`germlineVC.nf`).
#[derive(Debug, Clone, PartialEq)]
pub struct GermlineVcStep {
    config: StepConfig,
}

impl GermlineVcStep {
    pub const SCRIPT: &'static str = "germlineVC.nf";
    pub const AVAILABLE_TOOLS: &'static [&'static str] = &["haplotypecaller", "strelka", "manta"];

    pub fn new<I, K>(nf_path: impl Into<String>, sarek_path: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = (K, ArgValue)>,
        K: Into<String>,
    {
        Self {
            config: StepConfig::new(nf_path, sarek_path, args, Self::AVAILABLE_TOOLS),
        }
    }
}

impl WorkflowStep for GermlineVcStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn available_tools(&self) -> &'static [&'static str] {
        Self::AVAILABLE_TOOLS
    }

    fn relative_script_path(&self) -> Result<&'static str> {
        Ok(Self::SCRIPT)
    }
}

/// Variant annotation (`annotate.nf`).
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotateStep {
    config: StepConfig,
}

impl AnnotateStep {
    pub const SCRIPT: &'static str = "annotate.nf";
    pub const AVAILABLE_TOOLS: &'static [&'static str] = &["snpeff", "vep"];

    pub fn new<I, K>(nf_path: impl Into<String>, sarek_path: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = (K, ArgValue)>,
        K: Into<String>,
    {
        Self {
            config: StepConfig::new(nf_path, sarek_path, args, Self::AVAILABLE_TOOLS),
        }
    }
}

impl WorkflowStep for AnnotateStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn available_tools(&self) -> &'static [&'static str] {
        Self::AVAILABLE_TOOLS
    }

    fn relative_script_path(&self) -> Result<&'static str> {
        Ok(Self::SCRIPT)
    }
}

/// MultiQC report aggregation (`runMultiQC.nf`).
#[derive(Debug, Clone, PartialEq)]
pub struct MultiQcStep {
    config: StepConfig,
}

impl MultiQcStep {
    pub const SCRIPT: &'static str = "runMultiQC.nf";
    pub const AVAILABLE_TOOLS: &'static [&'static str] = &[];

    pub fn new<I, K>(nf_path: impl Into<String>, sarek_path: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = (K, ArgValue)>,
        K: Into<String>,
    {
        Self {
            config: StepConfig::new(nf_path, sarek_path, args, Self::AVAILABLE_TOOLS),
        }
    }
}

impl WorkflowStep for MultiQcStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    fn available_tools(&self) -> &'static [&'static str] {
        Self::AVAILABLE_TOOLS
    }

    fn relative_script_path(&self) -> Result<&'static str> {
        Ok(Self::SCRIPT)
    }
}

/// Selects a concrete step by name.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    #[serde(alias = "main")]
    Preprocessing,
    #[serde(alias = "germlineVC")]
    GermlineVc,
    Annotate,
    #[serde(alias = "runMultiQC", alias = "multiqc")]
    MultiQc,
}

impl StepKind {
    pub const ALL: [StepKind; 4] = [
        Self::Preprocessing,
        Self::GermlineVc,
        Self::Annotate,
        Self::MultiQc,
    ];

    /// Name used in step definition files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preprocessing => "preprocessing",
            Self::GermlineVc => "germline_vc",
            Self::Annotate => "annotate",
            Self::MultiQc => "multi_qc",
        }
    }

    /// Script of the step, relative to the Sarek installation.
    pub fn script(&self) -> &'static str {
        match self {
            Self::Preprocessing => PreprocessingStep::SCRIPT,
            Self::GermlineVc => GermlineVcStep::SCRIPT,
            Self::Annotate => AnnotateStep::SCRIPT,
            Self::MultiQc => MultiQcStep::SCRIPT,
        }
    }

    /// Constructs the step this kind names.
    pub fn build<I, K>(
        self,
        nf_path: impl Into<String>,
        sarek_path: impl Into<String>,
        args: I,
    ) -> Box<dyn WorkflowStep>
    where
        I: IntoIterator<Item = (K, ArgValue)>,
        K: Into<String>,
    {
        match self {
            Self::Preprocessing => Box::new(PreprocessingStep::new(nf_path, sarek_path, args)),
            Self::GermlineVc => Box::new(GermlineVcStep::new(nf_path, sarek_path, args)),
            Self::Annotate => Box::new(AnnotateStep::new(nf_path, sarek_path, args)),
            Self::MultiQc => Box::new(MultiQcStep::new(nf_path, sarek_path, args)),
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = String;

    /// Accepts the step name or its script, with or without `.nf`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.as_str() == wanted
                    || kind.script() == wanted
                    || kind.script().trim_end_matches(".nf") == wanted
            })
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("Unknown step '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::SampleDirectory;
    use std::fs::File;
    use std::path::Path;
    use tempfile::tempdir;

    const NF_PATH: &str = "/usr/local/bin/nextflow";
    const SAREK_PATH: &str = "/opt/sarek";

    fn sample_in(root: &Path, metrics: &[&str]) -> SampleDirectory {
        let sample = SampleDirectory::new("this-is-a-sample-id", root);
        let markdups = sample.sample_analysis_path().join("Reports").join("MarkDuplicates");
        std::fs::create_dir_all(&markdups).unwrap();
        for name in ["file1", "file2.extension"].iter().chain(metrics) {
            File::create(markdups.join(name)).unwrap();
        }
        sample
    }

    #[test]
    fn test_scripts() {
        let no_args: Vec<(String, ArgValue)> = Vec::new();
        let steps: Vec<Box<dyn WorkflowStep>> = StepKind::ALL
            .into_iter()
            .map(|kind| kind.build(NF_PATH, SAREK_PATH, no_args.clone()))
            .collect();
        let scripts: Vec<&str> = steps
            .iter()
            .map(|s| s.relative_script_path().unwrap())
            .collect();
        assert_eq!(
            scripts,
            vec!["main.nf", "germlineVC.nf", "annotate.nf", "runMultiQC.nf"]
        );
    }

    #[test]
    fn test_germline_tools_filtered() {
        let step = GermlineVcStep::new(
            NF_PATH,
            SAREK_PATH,
            vec![("tools", ArgValue::from(vec!["haplotypecaller", "bogus", "manta"]))],
        );
        assert_eq!(step.config().args()["tools"], ArgValue::from("haplotypecaller,manta"));
        assert!(step
            .build_command_line()
            .unwrap()
            .ends_with("germlineVC.nf --tools haplotypecaller,manta"));
    }

    #[test]
    fn test_annotate_tools_filtered() {
        let step = AnnotateStep::new(
            NF_PATH,
            SAREK_PATH,
            vec![("tools", ArgValue::from(vec!["vep", "manta", "snpeff"]))],
        );
        assert_eq!(step.config().args()["tools"], ArgValue::from("vep,snpeff"));
        assert_eq!(step.available_tools(), &["snpeff", "vep"]);
    }

    #[test]
    fn test_steps_without_whitelist_drop_tools() {
        let args = vec![("tools", ArgValue::from(vec!["haplotypecaller", "vep"]))];
        let pre = PreprocessingStep::new(NF_PATH, SAREK_PATH, args.clone());
        let qc = MultiQcStep::new(NF_PATH, SAREK_PATH, args);
        assert_eq!(pre.config().args()["tools"], ArgValue::from(""));
        assert_eq!(qc.config().args()["tools"], ArgValue::from(""));
        assert!(qc.available_tools().is_empty());
    }

    #[test]
    fn test_preprocessing_command_line() {
        let step = PreprocessingStep::new(
            NF_PATH,
            SAREK_PATH,
            vec![
                ("sample", ArgValue::from("/data/P1_101/samples.tsv")),
                ("profile", ArgValue::from("standard")),
                ("genome", ArgValue::from("GRCh38")),
                ("outDir", ArgValue::from("/data/P1_101")),
            ],
        );
        assert_eq!(
            step.build_command_line().unwrap(),
            "/usr/local/bin/nextflow run /opt/sarek/main.nf -profile standard \
             --sample /data/P1_101/samples.tsv --genome GRCh38 --outDir /data/P1_101"
        );
    }

    #[test]
    fn test_report_files() {
        let dir = tempdir().unwrap();
        let sample = sample_in(dir.path(), &["file3.metrics"]);
        let reports = PreprocessingStep::locate_reports(&sample).unwrap();
        let report_dir = sample.sample_analysis_path().join("Reports");

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].parser, ReportParser::QualiMap);
        assert_eq!(
            reports[0].path,
            report_dir
                .join("bamQC")
                .join("this-is-a-sample-id")
                .join("genome_results.txt")
        );
        assert_eq!(reports[1].parser, ReportParser::PicardMarkDuplicates);
        assert_eq!(
            reports[1].path,
            report_dir.join("MarkDuplicates").join("file3.metrics")
        );
    }

    #[test]
    fn test_report_files_via_trait() {
        let dir = tempdir().unwrap();
        let sample = sample_in(dir.path(), &["S1.md.metrics"]);
        let step = StepKind::Preprocessing.build(NF_PATH, SAREK_PATH, Vec::<(String, ArgValue)>::new());
        let reports = step.report_files(&sample).unwrap();
        assert_eq!(reports[1].path.file_name().unwrap(), "S1.md.metrics");
    }

    #[test]
    fn test_report_files_no_metrics() {
        let dir = tempdir().unwrap();
        let sample = sample_in(dir.path(), &[]);
        let err = PreprocessingStep::locate_reports(&sample).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, StepError::Parser { step: "PreprocessingStep", .. }));
        assert!(message.contains("no metrics file"));
        assert!(message.contains("this-is-a-sample-id"));
        assert!(message.contains("MarkDuplicates"));
    }

    #[test]
    fn test_report_files_multiple_metrics() {
        let dir = tempdir().unwrap();
        let sample = sample_in(dir.path(), &["file3.metrics", "file4.metrics"]);
        let err = PreprocessingStep::locate_reports(&sample).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, StepError::Parser { .. }));
        assert!(message.contains("multiple metrics files"));
        assert!(message.contains("this-is-a-sample-id"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_report_files_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let sample = sample_in(dir.path(), &[]);
        let name = OsStr::from_bytes(b"S\xff1.md.metrics");
        let metrics = sample
            .sample_analysis_path()
            .join("Reports")
            .join("MarkDuplicates")
            .join(name);
        File::create(&metrics).unwrap();

        let reports = PreprocessingStep::locate_reports(&sample).unwrap();
        assert_eq!(reports[1].path, metrics);
        assert!(reports[1].path.exists());
    }

    #[test]
    fn test_multiqc_has_no_tools() {
        let step = MultiQcStep::new(
            NF_PATH,
            SAREK_PATH,
            vec![("tools", ArgValue::from(vec!["vep"]))],
        );
        assert!(step.available_tools().is_empty());
        assert!(MultiQcStep::AVAILABLE_TOOLS.is_empty());
        assert_eq!(step.config().args()["tools"], ArgValue::from(""));
    }

    #[test]
    fn test_report_files_missing_directory() {
        let dir = tempdir().unwrap();
        let sample = SampleDirectory::new("S2", dir.path());
        let err = PreprocessingStep::locate_reports(&sample).unwrap_err();
        assert!(matches!(err, StepError::Io { .. }));
    }

    #[test]
    fn test_other_steps_have_no_reports() {
        let dir = tempdir().unwrap();
        let sample = SampleDirectory::new("S3", dir.path());
        for kind in [StepKind::GermlineVc, StepKind::Annotate, StepKind::MultiQc] {
            let step = kind.build(NF_PATH, SAREK_PATH, Vec::<(String, ArgValue)>::new());
            assert!(step.report_files(&sample).unwrap().is_empty());
        }
    }

    #[test]
    fn test_step_kind_from_str() {
        assert_eq!("preprocessing".parse::<StepKind>(), Ok(StepKind::Preprocessing));
        assert_eq!("germlineVC.nf".parse::<StepKind>(), Ok(StepKind::GermlineVc));
        assert_eq!("runMultiQC".parse::<StepKind>(), Ok(StepKind::MultiQc));
        assert_eq!(" annotate ".parse::<StepKind>(), Ok(StepKind::Annotate));
        assert!("somatic".parse::<StepKind>().is_err());
    }

    #[test]
    fn test_step_kind_deserialize() {
        let kinds: Vec<StepKind> =
            serde_yaml::from_str("[preprocessing, main, germlineVC, multi_qc, runMultiQC]").unwrap();
        assert_eq!(
            kinds,
            vec![
                StepKind::Preprocessing,
                StepKind::Preprocessing,
                StepKind::GermlineVc,
                StepKind::MultiQc,
                StepKind::MultiQc
            ]
        );
    }
}
