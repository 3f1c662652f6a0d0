//! Sarek Steps - Command Lines for Sarek Workflow Steps
//!
//! Builds Nextflow command lines for the stages of the Sarek germline
//! analysis pipeline and locates the reports each stage leaves behind.
//! Running the command is left to the caller.
//!
//! # Architecture
//!
//! - [`workflow`]: Step arguments, the [`WorkflowStep`] trait and the concrete steps
//! - [`reports`]: Report descriptors and the analyzed-sample collaborator
//! - [`error`]: Crate error type
//!
//! # Example
//!
//! ```rust
//! use sarek_steps::workflow::{ArgValue, GermlineVcStep, WorkflowStep};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let step = GermlineVcStep::new(
//!         "/usr/local/bin/nextflow",
//!         "/opt/sarek",
//!         vec![
//!             ("profile", ArgValue::from("standard")),
//!             ("tools", ArgValue::from(vec!["haplotypecaller", "bogus", "manta"])),
//!         ],
//!     );
//!
//!     assert_eq!(
//!         step.build_command_line()?,
//!         "/usr/local/bin/nextflow run /opt/sarek/germlineVC.nf -profile standard \
//!          --tools haplotypecaller,manta"
//!     );
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod reports;
pub mod workflow;

// Re-export commonly used types
pub use error::{Result, StepError};
pub use reports::{AnalysisSample, ReportFile, ReportParser, SampleDirectory};
pub use workflow::{StepKind, WorkflowStep};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "sarek-steps";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_module_exports_step_kind() {
        let step = StepKind::Annotate.build("nextflow", "sarek", Vec::<(String, workflow::ArgValue)>::new());
        assert_eq!(step.relative_script_path().unwrap(), "annotate.nf");
    }
}
