//! Step Definition Parser
//!
//! Loads a step definition from a YAML file (or JSON, by `.json` extension).
//!
//! # Example YAML Format
//!
//! ```yaml
//! step: germline_vc
//! nf_path: /usr/local/bin/nextflow
//! sarek_path: /opt/sarek
//! args:
//!   profile: standard
//!   config: /opt/sarek/uppmax.conf
//!   sample: /proj/P100/analysis/P100_1001/samples.tsv
//!   genome: GRCh38
//!   tools: [haplotypecaller, manta]
//! ```

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::arguments::StepArguments;
use super::step::WorkflowStep;
use super::steps::StepKind;
use crate::error::{Result, StepError};

/// A step as described in a definition file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StepDefinition {
    /// Which step to run
    pub step: StepKind,

    /// Path to the Nextflow executable
    pub nf_path: String,

    /// Path to the Sarek installation
    pub sarek_path: String,

    /// Step arguments, in command-line order
    #[serde(default)]
    pub args: StepArguments,
}

impl StepDefinition {
    /// Constructs the step this definition describes.
    pub fn build(&self) -> Box<dyn WorkflowStep> {
        self.step
            .build(&self.nf_path, &self.sarek_path, self.args.clone())
    }
}

/// Parses a YAML step definition.
pub fn parse_step_definition(content: &str, path: &Path) -> Result<StepDefinition> {
    let definition: StepDefinition =
        serde_yaml::from_str(content).map_err(|e| StepError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    check_paths(&definition, path)?;
    Ok(definition)
}

/// Loads a step definition from a YAML or JSON file.
///
/// # Example
///
/// ```rust,no_run
/// use sarek_steps::workflow::load_step_definition;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let definition = load_step_definition("germline.yaml")?;
///     println!("{}", definition.build().build_command_line()?);
///     Ok(())
/// }
/// ```
pub fn load_step_definition(path: impl AsRef<Path>) -> Result<StepDefinition> {
    let path = path.as_ref();
    info!("Loading step definition from: {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| StepError::io(path, e))?;
    debug!("Step definition loaded ({} bytes)", content.len());

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let definition = if is_json {
        let definition: StepDefinition =
            serde_json::from_str(&content).map_err(|e| StepError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        check_paths(&definition, path)?;
        definition
    } else {
        parse_step_definition(&content, path)?
    };

    info!(
        "Parsed {} step with {} arguments",
        definition.step,
        definition.args.len()
    );
    Ok(definition)
}

fn check_paths(definition: &StepDefinition, path: &Path) -> Result<()> {
    for (name, value) in [
        ("nf_path", &definition.nf_path),
        ("sarek_path", &definition.sarek_path),
    ] {
        if value.trim().is_empty() {
            return Err(StepError::Config {
                path: path.to_path_buf(),
                message: format!("'{}' must not be empty", name),
            });
        }
    }
    Ok(())
}
