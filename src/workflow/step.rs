//! Workflow Step Contract
//!
//! A Sarek workflow step is one stage of the pipeline, identified by a script
//! under the Sarek installation. This module holds:
//! - [`StepConfig`]: the executable path, installation path and normalized arguments
//! - [`WorkflowStep`]: the trait every concrete step implements
//!
//! The command line has the shape
//! `<nf_path> run <sarek_path>/<script> [-config ..] [-profile ..] [--<name> <value> ..]`.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;

use super::arguments::{normalize_arguments, ArgValue, StepArguments};
use super::template::{placeholder, substitute};
use crate::error::{Result, StepError};
use crate::reports::{AnalysisSample, ReportFile};

/// Arguments rendered with a single hyphen, in this order, ahead of all others.
pub const SINGLE_HYPHEN_ARGS: [&str; 2] = ["config", "profile"];

const NF_PATH_KEY: &str = "nf_path";
const STEP_PATH_KEY: &str = "sarek_step_path";

/// Placeholder names the builder fills in itself.
pub const RESERVED_KEYS: [&str; 2] = [NF_PATH_KEY, STEP_PATH_KEY];

/// Paths and arguments shared by every workflow step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepConfig {
    nf_path: String,
    sarek_path: String,
    args: StepArguments,
}

impl StepConfig {
    /// Creates a configuration, normalizing `args` against `available_tools`.
    ///
    /// # Example
    ///
    /// ```
    /// use sarek_steps::workflow::arguments::ArgValue;
    /// use sarek_steps::workflow::step::StepConfig;
    ///
    /// let config = StepConfig::new(
    ///     "/usr/bin/nextflow",
    ///     "/opt/sarek",
    ///     vec![("tools", ArgValue::from(vec!["vep", "bogus"]))],
    ///     &["snpeff", "vep"],
    /// );
    /// assert_eq!(config.args()["tools"], ArgValue::from("vep"));
    /// ```
    pub fn new<I, K>(
        nf_path: impl Into<String>,
        sarek_path: impl Into<String>,
        args: I,
        available_tools: &[&str],
    ) -> Self
    where
        I: IntoIterator<Item = (K, ArgValue)>,
        K: Into<String>,
    {
        Self {
            nf_path: nf_path.into(),
            sarek_path: sarek_path.into(),
            args: normalize_arguments(args, available_tools),
        }
    }

    /// Path to the Nextflow executable.
    pub fn nf_path(&self) -> &str {
        &self.nf_path
    }

    /// Path to the root of the Sarek installation.
    pub fn sarek_path(&self) -> &str {
        &self.sarek_path
    }

    /// The normalized step arguments.
    pub fn args(&self) -> &StepArguments {
        &self.args
    }
}

/// Appends `<hyphen><name> ${name}` to `base` if `name` has a truthy value in
/// `args`, otherwise returns `base` unchanged.
pub fn append_argument(base: &str, args: &StepArguments, name: &str, hyphen: &str) -> String {
    match args.get(name) {
        Some(value) if value.is_truthy() => {
            format!("{} {}{} {}", base, hyphen, name, placeholder(name))
        }
        _ => base.to_string(),
    }
}

/// Checks that every argument can be rendered as its own placeholder.
///
/// Names may not be empty, contain `}` or shadow one of [`RESERVED_KEYS`].
pub fn check_argument_names(args: &StepArguments) -> Result<()> {
    for name in args.keys() {
        if RESERVED_KEYS.contains(&name.as_str()) {
            return Err(StepError::ReservedArgument { name: name.clone() });
        }
        if name.is_empty() || name.contains('}') {
            return Err(StepError::InvalidArgumentName { name: name.clone() });
        }
    }
    Ok(())
}

/// Short type name of `T`, without its module path.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// A stage of the Sarek workflow.
///
/// Implementors provide [`config`](WorkflowStep::config) and usually
/// [`relative_script_path`](WorkflowStep::relative_script_path); everything
/// else has a default.
pub trait WorkflowStep {
    /// The configuration this step was constructed with.
    fn config(&self) -> &StepConfig;

    /// Name used in error messages.
    fn step_name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Tool names this step accepts in its `tools` argument.
    fn available_tools(&self) -> &'static [&'static str] {
        &[]
    }

    /// Script path of this step, relative to the Sarek installation.
    ///
    /// Steps that do not override this fail with [`StepError::UndefinedStep`].
    fn relative_script_path(&self) -> Result<&'static str> {
        Err(StepError::UndefinedStep {
            step: self.step_name(),
        })
    }

    /// Full path to this step's script.
    fn script_path(&self) -> Result<PathBuf> {
        Ok(Path::new(self.config().sarek_path()).join(self.relative_script_path()?))
    }

    /// Builds the command line that launches this step.
    ///
    /// Arguments with a falsy value (empty, `false`, `0`) are left out.
    fn build_command_line(&self) -> Result<String> {
        let config = self.config();
        let args = config.args();
        check_argument_names(args)?;

        let mut template = format!("{} run {}", placeholder(NF_PATH_KEY), placeholder(STEP_PATH_KEY));
        for name in SINGLE_HYPHEN_ARGS {
            template = append_argument(&template, args, name, "-");
        }
        for name in args.keys().filter(|n| !SINGLE_HYPHEN_ARGS.contains(&n.as_str())) {
            template = append_argument(&template, args, name, "--");
        }

        let mut values: IndexMap<String, String> = args
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        values.insert(NF_PATH_KEY.to_string(), config.nf_path().to_string());
        values.insert(
            STEP_PATH_KEY.to_string(),
            self.script_path()?.to_string_lossy().into_owned(),
        );

        let command_line = substitute(&template, &values)?;
        debug!("{} command line: {}", self.step_name(), command_line);
        Ok(command_line)
    }

    /// Report files produced by this step, paired with the parser to read them.
    fn report_files(&self, _sample: &dyn AnalysisSample) -> Result<Vec<ReportFile>> {
        Ok(Vec::new())
    }
}
