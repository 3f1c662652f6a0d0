//! Sarek Workflow Module
//!
//! Builds command lines for steps of the Sarek pipeline.
//!
//! # Structure
//!
//! - [`arguments`]: Typed argument values and their normalization
//! - [`template`]: Named-placeholder substitution
//! - [`step`]: Shared step configuration and the [`WorkflowStep`] trait
//! - [`steps`]: Concrete Sarek steps
//! - [`parser`]: Loading step definitions from YAML/JSON

pub mod arguments;
pub mod parser;
pub mod step;
pub mod steps;
pub mod template;

pub use arguments::{ArgValue, StepArguments};
pub use parser::{load_step_definition, StepDefinition};
pub use step::{StepConfig, WorkflowStep};
pub use steps::{AnnotateStep, GermlineVcStep, MultiQcStep, PreprocessingStep, StepKind};
