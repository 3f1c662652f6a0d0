//! Step Arguments
//!
//! Typed values for step-specific Sarek parameters and the ordered mapping
//! that holds them.
//!
//! Arguments are normalized once, when a step is constructed:
//! - the fixed path keys (`nf_path`, `sarek_path`) are removed
//! - `tools` is filtered against the step's whitelist and always present
//! - list values are joined into a single `,`-separated string

use std::fmt;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Keyword names reserved for the executable and installation paths.
pub const FIXED_PATH_KEYS: [&str; 2] = ["nf_path", "sarek_path"];

/// Name of the argument holding the requested analysis tools.
pub const TOOLS_KEY: &str = "tools";

/// Ordered mapping from argument name to value.
pub type StepArguments = IndexMap<String, ArgValue>;

/// A single argument value.
///
/// Deserializes from any YAML/JSON scalar or a sequence of strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ArgValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    List(Vec<String>),
}

impl ArgValue {
    /// Returns whether the value counts as set on the command line.
    ///
    /// NOTE: a numeric value of 0 is treated as unset, as is `false`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
        }
    }

    /// Interprets the value as a list of tool names.
    fn as_tool_list(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            Self::Str(s) => s
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for ArgValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(String::from).collect())
    }
}

/// Filters tool names against a whitelist, preserving input order.
///
/// # Example
///
/// ```
/// use sarek_steps::workflow::arguments::valid_tools;
///
/// let tools = vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()];
/// assert_eq!(valid_tools(&tools, &["B", "D"]), vec!["B", "D"]);
/// assert!(valid_tools(&tools, &[]).is_empty());
/// ```
pub fn valid_tools(tools: &[String], available_tools: &[&str]) -> Vec<String> {
    tools
        .iter()
        .filter(|t| available_tools.contains(&t.as_str()))
        .cloned()
        .collect()
}

/// Builds the normalized argument mapping for a step.
///
/// Unknown argument names are kept as-is; they are rendered on the command
/// line like any other argument.
pub fn normalize_arguments<I, K>(raw: I, available_tools: &[&str]) -> StepArguments
where
    I: IntoIterator<Item = (K, ArgValue)>,
    K: Into<String>,
{
    let mut args: StepArguments = raw
        .into_iter()
        .map(|(k, v)| (k.into(), v))
        .filter(|(k, _)| !FIXED_PATH_KEYS.contains(&k.as_str()))
        .collect();

    let requested = args
        .get(TOOLS_KEY)
        .map(ArgValue::as_tool_list)
        .unwrap_or_default();
    let tools = valid_tools(&requested, available_tools);
    if tools.len() < requested.len() {
        let dropped: Vec<&String> = requested.iter().filter(|t| !tools.contains(*t)).collect();
        warn!("Dropping tools not available for this step: {:?}", dropped);
    }
    args.insert(TOOLS_KEY.to_string(), ArgValue::List(tools));

    for value in args.values_mut() {
        if let ArgValue::List(items) = value {
            let joined = items.join(",");
            *value = ArgValue::Str(joined);
        }
    }

    debug!("Normalized {} step arguments", args.len());
    args
}
