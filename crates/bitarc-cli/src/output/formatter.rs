//! Output formatter trait and the data shown by each command.

use anyhow::Result;
use bitarc_core::engine::PropVariant;
use serde::Serialize;
use std::fmt;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format a validated compression plan
    fn format_plan(&self, plan: &PlanSummary) -> Result<()>;

    /// Format the supported format table
    fn format_formats(&self, formats: &[FormatSummary]) -> Result<()>;
}

/// Outcome of `bitarc plan`.
#[derive(Debug, Serialize)]
pub struct PlanSummary {
    pub archive: String,
    pub format: &'static str,
    pub method: &'static str,
    pub level: u32,
    pub dictionary_size: u32,
    pub solid: bool,
    pub encrypted: bool,
    pub header_encryption: bool,
    pub volume_size: u64,
    pub properties: Vec<PlannedProperty>,
    pub warnings: Vec<String>,
}

/// One entry of the finalized engine property list.
#[derive(Debug, Serialize)]
pub struct PlannedProperty {
    pub name: &'static str,
    pub value: PropertyValue,
}

/// JSON-friendly rendering of an engine property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Empty,
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl From<&PropVariant> for PropertyValue {
    fn from(value: &PropVariant) -> Self {
        match value {
            PropVariant::Empty => Self::Empty,
            PropVariant::Bool(b) => Self::Bool(*b),
            PropVariant::UInt32(n) => Self::Unsigned(u64::from(*n)),
            PropVariant::UInt64(n) | PropVariant::FileTime(n) => Self::Unsigned(*n),
            PropVariant::Int64(n) => Self::Signed(*n),
            PropVariant::String(s) => Self::Text(s.clone()),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("-"),
            Self::Bool(b) => write!(f, "{}", if *b { "on" } else { "off" }),
            Self::Unsigned(n) => write!(f, "{n}"),
            Self::Signed(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One row of `bitarc formats`.
#[derive(Debug, Serialize)]
pub struct FormatSummary {
    pub name: &'static str,
    pub extension: &'static str,
    pub default_method: &'static str,
    pub methods: Vec<&'static str>,
    pub features: Vec<&'static str>,
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data,
        }
    }
}
