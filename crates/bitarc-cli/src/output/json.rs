//! JSON output formatter for machine-readable results.

use super::formatter::FormatSummary;
use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::PlanSummary;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_plan(&self, plan: &PlanSummary) -> Result<()> {
        Self::output(&JsonOutput::success("plan", plan))
    }

    fn format_formats(&self, formats: &[FormatSummary]) -> Result<()> {
        Self::output(&JsonOutput::success("formats", formats))
    }
}
