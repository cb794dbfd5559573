//! Human-readable output formatter with colors and styling.

use super::formatter::FormatSummary;
use super::formatter::OutputFormatter;
use super::formatter::PlanSummary;
use anyhow::Result;
use console::Term;
use console::style;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn on_off(value: bool) -> &'static str {
        if value { "on" } else { "off" }
    }

    fn write_warning(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_plan(&self, plan: &PlanSummary) -> Result<()> {
        // Warnings are shown even in quiet mode.
        for warning in &plan.warnings {
            self.write_warning(warning);
        }
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Configuration valid for {}",
                style("✓").green().bold(),
                plan.archive
            ));
        } else {
            let _ = self
                .term
                .write_line(&format!("Configuration valid for {}", plan.archive));
        }

        let _ = self.term.write_line("");
        let _ = self
            .term
            .write_line(&format!("  Format:      {}", plan.format));
        let _ = self
            .term
            .write_line(&format!("  Method:      {}", plan.method));
        let _ = self.term.write_line(&format!("  Level:       {}", plan.level));
        let dictionary = if plan.dictionary_size == 0 {
            "engine default".to_string()
        } else {
            Self::format_size(u64::from(plan.dictionary_size))
        };
        let _ = self
            .term
            .write_line(&format!("  Dictionary:  {dictionary}"));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Solid:       {}", Self::on_off(plan.solid)));
            let _ = self.term.write_line(&format!(
                "  Encryption:  {} (headers {})",
                Self::on_off(plan.encrypted),
                Self::on_off(plan.header_encryption)
            ));
            if plan.volume_size > 0 {
                let _ = self.term.write_line(&format!(
                    "  Volumes:     {}",
                    Self::format_size(plan.volume_size)
                ));
            }
        }

        let _ = self.term.write_line("");
        if plan.properties.is_empty() {
            let _ = self.term.write_line("No engine properties (format defaults)");
            return Ok(());
        }
        let _ = self.term.write_line("Engine properties:");
        for property in &plan.properties {
            let name = if self.use_colors {
                style(format!("{:<6}", property.name)).cyan().to_string()
            } else {
                format!("{:<6}", property.name)
            };
            let _ = self
                .term
                .write_line(&format!("  {name} = {}", property.value));
        }

        Ok(())
    }

    fn format_formats(&self, formats: &[FormatSummary]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let _ = self.term.write_line(&format!(
            "{:<7} {:<5} {:<9} {}",
            "FORMAT", "EXT", "DEFAULT", "METHODS"
        ));
        for format in formats {
            let _ = self.term.write_line(&format!(
                "{:<7} {:<5} {:<9} {}",
                format.name,
                format.extension,
                format.default_method,
                format.methods.join(", ")
            ));
            if self.verbose && !format.features.is_empty() {
                let _ = self
                    .term
                    .write_line(&format!("        features: {}", format.features.join(", ")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(512), "512 B");
        assert_eq!(HumanFormatter::format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_dictionaries() {
        assert_eq!(HumanFormatter::format_size(32 * 1024), "32.0 KB");
        assert_eq!(HumanFormatter::format_size(900 * 1024), "900.0 KB");
        assert_eq!(HumanFormatter::format_size(64 * 1024 * 1024), "64.0 MB");
        assert_eq!(HumanFormatter::format_size(1536 * 1024 * 1024), "1.5 GB");
    }

    #[test]
    fn test_on_off() {
        assert_eq!(HumanFormatter::on_off(true), "on");
        assert_eq!(HumanFormatter::on_off(false), "off");
    }
}
