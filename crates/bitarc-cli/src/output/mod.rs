//! Output formatting module.

mod formatter;
mod human;
mod json;

pub use formatter::FormatSummary;
pub use formatter::OutputFormatter;
pub use formatter::PlanSummary;
pub use formatter::PlannedProperty;
pub use formatter::PropertyValue;

use human::HumanFormatter;
use json::JsonFormatter;

/// Creates an output formatter based on CLI flags
pub fn create_formatter(json: bool, verbose: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter::new(verbose, quiet))
    }
}
