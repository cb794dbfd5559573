//! Formats command implementation.

use crate::output::FormatSummary;
use crate::output::OutputFormatter;
use anyhow::Result;
use bitarc_core::creation::CompressionMethod;
use bitarc_core::creation::is_valid_method;
use bitarc_core::formats::ArchiveFormat;
use bitarc_core::formats::FormatFeatures;

const FEATURE_NAMES: [(FormatFeatures, &str); 6] = [
    (FormatFeatures::MULTIPLE_FILES, "multiple files"),
    (FormatFeatures::SOLID_ARCHIVE, "solid"),
    (FormatFeatures::COMPRESSION_LEVEL, "levels"),
    (FormatFeatures::ENCRYPTION, "encryption"),
    (FormatFeatures::HEADER_ENCRYPTION, "header encryption"),
    (FormatFeatures::MULTIPLE_METHODS, "multiple methods"),
];

pub fn execute(formatter: &dyn OutputFormatter) -> Result<()> {
    let formats: Vec<FormatSummary> = ArchiveFormat::ALL.into_iter().map(summarize).collect();
    formatter.format_formats(&formats)
}

fn summarize(format: ArchiveFormat) -> FormatSummary {
    FormatSummary {
        name: format.name(),
        extension: format.extension(),
        default_method: format.default_method().name(),
        methods: CompressionMethod::ALL
            .into_iter()
            .filter(|&method| is_valid_method(format, method))
            .map(CompressionMethod::name)
            .collect(),
        features: FEATURE_NAMES
            .into_iter()
            .filter(|&(feature, _)| format.has_feature(feature))
            .map(|(_, name)| name)
            .collect(),
    }
}
