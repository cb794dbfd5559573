//! Plan command implementation.

use crate::cli::PlanArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::output::PlanSummary;
use crate::output::PlannedProperty;
use crate::output::PropertyValue;
use anyhow::Result;
use anyhow::anyhow;
use bitarc_core::CompressionConfig;
use bitarc_core::creation::CompressionLevel;
use bitarc_core::creation::CompressionMethod;
use bitarc_core::formats::ArchiveFormat;
use bitarc_core::formats::FormatFeatures;
use bitarc_core::formats::detect_format;
use tracing::debug;

pub fn execute(args: &PlanArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let (config, warnings) = build_config(args)?;
    let properties = config.finalize();
    debug!(count = properties.len(), "configuration finalized");

    let plan = PlanSummary {
        archive: args.archive.display().to_string(),
        format: config.format().name(),
        method: config.compression_method().name(),
        level: config.compression_level().value(),
        dictionary_size: config.dictionary_size(),
        solid: config.solid_mode(),
        encrypted: config.is_password_defined(),
        header_encryption: config.crypt_headers(),
        volume_size: config.volume_size(),
        properties: properties
            .iter()
            .map(|property| PlannedProperty {
                name: property.name,
                value: PropertyValue::from(&property.value),
            })
            .collect(),
        warnings,
    };
    formatter.format_plan(&plan)
}

/// Applies every requested setting, collecting the ones the format ignores.
fn build_config(args: &PlanArgs) -> Result<(CompressionConfig, Vec<String>)> {
    let archive = args.archive.as_path();
    let format = match &args.format {
        Some(name) => add_archive_context(name.parse::<ArchiveFormat>(), archive)?,
        None => add_archive_context(detect_format(archive), archive)?,
    };

    let mut config = CompressionConfig::new(format);
    let mut warnings = Vec::new();

    if let Some(level) = &args.level {
        let level = add_archive_context(level.parse::<CompressionLevel>(), archive)?;
        config.set_compression_level(level);
        if !format.has_feature(FormatFeatures::COMPRESSION_LEVEL) {
            warnings.push(format!("{format} has no compression levels; level ignored"));
        }
    }

    if let Some(method) = &args.method {
        let method = add_archive_context(method.parse::<CompressionMethod>(), archive)?;
        add_archive_context(config.set_compression_method(method), archive)?;
        if config.compression_method() != method {
            warnings.push(format!(
                "{format} always uses {}; method {method} ignored",
                config.compression_method()
            ));
        }
    }

    if let Some(dictionary) = args.dictionary {
        let size = u32::try_from(dictionary)
            .map_err(|_| anyhow!("dictionary size {dictionary} does not fit in 32 bits"))?;
        add_archive_context(config.set_dictionary_size(size), archive)?;
        if config.dictionary_size() != size {
            warnings.push(format!(
                "{} uses a fixed dictionary; size ignored",
                config.compression_method()
            ));
        }
    }

    if args.solid {
        config.set_solid_mode(true);
        if !format.has_feature(FormatFeatures::SOLID_ARCHIVE) {
            warnings.push(format!("{format} does not support solid compression; ignored"));
        }
    }

    if let Some(password) = &args.password {
        config.set_password(password.clone(), args.encrypt_headers);
        if !format.has_feature(FormatFeatures::ENCRYPTION) {
            warnings.push(format!("{format} does not support encryption; password ignored"));
        } else if args.encrypt_headers && !format.has_feature(FormatFeatures::HEADER_ENCRYPTION) {
            warnings.push(format!("{format} cannot encrypt headers; only data is encrypted"));
        }
    }

    if let Some(volume_size) = args.volume_size {
        config.set_volume_size(volume_size);
    }

    Ok((config, warnings))
}
