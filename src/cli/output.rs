//! Rendering of binary and provider records.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;

use crate::binary::BinaryRecord;
use crate::provider::ProviderRecord;

/// Output format shared by the reporting commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON array
    Json,
    /// YAML sequence
    Yaml,
}

fn structured<T: Serialize>(items: &[T], format: OutputFormat) -> Result<Option<String>> {
    Ok(match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(items)?),
        OutputFormat::Yaml => Some(serde_yaml::to_string(items)?),
        OutputFormat::Text => None,
    })
}

/// Render binary records.
pub fn render_binaries(records: &[BinaryRecord], format: OutputFormat) -> Result<String> {
    if let Some(out) = structured(records, format)? {
        return Ok(out);
    }
    if records.is_empty() {
        return Ok("No binaries declared.".to_string());
    }

    let mut out = String::new();
    for record in records {
        let status = if record.is_valid { "✓".green() } else { "✗".red() };
        let version = record.version.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        let _ = write!(out, "{} {} {}", status, record.name.bold(), version.cyan());
        if let (Some(provider), Some(abspath)) = (&record.provider, &record.abspath) {
            let _ = write!(out, " via {} at {}", provider, abspath.display());
        }
        out.push('\n');

        if !record.is_valid {
            for attempt in &record.attempts {
                let _ = writeln!(out, "    {}", attempt.to_string().dimmed());
            }
        }
    }
    Ok(out.trim_end().to_string())
}

/// Render provider records.
pub fn render_providers(records: &[ProviderRecord], format: OutputFormat) -> Result<String> {
    if let Some(out) = structured(records, format)? {
        return Ok(out);
    }

    let mut out = String::new();
    for record in records {
        let installer = match (&record.installer, &record.installer_abspath) {
            (None, _) => "read-only".dimmed().to_string(),
            (Some(_), Some(path)) => path.display().to_string(),
            (Some(bin), None) => format!("{bin} (not installed)").yellow().to_string(),
        };
        let _ = writeln!(out, "{} {}", record.name.bold(), installer);
        for dir in &record.search_path {
            let _ = writeln!(out, "    {}", dir.display());
        }
    }
    Ok(out.trim_end().to_string())
}
