// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod generator;
pub mod models;
pub mod report;
pub mod scanner;
pub mod writer;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;

use self::cli::Cli;
use self::config::{load_config, resolve_config, CONFIG_FILE_NAME};
use self::generator::{generate, GenerateResult};

/// Loads the configuration, runs the pipeline, and prints the outcome.
/// Returns whether the run succeeded.
pub fn run() -> Result<bool> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Identify the project directory
    let base_dir = match &args.base_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("Failed to get current directory")?,
    };

    // 3. Resolve Configuration
    let persisted = load_config(&base_dir, args.config.as_deref())?;
    if persisted.is_none() {
        log::info!(
            "No {} in {}; using the default configuration",
            CONFIG_FILE_NAME,
            base_dir.display()
        );
    }
    let config = resolve_config(persisted, &args.overrides());

    // 4. Resolve, assemble, write
    let result = generate(&base_dir, &config)?;

    // 5. Report
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", summarize(&result));
    }

    Ok(result.success)
}

fn summarize(result: &GenerateResult) -> String {
    let mut out = result.file_statuses.render();
    for target in &result.written_targets {
        out.push_str(&format!("Wrote {} rules\n", target));
    }
    for (target, reason) in &result.failed_targets {
        out.push_str(&format!("Failed to write {} rules: {}\n", target, reason));
    }
    for path in &result.retired_paths {
        out.push_str(&format!("Removed legacy {}\n", path));
    }
    if result.success {
        out.push_str("✅ AI context files generated successfully\n");
    } else {
        out.push_str("No rules were generated. Check your sources and output configuration.\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{FileStatus, Target};

    #[test]
    fn summary_lists_targets_and_outcome() {
        let mut result = GenerateResult {
            success: true,
            written_targets: vec![Target::Cursor],
            retired_paths: vec![".windsurfrules".to_string()],
            ..GenerateResult::default()
        };
        result.file_statuses.record("README.md", FileStatus::included());

        let summary = summarize(&result);
        assert!(summary.starts_with("Files for AI context:\n  ✓ README.md\n"));
        assert!(summary.contains("Wrote cursor rules"));
        assert!(summary.contains("Removed legacy .windsurfrules"));
        assert!(summary.ends_with("✅ AI context files generated successfully\n"));
    }

    #[test]
    fn summary_reports_failure() {
        let summary = summarize(&GenerateResult::default());
        assert!(summary.contains("No rules were generated"));
    }
}
