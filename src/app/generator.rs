use crate::app::formatter::ContextFormatter;
use crate::app::models::{Configuration, Target};
use crate::app::report::StatusReport;
use crate::app::scanner::Resolver;
use crate::app::writer::write_targets;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Everything a caller needs to present the outcome of a run.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    pub success: bool,
    pub processed_files: BTreeMap<String, bool>,
    pub file_statuses: StatusReport,
    pub written_targets: Vec<Target>,
    pub failed_targets: BTreeMap<Target, String>,
    pub retired_paths: Vec<String>,
}

/// Resolves, assembles, and writes the context for one configuration.
///
/// Only filesystem faults during pattern expansion are returned as errors.
/// Missing sources, empty documents, and failed writes produce a result with
/// `success: false`.
pub fn generate(base_dir: &Path, config: &Configuration) -> Result<GenerateResult> {
    let resolution = Resolver::new(base_dir).resolve(&config.sources)?;

    if resolution.files.is_empty() {
        log::warn!("No sources found");
        let file_statuses =
            StatusReport::collate(&config.sources, &resolution.patterns, &[], &StatusReport::default());
        return Ok(GenerateResult {
            file_statuses,
            ..GenerateResult::default()
        });
    }

    let assembly = ContextFormatter::assemble(&resolution.files, base_dir, &config.template);
    let file_statuses = StatusReport::collate(
        &config.sources,
        &resolution.patterns,
        &resolution.files,
        &assembly.statuses,
    );
    let processed_files = resolution
        .files
        .iter()
        .map(|file| {
            let included = assembly
                .statuses
                .get(&file.path)
                .is_some_and(|status| status.included);
            (file.path.clone(), included)
        })
        .collect();

    let Some(document) = assembly.document else {
        log::warn!("All sources were empty or unreadable; nothing written");
        return Ok(GenerateResult {
            processed_files,
            file_statuses,
            ..GenerateResult::default()
        });
    };

    log::debug!("Assembled {} blocks", document.block_count());
    let outcome = write_targets(&document, &config.output, base_dir);
    Ok(GenerateResult {
        success: outcome.success(),
        processed_files,
        file_statuses,
        written_targets: outcome.written,
        failed_targets: outcome.failed,
        retired_paths: outcome.retired,
    })
}
