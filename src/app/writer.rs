use crate::app::models::{AssembledDocument, OutputConfig, Target};
use crate::app::scanner::normalize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use std::thread;

/// Which targets were written, which failed, and which legacy paths were removed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub written: Vec<Target>,
    pub failed: BTreeMap<Target, String>,
    pub retired: Vec<String>,
}

impl WriteOutcome {
    /// True only if at least one write was issued and none failed.
    pub fn success(&self) -> bool {
        !self.written.is_empty() && self.failed.is_empty()
    }
}

/// Writes the document to every enabled target. Targets are written concurrently.
pub fn write_targets(
    document: &AssembledDocument,
    output: &OutputConfig,
    base_dir: &Path,
) -> WriteOutcome {
    let destinations = output.destinations();
    let mut outcome = WriteOutcome::default();
    if destinations.is_empty() {
        log::warn!("No output targets are enabled");
        return outcome;
    }

    let results: Vec<(Target, io::Result<()>)> = thread::scope(|scope| {
        let handles: Vec<_> = destinations
            .iter()
            .map(|(target, rel)| {
                let path = base_dir.join(rel);
                (*target, scope.spawn(move || write_file(&path, document.content())))
            })
            .collect();
        handles
            .into_iter()
            .map(|(target, handle)| {
                let result = handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("writer thread panicked")));
                (target, result)
            })
            .collect()
    });

    for (target, result) in results {
        match result {
            Ok(()) => {
                log::info!("Wrote {} rules", target);
                outcome.written.push(target);
                if let Some(legacy) = target.legacy_path() {
                    if is_destination(&destinations, legacy) {
                        log::debug!("Keeping {}: it is also an output target", legacy);
                    } else if retire_legacy(&base_dir.join(legacy)) {
                        outcome.retired.push(legacy.to_string());
                    }
                }
            }
            Err(err) => {
                log::warn!("Failed to write {} rules: {}", target, err);
                outcome.failed.insert(target, err.to_string());
            }
        }
    }
    outcome
}

fn is_destination(destinations: &[(Target, String)], path: &str) -> bool {
    let path = normalize(path);
    destinations.iter().any(|(_, rel)| normalize(rel) == path)
}

fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Removes a superseded file. Returns whether something was deleted; failures
/// other than "not found" are logged only.
fn retire_legacy(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            log::info!("Removed legacy file {}", path.display());
            true
        }
        Err(err) if err.kind() == ErrorKind::NotFound => false,
        Err(err) => {
            log::warn!("Could not remove legacy file {}: {}", path.display(), err);
            false
        }
    }
}
