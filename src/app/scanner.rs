use crate::app::models::{Exclusion, FileStatus, ResolvedFile};
use crate::app::report::StatusReport;
use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const GLOB_META: [char; 6] = ['*', '?', '[', ']', '{', '}'];

/// Ordered, deduplicated files plus one status per distinct pattern.
#[derive(Debug, Default)]
pub struct Resolution {
    pub files: Vec<ResolvedFile>,
    pub patterns: StatusReport,
}

/// What a single pattern expanded to.
#[derive(Debug, PartialEq, Eq)]
enum Expansion {
    Literal(String),
    Glob(Vec<String>),
    Missing,
    Invalid(String),
}

pub struct Resolver {
    base_dir: PathBuf,
}

impl Resolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Expands patterns in order. The first pattern to match a file decides its
    /// position; later matches of the same file are dropped.
    pub fn resolve(&self, patterns: &[String]) -> Result<Resolution> {
        let mut resolution = Resolution::default();
        let mut seen = HashSet::new();

        for (index, pattern) in patterns.iter().enumerate() {
            let matches = match self.expand(pattern)? {
                Expansion::Literal(path) => vec![path],
                Expansion::Glob(paths) if !paths.is_empty() => paths,
                Expansion::Glob(_) => {
                    log::warn!("No files match pattern '{}'", pattern);
                    resolution
                        .patterns
                        .record(pattern, FileStatus::excluded(Exclusion::NoMatches));
                    continue;
                }
                Expansion::Missing => {
                    log::warn!("Source file '{}' does not exist", pattern);
                    resolution
                        .patterns
                        .record(pattern, FileStatus::excluded(Exclusion::FileNotFound));
                    continue;
                }
                Expansion::Invalid(reason) => {
                    log::warn!("Invalid glob pattern '{}': {}", pattern, reason);
                    resolution.patterns.record(
                        pattern,
                        FileStatus::excluded(Exclusion::InvalidPattern(reason)),
                    );
                    continue;
                }
            };

            for path in matches {
                if seen.insert(path.clone()) {
                    resolution.files.push(ResolvedFile {
                        path,
                        source: index,
                    });
                }
            }
            resolution.patterns.record(pattern, FileStatus::included());
        }

        log::debug!(
            "Resolved {} files from {} patterns",
            resolution.files.len(),
            patterns.len()
        );
        Ok(resolution)
    }

    fn expand(&self, pattern: &str) -> Result<Expansion> {
        let normalized = normalize(pattern);
        if self.base_dir.join(&normalized).is_file() {
            return Ok(Expansion::Literal(normalized));
        }
        if !is_glob(&normalized) {
            return Ok(Expansion::Missing);
        }

        let matcher = match GlobBuilder::new(&normalized)
            .literal_separator(true)
            .build()
        {
            Ok(glob) => glob.compile_matcher(),
            Err(err) => return Ok(Expansion::Invalid(err.kind().to_string())),
        };
        let paths = self.walk_matches(&normalized, &matcher)?;
        Ok(Expansion::Glob(paths))
    }

    /// Walks from the pattern's static prefix and collects matching files, sorted.
    fn walk_matches(&self, pattern: &str, matcher: &GlobMatcher) -> Result<Vec<String>> {
        let absolute = pattern.starts_with('/');
        let prefix = static_prefix(pattern);
        let walk_root = if prefix.is_empty() {
            self.base_dir.clone()
        } else {
            self.base_dir.join(prefix)
        };
        if !walk_root.is_dir() {
            return Ok(Vec::new());
        }

        // Hidden and git-ignored files are sources like any other.
        let walker = WalkBuilder::new(&walk_root)
            .standard_filters(false)
            .follow_links(true)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        let mut matches = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) if err.io_error().is_some() => {
                    return Err(err).with_context(|| {
                        format!("Failed to enumerate files for pattern '{}'", pattern)
                    });
                }
                Err(err) => {
                    log::warn!("Skipping entry while expanding '{}': {}", pattern, err);
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let Some(candidate) = self.display_path(entry.path(), absolute) else {
                continue;
            };
            if matcher.is_match(&candidate) {
                matches.push(candidate);
            }
        }

        matches.sort();
        matches.dedup();
        Ok(matches)
    }

    fn display_path(&self, path: &Path, absolute: bool) -> Option<String> {
        if absolute {
            return Some(normalize(&path.to_string_lossy()));
        }
        let relative = diff_paths(path, &self.base_dir)?;
        Some(normalize(&relative.to_string_lossy()))
    }
}

pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(&GLOB_META[..])
}

/// Lexical path normalization over `/`-separated segments.
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(last) if *last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Leading segments of a pattern that contain no glob metacharacters.
fn static_prefix(pattern: &str) -> String {
    let segments: Vec<&str> = pattern
        .split('/')
        .take_while(|segment| !is_glob(segment))
        .collect();
    // In a fully literal pattern the last segment names a file.
    let dirs = if segments.len() == pattern.split('/').count() {
        &segments[..segments.len().saturating_sub(1)]
    } else {
        &segments[..]
    };
    let prefix = dirs.join("/");
    if pattern.starts_with('/') && prefix.is_empty() {
        "/".to_string()
    } else {
        prefix
    }
}
