use crate::app::models::{FileStatus, ResolvedFile};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// How an entry ended up after the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Included,
    Excluded,
    Error,
}

/// Statuses keyed by source pattern or resolved path, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    entries: Vec<(String, FileStatus)>,
}

impl StatusReport {
    /// Records a status. An existing key is updated in place and keeps its position.
    pub fn record(&mut self, key: &str, status: FileStatus) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = status,
            None => self.entries.push((key.to_string(), status)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FileStatus> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, status)| status)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileStatus)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn classify(&self, key: &str) -> Option<Classification> {
        self.get(key).map(classify)
    }

    /// Interleaves pattern and file statuses in source-list order: each pattern
    /// is followed by the files it contributed first. When a pattern and a file
    /// share a key, the file status wins regardless of order.
    pub fn collate(
        sources: &[String],
        patterns: &StatusReport,
        files: &[ResolvedFile],
        file_statuses: &StatusReport,
    ) -> Self {
        let mut report = StatusReport::default();
        for (index, pattern) in sources.iter().enumerate() {
            match (file_statuses.get(pattern), patterns.get(pattern)) {
                (Some(_), _) if report.get(pattern).is_some() => {}
                (Some(status), _) | (None, Some(status)) => {
                    report.record(pattern, status.clone())
                }
                (None, None) => {}
            }
            for file in files.iter().filter(|f| f.source == index) {
                if let Some(status) = file_statuses.get(&file.path) {
                    report.record(&file.path, status.clone());
                }
            }
        }
        report
    }

    /// Human-readable listing with one mark per entry.
    pub fn render(&self) -> String {
        let mut out = String::from("Files for AI context:\n");
        for (key, status) in self.iter() {
            match (classify(status), status.error()) {
                (Classification::Included, _) => out.push_str(&format!("  ✓ {}\n", key)),
                (_, Some(reason)) => out.push_str(&format!("  ✗ {} ({})\n", key, reason)),
                (_, None) => out.push_str(&format!("  ✗ {}\n", key)),
            }
        }
        let count = |class: Classification| {
            self.iter()
                .filter(|(_, status)| classify(status) == class)
                .count()
        };
        out.push_str(&format!(
            "{} included, {} excluded, {} errors\n",
            count(Classification::Included),
            count(Classification::Excluded),
            count(Classification::Error)
        ));
        out
    }
}

pub fn classify(status: &FileStatus) -> Classification {
    match &status.exclusion {
        _ if status.included => Classification::Included,
        Some(exclusion) if exclusion.is_error() => Classification::Error,
        _ => Classification::Excluded,
    }
}

impl Serialize for StatusReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, status) in &self.entries {
            map.serialize_entry(key, status)?;
        }
        map.end()
    }
}
