use crate::app::models::{AssembledDocument, Exclusion, FileStatus, ResolvedFile, Template};
use crate::app::report::StatusReport;
use std::fs;
use std::path::Path;

/// Result of reading and formatting the resolved files.
#[derive(Debug)]
pub struct Assembly {
    /// `None` when no file produced a non-empty block.
    pub document: Option<AssembledDocument>,
    pub statuses: StatusReport,
}

pub struct ContextFormatter;

impl ContextFormatter {
    pub fn assemble(files: &[ResolvedFile], base_dir: &Path, template: &Template) -> Assembly {
        let mut statuses = StatusReport::default();
        let mut blocks = Vec::new();

        for file in files {
            match Self::read_block(file, base_dir, template) {
                Ok(block) => {
                    statuses.record(&file.path, FileStatus::included());
                    blocks.push(block);
                }
                Err(exclusion) => {
                    log::warn!("Skipping {}: {}", file.path, exclusion);
                    statuses.record(&file.path, FileStatus::excluded(exclusion));
                }
            }
        }

        if blocks.is_empty() {
            return Assembly {
                document: None,
                statuses,
            };
        }

        let joiner = format!("{}\n", template.separator());
        let content = format!("{}\n\n{}", Self::intro(blocks.len()), blocks.join(&joiner));
        Assembly {
            document: Some(AssembledDocument::new(content, blocks.len())),
            statuses,
        }
    }

    fn read_block(
        file: &ResolvedFile,
        base_dir: &Path,
        template: &Template,
    ) -> Result<String, Exclusion> {
        let content = fs::read_to_string(base_dir.join(&file.path))
            .map_err(|e| Exclusion::Unreadable(e.to_string()))?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(Exclusion::Empty);
        }
        Ok(format!("{}\n\n{}", template.header_for(&file.path), trimmed))
    }

    pub fn intro(sources: usize) -> String {
        format!(
            "This is a context for AI editor/agent about the project. \
             It's generated with a tool Airul (https://github.com/mitkury/airul) out of {} sources. \
             Feel free to edit .airul.json to change the sources and configure editors. \
             Run `airul` to update the context after making changes to .airul.json or the sources.",
            sources
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn resolved(paths: &[&str]) -> Vec<ResolvedFile> {
        paths
            .iter()
            .enumerate()
            .map(|(source, path)| ResolvedFile {
                path: path.to_string(),
                source,
            })
            .collect()
    }

    #[test]
    fn wraps_trimmed_content_in_headers() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "\n\n# A\nalpha\n  \n").unwrap();
        fs::write(dir.path().join("b.md"), "beta").unwrap();

        let assembly = ContextFormatter::assemble(
            &resolved(&["a.md", "b.md"]),
            dir.path(),
            &Template::default(),
        );
        let document = assembly.document.unwrap();

        let expected = format!(
            "{}\n\n# From a.md:\n\n# A\nalpha\n---\n\n# From b.md:\n\nbeta",
            ContextFormatter::intro(2)
        );
        assert_eq!(document.content(), expected);
        assert_eq!(document.block_count(), 2);
        assert_eq!(assembly.statuses.get("a.md"), Some(&FileStatus::included()));
    }

    #[test]
    fn custom_template_is_applied() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "alpha").unwrap();
        fs::write(dir.path().join("b.md"), "beta").unwrap();
        let template = Template {
            file_header: Some("<<{fileName}>>".to_string()),
            separator: Some("\n***".to_string()),
        };

        let assembly =
            ContextFormatter::assemble(&resolved(&["a.md", "b.md"]), dir.path(), &template);
        let content = assembly.document.unwrap().content().to_string();
        assert!(content.ends_with("<<a.md>>\n\nalpha\n***\n<<b.md>>\n\nbeta"));
    }

    #[test]
    fn empty_and_unreadable_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("empty.md"), " \n\t\n").unwrap();
        fs::write(dir.path().join("real.md"), "content").unwrap();
        fs::write(dir.path().join("binary.md"), [0xffu8, 0xfe, 0x00]).unwrap();

        let assembly = ContextFormatter::assemble(
            &resolved(&["empty.md", "gone.md", "binary.md", "real.md"]),
            dir.path(),
            &Template::default(),
        );

        assert_eq!(
            assembly.statuses.get("empty.md"),
            Some(&FileStatus::excluded(Exclusion::Empty))
        );
        let gone = assembly.statuses.get("gone.md").unwrap();
        assert!(!gone.included);
        assert!(gone.error().unwrap().starts_with("could not read file: "));
        assert!(!assembly.statuses.get("binary.md").unwrap().included);

        let document = assembly.document.unwrap();
        assert_eq!(document.block_count(), 1);
        assert!(document.content().contains("out of 1 sources"));
        assert!(!document.content().contains("empty.md"));
    }

    #[test]
    fn no_document_without_content() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("empty.md"), "").unwrap();

        let assembly =
            ContextFormatter::assemble(&resolved(&["empty.md"]), dir.path(), &Template::default());
        assert!(assembly.document.is_none());
        assert_eq!(assembly.statuses.len(), 1);
    }
}
