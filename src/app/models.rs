use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A tool-specific destination for the assembled context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    Windsurf,
    Cursor,
    Copilot,
    Cline,
    Claude,
    Custom,
}

impl Target {
    pub const ALL: [Target; 6] = [
        Target::Windsurf,
        Target::Cursor,
        Target::Copilot,
        Target::Cline,
        Target::Claude,
        Target::Custom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Target::Windsurf => "windsurf",
            Target::Cursor => "cursor",
            Target::Copilot => "copilot",
            Target::Cline => "cline",
            Target::Claude => "claude",
            Target::Custom => "custom",
        }
    }

    /// Destination relative to the base directory. The custom target has none;
    /// its path comes from the configuration.
    pub fn fixed_path(self) -> Option<&'static str> {
        match self {
            Target::Windsurf => Some(".windsurf/rules/context.md"),
            Target::Cursor => Some(".cursorrules"),
            Target::Copilot => Some(".github/copilot-instructions.md"),
            Target::Cline => Some(".clinerules"),
            Target::Claude => Some("CLAUDE.md"),
            Target::Custom => None,
        }
    }

    /// Older sibling path this target supersedes.
    pub fn legacy_path(self) -> Option<&'static str> {
        match self {
            Target::Windsurf => Some(".windsurfrules"),
            _ => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A per-invocation flag that may be left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Toggle {
    #[default]
    Unset,
    Enabled,
    Disabled,
}

impl Toggle {
    /// Builds a toggle from a `--flag` / `--no-flag` pair.
    pub fn from_flags(enable: bool, disable: bool) -> Self {
        match (enable, disable) {
            (true, _) => Toggle::Enabled,
            (false, true) => Toggle::Disabled,
            (false, false) => Toggle::Unset,
        }
    }

    pub fn resolve(self, fallback: bool) -> bool {
        match self {
            Toggle::Unset => fallback,
            Toggle::Enabled => true,
            Toggle::Disabled => false,
        }
    }
}

/// Why a source pattern or file did not make it into the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Exclusion {
    FileNotFound,
    NoMatches,
    InvalidPattern(String),
    Unreadable(String),
    Empty,
}

impl Exclusion {
    /// Errors are faults in the input; everything else is a plain skip.
    pub fn is_error(&self) -> bool {
        matches!(self, Exclusion::InvalidPattern(_) | Exclusion::Unreadable(_))
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::FileNotFound => f.write_str("file not found"),
            Exclusion::NoMatches => f.write_str("no matching files"),
            Exclusion::InvalidPattern(reason) => write!(f, "invalid glob pattern: {}", reason),
            Exclusion::Unreadable(reason) => write!(f, "could not read file: {}", reason),
            Exclusion::Empty => f.write_str("file is empty"),
        }
    }
}

impl From<Exclusion> for String {
    fn from(exclusion: Exclusion) -> Self {
        exclusion.to_string()
    }
}

/// Inclusion state of one source pattern or resolved file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub included: bool,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub exclusion: Option<Exclusion>,
}

impl FileStatus {
    pub fn included() -> Self {
        Self {
            included: true,
            exclusion: None,
        }
    }

    pub fn excluded(exclusion: Exclusion) -> Self {
        Self {
            included: false,
            exclusion: Some(exclusion),
        }
    }

    pub fn error(&self) -> Option<String> {
        self.exclusion.as_ref().map(ToString::to_string)
    }
}

/// An existing file produced by expanding the source patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Normalized path, relative to the base directory unless the pattern was absolute.
    pub path: String,
    /// Index of the first source pattern that matched this file.
    pub source: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub file_header: Option<String>,
    pub separator: Option<String>,
}

impl Template {
    pub const DEFAULT_FILE_HEADER: &'static str = "# From {fileName}:";
    pub const DEFAULT_SEPARATOR: &'static str = "\n---\n";

    pub fn header_for(&self, path: &str) -> String {
        non_empty(&self.file_header)
            .unwrap_or(Self::DEFAULT_FILE_HEADER)
            .replace("{fileName}", path)
    }

    pub fn separator(&self) -> &str {
        non_empty(&self.separator).unwrap_or(Self::DEFAULT_SEPARATOR)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Reads an explicit JSON `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Persisted per-target flags. Absent flags are disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub windsurf: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub cursor: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub copilot: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub cline: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub claude: bool,
    pub custom_path: Option<String>,
}

impl OutputConfig {
    pub fn is_enabled(&self, target: Target) -> bool {
        match target {
            Target::Windsurf => self.windsurf,
            Target::Cursor => self.cursor,
            Target::Copilot => self.copilot,
            Target::Cline => self.cline,
            Target::Claude => self.claude,
            Target::Custom => non_empty(&self.custom_path).is_some(),
        }
    }

    /// Sets a fixed-path target flag. The custom target is driven by `custom_path`.
    pub fn set(&mut self, target: Target, enabled: bool) {
        match target {
            Target::Windsurf => self.windsurf = enabled,
            Target::Cursor => self.cursor = enabled,
            Target::Copilot => self.copilot = enabled,
            Target::Cline => self.cline = enabled,
            Target::Claude => self.claude = enabled,
            Target::Custom => {}
        }
    }

    /// Enabled targets paired with their destination relative to the base directory.
    pub fn destinations(&self) -> Vec<(Target, String)> {
        Target::ALL
            .into_iter()
            .filter(|target| self.is_enabled(*target))
            .filter_map(|target| match target.fixed_path() {
                Some(path) => Some((target, path.to_string())),
                None => self.custom_path.clone().map(|path| (target, path)),
            })
            .collect()
    }
}

/// The effective configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub sources: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub output: OutputConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub template: Template,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            sources: vec!["README.md".to_string(), "docs/**/*.md".to_string()],
            output: OutputConfig {
                cursor: true,
                ..OutputConfig::default()
            },
            template: Template::default(),
        }
    }
}

/// The concatenated context written to every enabled target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument {
    content: String,
    block_count: usize,
}

impl AssembledDocument {
    pub(crate) fn new(content: String, block_count: usize) -> Self {
        Self {
            content,
            block_count,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }
}
