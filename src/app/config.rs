use crate::app::models::{Configuration, OutputConfig, Target, Template, Toggle};
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = ".airul.json";

/// Per-target toggles supplied for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOverrides {
    pub windsurf: Toggle,
    pub cursor: Toggle,
    pub copilot: Toggle,
    pub cline: Toggle,
    pub claude: Toggle,
    pub custom_path: Option<String>,
}

impl OutputOverrides {
    pub fn toggle(&self, target: Target) -> Toggle {
        match target {
            Target::Windsurf => self.windsurf,
            Target::Cursor => self.cursor,
            Target::Copilot => self.copilot,
            Target::Cline => self.cline,
            Target::Claude => self.claude,
            Target::Custom => Toggle::Unset,
        }
    }
}

/// Invocation-level settings layered over the persisted configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub sources: Option<Vec<String>>,
    pub output: OutputOverrides,
    pub template: Template,
}

/// Loads the persisted configuration. `Ok(None)` means the default config file
/// does not exist; an explicit path that is missing is an error.
pub fn load_config(base_dir: &Path, explicit: Option<&Path>) -> Result<Option<Configuration>> {
    let path = match explicit {
        Some(path) => base_dir.join(path),
        None => base_dir.join(CONFIG_FILE_NAME),
    };

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound && explicit.is_none() => {
            log::debug!("No configuration at {}", path.display());
            return Ok(None);
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read config at {:?}", path));
        }
    };

    let config: Configuration = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(config))
}

/// Picks the persisted record, or the built-in defaults when there is none,
/// and layers the overrides on top.
pub fn resolve_config(persisted: Option<Configuration>, overrides: &ConfigOverrides) -> Configuration {
    let base = persisted.unwrap_or_default();
    merge(&base, overrides)
}

/// Field-by-field merge. Sources are replaced wholesale, output flags and
/// template fields only where the override sets them.
pub fn merge(persisted: &Configuration, overrides: &ConfigOverrides) -> Configuration {
    Configuration {
        sources: merge_sources(&persisted.sources, overrides.sources.as_deref()),
        output: merge_output(&persisted.output, &overrides.output),
        template: merge_template(&persisted.template, &overrides.template),
    }
}

fn merge_sources(persisted: &[String], overrides: Option<&[String]>) -> Vec<String> {
    match overrides {
        Some(sources) if !sources.is_empty() => sources.to_vec(),
        _ => persisted.to_vec(),
    }
}

fn merge_output(persisted: &OutputConfig, overrides: &OutputOverrides) -> OutputConfig {
    let mut output = persisted.clone();
    for target in Target::ALL {
        output.set(target, overrides.toggle(target).resolve(persisted.is_enabled(target)));
    }
    if let Some(path) = &overrides.custom_path {
        output.custom_path = Some(path.clone());
    }
    output
}

fn merge_template(persisted: &Template, overrides: &Template) -> Template {
    Template {
        file_header: set_field(&overrides.file_header).or_else(|| persisted.file_header.clone()),
        separator: set_field(&overrides.separator).or_else(|| persisted.separator.clone()),
    }
}

/// An empty override counts as unset.
fn set_field(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.is_empty())
}
