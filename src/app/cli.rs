use crate::app::config::{ConfigOverrides, OutputOverrides};
use crate::app::models::{Template, Toggle};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate AI rule files from your project documentation"
)]
pub struct Cli {
    /// Project directory holding the sources and receiving the rule files
    #[arg(long, short = 'C')]
    pub base_dir: Option<PathBuf>,

    /// Configuration file, relative to the base directory (default: .airul.json)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Source files or glob patterns, replacing the configured sources
    #[arg(long, short = 'f', num_args = 1..)]
    pub files: Option<Vec<String>>,

    /// Write .windsurf/rules/context.md
    #[arg(long, overrides_with = "no_windsurf")]
    pub windsurf: bool,
    #[arg(long, overrides_with = "windsurf")]
    pub no_windsurf: bool,

    /// Write .cursorrules
    #[arg(long, overrides_with = "no_cursor")]
    pub cursor: bool,
    #[arg(long, overrides_with = "cursor")]
    pub no_cursor: bool,

    /// Write .github/copilot-instructions.md
    #[arg(long, visible_alias = "code", overrides_with = "no_copilot")]
    pub copilot: bool,
    #[arg(long, overrides_with = "copilot")]
    pub no_copilot: bool,

    /// Write .clinerules
    #[arg(long, overrides_with = "no_cline")]
    pub cline: bool,
    #[arg(long, overrides_with = "cline")]
    pub no_cline: bool,

    /// Write CLAUDE.md
    #[arg(long, overrides_with = "no_claude")]
    pub claude: bool,
    #[arg(long, overrides_with = "claude")]
    pub no_claude: bool,

    /// Additional output file, relative to the base directory
    #[arg(long)]
    pub custom_output: Option<String>,

    /// Header placed above each file; `{fileName}` is replaced with its path
    #[arg(long)]
    pub file_header: Option<String>,

    /// Text placed between file blocks
    #[arg(long)]
    pub separator: Option<String>,

    /// Print the run result as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            sources: self.files.clone(),
            output: OutputOverrides {
                windsurf: Toggle::from_flags(self.windsurf, self.no_windsurf),
                cursor: Toggle::from_flags(self.cursor, self.no_cursor),
                copilot: Toggle::from_flags(self.copilot, self.no_copilot),
                cline: Toggle::from_flags(self.cline, self.no_cline),
                claude: Toggle::from_flags(self.claude, self.no_claude),
                custom_path: self.custom_output.clone(),
            },
            template: Template {
                file_header: self.file_header.clone(),
                separator: self.separator.clone(),
            },
        }
    }
}
