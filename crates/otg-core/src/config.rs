use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Generation options, loaded from `.otg.yaml` and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Spec path or URL used when none is given on the command line.
    pub input: Option<String>,
    /// Output file (single mode) or directory (split mode).
    pub output: Option<PathBuf>,
    pub split: Option<SplitStrategy>,
    pub property_naming: PropertyNaming,
    pub indent: IndentStyle,
    pub include_header: bool,
    /// Replaces the default header block verbatim.
    pub header_comment: Option<String>,
    /// Shown as `Source file:` in the default header. Defaults to the input path or URL.
    pub source_label: Option<String>,
    pub include_endpoint_hints: bool,
    pub log_level: LogLevel,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            split: None,
            property_naming: PropertyNaming::Preserve,
            indent: IndentStyle::default(),
            include_header: true,
            header_comment: None,
            source_label: None,
            include_endpoint_hints: true,
            log_level: LogLevel::Basic,
        }
    }
}

impl GenerateOptions {
    /// Checked before any document is read or fetched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.split.is_some() && self.output.is_none() {
            return Err(ConfigError::SplitWithoutOutput);
        }
        Ok(())
    }
}

/// How types are grouped into files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// By the operation's single tag.
    Tag,
    /// By the first meaningful path segment.
    Path,
}

/// How property keys are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyNaming {
    #[default]
    Preserve,
    Camel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentStyle {
    Tab,
    Spaces(usize),
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(4)
    }
}

impl IndentStyle {
    /// One level of indentation.
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Tab => "\t".to_string(),
            IndentStyle::Spaces(n) => " ".repeat(*n),
        }
    }
}

/// Diagnostic detail: `basic` summarizes, `verbose` itemizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    #[default]
    Basic,
    Verbose,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".otg.yaml";

/// Load options from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<GenerateOptions>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let options = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(options))
}

/// Content written by `otg init`.
pub fn default_config_content() -> &'static str {
    r#"# otg configuration
input: openapi.yaml
# output: src/types.ts      # file, or directory when split is set
# split: tag                # tag | path
property_naming: preserve   # preserve | camel
indent:
  spaces: 4                 # or: indent: tab
include_header: true
# header_comment: "// Generated types"
include_endpoint_hints: true
log_level: basic            # basic | verbose
"#
}
