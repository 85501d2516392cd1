use std::path::{Path, PathBuf};

use crate::cli::{Cli, ParseMode};
use crate::error::{IncludeError, Result};

/// Settings for a single run, built once from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub name: Option<String>,
    pub mode: ParseMode,
    pub trim: bool,
    pub package: Option<String>,
    pub banner: bool,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let config = Self {
            input: cli.file.unwrap_or_default(),
            output: cli.out,
            name: cli.name,
            mode: cli.parse,
            trim: cli.trim,
            package: cli.package,
            banner: !cli.no_banner,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(IncludeError::Usage("--file is required".to_string()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(IncludeError::Usage("--out cannot be empty".to_string()));
        }
        if matches!(self.package.as_deref(), Some(p) if p.trim().is_empty()) {
            return Err(IncludeError::Usage("--package cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Name of the single raw-mode constant: the override when given,
    /// otherwise the input file name with its extension stripped.
    pub fn constant_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// Input file name as shown in the generated banner.
    pub fn source_name(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }

    /// Directory whose Go files decide the generated package.
    pub fn output_dir(&self) -> &Path {
        match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}
