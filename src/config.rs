//! Configuration for CLI sessions

use std::path::PathBuf;

/// Output format for query results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for one CLI invocation
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// CSV file the session operates on
    pub input: PathBuf,
    /// How query results are rendered
    pub output_format: OutputFormat,
    /// Where mutating commands write the resulting table; stdout if unset
    pub write_to: Option<PathBuf>,
}

impl Config {
    /// Create a new Config for an input file
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }

    /// Set the output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the write-back target for mutating commands
    pub fn with_write_to(mut self, path: Option<PathBuf>) -> Self {
        self.write_to = path;
        self
    }
}
