//! Configuration file handling

use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::args::OutputFormat;

/// Configuration for sqlscout
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// JSON schema file path
    #[serde(default)]
    pub schema: Option<String>,

    /// Query file patterns to check
    #[serde(default)]
    pub files: Vec<String>,

    /// Output format (human, json, sarif)
    #[serde(default)]
    pub format: Option<String>,

    /// Diagnostic codes to ignore (e.g., ["W0006"])
    #[serde(default)]
    pub disable: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        let config: Config = toml::from_str(&contents).into_diagnostic()?;
        Ok(config)
    }

    /// Try to find and load sqlscout.toml in current directory or parent directories
    pub fn find_and_load() -> Result<Option<Self>> {
        let mut current_dir = std::env::current_dir().into_diagnostic()?;

        loop {
            let config_path = current_dir.join("sqlscout.toml");
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "using config file");
                return Ok(Some(Self::from_file(&config_path)?));
            }

            // Try parent directory
            if !current_dir.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Merge CLI arguments into configuration
    /// CLI arguments take precedence over config file values
    pub fn merge_with_args(
        mut self,
        schema: &Option<PathBuf>,
        files: &[PathBuf],
        format: &Option<OutputFormat>,
        disable: &[String],
    ) -> Self {
        if let Some(schema) = schema {
            self.schema = Some(schema.display().to_string());
        }

        if !files.is_empty() {
            self.files = files.iter().map(|p| p.display().to_string()).collect();
        }

        if let Some(fmt) = format {
            self.format = Some(format!("{:?}", fmt).to_lowercase());
        }

        if !disable.is_empty() {
            self.disable = disable.to_vec();
        }

        self
    }

    /// Resolved output format; unknown names fall back to human output
    pub fn output_format(&self) -> OutputFormat {
        match self.format.as_deref() {
            Some("json") => OutputFormat::Json,
            Some("sarif") => OutputFormat::Sarif,
            _ => OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: Config = toml::from_str(
            r#"
            schema = "schema.json"
            files = ["queries/**/*.sql"]
            format = "json"
            disable = ["W0006"]
            "#,
        )
        .unwrap();

        assert_eq!(config.schema.as_deref(), Some("schema.json"));
        assert_eq!(config.files, vec!["queries/**/*.sql"]);
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.disable, vec!["W0006"]);
    }

    #[test]
    fn test_cli_args_take_precedence() {
        let config = Config {
            schema: Some("from_config.json".to_string()),
            files: vec!["a.sql".to_string()],
            format: Some("json".to_string()),
            disable: vec![],
        };

        let merged = config.merge_with_args(
            &Some(PathBuf::from("cli.json")),
            &[],
            &Some(OutputFormat::Sarif),
            &["W0004".to_string()],
        );

        assert_eq!(merged.schema.as_deref(), Some("cli.json"));
        assert_eq!(merged.files, vec!["a.sql"]);
        assert_eq!(merged.output_format(), OutputFormat::Sarif);
        assert_eq!(merged.disable, vec!["W0004"]);
    }
}
