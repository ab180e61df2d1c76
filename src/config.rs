//! Run options and TOML configuration loading.
//!
//! Options come from an explicit configuration file, or `erbuilder.toml` in
//! the working directory, or the built-in defaults. Command-line flags are
//! applied on top by the CLI.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::ast::{Table, tables_from_json};
use crate::builder::BuildOptions;
use crate::naming::{CasePolicy, allowed_case_names};

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "erbuilder.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Need to provide at least one of 'directory' or 'file_list'")]
    NoInput,

    #[error("The provided value for column name case is not valid. Allowed values : {}", allowed_values())]
    InvalidColumnCase,

    #[error("The provided value for table name case is not valid. Allowed values : {}", allowed_values())]
    InvalidTableCase,

    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to read configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn allowed_values() -> String {
    format!("[{}]", allowed_case_names().join(" "))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Options {
    pub directory: Option<PathBuf>,
    pub file_list: Vec<PathBuf>,
    pub id_field: String,
    pub output_filename: String,
    pub output_path: PathBuf,
    pub tag: String,
    pub title: String,
    pub column_name_case: String,
    pub table_name_case: String,
    pub table_in_plural: bool,
    pub common_fields: Vec<String>,
    /// JSON array of tables merged into the diagram as given.
    pub extra_tables_definition: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            directory: None,
            file_list: Vec::new(),
            id_field: "id".to_string(),
            output_filename: "er-diagram".to_string(),
            output_path: PathBuf::from("."),
            tag: "db".to_string(),
            title: "Database Schema".to_string(),
            column_name_case: CasePolicy::Snake.as_str().to_string(),
            table_name_case: CasePolicy::Snake.as_str().to_string(),
            table_in_plural: false,
            common_fields: Vec::new(),
            extra_tables_definition: None,
        }
    }
}

impl Options {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.directory.is_none() && self.file_list.is_empty() {
            return Err(ConfigError::NoInput);
        }
        if CasePolicy::from_str(&self.column_name_case).is_none() {
            return Err(ConfigError::InvalidColumnCase);
        }
        if CasePolicy::from_str(&self.table_name_case).is_none() {
            return Err(ConfigError::InvalidTableCase);
        }
        Ok(())
    }

    /// Core options; unknown case names fall back to snake_case.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            tag: self.tag.clone(),
            id_field: self.id_field.clone(),
            table_case: CasePolicy::from_str_lenient(&self.table_name_case),
            column_case: CasePolicy::from_str_lenient(&self.column_name_case),
            pluralize: self.table_in_plural,
            common_fields: self.common_fields.clone(),
        }
    }

    pub fn extra_tables(&self) -> Result<Vec<Table>, serde_json::Error> {
        match self.extra_tables_definition.as_deref() {
            Some(definition) if !definition.trim().is_empty() => tables_from_json(definition),
            _ => Ok(Vec::new()),
        }
    }
}

/// Find and load options.
///
/// Search order: the explicit path (which must exist), then [`LOCAL_CONFIG`]
/// in the working directory, then defaults.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<Options, ConfigError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    debug!("No configuration file found, using default configuration");
    Ok(Options::default())
}

fn load_config_file(path: &Path) -> Result<Options, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_directory() -> Options {
        Options {
            directory: Some(PathBuf::from("models")),
            ..Options::default()
        }
    }

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.tag, "db");
        assert_eq!(options.id_field, "id");
        assert_eq!(options.output_filename, "er-diagram");
        assert_eq!(options.output_path, PathBuf::from("."));
        assert_eq!(options.title, "Database Schema");
        assert_eq!(options.build_options(), BuildOptions::default());
    }

    #[test]
    fn test_validate_requires_input() {
        let err = Options::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Need to provide at least one of 'directory' or 'file_list'"
        );

        let options = Options {
            file_list: vec![PathBuf::from("user.go")],
            ..Options::default()
        };
        assert!(options.validate().is_ok());
        assert!(with_directory().validate().is_ok());
    }

    #[test]
    fn test_validate_case_names() {
        let options = Options {
            column_name_case: "invalid-case".to_string(),
            ..with_directory()
        };
        assert_eq!(
            options.validate().unwrap_err().to_string(),
            "The provided value for column name case is not valid. Allowed values : [snake_case camelCase screaming_snake_case kebab_case]"
        );

        let options = Options {
            table_name_case: "PascalCase".to_string(),
            ..with_directory()
        };
        assert!(matches!(options.validate(), Err(ConfigError::InvalidTableCase)));
    }

    #[test]
    fn test_build_options_lenient_case() {
        let options = Options {
            column_name_case: "invalid-case".to_string(),
            table_name_case: "camelCase".to_string(),
            table_in_plural: true,
            ..Options::default()
        };
        let build = options.build_options();
        assert_eq!(build.column_case, CasePolicy::Snake);
        assert_eq!(build.table_case, CasePolicy::Camel);
        assert!(build.pluralize);
    }

    #[test]
    fn test_extra_tables() {
        assert!(Options::default().extra_tables().unwrap().is_empty());

        let options = Options {
            extra_tables_definition: Some(r#"[{"name":"schema_migrations"}]"#.to_string()),
            ..Options::default()
        };
        assert_eq!(options.extra_tables().unwrap(), vec![Table::new("schema_migrations")]);

        let options = Options {
            extra_tables_definition: Some("[{".to_string()),
            ..Options::default()
        };
        assert!(options.extra_tables().is_err());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("erbuilder.toml");
        fs::write(
            &path,
            r#"
directory = "models"
title = "example_db"
table_in_plural = true
common_fields = ["created_at", "updated_at"]
"#,
        )
        .unwrap();

        let options = load_config(Some(&path)).unwrap();
        assert_eq!(options.directory, Some(PathBuf::from("models")));
        assert_eq!(options.title, "example_db");
        assert!(options.table_in_plural);
        assert_eq!(options.common_fields, vec!["created_at", "updated_at"]);
        assert_eq!(options.tag, "db");
    }

    #[test]
    fn test_load_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            load_config(Some(&missing)),
            Err(ConfigError::MissingFile(_))
        ));

        let invalid = dir.path().join("invalid.toml");
        fs::write(&invalid, "title = [").unwrap();
        assert!(matches!(load_config(Some(&invalid)), Err(ConfigError::Parse(_))));
    }
}
