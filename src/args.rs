//! Command-line argument definitions.
//!
//! Every `generate` flag is optional so that values from the configuration
//! file are only overridden when given on the command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Options;

/// Generate .er entity-relationship diagrams from tagged Go structs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the .er file from the given Go sources
    #[command(visible_alias = "g")]
    Generate(GenerateArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct GenerateArgs {
    /// Directory to retrieve the files from
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// File to parse (repeatable)
    #[arg(short = 'l', long = "file-list")]
    pub file_list: Vec<PathBuf>,

    /// Id field to be used for all the tables
    #[arg(long)]
    pub id_field: Option<String>,

    /// Name of the generated file, without extension
    #[arg(long)]
    pub output_filename: Option<String>,

    /// Directory where the .er file is stored
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Tag key to consume from the struct fields
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Title of the diagram
    #[arg(long)]
    pub title: Option<String>,

    /// Case of the column names (snake_case, camelCase, screaming_snake_case, kebab_case)
    #[arg(long)]
    pub column_name_case: Option<String>,

    /// Case of the table names (snake_case, camelCase, screaming_snake_case, kebab_case)
    #[arg(long)]
    pub table_name_case: Option<String>,

    /// Use the plural form of the struct names for tables
    #[arg(long)]
    pub table_in_plural: bool,

    /// Column added to every table (repeatable)
    #[arg(short = 'c', long = "common-field")]
    pub common_fields: Vec<String>,

    /// JSON array of extra table definitions
    #[arg(long)]
    pub extra_tables_definition: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl GenerateArgs {
    /// Override `options` with the flags given on the command line.
    pub fn apply(&self, options: &mut Options) {
        if let Some(directory) = &self.directory {
            options.directory = Some(directory.clone());
        }
        if !self.file_list.is_empty() {
            options.file_list = self.file_list.clone();
        }
        if let Some(id_field) = &self.id_field {
            options.id_field = id_field.clone();
        }
        if let Some(output_filename) = &self.output_filename {
            options.output_filename = output_filename.clone();
        }
        if let Some(output_path) = &self.output_path {
            options.output_path = output_path.clone();
        }
        if let Some(tag) = &self.tag {
            options.tag = tag.clone();
        }
        if let Some(title) = &self.title {
            options.title = title.clone();
        }
        if let Some(case) = &self.column_name_case {
            options.column_name_case = case.clone();
        }
        if let Some(case) = &self.table_name_case {
            options.table_name_case = case.clone();
        }
        if self.table_in_plural {
            options.table_in_plural = true;
        }
        if !self.common_fields.is_empty() {
            options.common_fields = self.common_fields.clone();
        }
        if let Some(definition) = &self.extra_tables_definition {
            options.extra_tables_definition = Some(definition.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let args = Args::parse_from([
            "erbuilder",
            "g",
            "-d",
            "models",
            "-c",
            "created_at",
            "-c",
            "updated_at",
            "--table-in-plural",
            "--log-level",
            "debug",
        ]);

        assert_eq!(args.log_level, "debug");
        let Command::Generate(generate) = args.command;
        assert_eq!(generate.directory, Some(PathBuf::from("models")));
        assert_eq!(generate.common_fields, vec!["created_at", "updated_at"]);
        assert!(generate.table_in_plural);
        assert!(generate.config.is_none());
    }

    #[test]
    fn test_apply_overrides_only_given_flags() {
        let mut options = Options {
            title: "from_file".to_string(),
            tag: "gorm".to_string(),
            ..Options::default()
        };
        let generate = GenerateArgs {
            file_list: vec![PathBuf::from("user.go")],
            title: Some("example_db".to_string()),
            ..GenerateArgs::default()
        };
        generate.apply(&mut options);

        assert_eq!(options.title, "example_db");
        assert_eq!(options.tag, "gorm");
        assert_eq!(options.file_list, vec![PathBuf::from("user.go")]);
        assert!(!options.table_in_plural);
    }
}
