//! Turns extracted structs into diagram tables.

use log::{debug, warn};
use regex::Regex;
use thiserror::Error;

use crate::ast::{Column, Table};
use crate::extract::{RawField, RawStruct};
use crate::naming::{CasePolicy, Naming};

/// Type label of a synthesized primary key.
pub const PRIMARY_KEY_TYPE: &str = "integer";

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid tag key {tag:?}: {source}")]
    TagPattern {
        tag: String,
        #[source]
        source: regex::Error,
    },
}

/// Options consumed by [`TableBuilder`] and the reference resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub tag: String,
    pub id_field: String,
    pub table_case: CasePolicy,
    pub column_case: CasePolicy,
    pub pluralize: bool,
    pub common_fields: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            tag: "db".to_string(),
            id_field: "id".to_string(),
            table_case: CasePolicy::Snake,
            column_case: CasePolicy::Snake,
            pluralize: false,
            common_fields: Vec::new(),
        }
    }
}

/// Matcher for `<key>:"<value>"` inside a raw struct tag.
#[derive(Debug, Clone)]
pub struct TagPattern {
    regex: Regex,
}

impl TagPattern {
    pub fn new(tag: &str) -> Result<Self, regex::Error> {
        let pattern = format!(r#"(?:^|\s){}:"([^"]*)""#, regex::escape(tag));
        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    /// Value for the key, if present and non-empty.
    pub fn value<'t>(&self, raw: &'t str) -> Option<&'t str> {
        self.regex
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|value| !value.is_empty())
    }
}

pub struct TableBuilder<'a, N: Naming> {
    naming: N,
    options: &'a BuildOptions,
    pattern: TagPattern,
}

impl<'a, N: Naming> TableBuilder<'a, N> {
    pub fn new(naming: N, options: &'a BuildOptions) -> Result<Self, BuildError> {
        let pattern = TagPattern::new(&options.tag).map_err(|source| BuildError::TagPattern {
            tag: options.tag.clone(),
            source,
        })?;
        Ok(Self {
            naming,
            options,
            pattern,
        })
    }

    pub fn build_all(&self, structs: &[RawStruct]) -> Vec<Table> {
        structs.iter().filter_map(|s| self.build(s)).collect()
    }

    /// Build one table, or `None` when no field carries the tag key.
    pub fn build(&self, raw: &RawStruct) -> Option<Table> {
        let mut columns: Vec<Column> = raw
            .fields
            .iter()
            .filter_map(|field| self.column(field))
            .collect();

        if columns.is_empty() {
            warn!(name = raw.name.as_str(), tag = self.options.tag.as_str(); "Skipping struct without tagged fields");
            return None;
        }

        if !columns.iter().any(|c| c.is_primary_key) && !self.options.id_field.is_empty() {
            columns.push(Column::primary(
                self.column_name(&self.options.id_field),
                PRIMARY_KEY_TYPE,
            ));
        }

        for field in &self.options.common_fields {
            columns.push(Column::extra(self.column_name(field)));
        }

        let name = self.naming.convert_case(
            &self.naming.count_form(self.options.pluralize, &raw.name),
            self.options.table_case,
        );
        debug!(table = name.as_str(), columns = columns.len(); "Built table");

        Some(Table {
            name,
            columns,
            color: None,
        })
    }

    fn column(&self, field: &RawField) -> Option<Column> {
        let value = self.pattern.value(&field.tag)?;
        let mut column = Column::new(
            self.column_name(value),
            self.naming.column_type(&field.source_type),
        );
        column.is_primary_key = value == self.options.id_field;
        Some(column)
    }

    fn column_name(&self, value: &str) -> String {
        self.naming.convert_case(value, self.options.column_case)
    }
}
