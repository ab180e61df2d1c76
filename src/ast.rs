//! Diagram model shared by the builder, resolver and serializer.

use serde::{Deserialize, Serialize, de::Error as _};

/// Notation used for every detected foreign key.
pub const MANY_TO_MANY: &str = "*--*";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diagram {
    pub title: String,
    pub tables: Vec<Table>,
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type", default)]
    pub typ: String,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    /// Injected uniformly into every table rather than parsed from source.
    #[serde(default)]
    pub is_extra_field: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub kind: String,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            color: None,
        }
    }

    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_primary_key)
    }
}

impl Column {
    pub fn new(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
            ..Self::default()
        }
    }

    pub fn primary(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            is_primary_key: true,
            ..Self::new(name, typ)
        }
    }

    /// Common field column; its type is left blank.
    pub fn extra(name: impl Into<String>) -> Self {
        Self {
            is_extra_field: true,
            ..Self::new(name, "")
        }
    }
}

impl Reference {
    pub fn new(
        from_table: impl Into<String>,
        from_column: impl Into<String>,
        to_table: impl Into<String>,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_column: from_column.into(),
            to_table: to_table.into(),
            kind: MANY_TO_MANY.to_string(),
        }
    }
}

/// Parse an externally supplied JSON array of table definitions.
///
/// Tables and columns must be named.
pub fn tables_from_json(input: &str) -> Result<Vec<Table>, serde_json::Error> {
    let tables: Vec<Table> = serde_json::from_str(input)?;

    for table in &tables {
        if table.name.trim().is_empty() {
            return Err(serde_json::Error::custom("table name must not be empty"));
        }
        if table.columns.iter().any(|c| c.name.trim().is_empty()) {
            return Err(serde_json::Error::custom(format!(
                "column name must not be empty in table {:?}",
                table.name
            )));
        }
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_from_json() {
        let input = r##"[{"name":"schema_migrations","columns":[{"name":"id","type":"integer","is_primary_key":true,"is_foreign_key":false,"is_extra_field":false},{"name":"version","type":"varchar"}],"color":"#ebe486"}]"##;
        let tables = tables_from_json(input).unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "schema_migrations");
        assert_eq!(tables[0].color.as_deref(), Some("#ebe486"));
        assert_eq!(tables[0].columns[0], Column::primary("id", "integer"));
        assert_eq!(tables[0].columns[1], Column::new("version", "varchar"));
    }

    #[test]
    fn test_tables_from_json_rejects_malformed() {
        assert!(tables_from_json(r#"[{"columns": []}]"#).is_err());
        assert!(tables_from_json("{not json").is_err());
    }

    #[test]
    fn test_tables_from_json_rejects_empty_names() {
        let err = tables_from_json(r#"[{"name":"","columns":[{"name":"id"}]}]"#).unwrap_err();
        assert!(err.to_string().contains("table name must not be empty"));

        let err = tables_from_json(r#"[{"name":"audit","columns":[{"name":" "}]}]"#).unwrap_err();
        assert!(err.to_string().contains("column name must not be empty"));
    }

    #[test]
    fn test_reference_kind() {
        let reference = Reference::new("phone_number", "user_id", "user");
        assert_eq!(reference.kind, "*--*");
    }
}
