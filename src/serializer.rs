//! Serializer for converting a diagram to `.er` text.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::info;

use crate::ast::{Column, Diagram, Reference, Table};
use crate::error::Error;
use crate::naming::{CasePolicy, DefaultNaming, Naming};

/// Destination of a finished diagram.
pub trait DiagramWrite {
    fn write_diagram(&mut self, diagram: &Diagram) -> Result<(), Error>;
}

/// Serialize a diagram with the default naming rules.
pub fn serialize(diagram: &Diagram) -> String {
    ErWriter::new(DefaultNaming).render(diagram)
}

#[derive(Debug, Clone, Default)]
pub struct ErWriter<N: Naming = DefaultNaming> {
    naming: N,
}

impl<N: Naming> ErWriter<N> {
    pub fn new(naming: N) -> Self {
        Self { naming }
    }

    pub fn write<W: Write>(&self, diagram: &Diagram, out: &mut W) -> io::Result<()> {
        out.write_all(self.render(diagram).as_bytes())
    }

    pub fn render(&self, diagram: &Diagram) -> String {
        let mut output = String::new();

        if !diagram.title.is_empty() {
            output.push_str(&format!("title {{label: \"{}\"}}\n\n", diagram.title));
        }

        output.push_str("# Definition of tables.\n");
        let mut tables: Vec<&Table> = diagram.tables.iter().collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        for table in tables {
            self.serialize_table(&mut output, table);
        }

        if !diagram.references.is_empty() {
            output.push_str("\n# Definition of foreign keys.\n");
            let mut references: Vec<&Reference> = diagram.references.iter().collect();
            references.sort_by(|a, b| {
                (&a.from_table, &a.from_column, &a.to_table).cmp(&(
                    &b.from_table,
                    &b.from_column,
                    &b.to_table,
                ))
            });
            for reference in references {
                output.push_str(&format!(
                    "{} {} {} {{label: \"{}\"}}\n",
                    reference.from_table, reference.kind, reference.to_table, reference.from_column
                ));
            }
        }

        output
    }

    /// Header is `[name]`, extended to `[name] {bgcolor: "<color>"}` for
    /// tables that carry a color (extra tables from a JSON definition).
    fn serialize_table(&self, output: &mut String, table: &Table) {
        match &table.color {
            Some(color) => output.push_str(&format!("[{}] {{bgcolor: \"{}\"}}\n", table.name, color)),
            None => output.push_str(&format!("[{}]\n", table.name)),
        }

        // Primary key first, then parsed columns, then common fields.
        let mut columns: Vec<(&Column, String)> = table
            .columns
            .iter()
            .map(|c| (c, self.naming.convert_case(&c.name, CasePolicy::Camel)))
            .collect();
        columns.sort_by(|(a, a_key), (b, b_key)| {
            (!a.is_primary_key, a.is_extra_field, a_key).cmp(&(!b.is_primary_key, b.is_extra_field, b_key))
        });

        for (column, _) in columns {
            output.push('\t');
            if column.is_primary_key {
                output.push('*');
            }
            if column.is_foreign_key {
                output.push('+');
            }
            output.push_str(&format!("{} {{label: \"{}\"}}\n", column.name, column.typ));
        }

        output.push('\n');
    }
}

/// Writes `<output_path>/<output_filename>.er`.
#[derive(Debug, Clone)]
pub struct ErFile<N: Naming = DefaultNaming> {
    path: PathBuf,
    writer: ErWriter<N>,
}

impl ErFile {
    pub fn new(output_path: impl AsRef<Path>, output_filename: &str) -> Self {
        Self::with_naming(output_path, output_filename, DefaultNaming)
    }
}

impl<N: Naming> ErFile<N> {
    pub fn with_naming(output_path: impl AsRef<Path>, output_filename: &str, naming: N) -> Self {
        Self {
            path: output_path.as_ref().join(format!("{output_filename}.er")),
            writer: ErWriter::new(naming),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<N: Naming> DiagramWrite for ErFile<N> {
    fn write_diagram(&mut self, diagram: &Diagram) -> Result<(), Error> {
        let write_err = |source| Error::Write {
            path: self.path.clone(),
            source,
        };

        let file = File::create(&self.path).map_err(write_err)?;
        let mut out = BufWriter::new(file);
        self.writer.write(diagram, &mut out).map_err(write_err)?;
        out.flush().map_err(write_err)?;

        info!(path = self.path.display().to_string(); "Diagram written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_diagram() -> Diagram {
        let mut user = Table::new("user");
        user.columns = vec![
            Column::new("first_name", "varchar"),
            Column::new("last_name", "varchar"),
            Column::primary("id", "integer"),
        ];

        let mut phone_number = Table::new("phone_number");
        let mut user_id = Column::new("user_id", "integer");
        user_id.is_foreign_key = true;
        phone_number.columns = vec![
            Column::new("phone_number", "varchar"),
            user_id,
            Column::primary("id", "integer"),
        ];

        let mut address = Table::new("address");
        let mut city_id = Column::new("city_id", "integer");
        city_id.is_foreign_key = true;
        let mut address_user_id = Column::new("user_id", "integer");
        address_user_id.is_foreign_key = true;
        address.columns = vec![
            Column::primary("id", "integer"),
            address_user_id,
            Column::new("street", "varchar"),
            city_id,
        ];

        let mut city = Table::new("city");
        city.columns = vec![Column::new("name", "varchar"), Column::primary("id", "integer")];

        Diagram {
            title: "example_db".to_string(),
            tables: vec![user, phone_number, address, city],
            references: vec![
                Reference::new("phone_number", "user_id", "user"),
                Reference::new("address", "user_id", "user"),
                Reference::new("address", "city_id", "city"),
            ],
        }
    }

    const EXAMPLE_ER: &str = "title {label: \"example_db\"}

# Definition of tables.
[address]
\t*id {label: \"integer\"}
\t+city_id {label: \"integer\"}
\tstreet {label: \"varchar\"}
\t+user_id {label: \"integer\"}

[city]
\t*id {label: \"integer\"}
\tname {label: \"varchar\"}

[phone_number]
\t*id {label: \"integer\"}
\tphone_number {label: \"varchar\"}
\t+user_id {label: \"integer\"}

[user]
\t*id {label: \"integer\"}
\tfirst_name {label: \"varchar\"}
\tlast_name {label: \"varchar\"}


# Definition of foreign keys.
address *--* city {label: \"city_id\"}
address *--* user {label: \"user_id\"}
phone_number *--* user {label: \"user_id\"}
";

    #[test]
    fn test_serialize_example() {
        assert_eq!(serialize(&example_diagram()), EXAMPLE_ER);
    }

    #[test]
    fn test_serialize_is_stable() {
        let diagram = example_diagram();
        assert_eq!(serialize(&diagram), serialize(&diagram));
    }

    #[test]
    fn test_no_title_no_references() {
        let mut table = Table::new("city");
        table.columns = vec![Column::primary("id", "integer")];
        let diagram = Diagram {
            title: String::new(),
            tables: vec![table],
            references: vec![],
        };

        assert_eq!(
            serialize(&diagram),
            "# Definition of tables.\n[city]\n\t*id {label: \"integer\"}\n\n"
        );
    }

    #[test]
    fn test_extra_fields_last_and_color() {
        let mut table = Table::new("schema_migrations");
        table.color = Some("#ebe486".to_string());
        table.columns = vec![
            Column::extra("created_at"),
            Column::new("version", "varchar"),
            Column::primary("id", "integer"),
            Column::extra("archived_at"),
        ];
        let diagram = Diagram {
            title: String::new(),
            tables: vec![table],
            references: vec![],
        };

        assert_eq!(
            serialize(&diagram),
            "# Definition of tables.
[schema_migrations] {bgcolor: \"#ebe486\"}
\t*id {label: \"integer\"}
\tversion {label: \"varchar\"}
\tarchived_at {label: \"\"}
\tcreated_at {label: \"\"}

"
        );
    }

    #[test]
    fn test_er_file_writes_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = ErFile::new(dir.path(), "example-er-diagram");
        file.write_diagram(&example_diagram()).unwrap();

        assert_eq!(file.path(), dir.path().join("example-er-diagram.er"));
        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, EXAMPLE_ER);
    }

    #[test]
    fn test_er_file_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = ErFile::new(dir.path().join("missing"), "out");
        let err = file.write_diagram(&example_diagram()).unwrap_err();

        assert!(matches!(err, Error::Write { .. }));
    }
}
