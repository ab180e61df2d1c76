//! Foreign key detection by table-name containment.

use log::debug;

use crate::ast::{Reference, Table};
use crate::naming::{CasePolicy, Naming};

pub struct ReferenceResolver<N: Naming> {
    naming: N,
    table_case: CasePolicy,
}

impl<N: Naming> ReferenceResolver<N> {
    pub fn new(naming: N, table_case: CasePolicy) -> Self {
        Self { naming, table_case }
    }

    /// Emit a reference for every column whose name contains the singular or
    /// plural name of another table, flagging those columns as foreign keys.
    pub fn resolve(&self, tables: &mut [Table]) -> Vec<Reference> {
        let targets: Vec<(String, String)> = tables
            .iter()
            .map(|table| {
                (
                    self.normalize(&self.naming.count_form(false, &table.name)),
                    self.normalize(&self.naming.count_form(true, &table.name)),
                )
            })
            .collect();
        let names: Vec<String> = tables.iter().map(|t| t.name.clone()).collect();

        let mut references = Vec::new();
        for (a, table) in tables.iter_mut().enumerate() {
            for column in table.columns.iter_mut() {
                let column_name = self.normalize(&column.name);
                for (b, (singular, plural)) in targets.iter().enumerate() {
                    if a == b {
                        continue;
                    }
                    if column_name.contains(singular.as_str())
                        || column_name.contains(plural.as_str())
                    {
                        debug!(from = table.name.as_str(), column = column.name.as_str(), to = names[b].as_str(); "Detected foreign key");
                        column.is_foreign_key = true;
                        references.push(Reference::new(&table.name, &column.name, &names[b]));
                    }
                }
            }
        }

        references
    }

    fn normalize(&self, value: &str) -> String {
        self.naming.convert_case(value, self.table_case)
    }
}
