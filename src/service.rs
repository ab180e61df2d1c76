//! End-to-end diagram generation.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::ast::{Diagram, Table};
use crate::builder::{BuildOptions, TableBuilder};
use crate::config::{ConfigError, Options};
use crate::error::Error;
use crate::extract::extract_structs;
use crate::golang::{SourceFile, parse_go};
use crate::naming::DefaultNaming;
use crate::resolver::ReferenceResolver;
use crate::serializer::DiagramWrite;

/// Reads the configured sources and hands the finished diagram to a writer.
pub struct Generator<W: DiagramWrite> {
    options: Options,
    writer: W,
}

impl<W: DiagramWrite> Generator<W> {
    pub fn new(options: Options, writer: W) -> Self {
        Self { options, writer }
    }

    pub fn generate(&mut self) -> Result<(), Error> {
        let build_options = self.options.build_options();
        let extra_tables = self.options.extra_tables()?;

        let paths = source_files(&self.options)?;
        info!(files = paths.len(); "Parsing source files");

        let sources = paths
            .iter()
            .map(|path| parse_file(path))
            .collect::<Result<Vec<_>, _>>()?;

        let diagram = build_diagram(&sources, &build_options, &self.options.title, extra_tables)?;
        info!(
            tables = diagram.tables.len(),
            references = diagram.references.len();
            "Diagram built"
        );

        self.writer.write_diagram(&diagram)
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// Source files to parse. A directory wins over a file list and is listed
/// non-recursively for `.go` files in path order.
pub fn source_files(options: &Options) -> Result<Vec<PathBuf>, Error> {
    let Some(directory) = &options.directory else {
        if options.file_list.is_empty() {
            return Err(ConfigError::NoInput.into());
        }
        return Ok(options.file_list.clone());
    };

    let read_err = |source| Error::Read {
        path: directory.clone(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(directory).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "go") {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

fn parse_file(path: &Path) -> Result<SourceFile, Error> {
    let source = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = path.display().to_string(); "Parsing file");

    parse_go(&source).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Build tables from parsed sources, merge the extra tables and detect
/// references between all of them.
pub fn build_diagram(
    sources: &[SourceFile],
    options: &BuildOptions,
    title: &str,
    extra_tables: Vec<Table>,
) -> Result<Diagram, Error> {
    let builder = TableBuilder::new(DefaultNaming, options)?;

    let mut tables: Vec<Table> = sources
        .iter()
        .flat_map(|source| builder.build_all(&extract_structs(&source.decls)))
        .collect();
    tables.extend(extra_tables);

    let references = ReferenceResolver::new(DefaultNaming, options.table_case).resolve(&mut tables);

    Ok(Diagram {
        title: title.to_string(),
        tables,
        references,
    })
}
