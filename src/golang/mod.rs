//! Go source to declaration tree.

mod lexer;
mod parser;
mod syntax;
mod types;

pub use lexer::{LexError, Token};
pub use parser::{GoParseError, parse_go};
pub use syntax::{ChanDir, Decl, Field, FuncDecl, SourceFile, TypeExpr, TypeSpec, ValueKind};
pub use types::{UNKNOWN_TYPE, infer_column_type};
