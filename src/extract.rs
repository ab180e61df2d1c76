//! Struct declarations and their tagged fields.

use crate::golang::{Decl, TypeExpr};

/// A struct field that carries a tag literal.
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    pub name: String,
    pub source_type: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawStruct {
    pub name: String,
    pub fields: Vec<RawField>,
}

/// Collect every struct type declaration with its tagged fields.
///
/// Non-struct types, functions, imports and values are skipped, as are
/// fields without a tag.
pub fn extract_structs(decls: &[Decl]) -> Vec<RawStruct> {
    decls
        .iter()
        .filter_map(|decl| match decl {
            Decl::Type(specs) => Some(specs),
            _ => None,
        })
        .flatten()
        .filter_map(|spec| match &spec.ty {
            TypeExpr::Struct(fields) => {
                let fields = fields
                    .iter()
                    .filter_map(|field| {
                        field.tag.as_ref().map(|tag| RawField {
                            name: field.display_name(),
                            source_type: field.ty.to_string(),
                            tag: tag.clone(),
                        })
                    })
                    .collect();
                Some(RawStruct {
                    name: spec.name.clone(),
                    fields,
                })
            }
            _ => None,
        })
        .collect()
}
