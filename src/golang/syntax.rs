//! Declaration tree produced by the Go parser.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: Option<String>,
    pub decls: Vec<Decl>,
}

/// Top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// Imported package paths.
    Import(Vec<String>),
    /// One `type` keyword; grouped declarations carry several specs.
    Type(Vec<TypeSpec>),
    Func(FuncDecl),
    Value(ValueKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: String,
    /// `type A = B`
    pub alias: bool,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    /// Receiver base type for methods.
    pub receiver: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Var,
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Named {
        package: Option<String>,
        name: String,
        args: Vec<TypeExpr>,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array {
        len: String,
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeExpr>,
    },
    Func,
    Interface,
    Struct(Vec<Field>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Empty for embedded fields.
    pub names: Vec<String>,
    pub ty: TypeExpr,
    /// Tag literal contents, without quotes.
    pub tag: Option<String>,
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            package: None,
            name: name.into(),
            args: vec![],
        }
    }

    /// Base type name, looking through pointers.
    pub fn base_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named { name, .. } => Some(name),
            TypeExpr::Pointer(inner) => inner.base_name(),
            _ => None,
        }
    }
}

impl Field {
    /// Declared name, or the type name for embedded fields.
    pub fn display_name(&self) -> String {
        match self.names.first() {
            Some(name) => name.clone(),
            None => self.ty.base_name().unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named {
                package,
                name,
                args,
            } => {
                if let Some(package) = package {
                    write!(f, "{}.", package)?;
                }
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                    write!(f, "[{}]", args.join(", "))?;
                }
                Ok(())
            }
            TypeExpr::Pointer(inner) => write!(f, "*{}", inner),
            TypeExpr::Slice(elem) => write!(f, "[]{}", elem),
            TypeExpr::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            TypeExpr::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {}", elem),
                ChanDir::Send => write!(f, "chan<- {}", elem),
                ChanDir::Recv => write!(f, "<-chan {}", elem),
            },
            TypeExpr::Func => write!(f, "func()"),
            TypeExpr::Interface => write!(f, "interface{{}}"),
            TypeExpr::Struct(fields) => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|field| {
                        if field.names.is_empty() {
                            field.ty.to_string()
                        } else {
                            format!("{} {}", field.names.join(", "), field.ty)
                        }
                    })
                    .collect();
                write!(f, "struct{{{}}}", fields.join("; "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_types() {
        let time = TypeExpr::Named {
            package: Some("time".to_string()),
            name: "Time".to_string(),
            args: vec![],
        };
        assert_eq!(time.to_string(), "time.Time");
        assert_eq!(TypeExpr::Pointer(Box::new(TypeExpr::named("string"))).to_string(), "*string");
        assert_eq!(
            TypeExpr::Map {
                key: Box::new(TypeExpr::named("string")),
                value: Box::new(TypeExpr::Slice(Box::new(TypeExpr::named("byte")))),
            }
            .to_string(),
            "map[string][]byte"
        );
    }

    #[test]
    fn test_embedded_display_name() {
        let field = Field {
            names: vec![],
            ty: TypeExpr::Pointer(Box::new(TypeExpr::named("Base"))),
            tag: None,
        };
        assert_eq!(field.display_name(), "Base");
    }
}
