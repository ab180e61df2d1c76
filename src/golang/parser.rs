//! Go parser for top-level declarations and type expressions.
//!
//! Only the declaration structure is parsed; function bodies, initializers
//! and generic parameter lists are skipped by bracket matching.

use super::lexer::{LexError, Lexer, Spanned, Token};
use super::syntax::{ChanDir, Decl, Field, FuncDecl, SourceFile, TypeExpr, TypeSpec, ValueKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Expected {expected} on line {line}, found {found:?}")]
    Expected {
        expected: &'static str,
        found: Token,
        line: usize,
    },
    #[error("Unexpected end of input")]
    UnexpectedEof,
}

/// Parse one Go source file.
pub fn parse_go(input: &str) -> Result<SourceFile, GoParseError> {
    let tokens = Lexer::new(input).tokenize()?;
    Parser::new(tokens).parse()
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

static EOF: Spanned = (Token::Eof, 0);

impl Parser {
    fn new(tokens: Vec<Spanned>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens.get(self.pos).unwrap_or(&EOF).0
    }

    fn peek_at(&self, offset: usize) -> &Token {
        &self.tokens.get(self.pos + offset).unwrap_or(&EOF).0
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |(_, line)| *line)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn error(&self, expected: &'static str) -> GoParseError {
        match self.current() {
            Token::Eof => GoParseError::UnexpectedEof,
            found => GoParseError::Expected {
                expected,
                found: found.clone(),
                line: self.line(),
            },
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), GoParseError> {
        if self.current() == &token {
            self.advance();
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn expect_ident(&mut self) -> Result<String, GoParseError> {
        match self.current() {
            Token::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("identifier")),
        }
    }

    /// A statement ends with `;`, or right before a closing `)` / `}`.
    fn expect_semi(&mut self) -> Result<(), GoParseError> {
        match self.current() {
            Token::Semicolon => {
                self.advance();
                Ok(())
            }
            Token::RParen | Token::RBrace | Token::Eof => Ok(()),
            _ => Err(self.error("';' or newline")),
        }
    }

    fn skip_semicolons(&mut self) {
        while self.current() == &Token::Semicolon {
            self.advance();
        }
    }

    fn parse(&mut self) -> Result<SourceFile, GoParseError> {
        self.skip_semicolons();

        let package = if self.current() == &Token::Package {
            self.advance();
            let name = self.expect_ident()?;
            self.expect_semi()?;
            Some(name)
        } else {
            None
        };

        let mut decls = Vec::new();
        loop {
            match self.current() {
                Token::Eof => break,
                Token::Semicolon => self.advance(),
                Token::Import => decls.push(self.parse_import()?),
                Token::Type => decls.push(self.parse_type_decl()?),
                Token::Func => decls.push(Decl::Func(self.parse_func()?)),
                Token::Var => {
                    self.skip_value_decl()?;
                    decls.push(Decl::Value(ValueKind::Var));
                }
                Token::Const => {
                    self.skip_value_decl()?;
                    decls.push(Decl::Value(ValueKind::Const));
                }
                _ => return Err(self.error("declaration")),
            }
        }

        Ok(SourceFile { package, decls })
    }

    fn parse_import(&mut self) -> Result<Decl, GoParseError> {
        self.advance(); // import

        let mut paths = Vec::new();
        if self.current() == &Token::LParen {
            self.advance();
            loop {
                self.skip_semicolons();
                if self.current() == &Token::RParen {
                    self.advance();
                    break;
                }
                paths.push(self.parse_import_spec()?);
                self.expect_semi()?;
            }
        } else {
            paths.push(self.parse_import_spec()?);
        }
        self.expect_semi()?;

        Ok(Decl::Import(paths))
    }

    fn parse_import_spec(&mut self) -> Result<String, GoParseError> {
        // Optional alias: name, `_` or `.`
        if matches!(self.current(), Token::Ident(_) | Token::Dot) {
            self.advance();
        }
        match self.current() {
            Token::Str(path) => {
                let path = path.clone();
                self.advance();
                Ok(path)
            }
            _ => Err(self.error("import path")),
        }
    }

    fn parse_type_decl(&mut self) -> Result<Decl, GoParseError> {
        self.advance(); // type

        let mut specs = Vec::new();
        if self.current() == &Token::LParen {
            self.advance();
            loop {
                self.skip_semicolons();
                if self.current() == &Token::RParen {
                    self.advance();
                    break;
                }
                specs.push(self.parse_type_spec()?);
                self.expect_semi()?;
            }
        } else {
            specs.push(self.parse_type_spec()?);
        }
        self.expect_semi()?;

        Ok(Decl::Type(specs))
    }

    fn parse_type_spec(&mut self) -> Result<TypeSpec, GoParseError> {
        let name = self.expect_ident()?;

        if self.current() == &Token::LBracket && self.at_type_params() {
            self.skip_balanced()?;
        }

        let alias = if self.current() == &Token::Assign {
            self.advance();
            true
        } else {
            false
        };

        let ty = self.parse_type()?;
        Ok(TypeSpec { name, alias, ty })
    }

    /// `[T any]` after a type name opens a parameter list, `[N]T` an array.
    fn at_type_params(&self) -> bool {
        matches!(self.peek_at(1), Token::Ident(_))
            && !matches!(self.peek_at(2), Token::RBracket | Token::Dot)
    }

    fn parse_type(&mut self) -> Result<TypeExpr, GoParseError> {
        match self.current().clone() {
            Token::Ident(name) => {
                self.advance();
                let (package, name) = if self.current() == &Token::Dot {
                    self.advance();
                    (Some(name), self.expect_ident()?)
                } else {
                    (None, name)
                };

                let mut args = Vec::new();
                if self.current() == &Token::LBracket {
                    self.advance();
                    loop {
                        args.push(self.parse_type()?);
                        if self.current() == &Token::Comma {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                    self.expect(Token::RBracket, "']'")?;
                }

                Ok(TypeExpr::Named {
                    package,
                    name,
                    args,
                })
            }
            Token::Star => {
                self.advance();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            Token::LBracket => {
                self.advance();
                if self.current() == &Token::RBracket {
                    self.advance();
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }

                let mut len = Vec::new();
                while self.current() != &Token::RBracket {
                    if self.current() == &Token::Eof {
                        return Err(GoParseError::UnexpectedEof);
                    }
                    len.push(self.current().text());
                    self.advance();
                }
                self.advance(); // ]

                Ok(TypeExpr::Array {
                    len: len.concat(),
                    elem: Box::new(self.parse_type()?),
                })
            }
            Token::Map => {
                self.advance();
                self.expect(Token::LBracket, "'['")?;
                let key = self.parse_type()?;
                self.expect(Token::RBracket, "']'")?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            Token::Chan => {
                self.advance();
                let dir = if self.current() == &Token::Arrow {
                    self.advance();
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Ok(TypeExpr::Chan {
                    dir,
                    elem: Box::new(self.parse_type()?),
                })
            }
            Token::Arrow => {
                self.advance();
                self.expect(Token::Chan, "'chan'")?;
                Ok(TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.parse_type()?),
                })
            }
            Token::Func => {
                self.advance();
                self.skip_signature()?;
                Ok(TypeExpr::Func)
            }
            Token::Interface => {
                self.advance();
                if self.current() != &Token::LBrace {
                    return Err(self.error("'{'"));
                }
                self.skip_balanced()?;
                Ok(TypeExpr::Interface)
            }
            Token::Struct => self.parse_struct(),
            Token::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(self.error("type")),
        }
    }

    fn parse_struct(&mut self) -> Result<TypeExpr, GoParseError> {
        self.advance(); // struct
        self.expect(Token::LBrace, "'{'")?;

        let mut fields = Vec::new();
        loop {
            self.skip_semicolons();
            if self.current() == &Token::RBrace {
                self.advance();
                break;
            }
            fields.push(self.parse_field()?);
            self.expect_semi()?;
        }

        Ok(TypeExpr::Struct(fields))
    }

    fn parse_field(&mut self) -> Result<Field, GoParseError> {
        let embedded = match self.current() {
            Token::Star => true,
            Token::Ident(_) => match self.peek_at(1) {
                Token::Dot | Token::Semicolon | Token::RBrace | Token::Str(_) => true,
                Token::LBracket => self.at_embedded_instance(),
                _ => false,
            },
            _ => return Err(self.error("field")),
        };

        let mut names = Vec::new();
        if !embedded {
            names.push(self.expect_ident()?);
            while self.current() == &Token::Comma {
                self.advance();
                names.push(self.expect_ident()?);
            }
        }

        let ty = self.parse_type()?;

        let tag = match self.current() {
            Token::Str(tag) => {
                let tag = tag.clone();
                self.advance();
                Some(tag)
            }
            _ => None,
        };

        Ok(Field { names, ty, tag })
    }

    /// `Base[int]` ends the field after its closing bracket, while a named
    /// array field such as `Buf [4]byte` continues with the element type.
    fn at_embedded_instance(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 1;
        loop {
            match self.peek_at(offset) {
                Token::LBracket => depth += 1,
                Token::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Token::Eof => return false,
                _ => {}
            }
            offset += 1;
        }
        matches!(
            self.peek_at(offset + 1),
            Token::Semicolon | Token::RBrace | Token::Str(_)
        )
    }

    fn parse_func(&mut self) -> Result<FuncDecl, GoParseError> {
        self.advance(); // func

        let receiver = if self.current() == &Token::LParen {
            let inner = self.skip_balanced()?;
            receiver_type(&inner)
        } else {
            None
        };

        let name = self.expect_ident()?;

        if self.current() == &Token::LBracket {
            self.skip_balanced()?;
        }
        self.skip_signature()?;

        if self.current() == &Token::LBrace {
            self.skip_balanced()?;
        }
        self.expect_semi()?;

        Ok(FuncDecl { name, receiver })
    }

    /// Parameters and optional results of a function signature.
    fn skip_signature(&mut self) -> Result<(), GoParseError> {
        if self.current() != &Token::LParen {
            return Err(self.error("'('"));
        }
        self.skip_balanced()?;

        match self.current() {
            Token::LParen => {
                self.skip_balanced()?;
            }
            Token::Ident(_)
            | Token::Star
            | Token::LBracket
            | Token::Map
            | Token::Chan
            | Token::Arrow
            | Token::Func
            | Token::Interface
            | Token::Struct => {
                self.parse_type()?;
            }
            _ => {}
        }
        Ok(())
    }

    /// `var` / `const` declarations are skipped up to their terminating `;`.
    fn skip_value_decl(&mut self) -> Result<(), GoParseError> {
        self.advance(); // var / const

        loop {
            match self.current() {
                Token::Semicolon => {
                    self.advance();
                    return Ok(());
                }
                Token::Eof => return Ok(()),
                Token::LParen | Token::LBracket | Token::LBrace => {
                    self.skip_balanced()?;
                }
                Token::RParen | Token::RBracket | Token::RBrace => {
                    return Err(self.error("balanced brackets"));
                }
                _ => self.advance(),
            }
        }
    }

    /// Skip a bracketed group starting at the current opening token and
    /// return the tokens between the outer brackets.
    fn skip_balanced(&mut self) -> Result<Vec<Token>, GoParseError> {
        if !matches!(self.current(), Token::LParen | Token::LBracket | Token::LBrace) {
            return Err(self.error("opening bracket"));
        }
        self.advance();

        let mut depth = 1usize;
        let mut inner = Vec::new();
        loop {
            let token = self.current().clone();
            match token {
                Token::Eof => return Err(GoParseError::UnexpectedEof),
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(inner);
                    }
                }
                _ => {}
            }
            inner.push(token);
            self.advance();
        }
    }
}

/// Base type name of a method receiver such as `(u *User)` or `(l List[T])`.
fn receiver_type(tokens: &[Token]) -> Option<String> {
    let mut depth = 0usize;
    let mut last = None;
    for token in tokens {
        match token {
            Token::LBracket | Token::LParen => depth += 1,
            Token::RBracket | Token::RParen => depth = depth.saturating_sub(1),
            Token::Ident(name) if depth == 0 => last = Some(name.clone()),
            _ => {}
        }
    }
    last
}
