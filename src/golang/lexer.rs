//! Go lexer with automatic semicolon insertion.

use std::iter::Peekable;
use std::str::Chars;

/// Go token types.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords that shape top-level declarations
    Package,
    Import,
    Type,
    Struct,
    Interface,
    Func,
    Var,
    Const,
    Map,
    Chan,

    // Identifiers and literals
    Ident(String),
    /// Interpreted or raw string, without its quotes.
    Str(String),
    Char(String),
    Num(String),

    // Symbols
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Dot,
    Ellipsis,
    Star,
    Assign, // =
    Arrow,  // <-
    Op(String),

    Eof,
}

impl Token {
    /// Source text of the token, as far as it can be recovered.
    pub fn text(&self) -> String {
        match self {
            Token::Package => "package".into(),
            Token::Import => "import".into(),
            Token::Type => "type".into(),
            Token::Struct => "struct".into(),
            Token::Interface => "interface".into(),
            Token::Func => "func".into(),
            Token::Var => "var".into(),
            Token::Const => "const".into(),
            Token::Map => "map".into(),
            Token::Chan => "chan".into(),
            Token::Ident(s) | Token::Num(s) | Token::Op(s) => s.clone(),
            Token::Str(s) => format!("{:?}", s),
            Token::Char(s) => format!("'{}'", s),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::LBrace => "{".into(),
            Token::RBrace => "}".into(),
            Token::LBracket => "[".into(),
            Token::RBracket => "]".into(),
            Token::Comma => ",".into(),
            Token::Semicolon => ";".into(),
            Token::Dot => ".".into(),
            Token::Ellipsis => "...".into(),
            Token::Star => "*".into(),
            Token::Assign => "=".into(),
            Token::Arrow => "<-".into(),
            Token::Eof => String::new(),
        }
    }

    /// Whether a newline directly after this token ends the statement.
    fn ends_statement(&self) -> bool {
        match self {
            Token::Ident(_)
            | Token::Str(_)
            | Token::Char(_)
            | Token::Num(_)
            | Token::RParen
            | Token::RBracket
            | Token::RBrace => true,
            Token::Op(op) => op == "++" || op == "--",
            _ => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character {0:?} on line {1}")]
    UnexpectedChar(char, usize),
    #[error("Unterminated string starting on line {0}")]
    UnterminatedString(usize),
    #[error("Unterminated comment starting on line {0}")]
    UnterminatedComment(usize),
}

/// A token with the line it starts on.
pub type Spanned = (Token, usize);

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    current_char: Option<char>,
    line: usize,
    insert_semicolon: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut chars = input.chars().peekable();
        let current_char = chars.next();
        Self {
            chars,
            current_char,
            line: 1,
            insert_semicolon: false,
        }
    }

    fn advance(&mut self) {
        if self.current_char == Some('\n') {
            self.line += 1;
        }
        self.current_char = self.chars.next();
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.current_char {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Returns whether the comment spanned a newline.
    fn skip_block_comment(&mut self) -> Result<bool, LexError> {
        let start = self.line;
        self.advance(); // skip /
        self.advance(); // skip *
        let mut newline = false;
        loop {
            let current = self.current_char;
            match current {
                None => return Err(LexError::UnterminatedComment(start)),
                Some('*') if self.peek() == Some(&'/') => {
                    self.advance();
                    self.advance();
                    return Ok(newline);
                }
                Some(c) => {
                    if c == '\n' {
                        newline = true;
                    }
                    self.advance();
                }
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.current_char {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }
        ident
    }

    fn read_number(&mut self) -> String {
        let mut num = String::new();
        while let Some(c) = self.current_char {
            let exponent_sign = (c == '+' || c == '-')
                && matches!(num.chars().last(), Some('e' | 'E' | 'p' | 'P'))
                && !num.starts_with("0x")
                && !num.starts_with("0X");
            if c.is_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                num.push(c);
                self.advance();
            } else {
                break;
            }
        }
        num
    }

    fn read_interpreted_string(&mut self) -> Result<String, LexError> {
        let start = self.line;
        self.advance(); // skip opening quote
        let mut s = String::new();
        loop {
            match self.current_char {
                None | Some('\n') => return Err(LexError::UnterminatedString(start)),
                Some('"') => {
                    self.advance();
                    return Ok(s);
                }
                Some('\\') => {
                    self.advance();
                    match self.current_char {
                        Some('n') => s.push('\n'),
                        Some('t') => s.push('\t'),
                        Some('r') => s.push('\r'),
                        Some(c @ ('"' | '\\' | '\'')) => s.push(c),
                        Some(c) => {
                            s.push('\\');
                            s.push(c);
                        }
                        None => return Err(LexError::UnterminatedString(start)),
                    }
                    self.advance();
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_raw_string(&mut self) -> Result<String, LexError> {
        let start = self.line;
        self.advance(); // skip opening backtick
        let mut s = String::new();
        loop {
            match self.current_char {
                None => return Err(LexError::UnterminatedString(start)),
                Some('`') => {
                    self.advance();
                    return Ok(s);
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_char(&mut self) -> Result<String, LexError> {
        let start = self.line;
        self.advance(); // skip opening quote
        let mut s = String::new();
        loop {
            match self.current_char {
                None | Some('\n') => return Err(LexError::UnterminatedString(start)),
                Some('\'') => {
                    self.advance();
                    return Ok(s);
                }
                Some('\\') => {
                    s.push('\\');
                    self.advance();
                    if let Some(c) = self.current_char {
                        s.push(c);
                        self.advance();
                    }
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_operator(&mut self) -> Token {
        let mut op = String::new();
        while let Some(c) = self.current_char {
            if "+-/%&|^<>=!:~".contains(c) {
                op.push(c);
                self.advance();
            } else {
                break;
            }
        }
        Token::Op(op)
    }

    fn keyword_or_ident(s: String) -> Token {
        match s.as_str() {
            "package" => Token::Package,
            "import" => Token::Import,
            "type" => Token::Type,
            "struct" => Token::Struct,
            "interface" => Token::Interface,
            "func" => Token::Func,
            "var" => Token::Var,
            "const" => Token::Const,
            "map" => Token::Map,
            "chan" => Token::Chan,
            _ => Token::Ident(s),
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    /// Next token, or an inserted semicolon when a line ends a statement.
    pub fn next_token(&mut self) -> Result<Spanned, LexError> {
        loop {
            let line = self.line;
            let current = self.current_char;
            match current {
                None => {
                    if self.insert_semicolon {
                        self.insert_semicolon = false;
                        return Ok((Token::Semicolon, line));
                    }
                    return Ok((Token::Eof, line));
                }

                Some('\n') => {
                    self.advance();
                    if self.insert_semicolon {
                        self.insert_semicolon = false;
                        return Ok((Token::Semicolon, line));
                    }
                }

                Some(c) if c.is_whitespace() => self.advance(),

                Some('/') if self.peek() == Some(&'/') => self.skip_line_comment(),

                Some('/') if self.peek() == Some(&'*') => {
                    if self.skip_block_comment()? && self.insert_semicolon {
                        self.insert_semicolon = false;
                        return Ok((Token::Semicolon, line));
                    }
                }

                Some(c) => {
                    let token = match c {
                        '(' => self.single(Token::LParen),
                        ')' => self.single(Token::RParen),
                        '{' => self.single(Token::LBrace),
                        '}' => self.single(Token::RBrace),
                        '[' => self.single(Token::LBracket),
                        ']' => self.single(Token::RBracket),
                        ',' => self.single(Token::Comma),
                        ';' => self.single(Token::Semicolon),
                        '*' => self.single(Token::Star),
                        '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => {
                            Token::Num(self.read_number())
                        }
                        '.' => {
                            self.advance();
                            if self.current_char == Some('.') && self.peek() == Some(&'.') {
                                self.advance();
                                self.advance();
                                Token::Ellipsis
                            } else {
                                Token::Dot
                            }
                        }
                        '<' if self.peek() == Some(&'-') => {
                            self.advance();
                            self.single(Token::Arrow)
                        }
                        '=' if self.peek() != Some(&'=') => self.single(Token::Assign),
                        '"' => Token::Str(self.read_interpreted_string()?),
                        '`' => Token::Str(self.read_raw_string()?),
                        '\'' => Token::Char(self.read_char()?),
                        c if c.is_ascii_digit() => Token::Num(self.read_number()),
                        c if c.is_alphabetic() || c == '_' => {
                            Self::keyword_or_ident(self.read_identifier())
                        }
                        c if "+-/%&|^<>=!:~".contains(c) => self.read_operator(),
                        c => return Err(LexError::UnexpectedChar(c, line)),
                    };
                    self.insert_semicolon = token.ends_statement();
                    return Ok((token, line));
                }
            }
        }
    }

    /// Collect all tokens, ending with `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.0 == Token::Eof;
            tokens.push(spanned);
            if done {
                break;
            }
        }
        Ok(tokens)
    }
}
