//! Scanner for KPL source text
//!
//! Produces one [`Token`] per call to [`Lexer::next_token`]; the parser pulls
//! tokens on demand through its cursor rather than tokenizing up front.
//! Lexical defects (unterminated comment, over-long identifier, malformed
//! char literal, unknown symbol) are returned as [`Diagnostic`]s and end the
//! compilation like any other defect.
//!
//! Keywords are case-insensitive; identifiers keep their spelling. Index
//! brackets are written `(.` and `.)`, with `[` and `]` accepted as well.

use super::ast::SourceLocation;
use crate::diagnostics::{Diagnostic, ErrorKind};
use std::fmt;

/// Longest identifier the scanner accepts
pub const MAX_IDENT_LEN: usize = 15;

/// Terminal categories of the KPL grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    Number,
    Char,
    Eof,

    // Keywords
    KwProgram,
    KwConst,
    KwType,
    KwVar,
    KwInteger,
    KwChar,
    KwArray,
    KwOf,
    KwFunction,
    KwProcedure,
    KwBegin,
    KwEnd,
    KwCall,
    KwIf,
    KwThen,
    KwElse,
    KwWhile,
    KwDo,
    KwFor,
    KwTo,

    // Symbols
    Semicolon, // ;
    Colon,     // :
    Period,    // .
    Comma,     // ,
    Assign,    // :=
    Eq,        // =
    Neq,       // !=
    Lt,        // <
    Le,        // <=
    Gt,        // >
    Ge,        // >=
    Plus,      // +
    Minus,     // -
    Times,     // *
    Slash,     // /
    LPar,      // (
    RPar,      // )
    LSel,      // (.
    RSel,      // .)
}

impl TokenKind {
    /// Keyword for an identifier-shaped word, matched case-insensitively.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word.to_ascii_uppercase().as_str() {
            "PROGRAM" => TokenKind::KwProgram,
            "CONST" => TokenKind::KwConst,
            "TYPE" => TokenKind::KwType,
            "VAR" => TokenKind::KwVar,
            "INTEGER" => TokenKind::KwInteger,
            "CHAR" => TokenKind::KwChar,
            "ARRAY" => TokenKind::KwArray,
            "OF" => TokenKind::KwOf,
            "FUNCTION" => TokenKind::KwFunction,
            "PROCEDURE" => TokenKind::KwProcedure,
            "BEGIN" => TokenKind::KwBegin,
            "END" => TokenKind::KwEnd,
            "CALL" => TokenKind::KwCall,
            "IF" => TokenKind::KwIf,
            "THEN" => TokenKind::KwThen,
            "ELSE" => TokenKind::KwElse,
            "WHILE" => TokenKind::KwWhile,
            "DO" => TokenKind::KwDo,
            "FOR" => TokenKind::KwFor,
            "TO" => TokenKind::KwTo,
            _ => return None,
        };
        Some(kind)
    }

    /// Upper-case code used by the token dump, e.g. `KW_BEGIN`, `SB_ASSIGN`.
    pub fn code(&self) -> &'static str {
        match self {
            TokenKind::Ident => "TK_IDENT",
            TokenKind::Number => "TK_NUMBER",
            TokenKind::Char => "TK_CHAR",
            TokenKind::Eof => "TK_EOF",
            TokenKind::KwProgram => "KW_PROGRAM",
            TokenKind::KwConst => "KW_CONST",
            TokenKind::KwType => "KW_TYPE",
            TokenKind::KwVar => "KW_VAR",
            TokenKind::KwInteger => "KW_INTEGER",
            TokenKind::KwChar => "KW_CHAR",
            TokenKind::KwArray => "KW_ARRAY",
            TokenKind::KwOf => "KW_OF",
            TokenKind::KwFunction => "KW_FUNCTION",
            TokenKind::KwProcedure => "KW_PROCEDURE",
            TokenKind::KwBegin => "KW_BEGIN",
            TokenKind::KwEnd => "KW_END",
            TokenKind::KwCall => "KW_CALL",
            TokenKind::KwIf => "KW_IF",
            TokenKind::KwThen => "KW_THEN",
            TokenKind::KwElse => "KW_ELSE",
            TokenKind::KwWhile => "KW_WHILE",
            TokenKind::KwDo => "KW_DO",
            TokenKind::KwFor => "KW_FOR",
            TokenKind::KwTo => "KW_TO",
            TokenKind::Semicolon => "SB_SEMICOLON",
            TokenKind::Colon => "SB_COLON",
            TokenKind::Period => "SB_PERIOD",
            TokenKind::Comma => "SB_COMMA",
            TokenKind::Assign => "SB_ASSIGN",
            TokenKind::Eq => "SB_EQ",
            TokenKind::Neq => "SB_NEQ",
            TokenKind::Lt => "SB_LT",
            TokenKind::Le => "SB_LE",
            TokenKind::Gt => "SB_GT",
            TokenKind::Ge => "SB_GE",
            TokenKind::Plus => "SB_PLUS",
            TokenKind::Minus => "SB_MINUS",
            TokenKind::Times => "SB_TIMES",
            TokenKind::Slash => "SB_SLASH",
            TokenKind::LPar => "SB_LPAR",
            TokenKind::RPar => "SB_RPAR",
            TokenKind::LSel => "SB_LSEL",
            TokenKind::RSel => "SB_RSEL",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident => write!(f, "an identification"),
            TokenKind::Number => write!(f, "a number"),
            TokenKind::Char => write!(f, "a constant char"),
            TokenKind::Eof => write!(f, "end of file"),
            TokenKind::KwProgram => write!(f, "keyword PROGRAM"),
            TokenKind::KwConst => write!(f, "keyword CONST"),
            TokenKind::KwType => write!(f, "keyword TYPE"),
            TokenKind::KwVar => write!(f, "keyword VAR"),
            TokenKind::KwInteger => write!(f, "keyword INTEGER"),
            TokenKind::KwChar => write!(f, "keyword CHAR"),
            TokenKind::KwArray => write!(f, "keyword ARRAY"),
            TokenKind::KwOf => write!(f, "keyword OF"),
            TokenKind::KwFunction => write!(f, "keyword FUNCTION"),
            TokenKind::KwProcedure => write!(f, "keyword PROCEDURE"),
            TokenKind::KwBegin => write!(f, "keyword BEGIN"),
            TokenKind::KwEnd => write!(f, "keyword END"),
            TokenKind::KwCall => write!(f, "keyword CALL"),
            TokenKind::KwIf => write!(f, "keyword IF"),
            TokenKind::KwThen => write!(f, "keyword THEN"),
            TokenKind::KwElse => write!(f, "keyword ELSE"),
            TokenKind::KwWhile => write!(f, "keyword WHILE"),
            TokenKind::KwDo => write!(f, "keyword DO"),
            TokenKind::KwFor => write!(f, "keyword FOR"),
            TokenKind::KwTo => write!(f, "keyword TO"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Period => write!(f, "'.'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Assign => write!(f, "':='"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::Neq => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Times => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::LPar => write!(f, "'('"),
            TokenKind::RPar => write!(f, "')'"),
            TokenKind::LSel => write!(f, "'(.'"),
            TokenKind::RSel => write!(f, "'.)'"),
        }
    }
}

/// A scanned token.
///
/// `text` holds the spelling for identifiers and numbers and the single
/// character of a char literal; it is empty for keywords and symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    /// A keyword or symbol token, which carries no text.
    pub fn symbol(kind: TokenKind, location: SourceLocation) -> Self {
        Self::new(kind, String::new(), location)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident | TokenKind::Number => {
                write!(f, "{}({})", self.kind.code(), self.text)
            }
            TokenKind::Char => write!(f, "{}('{}')", self.kind.code(), self.text),
            _ => write!(f, "{}", self.kind.code()),
        }
    }
}

/// Anything the parser's cursor can pull tokens from.
///
/// Once input is exhausted a source keeps returning [`TokenKind::Eof`].
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, Diagnostic>;
}

/// Scanner over an in-memory KPL source
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Get next token
    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        self.skip_whitespace_and_comments()?;

        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Ok(Token::symbol(TokenKind::Eof, loc));
        };

        let kind = match ch {
            '\'' => return self.char_literal(loc),
            '0'..='9' => return self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' => return self.identifier_or_keyword(ch, loc),

            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Times,
            '/' => TokenKind::Slash,
            '=' => TokenKind::Eq,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ')' => TokenKind::RPar,
            '[' => TokenKind::LSel,
            ']' => TokenKind::RSel,
            '<' => {
                if self.match_char('=') {
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.match_char('=') {
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '!' => {
                if self.match_char('=') {
                    TokenKind::Neq
                } else {
                    return Err(Diagnostic::new(ErrorKind::InvalidSymbol, loc));
                }
            }
            ':' => {
                if self.match_char('=') {
                    TokenKind::Assign
                } else {
                    TokenKind::Colon
                }
            }
            '.' => {
                if self.match_char(')') {
                    TokenKind::RSel
                } else {
                    TokenKind::Period
                }
            }
            '(' => {
                // "(*" never reaches here; comments are skipped above
                if self.match_char('.') {
                    TokenKind::LSel
                } else {
                    TokenKind::LPar
                }
            }

            _ => return Err(Diagnostic::new(ErrorKind::InvalidSymbol, loc)),
        };

        Ok(Token::symbol(kind, loc))
    }

    /// Parse character literal: exactly one printable character between quotes
    fn char_literal(&mut self, loc: SourceLocation) -> Result<Token, Diagnostic> {
        let invalid = Diagnostic::new(ErrorKind::InvalidCharConstant, loc);

        let ch = match self.advance() {
            Some(ch) if ch == ' ' || ch.is_ascii_graphic() => ch,
            _ => return Err(invalid),
        };
        if !self.match_char('\'') {
            return Err(invalid);
        }

        Ok(Token::new(TokenKind::Char, ch.to_string(), loc))
    }

    /// Parse numeric literal (unsigned decimal)
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Result<Token, Diagnostic> {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if num_str.parse::<i32>().is_err() {
            return Err(Diagnostic::new(ErrorKind::NumberTooLarge, loc));
        }

        Ok(Token::new(TokenKind::Number, num_str, loc))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Result<Token, Diagnostic> {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if ident.len() > MAX_IDENT_LEN {
            return Err(Diagnostic::new(ErrorKind::IdentTooLong, loc));
        }

        Ok(match TokenKind::keyword(&ident) {
            Some(kind) => Token::symbol(kind, loc),
            None => Token::new(TokenKind::Ident, ident, loc),
        })
    }

    /// Skip whitespace and `(* ... *)` comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), Diagnostic> {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('(') if self.peek_ahead(1) == Some('*') => {
                    self.skip_block_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), Diagnostic> {
        let start_loc = self.current_location();
        self.advance(); // skip '('
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some(')') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(Diagnostic::new(ErrorKind::EndOfComment, start_loc))
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Consume the next character if it is `expected`
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Result<Token, Diagnostic> {
        Lexer::next_token(self)
    }
}
