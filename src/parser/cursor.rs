//! Two-token lookahead window
//!
//! [`TokenCursor`] holds the token last consumed (`current`) and the next
//! unconsumed one (`lookahead`). Every grammar decision is made by peeking at
//! `lookahead`; [`TokenCursor::advance`] commits it.

use super::ast::SourceLocation;
use super::lexer::{Token, TokenKind, TokenSource};
use crate::diagnostics::Diagnostic;
use log::trace;

/// Cursor over a [`TokenSource`]
pub struct TokenCursor {
    source: Box<dyn TokenSource>,
    current: Option<Token>,
    lookahead: Token,
}

impl TokenCursor {
    /// Prime the window by pulling the first token.
    pub fn new(mut source: Box<dyn TokenSource>) -> Result<Self, Diagnostic> {
        let lookahead = source.next_token()?;
        Ok(Self {
            source,
            current: None,
            lookahead,
        })
    }

    /// Last consumed token, `None` before the first advance.
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.lookahead.kind
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.lookahead.kind == kind
    }

    /// Position of the last consumed token, or of the lookahead if nothing
    /// has been consumed yet.
    pub fn current_location(&self) -> SourceLocation {
        self.current()
            .map_or(self.lookahead.location, |t| t.location)
    }

    pub fn lookahead_location(&self) -> SourceLocation {
        self.lookahead.location
    }

    /// Shift lookahead into current and pull a fresh lookahead.
    ///
    /// The previous current token is dropped here.
    pub fn advance(&mut self) -> Result<&Token, Diagnostic> {
        let next = self.source.next_token()?;
        let consumed = std::mem::replace(&mut self.lookahead, next);
        trace!("shift {} at {}", consumed, consumed.location);
        Ok(self.current.insert(consumed))
    }

    /// Consume lookahead if it has `kind`; otherwise report it as missing
    /// without consuming anything.
    pub fn expect(&mut self, kind: TokenKind) -> Result<&Token, Diagnostic> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(Diagnostic::missing_token(
                kind,
                self.lookahead.kind,
                self.lookahead.location,
            ))
        }
    }
}

/// A prepared token sequence, used to drive the parser without source text.
///
/// After the last token the stream yields end-of-file at the last token's
/// position.
pub struct TokenStream {
    tokens: std::vec::IntoIter<Token>,
    end: SourceLocation,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens
            .last()
            .map_or_else(|| SourceLocation::new(1, 1), |t| t.location);
        Self {
            tokens: tokens.into_iter(),
            end,
        }
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Result<Token, Diagnostic> {
        Ok(self
            .tokens
            .next()
            .unwrap_or_else(|| Token::symbol(TokenKind::Eof, self.end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;

    fn at(column: usize) -> SourceLocation {
        SourceLocation::new(1, column)
    }

    fn cursor(tokens: Vec<Token>) -> TokenCursor {
        TokenCursor::new(Box::new(TokenStream::new(tokens))).unwrap()
    }

    #[test]
    fn test_window_shifts_one_token_at_a_time() {
        let mut cursor = cursor(vec![
            Token::symbol(TokenKind::KwBegin, at(1)),
            Token::symbol(TokenKind::KwEnd, at(7)),
        ]);

        assert!(cursor.current().is_none());
        assert!(cursor.check(TokenKind::KwBegin));

        cursor.advance().unwrap();
        assert_eq!(cursor.current().unwrap().kind, TokenKind::KwBegin);
        assert_eq!(cursor.peek_kind(), TokenKind::KwEnd);

        cursor.advance().unwrap();
        assert_eq!(cursor.current().unwrap().kind, TokenKind::KwEnd);
        assert_eq!(cursor.peek_kind(), TokenKind::Eof);
        assert_eq!(cursor.lookahead_location(), at(7));
    }

    #[test]
    fn test_expect_consumes_matching_token() {
        let mut cursor = cursor(vec![Token::new(TokenKind::Ident, "x", at(1))]);

        let token = cursor.expect(TokenKind::Ident).unwrap();
        assert_eq!(token.text, "x");
        assert!(cursor.check(TokenKind::Eof));
    }

    #[test]
    fn test_expect_mismatch_reports_lookahead_and_consumes_nothing() {
        let mut cursor = cursor(vec![
            Token::symbol(TokenKind::KwProgram, at(1)),
            Token::symbol(TokenKind::Period, at(9)),
        ]);
        cursor.advance().unwrap();

        let err = cursor.expect(TokenKind::Ident).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::MissingToken {
                expected: TokenKind::Ident,
                found: TokenKind::Period,
            }
        );
        assert_eq!(err.location, at(9));
        assert_eq!(cursor.current().unwrap().kind, TokenKind::KwProgram);
        assert!(cursor.check(TokenKind::Period));
    }
}
