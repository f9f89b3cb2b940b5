//! Expression parsing implementation
//!
//! Three precedence tiers, lowest first:
//!
//! ```text
//! expr      ::= ["+" | "-"] term (("+" | "-") term)*
//! term      ::= factor (("*" | "/") factor)*
//! factor    ::= number | char | ident [args] [indexes]
//! condition ::= expr relop expr
//! args      ::= "(" expr ("," expr)* ")" | ε
//! indexes   ::= ("(." expr ".)")*
//! ```
//!
//! The leading sign of an expression applies to its first term only, so
//! `-2+3` is `(-2)+3`. Binary operators associate to the left.
//!
//! Each trailing-operator loop stops only on a token from its continuation
//! set (see [`follow`](crate::parser::follow)); any other token is reported
//! as a defect of that tier.

use crate::diagnostics::{Diagnostic, ErrorKind};
use crate::parser::ast::{BinOp, Condition, Expr, RelOp, UnOp};
use crate::parser::follow::{ARGUMENTS_FOLLOW, EXPRESSION_FOLLOW, TERM_FOLLOW};
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{char_value, number_value, Parser};

impl Parser {
    pub(crate) fn compile_expression(&mut self) -> Result<Expr, Diagnostic> {
        let location = self.lookahead_location();
        let sign = match self.peek() {
            TokenKind::Plus => Some(UnOp::Plus),
            TokenKind::Minus => Some(UnOp::Neg),
            _ => None,
        };
        if sign.is_some() {
            self.advance()?;
        }

        let term = self.compile_term()?;
        let first = match sign {
            Some(op) => Expr::UnaryOp {
                op,
                operand: Box::new(term),
                location,
            },
            None => term,
        };

        self.compile_expression_tail(first)
    }

    /// Trailing `+`/`-` loop after the first term
    fn compile_expression_tail(&mut self, first: Expr) -> Result<Expr, Diagnostic> {
        let mut left = first;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                kind if EXPRESSION_FOLLOW.contains(&kind) => return Ok(left),
                _ => return self.error(ErrorKind::InvalidExpression),
            };
            let location = self.lookahead_location();
            self.advance()?;

            let right = self.compile_term()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }
    }

    pub(crate) fn compile_term(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.compile_factor()?;
        loop {
            let op = match self.peek() {
                TokenKind::Times => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                kind if TERM_FOLLOW.contains(&kind) => return Ok(left),
                _ => return self.error(ErrorKind::InvalidTerm),
            };
            let location = self.lookahead_location();
            self.advance()?;

            let right = self.compile_factor()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }
    }

    pub(crate) fn compile_factor(&mut self) -> Result<Expr, Diagnostic> {
        match self.peek() {
            TokenKind::Number => {
                let token = self.advance()?;
                let location = token.location;
                Ok(Expr::IntLiteral(number_value(token)?, location))
            }
            TokenKind::Char => {
                let token = self.advance()?;
                Ok(Expr::CharLiteral(char_value(token), token.location))
            }
            TokenKind::Ident => {
                let (name, location) = self.expect_ident()?;
                let binding = self.table.lookup(&name);
                let args = if self.check(TokenKind::LPar) {
                    self.compile_arguments()?
                } else {
                    None
                };
                let indexes = self.compile_indexes()?;

                Ok(Expr::Name {
                    name,
                    binding,
                    args,
                    indexes,
                    location,
                })
            }
            _ => self.error(ErrorKind::InvalidFactor),
        }
    }

    /// Parenthesized argument list, or `None` when lookahead shows the list
    /// was omitted.
    pub(crate) fn compile_arguments(&mut self) -> Result<Option<Vec<Expr>>, Diagnostic> {
        match self.peek() {
            TokenKind::LPar => {
                self.advance()?;
                let mut args = vec![self.compile_expression()?];
                while self.check(TokenKind::Comma) {
                    self.advance()?;
                    args.push(self.compile_expression()?);
                }
                self.cursor.expect(TokenKind::RPar)?;
                Ok(Some(args))
            }
            kind if ARGUMENTS_FOLLOW.contains(&kind) => Ok(None),
            _ => self.error(ErrorKind::InvalidArguments),
        }
    }

    pub(crate) fn compile_condition(&mut self) -> Result<Condition, Diagnostic> {
        let left = self.compile_expression()?;
        let op = match self.peek() {
            TokenKind::Eq => RelOp::Eq,
            TokenKind::Neq => RelOp::Ne,
            TokenKind::Le => RelOp::Le,
            TokenKind::Lt => RelOp::Lt,
            TokenKind::Ge => RelOp::Ge,
            TokenKind::Gt => RelOp::Gt,
            _ => return self.error(ErrorKind::InvalidComparator),
        };
        self.advance()?;
        let right = self.compile_expression()?;

        Ok(Condition { left, op, right })
    }

    pub(crate) fn compile_indexes(&mut self) -> Result<Vec<Expr>, Diagnostic> {
        let mut indexes = Vec::new();
        while self.check(TokenKind::LSel) {
            self.advance()?;
            indexes.push(self.compile_expression()?);
            self.cursor.expect(TokenKind::RSel)?;
        }
        Ok(indexes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{SourceLocation, Stmt};

    /// Parse `x := <expr>` inside a program declaring `x`, `a` and `f`.
    fn assigned(expr: &str) -> Result<Expr, Diagnostic> {
        let source = format!(
            "program P;\n\
             var x : integer; a : array(.5.) of array(.5.) of integer;\n\
             function f(n : integer) : integer; begin f := n end;\n\
             begin x := {} end.",
            expr
        );
        let mut parser = Parser::new(&source)?;
        let program = parser.compile_program()?;
        match parser.table().object(program).body() {
            Some([Stmt::Assign { value, .. }]) => Ok(value.clone()),
            other => panic!("Expected a single assignment, got {:?}", other),
        }
    }

    fn int(n: i32) -> impl Fn(&Expr) -> bool {
        move |e| matches!(e, Expr::IntLiteral(v, _) if *v == n)
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let expr = assigned("2+3*4").unwrap();

        let Expr::BinaryOp { op: BinOp::Add, left, right, .. } = expr else {
            panic!("Expected addition at the root");
        };
        assert!(int(2)(&left));
        let Expr::BinaryOp { op: BinOp::Mul, left, right, .. } = *right else {
            panic!("Expected multiplication on the right");
        };
        assert!(int(3)(&left));
        assert!(int(4)(&right));
    }

    #[test]
    fn test_leading_minus_applies_to_first_term() {
        let expr = assigned("-2+3").unwrap();

        let Expr::BinaryOp { op: BinOp::Add, left, right, .. } = expr else {
            panic!("Expected addition at the root");
        };
        assert!(matches!(*left, Expr::UnaryOp { op: UnOp::Neg, ref operand, .. } if int(2)(operand)));
        assert!(int(3)(&right));
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let expr = assigned("10-4-3").unwrap();

        let Expr::BinaryOp { op: BinOp::Sub, left, right, .. } = expr else {
            panic!("Expected subtraction at the root");
        };
        assert!(matches!(*left, Expr::BinaryOp { op: BinOp::Sub, .. }));
        assert!(int(3)(&right));
    }

    #[test]
    fn test_call_and_index_factors() {
        let expr = assigned("f(1) + a(.1.)(.x.)").unwrap();

        let Expr::BinaryOp { left, right, .. } = expr else {
            panic!("Expected addition at the root");
        };
        assert!(matches!(&*left, Expr::Name { name, args: Some(args), .. } if name == "f" && args.len() == 1));
        assert!(matches!(&*right, Expr::Name { name, args: None, indexes, .. } if name == "a" && indexes.len() == 2));
    }

    #[test]
    fn test_stray_tokens_report_their_tier() {
        // ':' can follow neither a term nor an expression
        let err = assigned("1 :").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTerm);
        assert_eq!(err.location, SourceLocation::new(4, 14));

        // '(' after a literal is not a continuation of the term
        let err = assigned("1 (2)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTerm);

        let err = assigned("*2").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidFactor);
        assert_eq!(err.location, SourceLocation::new(4, 12));
    }

    #[test]
    fn test_comparator_required_and_non_associative() {
        let source = "program P; var x : integer; begin if x then x := 1 end.";
        let err = Parser::new(source).unwrap().compile_program().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidComparator);

        let source = "program P; var x : integer; begin if 1 < x < 2 then x := 1 end.";
        let err = Parser::new(source).unwrap().compile_program().unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::MissingToken {
                expected: TokenKind::KwThen,
                found: TokenKind::Lt,
            }
        );
    }

    #[test]
    fn test_call_statement_rejects_stray_argument_token() {
        let source = "program P; begin call WRITELN 1 end.";
        let err = Parser::new(source).unwrap().compile_program().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArguments);
    }

    #[test]
    fn test_names_resolve_to_nearest_declaration() {
        let source = "program P;\n\
                      var x : char;\n\
                      procedure Q(x : integer);\n\
                      begin x := 1 end;\n\
                      begin x := 'c' end.";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.compile_program().unwrap();
        let table = parser.table();

        let program_scope = table.object(program).scope().unwrap();
        let outer_x = table.lookup_in(program_scope, "x").unwrap();
        let q = table.lookup_in(program_scope, "Q").unwrap();
        let param_x = table.object(q).params()[0];

        let Some([Stmt::Assign { target, .. }]) = table.object(q).body() else {
            panic!("Expected one assignment in Q");
        };
        assert_eq!(target.binding, Some(param_x));

        let Some([Stmt::Assign { target, .. }]) = table.object(program).body() else {
            panic!("Expected one assignment in P");
        };
        assert_eq!(target.binding, Some(outer_x));
    }
}
