//! Recursive descent parser implementation

use bytelog_ast::*;
use bytelog_lexer::{Token, TokenKind};

use crate::ParseError;

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    // === Utilities ===

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| {
            self.tokens.last().expect("tokens should have at least EOF")
        })
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else if self.at(TokenKind::Error) {
            Err(ParseError::InvalidCharacter {
                span: self.current().span,
            })
        } else {
            Err(ParseError::unexpected(
                kind.describe(),
                self.peek(),
                self.current().span,
            ))
        }
    }

    fn text(&self, token: &Token) -> &'a str {
        token.text(self.source)
    }

    fn span(&self) -> Span {
        self.current().span
    }

    // === Program ===

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let start = self.span();
        let mut statements = Vec::new();

        while !self.at(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }

        let end = self.span();
        Ok(Program {
            statements,
            span: start.merge(end),
        })
    }

    // === Statements ===

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.span();

        let kind = match self.peek() {
            TokenKind::Rel => StatementKind::Rel(self.parse_rel_decl()?),
            TokenKind::Fact => StatementKind::Fact(self.parse_fact()?),
            TokenKind::Rule => StatementKind::Rule(self.parse_rule()?),
            TokenKind::Solve => {
                self.advance();
                StatementKind::Solve
            }
            TokenKind::Query => StatementKind::Query(self.parse_query()?),
            TokenKind::Error => {
                return Err(ParseError::InvalidCharacter { span: start });
            }
            _ => {
                return Err(ParseError::ExpectedStatement { span: start });
            }
        };

        let end = self.tokens[self.pos - 1].span;
        Ok(Statement {
            kind,
            span: start.merge(end),
        })
    }

    fn parse_rel_decl(&mut self) -> Result<RelDecl, ParseError> {
        self.consume(TokenKind::Rel)?;
        let name_token = self.consume(TokenKind::Ident)?;
        let name = self.text(&name_token).to_string();
        Ok(RelDecl { name })
    }

    fn parse_fact(&mut self) -> Result<FactStmt, ParseError> {
        self.consume(TokenKind::Fact)?;
        let rel_token = self.consume(TokenKind::Ident)?;
        let relation = self.text(&rel_token).to_string();
        let a = self.parse_fact_arg()?;
        let b = self.parse_fact_arg()?;

        Ok(FactStmt { relation, a, b })
    }

    fn parse_fact_arg(&mut self) -> Result<FactArg, ParseError> {
        match self.peek() {
            TokenKind::Ident => {
                let token = self.advance();
                Ok(FactArg::Atom(token.text(self.source).to_string()))
            }
            TokenKind::Int => {
                let value = self.parse_int()?;
                Ok(FactArg::Int(value))
            }
            found => Err(ParseError::unexpected(
                "identifier or integer",
                found,
                self.span(),
            )),
        }
    }

    fn parse_rule(&mut self) -> Result<RuleStmt, ParseError> {
        self.consume(TokenKind::Rule)?;
        let target_token = self.consume(TokenKind::Ident)?;
        let target = self.text(&target_token).to_string();
        self.consume(TokenKind::Colon)?;

        // body_op ("," body_op)* "," emit
        let mut body = vec![self.parse_body_op()?];
        let emit = loop {
            self.consume(TokenKind::Comma)?;
            match self.peek() {
                TokenKind::Scan | TokenKind::Join => body.push(self.parse_body_op()?),
                TokenKind::Emit => break self.parse_emit()?,
                found => {
                    return Err(ParseError::unexpected(
                        "'SCAN', 'JOIN', or 'EMIT'",
                        found,
                        self.span(),
                    ));
                }
            }
        };

        Ok(RuleStmt { target, body, emit })
    }

    fn parse_body_op(&mut self) -> Result<BodyOp, ParseError> {
        let start = self.span();
        let kind = match self.peek() {
            TokenKind::Scan => BodyOpKind::Scan(self.parse_scan()?),
            TokenKind::Join => BodyOpKind::Join(self.parse_join()?),
            found => {
                return Err(ParseError::unexpected("'SCAN' or 'JOIN'", found, start));
            }
        };
        let end = self.tokens[self.pos - 1].span;
        Ok(BodyOp {
            kind,
            span: start.merge(end),
        })
    }

    fn parse_scan(&mut self) -> Result<Scan, ParseError> {
        self.consume(TokenKind::Scan)?;
        let rel_token = self.consume(TokenKind::Ident)?;
        let relation = self.text(&rel_token).to_string();

        let match_var = if self.at(TokenKind::Match) {
            self.advance();
            Some(self.parse_variable()?)
        } else {
            None
        };

        Ok(Scan {
            relation,
            match_var,
        })
    }

    fn parse_join(&mut self) -> Result<Join, ParseError> {
        self.consume(TokenKind::Join)?;
        let rel_token = self.consume(TokenKind::Ident)?;
        let relation = self.text(&rel_token).to_string();
        let match_var = self.parse_variable()?;

        Ok(Join {
            relation,
            match_var,
        })
    }

    fn parse_emit(&mut self) -> Result<Emit, ParseError> {
        let start = self.span();
        self.consume(TokenKind::Emit)?;
        let rel_token = self.consume(TokenKind::Ident)?;
        let relation = self.text(&rel_token).to_string();
        let var_a = self.parse_variable()?;
        let var_b = self.parse_variable()?;
        let end = self.tokens[self.pos - 1].span;

        Ok(Emit {
            relation,
            var_a,
            var_b,
            span: start.merge(end),
        })
    }

    fn parse_query(&mut self) -> Result<QueryStmt, ParseError> {
        self.consume(TokenKind::Query)?;
        let rel_token = self.consume(TokenKind::Ident)?;
        let relation = self.text(&rel_token).to_string();
        let a = self.parse_query_arg()?;
        let b = self.parse_query_arg()?;

        Ok(QueryStmt { relation, a, b })
    }

    fn parse_query_arg(&mut self) -> Result<QueryArg, ParseError> {
        match self.peek() {
            TokenKind::Ident => {
                let token = self.advance();
                Ok(QueryArg::Atom(token.text(self.source).to_string()))
            }
            TokenKind::Int => {
                let value = self.parse_int()?;
                Ok(QueryArg::Int(value))
            }
            TokenKind::Wildcard => {
                self.advance();
                Ok(QueryArg::Wildcard)
            }
            found => Err(ParseError::unexpected(
                "identifier, integer, or '?'",
                found,
                self.span(),
            )),
        }
    }

    // === Terminals ===

    fn parse_int(&mut self) -> Result<i32, ParseError> {
        let token = self.consume(TokenKind::Int)?;
        let span = token.span;
        token
            .text(self.source)
            .parse::<i32>()
            .map_err(|_| ParseError::IntegerOutOfRange { span })
    }

    fn parse_variable(&mut self) -> Result<u32, ParseError> {
        let token = self.consume(TokenKind::Variable)?;
        let span = token.span;
        token.text(self.source)[1..]
            .parse::<u32>()
            .map_err(|_| ParseError::IntegerOutOfRange { span })
    }
}
