//! Hand-rolled recursive-descent parser for the query predicate grammar
//! (§4.O):
//!
//! ```text
//! query     := or_expr
//! or_expr   := and_expr ('or' and_expr)*
//! and_expr  := not_expr ('and' not_expr)*
//! not_expr  := 'not' primary | primary
//! primary   := '(' or_expr ')'
//!            | kind
//!            | ident ('.' ident ('(' str ')')?)?
//!            | ident op number
//! kind      := 'func' | 'var' | 'const' | 'struct' | 'enum'
//! op        := '==' | '!=' | '<' | '<=' | '>' | '>='
//! ```
//!
//! No parser-combinator crate: a plain token stream and a recursive set
//! of `parse_*` functions, one per grammar rule.

use thiserror::Error;

use crate::ast::DeclKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// The parsed predicate AST. Evaluated (not executed) against an
/// [`crate::ast::AstDecl`] by [`crate::eval::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Kind(DeclKind),
    /// Bare `ident`: true if the declaration carries that flag.
    Flag(String),
    /// `ident.ident(str)`: a named string-field method call.
    StringMethod {
        field: String,
        method: String,
        arg: String,
    },
    /// `ident op number`: a named numeric-field comparison.
    Numeric {
        field: String,
        op: CompareOp,
        value: f64,
    },
    Not(Box<Predicate>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of query")]
    UnexpectedEof,
    #[error("unexpected token {found:?} at position {pos}")]
    UnexpectedToken { found: String, pos: usize },
    #[error("expected closing `)` at position {pos}")]
    UnclosedParen { pos: usize },
    #[error("expected closing `\"` starting at position {pos}")]
    UnterminatedString { pos: usize },
    #[error("invalid number `{text}` at position {pos}")]
    InvalidNumber { text: String, pos: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Number(f64),
    Op(CompareOp),
    Dot,
    LParen,
    RParen,
    And,
    Or,
    Not,
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn tokenize(mut self) -> Result<Vec<(Token, usize)>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                break;
            }
            let start = self.pos;
            let c = self.bytes[self.pos] as char;
            let token = match c {
                '(' => {
                    self.pos += 1;
                    Token::LParen
                }
                ')' => {
                    self.pos += 1;
                    Token::RParen
                }
                '.' => {
                    self.pos += 1;
                    Token::Dot
                }
                '"' => self.lex_string(start)?,
                '=' | '!' | '<' | '>' => self.lex_op(start)?,
                '0'..='9' => self.lex_number(start)?,
                c if c.is_alphabetic() || c == '_' => self.lex_ident_or_keyword(start),
                other => {
                    return Err(ParseError::UnexpectedToken {
                        found: other.to_string(),
                        pos: start,
                    })
                }
            };
            tokens.push((token, start));
        }
        Ok(tokens)
    }

    fn lex_string(&mut self, start: usize) -> Result<Token, ParseError> {
        self.pos += 1; // opening quote
        let content_start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'"' {
            self.pos += 1;
        }
        if self.pos >= self.bytes.len() {
            return Err(ParseError::UnterminatedString { pos: start });
        }
        let content = self.src[content_start..self.pos].to_string();
        self.pos += 1; // closing quote
        Ok(Token::Str(content))
    }

    fn lex_op(&mut self, start: usize) -> Result<Token, ParseError> {
        let two = self.src.get(start..start + 2);
        let (op, len) = match (self.bytes[start] as char, two) {
            ('=', Some("==")) => (CompareOp::Eq, 2),
            ('!', Some("!=")) => (CompareOp::Ne, 2),
            ('<', Some("<=")) => (CompareOp::Le, 2),
            ('<', _) => (CompareOp::Lt, 1),
            ('>', Some(">=")) => (CompareOp::Ge, 2),
            ('>', _) => (CompareOp::Gt, 1),
            (other, _) => {
                return Err(ParseError::UnexpectedToken {
                    found: other.to_string(),
                    pos: start,
                })
            }
        };
        self.pos += len;
        Ok(Token::Op(op))
    }

    fn lex_number(&mut self, start: usize) -> Result<Token, ParseError> {
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_digit() || self.bytes[self.pos] == b'.')
        {
            self.pos += 1;
        }
        let text = &self.src[start..self.pos];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| ParseError::InvalidNumber {
                text: text.to_string(),
                pos: start,
            })
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> Token {
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_alphanumeric() || self.bytes[self.pos] == b'_')
        {
            self.pos += 1;
        }
        let text = &self.src[start..self.pos];
        match text {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            other => Token::Ident(other.to_string()),
        }
    }
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_pos(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, p)| *p)
            .unwrap_or(usize::MAX)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn parse_query(&mut self) -> Result<Predicate, ParseError> {
        let pred = self.parse_or()?;
        if self.pos != self.tokens.len() {
            return Err(ParseError::UnexpectedToken {
                found: format!("{:?}", self.tokens[self.pos].0),
                pos: self.tokens[self.pos].1,
            });
        }
        Ok(pred)
    }

    fn parse_or(&mut self) -> Result<Predicate, ParseError> {
        let mut lhs = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Predicate::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Predicate, ParseError> {
        let mut lhs = self.parse_not()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.advance();
            let rhs = self.parse_not()?;
            lhs = Predicate::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Predicate, ParseError> {
        if matches!(self.peek(), Some(Token::Not)) {
            self.advance();
            let inner = self.parse_primary()?;
            return Ok(Predicate::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Predicate, ParseError> {
        let pos = self.peek_pos();
        match self.advance() {
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(ParseError::UnclosedParen { pos }),
                }
            }
            Some(Token::Ident(name)) => self.parse_primary_from_ident(name),
            Some(other) => Err(ParseError::UnexpectedToken {
                found: format!("{other:?}"),
                pos,
            }),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn parse_primary_from_ident(&mut self, name: String) -> Result<Predicate, ParseError> {
        if let Some(kind) = DeclKind::from_str(&name) {
            return Ok(Predicate::Kind(kind));
        }

        match self.peek() {
            Some(Token::Dot) => {
                self.advance();
                let method_pos = self.peek_pos();
                let method = match self.advance() {
                    Some(Token::Ident(m)) => m,
                    _ => {
                        return Err(ParseError::UnexpectedToken {
                            found: "expected method name".to_string(),
                            pos: method_pos,
                        })
                    }
                };
                let paren_pos = self.peek_pos();
                match self.advance() {
                    Some(Token::LParen) => {}
                    _ => {
                        return Err(ParseError::UnexpectedToken {
                            found: "expected `(`".to_string(),
                            pos: paren_pos,
                        })
                    }
                }
                let arg_pos = self.peek_pos();
                let arg = match self.advance() {
                    Some(Token::Str(s)) => s,
                    _ => {
                        return Err(ParseError::UnexpectedToken {
                            found: "expected string literal".to_string(),
                            pos: arg_pos,
                        })
                    }
                };
                let close_pos = self.peek_pos();
                match self.advance() {
                    Some(Token::RParen) => {}
                    _ => return Err(ParseError::UnclosedParen { pos: close_pos }),
                }
                Ok(Predicate::StringMethod {
                    field: name,
                    method,
                    arg,
                })
            }
            Some(Token::Op(_)) => {
                let op = match self.advance() {
                    Some(Token::Op(op)) => op,
                    _ => unreachable!(),
                };
                let value_pos = self.peek_pos();
                let value = match self.advance() {
                    Some(Token::Number(n)) => n,
                    _ => {
                        return Err(ParseError::UnexpectedToken {
                            found: "expected number".to_string(),
                            pos: value_pos,
                        })
                    }
                };
                Ok(Predicate::Numeric {
                    field: name,
                    op,
                    value,
                })
            }
            _ => Ok(Predicate::Flag(name)),
        }
    }
}

/// Parses a query predicate expression into a [`Predicate`] AST.
pub fn parse(src: &str) -> Result<Predicate, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    parser.parse_query()
}
