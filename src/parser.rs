use crate::expr::*;
use crate::statement::Stmt;
use crate::token::*;

use std::{fmt, rc::Rc};
use thiserror::Error;

type ExprResult = Result<ExprRef, ParseErr>;

/// Deepest nesting of groups, unary operators, assignments and blocks.
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrType {
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect {0}.")]
    ExpectedToken(&'static str),
    #[error("Invalid assignment target.")]
    NotLvalue,
    #[error("Too much nesting.")]
    TooDeep,
}

/// Where a syntax error was found: on a concrete lexeme or at end of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Lexeme(Rc<str>),
    End,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexeme(lexeme) => write!(f, " at '{lexeme}'"),
            Self::End => write!(f, " at end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error{location}: {data}")]
pub struct ParseErr {
    pub data: ParseErrType,
    pub line: usize,
    pub location: Location,
}

impl ParseErr {
    fn new(data: ParseErrType, source: &Token) -> Self {
        let location = match source.data {
            TokenType::Eof => Location::End,
            _ => Location::Lexeme(source.lexeme.clone()),
        };
        ParseErr {
            data,
            line: source.line,
            location,
        }
    }
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    index: usize,
    depth: usize,
    // Missing `;` is fatal only when set.
    strict: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], strict: bool) -> Parser<'a> {
        Parser {
            index: 0,
            depth: 0,
            tokens,
            strict,
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().map_or(true, |x| x.data == TokenType::Eof)
    }

    fn match_next_lits<const N: usize>(&mut self, ttypes: [TokenType; N]) -> bool {
        let res = self
            .peek()
            .is_some_and(|tok| ttypes.iter().any(|x| *x == tok.data));
        if res {
            self.index += 1;
        }

        res
    }

    /// Like `match_next_lits`, but hands back the operator a token maps to.
    fn match_op<Op: Copy, const N: usize>(
        &mut self,
        ops: [(TokenType, Op); N],
    ) -> Option<(Op, usize)> {
        let tok = self.peek()?;
        let (_, op) = ops.iter().find(|(t, _)| *t == tok.data)?;
        let res = (*op, tok.line);
        self.index += 1;
        Some(res)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.index += 1;
        }
    }

    fn check(&self, tok: &TokenType) -> bool {
        self.peek().map(|x| &x.data) == Some(tok)
    }

    fn error_here(&self, data: ParseErrType) -> ParseErr {
        match self.peek().or(self.tokens.last()) {
            Some(tok) => ParseErr::new(data, tok),
            None => ParseErr {
                data,
                line: 1,
                location: Location::End,
            },
        }
    }

    fn consume(&mut self, tok: &TokenType, expected: &'static str) -> Result<(), ParseErr> {
        if !self.check(tok) {
            return Err(self.error_here(ParseErrType::ExpectedToken(expected)));
        }
        self.index += 1;
        Ok(())
    }

    fn consume_identifier(&mut self) -> Result<(Rc<str>, usize), ParseErr> {
        if let Some(Token {
            data: TokenType::Identifier(id),
            line,
            ..
        }) = self.peek()
        {
            let ret = (id.clone(), *line);
            self.index += 1;
            Ok(ret)
        } else {
            Err(self.error_here(ParseErrType::ExpectedToken("variable name")))
        }
    }

    /// Runs `f` one nesting level deeper, failing once `MAX_DEPTH` is reached.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseErr>,
    ) -> Result<T, ParseErr> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_here(ParseErrType::TooDeep));
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    fn terminate(&mut self, expected: &'static str) -> Result<(), ParseErr> {
        if self.strict {
            self.consume(&TokenType::Semicolon, expected)
        } else {
            self.match_next_lits([TokenType::Semicolon]);
            Ok(())
        }
    }

    // Parsing the actual grammar.
    #[tracing::instrument(level = "debug", skip_all, fields(strict = self.strict))]
    pub fn parse(&mut self) -> Result<Vec<Stmt>, ParseErr> {
        let mut res = vec![];
        while !self.is_at_end() {
            res.push(self.statement()?);
        }
        tracing::debug!(statements = res.len(), "parse finished");
        Ok(res)
    }

    fn statement(&mut self) -> Result<Stmt, ParseErr> {
        if self.match_next_lits([TokenType::Print]) {
            self.print_statement()
        } else if self.match_next_lits([TokenType::Var]) {
            self.var_declaration()
        } else if self.match_next_lits([TokenType::LeftBrace]) {
            Ok(Stmt::Block(self.nested(Self::block)?))
        } else {
            self.expression_statement()
        }
    }

    fn var_declaration(&mut self) -> Result<Stmt, ParseErr> {
        let (id, line) = self.consume_identifier()?;
        let value = if self.match_next_lits([TokenType::Equal]) {
            Some(self.expression()?)
        } else {
            None
        };
        self.terminate("';' after variable declaration")?;
        Ok(Stmt::Declare(id, value, line))
    }

    fn block(&mut self) -> Result<Vec<Stmt>, ParseErr> {
        let mut res = vec![];
        while !self.is_at_end() && !self.check(&TokenType::RightBrace) {
            res.push(self.statement()?);
        }
        self.consume(&TokenType::RightBrace, "'}' after block")?;
        Ok(res)
    }

    fn print_statement(&mut self) -> Result<Stmt, ParseErr> {
        let res = self.expression()?;
        self.terminate("';' after value")?;
        Ok(Stmt::Print(res))
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseErr> {
        let res = self.expression()?;
        self.terminate("';' after expression")?;
        Ok(Stmt::Expr(res))
    }

    fn expression(&mut self) -> ExprResult {
        self.assignment()
    }

    fn assignment(&mut self) -> ExprResult {
        let expr = self.equality()?;
        if self.check(&TokenType::Equal) {
            let equals = self.error_here(ParseErrType::NotLvalue);
            self.index += 1;
            let val = self.nested(Self::assignment)?;
            if let Expr::Variable(id, line) = *expr {
                Ok(Box::new(Expr::Assignment(id, val, line)))
            } else {
                Err(equals)
            }
        } else {
            Ok(expr)
        }
    }

    fn equality(&mut self) -> ExprResult {
        let mut expr = self.comparison()?;

        while let Some((op, line)) = self.match_op([
            (TokenType::BangEqual, BinaryOp::NotEqual),
            (TokenType::EqualEqual, BinaryOp::Equal),
        ]) {
            let right = self.comparison()?;
            expr = Box::new(Expr::Binary(op, expr, right, line));
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ExprResult {
        let mut expr = self.term()?;

        while let Some((op, line)) = self.match_op([
            (TokenType::Greater, BinaryOp::Greater),
            (TokenType::GreaterEqual, BinaryOp::GreaterEqual),
            (TokenType::Less, BinaryOp::Less),
            (TokenType::LessEqual, BinaryOp::LessEqual),
        ]) {
            let right = self.term()?;
            expr = Box::new(Expr::Binary(op, expr, right, line));
        }

        Ok(expr)
    }

    fn term(&mut self) -> ExprResult {
        let mut expr = self.factor()?;

        while let Some((op, line)) = self.match_op([
            (TokenType::Plus, BinaryOp::Add),
            (TokenType::Minus, BinaryOp::Sub),
        ]) {
            let right = self.factor()?;
            expr = Box::new(Expr::Binary(op, expr, right, line));
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ExprResult {
        let mut expr = self.unary()?;

        while let Some((op, line)) = self.match_op([
            (TokenType::Slash, BinaryOp::Div),
            (TokenType::Star, BinaryOp::Mul),
        ]) {
            let right = self.unary()?;
            expr = Box::new(Expr::Binary(op, expr, right, line));
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ExprResult {
        if let Some((op, line)) = self.match_op([
            (TokenType::Bang, UnaryOp::Not),
            (TokenType::Minus, UnaryOp::Negate),
        ]) {
            Ok(Box::new(Expr::Unary(op, self.nested(Self::unary)?, line)))
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> ExprResult {
        let Some(tok) = self.peek() else {
            return Err(self.error_here(ParseErrType::ExpectedExpression));
        };
        let res = match &tok.data {
            TokenType::True => Expr::Literal(Val::Bool(true)),
            TokenType::False => Expr::Literal(Val::Bool(false)),
            TokenType::Nil => Expr::Literal(Val::Nil),
            TokenType::Number(x) => {
                let text = match &tok.literal {
                    Some(text) => text.clone(),
                    None => canonical_number(&tok.lexeme).into(),
                };
                Expr::Number(*x, text)
            }
            TokenType::String(x) => Expr::Literal(Val::String(x.clone())),
            TokenType::Identifier(x) => Expr::Variable(x.clone(), tok.line),
            TokenType::LeftParen => {
                return self.nested(|p| {
                    p.advance();
                    let inner = p.expression()?;
                    p.consume(&TokenType::RightParen, "')' after expression")?;
                    Ok(Box::new(Expr::Grouping(inner)))
                });
            }
            _ => return Err(self.error_here(ParseErrType::ExpectedExpression)),
        };

        self.advance();
        Ok(Box::new(res))
    }
}
