use crate::token::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanErrType {
    #[error("Unexpected character: {0}")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error: {data}")]
pub struct ScanErr {
    pub data: ScanErrType,
    pub line: usize,
}

struct Scanner<'a> {
    str: &'a [char],
    index: usize,
    line: usize,
    errors: Vec<ScanErr>,
}

impl<'a> Scanner<'a> {
    fn advance(&mut self) -> Option<char> {
        let c = self.str.get(self.index).copied();
        if c.is_some() {
            self.index += 1;
        }
        c
    }

    // "match" is a keyword in the metalanguage already.
    fn match_next(&mut self, c: char) -> bool {
        let res = self.str.get(self.index).is_some_and(|d| c == *d);
        if res {
            self.index += 1;
        }
        res
    }

    fn peek(&self) -> Option<char> {
        self.str.get(self.index).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.str.get(self.index + 1).copied()
    }

    fn new(str: &'a [char]) -> Self {
        Self {
            index: 0,
            str,
            line: 1,
            errors: vec![],
        }
    }

    fn text(&self, start: usize) -> String {
        self.str[start..self.index].iter().collect()
    }

    fn error(&mut self, data: ScanErrType) {
        tracing::debug!(line = self.line, "{data}");
        self.errors.push(ScanErr {
            data,
            line: self.line,
        });
    }

    fn one_or_two(
        &mut self,
        single: (TokenType, &'static str),
        double: (TokenType, &'static str),
    ) -> (TokenType, &'static str) {
        if self.match_next('=') {
            double
        } else {
            single
        }
    }

    /// Called with the opening quote consumed. Returns `None` after recording
    /// an error if EOF or a newline comes before the closing quote.
    fn string(&mut self) -> Option<Token> {
        let start = self.index;
        while let Some(c) = self.peek() {
            match c {
                '"' => {
                    let content = self.text(start);
                    self.advance();
                    let lexeme = format!("\"{content}\"");
                    return Some(Token::new(
                        TokenType::String(content.into()),
                        lexeme,
                        self.line,
                    ));
                }
                '\n' => break,
                _ => {
                    self.advance();
                }
            }
        }
        self.error(ScanErrType::UnterminatedString);
        None
    }

    fn number(&mut self, start: usize) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // A trailing dot without digits is left for the next token.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let lexeme = self.text(start);
        // Digits with at most one inner dot always parse.
        let value = lexeme.parse().unwrap_or(f64::NAN);
        Token::number(value, &lexeme, self.line)
    }

    fn identifier(&mut self, start: usize) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let string = self.text(start);
        let data = TokenType::keyword(&string)
            .unwrap_or_else(|| TokenType::Identifier(string.as_str().into()));
        Token::new(data, string, self.line)
    }
}

/// Turns source text into tokens, always ending with `Eof`.
///
/// Lexical errors don't stop the scan. They are collected and returned next to
/// every token that could still be produced.
#[tracing::instrument(level = "debug", skip_all)]
pub fn scan(code: &str) -> (Vec<Token>, Vec<ScanErr>) {
    let chars = code.chars().collect::<Vec<_>>();
    let mut scanner = Scanner::new(&chars);
    let mut result = vec![];

    while let Some(c) = scanner.advance() {
        let start = scanner.index - 1;
        let (tok, lexeme) = match c {
            '0'..='9' => {
                result.push(scanner.number(start));
                continue;
            }
            '(' => (TokenType::LeftParen, "("),
            ')' => (TokenType::RightParen, ")"),
            '{' => (TokenType::LeftBrace, "{"),
            '}' => (TokenType::RightBrace, "}"),
            ',' => (TokenType::Comma, ","),
            '.' => (TokenType::Dot, "."),
            '+' => (TokenType::Plus, "+"),
            '-' => (TokenType::Minus, "-"),
            '*' => (TokenType::Star, "*"),
            ';' => (TokenType::Semicolon, ";"),
            '/' => {
                if scanner.match_next('/') {
                    while !matches!(scanner.peek(), Some('\n') | None) {
                        scanner.advance();
                    }
                    continue;
                }
                (TokenType::Slash, "/")
            }
            '>' => scanner.one_or_two((TokenType::Greater, ">"), (TokenType::GreaterEqual, ">=")),
            '=' => scanner.one_or_two((TokenType::Equal, "="), (TokenType::EqualEqual, "==")),
            '<' => scanner.one_or_two((TokenType::Less, "<"), (TokenType::LessEqual, "<=")),
            '!' => scanner.one_or_two((TokenType::Bang, "!"), (TokenType::BangEqual, "!=")),
            '\n' => {
                scanner.line += 1;
                continue;
            }
            '\r' | '\t' | ' ' => continue,
            '"' => {
                if let Some(tok) = scanner.string() {
                    result.push(tok);
                }
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                result.push(scanner.identifier(start));
                continue;
            }
            c => {
                scanner.error(ScanErrType::UnexpectedCharacter(c));
                continue;
            }
        };

        result.push(Token::new(tok, lexeme, scanner.line));
    }

    result.push(Token::eof(scanner.line));
    tracing::debug!(
        tokens = result.len(),
        errors = scanner.errors.len(),
        "scan finished"
    );
    (result, scanner.errors)
}
