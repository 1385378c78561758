use std::{fmt, rc::Rc};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub data: TokenType,
    pub lexeme: Rc<str>,
    pub literal: Option<Rc<str>>,
    pub line: usize,
}

impl Token {
    pub fn new(data: TokenType, lexeme: impl Into<Rc<str>>, line: usize) -> Self {
        let literal = match &data {
            TokenType::String(s) => Some(s.clone()),
            _ => None,
        };
        Token {
            data,
            lexeme: lexeme.into(),
            literal,
            line,
        }
    }

    /// A number token keeps its canonical text as the literal payload.
    pub fn number(value: f64, lexeme: &str, line: usize) -> Self {
        Token {
            data: TokenType::Number(value),
            lexeme: lexeme.into(),
            literal: Some(canonical_number(lexeme).into()),
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Token::new(TokenType::Eof, "", line)
    }
}

/// Prints the `<KIND> <lexeme> <literal>` line used by `tokenize`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.data.name(),
            self.lexeme,
            self.literal.as_deref().unwrap_or("null")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Star,
    Slash,
    Semicolon,

    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    Identifier(Rc<str>),
    String(Rc<str>),
    Number(f64),

    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl TokenType {
    pub fn keyword(word: &str) -> Option<TokenType> {
        let kw = match word {
            "and" => TokenType::And,
            "class" => TokenType::Class,
            "else" => TokenType::Else,
            "false" => TokenType::False,
            "for" => TokenType::For,
            "fun" => TokenType::Fun,
            "if" => TokenType::If,
            "nil" => TokenType::Nil,
            "or" => TokenType::Or,
            "print" => TokenType::Print,
            "return" => TokenType::Return,
            "super" => TokenType::Super,
            "this" => TokenType::This,
            "true" => TokenType::True,
            "var" => TokenType::Var,
            "while" => TokenType::While,
            _ => return None,
        };
        Some(kw)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LeftParen => "LEFT_PAREN",
            Self::RightParen => "RIGHT_PAREN",
            Self::LeftBrace => "LEFT_BRACE",
            Self::RightBrace => "RIGHT_BRACE",
            Self::Comma => "COMMA",
            Self::Dot => "DOT",
            Self::Minus => "MINUS",
            Self::Plus => "PLUS",
            Self::Star => "STAR",
            Self::Slash => "SLASH",
            Self::Semicolon => "SEMICOLON",
            Self::Bang => "BANG",
            Self::BangEqual => "BANG_EQUAL",
            Self::Equal => "EQUAL",
            Self::EqualEqual => "EQUAL_EQUAL",
            Self::Greater => "GREATER",
            Self::GreaterEqual => "GREATER_EQUAL",
            Self::Less => "LESS",
            Self::LessEqual => "LESS_EQUAL",
            Self::Identifier(_) => "IDENTIFIER",
            Self::String(_) => "STRING",
            Self::Number(_) => "NUMBER",
            Self::And => "AND",
            Self::Class => "CLASS",
            Self::Else => "ELSE",
            Self::False => "FALSE",
            Self::Fun => "FUN",
            Self::For => "FOR",
            Self::If => "IF",
            Self::Nil => "NIL",
            Self::Or => "OR",
            Self::Print => "PRINT",
            Self::Return => "RETURN",
            Self::Super => "SUPER",
            Self::This => "THIS",
            Self::True => "TRUE",
            Self::Var => "VAR",
            Self::While => "WHILE",
            Self::Eof => "EOF",
        }
    }
}

/// Canonical decimal text for a number lexeme: `3` -> `3.0`, `1.2300` -> `1.23`.
pub fn canonical_number(lexeme: &str) -> String {
    match lexeme.split_once('.') {
        None => format!("{lexeme}.0"),
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{int}.0")
            } else {
                format!("{int}.{frac}")
            }
        }
    }
}
