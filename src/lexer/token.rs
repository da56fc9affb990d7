use crate::errors::Position;

/// A reserved word. Kept distinct from `Identifier` so the parser can match on
/// keywords without string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Func,
    Let,
    If,
    Else,
    Return,
    Assert,
    True,
    False,
    Int,
    String,
    Bool,
    Void,
    FuncType,
}

impl Keyword {
    pub fn from_str(text: &str) -> Option<Keyword> {
        Some(match text {
            "func" => Keyword::Func,
            "let" => Keyword::Let,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "return" => Keyword::Return,
            "assert" => Keyword::Assert,
            "true" => Keyword::True,
            "false" => Keyword::False,
            "Int" => Keyword::Int,
            "String" => Keyword::String,
            "Bool" => Keyword::Bool,
            "Void" => Keyword::Void,
            "Func" => Keyword::FuncType,
            _ => return None,
        })
    }
}

/// A punctuator or operator lexeme. One variant per surface token from
/// `spec.md` §4.1; multi-character tokens are matched before their
/// single-character prefixes by the lexer (e.g. `->` before `-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    Arrow,        // ->
    FatArrow,     // =>
    EqEq,         // ==
    NotEq,        // !=
    LtEq,         // <=
    GtEq,         // >=
    Lt,           // <
    Gt,           // >
    AndAnd,       // &&
    OrOr,         // ||
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Percent,      // %
    Bang,         // !
    Eq,           // =
    LParen,       // (
    RParen,       // )
    LBrace,       // {
    RBrace,       // }
    Semicolon,    // ;
    Comma,        // ,
    Colon,        // :
    Dot,          // .
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier(String),
    Integer(i32),
    /// Already-unescaped-at-lex-time raw text is NOT stored here: the lexer
    /// keeps the literal text between the quotes exactly as written so the
    /// AST Builder can perform escape processing exactly once (spec.md §4.3).
    StringLiteral(String),
    Punct(Punct),
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position, text: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            text: text.into(),
        }
    }

    /// A human-readable name for this token's kind, used in parser error
    /// messages ("expected X, found Y").
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Keyword(_) => format!("'{}'", self.text),
            TokenKind::Identifier(name) => format!("identifier '{name}'"),
            TokenKind::Integer(_) => format!("integer literal '{}'", self.text),
            TokenKind::StringLiteral(_) => format!("string literal {}", self.text),
            TokenKind::Punct(_) => format!("'{}'", self.text),
            TokenKind::Eof => "end of input".to_owned(),
        }
    }
}
