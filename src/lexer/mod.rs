//! Hand-rolled character scanner producing a `Token` stream from GP-λ source
//! text. See `spec.md` §4.1.

mod token;

pub use token::*;

use std::{iter::Peekable, str::Chars};

use crate::errors::{Position, SyntaxError};

pub type LexResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    iterator: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
        Self {
            iterator: input.chars().peekable(),
            line: 1,
            col: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.iterator.peek().copied()
    }

    fn peek_second(&self) -> Option<char> {
        let mut clone = self.iterator.clone();
        clone.next();
        clone.next()
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.iterator.next();
        match next {
            Some('\n') => {
                self.line += 1;
                self.col = 1;
            }
            Some(_) => self.col += 1,
            None => {}
        }
        next
    }

    fn position(&self) -> Position {
        (self.line, self.col)
    }

    fn eat_whitespace_and_comments(&mut self) -> LexResult<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.advance();
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let start = self.position();
                    self.advance();
                    self.advance();
                    loop {
                        match (self.peek(), self.peek_second()) {
                            (Some('*'), Some('/')) => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            (None, _) => {
                                return Err(SyntaxError::new(
                                    start,
                                    "unterminated block comment",
                                ))
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn lex_identifier_or_keyword(&mut self) -> Token {
        let start = self.position();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = match Keyword::from_str(&text) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(text.clone()),
        };
        Token::new(kind, start, text)
    }

    fn lex_number(&mut self) -> LexResult<Token> {
        let start = self.position();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match text.parse::<i32>() {
            Ok(value) => Ok(Token::new(TokenKind::Integer(value), start, text)),
            Err(_) => Err(SyntaxError::new(
                start,
                format!("integer literal '{text}' does not fit in a 32-bit signed integer"),
            )),
        }
    }

    fn lex_string(&mut self) -> LexResult<Token> {
        let start = self.position();
        self.advance(); // opening quote
        let mut raw = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(SyntaxError::new(start, "unterminated string literal"));
                }
                Some('\n') => {
                    return Err(SyntaxError::new(
                        self.position(),
                        "unescaped newline inside string literal",
                    ));
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    raw.push('\\');
                    self.advance();
                    match self.advance() {
                        Some(c) => raw.push(c),
                        None => {
                            return Err(SyntaxError::new(start, "unterminated string literal"))
                        }
                    }
                }
                Some(c) => {
                    raw.push(c);
                    self.advance();
                }
            }
        }
        Ok(Token::new(
            TokenKind::StringLiteral(raw.clone()),
            start,
            format!("\"{raw}\""),
        ))
    }

    fn lex_punct(&mut self) -> LexResult<Token> {
        let start = self.position();
        let first = self.advance().expect("caller checked a character is present");
        let second = self.peek();

        macro_rules! two {
            ($c:expr, $p:expr) => {
                if second == Some($c) {
                    self.advance();
                    return Ok(Token::new(
                        TokenKind::Punct($p),
                        start,
                        format!("{first}{}", $c),
                    ));
                }
            };
        }

        match first {
            '-' => {
                two!('>', Punct::Arrow);
                Ok(Token::new(TokenKind::Punct(Punct::Minus), start, "-"))
            }
            '=' => {
                two!('>', Punct::FatArrow);
                two!('=', Punct::EqEq);
                Ok(Token::new(TokenKind::Punct(Punct::Eq), start, "="))
            }
            '!' => {
                two!('=', Punct::NotEq);
                Ok(Token::new(TokenKind::Punct(Punct::Bang), start, "!"))
            }
            '<' => {
                two!('=', Punct::LtEq);
                Ok(Token::new(TokenKind::Punct(Punct::Lt), start, "<"))
            }
            '>' => {
                two!('=', Punct::GtEq);
                Ok(Token::new(TokenKind::Punct(Punct::Gt), start, ">"))
            }
            '&' if second == Some('&') => {
                self.advance();
                Ok(Token::new(TokenKind::Punct(Punct::AndAnd), start, "&&"))
            }
            '|' if second == Some('|') => {
                self.advance();
                Ok(Token::new(TokenKind::Punct(Punct::OrOr), start, "||"))
            }
            '+' => Ok(Token::new(TokenKind::Punct(Punct::Plus), start, "+")),
            '*' => Ok(Token::new(TokenKind::Punct(Punct::Star), start, "*")),
            '/' => Ok(Token::new(TokenKind::Punct(Punct::Slash), start, "/")),
            '%' => Ok(Token::new(TokenKind::Punct(Punct::Percent), start, "%")),
            '(' => Ok(Token::new(TokenKind::Punct(Punct::LParen), start, "(")),
            ')' => Ok(Token::new(TokenKind::Punct(Punct::RParen), start, ")")),
            '{' => Ok(Token::new(TokenKind::Punct(Punct::LBrace), start, "{")),
            '}' => Ok(Token::new(TokenKind::Punct(Punct::RBrace), start, "}")),
            ';' => Ok(Token::new(TokenKind::Punct(Punct::Semicolon), start, ";")),
            ',' => Ok(Token::new(TokenKind::Punct(Punct::Comma), start, ",")),
            ':' => Ok(Token::new(TokenKind::Punct(Punct::Colon), start, ":")),
            '.' => Ok(Token::new(TokenKind::Punct(Punct::Dot), start, ".")),
            other => Err(SyntaxError::new(
                start,
                format!("unexpected character '{other}'"),
            )),
        }
    }

    fn lex_one(&mut self) -> LexResult<Token> {
        self.eat_whitespace_and_comments()?;
        let Some(next) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, self.position(), ""));
        };
        match next {
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.lex_identifier_or_keyword()),
            '0'..='9' => self.lex_number(),
            '"' => self.lex_string(),
            _ => self.lex_punct(),
        }
    }

    /// Lex the entire input, returning tokens up to and including a trailing
    /// `Eof` token, or the first lex error encountered.
    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.lex_one()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }
}
