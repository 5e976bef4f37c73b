// src/js/lexer.rs

use super::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident,
    Number,
    /// Decoded string contents; the quoted source lives in `Token::raw`.
    Str(String),
    Regex,
    Punct,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub raw: &'a str,
    pub offset: usize,
    /// A line terminator sat between this token and the previous one.
    pub newline_before: bool,
}

// Longest first so greedy matching picks `>>>=` over `>>`.
const PUNCTUATORS: [&str; 48] = [
    ">>>=", "===", "!==", ">>>", "<<=", ">>=", "&&", "||", "==", "!=", "<=", ">=", "++", "--",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "{", "}", "(", ")", "[", "]", ";",
    ",", ".", "<", ">", "+", "-", "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=",
];

// Keywords after which a `/` starts a regex literal rather than a division.
const REGEX_PREFIX_KEYWORDS: [&str; 12] = [
    "return",
    "typeof",
    "instanceof",
    "in",
    "of",
    "new",
    "delete",
    "void",
    "throw",
    "case",
    "do",
    "else",
];

pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, ParseError> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    newline: bool,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            newline: false,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token<'a>>, ParseError> {
        loop {
            self.skip_trivia()?;
            let start = self.pos;

            let Some(c) = self.peek() else {
                self.push(TokenKind::Eof, start);
                return Ok(self.tokens);
            };

            if is_ident_start(c) {
                self.bump_while(is_ident_part);
                self.push(TokenKind::Ident, start);
            } else if c.is_ascii_digit()
                || (c == '.' && self.byte_at(1).is_some_and(|b| b.is_ascii_digit()))
            {
                self.number()?;
                self.push(TokenKind::Number, start);
            } else if c == '"' || c == '\'' {
                let value = self.string(c)?;
                self.push(TokenKind::Str(value), start);
            } else if c == '/' && self.regex_allowed() {
                self.regex()?;
                self.push(TokenKind::Regex, start);
            } else {
                let rest = &self.src[self.pos..];
                let punct = PUNCTUATORS
                    .iter()
                    .find(|p| rest.starts_with(**p))
                    .ok_or_else(|| ParseError::new(format!("unexpected character {c:?}"), start))?;
                self.pos += punct.len();
                self.push(TokenKind::Punct, start);
            }
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token {
            kind,
            raw: &self.src[start..self.pos],
            offset: start,
            newline_before: self.newline,
        });
        self.newline = false;
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn byte_at(&self, ahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + ahead).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(c) if is_line_terminator(c) => {
                    self.newline = true;
                    self.bump();
                }
                Some(c) if c.is_whitespace() || c == '\u{feff}' => {
                    self.bump();
                }
                Some('/') if self.byte_at(1) == Some(b'/') => {
                    self.bump_while(|c| !is_line_terminator(c));
                }
                Some('/') if self.byte_at(1) == Some(b'*') => {
                    let start = self.pos;
                    let body = &self.src[self.pos + 2..];
                    let end = body
                        .find("*/")
                        .ok_or_else(|| ParseError::new("unterminated block comment", start))?;
                    if body[..end].chars().any(is_line_terminator) {
                        self.newline = true;
                    }
                    self.pos += 2 + end + 2;
                }
                Some('<') if self.src[self.pos..].starts_with("<!--") => {
                    self.bump_while(|c| !is_line_terminator(c));
                }
                _ => return Ok(()),
            }
        }
    }

    fn number(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let rest = &self.src[self.pos..];
        if rest.starts_with("0x") || rest.starts_with("0X") {
            self.pos += 2;
            self.bump_while(|c| c.is_ascii_hexdigit());
            if self.pos == start + 2 {
                return Err(ParseError::new("malformed hex literal", start));
            }
            return Ok(());
        }

        self.bump_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            let digits = self.pos;
            self.bump_while(|c| c.is_ascii_digit());
            if self.pos == digits {
                return Err(ParseError::new("malformed exponent", start));
            }
        }
        if self.peek().is_some_and(is_ident_start) {
            return Err(ParseError::new("identifier directly after number", self.pos));
        }
        Ok(())
    }

    fn string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();

        loop {
            let c = self
                .bump()
                .ok_or_else(|| ParseError::new("unterminated string", start))?;
            match c {
                c if c == quote => return Ok(value),
                '\\' => {
                    let escaped = self
                        .bump()
                        .ok_or_else(|| ParseError::new("unterminated string", start))?;
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        'b' => value.push('\u{8}'),
                        'f' => value.push('\u{c}'),
                        'v' => value.push('\u{b}'),
                        '0' => value.push('\0'),
                        'x' => value.push(self.hex_escape(2, start)?),
                        'u' => value.push(self.hex_escape(4, start)?),
                        c if is_line_terminator(c) => {}
                        other => value.push(other),
                    }
                }
                c if is_line_terminator(c) => {
                    return Err(ParseError::new("line break inside string", start));
                }
                other => value.push(other),
            }
        }
    }

    fn hex_escape(&mut self, len: usize, start: usize) -> Result<char, ParseError> {
        let digits = self
            .src
            .get(self.pos..self.pos + len)
            .ok_or_else(|| ParseError::new("truncated escape sequence", start))?;
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| ParseError::new("malformed escape sequence", start))?;
        self.pos += len;
        // Lone surrogates cannot be represented; keep the replacement char.
        Ok(char::from_u32(code).unwrap_or('\u{fffd}'))
    }

    fn regex(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.bump();
        let mut in_class = false;

        loop {
            let c = self
                .bump()
                .ok_or_else(|| ParseError::new("unterminated regex literal", start))?;
            match c {
                '\\' => {
                    self.bump();
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                c if is_line_terminator(c) => {
                    return Err(ParseError::new("unterminated regex literal", start));
                }
                _ => {}
            }
        }

        self.bump_while(is_ident_part);
        Ok(())
    }

    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(tok) => match tok.kind {
                TokenKind::Ident => REGEX_PREFIX_KEYWORDS.iter().any(|kw| *kw == tok.raw),
                TokenKind::Punct => !matches!(tok.raw, ")" | "]" | "}"),
                _ => false,
            },
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

fn is_ident_part(c: char) -> bool {
    is_ident_start(c) || c.is_alphanumeric()
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
