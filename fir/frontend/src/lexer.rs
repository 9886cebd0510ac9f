//! Tokenizer for `.fir` files.
//!
//! The lexer works over a source buffer registered in the
//! [GlobalPositionTable] and produces one [Token] at a time. Tokens are plain
//! byte spans: positions in the global table are only created for tokens that
//! end up in a diagnostic or an IR node.
use fir_utils::{Error, FileIdx, GPosIdx, GlobalPositionTable};
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumString};

/// Reserved words of the language. Every keyword may also be used where an
/// identifier is expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, AsRefStr)]
pub enum Keyword {
    #[strum(serialize = "circuit")]
    Circuit,
    #[strum(serialize = "module")]
    Module,
    #[strum(serialize = "extmodule")]
    ExtModule,
    #[strum(serialize = "input")]
    Input,
    #[strum(serialize = "output")]
    Output,
    #[strum(serialize = "wire")]
    Wire,
    #[strum(serialize = "flip")]
    Flip,
    #[strum(serialize = "defname")]
    Defname,
    #[strum(serialize = "parameter")]
    Parameter,
    #[strum(serialize = "Clock")]
    Clock,
    #[strum(serialize = "Reset")]
    Reset,
    #[strum(serialize = "AsyncReset")]
    AsyncReset,
    #[strum(serialize = "UInt")]
    UInt,
    #[strum(serialize = "SInt")]
    SInt,
    #[strum(serialize = "Analog")]
    Analog,
    #[strum(serialize = "node")]
    Node,
    #[strum(serialize = "reg")]
    Reg,
    #[strum(serialize = "inst")]
    Inst,
    #[strum(serialize = "of")]
    Of,
    #[strum(serialize = "mem")]
    Mem,
    #[strum(serialize = "when")]
    When,
    #[strum(serialize = "else")]
    Else,
    #[strum(serialize = "skip")]
    Skip,
    #[strum(serialize = "is")]
    Is,
    #[strum(serialize = "invalid")]
    Invalid,
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    /// Decimal integer with an optional leading `-`.
    Integer,
    /// Double quoted string, quotes included in the spelling.
    String,
    /// `@[...]` source locator.
    FileInfo,
    Keyword(Keyword),
    Colon,
    Comma,
    Equal,
    Less,
    LessEqual,
    LessMinus,
    Greater,
    LBrace,
    RBrace,
    LSquare,
    RSquare,
    LParen,
    RParen,
    Period,
    Eof,
    /// The lexer already recorded a diagnostic for this token.
    Error,
}

/// A classified byte span of the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }

    /// True for identifiers and keywords, which are both valid names.
    pub fn is_id(&self) -> bool {
        matches!(self.kind, TokenKind::Identifier | TokenKind::Keyword(_))
    }
}

pub struct Lexer {
    file: FileIdx,
    src: &'static str,
    /// Offset of the next unread byte.
    cur: usize,
    /// Diagnostic for the first lexical error. Once set, the lexer keeps
    /// returning error tokens.
    error: Option<(Token, Error)>,
}

impl Lexer {
    /// Create a lexer over a file registered in the global position table.
    pub fn new(file: FileIdx) -> Self {
        Lexer {
            file,
            src: GlobalPositionTable::get().get_source(file),
            cur: 0,
            error: None,
        }
    }

    /// The source text covered by `tok`.
    pub fn spelling(&self, tok: &Token) -> &'static str {
        let src: &'static str = self.src;
        &src[tok.start..tok.end]
    }

    /// Register the span of `tok` in the global position table.
    pub fn pos(&self, tok: &Token) -> GPosIdx {
        GPosIdx::new(self.file, tok.start, tok.end)
    }

    /// Column of the first byte of `tok`, counted from the preceding line
    /// break.
    pub fn indentation(&self, tok: &Token) -> usize {
        let line_start = self.src[..tok.start]
            .rfind('\n')
            .map(|idx| idx + 1)
            .unwrap_or(0);
        tok.start - line_start
    }

    /// The diagnostic behind the error token, if one was produced.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref().map(|(_, err)| err)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.cur..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.cur..].chars().nth(n)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            start,
            end: self.cur,
        }
    }

    fn error_token<S: ToString>(&mut self, start: usize, msg: S) -> Token {
        let tok = self.token(TokenKind::Error, start);
        let err = Error::lexical(msg).with_pos(&self.pos(&tok));
        self.error = Some((tok, err));
        tok
    }

    /// Skip whitespace and `;` comments.
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' => self.cur += 1,
                ';' => {
                    self.cur = self.src[self.cur..]
                        .find('\n')
                        .map(|off| self.cur + off)
                        .unwrap_or(self.src.len());
                }
                _ => break,
            }
        }
    }

    fn eat_while<F: Fn(char) -> bool>(&mut self, pred: F) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.cur += c.len_utf8();
        }
    }

    /// Return the next token. At the end of input, and after a lexical error,
    /// the same token is returned again on every call.
    pub fn lex_token(&mut self) -> Token {
        if let Some((tok, _)) = &self.error {
            return *tok;
        }
        self.skip_trivia();
        let start = self.cur;
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };
        self.cur += c.len_utf8();

        let kind = match c {
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Equal,
            '>' => TokenKind::Greater,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LSquare,
            ']' => TokenKind::RSquare,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '.' => TokenKind::Period,
            '<' => match self.peek() {
                Some('=') => {
                    self.cur += 1;
                    TokenKind::LessEqual
                }
                // `<-1` is a less-than followed by a negative integer.
                Some('-')
                    if !self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) =>
                {
                    self.cur += 1;
                    TokenKind::LessMinus
                }
                _ => TokenKind::Less,
            },
            '"' => return self.lex_string(start),
            '@' if self.peek() == Some('[') => return self.lex_file_info(start),
            '-' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.eat_while(|c| c.is_ascii_digit());
                TokenKind::Integer
            }
            c if c.is_ascii_digit() => {
                self.eat_while(|c| c.is_ascii_digit());
                TokenKind::Integer
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
                match Keyword::from_str(&self.src[start..self.cur]) {
                    Ok(kw) => TokenKind::Keyword(kw),
                    Err(_) => TokenKind::Identifier,
                }
            }
            _ => return self.error_token(start, "unexpected character"),
        };
        self.token(kind, start)
    }

    fn lex_string(&mut self, start: usize) -> Token {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return self.error_token(start, "unterminated string");
                }
                Some('"') => {
                    self.cur += 1;
                    return self.token(TokenKind::String, start);
                }
                Some('\\') if self.peek_nth(1).is_some_and(|c| c != '\n') => {
                    self.cur += 1;
                    if let Some(c) = self.peek() {
                        self.cur += c.len_utf8();
                    }
                }
                Some(c) => self.cur += c.len_utf8(),
            }
        }
    }

    fn lex_file_info(&mut self, start: usize) -> Token {
        // Skip the `[`.
        self.cur += 1;
        match self.src[self.cur..].find(']') {
            Some(off) => {
                self.cur += off + 1;
                self.token(TokenKind::FileInfo, start)
            }
            None => {
                self.cur = self.src.len();
                self.error_token(start, "unterminated file info specifier")
            }
        }
    }
}

/// Decode the value of a string literal token, given its spelling with the
/// surrounding quotes.
pub fn string_value(spelling: &str) -> String {
    let inner = spelling
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(spelling);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(c) => out.push(c),
            None => out.push('\\'),
        }
    }
    out
}
