//! Token cursor and the grammar rules shared by every parser layer.
use crate::lexer::{Keyword, Lexer, Token, TokenKind};
use fir_ir as ir;
use fir_utils::{Error, FirResult, GPosIdx, Id};

/// Owns the lexer and the single token of lookahead.
pub struct ParserState {
    lexer: Lexer,
    tok: Token,
}

impl ParserState {
    pub fn new(mut lexer: Lexer) -> Self {
        let tok = lexer.lex_token();
        ParserState { lexer, tok }
    }

    /// The current token.
    pub fn token(&self) -> Token {
        self.tok
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.tok.is(kind)
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.tok.is_keyword(kw)
    }

    /// The source text of the current token.
    pub fn spelling(&self) -> &'static str {
        self.lexer.spelling(&self.tok)
    }

    pub fn token_spelling(&self, tok: &Token) -> &'static str {
        self.lexer.spelling(tok)
    }

    /// Location of the current token.
    pub fn loc(&self) -> GPosIdx {
        self.lexer.pos(&self.tok)
    }

    pub fn pos(&self, tok: &Token) -> GPosIdx {
        self.lexer.pos(tok)
    }

    /// Column of the current token.
    pub fn indentation(&self) -> usize {
        self.lexer.indentation(&self.tok)
    }

    /// Move to the next token and return the one that was current.
    pub fn consume(&mut self) -> Token {
        debug_assert!(
            !matches!(self.tok.kind, TokenKind::Eof | TokenKind::Error),
            "consumed past the end of the token stream"
        );
        let tok = self.tok;
        self.tok = self.lexer.lex_token();
        tok
    }

    /// Consume the current token if it has kind `kind`.
    pub fn consume_if(&mut self, kind: TokenKind) -> Option<Token> {
        if self.tok.is(kind) {
            Some(self.consume())
        } else {
            None
        }
    }

    pub fn consume_if_keyword(&mut self, kw: Keyword) -> Option<Token> {
        self.consume_if(TokenKind::Keyword(kw))
    }

    /// Consume a token of kind `kind` or fail with `msg`.
    pub fn parse_token<S: ToString>(
        &mut self,
        kind: TokenKind,
        msg: S,
    ) -> FirResult<Token> {
        match self.consume_if(kind) {
            Some(tok) => Ok(tok),
            None => Err(self.emit_error(msg)),
        }
    }

    /// Diagnostic located at the current token.
    pub fn emit_error<S: ToString>(&self, msg: S) -> Error {
        self.emit_error_at(self.loc(), msg)
    }

    /// Diagnostic located at `pos`. When the current token is a lexical error
    /// the lexer's diagnostic is returned instead, since it explains the
    /// failure.
    pub fn emit_error_at<S: ToString>(&self, pos: GPosIdx, msg: S) -> Error {
        if self.tok.is(TokenKind::Error) {
            if let Some(err) = self.lexer.error() {
                return err.clone();
            }
        }
        Error::parse_error(msg).with_pos(&pos)
    }

    /// The diagnostic of the lexer, used when the parse stops at an error
    /// token.
    pub fn lexer_error(&self) -> Error {
        self.lexer
            .error()
            .cloned()
            .unwrap_or_else(|| Error::lexical("invalid token").with_pos(&self.loc()))
    }

    // ================ Common rules =====================

    /// id ::= Id | keywordAsId
    pub fn parse_id<S: ToString>(&mut self, msg: S) -> FirResult<(Id, GPosIdx)> {
        if !self.tok.is_id() {
            return Err(self.emit_error(msg));
        }
        let pos = self.loc();
        let name = Id::from(self.spelling());
        self.consume();
        Ok((name, pos))
    }

    /// fieldId ::= Id | UnsignedInt | keywordAsId
    ///
    /// Integer tokens carry their sign, so a negative literal is rejected here.
    pub fn parse_field_id<S: ToString>(&mut self, msg: S) -> FirResult<Id> {
        if self.is(TokenKind::Integer) {
            if self.spelling().starts_with('-') {
                return Err(self.emit_error(msg));
            }
            let tok = self.consume();
            return Ok(Id::from(self.token_spelling(&tok)));
        }
        self.parse_id(msg).map(|(name, _)| name)
    }

    /// info ::= FileInfo?
    pub fn parse_optional_info(&mut self) {
        self.consume_if(TokenKind::FileInfo);
    }

    /// intLit followed by the closing token `close`. The literal is converted
    /// with `convert` once the closing token is matched; a failed conversion
    /// reports `invalid` at the literal.
    fn parse_sized_literal<T>(
        &mut self,
        close: TokenKind,
        close_msg: &str,
        invalid: &str,
        convert: impl FnOnce(&str) -> Option<T>,
    ) -> FirResult<T> {
        let tok = self.parse_token(TokenKind::Integer, "expected width")?;
        self.parse_token(close, close_msg)?;
        convert(self.token_spelling(&tok))
            .ok_or_else(|| self.emit_error_at(self.pos(&tok), invalid))
    }

    // ================ Types =====================

    /// type ::= 'Clock' | 'Reset' | 'AsyncReset'
    ///      ::= ('UInt' | 'SInt' | 'Analog') ('<' intLit '>')?
    ///      ::= '{' '}' | '{' field (',' field)* '}'
    ///      ::= type '[' intLit ']'
    /// field ::= 'flip'? fieldId ':' type
    pub fn parse_type<S: ToString>(&mut self, msg: S) -> FirResult<ir::Type> {
        let mut ty = match self.tok.kind {
            TokenKind::Keyword(Keyword::Clock) => {
                self.consume();
                ir::Type::Clock
            }
            TokenKind::Keyword(Keyword::Reset) => {
                self.consume();
                ir::Type::Reset
            }
            TokenKind::Keyword(Keyword::AsyncReset) => {
                self.consume();
                ir::Type::AsyncReset
            }
            TokenKind::Keyword(
                kw @ (Keyword::UInt | Keyword::SInt | Keyword::Analog),
            ) => {
                self.consume();
                let width = self.parse_optional_width()?;
                match kw {
                    Keyword::UInt => ir::Type::UInt(width),
                    Keyword::SInt => ir::Type::SInt(width),
                    _ => ir::Type::Analog(width),
                }
            }
            TokenKind::LBrace => {
                self.consume();
                ir::Type::Bundle(self.parse_bundle_fields()?)
            }
            _ => return Err(self.emit_error(msg)),
        };

        // Postfix vector sizes.
        while self.consume_if(TokenKind::LSquare).is_some() {
            let size = self.parse_sized_literal(
                TokenKind::RSquare,
                "expected ]",
                "invalid size specifier",
                |s| s.parse::<u64>().ok(),
            )?;
            ty = ty.vector(size);
        }
        Ok(ty)
    }

    fn parse_optional_width(&mut self) -> FirResult<ir::Width> {
        if self.consume_if(TokenKind::Less).is_none() {
            return Ok(None);
        }
        // Widths are signed 32-bit literals that must not be negative.
        let width = self.parse_sized_literal(
            TokenKind::Greater,
            "expected >",
            "invalid width specifier",
            |s| s.parse::<i32>().ok().and_then(|w| u32::try_from(w).ok()),
        )?;
        Ok(Some(width))
    }

    /// Fields of a bundle after the opening `{`, including the closing `}`.
    fn parse_bundle_fields(&mut self) -> FirResult<Vec<ir::BundleElement>> {
        let mut fields = vec![];
        if self.consume_if(TokenKind::RBrace).is_some() {
            return Ok(fields);
        }
        loop {
            let flipped = self.consume_if_keyword(Keyword::Flip).is_some();
            let name = self.parse_field_id("expected bundle field name")?;
            self.parse_token(TokenKind::Colon, "expected ':' in bundle")?;
            let mut ty = self.parse_type("expected bundle field type")?;
            if flipped {
                ty = ty.flip();
            }
            fields.push(ir::BundleElement::new(name, ty));
            if self.consume_if(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.parse_token(TokenKind::RBrace, "expected '}' at end of bundle")?;
        Ok(fields)
    }
}
