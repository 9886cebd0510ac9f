//! Statements of a module body.
use super::{scope::SymbolTable, state::ParserState};
use crate::lexer::{Keyword, TokenKind};
use fir_ir::{self as ir, GetName};
use fir_utils::{FirResult, Id};

/// Parses one statement at a time and appends it to a module body. The caller
/// decides, based on indentation, whether the next token still belongs to the
/// body.
pub struct StmtParser<'a> {
    state: &'a mut ParserState,
    symbols: &'a mut SymbolTable,
    builder: ir::Builder,
}

impl<'a> StmtParser<'a> {
    pub fn new(
        state: &'a mut ParserState,
        symbols: &'a mut SymbolTable,
        builder: ir::Builder,
    ) -> Self {
        StmtParser {
            state,
            symbols,
            builder,
        }
    }

    /// Column of the next token.
    pub fn indentation(&self) -> usize {
        self.state.indentation()
    }

    /// True at the end of input or at a lexical error, both of which are
    /// handled by the circuit parser.
    pub fn at_end(&self) -> bool {
        self.state.is(TokenKind::Eof) || self.state.is(TokenKind::Error)
    }

    /// stmt ::= wire | connect
    pub fn parse_simple_stmt(&mut self) -> FirResult<()> {
        match self.state.token().kind {
            TokenKind::Keyword(Keyword::Wire) => self.parse_wire(),
            TokenKind::Identifier => self.parse_connect(),
            _ => Err(self.state.emit_error("unexpected token in module")),
        }
    }

    /// wire ::= 'wire' id ':' type info?
    fn parse_wire(&mut self) -> FirResult<()> {
        let wire_tok = self.state.consume();
        let (name, _) = self.state.parse_id("expected wire name")?;
        self.state
            .parse_token(TokenKind::Colon, "expected ':' in wire")?;
        let ty = self.state.parse_type("expected wire type")?;
        self.state.parse_optional_info();

        let pos = self.state.pos(&wire_tok);
        let value = self.builder.add_wire(name, ty, pos);
        self.symbols.declare(name, Some(value), pos)?;
        log::trace!("Parsed wire `{name}`");
        Ok(())
    }

    /// connect ::= id '<=' id
    fn parse_connect(&mut self) -> FirResult<()> {
        let dest_tok = self.state.consume();
        let arrow = self
            .state
            .parse_token(TokenKind::LessEqual, "expected <=")?;
        let src_tok = self
            .state
            .parse_token(TokenKind::Identifier, "expected identifier")?;

        let dest = self.symbols.resolve(
            Id::from(self.state.token_spelling(&dest_tok)),
            self.state.pos(&dest_tok),
        )?;
        let src = self.symbols.resolve(
            Id::from(self.state.token_spelling(&src_tok)),
            self.state.pos(&src_tok),
        )?;
        log::trace!("Parsed connect `{} <= {}`", dest.name(), src.name());
        self.builder.add_connect(dest, src, self.state.pos(&arrow));
        Ok(())
    }
}
