//! The top level of a `.fir` file.
use super::{module::ModuleParser, state::ParserState};
use crate::lexer::{Keyword, TokenKind};
use fir_ir as ir;
use fir_utils::FirResult;

/// circuit ::= 'circuit' id ':' info? (module | extmodule)* EOF
///
/// Modules must be indented deeper than the `circuit` keyword.
pub fn parse_circuit(state: &mut ParserState) -> FirResult<ir::Circuit> {
    let circuit_indent = state.indentation();
    state.parse_token(
        TokenKind::Keyword(Keyword::Circuit),
        "expected a top-level 'circuit' definition",
    )?;
    let (name, pos) = state.parse_id("expected circuit name")?;
    state.parse_token(TokenKind::Colon, "expected ':' in circuit definition")?;
    state.parse_optional_info();

    let mut circuit = ir::Circuit::new(name, pos);
    loop {
        match state.token().kind {
            TokenKind::Eof => return Ok(circuit),
            // The lexer already produced the diagnostic.
            TokenKind::Error => return Err(state.lexer_error()),
            TokenKind::Keyword(kw @ (Keyword::Module | Keyword::ExtModule)) => {
                let module_indent = state.indentation();
                if module_indent <= circuit_indent {
                    return Err(state.emit_error("module should be indented more"));
                }
                let parser = ModuleParser::new(state, &mut circuit);
                if kw == Keyword::Module {
                    parser.parse_module(module_indent)?;
                } else {
                    parser.parse_ext_module(module_indent)?;
                }
            }
            _ => return Err(state.emit_error("unexpected token in circuit")),
        }
    }
}
