//! Frontend for FIRRTL circuits: lexing and parsing `.fir` files into the IR.
pub mod lexer;
mod parser;

pub use lexer::{Keyword, Lexer, Token, TokenKind};
pub use parser::{FirParser, ParserState, Scope, SymbolTable};
