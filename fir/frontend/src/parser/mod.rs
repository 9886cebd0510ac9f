//! Parser for `.fir` programs.
//!
//! The parser is a hand-written recursive descent parser that builds the IR
//! directly: every construct is turned into IR nodes as soon as it is matched.
//! Blocks have no delimiters; a construct belongs to a block when its first
//! token is indented deeper than the line that opened the block.
mod circuit;
mod module;
mod scope;
mod state;
mod stmt;

use crate::lexer::Lexer;
use fir_ir as ir;
use fir_utils::{FileIdx, FirResult, GlobalPositionTable};
use std::fs;
use std::io::Read;
use std::path::Path;

pub use scope::{Scope, SymbolTable};
pub use state::ParserState;

pub struct FirParser;

impl FirParser {
    /// Parse a `.fir` file into a verified circuit.
    pub fn parse_file(path: &Path) -> FirResult<ir::Circuit> {
        let time = std::time::Instant::now();
        let content = &fs::read(path).map_err(|err| {
            fir_utils::Error::invalid_file(format!(
                "Failed to read {}: {err}",
                path.to_string_lossy(),
            ))
        })?;
        let string_content = std::str::from_utf8(content)?.to_string();
        let file = GlobalPositionTable::get()
            .add_file(path.to_string_lossy().to_string(), string_content);
        let out = Self::parse_source(file)?;
        log::info!(
            "Parsed `{}` in {}ms",
            path.to_string_lossy(),
            time.elapsed().as_millis()
        );
        Ok(out)
    }

    /// Parse a circuit from a reader, e.g. standard input.
    pub fn parse<R: Read>(mut r: R) -> FirResult<ir::Circuit> {
        let time = std::time::Instant::now();
        let mut buf = String::new();
        r.read_to_string(&mut buf).map_err(|err| {
            fir_utils::Error::invalid_file(format!(
                "Failed to parse buffer: {err}"
            ))
        })?;
        let file = GlobalPositionTable::get().add_file("<stdin>".to_string(), buf);
        let out = Self::parse_source(file)?;
        log::info!("Parsed buffer in {}ms", time.elapsed().as_millis());
        Ok(out)
    }

    /// Parse a circuit from a string. `name` is used in diagnostics.
    pub fn parse_str(name: &str, src: &str) -> FirResult<ir::Circuit> {
        let file = GlobalPositionTable::get()
            .add_file(name.to_string(), src.to_string());
        Self::parse_source(file)
    }

    fn parse_source(file: FileIdx) -> FirResult<ir::Circuit> {
        let mut state = ParserState::new(Lexer::new(file));
        let circuit = circuit::parse_circuit(&mut state)?;
        ir::verify(&circuit)?;
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::FirParser;
    use fir_ir::{self as ir, GetName};
    use fir_utils::FirResult;

    fn parse(src: &str) -> FirResult<ir::Circuit> {
        FirParser::parse_str("parser_test.fir", src)
    }

    fn message(src: &str) -> String {
        parse(src).unwrap_err().message()
    }

    #[test]
    fn empty_circuit() {
        let circuit = parse("circuit Top :\n").unwrap();
        assert_eq!(circuit.name, "Top");
        assert!(circuit.definitions.is_empty());
    }

    #[test]
    fn file_info_is_accepted() {
        let src = "\
circuit Top : @[top.scala 1:1]
  module Top : @[top.scala 2:3]
    input a : UInt<1> @[top.scala 3:5]
    wire w : UInt<1> @[top.scala 4:5]
    w <= a
";
        let circuit = parse(src).unwrap();
        let module = circuit.find_module("Top").unwrap();
        assert_eq!(module.borrow().body.len(), 2);
    }

    #[test]
    fn ports_may_be_referenced_after_wires() {
        let src = "\
circuit Top :
  module Top :
    output o : Clock
    input i : Clock
    wire w : Clock
    w <= i
    o <= w
";
        let circuit = parse(src).unwrap();
        let module = circuit.find_module("Top").unwrap();
        let module = module.borrow();
        assert_eq!(module.ports[0].direction(), ir::Direction::Output);
        assert_eq!(module.ports[0].ty, ir::Type::Clock.flip());
        let connects: Vec<_> = module.connects().collect();
        assert_eq!(connects[1].dest.name(), "o");
    }

    #[test]
    fn keywords_can_name_things() {
        let src = "\
circuit module :
  module wire :
    input input : UInt
    wire reg : UInt
";
        let circuit = parse(src).unwrap();
        assert_eq!(circuit.name, "module");
        let module = circuit.find_module("wire").unwrap();
        assert_eq!(module.borrow().ports[0].name, "input");
        assert!(module.borrow().find_wire("reg").is_some());
    }

    #[test]
    fn header_errors() {
        assert_eq!(
            message("module Top :\n"),
            "expected a top-level 'circuit' definition"
        );
        assert_eq!(message("circuit :\n"), "expected circuit name");
        assert_eq!(
            message("circuit Top\n  module Top :\n"),
            "expected ':' in circuit definition"
        );
        assert_eq!(
            message("circuit Top :\n  wire w : UInt\n"),
            "unexpected token in circuit"
        );
        assert_eq!(
            message("circuit Top :\nmodule Top :\n"),
            "module should be indented more"
        );
        assert_eq!(
            message("circuit Top :\n  module Top\n"),
            "expected ':' in module definition"
        );
        assert_eq!(
            message("circuit Top :\n  extmodule Top\n"),
            "expected ':' in extmodule definition"
        );
        assert_eq!(message("circuit Top :\n  module :\n"), "expected module name");
    }

    #[test]
    fn port_errors() {
        assert_eq!(
            message("circuit T :\n  module T :\n    input : UInt\n"),
            "expected port name"
        );
        assert_eq!(
            message("circuit T :\n  module T :\n    input a UInt\n"),
            "expected ':' in port definition"
        );
        assert_eq!(
            message("circuit T :\n  module T :\n    input a : b\n"),
            "expected a type in port declaration"
        );
        assert_eq!(
            message("circuit T :\n  module T :\n    input a : UInt\n    output a : UInt\n"),
            "redefinition of name 'a'"
        );
    }

    #[test]
    fn statement_errors() {
        let module = "circuit T :\n  module T :\n    input a : UInt\n";
        let cases = [
            ("    input b : UInt\n    wire w : UInt\n    input c : UInt\n", "unexpected token in module"),
            ("    wire : UInt\n", "expected wire name"),
            ("    wire w UInt\n", "expected ':' in wire"),
            ("    wire w : 3\n", "expected wire type"),
            ("    a = a\n", "expected <="),
            ("    a <= 3\n", "expected identifier"),
            ("    wire a : UInt\n", "redefinition of name 'a'"),
            ("    a <= b\n", "use of invalid name 'b'"),
            ("    b <= a\n", "use of invalid name 'b'"),
        ];
        for (body, expected) in cases {
            let src = format!("{module}{body}");
            assert_eq!(message(&src), expected, "for body:\n{body}");
        }
    }

    #[test]
    fn extmodule_errors() {
        let ext = "circuit T :\n  extmodule E :\n    input a : UInt\n";
        let cases = [
            ("    defname E\n", "expected '=' in defname"),
            ("    defname = 3\n", "expected defname name"),
            ("    parameter = 3\n", "expected parameter name"),
            ("    parameter P 3\n", "expected '=' in parameter"),
            ("    parameter P = E\n", "expected parameter value"),
            (
                "    parameter P = 99999999999999999999\n",
                "invalid parameter value",
            ),
            ("    output a : UInt\n", "redefinition of name 'a'"),
        ];
        for (body, expected) in cases {
            let src = format!("{ext}{body}");
            assert_eq!(message(&src), expected, "for body:\n{body}");
        }
    }

    #[test]
    fn extmodule_parameters() {
        let src = "\
circuit T :
  extmodule E :
    output o : UInt<2>
    defname = EImpl
    parameter A = -3
    parameter B = \"x\\ty\"
";
        let circuit = parse(src).unwrap();
        let ext = circuit.ext_modules().next().unwrap();
        assert_eq!(ext.defname, Some("EImpl".into()));
        assert_eq!(
            ext.parameters,
            vec![
                ("A".into(), ir::Param::Int(-3)),
                ("B".into(), ir::Param::String("x\ty".to_string())),
            ]
        );
        assert_eq!(ext.ports[0].direction(), ir::Direction::Output);
    }

    #[test]
    fn diagnostics_point_at_the_token() {
        let err = parse("circuit T :\n  module T :\n    wire w : UInt<x>\n")
            .unwrap_err();
        assert_eq!(err.location().get_line_col(), (3, 19));
        assert_eq!(
            format!("{err:?}"),
            "parser_test.fir\n3 |    wire w : UInt<x>\n  |                  ^ expected width"
        );
    }

    #[test]
    fn redefinition_notes_previous_site() {
        let err = parse(
            "circuit T :\n  module T :\n    input a : UInt\n    wire a : UInt\n",
        )
        .unwrap_err();
        assert_eq!(err.location().get_line_col(), (4, 5));
        let (note_pos, note) = &err.annotations()[0];
        assert_eq!(note, "previous definition here");
        assert_eq!(note_pos.get_line_col(), (3, 11));
    }
}
