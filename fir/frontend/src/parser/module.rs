//! Modules and external modules.
use super::{scope::SymbolTable, state::ParserState, stmt::StmtParser};
use crate::lexer::{self, Keyword, TokenKind};
use fir_ir as ir;
use fir_utils::FirResult;
use smallvec::SmallVec;

type PortList = SmallVec<[ir::PortDef; 4]>;

/// Parses one module or external module and adds it to the circuit. Every
/// module gets its own symbol table, so names never clash across modules.
pub struct ModuleParser<'a> {
    state: &'a mut ParserState,
    circuit: &'a mut ir::Circuit,
    symbols: SymbolTable,
}

impl<'a> ModuleParser<'a> {
    pub fn new(state: &'a mut ParserState, circuit: &'a mut ir::Circuit) -> Self {
        ModuleParser {
            state,
            circuit,
            symbols: SymbolTable::default(),
        }
    }

    /// portlist ::= port*
    /// port     ::= ('input' | 'output') id ':' type info?
    ///
    /// Ports must be indented deeper than `indent`. Output ports get a flipped
    /// type.
    fn parse_port_list(&mut self, indent: usize) -> FirResult<PortList> {
        let mut ports = PortList::new();
        while (self.state.is_keyword(Keyword::Input)
            || self.state.is_keyword(Keyword::Output))
            && self.state.indentation() > indent
        {
            let is_output = self.state.is_keyword(Keyword::Output);
            self.state.consume();
            let (name, pos) = self.state.parse_id("expected port name")?;
            self.state.parse_token(
                TokenKind::Colon,
                "expected ':' in port definition",
            )?;
            let mut ty =
                self.state.parse_type("expected a type in port declaration")?;
            self.state.parse_optional_info();

            if is_output {
                ty = ty.flip();
            }
            ports.push(ir::PortDef::new(name, ty, pos));
        }
        Ok(ports)
    }

    /// extmodule ::= 'extmodule' id ':' info? portlist defname? parameter*
    /// defname   ::= 'defname' '=' id
    /// parameter ::= 'parameter' id '=' (intLit | StringLit)
    pub fn parse_ext_module(mut self, indent: usize) -> FirResult<()> {
        self.state.consume();
        let (name, pos) = self.state.parse_id("expected module name")?;
        self.state.parse_token(
            TokenKind::Colon,
            "expected ':' in extmodule definition",
        )?;
        self.state.parse_optional_info();
        let ports = self.parse_port_list(indent)?;

        // The ports have no values, they are only declared to reject
        // duplicate names.
        let mut scope = self.symbols.push_scope();
        for port in &ports {
            scope.declare(port.name, None, port.pos)?;
        }

        let mut ext = ir::ExtModule::new(name, ports.into_vec(), pos);
        if self.state.consume_if_keyword(Keyword::Defname).is_some() {
            self.state
                .parse_token(TokenKind::Equal, "expected '=' in defname")?;
            let (defname, _) = self.state.parse_id("expected defname name")?;
            ext.defname = Some(defname);
        }

        while self.state.consume_if_keyword(Keyword::Parameter).is_some() {
            let (param, _) = self.state.parse_id("expected parameter name")?;
            self.state
                .parse_token(TokenKind::Equal, "expected '=' in parameter")?;
            let value = match self.state.token().kind {
                TokenKind::Integer => {
                    let value = self.state.spelling().parse::<i64>().map_err(
                        |_| self.state.emit_error("invalid parameter value"),
                    )?;
                    self.state.consume();
                    ir::Param::Int(value)
                }
                TokenKind::String => {
                    let value = lexer::string_value(self.state.spelling());
                    self.state.consume();
                    ir::Param::String(value)
                }
                _ => return Err(self.state.emit_error("expected parameter value")),
            };
            ext.parameters.push((param, value));
        }

        log::debug!(
            "Parsed extmodule `{}` with {} ports and {} parameters",
            ext.name,
            ext.ports.len(),
            ext.parameters.len()
        );
        self.circuit.add_extmodule(ext);
        Ok(())
    }

    /// module ::= 'module' id ':' info? portlist stmt*
    ///
    /// Statements are parsed while they are indented deeper than `indent`.
    pub fn parse_module(mut self, indent: usize) -> FirResult<()> {
        self.state.consume();
        let (name, pos) = self.state.parse_id("expected module name")?;
        self.state
            .parse_token(TokenKind::Colon, "expected ':' in module definition")?;
        self.state.parse_optional_info();
        let ports = self.parse_port_list(indent)?;

        let (module, args) =
            self.circuit.add_module(name, ports.to_vec(), pos);

        // Ports are visible in the whole body regardless of where statements
        // appear.
        let mut scope = self.symbols.push_scope();
        for (port, arg) in ports.iter().zip(args) {
            scope.declare(port.name, Some(arg), port.pos)?;
        }

        let mut stmts = StmtParser::new(
            &mut *self.state,
            &mut scope,
            ir::Builder::new(module),
        );
        while stmts.indentation() > indent && !stmts.at_end() {
            stmts.parse_simple_stmt()?;
        }
        log::debug!("Parsed module `{name}` with {} ports", ports.len());
        Ok(())
    }
}
