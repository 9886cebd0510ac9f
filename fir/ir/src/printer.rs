//! Implements a formatter for the in-memory representation of circuits.
//! The output uses the `.fir` surface syntax and can be parsed again.
use crate::{self as ir, GetName};
use std::io;

/// Printer for the IR.
pub struct Printer;

impl Printer {
    /// Format a port declaration such as `output b : UInt<8>`.
    fn format_port(name: ir::Id, ty: &ir::Type) -> String {
        match ty {
            ir::Type::Flip(inner) => format!("output {name} : {inner}"),
            ty => format!("input {name} : {ty}"),
        }
    }

    /// Prints out the circuit and every definition in it.
    pub fn write_circuit<F: io::Write>(
        circuit: &ir::Circuit,
        f: &mut F,
    ) -> io::Result<()> {
        writeln!(f, "circuit {} :", circuit.name)?;
        for def in &circuit.definitions {
            match def {
                ir::Definition::Module(m) => {
                    Self::write_module(&m.borrow(), 2, f)?
                }
                ir::Definition::ExtModule(e) => {
                    Self::write_extmodule(e, 2, f)?
                }
            }
        }
        Ok(())
    }

    pub fn write_module<F: io::Write>(
        module: &ir::Module,
        indent_level: usize,
        f: &mut F,
    ) -> io::Result<()> {
        let indent = " ".repeat(indent_level);
        writeln!(f, "{indent}module {} :", module.name)?;
        for port in &module.ports {
            writeln!(f, "{indent}  {}", Self::format_port(port.name, &port.ty))?;
        }
        for stmt in &module.body {
            Self::write_statement(stmt, indent_level + 2, f)?;
        }
        Ok(())
    }

    pub fn write_extmodule<F: io::Write>(
        ext: &ir::ExtModule,
        indent_level: usize,
        f: &mut F,
    ) -> io::Result<()> {
        let indent = " ".repeat(indent_level);
        writeln!(f, "{indent}extmodule {} :", ext.name)?;
        for port in &ext.ports {
            writeln!(f, "{indent}  {}", Self::format_port(port.name, &port.ty))?;
        }
        if let Some(defname) = ext.defname {
            writeln!(f, "{indent}  defname = {defname}")?;
        }
        for (name, value) in &ext.parameters {
            writeln!(f, "{indent}  parameter {name} = {value}")?;
        }
        Ok(())
    }

    pub fn write_statement<F: io::Write>(
        stmt: &ir::Statement,
        indent_level: usize,
        f: &mut F,
    ) -> io::Result<()> {
        write!(f, "{}", " ".repeat(indent_level))?;
        match stmt {
            ir::Statement::Wire(w) => writeln!(f, "wire {} : {}", w.name, w.ty),
            ir::Statement::Connect(c) => {
                writeln!(f, "{} <= {}", c.dest.name(), c.src.name())
            }
        }
    }

    /// Render a circuit into a string.
    pub fn circuit_to_string(circuit: &ir::Circuit) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = Self::write_circuit(circuit, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
