//! Structural verification of a circuit.
use crate::{self as ir, GetName};
use fir_utils::{Error, FirResult, GPosIdx, Id};
use std::collections::HashMap;
use std::rc::Rc;

/// Records names and reports the first duplicate together with the location
/// of the original definition.
#[derive(Default)]
struct NameSet(HashMap<Id, GPosIdx>);

impl NameSet {
    fn insert(&mut self, name: Id, pos: GPosIdx) -> FirResult<()> {
        if let Some(prev) = self.0.get(&name) {
            return Err(Error::already_bound(name)
                .with_pos(&pos)
                .with_annotation(prev, "previous definition here"));
        }
        self.0.insert(name, pos);
        Ok(())
    }
}

/// Check that the circuit is well formed:
/// - definition names are unique within the circuit,
/// - port and wire names are unique within a definition,
/// - every connect operand is a port of the module or a wire declared earlier
///   in the same body.
pub fn verify(circuit: &ir::Circuit) -> FirResult<()> {
    let mut defs = NameSet::default();
    for def in &circuit.definitions {
        defs.insert(def.name(), fir_utils::WithPos::copy_span(def))?;
        match def {
            ir::Definition::Module(m) => verify_module(&m.borrow())?,
            ir::Definition::ExtModule(e) => {
                let mut names = NameSet::default();
                for port in &e.ports {
                    names.insert(port.name, port.pos)?;
                }
            }
        }
    }
    log::debug!(
        "Verified circuit `{}` with {} definitions",
        circuit.name,
        circuit.definitions.len()
    );
    Ok(())
}

fn verify_module(module: &ir::Module) -> FirResult<()> {
    let mut names = NameSet::default();
    for port in &module.ports {
        names.insert(port.name, port.pos)?;
    }

    let mut defined: Vec<ir::Value> =
        module.ports.iter().cloned().map(ir::Value::Port).collect();
    for stmt in &module.body {
        match stmt {
            ir::Statement::Wire(w) => {
                names.insert(w.name, w.pos)?;
                defined.push(ir::Value::Wire(Rc::clone(w)));
            }
            ir::Statement::Connect(c) => {
                for operand in [&c.dest, &c.src] {
                    if !defined.contains(operand) {
                        return Err(Error::malformed_structure(format!(
                            "connect in module `{}` uses `{}` which is not defined before it in the module",
                            module.name,
                            operand.name()
                        ))
                        .with_pos(&c.pos));
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::verify;
    use crate::{self as ir, Builder};
    use fir_utils::GPosIdx;

    fn port(name: &str) -> ir::PortDef {
        ir::PortDef::new(name, ir::Type::UInt(Some(1)), GPosIdx::UNKNOWN)
    }

    #[test]
    fn accepts_well_formed_circuit() {
        let mut circuit = ir::Circuit::new("A", GPosIdx::UNKNOWN);
        let (m, args) =
            circuit.add_module("A", vec![port("x"), port("y")], GPosIdx::UNKNOWN);
        Builder::new(m).add_connect(
            args[1].clone(),
            args[0].clone(),
            GPosIdx::UNKNOWN,
        );
        circuit.add_extmodule(ir::ExtModule::new(
            "B",
            vec![port("x")],
            GPosIdx::UNKNOWN,
        ));
        assert!(verify(&circuit).is_ok());
    }

    #[test]
    fn rejects_duplicate_definitions() {
        let mut circuit = ir::Circuit::new("A", GPosIdx::UNKNOWN);
        circuit.add_module("A", vec![], GPosIdx::UNKNOWN);
        circuit.add_extmodule(ir::ExtModule::new("A", vec![], GPosIdx::UNKNOWN));
        let err = verify(&circuit).unwrap_err();
        assert_eq!(err.to_string(), "redefinition of name 'A'");
    }

    #[test]
    fn rejects_duplicate_ports() {
        let mut circuit = ir::Circuit::new("A", GPosIdx::UNKNOWN);
        circuit.add_extmodule(ir::ExtModule::new(
            "B",
            vec![port("x"), port("x")],
            GPosIdx::UNKNOWN,
        ));
        assert!(verify(&circuit).is_err());
    }

    #[test]
    fn rejects_values_from_other_modules() {
        let mut circuit = ir::Circuit::new("A", GPosIdx::UNKNOWN);
        let (_, foreign) =
            circuit.add_module("B", vec![port("z")], GPosIdx::UNKNOWN);
        let (m, args) = circuit.add_module("A", vec![port("x")], GPosIdx::UNKNOWN);
        Builder::new(m).add_connect(
            args[0].clone(),
            foreign[0].clone(),
            GPosIdx::UNKNOWN,
        );
        let err = verify(&circuit).unwrap_err();
        assert!(err.to_string().contains("uses `z`"));
    }
}
