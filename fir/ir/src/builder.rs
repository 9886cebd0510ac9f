//! IR Builder. Provides convenience methods to append statements to a module
//! body.
use crate::{self as ir, RRC};
use fir_utils::GPosIdx;
use std::rc::Rc;

/// IR builder.
/// Statements are only ever appended to the end of the module body.
pub struct Builder {
    /// Module for which this builder is constructing.
    module: RRC<ir::Module>,
}

impl Builder {
    /// Instantiate a new builder for a module.
    pub fn new(module: RRC<ir::Module>) -> Self {
        Self { module }
    }

    /// The module this builder appends to.
    pub fn module(&self) -> &RRC<ir::Module> {
        &self.module
    }

    /// Declare a wire and return the value it produces.
    pub fn add_wire<S>(&mut self, name: S, ty: ir::Type, pos: GPosIdx) -> ir::Value
    where
        S: Into<ir::Id>,
    {
        let wire = Rc::new(ir::Wire {
            name: name.into(),
            ty,
            pos,
        });
        self.module
            .borrow_mut()
            .body
            .push(ir::Statement::Wire(Rc::clone(&wire)));
        ir::Value::Wire(wire)
    }

    /// Drive `dest` with `src`.
    pub fn add_connect(&mut self, dest: ir::Value, src: ir::Value, pos: GPosIdx) {
        self.module
            .borrow_mut()
            .body
            .push(ir::Statement::Connect(ir::Connect { dest, src, pos }));
    }
}

#[cfg(test)]
mod tests {
    use super::Builder;
    use crate::{self as ir, GetName};
    use fir_utils::GPosIdx;

    #[test]
    fn statements_are_appended_in_order() {
        let mut circuit = ir::Circuit::new("Top", GPosIdx::UNKNOWN);
        let (module, args) = circuit.add_module(
            "Top",
            vec![
                ir::PortDef::new("a", ir::Type::UInt(Some(4)), GPosIdx::UNKNOWN),
                ir::PortDef::new(
                    "b",
                    ir::Type::UInt(Some(4)).flip(),
                    GPosIdx::UNKNOWN,
                ),
            ],
            GPosIdx::UNKNOWN,
        );
        assert_eq!(args.len(), 2);
        assert_eq!(args[1].name(), "b");

        let mut builder = Builder::new(module);
        let w = builder.add_wire("w", ir::Type::UInt(Some(4)), GPosIdx::UNKNOWN);
        builder.add_connect(w.clone(), args[0].clone(), GPosIdx::UNKNOWN);
        builder.add_connect(args[1].clone(), w.clone(), GPosIdx::UNKNOWN);

        let module = builder.module().borrow();
        assert_eq!(module.body.len(), 3);
        let connects: Vec<_> = module.connects().collect();
        assert_eq!(connects[0].dest, w);
        assert_eq!(connects[0].src, args[0]);
        assert_eq!(connects[1].dest, args[1]);
        assert_eq!(module.find_wire("w").map(|w| w.name), Some("w".into()));
        assert_eq!(module.ports[1].direction(), ir::Direction::Output);
    }
}
