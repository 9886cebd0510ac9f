//! Modules, external modules, and the circuit that contains them.
use crate::{
    rrc, Connect, GetName, Id, Port, PortDef, Statement, Value, Wire, RRC,
};
use fir_utils::{GPosIdx, WithPos};
use std::rc::Rc;

/// In memory representation of a module with a body.
#[derive(Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Module {
    pub name: Id,
    /// Ports in declaration order.
    pub ports: Vec<Rc<Port>>,
    /// Statements in source order.
    pub body: Vec<Statement>,
    #[cfg_attr(feature = "serialize", serde(skip))]
    pub pos: GPosIdx,
}

impl Module {
    /// Construct a module with one argument per port and an empty body.
    pub fn new<S: Into<Id>>(name: S, ports: Vec<PortDef>, pos: GPosIdx) -> Self {
        let ports = ports
            .into_iter()
            .enumerate()
            .map(|(index, pd)| {
                Rc::new(Port {
                    name: pd.name,
                    ty: pd.ty,
                    index,
                    pos: pd.pos,
                })
            })
            .collect();
        Module {
            name: name.into(),
            ports,
            body: vec![],
            pos,
        }
    }

    /// The argument values of this module, in port order.
    pub fn arguments(&self) -> Vec<Value> {
        self.ports.iter().cloned().map(Value::Port).collect()
    }

    /// Return the wire with `name` if present.
    pub fn find_wire<S: Into<Id>>(&self, name: S) -> Option<Rc<Wire>> {
        let name = name.into();
        self.wires().find(|w| w.name == name).cloned()
    }

    pub fn wires(&self) -> impl Iterator<Item = &Rc<Wire>> {
        self.body.iter().filter_map(|s| match s {
            Statement::Wire(w) => Some(w),
            Statement::Connect(_) => None,
        })
    }

    pub fn connects(&self) -> impl Iterator<Item = &Connect> {
        self.body.iter().filter_map(|s| match s {
            Statement::Connect(c) => Some(c),
            Statement::Wire(_) => None,
        })
    }
}

impl GetName for Module {
    fn name(&self) -> Id {
        self.name
    }
}

/// Value of an external module parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Param {
    Int(i64),
    String(String),
}

impl std::fmt::Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Param::Int(v) => write!(f, "{v}"),
            Param::String(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        c => write!(f, "{c}")?,
                    }
                }
                write!(f, "\"")
            }
        }
    }
}

/// A black-box module implemented elsewhere.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ExtModule {
    pub name: Id,
    pub ports: Vec<PortDef>,
    /// Name to use for the module in place of `name` downstream.
    pub defname: Option<Id>,
    /// Parameters in declaration order.
    pub parameters: Vec<(Id, Param)>,
    #[cfg_attr(feature = "serialize", serde(skip))]
    pub pos: GPosIdx,
}

impl ExtModule {
    pub fn new<S: Into<Id>>(name: S, ports: Vec<PortDef>, pos: GPosIdx) -> Self {
        ExtModule {
            name: name.into(),
            ports,
            defname: None,
            parameters: vec![],
            pos,
        }
    }
}

impl GetName for ExtModule {
    fn name(&self) -> Id {
        self.name
    }
}

/// A definition inside a circuit.
#[derive(Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Definition {
    Module(RRC<Module>),
    ExtModule(ExtModule),
}

impl GetName for Definition {
    fn name(&self) -> Id {
        match self {
            Definition::Module(m) => m.borrow().name,
            Definition::ExtModule(e) => e.name,
        }
    }
}

impl WithPos for Definition {
    fn copy_span(&self) -> GPosIdx {
        match self {
            Definition::Module(m) => m.borrow().pos,
            Definition::ExtModule(e) => e.pos,
        }
    }
}

/// The top-level container of a FIRRTL program.
#[derive(Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Circuit {
    pub name: Id,
    /// Modules and external modules in source order.
    pub definitions: Vec<Definition>,
    #[cfg_attr(feature = "serialize", serde(skip))]
    pub pos: GPosIdx,
}

impl Circuit {
    pub fn new<S: Into<Id>>(name: S, pos: GPosIdx) -> Self {
        Circuit {
            name: name.into(),
            definitions: vec![],
            pos,
        }
    }

    /// Append a new module and return it together with its argument values.
    pub fn add_module<S: Into<Id>>(
        &mut self,
        name: S,
        ports: Vec<PortDef>,
        pos: GPosIdx,
    ) -> (RRC<Module>, Vec<Value>) {
        let module = rrc(Module::new(name, ports, pos));
        let args = module.borrow().arguments();
        self.definitions
            .push(Definition::Module(Rc::clone(&module)));
        (module, args)
    }

    /// Append an external module.
    pub fn add_extmodule(&mut self, ext: ExtModule) {
        self.definitions.push(Definition::ExtModule(ext));
    }

    pub fn modules(&self) -> impl Iterator<Item = &RRC<Module>> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Module(m) => Some(m),
            Definition::ExtModule(_) => None,
        })
    }

    pub fn ext_modules(&self) -> impl Iterator<Item = &ExtModule> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::ExtModule(e) => Some(e),
            Definition::Module(_) => None,
        })
    }

    /// Return the module with `name` if present.
    pub fn find_module<S: Into<Id>>(&self, name: S) -> Option<RRC<Module>> {
        let name = name.into();
        self.modules()
            .find(|m| m.borrow().name == name)
            .map(Rc::clone)
    }
}

impl GetName for Circuit {
    fn name(&self) -> Id {
        self.name
    }
}
