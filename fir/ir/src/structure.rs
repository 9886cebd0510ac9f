//! Representation for ports, wires, and connects in a FIRRTL module.
use crate::{GetName, Id, Type};
use fir_utils::{GPosIdx, WithPos};
use std::rc::Rc;

/// Direction of a port. Output ports carry a flipped type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Direction {
    Input,
    Output,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

/// Declaration of a port in a module signature.
/// The direction is encoded in the type: an output port is a [Type::Flip].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct PortDef {
    pub name: Id,
    pub ty: Type,
    #[cfg_attr(feature = "serialize", serde(skip))]
    pub pos: GPosIdx,
}

impl PortDef {
    pub fn new<S: Into<Id>>(name: S, ty: Type, pos: GPosIdx) -> Self {
        Self {
            name: name.into(),
            ty,
            pos,
        }
    }

    pub fn direction(&self) -> Direction {
        if self.ty.is_flip() {
            Direction::Output
        } else {
            Direction::Input
        }
    }
}

impl WithPos for PortDef {
    fn copy_span(&self) -> GPosIdx {
        self.pos
    }
}

/// A port of a module. Each port is one argument value of the module body.
#[derive(Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Port {
    pub name: Id,
    pub ty: Type,
    /// Position of this port in the module signature.
    pub index: usize,
    #[cfg_attr(feature = "serialize", serde(skip))]
    pub pos: GPosIdx,
}

impl Port {
    pub fn direction(&self) -> Direction {
        if self.ty.is_flip() {
            Direction::Output
        } else {
            Direction::Input
        }
    }
}

/// A named internal value of a module.
#[derive(Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Wire {
    pub name: Id,
    pub ty: Type,
    #[cfg_attr(feature = "serialize", serde(skip))]
    pub pos: GPosIdx,
}

/// Handle to a value that can appear in a connect: a module argument or the
/// result of a wire declaration. Handles are equal when they refer to the same
/// node.
#[derive(Debug, Clone)]
pub enum Value {
    Port(Rc<Port>),
    Wire(Rc<Wire>),
}

impl GetName for Value {
    fn name(&self) -> Id {
        match self {
            Value::Port(p) => p.name,
            Value::Wire(w) => w.name,
        }
    }
}

impl WithPos for Value {
    fn copy_span(&self) -> GPosIdx {
        match self {
            Value::Port(p) => p.pos,
            Value::Wire(w) => w.pos,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Port(a), Value::Port(b)) => Rc::ptr_eq(a, b),
            (Value::Wire(a), Value::Wire(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

#[cfg(feature = "serialize")]
impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.name(), serializer)
    }
}

/// Drive `dest` with `src`.
#[derive(Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Connect {
    pub dest: Value,
    pub src: Value,
    #[cfg_attr(feature = "serialize", serde(skip))]
    pub pos: GPosIdx,
}

impl WithPos for Connect {
    fn copy_span(&self) -> GPosIdx {
        self.pos
    }
}

/// A statement in a module body.
#[derive(Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Statement {
    Wire(Rc<Wire>),
    Connect(Connect),
}
