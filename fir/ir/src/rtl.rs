//! Lowering of module signatures to RTL.
//!
//! Every module and external module becomes an RTL module whose ports have
//! flat integer or struct types. Flips only decide the direction of a port and
//! are removed from its type. Module bodies are not lowered.
use crate::{self as ir, GetName, Id};
use fir_utils::{Error, FirResult, GPosIdx};
use itertools::Itertools;
use std::io;

/// A type in the RTL representation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum RtlType {
    /// Signless integer of the given number of bits.
    Integer(u64),
    /// Named fields in declaration order.
    Struct(Vec<(Id, RtlType)>),
    /// A bidirectional signal.
    InOut(Box<RtlType>),
}

impl RtlType {
    /// Lower a FIRRTL type. Bundles become structs and everything else becomes
    /// an integer of its total width. Returns `None` when a width is unknown.
    pub fn lower(ty: &ir::Type) -> Option<RtlType> {
        match ty.passive() {
            ir::Type::Bundle(elements) => elements
                .iter()
                .map(|e| Some((e.name, RtlType::lower(&e.ty)?)))
                .collect::<Option<Vec<_>>>()
                .map(RtlType::Struct),
            passive => passive.bit_width().map(RtlType::Integer),
        }
    }

    fn is_zero_width(&self) -> bool {
        matches!(self, RtlType::Integer(0))
    }
}

impl std::fmt::Display for RtlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RtlType::Integer(width) => write!(f, "i{width}"),
            RtlType::Struct(fields) => write!(
                f,
                "!rtl.struct<{}>",
                fields
                    .iter()
                    .map(|(name, ty)| format!("{name}: {ty}"))
                    .join(", ")
            ),
            RtlType::InOut(inner) => write!(f, "!rtl.inout<{inner}>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum PortDirection {
    Input,
    Output,
    InOut,
}

/// A port of a lowered module.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct RtlPort {
    pub name: Id,
    pub direction: PortDirection,
    pub ty: RtlType,
    /// Index among the module arguments (inputs and inouts) or among its
    /// results (outputs).
    pub arg_num: usize,
}

/// Information carried over from an external module.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct External {
    /// The `defname` of the external module, if it had one.
    pub verilog_name: Option<Id>,
    pub parameters: Vec<(Id, ir::Param)>,
}

/// A lowered module signature.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct RtlModule {
    pub name: Id,
    pub ports: Vec<RtlPort>,
    /// Set for modules that are implemented elsewhere.
    pub external: Option<External>,
}

impl RtlModule {
    pub fn inputs(&self) -> impl Iterator<Item = &RtlPort> {
        self.ports
            .iter()
            .filter(|p| p.direction != PortDirection::Output)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &RtlPort> {
        self.ports
            .iter()
            .filter(|p| p.direction == PortDirection::Output)
    }

    /// Write the signature in MLIR syntax, e.g.
    /// `rtl.module @Foo(%a: i8) -> (%b: i8)`.
    pub fn write<F: io::Write>(&self, f: &mut F) -> io::Result<()> {
        let args = self
            .inputs()
            .map(|p| format!("%{}: {}", p.name, p.ty))
            .join(", ");
        let results = self
            .outputs()
            .map(|p| format!("%{}: {}", p.name, p.ty))
            .join(", ");
        match &self.external {
            None => writeln!(f, "rtl.module @{}({args}) -> ({results})", self.name),
            Some(ext) => {
                write!(
                    f,
                    "rtl.externmodule @{}({args}) -> ({results})",
                    self.name
                )?;
                let mut attrs = vec![];
                if let Some(verilog_name) = ext.verilog_name {
                    attrs.push(format!("verilogName = \"{verilog_name}\""));
                }
                if !ext.parameters.is_empty() {
                    let params = ext
                        .parameters
                        .iter()
                        .map(|(name, value)| format!("{name} = {value}"))
                        .join(", ");
                    attrs.push(format!("parameters = {{{params}}}"));
                }
                if attrs.is_empty() {
                    writeln!(f)
                } else {
                    writeln!(f, " attributes {{{}}}", attrs.join(", "))
                }
            }
        }
    }
}

impl GetName for RtlModule {
    fn name(&self) -> Id {
        self.name
    }
}

/// Lower a list of ports. Zero-width ports are dropped. Flipped ports become
/// outputs, analog ports become inouts, and the rest become inputs.
fn lower_ports<'a, I>(ports: I) -> FirResult<Vec<RtlPort>>
where
    I: Iterator<Item = (Id, &'a ir::Type, GPosIdx)>,
{
    let mut lowered = vec![];
    let (mut num_args, mut num_results) = (0, 0);
    for (name, ty, pos) in ports {
        let Some(rtl_ty) = RtlType::lower(ty) else {
            return Err(Error::malformed_structure(
                "cannot lower this port type to RTL",
            )
            .with_pos(&pos));
        };
        if rtl_ty.is_zero_width() {
            log::trace!("Dropping zero-width port `{name}`");
            continue;
        }
        let port = if ty.is_flip() {
            num_results += 1;
            RtlPort {
                name,
                direction: PortDirection::Output,
                ty: rtl_ty,
                arg_num: num_results - 1,
            }
        } else if matches!(ty, ir::Type::Analog(_)) {
            num_args += 1;
            RtlPort {
                name,
                direction: PortDirection::InOut,
                ty: RtlType::InOut(Box::new(rtl_ty)),
                arg_num: num_args - 1,
            }
        } else {
            num_args += 1;
            RtlPort {
                name,
                direction: PortDirection::Input,
                ty: rtl_ty,
                arg_num: num_args - 1,
            }
        };
        lowered.push(port);
    }
    Ok(lowered)
}

pub fn lower_module(module: &ir::Module) -> FirResult<RtlModule> {
    let ports =
        lower_ports(module.ports.iter().map(|p| (p.name, &p.ty, p.pos)))?;
    Ok(RtlModule {
        name: module.name,
        ports,
        external: None,
    })
}

pub fn lower_extmodule(ext: &ir::ExtModule) -> FirResult<RtlModule> {
    let ports = lower_ports(ext.ports.iter().map(|p| (p.name, &p.ty, p.pos)))?;
    Ok(RtlModule {
        name: ext.name,
        ports,
        external: Some(External {
            verilog_name: ext.defname,
            parameters: ext.parameters.clone(),
        }),
    })
}

/// Lower the signature of every definition in `circuit`, in source order.
pub fn lower_circuit(circuit: &ir::Circuit) -> FirResult<Vec<RtlModule>> {
    let modules = circuit
        .definitions
        .iter()
        .map(|def| match def {
            ir::Definition::Module(m) => lower_module(&m.borrow()),
            ir::Definition::ExtModule(e) => lower_extmodule(e),
        })
        .collect::<FirResult<Vec<_>>>()?;
    log::debug!(
        "Lowered {} definitions of circuit `{}`",
        modules.len(),
        circuit.name
    );
    Ok(modules)
}

/// Write every module signature, one per line.
pub fn write_modules<F: io::Write>(
    modules: &[RtlModule],
    f: &mut F,
) -> io::Result<()> {
    for module in modules {
        module.write(f)?;
    }
    Ok(())
}
