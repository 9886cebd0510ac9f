//! Internal representation for FIRRTL circuits.
//!
//! The representation is built directly by the parser: every node is created
//! once, when its grammar rule matches, and statements are only ever appended
//! to the end of a module body. Values are cheap handles to the port or wire
//! that produces them.

// Modules defining internal structures.
mod builder;
mod common;
mod module;
mod printer;
mod structure;
mod types;

/// Lowering of module signatures to RTL.
pub mod rtl;
/// Structural verification of circuits.
pub mod verify;

// Re-export types at the module level.
pub use builder::Builder;
pub use common::{rrc, RRC};
pub use fir_utils::{GetName, Id};
pub use module::{Circuit, Definition, ExtModule, Module, Param};
pub use printer::Printer;
pub use structure::{
    Connect, Direction, Port, PortDef, Statement, Value, Wire,
};
pub use types::{BundleElement, Type, Width};
pub use verify::verify;
