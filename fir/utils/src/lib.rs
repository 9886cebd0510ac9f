//! Shared utilities for the FIRRTL frontend.
mod errors;
mod id;
mod out_file;
mod position;

pub use errors::{Error, FirResult};
pub use id::{GSym, GetName, Id};
pub use out_file::OutputFile;
pub use position::{
    FileIdx, GPosIdx, GlobalPositionTable, PosIdx, PositionTable, WithPos,
};
