//! Command line parsing for the firc binary.
use argh::FromArgs;
use fir_utils::{Error, FirResult, OutputFile};
use std::path::PathBuf;
use std::str::FromStr;

/// What to print once the circuit is parsed and verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitOpt {
    /// The circuit in `.fir` syntax.
    #[default]
    Fir,
    /// The IR as JSON.
    Json,
    /// Module signatures lowered to RTL.
    Rtl,
    /// Nothing; only report errors.
    None,
}

impl FromStr for EmitOpt {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "fir" => Ok(EmitOpt::Fir),
            "json" => Ok(EmitOpt::Json),
            "rtl" => Ok(EmitOpt::Rtl),
            "none" => Ok(EmitOpt::None),
            s => Err(format!(
                "Unknown emit option: {s}. Valid options: fir, json, rtl, none"
            )),
        }
    }
}

impl std::fmt::Display for EmitOpt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EmitOpt::Fir => "fir",
            EmitOpt::Json => "json",
            EmitOpt::Rtl => "rtl",
            EmitOpt::None => "none",
        };
        write!(f, "{name}")
    }
}

#[derive(FromArgs, Debug)]
#[argh(help_triggers("-h", "--help"))]
/// Parse and verify a FIRRTL circuit.
pub struct Opts {
    /// input file; standard input when absent
    #[argh(positional)]
    pub file: Option<PathBuf>,

    /// output file, default is stdout
    #[argh(option, short = 'o', default = "OutputFile::Stdout")]
    pub output: OutputFile,

    /// what to emit: fir, json, rtl, or none
    #[argh(option, default = "EmitOpt::default()")]
    pub emit: EmitOpt,

    /// logging level
    #[argh(option, long = "log", default = "log::LevelFilter::Warn")]
    pub log_level: log::LevelFilter,
}

impl Opts {
    /// Parse the command line and reject options this build cannot serve.
    pub fn get_opts() -> FirResult<Opts> {
        let opts: Opts = argh::from_env();
        if opts.emit == EmitOpt::Json && !cfg!(feature = "serialize") {
            return Err(Error::misc(
                "`--emit json` requires firc to be built with the `serialize` feature",
            ));
        }
        Ok(opts)
    }
}
