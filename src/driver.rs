//! Driver for the firc binary.
use crate::cmdline::{EmitOpt, Opts};
use fir_frontend::FirParser;
use fir_ir as ir;
use fir_utils::FirResult;
use std::io::Write;

/// Run the frontend from the command line.
pub fn run_compiler() -> FirResult<()> {
    // parse the command line arguments into Opts struct
    let opts = Opts::get_opts()?;

    // enable tracing
    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(opts.log_level)
        .target(env_logger::Target::Stderr)
        .init();

    // Parsing also runs the verifier.
    let circuit = match &opts.file {
        Some(path) => FirParser::parse_file(path)?,
        None => FirParser::parse(std::io::stdin())?,
    };

    emit(&circuit, &opts)
}

/// Write `circuit` to the output selected by `opts`.
pub fn emit(circuit: &ir::Circuit, opts: &Opts) -> FirResult<()> {
    match opts.emit {
        EmitOpt::None => Ok(()),
        EmitOpt::Fir => {
            let out = &mut opts.output.get_write()?;
            ir::Printer::write_circuit(circuit, out)?;
            out.flush()?;
            Ok(())
        }
        EmitOpt::Json => write_json(circuit, opts),
        EmitOpt::Rtl => {
            let modules = ir::rtl::lower_circuit(circuit)?;
            let out = &mut opts.output.get_write()?;
            ir::rtl::write_modules(&modules, out)?;
            out.flush()?;
            Ok(())
        }
    }
}

#[cfg(feature = "serialize")]
fn write_json(circuit: &ir::Circuit, opts: &Opts) -> FirResult<()> {
    let out = &mut opts.output.get_write()?;
    if opts.output.isatty() {
        serde_json::to_writer_pretty(&mut *out, circuit)?;
    } else {
        serde_json::to_writer(&mut *out, circuit)?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(not(feature = "serialize"))]
fn write_json(_circuit: &ir::Circuit, _opts: &Opts) -> FirResult<()> {
    Err(fir_utils::Error::misc(
        "`--emit json` requires firc to be built with the `serialize` feature",
    ))
}
