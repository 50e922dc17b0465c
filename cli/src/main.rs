use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use rangeshuf::{derive, Params, SeqConfig, Shuffle};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Print a shuffled integer range, one value per line
#[derive(Parser, Debug)]
#[command(name = "rangeshuf", version, long_about = None)]
struct Cli {
    /// Print the parameters to stderr before enumerating
    #[arg(short, long)]
    verbose: bool,

    /// Print the parameters to stderr and do not enumerate
    #[arg(short, long)]
    quiet: bool,

    /// Drain through the thread-safe wrapper (same order)
    #[arg(short = 't', long = "threaded")]
    sync: bool,

    /// [MIN [START]] MAX [MULT MOD], MIN defaults to 1 and 0 leaves a value unset
    #[arg(value_name = "N", required = true)]
    values: Vec<u64>,
}

/// Bad values exit 1, anything else clap rejects (unknown flags) exits 2.
fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::WrongNumberOfValues
        | ErrorKind::MissingRequiredArgument => 1,
        _ => 2,
    }
}

/// `[MIN [START]] MAX [MULT MOD]`, with MIN defaulting to 1 and 0 meaning unset.
fn parse_params(values: &[u64]) -> Result<Params, String> {
    let (min, start, max, mult, modulus) = match *values {
        [max] => (1, 0, max, 0, 0),
        [min, max] => (min, 0, max, 0, 0),
        [min, start, max] => (min, start, max, 0, 0),
        [min, start, max, mult, modulus] => (min, start, max, mult, modulus),
        _ => {
            return Err(format!(
                "expected 1, 2, 3 or 5 values, got {}",
                values.len()
            ))
        }
    };

    if mult == 0 || modulus == 0 {
        return Ok(derive(min, max, start));
    }

    Ok(Params {
        mult,
        modulus,
        min,
        max,
        start,
    })
}

fn dump(params: Params, sync: bool) {
    let Params {
        mult,
        modulus,
        min,
        max,
        start,
    } = params;
    let wrap = if sync { ".into_sync()" } else { "" };

    eprintln!("// Iterate from {} to {}, inclusive.", min, max);
    eprintln!("// Repeat invocation: rangeshuf {} {} {}", min, start, max);
    eprintln!(
        "// Instant invocation: rangeshuf {} {} {} {} {}",
        min, start, max, mult, modulus
    );
    eprintln!(
        "let seq = Seq::new({}, {}, {}, {}, {})?{};",
        mult, modulus, min, max, start, wrap
    );
    eprintln!(
        "let derived = Seq::from_params(derive({}, {}, {}))?{};",
        min, max, start, wrap
    );
    eprintln!(
        "let rotated = Seq::new({}, {}, {}, {}, 0)?{};",
        mult, modulus, min, max, wrap
    );
}

fn enumerate<S: Shuffle>(mut seq: S) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    loop {
        let (value, more) = seq.advance();
        if !more {
            break;
        }
        writeln!(out, "{}", value)?;
    }

    out.flush()
}

/// Prints a clap-formatted error with usage and turns its kind into an exit code.
fn fail(kind: ErrorKind, message: impl std::fmt::Display) -> ExitCode {
    let err = Cli::command().error(kind, message);
    // Nothing left to report to if stderr is gone.
    let _ = err.print();
    ExitCode::from(exit_code(kind))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(exit_code(err.kind()));
        }
    };

    let params = match parse_params(&cli.values) {
        Ok(params) => params,
        Err(reason) => return fail(ErrorKind::WrongNumberOfValues, reason),
    };

    debug!(?params, "parsed arguments");

    let seq = match SeqConfig::from(params).build_with(&mut rand::rng()) {
        Ok(seq) => seq,
        Err(e) => {
            error!(error = %e, "invalid sequence");
            return fail(ErrorKind::ValueValidation, e);
        }
    };

    if cli.verbose || cli.quiet {
        dump(seq.params(), cli.sync);
    }

    if cli.quiet {
        return ExitCode::SUCCESS;
    }

    let result = if cli.sync {
        enumerate(seq.into_sync())
    } else {
        enumerate(seq)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        // Downstream closed the pipe, e.g. `rangeshuf 1000000 | head`.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "failed to write output");
            ExitCode::FAILURE
        }
    }
}
