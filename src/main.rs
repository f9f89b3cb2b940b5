// kplc: KPL front end with scope checking and declaration dump

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use crossterm::tty::IsTty;
use log::{debug, LevelFilter};

use kplc::compiler::{compile, tokens};
use kplc::diagnostics::Reporter;
use kplc::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Parser)]
#[command(
    name = "kplc",
    version,
    about = "Parse and scope-check a KPL program",
    long_about = "Parse and scope-check a KPL program. On success the declaration tree \
                  is printed to stdout; the first defect is reported as LINE-COL:message."
)]
struct Cli {
    /// KPL source file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Do not print the declaration tree on success
    #[arg(short, long, action = ArgAction::SetTrue)]
    quiet: bool,

    /// Print the token stream instead of compiling
    #[arg(long, action = ArgAction::SetTrue)]
    tokens: bool,

    /// Colorize diagnostics
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, value_name = "WHEN")]
    color: ColorChoice,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stderr().is_tty(),
    };
    let reporter = Reporter::new(color);

    let source = match fs::read_to_string(&cli.input) {
        Ok(source) => source,
        Err(source) => {
            let err = CompileError::Io {
                path: cli.input.clone(),
                source,
            };
            emit(&reporter, &err, None);
            return ExitCode::from(2);
        }
    };
    debug!("read {} ({} bytes)", cli.input.display(), source.len());

    let outcome = if cli.tokens {
        dump_tokens(&source)
    } else {
        compile(&source).map(|compilation| {
            if !cli.quiet {
                print!("{}", compilation.render_tree());
            }
        })
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(diag) => {
            emit(&reporter, &CompileError::from(diag), Some(&source));
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

/// Print tokens as they are scanned, so a lexical defect still shows the
/// tokens before it.
fn dump_tokens(source: &str) -> Result<(), kplc::Diagnostic> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for token in tokens(source) {
        let token = token?;
        // A closed stdout ends the dump quietly
        if writeln!(out, "{}:{}", token.location, token).is_err() {
            break;
        }
    }
    Ok(())
}

fn emit(reporter: &Reporter, err: &CompileError, source: Option<&str>) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    if reporter.report(&mut out, err, source).is_err() {
        eprintln!("error: {}", err);
    }
}
