//! `lcc`: the command-line front end for the lite compiler (§6, §10.2).
//!
//! Argument parsing is a single flat command (no subcommands, unlike the
//! multi-command CLI this binary's layout is borrowed from) since the whole
//! tool does one thing: compile one source file to one executable.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use lcc::codegen::Target;
use lcc::driver::{self, CompileOptions};

/// Ahead-of-time compiler for the lite source language, targeting native
/// Linux executables.
#[derive(Parser, Debug)]
#[command(name = "lcc", author, version, about)]
struct Cli {
    /// The `.lc` source file to compile.
    input: PathBuf,

    /// Path of the resulting executable. Defaults to the input's file stem.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep the generated assembly (`.s`) file instead of deleting it.
    #[arg(short = 'S', long = "keep-asm")]
    keep_asm: bool,

    /// Raise the log level from `error` to `info`, printing one line per
    /// pipeline phase.
    #[arg(short, long)]
    verbose: bool,

    /// Override the target instead of detecting it from `uname -m`.
    /// Accepts `x86_64`/`x86-64`/`amd64`, `arm64`/`aarch64`, and
    /// `arm32`/`arm`/`armv7`.
    #[arg(long)]
    target: Option<Target>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::Level::Info
    } else {
        log::Level::Error
    };
    simple_logger::init_with_level(level).expect("logger already initialized");

    if cli.input.extension().and_then(|e| e.to_str()) != Some("lc") {
        warn!(
            "{} does not end in .lc, compiling it anyway",
            cli.input.display()
        );
    }

    let output = cli.output.unwrap_or_else(|| {
        let stem = cli.input.file_stem().unwrap_or(cli.input.as_os_str());
        PathBuf::from(stem)
    });

    let target = match cli.target {
        Some(target) => target,
        None => match driver::detect_host_target() {
            Ok(target) => target,
            Err(e) => {
                error!("{}: {e}", e.phase());
                return ExitCode::FAILURE;
            }
        },
    };

    let opts = CompileOptions {
        input: cli.input,
        output,
        target,
        keep_asm: cli.keep_asm,
    };

    match driver::compile(&opts) {
        Ok(()) => {
            info!("wrote {}", opts.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}: {e}", e.phase());
            ExitCode::FAILURE
        }
    }
}
