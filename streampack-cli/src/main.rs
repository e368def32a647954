//! Streampack CLI - convert images and fonts into streamable containers.
//!
//! This binary is a thin front-end over the `streampack` library: it parses
//! arguments, merges them with the config file and dispatches to a command.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand};

use commands::font::ConvertFontArgs;
use commands::image::ConvertImageArgs;
use commands::inspect::InspectArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "streampack")]
#[command(version, about = "Convert images and fonts into streamable display containers")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file [default: <config dir>/streampack/config.ini]
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Quantize an image and write an image container
    ConvertImage(ConvertImageArgs),

    /// Rasterize a font at a pixel size and write a font container
    ConvertFont(ConvertFontArgs),

    /// Print the header of an image or font container
    Inspect(InspectArgs),
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::ConvertImage(args) => {
            let config = commands::common::load_config(cli.config.as_deref())?;
            commands::image::run(args, &config)
        }
        Commands::ConvertFont(args) => {
            let config = commands::common::load_config(cli.config.as_deref())?;
            commands::font::run(args, &config)
        }
        Commands::Inspect(args) => commands::inspect::run(args),
    }
}

/// Usage errors exit with status 1 like any other failure; help and
/// version requests succeed.
fn exit_status_for(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Nothing useful to do if stderr is gone
            let _ = e.print();
            return ExitCode::from(exit_status_for(&e));
        }
    };
    streampack::logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
