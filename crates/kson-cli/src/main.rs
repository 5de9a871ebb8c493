// kson: command-line front end for KSH/KSON conversion.

mod commands;
mod input;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ksh_model::ConverterConfig;

use input::write_output;

#[derive(Parser, Debug)]
#[command(name = "kson", version, about = "Convert KSH charts to KSON")]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to converter config JSON file.
    #[arg(long, env = "KSON_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a KSH chart to KSON.
    Convert {
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Validate a KSON chart.
    Validate { input: PathBuf },
    /// Print the structural model of a KSH chart as JSON.
    Ast {
        input: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Reprint a KSH chart in canonical form.
    Fmt {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => ConverterConfig::load_from(path)?,
        None => ConverterConfig::default(),
    };
    log::debug!("Converter config: {config:?}");

    match args.command {
        Command::Convert {
            input,
            output,
            pretty,
        } => {
            let json = commands::convert(&input, config, pretty)?;
            write_output(output.as_deref(), &json)?;
        }
        Command::Validate { input } => {
            commands::validate(&input)?;
            println!("{}: OK", input.display());
        }
        Command::Ast { input, pretty } => {
            let json = commands::ast(&input, pretty)?;
            write_output(None, &json)?;
        }
        Command::Fmt { input, output } => {
            let text = commands::fmt(&input)?;
            write_output(output.as_deref(), &text)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_convert_args() {
        let args = Args::parse_from(["kson", "-vv", "convert", "a.ksh", "-o", "a.kson", "--pretty"]);
        assert_eq!(args.verbose, 2);
        match args.command {
            Command::Convert {
                input,
                output,
                pretty,
            } => {
                assert_eq!(input, PathBuf::from("a.ksh"));
                assert_eq!(output, Some(PathBuf::from("a.kson")));
                assert!(pretty);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
