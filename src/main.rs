//! rutgen - Chilean RUT generator
//!
//! Generates random valid RUTs, reformats raw ones, validates check digits,
//! and can serve all of that as an MCP server over stdio.

use clap::{Args, Parser, Subcommand};
use rutgen::{RutFormat, RutgenConfig, clean_rut, format_rut, random_ruts, validate_rut};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rutgen")]
#[command(about = "Generate, format and validate Chilean RUTs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML file with default separators and list size
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print random valid RUTs
    Generate {
        /// How many to print (defaults to the configured list size)
        #[arg(short = 'n', long)]
        count: Option<usize>,
        #[command(flatten)]
        separators: SeparatorArgs,
        /// Print a JSON array instead of one RUT per line
        #[arg(long)]
        json: bool,
    },
    /// Apply separators to a raw RUT (body digits followed by check digit)
    Format {
        rut: String,
        #[command(flatten)]
        separators: SeparatorArgs,
        /// Drop everything but digits and K before formatting
        #[arg(long)]
        clean: bool,
    },
    /// Check a RUT's check digit, exiting with status 1 when it is wrong
    Validate { rut: String },
    /// Serve the RUT tools over MCP on stdio
    Mcp {
        #[command(flatten)]
        separators: SeparatorArgs,
    },
}

#[derive(Args, Debug, Default)]
struct SeparatorArgs {
    /// Inserted between groups of three body digits, e.g. "."
    #[arg(short = 'b', long)]
    body_separator: Option<String>,
    /// Inserted before the check digit
    #[arg(short = 'c', long)]
    check_digit_separator: Option<String>,
}

impl SeparatorArgs {
    fn apply(&self, base: &RutFormat) -> RutFormat {
        base.with_overrides(
            self.body_separator.as_deref(),
            self.check_digit_separator.as_deref(),
        )
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RUTGEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries results (and the MCP transport), so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let config = RutgenConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Generate {
            count,
            separators,
            json,
        } => {
            let format = separators.apply(&config.format);
            let ruts = random_ruts(count.unwrap_or(config.list_size), &format);
            if json {
                println!("{}", serde_json::to_string_pretty(&ruts)?);
            } else {
                for rut in ruts {
                    println!("{}", rut);
                }
            }
        }
        Command::Format {
            rut,
            separators,
            clean,
        } => {
            let format = separators.apply(&config.format);
            let raw = if clean { clean_rut(&rut) } else { rut };
            println!("{}", format_rut(&raw, &format));
        }
        Command::Validate { rut } => match validate_rut(&rut) {
            Ok(valid) => println!("{} is valid", valid.format(&config.format)),
            Err(e) => {
                eprintln!("{} is not valid: {}", rut, e);
                std::process::exit(1);
            }
        },
        Command::Mcp { separators } => {
            rutgen::mcp::run_mcp_server(separators.apply(&config.format)).await?;
        }
    }

    Ok(())
}
