use anyhow::Result;
use clap::Parser;
use colored::*;
use std::io::IsTerminal;
use std::path::PathBuf;

use velocalc::cli::{CalcArgs, Outcome};
use velocalc::config::Profile;
use velocalc::logging::{init_logging, LogConfig, LogFormat};

/// velocalc - Cycling power and time calculator
///
/// Given a distance and either a power or a duration, calculates the other
/// using a physical model of aerodynamic drag, rolling resistance, bearing
/// friction and climbing.
#[derive(Parser)]
#[command(name = "velocalc")]
#[command(author = "velocalc contributors")]
#[command(version)]
#[command(about = "Cycling power and time calculator", long_about = None)]
struct Cli {
    /// Rider profile to take defaults from [default: ~/.velocalc/profile.toml]
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of diagnostics on stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Diagnostics format on stderr (pretty, json, compact)
    #[arg(long, value_name = "FORMAT", default_value = "compact")]
    log_format: LogFormat,

    /// Also write diagnostics as JSON lines to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Roll the log file over daily
    #[arg(long, requires = "log_file")]
    log_rotate: bool,

    #[command(flatten)]
    calc: CalcArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogConfig {
        format: cli.log_format,
        file_path: cli.log_file.clone(),
        rotation: cli.log_rotate,
        ..LogConfig::from_verbosity(cli.verbose)
    })?;

    let profile = Profile::load_or_default(cli.config.as_deref())?;

    let calculation = match cli.calc.resolve(&profile) {
        Ok(calculation) => calculation,
        Err(e) => {
            tracing::debug!(error = ?e, "rejected input");
            eprintln!("{} {}", "error:".red().bold(), e);
            if e.is_usage_error() {
                eprintln!("\nFor more information, try '{}'.", "--help".bold());
            }
            std::process::exit(1);
        }
    };

    let outcome = calculation.run();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let pretty = std::io::stdout().is_terminal();
    let line = calculation.render(&outcome, pretty);
    if !pretty {
        println!("{}", line);
        return Ok(());
    }

    match outcome {
        Outcome::Duration { converged: false, .. } => {
            println!("{}", line.yellow());
            eprintln!(
                "{}",
                "warning: power is outside the modelled 0-100 m/s range, result is a bound".yellow()
            );
        }
        _ => println!("{}", line.green().bold()),
    }

    Ok(())
}
