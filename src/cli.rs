//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct CliOptions {
    /// TOML configuration file.
    pub config: Option<PathBuf>,
    /// Overrides `server.host`.
    pub host: Option<String>,
    /// Overrides `server.port`.
    pub port: Option<u16>,
    /// Run a CSV batch instead of serving.
    pub batch: Option<PathBuf>,
    /// Batch output file; stdout when absent.
    pub out: Option<PathBuf>,
    pub help: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

/// Parses options from an argument list (program name excluded).
///
/// # Errors
///
/// Returns a message for unknown flags, missing or invalid values,
/// repeated flags, and `--out` without `--batch`.
pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions::default();

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --config (expected a TOML file path)",
                )?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--host" => {
                i += 1;
                let host = args.next_or_err(
                    i,
                    "missing value for --host (expected an IP address)",
                )?;
                if opts.host.replace(host.to_string()).is_some() {
                    return Err("--host provided more than once".to_string());
                }
            }
            "--port" => {
                i += 1;
                let raw = args.next_or_err(
                    i,
                    "missing value for --port (expected a u16)",
                )?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                if opts.port.replace(port).is_some() {
                    return Err("--port provided more than once".to_string());
                }
            }
            "--batch" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --batch (expected a CSV file path)",
                )?;
                if opts.batch.replace(PathBuf::from(path)).is_some() {
                    return Err("--batch provided more than once".to_string());
                }
            }
            "--out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --out (expected a file path)",
                )?;
                if opts.out.replace(PathBuf::from(path)).is_some() {
                    return Err("--out provided more than once".to_string());
                }
            }
            "--help" | "-h" => opts.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.out.is_some() && opts.batch.is_none() {
        return Err("--out requires --batch".to_string());
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("green-calc: carbon-credit estimates for renewable energy plants");
    eprintln!();
    eprintln!("Usage: green-calc [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>   Load configuration from a TOML file");
    eprintln!("  --host <addr>     Bind address (overrides server.host)");
    eprintln!("  --port <u16>      Bind port (overrides server.port)");
    eprintln!("  --batch <path>    Predict every row of a CSV file instead of serving");
    eprintln!("  --out <path>      Write batch results here (default: stdout)");
    eprintln!("  --help            Show this help message");
}
