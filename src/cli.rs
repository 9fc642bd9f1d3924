use std::env;
use std::path::PathBuf;

/// What the binary should do after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Evaluate one input and print the result.
    Simulate { load_mw: f64, generation_mw: f64 },
    /// Run the HTTP API.
    Serve,
}

/// Parsed command-line options. `None` fields defer to the config file.
#[derive(Debug, Clone)]
pub struct CliOptions {
    pub command: Command,
    pub config: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub engine_url: Option<String>,
    pub engine_timeout_ms: Option<u64>,
    pub json_logs: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut config = None;
    let mut load = None;
    let mut generation = None;
    let mut serve = false;
    let mut host = None;
    let mut port = None;
    let mut engine_url = None;
    let mut engine_timeout_ms = None;
    let mut json_logs = false;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--load" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --load (expected MW)")?;
                load = Some(parse_mw("--load", value)?);
            }
            "--generation" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --generation (expected MW)")?;
                generation = Some(parse_mw("--generation", value)?);
            }
            "--serve" => serve = true,
            "--host" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --host (expected an IP)")?;
                host = Some(value.to_string());
            }
            "--port" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                port = Some(
                    value
                        .parse::<u16>()
                        .map_err(|_| format!("--port value \"{value}\" is not a valid u16"))?,
                );
            }
            "--engine-url" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --engine-url (expected a URL)")?;
                engine_url = Some(value.to_string());
            }
            "--engine-timeout-ms" => {
                i += 1;
                let value = args.next_or_err(
                    i,
                    "missing value for --engine-timeout-ms (expected milliseconds)",
                )?;
                engine_timeout_ms = Some(value.parse::<u64>().map_err(|_| {
                    format!("--engine-timeout-ms value \"{value}\" is not a valid u64")
                })?);
            }
            "--json-logs" => json_logs = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    let command = match (load, generation) {
        (Some(_), Some(_)) if serve => {
            return Err(
                "`--serve` cannot be combined with `--load`/`--generation`; choose one mode"
                    .to_string(),
            );
        }
        (Some(load_mw), Some(generation_mw)) => Command::Simulate {
            load_mw,
            generation_mw,
        },
        (None, None) => Command::Serve,
        _ => return Err("`--load` and `--generation` must be given together".to_string()),
    };

    Ok(CliOptions {
        command,
        config,
        host,
        port,
        engine_url,
        engine_timeout_ms,
        json_logs,
    })
}

fn parse_mw(flag: &str, value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .map_err(|_| format!("{flag} value \"{value}\" is not a number"))
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
    eprintln!("grid-sim — power grid stability simulator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  grid-sim [--config <path>] --load <mw> --generation <mw>");
    eprintln!("  grid-sim [--config <path>] [--serve] [--host <ip>] [--port <u16>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>           Load service config from TOML file");
    eprintln!("  --load <mw>               System load for a one-shot simulation");
    eprintln!("  --generation <mw>         System generation for a one-shot simulation");
    eprintln!("  --serve                   Start the REST API (default without inputs)");
    eprintln!("  --host <ip>               Bind address (default: 0.0.0.0)");
    eprintln!("  --port <u16>              Bind port (default: 8000)");
    eprintln!("  --engine-url <url>        Remote simulation engine base URL");
    eprintln!("  --engine-timeout-ms <ms>  Per-call engine timeout (default: 5000)");
    eprintln!("  --json-logs               Emit logs as JSON lines");
    eprintln!("  --help                    Show this help message");
}
