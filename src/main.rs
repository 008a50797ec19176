use logshare::server::{ServeConfig, run_http_server_on};
use std::io::{self, Write};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: IpAddr = IpAddr::V4(std::net::Ipv4Addr::LOCALHOST);
const DEFAULT_DIR: &str = ".claude/logs";

#[derive(Debug)]
struct CliArgs {
    port: u16,
    host: IpAddr,
    dir: PathBuf,
    help: bool,
}

#[derive(Debug, Error)]
enum CliParseError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing value for flag: {0}")]
    MissingFlagValue(&'static str),

    #[error("invalid value for {flag}: {value}")]
    InvalidFlagValue { flag: &'static str, value: String },
}

fn parse_args(argv: &[String]) -> Result<CliArgs, CliParseError> {
    let mut args = CliArgs {
        port: DEFAULT_PORT,
        host: DEFAULT_HOST,
        dir: PathBuf::from(DEFAULT_DIR),
        help: false,
    };

    let mut iter = argv.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => args.help = true,
            "--port" => {
                let value = iter
                    .next()
                    .ok_or(CliParseError::MissingFlagValue("--port"))?;
                args.port = value.parse().map_err(|_| CliParseError::InvalidFlagValue {
                    flag: "--port",
                    value: value.clone(),
                })?;
            }
            "--host" => {
                let value = iter
                    .next()
                    .ok_or(CliParseError::MissingFlagValue("--host"))?;
                args.host = value.parse().map_err(|_| CliParseError::InvalidFlagValue {
                    flag: "--host",
                    value: value.clone(),
                })?;
            }
            "--dir" => {
                let value = iter.next().ok_or(CliParseError::MissingFlagValue("--dir"))?;
                args.dir = PathBuf::from(value);
            }
            other => return Err(CliParseError::UnknownFlag(other.to_string())),
        }
    }

    Ok(args)
}

fn print_help() {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "Serve session logs over HTTP.");
    let _ = writeln!(out);
    let _ = writeln!(out, "Usage: logshare [options]");
    let _ = writeln!(out);
    let _ = writeln!(out, "Options:");
    let _ = writeln!(out, "  --port <port>   Listen port (default: {DEFAULT_PORT})");
    let _ = writeln!(out, "  --host <host>   Bind address (default: {DEFAULT_HOST})");
    let _ = writeln!(out, "  --dir <path>    Log directory (default: {DEFAULT_DIR})");
    let _ = writeln!(out, "  --help          Show this help");
}

fn main() {
    if let Err(error) = run_main() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let argv = std::env::args().collect::<Vec<_>>();
    let args = parse_args(&argv).map_err(|error| error.to_string())?;

    if args.help {
        print_help();
        return Ok(());
    }

    if !args.dir.is_dir() {
        return Err(format!(
            "  Log directory not found: {}\n  Run this from your project root, or specify --dir.",
            args.dir.display()
        ));
    }

    let addr = SocketAddr::new(args.host, args.port);
    let url = if args.host.is_loopback() {
        format!("http://localhost:{}", args.port)
    } else {
        format!("http://{addr}")
    };

    println!();
    println!("  Serving session logs at {url}");
    println!("  Log directory: {}", args.dir.display());
    println!();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|error| error.to_string())?;
    rt.block_on(async move { run_http_server_on(addr, ServeConfig { log_dir: args.dir }).await })
}
