use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches, Parser};
use machine_flags_core::clap_flags::{self, MatchesCommandLine};
use machine_flags_core::{DriverFlagSet, DriverOptions, driver_options, parse_swarm_discovery};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DRIVER_FLAGS_ENV: &str = "MACHINE_DRIVER_FLAGS";

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

/// Options of the tool itself. Driver flags are added at runtime from the
/// flag set named by `--driver-flags`.
#[derive(Debug, Parser)]
#[command(name = "machine-flags")]
#[command(about = "Register a driver flag set, parse it and print the resolved driver options")]
struct Cli {
    /// YAML or JSON file declaring the driver's flags.
    #[arg(long, env = DRIVER_FLAGS_ENV, value_name = "PATH")]
    driver_flags: Option<PathBuf>,
    /// Swarm discovery URL (e.g. token://<id>). Empty disables discovery.
    #[arg(long, default_value = "", value_name = "URL")]
    swarm_discovery: String,
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

fn main() {
    init_tracing();

    if let Err(err) = run(std::env::args_os().collect()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn run(args: Vec<OsString>) -> Result<(), String> {
    let set = match driver_flags_path(&args) {
        Some(path) => DriverFlagSet::load(&path)
            .map_err(|err| format!("Failed to load driver flags '{}': {err}", path.display()))?,
        None => DriverFlagSet {
            driver: "none".to_string(),
            flags: Vec::new(),
        },
    };
    check_reserved_names(&set)?;

    let flags = set.to_cli_flags().map_err(|err| err.to_string())?;
    let matches = clap_flags::register(Cli::command(), &flags)
        .try_get_matches_from(&args)
        .unwrap_or_else(|err| err.exit());
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());

    if !cli.swarm_discovery.is_empty() {
        match parse_swarm_discovery(&cli.swarm_discovery) {
            Ok(discovery) => debug!(backend = ?discovery.backend, "Swarm discovery accepted"),
            Err(err) => Cli::command().error(ErrorKind::ValueValidation, err).exit(),
        }
    }

    let options = driver_options(&MatchesCommandLine::new(&matches), &set.flags);
    print_options(&set.driver, &options, cli.format)
}

/// Finds `--driver-flags` before the driver flags themselves are known.
///
/// A full parse is impossible at this point since every driver flag would
/// be rejected as unknown. Scanning stops at `--`; the environment variable
/// is the fallback.
fn driver_flags_path(args: &[OsString]) -> Option<PathBuf> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let Some(arg) = arg.to_str() else {
            continue;
        };
        if arg == "--" {
            break;
        }
        if arg == "--driver-flags" {
            return iter.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--driver-flags=") {
            return Some(PathBuf::from(path));
        }
    }
    std::env::var_os(DRIVER_FLAGS_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Rejects driver flags that would shadow one of the tool's own options.
fn check_reserved_names(set: &DriverFlagSet) -> Result<(), String> {
    let command = Cli::command();
    let mut reserved: HashSet<String> = HashSet::from(["help".to_string()]);
    for arg in command.get_arguments() {
        reserved.insert(arg.get_id().to_string());
        if let Some(long) = arg.get_long() {
            reserved.insert(long.to_string());
        }
    }

    match set.flags.iter().find(|flag| reserved.contains(flag.name())) {
        Some(flag) => Err(format!(
            "Driver '{}' declares flag '{}', which is reserved",
            set.driver,
            flag.name()
        )),
        None => Ok(()),
    }
}

fn print_options(
    driver: &str,
    options: &DriverOptions,
    format: OutputFormat,
) -> Result<(), String> {
    let output = serde_json::json!({
        "driver": driver,
        "options": options,
    });
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&output)
            .map_err(|e| format!("Failed to serialize output: {e}"))?,
        OutputFormat::Yaml => serde_yaml::to_string(&output)
            .map_err(|e| format!("Failed to serialize output: {e}"))?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
