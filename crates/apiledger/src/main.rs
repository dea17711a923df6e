use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use apiledger_check::{
    AdditionalFile, ApiLedgerConfig, ApiListing, CancellationToken, CheckReport, RuleListing, check,
};
use apiledger_output::{OutputFormat, OutputFormatter, print_output_schema};
use apiledger_symbols::SymbolGraph;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Check a library's public API against its PublicAPI.txt baseline.
#[derive(Parser)]
#[command(name = "apiledger", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report public symbols missing from the baseline and stale baseline lines
    Check(CheckArgs),
    /// Print the signature names of every public API symbol, sorted
    List(ListArgs),
    /// List the drift rules with their configured severity
    Rules(RulesArgs),
    /// Print the JSON schema of the config file
    ConfigSchema,
}

#[derive(Args)]
struct OutputArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
    /// Output as JSON Lines
    #[arg(long)]
    jsonl: bool,
    /// Human-friendly output with colors
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,
    /// Compact output without colors
    #[arg(long)]
    compact: bool,
    /// Print the JSON schema of the command's output and exit
    #[arg(long)]
    output_schema: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Symbol graph (JSON)
    #[arg(long, value_name = "PATH")]
    symbols: PathBuf,
    /// Auxiliary input file; the baseline is picked from these by name
    #[arg(long = "additional-file", value_name = "PATH")]
    additional_files: Vec<PathBuf>,
    /// Config file to use instead of the global and project configs
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct ListArgs {
    /// Symbol graph (JSON)
    #[arg(long, value_name = "PATH")]
    symbols: PathBuf,
    /// Config file to use instead of the global and project configs
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct RulesArgs {
    /// Hide the description line
    #[arg(long)]
    no_desc: bool,
    /// Config file to use instead of the global and project configs
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(flatten)]
    output: OutputArgs,
}

/// Reset SIGPIPE to default behavior so piping to `head` etc. doesn't panic.
#[cfg(unix)]
fn reset_sigpipe() {
    // SAFETY: only changes the signal disposition of SIGPIPE back to the
    // POSIX default (terminate); no memory is touched.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<ApiLedgerConfig> {
    let config = match explicit {
        Some(path) => ApiLedgerConfig::load_file(path)?,
        None => {
            let root = std::env::current_dir().context("failed to read current directory")?;
            ApiLedgerConfig::load(&root)?
        }
    };
    Ok(config)
}

fn load_graph(path: &Path) -> anyhow::Result<SymbolGraph> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read symbol graph {}", path.display()))?;
    let graph = SymbolGraph::from_json(&json)
        .with_context(|| format!("invalid symbol graph {}", path.display()))?;
    tracing::debug!(path = %path.display(), symbols = graph.len(), "loaded symbol graph");
    Ok(graph)
}

/// Explicit additional files, or the baseline next to the symbol graph.
fn load_additional_files(
    explicit: &[PathBuf],
    symbols: &Path,
    config: &ApiLedgerConfig,
) -> anyhow::Result<Vec<AdditionalFile>> {
    if !explicit.is_empty() {
        return explicit
            .iter()
            .map(|path| AdditionalFile::read(path).map_err(anyhow::Error::from))
            .collect();
    }
    let sibling = symbols
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(config.baseline.file_name());
    if sibling.is_file() {
        Ok(vec![AdditionalFile::read(&sibling)?])
    } else {
        tracing::debug!(path = %sibling.display(), "no baseline next to symbol graph");
        Ok(Vec::new())
    }
}

fn output_format(args: &OutputArgs, config: &ApiLedgerConfig) -> OutputFormat {
    OutputFormat::from_cli(
        args.json,
        args.jsonl,
        args.pretty,
        args.compact,
        &config.pretty,
    )
}

fn run_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    if args.output.output_schema {
        print_output_schema::<CheckReport>();
        return Ok(ExitCode::SUCCESS);
    }
    let config = load_config(args.config.as_deref())?;
    let graph = load_graph(&args.symbols)?;
    let files = load_additional_files(&args.additional_files, &args.symbols, &config)?;

    let report = check(&graph, &files, &config, &CancellationToken::new())?;
    report.print(&output_format(&args.output, &config));

    Ok(if report.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn run_list(args: ListArgs) -> anyhow::Result<ExitCode> {
    if args.output.output_schema {
        print_output_schema::<ApiListing>();
        return Ok(ExitCode::SUCCESS);
    }
    let config = load_config(args.config.as_deref())?;
    let graph = load_graph(&args.symbols)?;
    ApiListing::of(&graph).print(&output_format(&args.output, &config));
    Ok(ExitCode::SUCCESS)
}

fn run_rules(args: RulesArgs) -> anyhow::Result<ExitCode> {
    if args.output.output_schema {
        print_output_schema::<RuleListing>();
        return Ok(ExitCode::SUCCESS);
    }
    let config = load_config(args.config.as_deref())?;
    let mut listing = RuleListing::of(&config);
    if args.no_desc {
        listing = listing.without_descriptions();
    }
    listing.print(&output_format(&args.output, &config));
    Ok(ExitCode::SUCCESS)
}

fn run_config_schema() -> anyhow::Result<ExitCode> {
    let schema = schemars::schema_for!(ApiLedgerConfig);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    reset_sigpipe();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check(args) => run_check(args),
        Commands::List(args) => run_list(args),
        Commands::Rules(args) => run_rules(args),
        Commands::ConfigSchema => run_config_schema(),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
