use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use entryscan::core::{Pattern, PatternConfig};
use entryscan::formatters::{JsonCompactFormatter, TextFormatter};
use entryscan::{DiscoveryConfig, EntrypointDiscovery, ParseFailurePolicy};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "entryscan",
    version,
    about = "Find island component entrypoints by their marker imports"
)]
struct Cli {
    /// Source directory to scan
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Output file path (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Glob of files to include (repeatable)
    #[arg(long, value_name = "GLOB")]
    include: Vec<String>,

    /// Glob of files to exclude (repeatable)
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,

    /// Regex of files to include (repeatable)
    #[arg(long, value_name = "RE")]
    include_regex: Vec<String>,

    /// Regex of files to exclude (repeatable)
    #[arg(long, value_name = "RE")]
    exclude_regex: Vec<String>,

    /// Marker module name (repeatable, replaces the defaults)
    #[arg(short, long, value_name = "MODULE")]
    marker: Vec<String>,

    /// What to do with files that fail to parse
    #[arg(long, value_enum)]
    on_parse_error: Option<ParseErrorArg>,

    /// Sort entrypoints instead of keeping discovery order
    #[arg(long)]
    sort: bool,

    /// Output format: text, json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// JSON only: emit just the entrypoint array, without counts or skipped files
    #[arg(long)]
    minimal: bool,

    /// Log per-file decisions
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum ParseErrorArg {
    Fail,
    Skip,
}

impl From<ParseErrorArg> for ParseFailurePolicy {
    fn from(arg: ParseErrorArg) -> Self {
        match arg {
            ParseErrorArg::Fail => ParseFailurePolicy::Fail,
            ParseErrorArg::Skip => ParseFailurePolicy::Skip,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Patterns given on the command line, or `None` when there are none.
fn cli_patterns(globs: Vec<String>, regexes: Vec<String>) -> Option<PatternConfig> {
    let patterns: Vec<Pattern> = globs
        .into_iter()
        .map(Pattern::Glob)
        .chain(regexes.into_iter().map(|regex| Pattern::Regex { regex }))
        .collect();
    if patterns.is_empty() {
        None
    } else {
        Some(PatternConfig::from(patterns))
    }
}

fn build_config(cli: &mut Cli) -> Result<DiscoveryConfig> {
    let mut config = match &cli.config {
        Some(path) => DiscoveryConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DiscoveryConfig::default(),
    };

    if let Some(include) = cli_patterns(
        std::mem::take(&mut cli.include),
        std::mem::take(&mut cli.include_regex),
    ) {
        config = config.with_include(include);
    }
    if let Some(exclude) = cli_patterns(
        std::mem::take(&mut cli.exclude),
        std::mem::take(&mut cli.exclude_regex),
    ) {
        config = config.with_exclude(exclude);
    }
    if !cli.marker.is_empty() {
        config = config.with_markers(std::mem::take(&mut cli.marker));
    }
    if let Some(policy) = cli.on_parse_error {
        config = config.with_parse_failure_policy(policy.into());
    }
    if cli.sort {
        config = config.with_sort(true);
    }
    Ok(config)
}

fn run(mut cli: Cli) -> Result<()> {
    let start_time = Instant::now();
    let config = build_config(&mut cli)?;

    let discovery = EntrypointDiscovery::new(&config).context("invalid discovery configuration")?;
    let report = discovery
        .discover(&cli.input)
        .with_context(|| format!("discovering entrypoints under {}", cli.input.display()))?;

    let json = JsonCompactFormatter::new().with_minimal(cli.minimal);
    match &cli.output {
        Some(path) => {
            let written = match cli.format {
                OutputFormat::Text => TextFormatter::new().format_to_file(&report, path),
                OutputFormat::Json => json.format_to_file(&report, path),
            };
            written.with_context(|| format!("writing {}", path.display()))?;
            info!(output = %path.display(), "wrote entrypoint list");
        }
        None => match cli.format {
            OutputFormat::Text => print!("{}", TextFormatter::new().format_report(&report)),
            OutputFormat::Json => println!("{}", json.format_report(&report)?),
        },
    }

    info!(
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "finished"
    );
    Ok(())
}
