//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use edadoc_core::pipeline::{GenerateResult, ProgressReporter};
use edadoc_shared::{AppConfig, ParseConfig, init_config, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// edadoc — document your event-driven architecture from XML doc comments.
#[derive(Parser)]
#[command(
    name = "edadoc",
    version,
    about = "Generate Markdown documentation for events, services, and processes from .NET XML documentation files.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.edadoc/edadoc.toml.
    #[arg(long, env = "EDADOC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Parse XML documentation files and write the event, service, and process documents.
    Parse {
        /// Directory scanned for *.xml files (defaults to the configured working_dir).
        working_dir: Option<PathBuf>,

        /// Directory the documents are written to (defaults to the configured out_dir).
        out_dir: Option<PathBuf>,

        /// Process only these files, in this order (can be specified multiple times).
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,

        /// Only process discovered files whose path matches this regex.
        #[arg(long)]
        include: Vec<String>,

        /// Skip discovered files whose path matches this regex.
        #[arg(long)]
        exclude: Vec<String>,

        /// Replace documents in a non-empty output directory.
        #[arg(long)]
        force: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "edadoc=info",
        1 => "edadoc=debug",
        _ => "edadoc=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Command::Parse {
            working_dir,
            out_dir,
            files,
            include,
            exclude,
            force,
        } => {
            let mut parse_config = ParseConfig::from(&config);
            if let Some(dir) = working_dir {
                parse_config.working_dir = dir;
            }
            if let Some(dir) = out_dir {
                parse_config.out_dir = dir;
            }
            parse_config.files = files;
            parse_config.include_patterns.extend(include);
            parse_config.exclude_patterns.extend(exclude);
            parse_config.force = force;
            parse_config.tool_version = env!("CARGO_PKG_VERSION").to_string();

            cmd_parse(parse_config)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            if !path.is_file() {
                return Err(eyre!("config file '{}' does not exist", path.display()));
            }
            Ok(load_config_from(path)?)
        }
        None => Ok(load_config()?),
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_parse(config: ParseConfig) -> Result<()> {
    info!(
        working_dir = %config.working_dir.display(),
        out_dir = %config.out_dir.display(),
        selected = config.files.len(),
        force = config.force,
        "generating documentation"
    );

    let reporter = CliProgress::new();
    let result = match edadoc_core::pipeline::generate_docs(&config, &reporter) {
        Ok(result) => result,
        Err(e) => {
            reporter.spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    println!();
    println!("  Documentation generated!");
    println!("  Sources:    {}", result.source_count);
    println!("  Events:     {}", result.event_count);
    println!("  Services:   {}", result.service_count);
    println!("  Processes:  {}", result.process_count);
    if result.duplicate_count > 0 {
        println!("  Duplicates: {} (first occurrence kept)", result.duplicate_count);
    }
    println!("  Documents:  {}", result.document_count);
    println!("  Path:       {}", result.out_dir.display());
    println!("  Time:       {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_parsed(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Parsing [{current}/{total}] {}", path.display()));
    }

    fn document_written(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Writing [{current}/{total}] {path}"));
    }

    fn done(&self, _result: &GenerateResult) {
        self.spinner.finish_and_clear();
    }
}
