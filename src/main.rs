// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::curator::Curator;
use crate::document::{Dialect, Document};
use crate::file_utils::FileManager;
use crate::listing::{LocalTree, RemoteTree, TreeListing};
use crate::validation::{validate_document, Severity};

mod app_config;
mod curator;
mod document;
mod errors;
mod fetch;
mod file_utils;
mod listing;
mod references;
mod resolver;
mod symbols;
mod validation;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for Dialect to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliDialect {
    Swmm,
    Epanet,
}

impl From<CliDialect> for Dialect {
    fn from(cli_dialect: CliDialect) -> Self {
        match cli_dialect {
            CliDialect::Swmm => Dialect::Swmm,
            CliDialect::Epanet => Dialect::Epanet,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Curate a corpus of input decks (default command)
    #[command(alias = "vet")]
    Curate(CurateArgs),

    /// Validate a single input deck and print its issues
    Validate(ValidateArgs),

    /// Write a default configuration file
    InitConfig {
        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for inpvet
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct CurateArgs {
    /// Corpus directory to curate
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Clone this repository URL and curate the checkout
    #[arg(long, conflicts_with_all = ["input_path", "remote"])]
    repo_url: Option<String>,

    /// Curate a remote repository (owner/name) without cloning
    #[arg(long, conflicts_with = "input_path")]
    remote: Option<String>,

    /// Output directory for staged documents and the summary
    #[arg(short, long, default_value = "curated")]
    output: PathBuf,

    /// Maximum number of documents processed concurrently
    #[arg(short, long)]
    workers: Option<usize>,

    /// Re-vet only documents previously rejected for missing external files
    #[arg(long)]
    reprocess_invalid: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input deck to validate
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Force the deck dialect instead of detecting it
    #[arg(short, long, value_enum)]
    dialect: Option<CliDialect>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// inpvet - Input Deck Vetting and Curation
///
/// Validates hydraulic and hydrologic simulation input decks (.inp files)
/// and curates whole corpora of them into a clean, staged collection.
#[derive(Parser, Debug)]
#[command(name = "inpvet")]
#[command(author = "inpvet contributors")]
#[command(version = "0.1.0")]
#[command(about = "Input deck validation and corpus curation tool")]
#[command(long_about = "inpvet vets simulation input decks: it tokenizes bracketed sections, detects
the deck dialect, checks required sections, parameter bounds, time series
references, pipe topology and external file hygiene, then stages accepted
decks together with their data files.

EXAMPLES:
    inpvet ./networks                          # Curate a local corpus
    inpvet ./networks -o curated -w 8          # Stage into ./curated with 8 workers
    inpvet --repo-url https://github.com/owner/nets.git   # Clone then curate
    inpvet --remote owner/nets                 # Curate over the contents API
    inpvet --reprocess-invalid ./networks      # Retry decks missing data files
    inpvet validate model.inp                  # Check one deck
    inpvet validate -d epanet model.inp        # Force the EPANET rule set
    inpvet init-config                         # Write a default conf.json
    inpvet completions bash > inpvet.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different file with --config-path. Missing files fall back to built-in
    defaults; run init-config to materialize them.

VALIDATION CHECKS:
    missing_section        required sections and model element groups
    invalid_parameter      infiltration parameter bounds
    undefined_reference    rain gauges citing unknown time series
    section_order          time series defined after their first use
    missing_node_reference pipes naming undefined nodes
    external_file          referenced auxiliary data files
    unresolved_path        absolute paths that break relocation")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Corpus directory to curate
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Clone this repository URL and curate the checkout
    #[arg(long, conflicts_with_all = ["input_path", "remote"])]
    repo_url: Option<String>,

    /// Curate a remote repository (owner/name) without cloning
    #[arg(long, conflicts_with = "input_path")]
    remote: Option<String>,

    /// Output directory for staged documents and the summary
    #[arg(short, long, default_value = "curated")]
    output: PathBuf,

    /// Maximum number of documents processed concurrently
    #[arg(short, long)]
    workers: Option<usize>,

    /// Re-vet only documents previously rejected for missing external files
    #[arg(long)]
    reprocess_invalid: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");

            let mut stderr = std::io::stderr();
            let emoji = Self::get_emoji_for_level(record.level());
            let _ = match record.level() {
                Level::Error => writeln!(
                    stderr,
                    "\x1B[1;31m{} {} {}\x1B[0m",
                    now,
                    emoji,
                    record.args()
                ),
                Level::Warn => writeln!(
                    stderr,
                    "\x1B[1;33m{} {} {}\x1B[0m",
                    now,
                    emoji,
                    record.args()
                ),
                Level::Info => writeln!(
                    stderr,
                    "\x1B[1;32m{} {} {}\x1B[0m",
                    now,
                    emoji,
                    record.args()
                ),
                Level::Debug => writeln!(
                    stderr,
                    "\x1B[1;36m{} {} {}\x1B[0m",
                    now,
                    emoji,
                    record.args()
                ),
                Level::Trace => writeln!(
                    stderr,
                    "\x1B[1;35m{} {} {}\x1B[0m",
                    now,
                    emoji,
                    record.args()
                ),
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "inpvet", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::InitConfig { config_path }) => {
            if Path::new(&config_path).exists() {
                return Err(anyhow!("Config file already exists: {}", config_path));
            }
            let config_json = serde_json::to_string_pretty(&Config::default())
                .context("Failed to serialize default config to JSON")?;
            std::fs::write(&config_path, config_json)
                .context(format!("Failed to write config file: {}", config_path))?;
            info!("Wrote default configuration to {}", config_path);
            Ok(())
        }
        Some(Commands::Validate(args)) => run_validate(args).await,
        Some(Commands::Curate(args)) => run_curate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let curate_args = CurateArgs {
                input_path: cli.input_path,
                repo_url: cli.repo_url,
                remote: cli.remote,
                output: cli.output,
                workers: cli.workers,
                reprocess_invalid: cli.reprocess_invalid,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_curate(curate_args).await
        }
    }
}

async fn run_curate(options: CurateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load configuration, falling back to defaults when there is none
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;
        config
    } else {
        debug!(
            "Config file not found at '{}', using built-in defaults",
            config_path
        );
        Config::default()
    };

    // Override config with CLI options if provided
    if let Some(workers) = options.workers {
        config.curation.workers = workers;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    if let Some(repo) = &options.remote {
        if !repo.contains('/') {
            return Err(anyhow!(
                "Remote repository must be given as owner/name, got '{}'",
                repo
            ));
        }
        let tree = RemoteTree::with_config(
            repo.clone(),
            &config.remote.api_base,
            &config.remote.raw_base,
            &config.remote.branch,
            config.remote.per_page,
            config.remote.cooldown_secs,
            config.remote.timeout_secs,
        );
        curate_tree(&tree, &options, &config).await
    } else if let Some(url) = &options.repo_url {
        // The checkout lives until the curation run is over
        let cloned = fetch::clone_repo(url).await?;
        let tree = LocalTree::new(cloned.root());
        curate_tree(&tree, &options, &config).await
    } else {
        let path = options.input_path.clone().ok_or_else(|| {
            anyhow!("INPUT_PATH is required unless --repo-url or --remote is given")
        })?;
        if !FileManager::dir_exists(&path) {
            return Err(anyhow!("Corpus directory does not exist: {:?}", path));
        }
        let tree = LocalTree::new(path);
        curate_tree(&tree, &options, &config).await
    }
}

async fn curate_tree(tree: &dyn TreeListing, options: &CurateArgs, config: &Config) -> Result<()> {
    let curator = Curator::new(tree, options.output.clone(), config);
    let summary = if options.reprocess_invalid {
        curator.reprocess_invalid().await?
    } else {
        curator.run().await?
    };

    if summary.invalid > 0 {
        warn!(
            "{} of {} documents rejected, see {:?} for details",
            summary.invalid,
            summary.total_found,
            options.output.join(curator::SUMMARY_FILE)
        );
    }
    Ok(())
}

async fn run_validate(options: ValidateArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    let path = &options.file;
    if !FileManager::file_exists(path) {
        return Err(anyhow!("Input file does not exist: {:?}", path));
    }

    let text = FileManager::read_to_string_lossy(path)?;
    let folder = path
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut document = Document::parse(path.clone(), folder, text);
    if let Some(dialect) = options.dialect {
        document.dialect = dialect.into();
    }
    info!("Validating {:?} as {} deck", path, document.dialect);

    let report = validate_document(&document);
    if report.is_clean() {
        println!("✅ No issues found");
        return Ok(());
    }

    println!("Found {}", report.summary());

    let errors: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .collect();
    let warnings: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .collect();

    if !errors.is_empty() {
        println!("\nERRORS:");
        for issue in &errors {
            println!("  {}", issue);
            if let Some(suggestion) = &issue.suggestion {
                println!("     💡 {}", suggestion);
            }
        }
    }
    if !warnings.is_empty() {
        println!("\nWARNINGS:");
        for issue in &warnings {
            println!("  {}", issue);
            if let Some(suggestion) = &issue.suggestion {
                println!("     💡 {}", suggestion);
            }
        }
    }

    if !errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
