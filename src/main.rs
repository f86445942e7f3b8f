// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::PathBuf;

use xcstrans::app_config::{self, Config, TranslationProvider};
use xcstrans::app_controller::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
        }
    }
}

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a catalog into per-key chunk files
    Split {
        /// Catalog to split (defaults to paths.input_file)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Output root (defaults to paths.output_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List the keys that are missing translations
    Report {
        /// Catalog to analyse (defaults to paths.input_file)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },

    /// Translate every pending chunk
    Translate(TranslateArgs),

    /// Merge complete and translated chunks into the final catalog
    Merge {
        /// Output root (defaults to paths.output_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Split, translate and merge in sequence
    Run {
        /// Catalog to translate (defaults to paths.input_file)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        #[command(flatten)]
        translate: TranslateArgs,
    },

    /// Generate shell completions for xcstrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the provider, overrides the config file
    #[arg(long, env = "XCSTRANS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Keys translated at the same time
    #[arg(long)]
    max_files: Option<usize>,

    /// Languages per key used to size the shared call limit (files x languages)
    #[arg(long)]
    max_languages: Option<usize>,

    /// Pause after each call, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Output root (defaults to paths.output_dir)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

/// xcstrans - translate Xcode string catalogs with AI
///
/// Splits a `.xcstrings` catalog into one file per key, translates the
/// missing languages with an AI provider and merges everything back.
#[derive(Parser, Debug)]
#[command(name = "xcstrans")]
#[command(version)]
#[command(about = "AI-powered Xcode string catalog translation")]
#[command(long_about = "xcstrans splits a .xcstrings catalog into per-key files, translates the missing languages using AI providers and merges the result into a new catalog.

EXAMPLES:
    xcstrans report Localizable.xcstrings          # List keys missing translations
    xcstrans split Localizable.xcstrings           # Write output/1_needs_translation and output/2_complete
    xcstrans translate -p anthropic --max-files 2  # Translate pending keys
    xcstrans merge                                 # Write output/4_final_xcstrings/Localizable.xcstrings
    xcstrans run Localizable.xcstrings             # All three stages
    xcstrans completions bash > xcstrans.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    openai    - OpenAI API (requires OPENAI_API_KEY or api_key)
    anthropic - Anthropic Claude API (requires ANTHROPIC_API_KEY or api_key)
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
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

    // @returns: ANSI color and marker for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The effective level is governed by log::max_level
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, marker) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "xcstrans", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Split { input, output_dir } => {
            apply_paths(&mut config, input, output_dir);
            Controller::with_config(config)?.split()?;
        }
        Commands::Report { input } => {
            apply_paths(&mut config, input, None);
            Controller::with_config(config)?.report()?;
        }
        Commands::Translate(args) => {
            apply_translate_args(&mut config, args);
            Controller::with_config(config)?.translate().await?;
        }
        Commands::Merge { output_dir } => {
            apply_paths(&mut config, None, output_dir);
            Controller::with_config(config)?.merge()?;
        }
        Commands::Run { input, translate } => {
            apply_paths(&mut config, input, None);
            apply_translate_args(&mut config, translate);
            Controller::with_config(config)?.run().await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load or create the configuration and settle the log level
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let (mut config, created) = Config::load_or_create(&cli.config)?;
    if created {
        warn!("Config file not found at {:?}, created default config.", cli.config);
    }

    // Update log level in config if specified via command line
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    } else {
        // Just update the max level without reinitializing the logger
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

fn apply_paths(config: &mut Config, input: Option<PathBuf>, output_dir: Option<PathBuf>) {
    if let Some(input) = input {
        config.paths.input_file = input;
    }
    if let Some(output_dir) = output_dir {
        config.paths.output_dir = output_dir;
    }
}

/// Override config with CLI options if provided
fn apply_translate_args(config: &mut Config, args: TranslateArgs) {
    if let Some(provider) = args.provider {
        config.translation.provider = provider.into();
    }
    if let Some(model) = args.model {
        config.translation.active_provider_config_mut().model = model;
    }
    if let Some(api_key) = args.api_key.filter(|key| !key.trim().is_empty()) {
        config.translation.active_provider_config_mut().api_key = api_key;
    }
    if let Some(files) = args.max_files {
        config.concurrency.max_concurrent_files = Some(files);
    }
    if let Some(languages) = args.max_languages {
        config.concurrency.max_concurrent_languages = Some(languages);
    }
    if let Some(delay) = args.delay_ms {
        config.concurrency.api_delay_ms = Some(delay);
    }
    apply_paths(config, None, args.output_dir);
}
