//! phrasewav CLI - batch text-to-speech into WAV files.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

mod config;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use phrasewav::prelude::*;
use phrasewav::providers::gemini::prebuilt_voices;
use tracing::{Level, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, IssueLevel};

/// Generate one WAV file per phrase with Gemini text-to-speech
#[derive(Parser)]
#[command(name = "phrasewav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "PHRASEWAV_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize every phrase (default when no command is given)
    Run(RunArgs),

    /// Show which file each phrase would be written to
    Plan(PlanArgs),

    /// List the prebuilt voices
    Voices,

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Args, Default)]
struct RunArgs {
    #[command(flatten)]
    files: PlanArgs,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Speech model
    #[arg(short, long)]
    model: Option<String>,

    /// Prebuilt voice name
    #[arg(long)]
    voice: Option<String>,

    /// Instruction template; must contain {phrase}
    #[arg(long)]
    instruction: Option<String>,

    /// Seconds to pause after each request
    #[arg(long)]
    delay_secs: Option<u64>,

    /// Retry rate-limited and network failures this many times
    #[arg(long)]
    retries: Option<u32>,

    /// Record failures and continue with the next phrase
    #[arg(long)]
    keep_going: bool,
}

/// Arguments for the plan command
#[derive(Args, Default)]
struct PlanArgs {
    /// Phrase list (JSON array of strings)
    input: Option<PathBuf>,

    /// Directory for the WAV files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Show configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "phrasewav={level},{}",
            if verbosity >= 2 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<ExitCode> {
    let config_file = cli.config;
    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => cmd_run(args, config_file.as_deref()).await,
        Commands::Plan(args) => cmd_plan(&args, config_file.as_deref()).await,
        Commands::Voices => {
            cmd_voices();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(args) => cmd_config(args, config_file.as_deref()).await,
    }
}

async fn load(config_file: Option<&Path>) -> Result<AppConfig> {
    config::load_config(config_file)
        .await
        .map_err(|e| Error::config(format!("failed to load config: {e}")))
}

impl PlanArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(input) = &self.input {
            config.batch.input.clone_from(input);
        }
        if let Some(dir) = &self.output_dir {
            config.batch.output_dir.clone_from(dir);
        }
    }
}

impl RunArgs {
    fn apply(self, config: &mut AppConfig) -> Result<()> {
        self.files.apply(config);
        if let Some(key) = self.api_key {
            config.gemini.api_key = Some(key);
        }
        if let Some(model) = self.model {
            config.gemini.model = model;
        }
        if let Some(voice) = self.voice {
            config.speech.voice = voice;
        }
        if let Some(instruction) = self.instruction {
            config.speech.instruction = InstructionTemplate::new(instruction)?;
        }
        if let Some(secs) = self.delay_secs {
            config.batch.delay_secs = secs;
        }
        if let Some(retries) = self.retries {
            config.batch.retry = Some(RetryConfig {
                max_attempts: retries,
                ..config.batch.retry.unwrap_or_default()
            });
        }
        if self.keep_going {
            config.batch.keep_going = true;
        }
        Ok(())
    }
}

/// Report validation issues; errors stop the command.
fn check(config: &AppConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.level {
            IssueLevel::Warning => warn!("{issue}"),
            IssueLevel::Error => tracing::error!("{issue}"),
        }
    }
    if config.is_valid() {
        Ok(())
    } else {
        Err(Error::config("configuration has errors"))
    }
}

/// Synthesize every phrase.
async fn cmd_run(args: RunArgs, config_file: Option<&Path>) -> Result<ExitCode> {
    let mut config = load(config_file).await?;
    args.apply(&mut config)?;
    check(&config)?;

    // Credentials are checked before the phrase list is touched.
    let client = Gemini::new(config.gemini_config())?;
    let phrases = load_phrases(&config.batch.input).await?;

    let runner = BatchRunner::new(client, config.batch_options());
    let report = runner.run(&phrases).await?;

    println!();
    println!(
        "Wrote {} of {} files to {}",
        report.written.len(),
        report.attempted(),
        config.batch.output_dir.display()
    );
    for failed in &report.failed {
        println!("  failed: '{}' ({})", failed.phrase, failed.error);
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Print the phrase to file mapping.
async fn cmd_plan(args: &PlanArgs, config_file: Option<&Path>) -> Result<ExitCode> {
    let mut config = load(config_file).await?;
    args.apply(&mut config);

    let phrases = load_phrases(&config.batch.input).await?;
    let plan = phrasewav::batch::plan(&config.batch.output_dir, &phrases);

    let mut seen: HashMap<&Path, usize> = HashMap::new();
    for file in &plan {
        *seen.entry(file.path.as_path()).or_default() += 1;
    }

    for file in &plan {
        let marker = if seen.get(file.path.as_path()).copied().unwrap_or(0) > 1 {
            "  (collides)"
        } else {
            ""
        };
        println!("{} -> {}{marker}", file.phrase, file.path.display());
    }

    Ok(ExitCode::SUCCESS)
}

/// List prebuilt voices.
fn cmd_voices() {
    for voice in prebuilt_voices() {
        println!(
            "{:<16}{}",
            voice.id,
            voice.description.as_deref().unwrap_or_default()
        );
    }
}

/// Configuration management.
async fn cmd_config(args: ConfigArgs, config_file: Option<&Path>) -> Result<ExitCode> {
    let path = config::config_path(config_file);

    match args.command {
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            let mut config = load(config_file).await?;
            if config.gemini.api_key.is_some() {
                config.gemini.api_key = Some("<redacted>".to_owned());
            }
            let content = toml::to_string_pretty(&config)
                .map_err(|e| Error::config(format!("failed to render config: {e}")))?;
            println!("# {}", path.display());
            println!("{content}");
        }
        ConfigCommands::Init { force } => {
            let written = config::init_config(path, force)
                .await
                .map_err(|e| Error::config(format!("failed to initialize config: {e}")))?;
            println!("Configuration created: {}", written.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["phrasewav"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_flags_override_config() {
        let cli = Cli::try_parse_from([
            "phrasewav",
            "run",
            "lines.json",
            "-o",
            "out",
            "--api-key",
            "k",
            "--voice",
            "Puck",
            "--instruction",
            "Whisper: {phrase}",
            "--delay-secs",
            "0",
            "--retries",
            "2",
            "--keep-going",
        ])
        .unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            unreachable!("parsed run command");
        };

        let mut config = AppConfig::default();
        args.apply(&mut config).unwrap();

        assert_eq!(config.batch.input, PathBuf::from("lines.json"));
        assert_eq!(config.batch.output_dir, PathBuf::from("out"));
        assert_eq!(config.gemini.api_key.as_deref(), Some("k"));
        assert_eq!(config.speech.voice, "Puck");
        assert_eq!(config.speech.instruction.render("hi"), "Whisper: hi");
        assert_eq!(config.batch.delay_secs, 0);
        assert_eq!(config.batch.retry.unwrap().max_attempts, 2);
        assert!(config.batch.keep_going);
    }

    #[test]
    fn instruction_without_placeholder_is_rejected() {
        let args = RunArgs {
            instruction: Some("Say it".to_owned()),
            ..RunArgs::default()
        };
        let err = args.apply(&mut AppConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn retries_keep_configured_backoff() {
        let mut config = AppConfig::default();
        config.batch.retry = Some(RetryConfig {
            initial_delay_ms: 250,
            ..RetryConfig::default()
        });
        let args = RunArgs {
            retries: Some(7),
            ..RunArgs::default()
        };
        args.apply(&mut config).unwrap();

        let retry = config.batch.retry.unwrap();
        assert_eq!(retry.max_attempts, 7);
        assert_eq!(retry.initial_delay_ms, 250);
    }

    #[test]
    fn config_init_force_flag() {
        let cli = Cli::try_parse_from(["phrasewav", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config(ConfigArgs {
                command: ConfigCommands::Init { force: true }
            }))
        ));
    }
}
