// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::app_config::{ChatProvider, Config};
use app_controller::{AskOutcome, Controller, Notice};

mod app_config;
mod app_controller;
mod errors;
mod fetcher;
mod providers;
mod qa_service;
mod session;

/// CLI Wrapper for ChatProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliChatProvider {
    #[value(name = "openai")]
    OpenAI,
    Azure,
}

impl From<CliChatProvider> for ChatProvider {
    fn from(cli_provider: CliChatProvider) -> Self {
        match cli_provider {
            CliChatProvider::OpenAI => ChatProvider::OpenAI,
            CliChatProvider::Azure => ChatProvider::Azure,
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
    /// Start an interactive question-answering session (default command)
    #[command(alias = "chat")]
    Session(SessionArgs),

    /// Fetch a URL and answer a single question, then exit
    Ask(AskArgs),

    /// Generate shell completions for webqa
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct SessionArgs {
    /// URL to fetch before the first question
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Chat provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliChatProvider>,

    /// Model name to use for answering
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum questions per URL (omit for unbounded)
    #[arg(short = 'n', long)]
    question_limit: Option<u32>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct AskArgs {
    /// URL to fetch
    #[arg(short, long)]
    url: String,

    /// Question to answer about the fetched content
    #[arg(short, long)]
    question: String,

    /// Chat provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliChatProvider>,

    /// Model name to use for answering
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// webqa - Web Content Q&A
///
/// Fetches a text rendering of any URL through a reader proxy and answers
/// natural-language questions about it using a chat-completion API.
#[derive(Parser, Debug)]
#[command(name = "webqa")]
#[command(version = "1.0.0")]
#[command(about = "Ask questions about any web page")]
#[command(long_about = "webqa fetches a plain-text rendering of a web page through the r.jina.ai
reader proxy and answers questions about it using a chat-completion API.

EXAMPLES:
    webqa                                       # Interactive session
    webqa https://example.com                   # Interactive session, URL pre-filled
    webqa -n 3 https://example.com              # Limit to 3 questions per URL
    webqa ask -u https://example.com -q 'What is this page about?'
    webqa -p azure https://example.com          # Use the Azure provider
    webqa completions bash > webqa.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

CREDENTIALS:
    The reader key is read from JINA_API_KEY, the chat key from OPENAI_API_KEY
    or AZURE_OPENAI_API_KEY depending on the provider, falling back to the
    config file and finally to a masked interactive prompt.

SUPPORTED PROVIDERS:
    openai - OpenAI API (default: gpt-4o)
    azure  - Azure OpenAI deployment (api-version 2024-06-01)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// URL to fetch before the first question
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Chat provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliChatProvider>,

    /// Model name to use for answering
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum questions per URL (omit for unbounded)
    #[arg(short = 'n', long)]
    question_limit: Option<u32>,

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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let emoji = Self::get_emoji_for_level(record.level());

            let mut stderr = std::io::stderr();
            let color = match record.level() {
                Level::Error => "\x1B[1;31m",
                Level::Warn => "\x1B[1;33m",
                Level::Info => "\x1B[1;32m",
                Level::Debug => "\x1B[1;36m",
                Level::Trace => "\x1B[1;35m",
            };
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
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

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "webqa", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Session(args)) => run_session(args).await,
        Some(Commands::Ask(args)) => run_ask(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let session_args = SessionArgs {
                url: cli.url,
                provider: cli.provider,
                model: cli.model,
                question_limit: cli.question_limit,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_session(session_args).await
        }
    }
}

/// Load conf.json (creating it with defaults when missing) and apply CLI overrides
fn load_config(
    config_path: &str,
    provider: Option<CliChatProvider>,
    model: Option<String>,
    question_limit: Option<u32>,
    log_level: Option<CliLogLevel>,
) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(provider) = provider {
        config.chat.provider = provider.into();
    }

    if let Some(model) = model {
        if let Some(provider_config) = config.chat.get_active_provider_config_mut() {
            provider_config.model = model;
        }
    }

    if let Some(limit) = question_limit {
        config.question_limit = Some(limit);
    }

    if let Some(cmd_log_level) = log_level {
        config.log_level = cmd_log_level.into();
    } else {
        // If log level was not set via command line, update it from config now
        log::set_max_level(level_filter(&config.log_level));
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Prompt for any credential the resolution chain could not supply.
///
/// Entered values are masked and kept for the session lifetime only; they are
/// never written back to the config file.
fn prompt_missing_credentials(controller: &mut Controller) -> Result<()> {
    if !controller.has_fetch_key() {
        let key = rpassword::prompt_password("Enter your Jina API key: ")
            .context("Failed to read Jina API key")?;
        render_notice(&controller.set_fetch_api_key(&key));
    }

    if !controller.has_chat_key() {
        let key = rpassword::prompt_password("Enter your chat API key: ")
            .context("Failed to read chat API key")?;
        render_notice(&controller.set_chat_api_key(&key));
    }

    Ok(())
}

/// Render a controller notice through the logger, matching its severity
fn render_notice(notice: &Notice) {
    match notice {
        Notice::Success(m) | Notice::Info(m) => info!("{}", m),
        Notice::Warning(m) => warn!("{}", m),
        Notice::Error(m) => error!("{}", m),
    }
}

/// Spinner shown while an outbound call is in flight
fn start_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Read one trimmed line from stdin, displaying a prompt first
fn read_input(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut line = String::new();
    let bytes = std::io::stdin().read_line(&mut line)?;
    if bytes == 0 {
        // EOF behaves like quitting
        return Ok(":quit".to_string());
    }
    Ok(line.trim().to_string())
}

/// Submit a URL with spinner feedback and render the resulting notices
async fn fetch_with_feedback(controller: &mut Controller, url: &str) {
    let spinner = start_spinner("Fetching content...");
    let notices = controller.submit_url(url).await;
    spinner.finish_and_clear();
    for notice in &notices {
        render_notice(notice);
    }
}

/// Ask a question with spinner feedback and print the answer
async fn ask_with_feedback(controller: &mut Controller, question: &str) -> Option<String> {
    let spinner = start_spinner("Generating answer...");
    let outcome = controller.ask(question).await;
    spinner.finish_and_clear();

    match outcome {
        AskOutcome::Answered {
            ordinal,
            remaining,
            answer,
        } => {
            println!("\nAnswer to Question {}:", ordinal);
            println!("{}\n", answer);
            if let Some(remaining) = remaining {
                info!(
                    "{} question{} remaining for this URL.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Some(answer)
        }
        AskOutcome::Denied(notice) => {
            render_notice(&notice);
            None
        }
    }
}

async fn run_session(options: SessionArgs) -> Result<()> {
    let config = load_config(
        &options.config_path,
        options.provider,
        options.model,
        options.question_limit,
        options.log_level,
    )?;

    let mut controller = Controller::with_config(config)?;
    prompt_missing_credentials(&mut controller)?;

    println!("Web Content Q&A");
    println!("Type a question, or :url <URL>, :reset, :quit.\n");

    if let Some(url) = options.url {
        fetch_with_feedback(&mut controller, &url).await;
    }

    loop {
        if controller.session().url.is_empty() {
            let url = read_input("Enter the URL: ")?;
            if url == ":quit" || url == ":q" {
                break;
            }
            if url.is_empty() {
                continue;
            }
            fetch_with_feedback(&mut controller, &url).await;
            continue;
        }

        if let Some(notice) = controller.question_count_notice() {
            render_notice(&notice);
        }

        let input = read_input("Enter your question: ")?;
        match input.as_str() {
            ":quit" | ":q" => break,
            ":reset" => {
                render_notice(&controller.reset());
            }
            "" => continue,
            _ if input.starts_with(":url") => {
                let url = input.trim_start_matches(":url").trim().to_string();
                if url.is_empty() {
                    warn!("Usage: :url <URL>");
                    continue;
                }
                fetch_with_feedback(&mut controller, &url).await;
            }
            question => {
                ask_with_feedback(&mut controller, question).await;
            }
        }
    }

    Ok(())
}

async fn run_ask(options: AskArgs) -> Result<()> {
    let config = load_config(
        &options.config_path,
        options.provider,
        options.model,
        None,
        options.log_level,
    )?;

    let mut controller = Controller::with_config(config)?;
    prompt_missing_credentials(&mut controller)?;

    fetch_with_feedback(&mut controller, &options.url).await;
    if controller.session().content.is_none() {
        return Err(anyhow!("Could not fetch content for URL: {}", options.url));
    }

    match ask_with_feedback(&mut controller, &options.question).await {
        Some(_) => Ok(()),
        None => Err(anyhow!("The question could not be answered")),
    }
}
