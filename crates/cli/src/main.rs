use anyhow::{Context, Result};
use chatline_core::{Activity, Config, ReconciledView, Role, decode_activity, logging, reconcile};
use chatline_demo::ScriptedTransport;
use chatline_ui::{App, transcript::AttachmentSummary, transcript::describe_attachment};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Chatline - streaming chat transcript in the terminal
#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(about = "A terminal chat client with streamed replies and autoscroll", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to config.toml (default: ./chatline.toml when present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat with the scripted HR assistant
    Demo,
    /// Reconcile a recorded activity feed (one JSON activity per line)
    Replay {
        /// Feed file in JSON Lines format
        #[arg(required = true, value_name = "FILE")]
        file: PathBuf,

        /// Print the reconciled view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print an example configuration
    Config,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => cmd_demo(load_config(cli.config.as_deref())?, cli.verbose),
        Commands::Replay { file, json } => cmd_replay(load_config(cli.config.as_deref())?, &file, json, cli.verbose),
        Commands::Config => {
            print!("{}", Config::example());
            Ok(())
        }
    }
}

const DEFAULT_CONFIG_PATH: &str = "chatline.toml";

/// Load config from an explicit path, the default path when present, or defaults
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path).with_context(|| format!("Failed to load config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::from_file(Path::new(DEFAULT_CONFIG_PATH)).context("Failed to load chatline.toml")
        }
        None => Ok(Config::default()),
    }
}

/// Run the scripted conversation in the TUI
///
/// Stderr logging would draw over the terminal UI, so only file logging is
/// honored here.
fn cmd_demo(config: Config, verbose: bool) -> Result<()> {
    let mut logging_config = logging::LoggingConfig::from(config.logging.clone()).with_stderr(false);
    if verbose {
        logging_config = logging_config.with_level("debug");
    }
    let _guard = logging::init_logging(Some(logging_config))?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    runtime.block_on(async {
        let transport = ScriptedTransport::new(config.demo.clone());
        transport.start();

        let mut app = App::new(Arc::new(transport.clone()), &config.autoscroll);
        let result = chatline_ui::run(&mut app).await;
        transport.shutdown();
        result.context("Terminal UI failed")
    })
}

/// Reconcile a recorded feed and print the transcript
fn cmd_replay(config: Config, file: &Path, json: bool, verbose: bool) -> Result<()> {
    let mut logging_config = logging::LoggingConfig::from(config.logging);
    if verbose {
        logging_config = logging_config.with_level("debug");
    }
    let _guard = logging::init_logging(Some(logging_config))?;

    let (activities, skipped) = load_feed(file)?;
    let view = reconcile(&activities);

    if verbose {
        eprintln!(
            "{} {} activities read, {} skipped",
            "Info:".blue().bold(),
            activities.len().to_string().cyan(),
            skipped.to_string().cyan()
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_transcript(&view);
    }
    Ok(())
}

/// Read a JSON Lines feed. Blank lines are ignored; lines that are not
/// valid activities are logged and counted as skipped.
fn load_feed(path: &Path) -> Result<(Vec<Activity>, usize)> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut activities = Vec::new();
    let mut skipped = 0;

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let decoded = serde_json::from_str::<serde_json::Value>(line)
            .map_err(chatline_core::Error::from)
            .and_then(|value| decode_activity(&value).map_err(chatline_core::Error::from));
        match decoded {
            Ok(activity) => activities.push(activity),
            Err(error) => {
                tracing::warn!(line = idx + 1, %error, "skipping malformed activity");
                skipped += 1;
            }
        }
    }

    Ok((activities, skipped))
}

fn print_transcript(view: &ReconciledView) {
    if view.is_empty() {
        println!("{}", "(empty transcript)".dimmed());
        return;
    }

    for message in &view.ordered_messages {
        match message.role {
            Role::User => println!("{}", "You:".cyan().bold()),
            Role::Bot => println!("{}", "Bot:".green().bold()),
        }
        if !message.text.is_empty() {
            println!("{}", message.text);
        }
        for summary in message.attachments.iter().filter_map(describe_attachment) {
            match summary {
                AttachmentSummary::Card { texts } => {
                    println!("{}", "[card]".magenta());
                    for text in texts {
                        println!("  {}", text.dimmed());
                    }
                }
                AttachmentSummary::Image { name } => println!("{}", format!("[image: {}]", name).magenta()),
                AttachmentSummary::File { name, url } => {
                    println!("{} {}", format!("[file: {}]", name).magenta(), url.dimmed())
                }
            }
        }
        if !message.suggested_actions.is_empty() {
            let titles: Vec<_> = message.suggested_actions.iter().map(|action| action.title.as_str()).collect();
            println!("{} {}", "Suggestions:".yellow(), titles.join(" | "));
        }
        println!();
    }

    if let Some(live_text) = &view.live_text {
        println!("{}", "Bot (typing...):".green().bold());
        println!("{}", live_text);
    }
}
