mod cli;
mod config;
mod core;
mod error;
mod tui;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::core::{Responder, SummaryService, render_chunk_plan, render_markdown, wrap_markdown};
use crate::error::{Error, Result};
use crate::tui::{App, EventHandler, init as tui_init, restore as tui_restore, ui};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}", error_message(&e));
        std::process::exit(1);
    }
}

/// The one place an error is turned into text for the user.
fn error_message(error: &Error) -> String {
    format!("Error: {error}")
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_cli(&cli)?;

    match cli.command {
        Some(Commands::Summarize { url, json, width }) => {
            init_tracing();
            run_cli_summarize(&config, &url, json, width).await?;
        }
        Some(Commands::Chunks { url }) => {
            init_tracing();
            run_cli_chunks(&config, &url).await?;
        }
        Some(Commands::Chat) => {
            run_cli_chat().await?;
        }
        Some(Commands::Tui) | None => {
            run_tui(&config).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

async fn run_cli_summarize(config: &Config, url: &str, json: bool, width: usize) -> Result<()> {
    config.require_completion()?;
    let service = SummaryService::new(config)?;

    let summary = service.summarize_url(url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", wrap_markdown(&render_markdown(&summary), width));
    }

    Ok(())
}

async fn run_cli_chunks(config: &Config, url: &str) -> Result<()> {
    let service = SummaryService::new(config)?;
    let video = service.prepare(url).await?;

    print!("{}", render_chunk_plan(&video));

    Ok(())
}

async fn run_cli_chat() -> Result<()> {
    let mut responder = Responder::new();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Say something (type 'exit' to leave).");
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }
        if let Some(reply) = responder.reply(&line) {
            println!("{reply}");
        }
    }

    Ok(())
}

async fn run_tui(config: &Config) -> Result<()> {
    let service = SummaryService::new(config)?;

    // Initialize terminal
    let mut terminal = tui_init()?;

    let mut app = App::new(service);
    let event_handler = EventHandler::new();

    // Background tasks report back through this channel
    let (tx, rx) = mpsc::unbounded_channel();
    app.processing_tx = Some(tx);
    app.processing_rx = Some(rx);

    let outcome = loop {
        let event = match event_handler.next_event() {
            Ok(event) => event,
            Err(e) => break Err(e),
        };
        if let Err(e) = app.handle_event(event) {
            break Err(e);
        }

        if let Err(e) = terminal.draw(|f| ui::draw(f, &mut app)) {
            break Err(e.into());
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    tui_restore()?;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_shown_with_their_message() {
        let message = error_message(&Error::InvalidUrl("https://example.com/abc".into()));
        assert_eq!(
            message,
            "Error: Could not find a video ID in `https://example.com/abc`. Please check the URL."
        );
    }

    #[test]
    fn config_errors_are_not_debug_formatted() {
        let cli = Cli::try_parse_from(["vidsum", "--max-words", "0", "chat"]).unwrap();
        let error = Config::from_cli(&cli).unwrap_err();

        assert_eq!(
            error_message(&error),
            "Error: max-words must be greater than zero"
        );
    }
}
