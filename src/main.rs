mod api;
mod app;
mod calc;
mod config;
mod input;
mod view;

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, Level};

use api::YargiClient;
use app::state::AppState;
use app::Controller;
use config::ApiConfig;
use input::{Command, HELP};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the view.
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenv::dotenv();
    let config = ApiConfig::from_env();

    let client = Arc::new(YargiClient::new(&config)?);
    info!(base_url = client.base_url(), "API client initialized");

    let (tx, mut completions) = mpsc::unbounded_channel();
    let mut controller = Controller::new(client, tx);
    controller.start();

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    draw(&mut stdout, controller.state()).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match Command::parse(&line) {
                    Command::Apply(action) => controller.dispatch(action),
                    Command::Help => controller.notify(HELP),
                    Command::Invalid(message) => controller.notify(message),
                    Command::Nothing => {}
                    Command::Quit => break,
                }
            }
            Some(completion) = completions.recv() => controller.complete(completion),
        }
        draw(&mut stdout, controller.state()).await?;
    }

    info!("Shutting down");
    Ok(())
}

async fn draw(stdout: &mut tokio::io::Stdout, state: &AppState) -> anyhow::Result<()> {
    let frame = format!("\x1b[2J\x1b[H{}", view::render(state));
    stdout
        .write_all(frame.as_bytes())
        .await
        .context("Failed to write to stdout")?;
    stdout.flush().await.context("Failed to flush stdout")?;
    Ok(())
}
