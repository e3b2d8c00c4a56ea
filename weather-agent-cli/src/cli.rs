use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, InquireError, Text};

use weather_agent_core::{ChatStore, Config, chat_store_from_config, weather_store_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-agent", version, about = "Forecast viewer with an agent chat")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the agent webhook and the forecast location.
    Configure,

    /// Show current temperature and the hourly forecast.
    Forecast {
        /// Override the configured latitude.
        #[arg(long, allow_negative_numbers = true)]
        latitude: Option<f64>,

        /// Override the configured longitude.
        #[arg(long, allow_negative_numbers = true)]
        longitude: Option<f64>,

        /// Number of hourly entries to print.
        #[arg(long, default_value_t = 24)]
        hours: usize,
    },

    /// Ask the weather agent questions.
    Chat {
        /// Send a single message and exit instead of starting a session.
        #[arg(short, long)]
        message: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        tracing::debug!(?config, "configuration loaded");

        match self.command {
            Command::Configure => configure(&mut config),
            Command::Forecast {
                latitude,
                longitude,
                hours,
            } => {
                if let Some(lat) = latitude {
                    config.weather.latitude = lat;
                }
                if let Some(lon) = longitude {
                    config.weather.longitude = lon;
                }
                forecast(&config, hours).await
            }
            Command::Chat { message } => {
                let http = config.http.settings().build_client()?;
                let store = chat_store_from_config(&config, http)?;
                match message {
                    Some(text) => chat_once(&store, text).await,
                    None => chat_session(&store).await,
                }
            }
        }
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let current = config.agent.webhook_url.clone().unwrap_or_default();
    let webhook = Text::new("Agent webhook URL:")
        .with_initial_value(&current)
        .prompt()
        .context("Failed to read webhook URL")?;

    let latitude = CustomType::<f64>::new("Latitude:")
        .with_default(config.weather.latitude)
        .with_error_message("Please enter a number, e.g. -1.2833")
        .prompt()
        .context("Failed to read latitude")?;

    let longitude = CustomType::<f64>::new("Longitude:")
        .with_default(config.weather.longitude)
        .with_error_message("Please enter a number, e.g. 36.8167")
        .prompt()
        .context("Failed to read longitude")?;

    config.set_webhook_url(webhook.trim());
    config.set_location(latitude, longitude);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn forecast(config: &Config, hours: usize) -> anyhow::Result<()> {
    let http = config.http.settings().build_client()?;
    let store = weather_store_from_config(config, http);

    loop {
        eprintln!("Loading forecast...");
        store.fetch().await;

        let state = store.state();
        println!("{}", render::weather(&state, hours));

        if state.error().is_none() {
            return Ok(());
        }

        let retry = Confirm::new("Retry?")
            .with_default(true)
            .prompt()
            .context("Failed to read retry answer")?;
        if !retry {
            anyhow::bail!("Forecast unavailable");
        }
    }
}

async fn chat_once(store: &ChatStore, text: String) -> anyhow::Result<()> {
    store.update_draft(text);
    if !store.send_message().await {
        anyhow::bail!("Nothing to send: the message is empty");
    }

    print_messages(store, 0);
    if let Some(err) = store.state().last_error {
        anyhow::bail!("Agent request failed: {err}");
    }
    Ok(())
}

async fn chat_session(store: &ChatStore) -> anyhow::Result<()> {
    println!("Ask about the weather. Type /clear to start over, /quit to leave.");
    let mut shown = 0;

    loop {
        let line = match Text::new("You:").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read message"),
        };

        match line.trim() {
            "/quit" => break,
            "/clear" => {
                store.clear();
                shown = 0;
                println!("Chat cleared.");
                continue;
            }
            _ => {}
        }

        store.update_draft(line);
        if !store.send_message().await {
            continue;
        }

        // The user's own line is already on screen from the prompt.
        shown = print_messages(store, shown + 1);

        if let Some(err) = store.state().last_error {
            eprintln!("(agent error: {err})");
            store.clear_error();
        }
    }

    store.close();
    Ok(())
}

/// Print messages from index `from` on and return the new log length.
fn print_messages(store: &ChatStore, from: usize) -> usize {
    let state = store.state();
    for msg in state.messages.iter().skip(from) {
        println!("{}", render::message(msg));
    }
    state.messages.len()
}
