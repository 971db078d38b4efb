use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;
use weather_core::{Aggregator, Config, ProviderId, TemperatureReport};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Average temperature across weather providers")]
pub struct Cli {
    /// Path to the configuration file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,
    },

    /// Show the combined temperature for a city.
    Show {
        /// City name.
        city: String,
    },

    /// Serve `GET /weather/{city}` over HTTP.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;

        match self.command {
            Command::Configure { ref provider } => {
                let id = ProviderId::try_from(provider.as_str())?;
                configure(config, id, self.config.as_deref())?;
            }
            Command::Show { ref city } => {
                let aggregator = build_aggregator(&config)?;
                let begin = Instant::now();
                let temp = aggregator.temperature(city).await?;

                print_report(&TemperatureReport {
                    city: city.clone(),
                    temp,
                    took: format!("{:?}", begin.elapsed()),
                });
            }
            Command::Serve { ref addr } => {
                let aggregator = build_aggregator(&config)?;
                server::run_http_server(Arc::new(aggregator), addr).await?;
            }
        }

        Ok(())
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

fn build_aggregator(config: &Config) -> anyhow::Result<Aggregator> {
    let aggregator =
        Aggregator::from_config(config).context("Failed to set up weather providers")?;

    if aggregator.is_empty() {
        warn!("no provider has an API key; every request will fail until one is configured");
    }

    Ok(aggregator)
}

fn configure(
    mut config: Config,
    id: ProviderId,
    path: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key for '{id}' must not be empty");
    }

    config.upsert_provider_api_key(id, api_key);

    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }

    println!("Saved API key for {id}.");
    Ok(())
}

fn print_report(report: &TemperatureReport) {
    println!("{}: {:.1} °C (took {})", report.city, report.temp, report.took);
}
