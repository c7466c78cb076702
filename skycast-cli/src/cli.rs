use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use skycast_core::{Config, OpenWeatherClient, WeatherAggregator};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and an optional default location.
    Configure,

    /// Show current conditions, forecast, air quality and alerts.
    Show {
        /// Location name, e.g. "Nairobi" or "Paris,FR". Falls back to the
        /// configured default location.
        location: Option<String>,

        /// Latitude of a device-provided position.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude of a device-provided position.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// List geocoding candidates for a query.
    Search {
        query: String,

        /// Maximum number of candidates to request.
        #[arg(long, default_value_t = 5)]
        limit: u8,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, lat, lon } => show(location, lat.zip(lon)).await,
            Command::Search { query, limit } => search(&query, limit).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.api_key = Some(api_key);

    let default_location = inquire::Text::new("Default location (blank to skip):")
        .prompt()
        .context("Failed to read default location")?;
    let default_location = default_location.trim();
    config.default_location = if default_location.is_empty() {
        None
    } else {
        Some(default_location.to_string())
    };

    config.save()?;
    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    OpenWeatherClient::new(config.api_key().unwrap_or_default())
        .context("Set OPENWEATHER_API_KEY or run `skycast configure` first")
}

async fn show(location: Option<String>, coords: Option<(f64, f64)>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let aggregator = WeatherAggregator::new(client_from_config(&config)?);

    let bundle = match (coords, location.or_else(|| config.default_location.clone())) {
        (Some((lat, lon)), _) => aggregator.fetch_all_from_coordinates(lat, lon).await?,
        (None, Some(location)) => aggregator.fetch_all(&location).await?,
        (None, None) => bail!(
            "No location given and no default configured.\n\
             Hint: `skycast show <location>`, or set a default with `skycast configure`."
        ),
    };

    // Only the newest search may render; superseded bundles are dropped.
    if aggregator.is_current(bundle.generation) {
        render::bundle(&bundle);
    }
    Ok(())
}

async fn search(query: &str, limit: u8) -> anyhow::Result<()> {
    let config = Config::load()?;
    let client = client_from_config(&config)?;

    let matches = client.search_locations(query, limit).await?;
    if matches.is_empty() {
        println!("No matches for \"{query}\".");
        return Ok(());
    }

    for location in &matches {
        let state = location
            .state
            .as_deref()
            .map(|s| format!(" ({s})"))
            .unwrap_or_default();
        println!(
            "{:>9.4} {:>9.4}  {}{state}",
            location.latitude,
            location.longitude,
            location.label()
        );
    }
    Ok(())
}
