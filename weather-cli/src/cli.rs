use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use tokio::task::JoinSet;
use weather_core::{
    Config, Coordinates, FixedLocation, LocationProvider, WeatherViewController,
    location::location_from_config, provider::client_from_config,
};

use crate::render::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the provider API key, endpoint and an optional fixed location.
    Configure,

    /// Show current weather once and exit.
    Show {
        /// Look up this city instead of the current location.
        #[arg(long)]
        city: Option<String>,

        /// Latitude to use instead of locating the device.
        #[arg(long, requires = "lon", conflicts_with = "city", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude to use instead of locating the device.
        #[arg(long, requires = "lat", conflicts_with = "city", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Draw with the dark theme.
        #[arg(long)]
        dark: bool,
    },

    /// Keep the weather view open: search cities, go home, toggle the theme.
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Show,
    Search,
    Home,
    ToggleTheme,
    Quit,
}

impl Action {
    const ALL: [Action; 5] =
        [Action::Show, Action::Search, Action::Home, Action::ToggleTheme, Action::Quit];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Action::Show => "Show current weather",
            Action::Search => "Search a city",
            Action::Home => "Home (reload current location)",
            Action::ToggleTheme => "Toggle dark mode",
            Action::Quit => "Quit",
        })
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon, dark } => {
                let config = Config::load()?;
                let fixed = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                let controller = controller_from_config(&config, fixed)?;

                if dark {
                    controller.toggle_theme();
                }
                match city {
                    Some(city) => {
                        controller.set_search_text(city);
                        controller.search().await;
                    }
                    None => controller.start_session().await,
                }

                print!("{}", render(&controller.view()));
                Ok(())
            }
            Command::Interactive => {
                let config = Config::load()?;
                let controller = controller_from_config(&config, None)?;
                interactive(Arc::new(controller)).await
            }
        }
    }
}

fn controller_from_config(
    config: &Config,
    fixed: Option<Coordinates>,
) -> anyhow::Result<WeatherViewController> {
    let client = client_from_config(config)?;
    let location: Arc<dyn LocationProvider> = match fixed {
        Some(coords) => Arc::new(FixedLocation(coords)),
        None => location_from_config(config),
    };

    Ok(WeatherViewController::new(client, location)
        .with_location_timeout(config.location.timeout()))
}

/// Fetches run as background tasks so the menu stays usable while they are
/// pending; prompts block, so they run on the blocking pool.
async fn interactive(controller: Arc<WeatherViewController>) -> anyhow::Result<()> {
    let mut tasks = JoinSet::new();
    {
        let controller = controller.clone();
        tasks.spawn(async move { controller.start_session().await });
    }

    loop {
        println!("\n{}", render(&controller.view()));

        let action = prompt(|| Select::new("What next?", Action::ALL.to_vec()).prompt()).await?;
        let Some(action) = action else {
            break;
        };

        match action {
            Action::Show => {}
            Action::Search => {
                let current = controller.state().search_text;
                let text = prompt(move || {
                    Text::new("City:").with_initial_value(&current).prompt()
                })
                .await?;
                // Leaving the city prompt goes back to the menu.
                let Some(text) = text else {
                    continue;
                };
                controller.set_search_text(text);
                let controller = controller.clone();
                tasks.spawn(async move { controller.search().await });
            }
            Action::Home => {
                let controller = controller.clone();
                tasks.spawn(async move { controller.refresh().await });
            }
            Action::ToggleTheme => controller.toggle_theme(),
            Action::Quit => break,
        }

        // Reap whatever has already finished.
        while tasks.try_join_next().is_some() {}
    }

    controller.shutdown();
    while tasks.join_next().await.is_some() {}
    Ok(())
}

/// Run a blocking inquire prompt. Esc and Ctrl-C both yield `None`.
async fn prompt<T, F>(ask: F) -> anyhow::Result<Option<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, InquireError> + Send + 'static,
{
    match tokio::task::spawn_blocking(ask).await? {
        Ok(answer) => Ok(Some(answer)),
        Err(e) => answer_or_quit(e),
    }
}

fn answer_or_quit<T>(err: InquireError) -> anyhow::Result<Option<T>> {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => Ok(None),
        other => Err(other.into()),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    let base_url = Text::new("Provider base URL:")
        .with_default(&config.provider.base_url)
        .prompt()
        .context("Failed to read base URL")?;

    let location = Text::new("Fixed location as \"lat, lon\" (empty to locate by IP):")
        .prompt()
        .context("Failed to read location")?;
    let fixed = if location.trim().is_empty() {
        None
    } else {
        Some(parse_coordinates(&location)?)
    };

    config.provider.api_key = Some(api_key.trim().to_string());
    config.provider.base_url = base_url.trim().to_string();
    config.set_fixed_location(fixed);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn parse_coordinates(input: &str) -> anyhow::Result<Coordinates> {
    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| anyhow!("Expected \"lat, lon\", got '{input}'"))?;

    let (lat, lon) = (lat.trim(), lon.trim());
    let lat: f64 = lat.parse().with_context(|| format!("Invalid latitude '{lat}'"))?;
    let lon: f64 = lon.parse().with_context(|| format!("Invalid longitude '{lon}'"))?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(anyhow!(
            "Coordinates out of range: latitude must be -90 to 90, longitude -180 to 180"
        ));
    }

    Ok(Coordinates::new(lat, lon))
}
