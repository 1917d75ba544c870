use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use forecast_core::{Collector, Config, InfluxWriter, Trigger, schedule};
use inquire::{CustomType, Password, Select, Text};

const UNITS: [&str; 5] = ["auto", "si", "us", "ca", "uk2"];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "forecast-collector",
    version,
    about = "Writes Dark Sky weather and forecast data to InfluxDB"
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, env = "FORECAST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Collect on the configured cron schedule, or once if none is set (default).
    Run,

    /// Collect a single time, ignoring any cron schedule.
    Once,

    /// Validate the configuration and check that InfluxDB is reachable.
    Check,

    /// Interactively write a configuration file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => Config::default_path()?,
        };

        match self.command.unwrap_or(Command::Run) {
            Command::Run => {
                let config = Config::load(Some(path.as_path()))?;
                init_logger(config.general.debug);
                run(&config, config.trigger()?).await
            }
            Command::Once => {
                let config = Config::load(Some(path.as_path()))?;
                init_logger(config.general.debug);
                run(&config, Trigger::Once).await
            }
            Command::Check => {
                let config = Config::load(Some(path.as_path()))?;
                init_logger(config.general.debug);
                check(&config).await
            }
            Command::Configure => {
                init_logger(false);
                configure(&path)
            }
        }
    }
}

fn init_logger(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

async fn run(config: &Config, trigger: Trigger) -> anyhow::Result<()> {
    let collector = Collector::from_config(config)?;

    match &trigger {
        Trigger::Cron { expression, .. } => log::info!(
            "DarkSky data will be written to InfluxDB on cron interval '{expression}'"
        ),
        Trigger::Once => log::info!("DarkSky data is written to InfluxDB once"),
    }

    schedule::run(&trigger, &collector).await;
    Ok(())
}

async fn check(config: &Config) -> anyhow::Result<()> {
    let trigger = config.trigger()?;
    match trigger.next_fire_after(Utc::now()) {
        Some(next) => println!("Schedule: recurring, next cycle at {next}"),
        None => println!("Schedule: one-shot"),
    }

    let writer = InfluxWriter::new(&config.influxdb);
    writer.ping().await?;
    println!("InfluxDB reachable at {}", config.influxdb.base_url());

    Ok(())
}

fn configure(path: &Path) -> anyhow::Result<()> {
    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Config::from_toml_str(&contents)?
    } else {
        Config::default()
    };

    let key = Password::new("Dark Sky API key:")
        .without_confirmation()
        .prompt()?;
    config.darksky.key = Some(key.trim().to_string());

    config.darksky.latitude = CustomType::<f64>::new("Latitude:")
        .with_default(config.darksky.latitude)
        .prompt()?;
    config.darksky.longitude = CustomType::<f64>::new("Longitude:")
        .with_default(config.darksky.longitude)
        .prompt()?;
    config.darksky.units = Select::new("Units:", UNITS.to_vec())
        .with_starting_cursor(units_cursor(&config.darksky.units))
        .prompt()?
        .to_string();

    config.influxdb.host = Text::new("InfluxDB host:")
        .with_default(&config.influxdb.host)
        .prompt()?;
    config.influxdb.port = CustomType::<u16>::new("InfluxDB port:")
        .with_default(config.influxdb.port)
        .prompt()?;
    config.influxdb.database = Text::new("InfluxDB database:")
        .with_default(&config.influxdb.database)
        .prompt()?;
    config.influxdb.username = Text::new("InfluxDB username (empty for none):")
        .with_default(&config.influxdb.username)
        .prompt()?;
    if !config.influxdb.username.is_empty() {
        config.influxdb.password = Password::new("InfluxDB password:")
            .without_confirmation()
            .prompt()?;
    }

    let cron = Text::new("Cron expression (empty for one-shot):")
        .with_default(config.general.cron.as_deref().unwrap_or(""))
        .prompt()?;
    config.general.cron = Some(cron.trim().to_string()).filter(|c| !c.is_empty());

    config.validate()?;
    config.save(path)?;
    println!("Configuration written to {}", path.display());

    Ok(())
}

/// Position of the configured unit system in the `Units:` prompt.
fn units_cursor(units: &str) -> usize {
    UNITS.iter().position(|u| *u == units).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_run() {
        let cli = Cli::try_parse_from(["forecast-collector"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["forecast-collector", "once", "--config", "/tmp/f.toml"]).unwrap();

        assert!(matches!(cli.command, Some(Command::Once)));
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/f.toml")));
    }

    #[test]
    fn units_prompt_starts_on_configured_value() {
        assert_eq!(UNITS[units_cursor("si")], "si");
        assert_eq!(UNITS[units_cursor("uk2")], "uk2");
        assert_eq!(units_cursor("auto"), 0);
        assert_eq!(units_cursor("furlongs"), 0);
    }

    #[tokio::test]
    async fn missing_key_stops_before_any_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\ncron = \"* * * * *\"\n").unwrap();

        let cli = Cli {
            config: Some(path),
            command: Some(Command::Run),
        };

        let err = cli.run().await.unwrap_err();
        assert!(err.to_string().contains("DarkSky key should be provided"));
    }
}
