use clap::{Args, Subcommand};
use habit_config::ConfigManager;

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Inspect or edit the config file
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print a value, e.g. `simulator.reply_delay_ms`
    Get { key: String },
    /// Set a value and save the file
    Set { key: String, value: String },
    /// Print the config file location
    Path,
}

/// Run a config subcommand and return the line to print
pub async fn run_config_command(
    manager: &ConfigManager,
    command: ConfigCommands,
) -> anyhow::Result<String> {
    match command {
        ConfigCommands::Get { key } => {
            let config = manager.snapshot().await;
            let value = config.get_value(&key)?;
            Ok(format!("{} = {}", key, value.as_deref().unwrap_or("(unset)")))
        }
        ConfigCommands::Set { key, value } => {
            manager.update(|config| config.set_value(&key, &value)).await?;
            Ok(format!("Set {} = {}", key, value))
        }
        ConfigCommands::Path => Ok(manager.path().display().to_string()),
    }
}
