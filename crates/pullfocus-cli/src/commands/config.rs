use clap::Subcommand;
use pullfocus_core::storage::Config;
use pullfocus_core::ConfigError;

use super::common::{print_json, CmdResult, Host};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "storage.backend", "logging.filter")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Print the config file location
    Path,
}

pub fn run(action: ConfigAction, host: Host) -> CmdResult {
    let Host { dir, mut config } = host;
    match action {
        ConfigAction::Get { key } => match config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(ConfigError::UnknownKey(key).into()),
        },
        ConfigAction::Set { key, value } => {
            config.set(&dir, &key, &value)?;
            println!("ok");
        }
        ConfigAction::List => print_json(&config)?,
        ConfigAction::Path => println!("{}", Config::path_in(&dir).display()),
    }
    Ok(())
}
