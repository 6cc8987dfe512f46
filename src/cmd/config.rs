//! Configuration view and validation commands (`floorwatch config`).

use anyhow::Result;

use super::super::ConfigCommands;

pub fn cmd_config(project_dir: &std::path::Path, command: Option<ConfigCommands>) -> Result<()> {
    use floorwatch::config::{CONFIG_DIR, CONFIG_FILE, FloorConfig, FloorToml};

    let config_dir = project_dir.join(CONFIG_DIR);
    let config_path = config_dir.join(CONFIG_FILE);

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Floorwatch Configuration");
            println!("========================");
            println!();

            let toml = if config_path.exists() {
                println!("Config file: {}", config_path.display());
                FloorToml::load(&config_path)?
            } else {
                println!("No floorwatch.toml found at {}", config_path.display());
                println!("Using default configuration.");
                FloorToml::default()
            };
            println!();

            println!("[server]");
            println!("  host = \"{}\"", toml.server.host);
            println!("  port = {}", toml.server.port);
            println!("  permissive_cors = {}", toml.server.permissive_cors);
            println!();

            println!("[data]");
            println!("  path = \"{}\"", toml.data.path.display());
            println!();

            println!("[bot]");
            println!("  production_target = {}", toml.bot.production_target);
            if let Some(url) = &toml.bot.answer_url {
                println!("  answer_url = \"{}\"", url);
            }
            println!("  answer_timeout_secs = {}", toml.bot.answer_timeout_secs);
            println!();

            println!("[logging]");
            println!("  format = \"{}\"", toml.logging.format);
            if let Some(dir) = &toml.logging.directory {
                println!("  directory = \"{}\"", dir.display());
            }
            println!();

            // Show effective values (including env overrides)
            println!("Effective values (with env overrides):");
            let config = FloorConfig::new(project_dir.to_path_buf())?;
            println!("  port = {}", config.port());
            println!("  data_path = \"{}\"", config.data_path().display());
            match config.answer_url() {
                Some(url) => println!("  answer_url = \"{}\"", url),
                None => println!("  answer_url = (keyword responder only)"),
            }
            println!();

            if !config_path.exists() {
                println!("Run 'floorwatch config init' to create a floorwatch.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let toml = if config_path.exists() {
                FloorToml::load(&config_path)?
            } else {
                println!("No floorwatch.toml found. Using defaults.");
                FloorToml::default()
            };
            let warnings = toml.validate();

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("floorwatch.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if !config_dir.exists() {
                std::fs::create_dir_all(&config_dir)?;
            }

            let toml = FloorToml::default();
            toml.save(&config_path)?;

            println!("Created floorwatch.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [server] host, port, permissive_cors");
            println!("  - [data] path to the factory CSV export");
            println!("  - [bot] production_target, answer_url, answer_timeout_secs");
            println!();
        }
    }

    Ok(())
}
