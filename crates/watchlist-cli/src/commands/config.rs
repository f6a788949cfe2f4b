use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;
use watchlist_config::{Config, PathManager};

pub fn run_config(
    cmd: ConfigCommands,
    config: &Config,
    config_file: &Path,
    paths: &PathManager,
    output: &Output,
) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(config, config_file, paths, output),
        ConfigCommands::Init { force } => init_config(config_file, paths, force, output),
        ConfigCommands::Path => {
            if output.is_json() {
                output.json(&json!({
                    "type": "config_path",
                    "path": config_file.display().to_string(),
                }));
            } else {
                output.info(config_file.display().to_string());
            }
            Ok(())
        }
    }
}

fn show_config(
    config: &Config,
    config_file: &Path,
    paths: &PathManager,
    output: &Output,
) -> Result<()> {
    let storage_dir = config.storage_dir(&paths.storage_dir());
    let validation = config.validate().err().map(|e| e.to_string());

    if output.is_json() {
        output.json(&json!({
            "type": "config",
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "storage_dir": storage_dir.display().to_string(),
            "storage_key": config.storage.key,
            "max_entries": config.storage.max_entries,
            "error": validation,
        }));
        return Ok(());
    }

    if output.is_quiet() {
        return Ok(());
    }

    println!("\n{}", "Configuration".bright_cyan().bold());

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Setting").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    let file_state = if config_file.exists() { "" } else { " (not created, using defaults)" };
    let max_entries = config
        .storage
        .max_entries
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unlimited".to_string());
    let rows = [
        ("Config File", format!("{}{}", config_file.display(), file_state)),
        ("Storage Backend", format!("{:?}", config.storage.backend).to_lowercase()),
        ("Storage Directory", storage_dir.display().to_string()),
        ("Storage Key", config.storage.key.clone()),
        ("Max Entries", max_entries),
        ("On Corrupt Data", format!("{:?}", config.storage.on_corrupt).to_lowercase()),
        ("Image Base URL", config.display.image_base_url.clone()),
        ("Log Level", config.logging.level.clone()),
    ];
    for (setting, value) in rows {
        table.add_row(vec![Cell::new(setting), Cell::new(value)]);
    }
    println!("{}", table);

    match validation {
        Some(err) => output.warn(format!("Configuration is invalid: {}", err)),
        None => output.success("Configuration is valid"),
    }
    Ok(())
}

fn init_config(
    config_file: &Path,
    paths: &PathManager,
    force: bool,
    output: &Output,
) -> Result<()> {
    if config_file.exists() && !force {
        output.warn(format!(
            "Config file already exists at {} (use --force to overwrite)",
            config_file.display()
        ));
        return Ok(());
    }

    paths.ensure_directories().map_err(|e| {
        eyre!("Failed to create data directories under {}: {}", paths.data_dir().display(), e)
    })?;

    let config = Config::default();
    config
        .save_to_file(config_file)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_file.display(), e))?;

    if output.is_json() {
        let rendered = toml::to_string_pretty(&config).map_err(|e| eyre!("{}", e))?;
        output.json(&json!({
            "type": "config_init",
            "path": config_file.display().to_string(),
            "content": rendered,
        }));
    } else {
        output.success(format!("Wrote default configuration to {}", config_file.display()));
    }
    Ok(())
}
