//! `facetweb config` subcommands.
//!
//! `path` and `init` work before any config file exists, so they take the
//! raw `--config` value; `show` and `export` report the effective
//! configuration after file and `FACETWEB_*` overlays.

use crate::cli::ConfigAction;
use crate::config::FacetwebConfig;
use facetweb_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Run a config subcommand.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => {
            let path = config_file(config_path)?;
            println!("{}", path.display());
            if !path.exists() {
                eprintln!("(not created yet; `facetweb config init` writes the defaults)");
            }
            Ok(())
        }
        ConfigAction::Show => {
            print!("{}", FacetwebConfig::load(config_path)?.to_toml_string()?);
            Ok(())
        }
        ConfigAction::Init { file, force } => {
            let path = match file {
                Some(file) => PathBuf::from(file),
                None => config_file(None)?,
            };
            write_default_config(&path, force)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
        ConfigAction::Export { docker_env } => {
            let config = FacetwebConfig::load(config_path)?;
            for line in export_lines(&config, docker_env)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn config_file(explicit: Option<&str>) -> Result<PathBuf> {
    FacetwebConfig::resolve_config_path(explicit)
        .ok_or_else(|| Error::config("No config directory on this platform; pass --config"))
}

/// Write the default `[expansion]`, `[search]` and `[server]` sections to
/// `path`, refusing to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::config(format!(
            "{} already exists; pass --force to replace it",
            path.display()
        )));
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| Error::io_with_path(e, dir))?;
    }
    let body = FacetwebConfig::default().to_toml_string()?;
    std::fs::write(path, body).map_err(|e| Error::io_with_path(e, path))
}

/// `FACETWEB_<SECTION>_<KEY>=value` lines, or `--env` flags for `docker run`.
pub fn export_lines(config: &FacetwebConfig, docker_env: bool) -> Result<Vec<String>> {
    let prefix = if docker_env { "--env " } else { "" };
    Ok(config
        .to_env_vars()?
        .into_iter()
        .map(|(key, value)| format!("{prefix}{key}={value}"))
        .collect())
}
