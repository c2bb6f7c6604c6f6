//! Config command implementation - print or write the configuration

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;

pub fn execute(config: &Config, example: bool, output: Option<PathBuf>) -> Result<()> {
    let config = if example { Config::default() } else { config.clone() };

    match output {
        Some(path) => {
            config.save_to_file(&path)?;
            log::info!("Configuration written to {}", path.display());
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_example_written_to_file_loads_back() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("mutrack.toml");
        execute(&Config::default(), true, Some(path.clone()))?;

        let loaded = Config::load_from_file(&path)?;
        assert_eq!(loaded.layout, Config::default().layout);
        Ok(())
    }

    #[test]
    fn test_effective_config_written_to_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("effective.toml");
        let mut config = Config::default();
        config.layout.density.bin_width = 4.0;
        execute(&config, false, Some(path.clone()))?;

        let loaded = Config::load_from_file(&path)?;
        assert_eq!(loaded.layout.density.bin_width, 4.0);
        Ok(())
    }
}
