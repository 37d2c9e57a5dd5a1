//! Write a starting config file.

use std::{io::Write, path::Path};

use anyhow::Result;
use rcon_rotation::ConsoleConfig;

pub fn handle<W: Write>(config: &ConsoleConfig, path: &Path, force: bool, output: &mut W) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("Config file already exists at {:?} (use --force to overwrite)", path);
    }

    config.save(path)?;
    tracing::info!("Wrote config to {:?}", path);
    writeln!(output, "Wrote {}", path.display())?;
    writeln!(output, "  api_url: {}", config.api_url)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.yaml");
        let config = ConsoleConfig {
            api_url: "https://rcon.example.com/api/".to_string(),
            api_token: Some("secret".to_string()),
            ..ConsoleConfig::default()
        };

        let mut output = Vec::new();
        handle(&config, &path, false, &mut output).unwrap();
        assert!(String::from_utf8(output).unwrap().contains("rcon.example.com"));
        assert_eq!(ConsoleConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_init_keeps_existing_file_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "api_url: http://10.0.0.2:8010/api/\n").unwrap();

        let err = handle(&ConsoleConfig::default(), &path, false, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(
            ConsoleConfig::load_from_file(&path).unwrap().api_url,
            "http://10.0.0.2:8010/api/"
        );

        handle(&ConsoleConfig::default(), &path, true, &mut Vec::new()).unwrap();
        assert_eq!(
            ConsoleConfig::load_from_file(&path).unwrap(),
            ConsoleConfig::default()
        );
    }
}
