use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use super::config::Config;

fn config_file_path() -> PathBuf {
    data_dir().join("config.yaml")
}

pub fn data_dir() -> PathBuf {
    let project_dirs = directories::ProjectDirs::from("com", "eightball", "eightball")
        .expect("Cannot retrieve project dirs");
    project_dirs.data_dir().to_owned()
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_file_path())
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    info!("Config file: {}", path.to_string_lossy());
    if !path.exists() {
        info!("Config file does not exist, creating.");
        store_default_config(path)?;
    }
    let config_file =
        File::open(path).with_context(|| format!("Cannot open {}", path.to_string_lossy()))?;
    serde_yaml::from_reader(config_file)
        .with_context(|| format!("Cannot parse {}", path.to_string_lossy()))
}

fn store_default_config(path: &Path) -> Result<()> {
    ensure_dir_created(path)?;
    let config_file = File::create(path)?;
    Ok(serde_yaml::to_writer(config_file, &Config::default())?)
}

fn ensure_dir_created(path: &Path) -> Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create {}", &dir.to_string_lossy()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn missing_config_is_created_with_defaults() {
        let dir = TempDir::new("eightball").unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = load_config_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.is_file());

        let stored: Config = serde_yaml::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(stored, Config::default());
    }

    #[test]
    fn existing_config_is_loaded() {
        let dir = TempDir::new("eightball").unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "shakeDelayMs: 250\nstaticServingDir: web\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.shake_delay_ms, 250);
        assert_eq!(config.static_serving_dir, PathBuf::from("web"));
        assert_eq!(config.serving_addr, "0.0.0.0:3000");
    }

    #[test]
    fn broken_config_is_an_error() {
        let dir = TempDir::new("eightball").unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "shakeDelayMs: [not, a, number]\n").unwrap();

        assert!(load_config_from(&path).is_err());
    }
}
