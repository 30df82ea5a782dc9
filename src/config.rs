use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FaultscopeConfig {
    /// Module graph to analyze when the CLI does not name one.
    pub module: Option<PathBuf>,
    /// Fault locations as `filename:line` strings.
    #[serde(default)]
    pub faults: Vec<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("faultscope.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<FaultscopeConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: FaultscopeConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &FaultscopeConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
