use std::io::Read;

/// Host configuration, loaded from a TOML file. Every section and field
/// is optional; the defaults give a standard 4x4 game with best-score
/// persistence under `.twenty48/` in the working directory.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,

    #[serde(default)]
    pub store: StoreConfig,

    /// Seed the move/spawn RNG for reproducible games. Entropy-seeded
    /// when absent; the `--seed` flag overrides either way.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct BoardConfig {
    #[serde(default = "defaults::size")]
    pub size: usize,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct StoreConfig {
    /// Directory for the best-score database. Set `enabled = false` to
    /// play without touching the filesystem.
    #[serde(default = "defaults::store_dir")]
    pub dir: std::path::PathBuf,
    #[serde(default = "defaults::store_enabled")]
    pub enabled: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: defaults::size(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: defaults::store_dir(),
            enabled: defaults::store_enabled(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let cfg: Self = toml::from_str(&contents)?;
        Ok(cfg)
    }
}

mod defaults {
    pub fn size() -> usize {
        4
    }
    pub fn store_dir() -> std::path::PathBuf {
        std::path::PathBuf::from(".twenty48")
    }
    pub fn store_enabled() -> bool {
        true
    }
}
