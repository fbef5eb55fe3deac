// Settings from the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use earthwork_core::{DEFAULT_CELL_SIZE_FT, DEFAULT_GRID_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Mongo,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(StoreBackend::File),
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            other => Err(format!("unknown store backend '{other}' (expected file or mongo)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub data_dir: PathBuf,
    pub mongo_uri: String,
    pub mongo_db: String,
    pub grid_size: usize,
    pub cell_size_ft: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreBackend::File,
            data_dir: PathBuf::from("data"),
            mongo_uri: "mongodb://localhost:27017".to_string(),
            mongo_db: "earthwork".to_string(),
            grid_size: DEFAULT_GRID_SIZE,
            cell_size_ft: DEFAULT_CELL_SIZE_FT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Unset or unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            store: lookup("EARTHWORK_STORE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.store),
            data_dir: lookup("EARTHWORK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            mongo_uri: lookup("EARTHWORK_MONGO_URI").unwrap_or(defaults.mongo_uri),
            mongo_db: lookup("EARTHWORK_MONGO_DB").unwrap_or(defaults.mongo_db),
            grid_size: lookup("EARTHWORK_GRID_SIZE")
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.grid_size),
            cell_size_ft: lookup("EARTHWORK_CELL_SIZE_FT")
                .and_then(|s| s.parse().ok())
                .filter(|&v: &f64| v.is_finite() && v > 0.0)
                .unwrap_or(defaults.cell_size_ft),
        }
    }
}
