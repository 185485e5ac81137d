use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::deck::DEFAULT_IMAGES;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub images: Vec<String>,
    pub countdown_from: u8,
    pub countdown_tick_ms: u64,
    pub settle_ms: u64,
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            images: DEFAULT_IMAGES.iter().map(|s| s.to_string()).collect(),
            countdown_from: 3,
            countdown_tick_ms: 800,
            settle_ms: 100,
            tick_rate_ms: 50,
        }
    }
}

impl Config {
    pub fn pacing(&self) -> Pacing {
        Pacing {
            countdown_from: self.countdown_from,
            countdown_tick: Duration::from_millis(self.countdown_tick_ms),
            settle: Duration::from_millis(self.settle_ms),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}

/// Delays that pace the countdown and the start of each case timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub countdown_from: u8,
    pub countdown_tick: Duration,
    pub settle: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Config::default().pacing()
    }
}

impl Pacing {
    /// No waiting anywhere; used by headless drivers.
    pub fn immediate() -> Self {
        Self {
            countdown_from: 3,
            countdown_tick: Duration::ZERO,
            settle: Duration::ZERO,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
}

/// Read-only JSON config file. Missing or malformed files yield the defaults.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("config {} unavailable ({}), using defaults", self.path.display(), e);
                return Config::default();
            }
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("config {} malformed ({}), using defaults", self.path.display(), e);
                Config::default()
            }
        }
    }
}
