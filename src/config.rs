use crate::model::ActionKind;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Shop prices and action strengths.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Rules {
    pub starting_currency: u32,
    pub food_price: u32,
    pub drink_price: u32,
    pub feed_amount: u8,
    pub water_amount: u8,
    pub pet_amount: u8,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_currency: 100,
            food_price: 10,
            drink_price: 5,
            feed_amount: 20,
            water_amount: 20,
            pet_amount: 10,
        }
    }
}

impl Rules {
    /// Coins charged for an action; petting is free.
    pub fn price(&self, kind: ActionKind) -> u32 {
        match kind {
            ActionKind::Feed => self.food_price,
            ActionKind::Water => self.drink_price,
            ActionKind::Pet => 0,
        }
    }

    pub fn magnitude(&self, kind: ActionKind) -> u8 {
        match kind {
            ActionKind::Feed => self.feed_amount,
            ActionKind::Water => self.water_amount,
            ActionKind::Pet => self.pet_amount,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rules: Rules,
    pub reconcile_interval_secs: u64,
    pub refresh_ms: u64,
    pub enable_color: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            reconcile_interval_secs: 3600,
            refresh_ms: 250,
            enable_color: true,
            log_filter: "capygotchi=info".to_string(),
        }
    }
}

pub struct Paths {
    pub data_dir: PathBuf,
    pub save_path: PathBuf,
    pub settings_path: PathBuf,
    pub alerts_path: PathBuf,
    pub log_path: PathBuf,
}

impl Paths {
    pub fn in_dir(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("could not create data directory {}", dir.display()))?;
        Ok(Self {
            save_path: dir.join("save.json"),
            settings_path: dir.join("settings.json"),
            alerts_path: dir.join("alerts.json"),
            log_path: dir.join("capygotchi.log"),
            data_dir: dir,
        })
    }
}

pub fn project_paths(override_dir: Option<PathBuf>) -> Result<Paths> {
    let dir = match override_dir {
        Some(dir) => dir,
        None => ProjectDirs::from("com", "capygotchi", "Capygotchi")
            .context("could not resolve project directories")?
            .data_local_dir()
            .to_path_buf(),
    };
    Paths::in_dir(dir)
}

pub fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
    }
    Settings::default()
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    write_json_atomic(path, s)
}

pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(value)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename() replaces the target in one step on the same filesystem (POSIX).
    // Windows refuses to rename over an existing file.
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to).with_context(|| format!("replacing {}", to.display()))?;
    Ok(())
}
