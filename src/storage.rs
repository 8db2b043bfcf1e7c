use crate::config::write_json_atomic;
use crate::model::{PetState, SAVE_VERSION};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, path::PathBuf};

/// Where the pet lives between runs.
pub trait PetStore {
    /// `Ok(None)` means there is nothing saved yet.
    fn load(&mut self) -> Result<Option<PetState>>;
    fn save(&mut self, state: &PetState) -> Result<()>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub pet: PetState,
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PetStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<PetState>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        let save: SaveFile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        if save.version > SAVE_VERSION {
            bail!(
                "save file version {} is newer than supported version {}",
                save.version,
                SAVE_VERSION
            );
        }
        Ok(Some(save.pet.sanitized()))
    }

    fn save(&mut self, state: &PetState) -> Result<()> {
        let save = SaveFile {
            version: SAVE_VERSION,
            pet: state.clone(),
        };
        write_json_atomic(&self.path, &save)
    }
}

/// Keeps the pet in memory only. Saves can be made to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub saved: Option<PetState>,
    pub save_count: usize,
    pub fail_saves: bool,
}

impl MemoryStore {
    pub fn with_state(state: PetState) -> Self {
        Self {
            saved: Some(state),
            ..Self::default()
        }
    }
}

impl PetStore for MemoryStore {
    fn load(&mut self) -> Result<Option<PetState>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, state: &PetState) -> Result<()> {
        if self.fail_saves {
            bail!("memory store is read-only");
        }
        self.saved = Some(state.clone());
        self.save_count += 1;
        Ok(())
    }
}
