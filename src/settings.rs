//! Difficulty presets and their persistence.
//!
//! Each trainer keeps one [`Selection`] (a difficulty level plus its
//! parameter set) under its own storage key. The store reads it once at
//! startup and writes it back after every change. Storage problems never
//! reach the caller: a bad read falls back to the default preset and a
//! failed write leaves the in-memory choice in place. Both are logged.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{PersistenceError, SettingsError};
use crate::storage::Storage;

pub const MIN_GRID_SIZE: u32 = 2;
pub const MAX_GRID_SIZE: u32 = 10;

/// Storage key of the Schulte table trainer's settings record
pub const SCHULTE_STORAGE_KEY: &str = "schulte-settings";

/// Side length of a Schulte table, always within `MIN_GRID_SIZE..=MAX_GRID_SIZE`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct GridSize(u32);

impl GridSize {
    pub fn new(size: u32) -> Result<Self, SettingsError> {
        if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            Ok(Self(size))
        } else {
            Err(SettingsError::GridSizeOutOfRange {
                size,
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            })
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of cells on a board of this size
    pub fn cell_count(self) -> u32 {
        self.0 * self.0
    }

    pub fn grow(self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }

    pub fn shrink(self) -> Option<Self> {
        Self::new(self.0.saturating_sub(1)).ok()
    }
}

impl TryFrom<u32> for GridSize {
    type Error = SettingsError;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<GridSize> for u32 {
    fn from(size: GridSize) -> Self {
        size.0
    }
}

/// A named, predefined difficulty
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Preset {
    Easy,
    Medium,
    Hard,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Easy, Preset::Medium, Preset::Hard];
}

/// The active difficulty: one of the presets, or `custom` once any single
/// parameter has been overridden
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
    Custom,
}

impl DifficultyLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Custom => "Custom",
        }
    }

    pub fn preset(self) -> Option<Preset> {
        match self {
            Self::Easy => Some(Preset::Easy),
            Self::Medium => Some(Preset::Medium),
            Self::Hard => Some(Preset::Hard),
            Self::Custom => None,
        }
    }
}

impl From<Preset> for DifficultyLevel {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Easy => Self::Easy,
            Preset::Medium => Self::Medium,
            Preset::Hard => Self::Hard,
        }
    }
}

/// Parameter sets for each preset of one trainer
#[derive(Clone, Debug, PartialEq)]
pub struct Presets<T> {
    pub easy: T,
    pub medium: T,
    pub hard: T,
}

impl<T> Presets<T> {
    pub fn get(&self, preset: Preset) -> &T {
        match preset {
            Preset::Easy => &self.easy,
            Preset::Medium => &self.medium,
            Preset::Hard => &self.hard,
        }
    }
}

/// A trainer's parameter set
pub trait TrainerSettings: Clone + Debug + PartialEq + Serialize + DeserializeOwned {
    /// A single-field override
    type Update: Debug;

    fn apply(&mut self, update: Self::Update);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchulteSettings {
    pub grid_size: GridSize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchulteUpdate {
    GridSize(GridSize),
}

impl TrainerSettings for SchulteSettings {
    type Update = SchulteUpdate;

    fn apply(&mut self, update: SchulteUpdate) {
        match update {
            SchulteUpdate::GridSize(size) => self.grid_size = size,
        }
    }
}

pub fn schulte_presets() -> Presets<SchulteSettings> {
    Presets {
        easy: SchulteSettings {
            grid_size: GridSize(3),
        },
        medium: SchulteSettings {
            grid_size: GridSize(5),
        },
        hard: SchulteSettings {
            grid_size: GridSize(7),
        },
    }
}

/// The persisted record: `{"level": ..., "settings": {...}}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Selection<T> {
    #[serde(alias = "difficulty")]
    pub level: DifficultyLevel,
    pub settings: T,
}

/// Holds one trainer's active difficulty and keeps it in sync with storage
#[derive(Debug)]
pub struct SettingsStore<T: TrainerSettings, S: Storage> {
    storage: S,
    key: String,
    presets: Presets<T>,
    default_preset: Preset,
    current: Selection<T>,
    loaded: bool,
}

impl<T: TrainerSettings, S: Storage> SettingsStore<T, S> {
    /// Creates a store showing the default preset. Nothing is read until
    /// [`SettingsStore::load`] runs.
    pub fn new(storage: S, key: impl Into<String>, presets: Presets<T>, default_preset: Preset) -> Self {
        let current = Selection {
            level: default_preset.into(),
            settings: presets.get(default_preset).clone(),
        };
        Self {
            storage,
            key: key.into(),
            presets,
            default_preset,
            current,
            loaded: false,
        }
    }

    /// Creates the store and loads the saved selection right away.
    pub fn open(storage: S, key: impl Into<String>, presets: Presets<T>, default_preset: Preset) -> Self {
        let mut store = Self::new(storage, key, presets, default_preset);
        store.load();
        store
    }

    /// Reads the saved selection, falling back to the default preset when
    /// nothing usable is stored. The resulting selection is written back.
    #[instrument(skip_all, fields(key = %self.key))]
    pub fn load(&mut self) -> &Selection<T> {
        self.current = match self.read_saved() {
            Ok(Some(saved)) => {
                info!(level = %saved.level, "loaded saved settings");
                saved
            }
            Ok(None) => {
                debug!("no saved settings, using defaults");
                self.default_selection()
            }
            Err(e) => {
                warn!(error = %e, "ignoring unreadable settings");
                self.default_selection()
            }
        };
        self.loaded = true;
        self.persist();
        &self.current
    }

    /// Switches to a preset and persists the choice.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn apply_preset(&mut self, preset: Preset) {
        self.current = Selection {
            level: preset.into(),
            settings: self.presets.get(preset).clone(),
        };
        self.persist();
    }

    /// Overrides one parameter, which makes the level `custom`.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn update_setting(&mut self, update: T::Update) {
        self.current.level = DifficultyLevel::Custom;
        self.current.settings.apply(update);
        self.persist();
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn level(&self) -> DifficultyLevel {
        self.current.level
    }

    pub fn settings(&self) -> &T {
        &self.current.settings
    }

    pub fn selection(&self) -> &Selection<T> {
        &self.current
    }

    pub fn presets(&self) -> &Presets<T> {
        &self.presets
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Writes the current selection, reporting failures to the caller.
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let text = serde_json::to_string(&self.current)?;
        self.storage
            .set(&self.key, &text)
            .map_err(|source| PersistenceError::Write {
                key: self.key.clone(),
                source,
            })
    }

    fn persist(&mut self) {
        if !self.loaded {
            debug!("settings not loaded yet, keeping change in memory only");
            return;
        }
        if let Err(e) = self.save() {
            warn!(error = %e, "settings change kept in memory only");
        }
    }

    fn read_saved(&self) -> Result<Option<Selection<T>>, PersistenceError> {
        let text = self
            .storage
            .get(&self.key)
            .map_err(|source| PersistenceError::Read {
                key: self.key.clone(),
                source,
            })?;
        match text {
            None => Ok(None),
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| PersistenceError::Corrupt {
                    key: self.key.clone(),
                    source,
                }),
        }
    }

    fn default_selection(&self) -> Selection<T> {
        Selection {
            level: self.default_preset.into(),
            settings: self.presets.get(self.default_preset).clone(),
        }
    }
}

/// Settings store of the Schulte table trainer
pub type SchulteSettingsStore<S> = SettingsStore<SchulteSettings, S>;

pub fn open_schulte_settings<S: Storage>(storage: S) -> SchulteSettingsStore<S> {
    SettingsStore::open(storage, SCHULTE_STORAGE_KEY, schulte_presets(), Preset::Medium)
}
