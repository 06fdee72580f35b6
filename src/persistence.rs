use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SimulationError;
use crate::trajectory_system::state::FlightState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFlight {
    pub aircraft_id: String,
    pub airport_id: String,
    pub weather_id: String,
    pub sim_time: f64,
    pub state: FlightState,
    pub saved_at: DateTime<Utc>,
}

impl SavedFlight {
    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Single-slot save file.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SaveStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, flight: &SavedFlight) -> Result<(), SimulationError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, flight.to_json()?)?;
        log::debug!("Saved flight to {}", self.path.display());
        Ok(())
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<SavedFlight>, SimulationError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        SavedFlight::from_json(&contents).map(Some)
    }

    pub fn clear(&self) -> Result<(), SimulationError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            log::debug!("Cleared save at {}", self.path.display());
        }
        Ok(())
    }
}
