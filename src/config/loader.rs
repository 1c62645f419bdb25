//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tariff
//! schedules from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{AlgecirasSchedule, MoroccanSchedule, ScheduleMetadata, TariffSchedules};

/// Loads tariff schedules from a configuration directory.
///
/// # Directory Structure
///
/// ```text
/// config/tariffs_2025/
/// ├── schedule.yaml        # Vintage metadata
/// ├── tanger_med.yaml      # Tanger Med tariff book
/// ├── nador_west_med.yaml  # Nador West Med tariff book
/// └── algeciras.yaml       # Algeciras statutory taxes
/// ```
///
/// # Example
///
/// ```no_run
/// use port_tariff_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/tariffs_2025").unwrap();
/// println!("Loaded schedules: {}", loader.metadata().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    schedules: TariffSchedules,
}

impl ConfigLoader {
    /// Loads every schedule from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - Any tier table or storage band is malformed (`InvalidSchedule`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use port_tariff_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/tariffs_2025")?;
    /// # Ok::<(), port_tariff_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<ScheduleMetadata>(&path.join("schedule.yaml"))?;
        let tanger_med = Self::load_yaml::<MoroccanSchedule>(&path.join("tanger_med.yaml"))?;
        let nador_west_med =
            Self::load_yaml::<MoroccanSchedule>(&path.join("nador_west_med.yaml"))?;
        let algeciras = Self::load_yaml::<AlgecirasSchedule>(&path.join("algeciras.yaml"))?;

        let schedules = TariffSchedules::new(metadata, tanger_med, nador_west_med, algeciras)?;

        debug!(
            code = %schedules.metadata().code,
            version = %schedules.metadata().version,
            "Loaded tariff schedules"
        );

        Ok(Self { schedules })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the vintage metadata.
    pub fn metadata(&self) -> &ScheduleMetadata {
        self.schedules.metadata()
    }

    /// Returns the loaded schedules.
    pub fn schedules(&self) -> &TariffSchedules {
        &self.schedules
    }

    /// Consumes the loader, returning the schedules.
    pub fn into_schedules(self) -> TariffSchedules {
        self.schedules
    }
}
