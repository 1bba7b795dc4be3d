//! Run manifests and loaders for the Water Rocket Motor Simulator.
//!
//! Manifests may be written in metric or imperial units; [`RunConfig::to_run`]
//! normalises them to the metric [`SimulationRun`] the engine consumes.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use warms_core::units::{Quantity, UnitSystem};
use warms_core::{MotorGeometry, OperatingParameters, ParameterError, SimulationRun};

/// One simulation run as written in a manifest.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RunConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub units: UnitSystem,
    pub geometry: GeometryConfig,
    pub operating: OperatingConfig,
}

/// Bottle geometry in the manifest's unit system.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GeometryConfig {
    pub length: f64,
    pub diameter: f64,
    pub bottle_volume: f64,
    pub bottle_mass: f64,
    pub nozzle_diameter: f64,
}

/// Operating settings in the manifest's unit system.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OperatingConfig {
    pub pressure: f64,
    pub water_ratio: f64,
    #[serde(default)]
    pub include_air_phase: bool,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("run `{name}` is invalid: {source}")]
    Invalid {
        name: String,
        #[source]
        source: ParameterError,
    },
}

fn default_name() -> String {
    "run".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::from_run("baseline", &SimulationRun::default(), UnitSystem::Metric)
    }
}

impl RunConfig {
    /// Express an existing metric run in `units`.
    pub fn from_run(name: &str, run: &SimulationRun, units: UnitSystem) -> Self {
        let g = &run.geometry;
        let o = &run.operating;
        Self {
            name: name.to_string(),
            units,
            geometry: GeometryConfig {
                length: Quantity::Length.from_metric(g.length_mm, units),
                diameter: Quantity::Length.from_metric(g.diameter_mm, units),
                bottle_volume: Quantity::Volume.from_metric(g.bottle_volume_l, units),
                bottle_mass: Quantity::Mass.from_metric(g.bottle_mass_g, units),
                nozzle_diameter: Quantity::Length.from_metric(g.nozzle_diameter_mm, units),
            },
            operating: OperatingConfig {
                pressure: Quantity::Pressure.from_metric(o.pressure_bar, units),
                water_ratio: o.water_ratio_pct,
                include_air_phase: o.include_air_phase,
            },
        }
    }

    /// Convert to metric units and validate.
    pub fn to_run(&self) -> Result<SimulationRun, ConfigError> {
        let units = self.units;
        let g = &self.geometry;
        let o = &self.operating;
        let run = SimulationRun::new(
            MotorGeometry {
                length_mm: Quantity::Length.to_metric(g.length, units),
                diameter_mm: Quantity::Length.to_metric(g.diameter, units),
                bottle_volume_l: Quantity::Volume.to_metric(g.bottle_volume, units),
                bottle_mass_g: Quantity::Mass.to_metric(g.bottle_mass, units),
                nozzle_diameter_mm: Quantity::Length.to_metric(g.nozzle_diameter, units),
            },
            OperatingParameters {
                pressure_bar: Quantity::Pressure.to_metric(o.pressure, units),
                water_ratio_pct: o.water_ratio,
                include_air_phase: o.include_air_phase,
            },
        );
        run.validate().map_err(|source| ConfigError::Invalid {
            name: self.name.clone(),
            source,
        })?;
        Ok(run)
    }
}

/// Load run manifests from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_runs<P: AsRef<Path>>(path: P) -> Result<Vec<RunConfig>, ConfigError> {
    load_records(path)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
