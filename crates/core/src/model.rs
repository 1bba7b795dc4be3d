//! Motor geometry and operating inputs that fully determine one simulation run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{P_ATM, PA_PER_BAR};

/// Bottle and nozzle dimensions, all in metric units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorGeometry {
    pub length_mm: f64,
    pub diameter_mm: f64,
    pub bottle_volume_l: f64,
    pub bottle_mass_g: f64,
    pub nozzle_diameter_mm: f64,
}

/// Launch-pad settings chosen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingParameters {
    /// Gauge pressure above ambient (bar).
    pub pressure_bar: f64,
    /// Water fill as a percentage of bottle volume.
    pub water_ratio_pct: f64,
    pub include_air_phase: bool,
}

/// The complete, metric input to the thrust engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub geometry: MotorGeometry,
    pub operating: OperatingParameters,
}

/// Out-of-range geometry or operating inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("{field} must be a finite positive value (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("water ratio must lie strictly between 0 and 100 percent (got {0})")]
    WaterRatioOutOfRange(f64),
    #[error("nozzle diameter {nozzle_mm} mm must be smaller than bottle diameter {bottle_mm} mm")]
    NozzleTooWide { nozzle_mm: f64, bottle_mm: f64 },
}

impl Default for MotorGeometry {
    /// A typical 2 L PET bottle with an 8 mm nozzle.
    fn default() -> Self {
        Self {
            length_mm: 330.0,
            diameter_mm: 110.0,
            bottle_volume_l: 2.0,
            bottle_mass_g: 100.0,
            nozzle_diameter_mm: 8.0,
        }
    }
}

impl Default for OperatingParameters {
    fn default() -> Self {
        Self {
            pressure_bar: 3.0,
            water_ratio_pct: 33.0,
            include_air_phase: false,
        }
    }
}

impl MotorGeometry {
    pub fn validate(&self) -> Result<(), ParameterError> {
        positive("length", self.length_mm)?;
        positive("diameter", self.diameter_mm)?;
        positive("bottle volume", self.bottle_volume_l)?;
        positive("bottle mass", self.bottle_mass_g)?;
        positive("nozzle diameter", self.nozzle_diameter_mm)?;
        if self.nozzle_diameter_mm >= self.diameter_mm {
            return Err(ParameterError::NozzleTooWide {
                nozzle_mm: self.nozzle_diameter_mm,
                bottle_mm: self.diameter_mm,
            });
        }
        Ok(())
    }

    /// Nozzle throat area (m²).
    pub fn nozzle_area_m2(&self) -> f64 {
        let radius_m = self.nozzle_diameter_mm / 2_000.0;
        std::f64::consts::PI * radius_m * radius_m
    }
}

impl OperatingParameters {
    pub fn validate(&self) -> Result<(), ParameterError> {
        positive("pressure", self.pressure_bar)?;
        let ratio = self.water_ratio_pct;
        if !ratio.is_finite() || ratio <= 0.0 || ratio >= 100.0 {
            return Err(ParameterError::WaterRatioOutOfRange(ratio));
        }
        Ok(())
    }

    /// Absolute initial bottle pressure (Pa).
    pub fn absolute_pressure_pa(&self) -> f64 {
        self.pressure_bar * PA_PER_BAR + P_ATM
    }
}

impl SimulationRun {
    pub fn new(geometry: MotorGeometry, operating: OperatingParameters) -> Self {
        Self {
            geometry,
            operating,
        }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        self.geometry.validate()?;
        self.operating.validate()
    }

    /// Initial water load, in the same volume unit as the bottle (litres).
    pub fn water_volume_l(&self) -> f64 {
        self.geometry.bottle_volume_l * self.operating.water_ratio_pct / 100.0
    }

    /// Trapped air volume at ignition (litres).
    pub fn initial_air_volume_l(&self) -> f64 {
        self.geometry.bottle_volume_l - self.water_volume_l()
    }

    /// Water mass expelled as propellant, assuming 1 kg per litre.
    pub fn propellant_mass_kg(&self) -> f64 {
        self.water_volume_l()
    }

    /// Loaded motor mass: water plus the empty bottle.
    pub fn total_mass_kg(&self) -> f64 {
        self.propellant_mass_kg() + self.geometry.bottle_mass_g / 1_000.0
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_is_valid() {
        let run = SimulationRun::default();
        assert_eq!(run.validate(), Ok(()));
        assert!((run.water_volume_l() - 0.66).abs() < 1e-12);
        assert!((run.initial_air_volume_l() - 1.34).abs() < 1e-12);
        assert!((run.total_mass_kg() - 0.76).abs() < 1e-12);
        assert_eq!(run.operating.absolute_pressure_pa(), 4.0e5);
    }

    #[test]
    fn water_ratio_bounds_are_exclusive() {
        for ratio in [0.0, 100.0, -5.0, 120.0, f64::NAN] {
            let params = OperatingParameters {
                water_ratio_pct: ratio,
                ..OperatingParameters::default()
            };
            assert!(matches!(
                params.validate(),
                Err(ParameterError::WaterRatioOutOfRange(_))
            ));
        }
        let params = OperatingParameters {
            water_ratio_pct: 99.9,
            ..OperatingParameters::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_geometry_and_pressure() {
        let geometry = MotorGeometry {
            bottle_volume_l: 0.0,
            ..MotorGeometry::default()
        };
        assert_eq!(
            geometry.validate(),
            Err(ParameterError::NonPositive {
                field: "bottle volume",
                value: 0.0
            })
        );

        let params = OperatingParameters {
            pressure_bar: -1.0,
            ..OperatingParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParameterError::NonPositive {
                field: "pressure",
                ..
            })
        ));
    }

    #[test]
    fn nozzle_must_fit_inside_bottle() {
        let geometry = MotorGeometry {
            nozzle_diameter_mm: 110.0,
            ..MotorGeometry::default()
        };
        assert!(matches!(
            geometry.validate(),
            Err(ParameterError::NozzleTooWide { .. })
        ));
    }

    #[test]
    fn nozzle_area_uses_metres() {
        let area = MotorGeometry::default().nozzle_area_m2();
        assert!((area - 5.026_548e-5).abs() < 1e-10);
    }
}
