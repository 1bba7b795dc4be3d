//! Core units, constants, and shared motor inputs for the Water Rocket Motor Simulator workspace.

pub mod model;

pub use model::{MotorGeometry, OperatingParameters, ParameterError, SimulationRun};

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Ambient (atmospheric) pressure used throughout the model (Pa).
    pub const P_ATM: f64 = 1.0e5;
    /// Pascals per bar.
    pub const PA_PER_BAR: f64 = 1.0e5;
    /// Density of water (kg/m³).
    pub const RHO_WATER: f64 = 1_000.0;
    /// Sea-level air density (kg/m³).
    pub const RHO_AIR_SEA_LEVEL: f64 = 1.225;
    /// Ratio of specific heats for air.
    pub const GAMMA: f64 = 1.4;
    /// Specific gas constant for dry air (J/(kg·K)).
    pub const R_AIR: f64 = 287.0;
    /// Air temperature assumed inside the bottle (K).
    pub const T_AIR: f64 = 288.0;
    /// Nozzle discharge coefficient.
    pub const CD: f64 = 0.95;
}

/// Metric/imperial conversion helpers.
///
/// Metric units are the ones the engine works in: millimetres, bar, litres,
/// grams and newtons. Imperial counterparts are inches, psi, US fluid ounces,
/// ounces and pound-force.
pub mod units {
    use serde::{Deserialize, Serialize};

    const MM_PER_IN: f64 = 25.4;
    const BAR_PER_PSI: f64 = 0.068_947_572_9;
    const L_PER_FL_OZ: f64 = 0.029_573_529_562_5;
    const G_PER_OZ: f64 = 28.349_523_125;
    const N_PER_LBF: f64 = 4.448_221_615_260_5;

    /// Display/input unit system selected by the caller.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum UnitSystem {
        #[default]
        Metric,
        Imperial,
    }

    /// Physical quantities that cross the metric/imperial boundary.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Quantity {
        Length,
        Pressure,
        Volume,
        Mass,
        Thrust,
        Impulse,
    }

    impl Quantity {
        /// Convert a value expressed in `system` into the metric unit for this quantity.
        pub fn to_metric(self, value: f64, system: UnitSystem) -> f64 {
            match system {
                UnitSystem::Metric => value,
                UnitSystem::Imperial => value * self.imperial_factor(),
            }
        }

        /// Convert a metric value into `system`.
        pub fn from_metric(self, value: f64, system: UnitSystem) -> f64 {
            match system {
                UnitSystem::Metric => value,
                UnitSystem::Imperial => value / self.imperial_factor(),
            }
        }

        /// Unit symbol used when labelling values in `system`.
        pub fn symbol(self, system: UnitSystem) -> &'static str {
            match (self, system) {
                (Quantity::Length, UnitSystem::Metric) => "mm",
                (Quantity::Length, UnitSystem::Imperial) => "in",
                (Quantity::Pressure, UnitSystem::Metric) => "bar",
                (Quantity::Pressure, UnitSystem::Imperial) => "psi",
                (Quantity::Volume, UnitSystem::Metric) => "L",
                (Quantity::Volume, UnitSystem::Imperial) => "fl oz",
                (Quantity::Mass, UnitSystem::Metric) => "g",
                (Quantity::Mass, UnitSystem::Imperial) => "oz",
                (Quantity::Thrust, UnitSystem::Metric) => "N",
                (Quantity::Thrust, UnitSystem::Imperial) => "lbf",
                (Quantity::Impulse, UnitSystem::Metric) => "N·s",
                (Quantity::Impulse, UnitSystem::Imperial) => "lbf·s",
            }
        }

        // metric units per imperial unit
        fn imperial_factor(self) -> f64 {
            match self {
                Quantity::Length => MM_PER_IN,
                Quantity::Pressure => BAR_PER_PSI,
                Quantity::Volume => L_PER_FL_OZ,
                Quantity::Mass => G_PER_OZ,
                Quantity::Thrust | Quantity::Impulse => N_PER_LBF,
            }
        }
    }

    /// Convert millimetres to inches.
    #[inline]
    pub fn mm_to_in(v: f64) -> f64 {
        v / MM_PER_IN
    }

    /// Convert inches to millimetres.
    #[inline]
    pub fn in_to_mm(v: f64) -> f64 {
        v * MM_PER_IN
    }

    /// Convert bar to psi.
    #[inline]
    pub fn bar_to_psi(v: f64) -> f64 {
        v / BAR_PER_PSI
    }

    /// Convert psi to bar.
    #[inline]
    pub fn psi_to_bar(v: f64) -> f64 {
        v * BAR_PER_PSI
    }

    /// Convert litres to US fluid ounces.
    #[inline]
    pub fn l_to_fl_oz(v: f64) -> f64 {
        v / L_PER_FL_OZ
    }

    /// Convert US fluid ounces to litres.
    #[inline]
    pub fn fl_oz_to_l(v: f64) -> f64 {
        v * L_PER_FL_OZ
    }

    /// Convert grams to ounces.
    #[inline]
    pub fn g_to_oz(v: f64) -> f64 {
        v / G_PER_OZ
    }

    /// Convert ounces to grams.
    #[inline]
    pub fn oz_to_g(v: f64) -> f64 {
        v * G_PER_OZ
    }

    /// Convert newtons to pound-force.
    #[inline]
    pub fn n_to_lbf(v: f64) -> f64 {
        v / N_PER_LBF
    }

    /// Convert pound-force to newtons.
    #[inline]
    pub fn lbf_to_n(v: f64) -> f64 {
        v * N_PER_LBF
    }

}
