//! Total impulse, burn time, and motor class for a thrust curve.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use warms_thrust::ThrustCurve;

/// Standard hobby-rocketry impulse classes in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ImpulseClass {
    #[serde(rename = "1/4A")]
    QuarterA,
    #[serde(rename = "1/2A")]
    HalfA,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    #[serde(rename = "I+")]
    AboveI,
}

/// Upper impulse bound (N·s, inclusive) for every bounded class.
const CLASS_BOUNDS: [(f64, ImpulseClass); 11] = [
    (0.625, ImpulseClass::QuarterA),
    (1.25, ImpulseClass::HalfA),
    (2.5, ImpulseClass::A),
    (5.0, ImpulseClass::B),
    (10.0, ImpulseClass::C),
    (20.0, ImpulseClass::D),
    (40.0, ImpulseClass::E),
    (80.0, ImpulseClass::F),
    (160.0, ImpulseClass::G),
    (320.0, ImpulseClass::H),
    (640.0, ImpulseClass::I),
];

impl ImpulseClass {
    pub fn label(self) -> &'static str {
        match self {
            ImpulseClass::QuarterA => "1/4A",
            ImpulseClass::HalfA => "1/2A",
            ImpulseClass::A => "A",
            ImpulseClass::B => "B",
            ImpulseClass::C => "C",
            ImpulseClass::D => "D",
            ImpulseClass::E => "E",
            ImpulseClass::F => "F",
            ImpulseClass::G => "G",
            ImpulseClass::H => "H",
            ImpulseClass::I => "I",
            ImpulseClass::AboveI => "I+",
        }
    }

    /// Inclusive upper bound in N·s, or `None` for the open-ended top class.
    pub fn upper_bound_ns(self) -> Option<f64> {
        CLASS_BOUNDS
            .iter()
            .find(|(_, class)| *class == self)
            .map(|(bound, _)| *bound)
    }
}

impl fmt::Display for ImpulseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Smallest class whose upper bound is at least `impulse_ns`.
pub fn classify(impulse_ns: f64) -> ImpulseClass {
    CLASS_BOUNDS
        .iter()
        .find(|(bound, _)| impulse_ns <= *bound)
        .map(|(_, class)| *class)
        .unwrap_or(ImpulseClass::AboveI)
}

/// Impulse delivered in each phase of a two-phase curve (N·s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseImpulse {
    pub water_ns: f64,
    pub air_ns: f64,
}

/// Scalar metrics derived from one thrust curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpulseSummary {
    pub total_impulse_ns: f64,
    pub average_thrust_n: f64,
    pub burn_time_s: f64,
    pub peak_thrust_n: f64,
    pub impulse_class: ImpulseClass,
    /// Present only when the curve carries a residual-air phase.
    pub phase_split: Option<PhaseImpulse>,
}

impl ImpulseSummary {
    /// RASP-style motor designation: class letter followed by the truncated average thrust.
    pub fn motor_designation(&self) -> String {
        format!("{}{}", self.impulse_class, self.average_thrust_n.trunc() as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("curve with {samples} sample(s) has zero burn time")]
    ZeroBurnTime { samples: usize },
}

/// Integrate a thrust curve and classify the motor.
pub fn analyze(curve: &ThrustCurve) -> Result<ImpulseSummary, AnalysisError> {
    let times = curve.times_ms();
    let burn_time_s = match (times.first(), times.last()) {
        (Some(first), Some(last)) => (last - first) / 1_000.0,
        _ => 0.0,
    };
    if burn_time_s <= 0.0 {
        return Err(AnalysisError::ZeroBurnTime {
            samples: curve.len(),
        });
    }

    let times_s: Vec<f64> = times.iter().map(|t| t / 1_000.0).collect();
    let thrust = curve.thrust_n();
    let total_impulse_ns = trapezoid(&times_s, thrust);

    let phase_split = curve.has_air_phase().then(|| {
        // the water slice ends on the boundary sample, the air slice starts on it
        let split = curve.water_samples();
        let water_ns = trapezoid(&times_s[..split], &thrust[..split]);
        PhaseImpulse {
            water_ns,
            air_ns: total_impulse_ns - water_ns,
        }
    });

    Ok(ImpulseSummary {
        total_impulse_ns,
        average_thrust_n: total_impulse_ns / burn_time_s,
        burn_time_s,
        peak_thrust_n: curve.peak_thrust_n(),
        impulse_class: classify(total_impulse_ns),
        phase_split,
    })
}

/// Trapezoidal-rule integral of `y` over `x`. Extra trailing values in the longer slice are ignored.
pub fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (ys[0] + ys[1]) * (xs[1] - xs[0]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_lower_class() {
        assert_eq!(classify(2.5), ImpulseClass::A);
        assert_eq!(classify(2.50001), ImpulseClass::B);
        assert_eq!(classify(700.0), ImpulseClass::AboveI);
        assert_eq!(classify(640.0), ImpulseClass::I);
        assert_eq!(classify(0.0), ImpulseClass::QuarterA);
        assert_eq!(classify(0.7), ImpulseClass::HalfA);
    }

    #[test]
    fn class_labels_and_bounds() {
        assert_eq!(ImpulseClass::QuarterA.to_string(), "1/4A");
        assert_eq!(ImpulseClass::AboveI.label(), "I+");
        assert_eq!(ImpulseClass::D.upper_bound_ns(), Some(20.0));
        assert_eq!(ImpulseClass::AboveI.upper_bound_ns(), None);
        assert!(ImpulseClass::HalfA < ImpulseClass::A);
    }

    #[test]
    fn trapezoid_matches_triangle_area() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 4.0, 0.0];
        assert!((trapezoid(&x, &y) - 4.0).abs() < 1e-12);
        assert_eq!(trapezoid(&[1.0], &[3.0]), 0.0);
    }

    #[test]
    fn analyze_rectangular_pulse() {
        let curve =
            ThrustCurve::from_samples(vec![0.0, 500.0, 1_000.0], vec![10.0, 10.0, 10.0]).unwrap();
        let summary = analyze(&curve).unwrap();
        assert!((summary.total_impulse_ns - 10.0).abs() < 1e-12);
        assert!((summary.burn_time_s - 1.0).abs() < 1e-12);
        assert!((summary.average_thrust_n - 10.0).abs() < 1e-12);
        assert_eq!(summary.impulse_class, ImpulseClass::C);
        assert_eq!(summary.motor_designation(), "C10");
        assert!(summary.phase_split.is_none());
    }

    #[test]
    fn zero_duration_curves_are_rejected() {
        let single = ThrustCurve::from_samples(vec![0.0], vec![5.0]).unwrap();
        assert_eq!(
            analyze(&single),
            Err(AnalysisError::ZeroBurnTime { samples: 1 })
        );
        let flat = ThrustCurve::from_samples(vec![0.0, 0.0], vec![5.0, 5.0]).unwrap();
        assert!(analyze(&flat).is_err());
        let empty = ThrustCurve::from_samples(Vec::new(), Vec::new()).unwrap();
        assert!(analyze(&empty).is_err());
    }
}
