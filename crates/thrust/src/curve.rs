use serde::Serialize;

/// Motor phase a sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Water,
    Air,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Water => "water",
            Phase::Air => "air",
        }
    }
}

/// Discretised thrust-time curve produced by a single simulation run.
///
/// Times are in milliseconds from ignition and never decrease; thrust is in
/// newtons and never negative. The curve cannot be modified once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThrustCurve {
    times_ms: Vec<f64>,
    thrust_n: Vec<f64>,
    water_phase_end_ms: f64,
    water_samples: usize,
}

impl ThrustCurve {
    pub(crate) fn new(
        times_ms: Vec<f64>,
        thrust_n: Vec<f64>,
        water_phase_end_ms: f64,
        water_samples: usize,
    ) -> Self {
        debug_assert_eq!(times_ms.len(), thrust_n.len());
        Self {
            times_ms,
            thrust_n,
            water_phase_end_ms,
            water_samples,
        }
    }

    /// Build a single-phase curve from explicit samples.
    ///
    /// Returns `None` unless both series have the same length, times start at
    /// zero and never decrease, and every value is finite with thrust ≥ 0.
    pub fn from_samples(times_ms: Vec<f64>, thrust_n: Vec<f64>) -> Option<Self> {
        if times_ms.len() != thrust_n.len() {
            return None;
        }
        if times_ms.first().is_some_and(|&t| t != 0.0) {
            return None;
        }
        if times_ms.windows(2).any(|w| w[1] < w[0]) {
            return None;
        }
        if times_ms.iter().any(|t| !t.is_finite())
            || thrust_n.iter().any(|f| !f.is_finite() || *f < 0.0)
        {
            return None;
        }
        let end_ms = times_ms.last().copied().unwrap_or(0.0);
        let samples = times_ms.len();
        Some(Self::new(times_ms, thrust_n, end_ms, samples))
    }

    pub fn times_ms(&self) -> &[f64] {
        &self.times_ms
    }

    pub fn thrust_n(&self) -> &[f64] {
        &self.thrust_n
    }

    /// `(time_ms, thrust_n)` pairs in time order.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times_ms
            .iter()
            .copied()
            .zip(self.thrust_n.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.times_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times_ms.is_empty()
    }

    /// Estimated end of the water phase; the final sample time for water-only curves.
    pub fn water_phase_end_ms(&self) -> f64 {
        self.water_phase_end_ms
    }

    /// Number of leading samples that belong to the water phase.
    pub fn water_samples(&self) -> usize {
        self.water_samples
    }

    pub fn has_air_phase(&self) -> bool {
        self.len() > self.water_samples
    }

    pub fn phase_of(&self, index: usize) -> Phase {
        if index < self.water_samples {
            Phase::Water
        } else {
            Phase::Air
        }
    }

    pub fn peak_thrust_n(&self) -> f64 {
        self.thrust_n.iter().copied().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_split_on_water_sample_count() {
        let curve = ThrustCurve::new(
            vec![0.0, 1.0, 1.0, 2.0],
            vec![3.0, 1.0, 0.5, 0.0],
            1.0,
            2,
        );
        assert_eq!(curve.phase_of(1), Phase::Water);
        assert_eq!(curve.phase_of(2), Phase::Air);
        assert!(curve.has_air_phase());
        assert_eq!(curve.peak_thrust_n(), 3.0);
        let pairs: Vec<_> = curve.samples().collect();
        assert_eq!(pairs[3], (2.0, 0.0));
    }

    #[test]
    fn from_samples_checks_ordering() {
        assert!(ThrustCurve::from_samples(vec![0.0, 2.0, 1.0], vec![1.0, 1.0, 1.0]).is_none());
        assert!(ThrustCurve::from_samples(vec![5.0, 6.0], vec![1.0, 1.0]).is_none());
        assert!(ThrustCurve::from_samples(vec![0.0, 1.0], vec![1.0, -1.0]).is_none());
        let curve = ThrustCurve::from_samples(vec![0.0, 10.0], vec![4.0, 0.0]).unwrap();
        assert_eq!(curve.water_phase_end_ms(), 10.0);
        assert!(!curve.has_air_phase());
        let empty = ThrustCurve::from_samples(Vec::new(), Vec::new()).unwrap();
        assert!(empty.is_empty());
    }
}
