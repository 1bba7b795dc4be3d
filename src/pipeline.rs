//! Simulate-then-analyze orchestration for a single run.

use warms_core::SimulationRun;
use warms_impulse::{AnalysisError, ImpulseSummary, analyze};
use warms_thrust::{ThrustCurve, ThrustError, simulate};

/// One run together with everything derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub run: SimulationRun,
    pub curve: ThrustCurve,
    pub summary: ImpulseSummary,
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("thrust simulation failed: {0}")]
    Thrust(#[from] ThrustError),
    #[error("impulse analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Simulate `run` and derive its impulse summary.
pub fn evaluate(run: SimulationRun) -> Result<Evaluation, EvaluationError> {
    let curve = simulate(&run)?;
    let summary = analyze(&curve)?;
    Ok(Evaluation {
        run,
        curve,
        summary,
    })
}

impl Evaluation {
    /// Render the RASP engine file for this evaluation.
    pub fn to_rasp(&self, generated_at: chrono::NaiveDateTime) -> String {
        warms_export::rasp::export(&self.run, &self.curve, &self.summary, generated_at)
    }
}
