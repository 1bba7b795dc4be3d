//! Append-only collection of evaluated runs for overlay comparison.

use chrono::NaiveDateTime;
use warms_export::ExportError;

use crate::pipeline::Evaluation;

/// Evaluated runs in the order they were computed.
///
/// Entries are never removed individually; [`CurveCollection::clear`] drops them all.
#[derive(Debug, Default, Clone)]
pub struct CurveCollection {
    entries: Vec<Evaluation>,
}

impl CurveCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, evaluation: Evaluation) {
        self.entries.push(evaluation);
    }

    pub fn entries(&self) -> &[Evaluation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently computed run.
    pub fn latest(&self) -> Option<&Evaluation> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Overlay legend text for entry `index`.
    pub fn legend(&self, index: usize) -> Option<String> {
        self.entries.get(index).map(legend_for)
    }

    /// Render the RASP engine file for the latest run.
    pub fn export_latest(&self, generated_at: NaiveDateTime) -> Result<String, ExportError> {
        self.latest()
            .map(|evaluation| evaluation.to_rasp(generated_at))
            .ok_or(ExportError::NoCurve)
    }
}

impl Extend<Evaluation> for CurveCollection {
    fn extend<I: IntoIterator<Item = Evaluation>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

fn legend_for(evaluation: &Evaluation) -> String {
    let g = &evaluation.run.geometry;
    let o = &evaluation.run.operating;
    format!(
        "V={:.1}L, P={:.1}bar, W={:.0}%, D={:.1}mm, I={:.2}N·s",
        g.bottle_volume_l,
        o.pressure_bar,
        o.water_ratio_pct,
        g.nozzle_diameter_mm,
        evaluation.summary.total_impulse_ns
    )
}
