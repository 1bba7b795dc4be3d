//! Export helpers for RASP engine files, curve tables, and JSON summaries.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

/// Errors surfaced while exporting simulation artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no thrust curve has been computed yet")]
    NoCurve,
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// RASP (`.eng`) engine file rendering.
pub mod rasp {
    use std::fmt;

    use chrono::NaiveDateTime;
    use warms_core::SimulationRun;
    use warms_impulse::ImpulseSummary;
    use warms_thrust::ThrustCurve;

    /// Conventional extension for RASP engine files.
    pub const RASP_EXTENSION: &str = "eng";
    /// Manufacturer tag written on the header line.
    pub const DEFAULT_MANUFACTURER: &str = "WaRMS";
    /// Ejection delay field; `P` marks a plugged motor with no ejection charge.
    const DELAYS: &str = "P";
    const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Everything needed to render one engine file.
    #[derive(Debug, Clone)]
    pub struct MotorFile<'a> {
        pub run: &'a SimulationRun,
        pub curve: &'a ThrustCurve,
        pub summary: &'a ImpulseSummary,
        pub generated_at: NaiveDateTime,
        pub manufacturer: &'a str,
    }

    impl<'a> MotorFile<'a> {
        pub fn new(
            run: &'a SimulationRun,
            curve: &'a ThrustCurve,
            summary: &'a ImpulseSummary,
            generated_at: NaiveDateTime,
        ) -> Self {
            Self {
                run,
                curve,
                summary,
                generated_at,
                manufacturer: DEFAULT_MANUFACTURER,
            }
        }

        pub fn with_manufacturer(mut self, manufacturer: &'a str) -> Self {
            self.manufacturer = manufacturer;
            self
        }

        pub fn render(&self) -> String {
            self.to_string()
        }
    }

    impl fmt::Display for MotorFile<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let geometry = &self.run.geometry;
            let operating = &self.run.operating;
            let summary = self.summary;

            writeln!(f, "; Water Rocket Motor File")?;
            writeln!(
                f,
                "; Generated by Water Rocket Motor Simulator on {}",
                self.generated_at.format(TIMESTAMP_FORMAT)
            )?;
            writeln!(f, "; Configuration:")?;
            writeln!(f, ";   Volume: {:.1}L", geometry.bottle_volume_l)?;
            writeln!(f, ";   Pressure: {:.1} bar", operating.pressure_bar)?;
            writeln!(f, ";   Water ratio: {:.1}%", operating.water_ratio_pct)?;
            writeln!(f, ";   Nozzle diameter: {:.1} mm", geometry.nozzle_diameter_mm)?;
            writeln!(
                f,
                ";   Air phase: {}",
                if operating.include_air_phase {
                    "included"
                } else {
                    "excluded"
                }
            )?;
            writeln!(f, ";   Total Impulse: {:.2} Ns", summary.total_impulse_ns)?;
            writeln!(f, ";   Average Thrust: {:.2} N", summary.average_thrust_n)?;
            writeln!(f, ";   Burn Time: {:.3} s", summary.burn_time_s)?;
            writeln!(f)?;

            // name diameter length delays propellant_kg total_kg manufacturer
            writeln!(
                f,
                "{} {:.1} {:.1} {} {:.4} {:.4} {}",
                summary.motor_designation(),
                geometry.diameter_mm,
                geometry.length_mm,
                DELAYS,
                self.run.propellant_mass_kg(),
                self.run.total_mass_kg(),
                self.manufacturer,
            )?;

            for (time_ms, thrust_n) in self.curve.samples() {
                writeln!(f, "{:.4} {:.4}", time_ms / 1_000.0, thrust_n)?;
            }
            f.write_str(";")
        }
    }

    /// Render the engine file for one run.
    pub fn export(
        run: &SimulationRun,
        curve: &ThrustCurve,
        summary: &ImpulseSummary,
        generated_at: NaiveDateTime,
    ) -> String {
        MotorFile::new(run, curve, summary, generated_at).render()
    }
}

/// Plain CSV table of a thrust curve, one row per sample.
pub mod table {
    use std::io::{self, Write};

    use warms_thrust::ThrustCurve;

    pub const HEADER: &str = "time_ms,thrust_n,phase";
    /// Prefix of the optional comment line naming the curve for overlays.
    pub const LEGEND_PREFIX: &str = "# legend: ";

    pub fn write_curve(writer: &mut dyn Write, curve: &ThrustCurve) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)?;
        for (index, (time_ms, thrust_n)) in curve.samples().enumerate() {
            writeln!(
                writer,
                "{:.6},{:.6},{}",
                time_ms,
                thrust_n,
                curve.phase_of(index).as_str()
            )?;
        }
        Ok(())
    }

    /// Same table preceded by a `# legend: ...` comment line.
    pub fn write_labelled_curve(
        writer: &mut dyn Write,
        curve: &ThrustCurve,
        legend: &str,
    ) -> io::Result<()> {
        writeln!(writer, "{}{}", LEGEND_PREFIX, legend.trim())?;
        write_curve(writer, curve)
    }
}

/// JSON sidecar describing a run and its derived metrics.
pub mod summary {
    use std::io::Write;

    use chrono::NaiveDateTime;
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use warms_core::SimulationRun;
    use warms_impulse::ImpulseSummary;
    use warms_thrust::ThrustCurve;

    use crate::ExportError;

    #[derive(Serialize)]
    struct Sidecar<'a> {
        name: &'a str,
        generated_at: String,
        motor: String,
        run: &'a SimulationRun,
        propellant_mass_kg: f64,
        total_mass_kg: f64,
        samples: usize,
        water_phase_end_ms: f64,
        summary: &'a ImpulseSummary,
    }

    pub fn write_sidecar(
        writer: &mut dyn Write,
        name: &str,
        run: &SimulationRun,
        curve: &ThrustCurve,
        summary: &ImpulseSummary,
        generated_at: NaiveDateTime,
    ) -> Result<(), ExportError> {
        let sidecar = Sidecar {
            name,
            generated_at: generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            motor: summary.motor_designation(),
            run,
            propellant_mass_kg: run.propellant_mass_kg(),
            total_mass_kg: run.total_mass_kg(),
            samples: curve.len(),
            water_phase_end_ms: curve.water_phase_end_ms(),
            summary,
        };
        to_writer_pretty(&mut *writer, &sidecar)?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use warms_core::{OperatingParameters, SimulationRun};
    use warms_impulse::analyze;
    use warms_thrust::simulate;

    use super::*;

    fn stamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap()
    }

    #[test]
    fn rasp_layout_for_default_bottle() {
        let run = SimulationRun::default();
        let curve = simulate(&run).unwrap();
        let summary = analyze(&curve).unwrap();
        let text = rasp::export(&run, &curve, &summary, stamp());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "; Water Rocket Motor File");
        assert_eq!(
            lines[1],
            "; Generated by Water Rocket Motor Simulator on 2024-05-17 09:30:00"
        );
        assert_eq!(lines[3], ";   Volume: 2.0L");
        assert_eq!(lines[4], ";   Pressure: 3.0 bar");
        assert_eq!(lines[5], ";   Water ratio: 33.0%");
        assert_eq!(lines[6], ";   Nozzle diameter: 8.0 mm");
        assert_eq!(lines[7], ";   Air phase: excluded");
        assert_eq!(lines[8], ";   Total Impulse: 5.13 Ns");
        assert_eq!(lines[10], ";   Burn Time: 0.282 s");
        assert_eq!(lines[11], "");
        assert_eq!(lines[12], "C18 110.0 330.0 P 0.6600 0.7600 WaRMS");
        assert!(lines[13].starts_with("0.0000 "));
        assert_eq!(lines.len(), 13 + curve.len() + 1);
        assert_eq!(*lines.last().unwrap(), ";");
        assert!(text.ends_with("\n;"));
    }

    #[test]
    fn manufacturer_override_lands_on_header() {
        let run = SimulationRun {
            operating: OperatingParameters {
                include_air_phase: true,
                ..OperatingParameters::default()
            },
            ..SimulationRun::default()
        };
        let curve = simulate(&run).unwrap();
        let summary = analyze(&curve).unwrap();
        let text = rasp::MotorFile::new(&run, &curve, &summary, stamp())
            .with_manufacturer("Garage")
            .render();
        assert!(text.contains(";   Air phase: included\n"));
        assert!(text.contains("\nC13 110.0 330.0 P 0.6600 0.7600 Garage\n"));
    }

    #[test]
    fn curve_table_tags_phases() {
        let run = SimulationRun {
            operating: OperatingParameters {
                include_air_phase: true,
                ..OperatingParameters::default()
            },
            ..SimulationRun::default()
        };
        let curve = simulate(&run).unwrap();
        let mut buf = Vec::new();
        table::write_curve(&mut buf, &curve).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(table::HEADER));
        assert!(lines.next().unwrap().ends_with(",water"));
        assert!(text.trim_end().ends_with(",air"));
        assert_eq!(text.lines().count(), curve.len() + 1);
    }

    #[test]
    fn labelled_table_starts_with_legend_comment() {
        let curve = simulate(&SimulationRun::default()).unwrap();
        let mut buf = Vec::new();
        table::write_labelled_curve(&mut buf, &curve, "V=2.0L, P=3.0bar\n").unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("# legend: V=2.0L, P=3.0bar"));
        assert_eq!(lines.next(), Some(table::HEADER));
        assert_eq!(text.lines().count(), curve.len() + 2);
    }

    #[test]
    fn sidecar_is_valid_json() {
        let run = SimulationRun::default();
        let curve = simulate(&run).unwrap();
        let summary = analyze(&curve).unwrap();
        let mut buf = Vec::new();
        summary::write_sidecar(&mut buf, "baseline", &run, &curve, &summary, stamp()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["motor"], "C18");
        assert_eq!(value["summary"]["impulse_class"], "C");
        assert_eq!(value["samples"], 500);
        assert_eq!(value["run"]["geometry"]["diameter_mm"], 110.0);
    }
}
