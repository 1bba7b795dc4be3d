use chrono::NaiveDate;
use water_rocket_motor::core::{MotorGeometry, OperatingParameters, SimulationRun};
use water_rocket_motor::evaluate;
use water_rocket_motor::export::rasp::MotorFile;

fn reference_run() -> SimulationRun {
    SimulationRun::new(
        MotorGeometry {
            length_mm: 330.0,
            diameter_mm: 110.0,
            bottle_volume_l: 2.0,
            bottle_mass_g: 100.0,
            nozzle_diameter_mm: 8.0,
        },
        OperatingParameters {
            pressure_bar: 3.0,
            water_ratio_pct: 33.0,
            include_air_phase: false,
        },
    )
}

fn stamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 11, 3)
        .and_then(|d| d.and_hms_opt(18, 5, 9))
        .unwrap()
}

/// `<name> 110.0 330.0 P <prop> <total> <maker>` with single spaces.
fn is_header(line: &str) -> bool {
    let fields: Vec<&str> = line.split(' ').collect();
    fields.len() == 7
        && fields.iter().all(|f| !f.is_empty() && !f.contains(char::is_whitespace))
        && fields[1] == "110.0"
        && fields[2] == "330.0"
        && fields[3] == "P"
        && is_decimal(fields[4])
        && is_decimal(fields[5])
}

/// `<seconds> <newtons>`, both with four decimals.
fn is_sample(line: &str) -> bool {
    match line.split_once(' ') {
        Some((t, f)) => [t, f].iter().all(|v| {
            is_decimal(v) && v.split_once('.').is_some_and(|(_, frac)| frac.len() == 4)
        }),
        None => false,
    }
}

fn is_decimal(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit() || c == '.')
}

#[test]
fn payload_structure_matches_rasp_layout() {
    let evaluation = evaluate(reference_run()).unwrap();
    let text = evaluation.to_rasp(stamp());
    let lines: Vec<&str> = text.lines().collect();

    let header_lines: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| is_header(l))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(header_lines.len(), 1);
    let header_idx = header_lines[0];

    // comments, then one blank line right before the header
    assert!(lines[..header_idx - 1].iter().all(|l| l.starts_with(';')));
    assert_eq!(lines[header_idx - 1], "");

    let data = &lines[header_idx + 1..lines.len() - 1];
    assert_eq!(data.len(), evaluation.curve.len());
    assert!(data.iter().all(|l| is_sample(l)), "bad sample line");
    assert_eq!(lines[lines.len() - 1], ";");
}

#[test]
fn sample_lines_are_seconds_and_newtons() {
    let evaluation = evaluate(reference_run()).unwrap();
    let text = evaluation.to_rasp(stamp());
    let last_sample = text
        .lines()
        .rev()
        .nth(1)
        .expect("final data line");
    let expected = format!(
        "{:.4} 0.0000",
        evaluation.curve.water_phase_end_ms() / 1_000.0
    );
    assert_eq!(last_sample, expected);
    assert_eq!(last_sample, "0.2821 0.0000");
}

#[test]
fn comment_block_echoes_parameters() {
    let evaluation = evaluate(reference_run()).unwrap();
    let text = MotorFile::new(
        &evaluation.run,
        &evaluation.curve,
        &evaluation.summary,
        stamp(),
    )
    .render();
    let expected_head = "; Water Rocket Motor File\n\
; Generated by Water Rocket Motor Simulator on 2024-11-03 18:05:09\n\
; Configuration:\n\
;   Volume: 2.0L\n\
;   Pressure: 3.0 bar\n\
;   Water ratio: 33.0%\n\
;   Nozzle diameter: 8.0 mm\n\
;   Air phase: excluded\n\
;   Total Impulse: 5.13 Ns\n\
;   Average Thrust: 18.18 N\n\
;   Burn Time: 0.282 s\n\
\n\
C18 110.0 330.0 P 0.6600 0.7600 WaRMS\n";
    assert!(text.starts_with(expected_head), "got:\n{}", &text[..400]);
}
