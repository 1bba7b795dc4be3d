use clap::Parser;
use csv::ReaderBuilder;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use water_rocket_motor::export::table::LEGEND_PREFIX;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Overlay thrust curves exported by `warms --csv` into a PNG"
)]
struct Cli {
    /// Curve CSV file(s) with `time_ms` and `thrust_n` columns; a `# legend:` line names the curve
    #[arg(long = "input", required = true)]
    inputs: Vec<PathBuf>,
    #[arg(long, default_value = "artifacts/thrust.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1000)]
    width: u32,
    #[arg(long, default_value_t = 700)]
    height: u32,
    #[arg(long, default_value = "Water rocket thrust curve")]
    title: String,
}

#[derive(Debug)]
struct Series {
    label: String,
    points: Vec<(f64, f64)>,
}

const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(23, 190, 207),
    RGBColor(148, 103, 189),
    RGBColor(188, 189, 34),
];

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut series = Vec::with_capacity(cli.inputs.len());
    for path in &cli.inputs {
        series.push(read_series(path)?);
    }

    let max_time = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.0))
        .fold(0.0_f64, f64::max);
    let max_thrust = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.1))
        .fold(0.0_f64, f64::max);
    if max_time <= 0.0 {
        return Err(anyhow::anyhow!("Curves span zero time; nothing to plot"));
    }
    let y_top = if max_thrust > 0.0 { max_thrust * 1.05 } else { 1.0 };

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 24.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 16.0, FontStyle::Normal);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(cli.title.clone(), caption_font)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..max_time, 0.0..y_top)?;

    chart
        .configure_mesh()
        .x_desc("Time (ms)")
        .y_desc("Thrust (N)")
        .label_style(label_font.clone())
        .axis_desc_style(label_font.clone())
        .draw()?;

    for (index, s) in series.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(
                s.points.iter().copied(),
                ShapeStyle::from(&color).stroke_width(2),
            ))?
            .label(s.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], ShapeStyle::from(&color).stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .label_font(label_font)
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn read_series(path: &Path) -> anyhow::Result<Series> {
    let contents = fs::read_to_string(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .comment(Some(b'#'))
        .from_reader(contents.as_bytes());
    let headers = rdr.headers()?.clone();
    let time_idx = column(&headers, "time_ms")
        .ok_or_else(|| anyhow::anyhow!("{} missing 'time_ms' column", path.display()))?;
    let thrust_idx = column(&headers, "thrust_n")
        .ok_or_else(|| anyhow::anyhow!("{} missing 'thrust_n' column", path.display()))?;

    let mut points = Vec::new();
    for rec in rdr.records() {
        let r = rec?;
        let time: f64 = r.get(time_idx).unwrap_or("").parse().unwrap_or(f64::NAN);
        let thrust: f64 = r.get(thrust_idx).unwrap_or("").parse().unwrap_or(f64::NAN);
        if time.is_finite() && thrust.is_finite() {
            points.push((time, thrust));
        }
    }
    if points.is_empty() {
        return Err(anyhow::anyhow!("{} contains no curve samples", path.display()));
    }

    let label = contents
        .lines()
        .find_map(|line| line.strip_prefix(LEGEND_PREFIX))
        .map(|legend| legend.trim().to_string())
        .filter(|legend| !legend.is_empty())
        .unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("curve")
                .to_string()
        });
    Ok(Series { label, points })
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}
