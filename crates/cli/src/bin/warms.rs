use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, ValueEnum};
use water_rocket_motor::config::{RunConfig, load_runs};
use water_rocket_motor::core::SimulationRun;
use water_rocket_motor::core::units::{Quantity, UnitSystem};
use water_rocket_motor::export::rasp::RASP_EXTENSION;
use water_rocket_motor::export::{summary, table, writer_for_path};
use water_rocket_motor::thrust::air_phase_start_pressure_pa;
use water_rocket_motor::{CurveCollection, Evaluation, evaluate};

/// Simulate water rocket thrust curves and export RASP engine files.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Water rocket motor simulator (thrust curve, impulse class, RASP export)"
)]
struct Cli {
    /// Run manifest(s): TOML file, YAML list, or directory of TOML files. Overrides the flags below.
    #[arg(long = "config")]
    configs: Vec<PathBuf>,

    /// Unit system for the flags below and for the printed summary
    #[arg(long, value_enum, default_value_t = Units::Metric)]
    units: Units,

    /// Name used for the flag-defined run
    #[arg(long, default_value = "cli")]
    name: String,

    /// Motor length (mm or in)
    #[arg(long)]
    length: Option<f64>,

    /// Bottle outer diameter (mm or in)
    #[arg(long)]
    diameter: Option<f64>,

    /// Empty bottle mass (g or oz)
    #[arg(long)]
    bottle_mass: Option<f64>,

    /// Bottle internal volume (L or fl oz)
    #[arg(long)]
    volume: Option<f64>,

    /// Gauge launch pressure (bar or psi)
    #[arg(long)]
    pressure: Option<f64>,

    /// Water fill as percent of bottle volume
    #[arg(long)]
    water_ratio: Option<f64>,

    /// Nozzle diameter (mm or in)
    #[arg(long)]
    nozzle_diameter: Option<f64>,

    /// Model the residual-air blowdown after the water is gone
    #[arg(long, default_value_t = false)]
    air_phase: bool,

    /// Write the RASP engine file for the last run ('-' for stdout)
    #[arg(long)]
    eng: Option<PathBuf>,

    /// Write the thrust curve of the last run as CSV, led by a `# legend:` line ('-' for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON summary sidecar for the last run
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Units {
    Metric,
    Imperial,
}

impl From<Units> for UnitSystem {
    fn from(units: Units) -> Self {
        match units {
            Units::Metric => UnitSystem::Metric,
            Units::Imperial => UnitSystem::Imperial,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let system = UnitSystem::from(cli.units);

    let configs = if cli.configs.is_empty() {
        vec![config_from_flags(&cli, system)]
    } else {
        let mut configs = Vec::new();
        for path in &cli.configs {
            let loaded = load_runs(path)
                .with_context(|| format!("failed to load run manifest {}", path.display()))?;
            configs.extend(loaded);
        }
        configs
    };
    if configs.is_empty() {
        return Err(anyhow::anyhow!("no runs found in the provided manifests"));
    }

    let mut store = CurveCollection::new();
    let mut names = Vec::with_capacity(configs.len());
    for config in &configs {
        let run = config.to_run()?;
        let evaluation =
            evaluate(run).with_context(|| format!("run `{}` could not be simulated", config.name))?;
        report_air_phase(&config.name, &run, &evaluation);
        store.push(evaluation);
        names.push(config.name.clone());
    }

    print_summary(&store, &names, system);

    let latest_name = names.last().map(String::as_str).unwrap_or("run");
    let generated_at = Local::now().naive_local();

    if let Some(path) = &cli.eng {
        let path = with_default_extension(path, RASP_EXTENSION);
        let text = store.export_latest(generated_at)?;
        let mut writer = writer_for_path(&path)?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        if path != Path::new("-") {
            eprintln!("RASP engine file written to {}", path.display());
        }
    }

    if let Some(evaluation) = store.latest() {
        if let Some(path) = &cli.csv {
            let mut writer = writer_for_path(path)?;
            let legend = store.legend(store.len() - 1).unwrap_or_default();
            table::write_labelled_curve(&mut writer, &evaluation.curve, &legend)?;
            writer.flush()?;
        }
        if let Some(path) = &cli.json {
            let mut writer = writer_for_path(path)?;
            summary::write_sidecar(
                &mut writer,
                latest_name,
                &evaluation.run,
                &evaluation.curve,
                &evaluation.summary,
                generated_at,
            )?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn config_from_flags(cli: &Cli, system: UnitSystem) -> RunConfig {
    let mut config = RunConfig::from_run(&cli.name, &SimulationRun::default(), system);
    let g = &mut config.geometry;
    if let Some(v) = cli.length {
        g.length = v;
    }
    if let Some(v) = cli.diameter {
        g.diameter = v;
    }
    if let Some(v) = cli.bottle_mass {
        g.bottle_mass = v;
    }
    if let Some(v) = cli.volume {
        g.bottle_volume = v;
    }
    if let Some(v) = cli.nozzle_diameter {
        g.nozzle_diameter = v;
    }
    let o = &mut config.operating;
    if let Some(v) = cli.pressure {
        o.pressure = v;
    }
    if let Some(v) = cli.water_ratio {
        o.water_ratio = v;
    }
    o.include_air_phase = o.include_air_phase || cli.air_phase;
    config
}

fn report_air_phase(name: &str, run: &SimulationRun, evaluation: &Evaluation) {
    if run.operating.include_air_phase && !evaluation.curve.has_air_phase() {
        eprintln!(
            "note: run `{}` requested an air phase but residual pressure ({:.0} Pa) does not exceed ambient",
            name,
            air_phase_start_pressure_pa(run)
        );
    }
}

fn print_summary(store: &CurveCollection, names: &[String], system: UnitSystem) {
    let thrust_unit = Quantity::Thrust.symbol(system);
    let impulse_unit = Quantity::Impulse.symbol(system);

    println!("=== Thrust Curves ===");
    for (index, (evaluation, name)) in store.entries().iter().zip(names).enumerate() {
        let s = &evaluation.summary;
        println!("[{}] {} : {}", index + 1, name, store.legend(index).unwrap_or_default());
        println!(
            "    Motor   : {} (class {}), {} samples",
            s.motor_designation(),
            s.impulse_class,
            evaluation.curve.len()
        );
        println!(
            "    Impulse : {:.2} {}",
            Quantity::Impulse.from_metric(s.total_impulse_ns, system),
            impulse_unit
        );
        println!(
            "    Thrust  : avg = {:.2} {}, peak = {:.2} {}",
            Quantity::Thrust.from_metric(s.average_thrust_n, system),
            thrust_unit,
            Quantity::Thrust.from_metric(s.peak_thrust_n, system),
            thrust_unit
        );
        println!(
            "    Burn    : {:.3} s (water phase ends at {:.1} ms)",
            s.burn_time_s,
            evaluation.curve.water_phase_end_ms()
        );
        if let Some(split) = s.phase_split {
            println!(
                "    Phases  : water = {:.2} {}, air = {:.2} {}",
                Quantity::Impulse.from_metric(split.water_ns, system),
                impulse_unit,
                Quantity::Impulse.from_metric(split.air_ns, system),
                impulse_unit
            );
        }
    }
}

fn with_default_extension(path: &Path, extension: &str) -> PathBuf {
    if path == Path::new("-") || path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(extension)
    }
}
