use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use nrcs_hydrograph::{DesignStorm, Scenario};

/// NRCS design storm hydrograph for an ungauged basin
#[derive(Parser)]
#[command(name = "nrcs-hydrograph")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Synthesises a design hyetogram and outflow hydrograph", long_about = None)]
struct Cli {
    /// Scenario file (TOML)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Resample the hyetogram to this step [h], overrides the scenario
    #[arg(short, long)]
    resample: Option<f64>,

    /// Log level (trace, debug, info, warn, error); falls back to RUST_LOG
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_logging(level: Option<&str>) {
    let level = level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| std::env::var("RUST_LOG").ok().and_then(|v| v.parse().ok()))
        .unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let scenario = Scenario::from_file(&cli.scenario)?;
    let params = scenario
        .to_parameters()
        .with_context(|| format!("scenario '{}'", scenario.name))?;
    let storm = DesignStorm::synthesize(&params)?;

    if !scenario.name.is_empty() {
        println!("{}", scenario.name);
    }
    println!(
        "tc = {:.3} h, CN = {:.1}, step = {:.4} h",
        params.tc, params.curve_number, params.step
    );
    println!();

    println!("Time (h) | Precipitation (mm) | Infiltration (mm) | Effective (mm)");
    let hyeto = &storm.hyetogram;
    for (i, t) in hyeto.grid.times.iter().enumerate() {
        println!(
            "{:<8.2} | {:<18.2} | {:<17.2} | {:.2}",
            t, hyeto.ordered[i], storm.losses.infiltration[i], storm.losses.effective[i]
        );
    }
    println!(
        "Total    | {:<18.2} | {:<17.2} | {:.2}",
        hyeto.total_depth(),
        storm.losses.total_infiltration(),
        storm.losses.total_effective()
    );
    println!();

    let uh = &storm.unit_hydrograph;
    println!(
        "Unit hydrograph: Tp = {:.3} h, Tb = {:.3} h, qp = {:.3} m3/s ({} samples)",
        uh.peak_time,
        uh.base_time,
        uh.peak_flow,
        uh.len()
    );
    println!();

    println!("Time (h) | Outflow (m3/s)");
    for (t, q) in storm.outflow.times.iter().zip(&storm.outflow.flows) {
        println!("{:<8.2} | {:.3}", t, q);
    }
    if let Some((t, q)) = storm.outflow.peak() {
        println!("Peak {q:.3} m3/s at {t:.2} h");
    }

    if let Some(step) = cli.resample.or(scenario.report.resample_step_hours) {
        let resampled = storm
            .resampled(step)
            .with_context(|| format!("resampling to {step} h"))?;
        println!();
        println!("Resampled hyetogram, step {step} h");
        println!("Time (h) | Precipitation (mm)");
        for (t, p) in resampled.times.iter().zip(&resampled.depths) {
            println!("{:<8.3} | {:.3}", t, p);
        }
    }

    Ok(())
}
