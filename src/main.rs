use std::path::Path;
use std::process::ExitCode;

use indicatif::ProgressBar;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nefgr_kinetics::dispatch::Method;
use nefgr_kinetics::error::{Error, Result};
use nefgr_kinetics::kernel::{integrate_kernel, nefgrl_rate, RateModel};
use nefgr_kinetics::output::{tagged_path, RecordWriter};
use nefgr_kinetics::parameters::{Parameters, Routine};
use nefgr_kinetics::plot::plot_populations;
use nefgr_kinetics::population::{progress_bar, propagate, PopulationRecord};

/// Run file from the first argument, built-in defaults otherwise.
fn define_parameters() -> Result<Parameters> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "reading run file");
            Parameters::load(path)
        }
        None => Ok(Parameters::default()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut prm = define_parameters()?;
    prm.to_au()?;

    let bath = prm.bath.build()?;
    info!(
        modes = bath.len(),
        reorganization = bath.reorganization(),
        method = %prm.method,
        dyn_type = ?prm.dyn_type,
        "bath ready"
    );
    let model = RateModel::new(prm.system, &bath, prm.method, prm.dyn_type);

    // Run routine specified by prm.routine
    match prm.routine {
        Routine::Kernel => kernel(&prm, &model),
        Routine::Populations => {
            let records = populations(&prm, &model, &prm.output.population_file)?;
            if let Some(plot) = &prm.output.plot {
                plot_populations(&records, plot).map_err(|e| Error::Plot(e.to_string()))?;
                info!(path = %plot.display(), "plot written");
            }
            Ok(())
        }
        Routine::MethodScan => method_scan(&prm, &model),
    }
}

fn kernel(prm: &Parameters, model: &RateModel<'_>) -> Result<()> {
    let path = &prm.output.kernel_file;
    let mut out = RecordWriter::create(path)?;
    let records = integrate_kernel(model, prm.grid.t, prm.grid.dtau, &mut out)?;
    out.finish()?;

    let k = records.last().map(|r| 2.0 * r.integ.re).unwrap_or(0.0);
    info!(t = prm.grid.t, k, lines = records.len(), path = %path.display(), "kernel written");
    Ok(())
}

fn populations(
    prm: &Parameters,
    model: &RateModel<'_>,
    path: &Path,
) -> Result<Vec<PopulationRecord>> {
    info!(method = %model.method, path = %path.display(), "propagating populations");

    let progress = if prm.output.progress {
        progress_bar(0)
    } else {
        ProgressBar::hidden()
    };

    let mut out = RecordWriter::create(path)?;
    let dtau = prm.grid.dtau;
    let records = propagate(
        prm.grid.tmax,
        prm.grid.dt,
        |t| nefgrl_rate(model, t, dtau),
        &mut out,
        &progress,
    )?;
    out.finish()?;

    Ok(records)
}

/// Populations for every method, one file each.
fn method_scan(prm: &Parameters, model: &RateModel<'_>) -> Result<()> {
    for method in Method::ALL {
        let path = tagged_path(&prm.output.population_file, method.name());
        let records = populations(prm, &model.with_method(method), &path)?;

        if let Some(last) = records.last() {
            info!(%method, t = last.t, p = last.p, "scan entry done");
        }
    }
    Ok(())
}
