//! Donor survival probability P(t) = exp(−∫₀ᵗ k(t') dt').

use std::io::Write;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::error::Result;
use crate::grid::TimeGrid;
use crate::kernel::{nefgrl_rate, RateModel};
use crate::output::{Record, RecordWriter};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopulationRecord {
    pub t: f64,
    /// Rate from the previous time step (0 at t = 0).
    pub k: f64,
    pub p: f64,
}

impl Record for PopulationRecord {
    fn fields(&self) -> Vec<f64> {
        vec![self.t, self.k, self.p]
    }
}

/// Progress bar over `len` outer steps.
pub fn progress_bar(len: usize) -> ProgressBar {
    let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} steps [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(len as u64).with_style(style)
}

/// Rectangle-rule propagation on the closed grid [0, tmax] with any rate
/// function.
///
/// Each record is written before the rate at its own time is evaluated, so
/// the `k` column lags `P` by one step.
pub fn propagate<W, F>(
    tmax: f64,
    dt: f64,
    mut rate: F,
    out: &mut RecordWriter<W>,
    progress: &ProgressBar,
) -> Result<Vec<PopulationRecord>>
where
    W: Write,
    F: FnMut(f64) -> Result<f64>,
{
    let grid = TimeGrid::closed(tmax, dt)?;
    progress.set_length(grid.len() as u64);

    let mut summ = 0.0;
    let mut p = 1.0;
    let mut k = 0.0;
    let mut records = Vec::with_capacity(grid.len());

    for t in grid.iter() {
        let record = PopulationRecord { t, k, p };
        out.write(&record)?;
        records.push(record);

        k = rate(t)?;
        summ += k * dt;
        p = (-summ).exp();

        debug!(t, k, p, "population step");
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(steps = records.len(), final_p = p, "population propagated");
    Ok(records)
}

/// Propagates P(t) with k(t) from [`nefgrl_rate`].
pub fn propagate_population<W: Write>(
    model: &RateModel<'_>,
    dtau: f64,
    tmax: f64,
    dt: f64,
    out: &mut RecordWriter<W>,
) -> Result<Vec<PopulationRecord>> {
    propagate(
        tmax,
        dt,
        |t| nefgrl_rate(model, t, dtau),
        out,
        &ProgressBar::hidden(),
    )
}
