use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::population::PopulationRecord;

/// Two-panel SVG: P(t) on top, the emitted k(t) below.
pub fn plot_populations(
    records: &[PopulationRecord],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let t_max = records.last().map(|r| r.t).filter(|t| *t > 0.0).unwrap_or(1.0);

    let (mut k_min, mut k_max) = records
        .iter()
        .fold((0.0f64, 0.0f64), |(lo, hi), r| (lo.min(r.k), hi.max(r.k)));
    if k_max - k_min <= f64::EPSILON * k_max.abs().max(1.0) {
        k_min -= 0.5;
        k_max += 0.5;
    }

    let root = SVGBackend::new(path, (1440, 1080)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 1));

    let population: Vec<(f64, f64)> = records.iter().map(|r| (r.t, r.p)).collect();
    let rate: Vec<(f64, f64)> = records.iter().map(|r| (r.t, r.k)).collect();

    draw_panel(&panels[0], "P(t)", 0.0..t_max, 0.0..1.05, population, BLUE)?;
    draw_panel(&panels[1], "k(t)", 0.0..t_max, k_min..k_max, rate, RED)?;

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    label: &str,
    x_range: Range<f64>,
    y_range: Range<f64>,
    data: Vec<(f64, f64)>,
    color: RGBColor,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .caption(label, ("helvetica", 40))
        .x_label_area_size(60)
        .y_label_area_size(120)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_label_style(("helvetica", 30))
        .y_label_style(("helvetica", 30))
        .disable_mesh()
        .set_all_tick_mark_size(10)
        .x_label_formatter(&|v| format!("{0:.0}", v))
        .y_label_formatter(&|v| format!("{:.3e}", v))
        .draw()?;

    chart.draw_series(LineSeries::new(data, color.stroke_width(4)))?;

    Ok(())
}
