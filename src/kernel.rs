//! Memory integral ∫₀ᵗ C(t, τ) dτ at fixed outer time t.

use std::io::Write;

use num_complex::Complex64;
use tracing::debug;

use crate::bath::BathModes;
use crate::dispatch::{DynType, IntegrandTable, Method, NormalModeTable};
use crate::error::{Error, Result};
use crate::grid::TimeGrid;
use crate::output::{Record, RecordWriter};
use crate::parameters::SystemParameters;

/// Everything the τ-sweep needs besides the grid.
#[derive(Clone, Copy)]
pub struct RateModel<'a> {
    pub system: SystemParameters,
    pub bath: &'a BathModes,
    pub method: Method,
    pub dyn_type: DynType,
    pub table: &'a dyn IntegrandTable,
}

impl<'a> RateModel<'a> {
    /// Model using the built-in [`NormalModeTable`].
    pub fn new(
        system: SystemParameters,
        bath: &'a BathModes,
        method: Method,
        dyn_type: DynType,
    ) -> Self {
        RateModel {
            system,
            bath,
            method,
            dyn_type,
            table: &NormalModeTable,
        }
    }

    pub fn with_table(self, table: &'a dyn IntegrandTable) -> Self {
        RateModel { table, ..self }
    }

    pub fn with_method(self, method: Method) -> Self {
        RateModel { method, ..self }
    }
}

/// One τ point of the sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelRecord {
    pub tau: f64,
    /// Σ over modes of the phase integrand
    pub argg: Complex64,
    /// Σ over modes of the linear-coupling term
    pub lin: Complex64,
    /// C(t, τ)
    pub c: Complex64,
    /// Running ∫ C dτ up to and including this point
    pub integ: Complex64,
}

impl Record for KernelRecord {
    fn fields(&self) -> Vec<f64> {
        vec![
            self.tau,
            self.argg.re,
            self.argg.im,
            self.lin.re,
            self.lin.im,
            self.c.re,
            self.c.im,
            self.integ.re,
            self.integ.im,
        ]
    }
}

/// Left-endpoint rectangle sweep over τ ∈ [0, t), calling `visit` per point.
/// Returns the final value of the integral.
fn sweep<F>(model: &RateModel<'_>, t: f64, dtau: f64, mut visit: F) -> Result<Complex64>
where
    F: FnMut(KernelRecord) -> Result<()>,
{
    model.system.validate()?;
    let grid = TimeGrid::half_open(t, dtau)?;

    let integrand = model.table.integrand(model.method);
    let linear = model.table.linear(model.method);
    let beta = model.system.beta;
    let omega_da = model.system.omega_da;
    let n_modes = model.bath.len();

    let zero = Complex64::new(0.0, 0.0);
    let mut integ = zero;

    for tau in grid.iter() {
        let (argg, lin) = model.bath.iter().fold((zero, zero), |(argg, lin), m| {
            (
                argg + integrand(t, tau, omega_da, m.omega, m.shift, m.req, beta),
                lin + linear(t, tau, m.gamma, m.omega, m.shift, m.req, beta),
            )
        });
        let argg = argg + model.table.gap_correction(omega_da, tau, n_modes);

        let c = model.dyn_type.combine(argg, lin, model.system.coupling);
        if !(c.re.is_finite() && c.im.is_finite()) {
            return Err(Error::NumericDomain { t, tau });
        }
        integ += c * dtau;

        visit(KernelRecord { tau, argg, lin, c, integ })?;
    }

    Ok(integ)
}

/// Sweeps τ over [0, t) in steps of `dtau`, writing one line per point to
/// `out` and returning the same records.
pub fn integrate_kernel<W: Write>(
    model: &RateModel<'_>,
    t: f64,
    dtau: f64,
    out: &mut RecordWriter<W>,
) -> Result<Vec<KernelRecord>> {
    debug!(t, dtau, method = %model.method, modes = model.bath.len(), "integrating kernel");

    let mut records = Vec::new();
    sweep(model, t, dtau, |record| {
        out.write(&record)?;
        records.push(record);
        Ok(())
    })?;
    Ok(records)
}

/// Instantaneous NEFGR rate k(t) = 2 Re ∫₀ᵗ C(t, τ) dτ.
pub fn nefgrl_rate(model: &RateModel<'_>, t: f64, dtau: f64) -> Result<f64> {
    let integ = sweep(model, t, dtau, |_| Ok(()))?;
    Ok(2.0 * integ.re)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{IntegrandFn, LinearFn};
    use ndarray::{array, Array1};

    fn zero_integrand(_: f64, _: f64, _: f64, _: f64, _: f64, _: f64, _: f64) -> Complex64 {
        Complex64::new(0.0, 0.0)
    }

    fn unit_linear(_: f64, _: f64, _: f64, _: f64, _: f64, _: f64, _: f64) -> Complex64 {
        Complex64::new(1.0, 0.0)
    }

    fn echo_gap(_: f64, _: f64, omega_da: f64, _: f64, _: f64, _: f64, _: f64) -> Complex64 {
        Complex64::new(omega_da, 0.0)
    }

    fn overflow(_: f64, _: f64, _: f64, _: f64, _: f64, _: f64, _: f64) -> Complex64 {
        Complex64::new(1e6, 0.0)
    }

    struct Stub(IntegrandFn, LinearFn);

    impl IntegrandTable for Stub {
        fn integrand(&self, _: Method) -> IntegrandFn {
            self.0
        }
        fn linear(&self, _: Method) -> LinearFn {
            self.1
        }
    }

    fn one_mode() -> BathModes {
        BathModes::new(array![1.0], array![1.0], array![0.0], array![0.5]).unwrap()
    }

    fn system(coupling: f64) -> SystemParameters {
        SystemParameters { omega_da: 0.3, coupling, beta: 1.0 }
    }

    #[test]
    fn unit_correlation_integrates_to_n_dtau() {
        let bath = one_mode();
        let stub = Stub(zero_integrand, zero_integrand);
        let model = RateModel::new(system(1.0), &bath, Method::Exact, DynType::PureDephasing)
            .with_table(&stub);

        let records = integrate_kernel(&model, 2.0, 0.25, &mut RecordWriter::discard()).unwrap();
        assert_eq!(records.len(), 8);
        for (n, r) in records.iter().enumerate() {
            assert_eq!(r.c, Complex64::new(1.0, 0.0));
            assert!((r.integ.re - (n + 1) as f64 * 0.25).abs() < 1e-12);
            assert_eq!(r.integ.im, 0.0);
        }
    }

    #[test]
    fn linear_coupling_uses_linear_sum() {
        let bath = BathModes::new(
            array![1.0, 2.0, 3.0],
            array![0.0, 0.0, 0.0],
            array![0.0, 0.0, 0.0],
            array![0.0, 0.0, 0.0],
        )
        .unwrap();
        let stub = Stub(zero_integrand, unit_linear);
        let model = RateModel::new(system(5.0), &bath, Method::Cd, DynType::LinearCoupling)
            .with_table(&stub);

        let records = integrate_kernel(&model, 1.0, 0.5, &mut RecordWriter::discard()).unwrap();
        assert!(records.iter().all(|r| r.c == Complex64::new(3.0, 0.0)));
    }

    #[test]
    fn every_mode_receives_the_full_gap() {
        let bath = BathModes::new(
            array![1.0, 2.0, 3.0, 4.0],
            Array1::zeros(4),
            Array1::zeros(4),
            Array1::zeros(4),
        )
        .unwrap();
        let stub = Stub(echo_gap, zero_integrand);
        let model = RateModel::new(system(1.0), &bath, Method::W0, DynType::PureDephasing)
            .with_table(&stub);

        let records = integrate_kernel(&model, 1.0, 0.5, &mut RecordWriter::discard()).unwrap();
        assert_eq!(records.len(), 2);
        for r in &records {
            assert!((r.argg.re - 4.0 * 0.3).abs() < 1e-15, "{}", r.argg);
            assert_eq!(r.argg.im, 0.0);
        }
    }

    #[test]
    fn built_in_table_counts_the_gap_once() {
        // Uncoupled modes contribute only the gap phase.
        let bath = BathModes::new(
            array![1.0, 2.0, 3.0],
            Array1::zeros(3),
            Array1::zeros(3),
            Array1::zeros(3),
        )
        .unwrap();
        let model = RateModel::new(system(1.0), &bath, Method::Marcus, DynType::PureDephasing);
        let records = integrate_kernel(&model, 2.0, 0.5, &mut RecordWriter::discard()).unwrap();
        for r in &records {
            assert!(r.argg.re.abs() < 1e-15);
            assert!((r.argg.im - 0.3 * r.tau).abs() < 1e-14, "tau = {}: {}", r.tau, r.argg);
        }
    }

    #[test]
    fn tau_grid_is_half_open() {
        let bath = one_mode();
        let model = RateModel::new(system(1.0), &bath, Method::Exact, DynType::PureDephasing);
        let records = integrate_kernel(&model, 1.0, 0.1, &mut RecordWriter::discard()).unwrap();
        let taus: Vec<f64> = records.iter().map(|r| r.tau).collect();
        assert_eq!(taus.len(), 10);
        assert_eq!(taus[0], 0.0);
        assert!(taus.windows(2).all(|w| w[1] > w[0]));
        assert!(taus.iter().all(|tau| *tau < 1.0));
    }

    #[test]
    fn zero_time_gives_zero_rate() {
        let bath = one_mode();
        let model = RateModel::new(system(1.0), &bath, Method::Marcus, DynType::PureDephasing);
        assert_eq!(nefgrl_rate(&model, 0.0, 0.1).unwrap(), 0.0);
    }

    #[test]
    fn rate_is_twice_real_part_of_final_integral() {
        let bath = one_mode();
        let model = RateModel::new(system(0.7), &bath, Method::Lsc, DynType::LinearCoupling);
        let records = integrate_kernel(&model, 3.0, 0.05, &mut RecordWriter::discard()).unwrap();
        let k = nefgrl_rate(&model, 3.0, 0.05).unwrap();
        let last = records.last().unwrap();
        assert_eq!(k, 2.0 * last.integ.re);
    }

    #[test]
    fn overflowing_correlation_is_a_domain_error() {
        let bath = one_mode();
        let stub = Stub(overflow, zero_integrand);
        let model = RateModel::new(system(1.0), &bath, Method::Exact, DynType::PureDephasing)
            .with_table(&stub);
        let err = nefgrl_rate(&model, 1.0, 0.5).unwrap_err();
        assert!(matches!(err, Error::NumericDomain { tau, .. } if tau == 0.0));
    }

    #[test]
    fn invalid_temperature_is_rejected_before_sweeping() {
        let bath = one_mode();
        let sys = SystemParameters { beta: -1.0, ..system(1.0) };
        let model = RateModel::new(sys, &bath, Method::Exact, DynType::PureDephasing);
        let err = nefgrl_rate(&model, 1.0, 0.1).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "beta", .. }));
    }

    #[test]
    fn records_stream_to_writer() {
        let bath = one_mode();
        let model = RateModel::new(system(1.0), &bath, Method::Cav, DynType::PureDephasing);
        let mut out = RecordWriter::new(Vec::new());
        let records = integrate_kernel(&model, 1.0, 0.25, &mut out).unwrap();
        assert_eq!(out.lines(), records.len());
        let text = String::from_utf8(out.finish().unwrap()).unwrap();
        let first: Vec<&str> = text.lines().next().unwrap().split("  ").collect();
        assert_eq!(first.len(), 9);
    }
}
