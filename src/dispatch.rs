//! Method and dynamics selection.
//!
//! A [`Method`] picks the pair of per-mode functions (phase integrand and
//! linear-coupling term) used inside the memory integral, a [`DynType`] picks
//! how the mode sums are combined into the correlation function C(t, τ).
//! The functions themselves are looked up through an [`IntegrandTable`] so
//! that callers can inject their own.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::integrands;

/// `Integrand_NE_<method>(t, tau, omega_DA, omega, shift, req, beta)`
pub type IntegrandFn =
    fn(t: f64, tau: f64, omega_da: f64, omega: f64, shift: f64, req: f64, beta: f64) -> Complex64;

/// `Linear_NE_<method>(t, tau, gamma, omega, shift, req, beta)`
pub type LinearFn =
    fn(t: f64, tau: f64, gamma: f64, omega: f64, shift: f64, req: f64, beta: f64) -> Complex64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Exact,
    Lsc,
    Cav,
    Cd,
    W0,
    Marcus,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::Exact,
        Method::Lsc,
        Method::Cav,
        Method::Cd,
        Method::W0,
        Method::Marcus,
    ];

    pub fn code(self) -> i64 {
        match self {
            Method::Exact => 0,
            Method::Lsc => 1,
            Method::Cav => 2,
            Method::Cd => 3,
            Method::W0 => 4,
            Method::Marcus => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Method::Exact => "exact",
            Method::Lsc => "lsc",
            Method::Cav => "cav",
            Method::Cd => "cd",
            Method::W0 => "w0",
            Method::Marcus => "marcus",
        }
    }
}

impl TryFrom<i64> for Method {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.code() == code)
            .ok_or(Error::InvalidMethod(code))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DynType {
    /// C = exp(Σ argg) · V²
    #[default]
    PureDephasing,
    /// C = exp(Σ argg) · Σ lin
    LinearCoupling,
}

impl DynType {
    pub fn code(self) -> i64 {
        match self {
            DynType::PureDephasing => 0,
            DynType::LinearCoupling => 1,
        }
    }

    /// Combines the mode-summed phase and linear terms into C(t, τ).
    pub fn combine(self, argg: Complex64, lin: Complex64, coupling: f64) -> Complex64 {
        match self {
            DynType::PureDephasing => argg.exp() * (coupling * coupling),
            DynType::LinearCoupling => argg.exp() * lin,
        }
    }
}

impl TryFrom<i64> for DynType {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(DynType::PureDephasing),
            1 => Ok(DynType::LinearCoupling),
            _ => Err(Error::InvalidDynType(code)),
        }
    }
}

/// Source of the per-mode functions, one binding per (method, role).
pub trait IntegrandTable {
    fn integrand(&self, method: Method) -> IntegrandFn;
    fn linear(&self, method: Method) -> LinearFn;

    /// Term added once to the mode-summed phase at each τ point.
    fn gap_correction(&self, _omega_da: f64, _tau: f64, _n_modes: usize) -> Complex64 {
        Complex64::new(0.0, 0.0)
    }
}

/// Displaced harmonic oscillator forms from [`crate::integrands`].
///
/// Every built-in integrand carries the full gap phase iω_DAτ. The correction
/// removes all but one copy from the mode sum.
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalModeTable;

impl IntegrandTable for NormalModeTable {
    fn integrand(&self, method: Method) -> IntegrandFn {
        match method {
            Method::Exact => integrands::integrand_ne_exact,
            Method::Lsc => integrands::integrand_ne_lsc,
            Method::Cav => integrands::integrand_ne_cav,
            Method::Cd => integrands::integrand_ne_cd,
            Method::W0 => integrands::integrand_ne_w0,
            Method::Marcus => integrands::integrand_ne_marcus,
        }
    }

    fn linear(&self, method: Method) -> LinearFn {
        match method {
            Method::Exact => integrands::linear_ne_exact,
            Method::Lsc => integrands::linear_ne_lsc,
            Method::Cav => integrands::linear_ne_cav,
            Method::Cd => integrands::linear_ne_cd,
            Method::W0 => integrands::linear_ne_w0,
            Method::Marcus => integrands::linear_ne_marcus,
        }
    }

    fn gap_correction(&self, omega_da: f64, tau: f64, n_modes: usize) -> Complex64 {
        let extra = n_modes.saturating_sub(1) as f64;
        Complex64::new(0.0, -extra * omega_da * tau)
    }
}
