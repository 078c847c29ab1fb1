//! Non-equilibrium Fermi golden rule (NEFGR) rate kinetics for a
//! donor-acceptor pair coupled to a harmonic bath.
//!
//! - [`kernel`]: memory integral ∫₀ᵗ C(t, τ) dτ at fixed t and the rate k(t)
//! - [`population`]: donor survival P(t) = exp(−∫k dt)
//! - [`dispatch`]: method / dynamics selection and the integrand table
//! - [`integrands`]: built-in per-mode integrands
//! - [`parameters`]: run configuration and unit conversion

pub mod bath;
pub mod dispatch;
pub mod error;
pub mod grid;
pub mod integrands;
pub mod kernel;
pub mod output;
pub mod parameters;
pub mod plot;
pub mod population;

pub use bath::{BathMode, BathModes};
pub use dispatch::{DynType, IntegrandFn, IntegrandTable, LinearFn, Method, NormalModeTable};
pub use error::{Error, Result};
pub use kernel::{integrate_kernel, nefgrl_rate, KernelRecord, RateModel};
pub use output::RecordWriter;
pub use parameters::{Parameters, SystemParameters};
pub use population::{propagate, propagate_population, PopulationRecord};
