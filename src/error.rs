//! Error type shared by the kinetics drivers.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Method code outside {EXACT, LSC, CAV, CD, W0, MARCUS}.
    #[error("invalid method code {0}: expected 0 (exact) through 5 (marcus)")]
    InvalidMethod(i64),

    /// Dynamics code outside {PURE_DEPHASING, LINEAR_COUPLING}.
    #[error("invalid dynamics type code {0}: expected 0 (pure dephasing) or 1 (linear coupling)")]
    InvalidDynType(i64),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The correlation function left the finite reals.
    #[error("non-finite correlation at t = {t}, tau = {tau}")]
    NumericDomain { t: f64, tau: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("plot error: {0}")]
    Plot(String),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Rejects non-finite or non-positive step sizes and temperatures.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(name, format!("must be finite and > 0, got {value}")))
    }
}

pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(name, format!("must be finite and >= 0, got {value}")))
    }
}
