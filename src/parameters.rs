use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bath::BathModes;
use crate::dispatch::{DynType, Method};
use crate::error::{require_positive, Error, Result};

const AU_TO_CM: f64 = 219474.63;

/// Electronic parameters: gap ω_DA, coupling V and inverse temperature β.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemParameters {
    pub omega_da: f64,
    pub coupling: f64,
    pub beta: f64,
}

impl SystemParameters {
    pub fn validate(&self) -> Result<()> {
        if !self.omega_da.is_finite() {
            return Err(Error::invalid("omega_da", "must be finite"));
        }
        if !self.coupling.is_finite() {
            return Err(Error::invalid("coupling", "must be finite"));
        }
        require_positive("beta", self.beta)
    }
}

impl Default for SystemParameters {
    fn default() -> Self {
        SystemParameters {
            omega_da: 0.02,  // Donor-acceptor gap
            coupling: 1e-4,  // Electronic coupling V
            beta: 1052.6,    // 300 K in atomic units
        }
    }
}

/// Units of the energy-like inputs. Times are always atomic units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    AU,
    CM,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Routine {
    Kernel,
    #[default]
    Populations,
    MethodScan,
}

/// How the bath modes are obtained. Explicit mode lists are in atomic units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BathConfig {
    Explicit {
        omega: Vec<f64>,
        req: Vec<f64>,
        shift: Vec<f64>,
        gamma: Vec<f64>,
    },
    Ohmic {
        n_modes: usize,
        omega_c: f64,
        reorganization: f64,
        #[serde(default)]
        shift_ratio: f64,
        #[serde(default)]
        gamma: f64,
    },
}

impl BathConfig {
    pub fn build(&self) -> Result<BathModes> {
        match self {
            BathConfig::Explicit { omega, req, shift, gamma } => BathModes::new(
                omega.clone().into(),
                req.clone().into(),
                shift.clone().into(),
                gamma.clone().into(),
            ),
            BathConfig::Ohmic { n_modes, omega_c, reorganization, shift_ratio, gamma } => {
                BathModes::ohmic(*n_modes, *omega_c, *reorganization, *shift_ratio, *gamma)
            }
        }
    }
}

impl Default for BathConfig {
    fn default() -> Self {
        BathConfig::Ohmic {
            n_modes: 100,
            omega_c: 1e-3,
            reorganization: 0.02,
            shift_ratio: 1.0,
            gamma: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParameters {
    /// Outer time at which the `kernel` routine evaluates the memory integral
    pub t: f64,
    pub dtau: f64,
    pub tmax: f64,
    pub dt: f64,
}

impl Default for GridParameters {
    fn default() -> Self {
        GridParameters {
            t: 10_000.0,
            dtau: 20.0,
            tmax: 20_000.0,
            dt: 200.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputParameters {
    pub kernel_file: PathBuf,
    pub population_file: PathBuf,
    pub plot: Option<PathBuf>,
    pub progress: bool,
}

impl Default for OutputParameters {
    fn default() -> Self {
        OutputParameters {
            kernel_file: PathBuf::from("kernel.txt"),
            population_file: PathBuf::from("populations.txt"),
            plot: None,
            progress: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub routine: Routine,
    pub units: Units,
    pub system: SystemParameters,
    pub bath: BathConfig,
    pub method: Method,
    pub dyn_type: DynType,
    pub grid: GridParameters,
    pub output: OutputParameters,
}

impl Parameters {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Parameters::from_yaml(&fs::read_to_string(path)?)
    }

    /// Converts energy-like inputs from cm⁻¹ to atomic units in place.
    ///
    /// Explicit mode lists are atomic units only and are rejected in a
    /// wavenumber run file.
    pub fn to_au(&mut self) -> Result<()> {
        match self.units {
            Units::AU => {}
            Units::CM => {
                let (omega_c, reorganization) = match &mut self.bath {
                    BathConfig::Ohmic { omega_c, reorganization, .. } => (omega_c, reorganization),
                    BathConfig::Explicit { .. } => {
                        return Err(Error::invalid(
                            "bath",
                            "explicit mode lists are in atomic units, set `units: au`",
                        ))
                    }
                };
                *omega_c = cm_to_au(*omega_c);
                *reorganization = cm_to_au(*reorganization);

                self.system.omega_da = cm_to_au(self.system.omega_da);
                self.system.coupling = cm_to_au(self.system.coupling);
                // β is an inverse energy
                self.system.beta = au_to_cm(self.system.beta);
                self.units = Units::AU;
            }
        }
        Ok(())
    }
}

pub fn cm_to_au(val: f64) -> f64 {
    val / AU_TO_CM
}

pub fn au_to_cm(val: f64) -> f64 {
    val * AU_TO_CM
}
