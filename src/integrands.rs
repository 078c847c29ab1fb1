//! Per-mode integrands of the non-equilibrium memory kernel.
//!
//! Each bath mode is a displaced harmonic oscillator in mass-weighted
//! coordinates (ħ = 1): donor minimum at 0, acceptor minimum at `req`,
//! reorganization energy E = ω² req² / 2 and energy gap
//! U(q) = ω_DA − E + ω² req q. At t = 0 the mode is thermal around `shift`
//! and then evolves on the donor surface, so its mean position at time s is
//! `shift · cos(ωs)`.
//!
//! For a memory window [t − τ, t] the phase integrand is the log of
//! ⟨exp(i ∫ U ds)⟩, which is exact at second cumulant for a Gaussian mode:
//!
//!   argg = i(ω_DA − E)τ + i ω² req ⟨∫q ds⟩ − ½ ω⁴ req² Var(∫q ds)
//!
//! The linear term is the Gaussian-tilted product of the coupling γ q at both
//! ends of the window. The methods differ in how wide the initial
//! distribution is (quantum `coth(βω/2)` or classical `2/(βω)`) and on which
//! surface the window is propagated.

use num_complex::Complex64;

const I: Complex64 = Complex64 { re: 0.0, im: 1.0 };

#[derive(Clone, Copy, Debug, PartialEq)]
enum Sampling {
    Quantum,
    Classical,
}

impl Sampling {
    /// Position variance of a thermal mode, ⟨δq²⟩ = Q / 2ω.
    fn position_variance(self, omega: f64, beta: f64) -> f64 {
        let q = match self {
            Sampling::Quantum => 1.0 / (0.5 * beta * omega).tanh(),
            Sampling::Classical => 2.0 / (beta * omega),
        };
        0.5 * q / omega
    }
}

/// Surface the memory window is propagated on.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Surface {
    /// Average of donor and acceptor, minimum at req / 2.
    Average,
    Donor,
    /// Coordinates held at their window-start values.
    Frozen,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Dynamics {
    /// Classical motion on a harmonic surface with its minimum at `center`.
    Harmonic { center: f64 },
    Frozen,
}

/// How a method samples the initial mode and moves it over the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Scheme {
    sampling: Sampling,
    surface: Surface,
}

const LSC: Scheme = Scheme { sampling: Sampling::Quantum, surface: Surface::Average };
const CAV: Scheme = Scheme { sampling: Sampling::Classical, surface: Surface::Average };
const CD: Scheme = Scheme { sampling: Sampling::Classical, surface: Surface::Donor };
const W0: Scheme = Scheme { sampling: Sampling::Quantum, surface: Surface::Frozen };
const MARCUS: Scheme = Scheme { sampling: Sampling::Classical, surface: Surface::Frozen };

impl Scheme {
    fn window(self, t: f64, tau: f64, omega: f64, shift: f64, req: f64, beta: f64) -> Window {
        let dynamics = match self.surface {
            Surface::Average => Dynamics::Harmonic { center: 0.5 * req },
            Surface::Donor => Dynamics::Harmonic { center: 0.0 },
            Surface::Frozen => Dynamics::Frozen,
        };
        let phase = omega * (t - tau);
        Window {
            omega,
            req,
            tau,
            var_q: self.sampling.position_variance(omega, beta),
            q0: shift * phase.cos(),
            p0: -omega * shift * phase.sin(),
            dynamics,
        }
    }
}

/// One mode's Gaussian statistics over the window [t − τ, t].
struct Window {
    omega: f64,
    req: f64,
    tau: f64,
    var_q: f64,
    q0: f64,
    p0: f64,
    dynamics: Dynamics,
}

impl Window {
    fn reorganization(&self) -> f64 {
        0.5 * self.omega * self.omega * self.req * self.req
    }

    /// ⟨∫q ds⟩ and Var(∫q ds) over the window.
    fn integrated_position(&self) -> (f64, f64) {
        let (w, tau) = (self.omega, self.tau);
        match self.dynamics {
            Dynamics::Harmonic { center } => {
                let (s, c) = (w * tau).sin_cos();
                let mean = center * tau + (self.q0 - center) * s / w + self.p0 * (1.0 - c) / (w * w);
                let var = 2.0 * self.var_q * (1.0 - c) / (w * w);
                (mean, var)
            }
            Dynamics::Frozen => (self.q0 * tau, self.var_q * tau * tau),
        }
    }

    /// Mean position at the end of the window.
    fn end_position(&self) -> f64 {
        match self.dynamics {
            Dynamics::Harmonic { center } => {
                let (s, c) = (self.omega * self.tau).sin_cos();
                center + (self.q0 - center) * c + self.p0 * s / self.omega
            }
            Dynamics::Frozen => self.q0,
        }
    }

    /// Covariance of the window-start position with the window-end position.
    fn end_covariance(&self) -> f64 {
        match self.dynamics {
            Dynamics::Harmonic { .. } => self.var_q * (self.omega * self.tau).cos(),
            Dynamics::Frozen => self.var_q,
        }
    }

    /// Covariance of either end position with ∫U ds. Both ends give the same
    /// value for harmonic motion.
    fn phase_covariance(&self) -> f64 {
        let w = self.omega;
        match self.dynamics {
            Dynamics::Harmonic { .. } => w * self.req * self.var_q * (w * self.tau).sin(),
            Dynamics::Frozen => w * w * self.req * self.var_q * self.tau,
        }
    }

    fn phase(&self, omega_da: f64) -> Complex64 {
        let w2req = self.omega * self.omega * self.req;
        let (mean, var) = self.integrated_position();
        Complex64::new(
            -0.5 * w2req * w2req * var,
            (omega_da - self.reorganization()) * self.tau + w2req * mean,
        )
    }

    fn linear(&self, gamma: f64) -> Complex64 {
        let s = self.phase_covariance();
        let start = Complex64::new(self.q0, s);
        let end = Complex64::new(self.end_position(), s);
        gamma * gamma * (self.end_covariance() + start * end)
    }
}

/// Exact quantum phase integrand in closed form.
pub fn integrand_ne_exact(
    t: f64,
    tau: f64,
    omega_da: f64,
    omega: f64,
    shift: f64,
    req: f64,
    beta: f64,
) -> Complex64 {
    let q = 1.0 / (0.5 * beta * omega).tanh();
    let (s, c) = (omega * tau).sin_cos();
    let drift = (omega * t).sin() - (omega * (t - tau)).sin();

    -0.5 * req * req * omega * (q * (1.0 - c) + I * s)
        + I * (omega * req * shift * drift + omega_da * tau)
}

/// Linearized semiclassical: Wigner sampling, average-surface window.
pub fn integrand_ne_lsc(
    t: f64,
    tau: f64,
    omega_da: f64,
    omega: f64,
    shift: f64,
    req: f64,
    beta: f64,
) -> Complex64 {
    LSC.window(t, tau, omega, shift, req, beta).phase(omega_da)
}

/// Classical sampling, average-surface window.
pub fn integrand_ne_cav(
    t: f64,
    tau: f64,
    omega_da: f64,
    omega: f64,
    shift: f64,
    req: f64,
    beta: f64,
) -> Complex64 {
    CAV.window(t, tau, omega, shift, req, beta).phase(omega_da)
}

/// Classical sampling, donor-surface window.
pub fn integrand_ne_cd(
    t: f64,
    tau: f64,
    omega_da: f64,
    omega: f64,
    shift: f64,
    req: f64,
    beta: f64,
) -> Complex64 {
    CD.window(t, tau, omega, shift, req, beta).phase(omega_da)
}

/// Wigner sampling with the gap frozen over the window.
pub fn integrand_ne_w0(
    t: f64,
    tau: f64,
    omega_da: f64,
    omega: f64,
    shift: f64,
    req: f64,
    beta: f64,
) -> Complex64 {
    W0.window(t, tau, omega, shift, req, beta).phase(omega_da)
}

/// Classical sampling with the gap frozen over the window.
pub fn integrand_ne_marcus(
    t: f64,
    tau: f64,
    omega_da: f64,
    omega: f64,
    shift: f64,
    req: f64,
    beta: f64,
) -> Complex64 {
    MARCUS.window(t, tau, omega, shift, req, beta).phase(omega_da)
}

pub fn linear_ne_exact(
    t: f64,
    tau: f64,
    gamma: f64,
    omega: f64,
    shift: f64,
    req: f64,
    beta: f64,
) -> Complex64 {
    // LSC is the symmetrized correlation; the exact one adds the commutator.
    let commutator = -I * gamma * gamma * (omega * tau).sin() / (2.0 * omega);
    linear_ne_lsc(t, tau, gamma, omega, shift, req, beta) + commutator
}

pub fn linear_ne_lsc(
    t: f64,
    tau: f64,
    gamma: f64,
    omega: f64,
    shift: f64,
    req: f64,
    beta: f64,
) -> Complex64 {
    LSC.window(t, tau, omega, shift, req, beta).linear(gamma)
}

pub fn linear_ne_cav(
    t: f64,
    tau: f64,
    gamma: f64,
    omega: f64,
    shift: f64,
    req: f64,
    beta: f64,
) -> Complex64 {
    CAV.window(t, tau, omega, shift, req, beta).linear(gamma)
}

pub fn linear_ne_cd(
    t: f64,
    tau: f64,
    gamma: f64,
    omega: f64,
    shift: f64,
    req: f64,
    beta: f64,
) -> Complex64 {
    CD.window(t, tau, omega, shift, req, beta).linear(gamma)
}

pub fn linear_ne_w0(
    t: f64,
    tau: f64,
    gamma: f64,
    omega: f64,
    shift: f64,
    req: f64,
    beta: f64,
) -> Complex64 {
    W0.window(t, tau, omega, shift, req, beta).linear(gamma)
}

pub fn linear_ne_marcus(
    t: f64,
    tau: f64,
    gamma: f64,
    omega: f64,
    shift: f64,
    req: f64,
    beta: f64,
) -> Complex64 {
    MARCUS.window(t, tau, omega, shift, req, beta).linear(gamma)
}
