use ndarray::Array1;

use crate::error::{require_positive, Error, Result};

/// Harmonic bath as parallel, index-aligned mode vectors.
#[derive(Clone, Debug, PartialEq)]
pub struct BathModes {
    omega: Array1<f64>,
    req: Array1<f64>,
    shift: Array1<f64>,
    gamma: Array1<f64>,
}

/// One mode's parameters, borrowed out of [`BathModes`] by the kernel loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BathMode {
    pub omega: f64,
    pub req: f64,
    pub shift: f64,
    pub gamma: f64,
}

impl BathModes {
    pub fn new(
        omega: Array1<f64>,
        req: Array1<f64>,
        shift: Array1<f64>,
        gamma: Array1<f64>,
    ) -> Result<Self> {
        let n = omega.len();
        if n == 0 {
            return Err(Error::invalid("omega", "bath needs at least one mode"));
        }
        for (name, len) in [("req", req.len()), ("shift", shift.len()), ("gamma", gamma.len())] {
            if len != n {
                return Err(Error::invalid(name, format!("has {len} entries, omega has {n}")));
            }
        }
        for w in omega.iter() {
            require_positive("omega", *w)?;
        }
        Ok(BathModes { omega, req, shift, gamma })
    }

    /// Ohmic bath, J(ω) ∝ ω exp(−ω/ω_c), split into `n_modes` modes of equal
    /// reorganization energy `reorganization / n_modes`.
    ///
    /// ω_j = −ω_c ln((j − ½)/N) for j = 1..N. Each mode starts displaced by
    /// `shift_ratio · req_j` and couples linearly with strength `gamma`.
    pub fn ohmic(
        n_modes: usize,
        omega_c: f64,
        reorganization: f64,
        shift_ratio: f64,
        gamma: f64,
    ) -> Result<Self> {
        if n_modes == 0 {
            return Err(Error::invalid("n_modes", "must be at least 1"));
        }
        require_positive("omega_c", omega_c)?;
        require_positive("reorganization", reorganization)?;

        let n = n_modes as f64;
        let omega = Array1::from_iter(
            (1..=n_modes).map(|j| -omega_c * ((j as f64 - 0.5) / n).ln()),
        );
        let per_mode = (2.0 * reorganization / n).sqrt();
        let req = omega.mapv(|w| per_mode / w);
        let shift = req.mapv(|r| shift_ratio * r);
        let gamma = Array1::from_elem(n_modes, gamma);

        BathModes::new(omega, req, shift, gamma)
    }

    pub fn len(&self) -> usize {
        self.omega.len()
    }

    pub fn is_empty(&self) -> bool {
        self.omega.is_empty()
    }

    pub fn mode(&self, index: usize) -> BathMode {
        BathMode {
            omega: self.omega[index],
            req: self.req[index],
            shift: self.shift[index],
            gamma: self.gamma[index],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = BathMode> + '_ {
        (0..self.len()).map(move |i| self.mode(i))
    }

    /// Total reorganization energy Σ ω² req² / 2.
    pub fn reorganization(&self) -> f64 {
        self.iter()
            .map(|m| 0.5 * m.omega * m.omega * m.req * m.req)
            .sum()
    }

    pub fn omega(&self) -> &Array1<f64> {
        &self.omega
    }

    pub fn req(&self) -> &Array1<f64> {
        &self.req
    }

    pub fn shift(&self) -> &Array1<f64> {
        &self.shift
    }

    pub fn gamma(&self) -> &Array1<f64> {
        &self.gamma
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = BathModes::new(array![1.0, 2.0], array![0.1], array![0.0, 0.0], array![0.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "req", .. }));
    }

    #[test]
    fn empty_bath_is_rejected() {
        let empty = Array1::<f64>::zeros(0);
        assert!(BathModes::new(empty.clone(), empty.clone(), empty.clone(), empty).is_err());
    }

    #[test]
    fn non_positive_frequency_is_rejected() {
        let err = BathModes::new(array![0.0], array![1.0], array![0.0], array![0.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "omega", .. }));
    }

    #[test]
    fn ohmic_bath_recovers_total_reorganization() {
        let bath = BathModes::ohmic(50, 0.2, 0.75, 0.0, 0.0).unwrap();
        assert_eq!(bath.len(), 50);
        assert!((bath.reorganization() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn ohmic_frequencies_are_decreasing_and_positive() {
        let bath = BathModes::ohmic(20, 1.0, 1.0, 1.0, 0.1).unwrap();
        assert!(!bath.is_empty());
        assert!(bath.gamma().iter().all(|g| *g == 0.1));
        let w = bath.omega();
        assert!(w.iter().all(|x| *x > 0.0));
        assert!(w.to_vec().windows(2).all(|p| p[0] > p[1]));
        assert!((bath.shift() - bath.req()).iter().all(|d| d.abs() < 1e-15));
    }
}
