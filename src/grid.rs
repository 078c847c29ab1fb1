use crate::error::{require_non_negative, require_positive, Result};

/// Uniform time grid. Points are `index · step`, never accumulated sums.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeGrid {
    step: f64,
    len: usize,
}

impl TimeGrid {
    /// [0, duration): floor(duration / step) points.
    pub fn half_open(duration: f64, step: f64) -> Result<Self> {
        require_non_negative("duration", duration)?;
        require_positive("step", step)?;
        Ok(TimeGrid {
            step,
            len: (duration / step).floor() as usize,
        })
    }

    /// [0, duration]: floor(duration / step) + 1 points.
    pub fn closed(duration: f64, step: f64) -> Result<Self> {
        let mut grid = TimeGrid::half_open(duration, step)?;
        grid.len += 1;
        Ok(grid)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn at(&self, index: usize) -> f64 {
        index as f64 * self.step
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.at(i))
    }
}
