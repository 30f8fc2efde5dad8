//! Sampled solution of an integration run.

use sf_core::Real;

/// Ordered `(time, state)` samples with strictly increasing time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    pub t: Vec<Real>,
    pub y: Vec<Vec<Real>>,
}

impl Trajectory {
    pub fn with_capacity(samples: usize) -> Self {
        Self {
            t: Vec::with_capacity(samples),
            y: Vec::with_capacity(samples),
        }
    }

    pub(crate) fn push(&mut self, t: Real, y: &[Real]) {
        self.t.push(t);
        self.y.push(y.to_vec());
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Number of state variables (0 for an empty trajectory).
    pub fn dim(&self) -> usize {
        self.y.first().map_or(0, Vec::len)
    }

    pub fn final_state(&self) -> Option<&[Real]> {
        self.y.last().map(Vec::as_slice)
    }

    pub fn final_time(&self) -> Option<Real> {
        self.t.last().copied()
    }

    /// Time series of one state variable.
    pub fn component(&self, index: usize) -> Vec<(Real, Real)> {
        self.t
            .iter()
            .zip(&self.y)
            .filter_map(|(&t, y)| y.get(index).map(|&v| (t, v)))
            .collect()
    }

    /// Index of the last sample whose time is `<= t + slack`.
    pub fn index_at_or_before(&self, t: Real, slack: Real) -> Option<usize> {
        let count = self.t.partition_point(|&ti| ti <= t + slack);
        count.checked_sub(1)
    }
}
