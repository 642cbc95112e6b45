//! Value cell types: the per-bin payload held by [`crate::storage::Storage`].
//!
//! A bin is logically either a non-negative integer count or a weighted
//! accumulator pair `(sum_w, sum_w²)`. [`WeightedCell`] is the latter; the
//! former is simply an unsigned integer of one of the adaptive widths and
//! needs no wrapper type.
//!
//! The capability trait below names the external contract of §6 ("Callback
//! interfaces (consumed from collaborators)"): a user-defined accumulator
//! cell type can implement [`WeightedAdd`] to absorb a floating-point
//! weight, as [`WeightedCell`] itself does. The storage shipped by this
//! crate only ever holds the two built-in kinds (adaptive integer counts
//! and [`WeightedCell`]); arbitrary accumulator-library integration (an
//! accumulator cell that is merely callable, or that absorbs a raw sample
//! rather than a weight) is a named, out-of-scope extension point, not
//! something the core storage can host directly.

/// A cell that can absorb a floating-point weight.
pub trait WeightedAdd {
    fn add_weight(&mut self, weight: f64);
}

/// A weighted accumulator cell: `sum_w` is the running weight sum, `sum_w2`
/// the running sum of squared weights (used for the variance of a weighted
/// fill).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeightedCell {
    pub sum_w: f64,
    pub sum_w2: f64,
}

impl WeightedCell {
    /// A weighted cell equivalent to `count` unweighted (unit-weight) fills.
    /// Used when promoting an integer cell to the weighted depth: the prior
    /// fills are assumed to have had weight 1, so `sum_w2 == sum_w == count`
    /// preserves the Poisson variance identity.
    pub fn from_count(count: u64) -> Self {
        let count = count as f64;
        Self {
            sum_w: count,
            sum_w2: count,
        }
    }
}

impl WeightedAdd for WeightedCell {
    fn add_weight(&mut self, weight: f64) {
        self.sum_w += weight;
        self.sum_w2 += weight * weight;
    }
}
