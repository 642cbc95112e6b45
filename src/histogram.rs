//! The public façade (§5): a dense, multi-dimensional histogram over an
//! axis collection `A`, backed by adaptive [`Storage`].

use std::ops::{DivAssign, MulAssign};

use crate::axes::Axes;
use crate::axis::AnyAxis;
use crate::linearize::linearize;
use crate::storage::Storage;
use crate::Error;

/// A dense histogram over the Cartesian product of `A`'s axes.
///
/// `A` is either a fixed tuple of concrete axis types (rank known at
/// compile time) or `Vec<AnyAxis>` (rank known only at runtime) — see
/// [`Axes`]. Both are filled, read and combined through the same API.
#[derive(Debug, Clone)]
pub struct Histogram<A: Axes> {
    axes: A,
    storage: Storage,
}

impl<A: Axes> Histogram<A> {
    /// Builds an empty histogram over `axes`. Storage starts lazily
    /// unallocated, so an unfilled histogram costs no more than its axes.
    pub fn new(axes: A) -> Self {
        let size: usize = axes.extents().iter().map(|&e| e as usize).product();
        Histogram {
            axes,
            storage: Storage::new(size),
        }
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.axes.rank()
    }

    /// Total number of bins across every axis, i.e. the flat storage length.
    pub fn size(&self) -> usize {
        self.storage.size()
    }

    pub fn axes(&self) -> &A {
        &self.axes
    }

    /// The `k`-th axis, type-erased (§6: `h.axis(k)`). Always returns
    /// `AnyAxis` rather than a concrete type, since `k` is a runtime value
    /// and a static tuple's element types can't be selected by one.
    pub fn axis(&self, k: usize) -> Result<AnyAxis, Error> {
        self.axes.to_any_vec().into_iter().nth(k).ok_or(Error::OutOfRange)
    }

    /// Clears every bin back to zero, keeping the current axis shape.
    pub fn reset(&mut self) {
        let size = self.axes.extents().iter().map(|&e| e as usize).product();
        self.storage.reset(size);
    }

    /// Increments the bin addressed by `coords` by one (§5: `fill`).
    /// A coordinate that lands outside every axis's reserved bins is
    /// silently dropped, per each axis's own out-of-range convention.
    pub fn fill(&mut self, coords: &A::Coords) -> Result<(), Error> {
        if let Some(offset) = linearize(&mut self.axes, &mut self.storage, coords)? {
            self.storage.increase(offset);
        }
        Ok(())
    }

    /// Adds `weight` to the bin addressed by `coords`, promoting storage to
    /// the weighted depth if it isn't already (§5: `fill_weighted`).
    pub fn fill_weighted(&mut self, coords: &A::Coords, weight: f64) -> Result<(), Error> {
        if let Some(offset) = linearize(&mut self.axes, &mut self.storage, coords)? {
            self.storage.increase_weighted(offset, weight);
        }
        Ok(())
    }

    /// Reads the value at `indices`, one per axis (§6: `h.at(i₁, …, i_r)`).
    /// Errs with `ArityMismatch` if `indices` doesn't have exactly one entry
    /// per axis, or `OutOfRange` if any entry is outside its axis's extent
    /// (§7: "`at` with any index outside its axis extent").
    pub fn at(&self, indices: &[usize]) -> Result<f64, Error> {
        Ok(self.storage.value(self.flat_offset(indices)?))
    }

    /// Reads the variance at `indices`, under the Poisson assumption for
    /// unweighted bins (§4.1, §6).
    pub fn variance_at(&self, indices: &[usize]) -> Result<f64, Error> {
        Ok(self.storage.variance(self.flat_offset(indices)?))
    }

    fn flat_offset(&self, indices: &[usize]) -> Result<usize, Error> {
        let extents = self.axes.extents();
        if indices.len() != extents.len() {
            return Err(Error::ArityMismatch);
        }
        let mut offset = 0usize;
        let mut stride = 1usize;
        for (&idx, &extent) in indices.iter().zip(extents.iter()) {
            if idx >= extent as usize {
                return Err(Error::OutOfRange);
            }
            offset += idx * stride;
            stride *= extent as usize;
        }
        Ok(offset)
    }

    /// Reads the value at a flat storage offset directly (row-major,
    /// §4.4), bypassing per-axis bounds checking. Used by `iter` and by
    /// `reduce_to`'s internal bookkeeping, which already compute a
    /// known-valid offset.
    fn at_flat(&self, offset: usize) -> f64 {
        self.storage.value(offset)
    }

    /// Iterates every bin as `(flat_offset, value)`, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.storage.size()).map(move |i| (i, self.at_flat(i)))
    }

    /// Type-erases this histogram's axes into the dynamic representation,
    /// used by `reduce_to` and the serialization framing (§9: both
    /// normalize to `Histogram<Vec<AnyAxis>>`, since a runtime-selected
    /// subset of a compile-time tuple can't be expressed generically).
    pub fn to_dynamic(&self) -> Histogram<Vec<AnyAxis>> {
        Histogram {
            axes: self.axes.to_any_vec(),
            storage: self.storage.clone(),
        }
    }

    /// Adds `other`'s bins into `self`, bin-for-bin (§5: `add_assign`).
    /// Exposed as a fallible inherent method rather than `std::ops::AddAssign`
    /// because a shape mismatch must fail without touching `self`, and
    /// `AddAssign::add_assign` has no way to report that.
    pub fn add_assign(&mut self, other: &Histogram<A>) -> Result<(), Error>
    where
        A: PartialEq,
    {
        if self.axes != other.axes {
            return Err(Error::ShapeMismatch);
        }
        self.storage.add_assign(&other.storage)
    }

    /// Projects this histogram onto a subset of its axes, summing out the
    /// rest (§5: `reduce_to`). `keep` lists the surviving axis indices, in
    /// the order they should appear in the result.
    pub fn reduce_to(&self, keep: &[usize]) -> Result<Histogram<Vec<AnyAxis>>, Error> {
        let axes = self.axes.to_any_vec();
        let old_extents: Vec<usize> = axes.iter().map(|a| crate::axis::Axis::extent(a) as usize).collect();
        for &k in keep {
            if k >= axes.len() {
                return Err(Error::OutOfRange);
            }
        }
        let new_axes: Vec<AnyAxis> = keep.iter().map(|&k| axes[k].clone()).collect();
        let new_extents: Vec<usize> = new_axes
            .iter()
            .map(|a| crate::axis::Axis::extent(a) as usize)
            .collect();
        let new_size: usize = new_extents.iter().product();

        let old_strides = row_major_strides(&old_extents);
        let new_strides = row_major_strides(&new_extents);

        let mut out = Storage::new(new_size);
        for old_flat in 0..self.storage.size() {
            let old_coords = unflatten(old_flat, &old_extents, &old_strides);
            let new_flat: usize = keep
                .iter()
                .enumerate()
                .map(|(new_axis, &old_axis)| old_coords[old_axis] * new_strides[new_axis])
                .sum();
            if self.storage.is_weighted() {
                let (w, w2) = (self.storage.value(old_flat), self.storage.variance(old_flat));
                out.add_weighted_pair(new_flat, w, w2);
            } else {
                let n = self.storage.value(old_flat) as u64;
                out.increase_by(new_flat, n);
            }
        }

        Ok(Histogram {
            axes: new_axes,
            storage: out,
        })
    }
}

/// Crate-internal escape hatch for the serializer, which needs to read and
/// rebuild a dynamic histogram's storage without widening this module's
/// public API.
pub(crate) fn storage_ref(histogram: &Histogram<Vec<AnyAxis>>) -> &Storage {
    &histogram.storage
}

pub(crate) fn from_raw_parts(axes: Vec<AnyAxis>, storage: Storage) -> Histogram<Vec<AnyAxis>> {
    Histogram { axes, storage }
}

fn row_major_strides(extents: &[usize]) -> Vec<usize> {
    let mut strides = Vec::with_capacity(extents.len());
    let mut acc = 1usize;
    for &e in extents {
        strides.push(acc);
        acc *= e;
    }
    strides
}

fn unflatten(mut flat: usize, extents: &[usize], strides: &[usize]) -> Vec<usize> {
    let mut coords = vec![0usize; extents.len()];
    for axis in (0..extents.len()).rev() {
        coords[axis] = flat / strides[axis];
        flat %= strides[axis];
    }
    coords
}

impl<A: Axes> MulAssign<f64> for Histogram<A> {
    /// Scales every bin by `k`. Always forces the weighted depth (§5:
    /// `scale`), since a scaled integer count is generally not an integer.
    fn mul_assign(&mut self, k: f64) {
        self.storage.scale(k);
    }
}

impl<A: Axes> DivAssign<f64> for Histogram<A> {
    fn div_assign(&mut self, k: f64) {
        self.storage.scale(1.0 / k);
    }
}

impl<A: Axes + PartialEq> PartialEq for Histogram<A> {
    /// Value-wise equality (§5): same axes, and the same `(value, variance)`
    /// at every bin, regardless of either side's internal storage depth.
    fn eq(&self, other: &Self) -> bool {
        self.axes == other.axes && self.storage.storage_eq(&other.storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{Integer, Regular};

    #[test]
    fn fill_and_at_round_trip() {
        let mut h = Histogram::new((Regular::new(10, 0.0, 1.0), Integer::new(0, 2)));
        h.fill(&(0.15, 0i64)).unwrap();
        h.fill(&(0.15, 0i64)).unwrap();
        assert_eq!(h.at(&[1, 0]).unwrap(), 2.0);
    }

    #[test]
    fn at_rejects_out_of_range_and_wrong_arity() {
        let h = Histogram::new((Integer::new(0, 4),));
        assert!(matches!(h.at(&[4]), Err(Error::OutOfRange)));
        assert!(matches!(h.at(&[0, 0]), Err(Error::ArityMismatch)));
    }

    #[test]
    fn add_assign_rejects_shape_mismatch() {
        let mut a = Histogram::new((Integer::new(0, 2),));
        let b = Histogram::new((Integer::new(0, 3),));
        let before = a.clone();
        assert!(matches!(a.add_assign(&b), Err(Error::ShapeMismatch)));
        assert_eq!(a, before);
    }

    #[test]
    fn scale_promotes_to_weighted() {
        let mut h = Histogram::new((Integer::new(0, 1),));
        h.fill(&(0i64,)).unwrap();
        h *= 2.0;
        assert_eq!(h.at(&[0]).unwrap(), 2.0);
    }

    #[test]
    fn reduce_to_sums_out_dropped_axes() {
        let mut h = Histogram::new((Integer::new(0, 2), Integer::new(0, 2)));
        h.fill(&(0i64, 0i64)).unwrap();
        h.fill(&(0i64, 1i64)).unwrap();
        h.fill(&(1i64, 0i64)).unwrap();
        let reduced = h.reduce_to(&[0]).unwrap();
        assert_eq!(reduced.size(), 2);
        assert_eq!(reduced.at(&[0]).unwrap(), 2.0);
        assert_eq!(reduced.at(&[1]).unwrap(), 1.0);
    }
}
