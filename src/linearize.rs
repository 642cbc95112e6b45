//! Folds per-axis `(index, shift)` pairs into a flat storage offset (§4.4),
//! and drives the storage rebuild when a growable axis extends its range.

use crate::axes::Axes;
use crate::storage::Storage;
use crate::Error;

fn strides(extents: &[u32]) -> Vec<usize> {
    let mut strides = Vec::with_capacity(extents.len());
    let mut acc = 1usize;
    for &e in extents {
        strides.push(acc);
        acc *= e as usize;
    }
    strides
}

fn flat_size(extents: &[u32]) -> usize {
    extents.iter().map(|&e| e as usize).product()
}

/// Computes the flat offset for `indices` under `strides`, returning `None`
/// if any per-axis index is invalid (§4.4: "a fill whose coordinate lands
/// outside every reserved bin on any axis is silently dropped").
fn offset_of(indices: &[i32], strides: &[usize]) -> Option<usize> {
    let mut offset = 0usize;
    for (&idx, &stride) in indices.iter().zip(strides.iter()) {
        if idx < 0 {
            return None;
        }
        offset += idx as usize * stride;
    }
    Some(offset)
}

/// Advances `axes` and `storage` by one fill at `coords`, returning the flat
/// offset the caller should increment, or `None` if the fill fell outside
/// every axis's reserved bins and should be dropped.
///
/// When any axis reports a nonzero shift, `storage` is rebuilt in place
/// (§4.3) before the offset is computed, so the returned offset always
/// indexes into the *post-growth* shape.
pub(crate) fn linearize<A: Axes>(
    axes: &mut A,
    storage: &mut Storage,
    coords: &A::Coords,
) -> Result<Option<usize>, Error> {
    axes.check_coords(coords)?;
    let extents_old = axes.extents();
    let updates = axes.update_all(coords);
    let extents_new = axes.extents();

    if extents_new != extents_old {
        let strides_old = strides(&extents_old);
        let strides_new = strides(&extents_new);
        let shifts: Vec<i32> = updates.iter().map(|&(_, s)| s).collect();
        let new_size = flat_size(&extents_new);
        *storage = storage.rebuild(new_size, |old_flat| {
            translate(old_flat, &strides_old, &strides_new, &shifts)
        });
    }

    let strides_new = strides(&extents_new);
    let indices: Vec<i32> = updates.iter().map(|&(i, _)| i).collect();
    Ok(offset_of(&indices, &strides_new))
}

/// Translates a flat offset in the old shape to its position in the new
/// shape, per §4.3: `new_idx_k = old_idx_k + max(-shift_k, 0)` on every
/// axis, then re-linearized with the new strides.
fn translate(old_flat: usize, strides_old: &[usize], strides_new: &[usize], shifts: &[i32]) -> usize {
    let rank = strides_old.len();
    let mut remainder = old_flat;
    let mut new_flat = 0usize;
    for axis in (0..rank).rev() {
        let old_idx = remainder / strides_old[axis];
        remainder %= strides_old[axis];
        let shift = shifts[axis];
        let new_idx = old_idx as i64 + (-shift).max(0) as i64;
        new_flat += new_idx as usize * strides_new[axis];
    }
    new_flat
}
