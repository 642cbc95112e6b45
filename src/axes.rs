//! Axis collections (§4.2): either a compile-time fixed tuple of concrete
//! axis types, or a runtime `Vec` of the tagged [`AnyAxis`] variant. Both
//! expose the same traversal contract so the linearizer, histogram façade
//! and `reduce_to` don't need to know which shape they're holding.

use crate::axis::{Axis, AxisOptions, AnyAxis, IntoAnyAxis};
use crate::Error;

/// The traversal contract shared by static tuples and the dynamic `Vec`.
pub trait Axes {
    /// The coordinate tuple a single `fill` call accepts. For a static
    /// tuple `(A0, A1, …)` this is `(A0::Value, A1::Value, …)`; for the
    /// dynamic collection it is `Vec<AnyValue>`.
    type Coords;

    fn rank(&self) -> usize;
    fn extents(&self) -> Vec<u32>;
    fn options(&self) -> Vec<AxisOptions>;

    /// Dispatches each coordinate to its axis in order, returning the
    /// `(index, shift)` pairs from §4.2's `update`.
    fn update_all(&mut self, coords: &Self::Coords) -> Vec<(i32, i32)>;

    /// Validates that `coords` names exactly `rank()` values. Static tuples
    /// enforce this at compile time via `Self::Coords`'s shape and always
    /// succeed here; the dynamic collection checks the `Vec`'s length.
    fn check_coords(&self, coords: &Self::Coords) -> Result<(), Error>;

    /// Type-erases every axis into [`AnyAxis`], for `reduce_to` and the
    /// serialization framing, both of which need a single concrete axis
    /// collection type regardless of the caller's original tuple shape.
    fn to_any_vec(&self) -> Vec<AnyAxis>;
}

macro_rules! impl_axes_tuple {
    ($n:expr; $($A:ident : $i:tt),+) => {
        impl<$($A: Axis + Clone + IntoAnyAxis),+> Axes for ($($A,)+) {
            type Coords = ($($A::Value,)+);

            fn rank(&self) -> usize {
                $n
            }

            fn extents(&self) -> Vec<u32> {
                vec![$(self.$i.extent()),+]
            }

            fn options(&self) -> Vec<AxisOptions> {
                vec![$(self.$i.options()),+]
            }

            fn update_all(&mut self, coords: &Self::Coords) -> Vec<(i32, i32)> {
                vec![$(self.$i.update(&coords.$i)),+]
            }

            fn check_coords(&self, _coords: &Self::Coords) -> Result<(), Error> {
                Ok(())
            }

            fn to_any_vec(&self) -> Vec<AnyAxis> {
                vec![$(self.$i.clone().into_any()),+]
            }
        }
    };
}

impl_axes_tuple!(1; A0:0);
impl_axes_tuple!(2; A0:0, A1:1);
impl_axes_tuple!(3; A0:0, A1:1, A2:2);
impl_axes_tuple!(4; A0:0, A1:1, A2:2, A3:3);
impl_axes_tuple!(5; A0:0, A1:1, A2:2, A3:3, A4:4);
impl_axes_tuple!(6; A0:0, A1:1, A2:2, A3:3, A4:4, A5:5);

impl Axes for Vec<AnyAxis> {
    type Coords = Vec<crate::axis::AnyValue>;

    fn rank(&self) -> usize {
        self.len()
    }

    fn extents(&self) -> Vec<u32> {
        self.iter().map(Axis::extent).collect()
    }

    fn options(&self) -> Vec<AxisOptions> {
        self.iter().map(Axis::options).collect()
    }

    fn update_all(&mut self, coords: &Self::Coords) -> Vec<(i32, i32)> {
        self.iter_mut()
            .zip(coords.iter())
            .map(|(axis, v)| axis.update(v))
            .collect()
    }

    fn check_coords(&self, coords: &Self::Coords) -> Result<(), Error> {
        if coords.len() == self.len() {
            Ok(())
        } else {
            Err(Error::ArityMismatch)
        }
    }

    fn to_any_vec(&self) -> Vec<AnyAxis> {
        self.clone()
    }
}
