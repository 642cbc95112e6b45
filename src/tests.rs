//! End-to-end scenarios exercising the public façade across modules,
//! plus property tests over the fill/promote/serialize pipeline.

use itertools::Itertools;
use quickcheck_macros::quickcheck;

use crate::axis::{AnyAxis, AnyValue, Integer, IntoAnyAxis, Regular};
use crate::serialize;
use crate::{Error, Histogram};

#[test]
fn promotion_chain_reaches_weighted_depth() {
    let mut h = Histogram::new((Integer::new(0, 1),));
    for _ in 0..70_000 {
        h.fill(&(0i64,)).unwrap();
    }
    assert_eq!(h.at(&[0]).unwrap(), 70_000.0);
    h.fill_weighted(&(0i64,), 0.25).unwrap();
    assert_eq!(h.at(&[0]).unwrap(), 70_000.25);
    assert_eq!(h.variance_at(&[0]).unwrap(), 70_000.0625);
}

#[test]
fn two_dimensional_reduce_matches_marginal_counts() {
    let mut h = Histogram::new((Integer::new(0, 3), Integer::new(0, 2)));
    for x in 0..3i64 {
        for y in 0..2i64 {
            for _ in 0..(x + 1) {
                h.fill(&(x, y)).unwrap();
            }
        }
    }
    let by_x = h.reduce_to(&[0]).unwrap();
    assert_eq!(by_x.size(), 3);
    assert_eq!(by_x.at(&[0]).unwrap(), 2.0); // x=0: 1 per y, 2 ys
    assert_eq!(by_x.at(&[1]).unwrap(), 4.0); // x=1: 2 per y
    assert_eq!(by_x.at(&[2]).unwrap(), 6.0); // x=2: 3 per y

    let by_y = h.reduce_to(&[1]).unwrap();
    assert_eq!(by_y.size(), 2);
    assert_eq!(by_y.at(&[0]).unwrap(), 6.0); // sum over x of (x+1) = 1+2+3
    assert_eq!(by_y.at(&[1]).unwrap(), 6.0);

    let values = h.iter().map(|(_, v)| v).collect_vec();
    assert_eq!(values.iter().sum::<f64>(), 12.0);
}

#[test]
fn addition_rejects_mismatched_shapes_without_mutating_receiver() {
    let mut a = Histogram::new((Integer::new(0, 4),));
    a.fill(&(1i64,)).unwrap();
    let snapshot = a.clone();

    let mut b = Histogram::new((Integer::new(0, 5),));
    b.fill(&(1i64,)).unwrap();

    assert_eq!(a.add_assign(&b), Err(Error::ShapeMismatch));
    assert_eq!(a, snapshot);
}

#[test]
fn mostly_empty_histogram_round_trips_through_zero_suppressed_body() {
    let axes: Vec<AnyAxis> = vec![Integer::new(0, 10_000).into_any()];
    let mut h = Histogram::new(axes);
    h.fill(&vec![AnyValue::I64(42)]).unwrap();

    let encoded = serialize::encode(&h);
    // a single nonzero cell among ten thousand must be far smaller than
    // the raw 10_000-byte body.
    assert!(encoded.len() < 200);

    let decoded = serialize::decode(&encoded).unwrap();
    assert_eq!(h, decoded);
}

#[quickcheck]
fn fill_then_at_reports_exactly_one_count(n_bins: u8, target: u8) -> bool {
    let n_bins = (n_bins as u32 % 20) + 1;
    let target = (target as i64) % n_bins as i64;
    let mut h = Histogram::new((Integer::new(0, n_bins as i64),));
    h.fill(&(target,)).unwrap();
    h.at(&[target as usize]).unwrap() == 1.0
}

#[quickcheck]
fn addition_is_commutative(counts_a: Vec<u8>, counts_b: Vec<u8>) -> bool {
    let n = counts_a.len().max(counts_b.len()).max(1).min(16);
    let mut a = Histogram::new((Integer::new(0, n as i64),));
    let mut b = Histogram::new((Integer::new(0, n as i64),));
    for (i, &c) in counts_a.iter().take(n).enumerate() {
        for _ in 0..c {
            a.fill(&(i as i64,)).unwrap();
        }
    }
    for (i, &c) in counts_b.iter().take(n).enumerate() {
        for _ in 0..c {
            b.fill(&(i as i64,)).unwrap();
        }
    }
    let mut left = a.clone();
    left.add_assign(&b).unwrap();
    let mut right = b.clone();
    right.add_assign(&a).unwrap();
    left == right
}

#[quickcheck]
fn reduce_to_preserves_total_count(fills: Vec<(u8, u8)>) -> bool {
    let mut h = Histogram::new((Integer::new(0, 4), Integer::new(0, 4)));
    for (x, y) in &fills {
        h.fill(&((*x % 4) as i64, (*y % 4) as i64)).unwrap();
    }
    let total: f64 = h.iter().map(|(_, v)| v).sum();
    let reduced = h.reduce_to(&[0]).unwrap();
    let reduced_total: f64 = reduced.iter().map(|(_, v)| v).sum();
    total == reduced_total
}

#[quickcheck]
fn serialization_round_trips_any_fill_pattern(fills: Vec<u8>) -> bool {
    let axes: Vec<AnyAxis> = vec![Integer::new(0, 16).into_any()];
    let mut h = Histogram::new(axes);
    for f in &fills {
        h.fill(&vec![AnyValue::I64((*f % 16) as i64)]).unwrap();
    }
    let encoded = serialize::encode(&h);
    serialize::decode(&encoded).map(|d| d == h).unwrap_or(false)
}

#[quickcheck]
fn growth_never_loses_a_previously_recorded_count(first: i32, second: i32) -> bool {
    use crate::axis::GrowableInteger;
    let first = (first % 1000) as i64;
    let second = (second % 1000) as i64;
    let mut h = Histogram::new((GrowableInteger::new(0, 1),));
    h.fill(&(first,)).unwrap();
    let total_before: f64 = h.iter().map(|(_, v)| v).sum();
    h.fill(&(second,)).unwrap();
    let total_after: f64 = h.iter().map(|(_, v)| v).sum();
    total_after == total_before + 1.0
}

#[test]
fn regular_axis_reports_correct_extent_with_both_guards() {
    let axis = Regular::with_options(4, 0.0, 1.0, crate::axis::AxisOptions::underflow_overflow());
    assert_eq!(crate::axis::Axis::extent(&axis), 6);
}
