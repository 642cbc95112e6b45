//! Type-erased runtime axis set (§4.2, design note in §9: "represent the
//! variant as a sum type with explicit arms and dispatch via exhaustive
//! pattern matching rather than virtual tables — this preserves equality
//! and serialization as ordinary data").

use super::{Axis, AxisOptions, Categorical, GrowableInteger, GrowableRegular, Integer, Regular};

/// Any one of the axis kinds this crate ships, carried by value so a
/// dynamic axis collection (`Vec<AnyAxis>`) can hold a heterogeneous
/// sequence of them (§4.2: "Dynamic: an ordered sequence of a
/// tagged-variant axis").
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnyAxis {
    Regular(Regular),
    Integer(Integer),
    Categorical(Categorical),
    GrowableRegular(GrowableRegular),
    GrowableInteger(GrowableInteger),
}

/// The value type accepted by [`AnyAxis::update`]: whichever of the
/// concrete axes' value types is relevant is wrapped here so a dynamic
/// collection can accept a single, uniform coordinate type per axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnyValue {
    F64(f64),
    I64(i64),
    Str(String),
}

impl From<f64> for AnyValue {
    fn from(v: f64) -> Self {
        AnyValue::F64(v)
    }
}

impl From<i64> for AnyValue {
    fn from(v: i64) -> Self {
        AnyValue::I64(v)
    }
}

impl From<String> for AnyValue {
    fn from(v: String) -> Self {
        AnyValue::Str(v)
    }
}

impl From<&str> for AnyValue {
    fn from(v: &str) -> Self {
        AnyValue::Str(v.to_string())
    }
}

impl Axis for AnyAxis {
    type Value = AnyValue;

    fn extent(&self) -> u32 {
        match self {
            AnyAxis::Regular(a) => a.extent(),
            AnyAxis::Integer(a) => a.extent(),
            AnyAxis::Categorical(a) => a.extent(),
            AnyAxis::GrowableRegular(a) => a.extent(),
            AnyAxis::GrowableInteger(a) => a.extent(),
        }
    }

    fn options(&self) -> AxisOptions {
        match self {
            AnyAxis::Regular(a) => a.options(),
            AnyAxis::Integer(a) => a.options(),
            AnyAxis::Categorical(a) => a.options(),
            AnyAxis::GrowableRegular(a) => a.options(),
            AnyAxis::GrowableInteger(a) => a.options(),
        }
    }

    /// A value of the wrong kind for this axis (e.g. a string against a
    /// regular axis) is treated the same as any other out-of-range value:
    /// an invalid index that causes the linearizer to drop the fill.
    fn update(&mut self, value: &AnyValue) -> (i32, i32) {
        match (self, value) {
            (AnyAxis::Regular(a), AnyValue::F64(v)) => a.update(v),
            (AnyAxis::Integer(a), AnyValue::I64(v)) => a.update(v),
            (AnyAxis::Categorical(a), AnyValue::Str(v)) => a.update(v),
            (AnyAxis::GrowableRegular(a), AnyValue::F64(v)) => a.update(v),
            (AnyAxis::GrowableInteger(a), AnyValue::I64(v)) => a.update(v),
            _ => (-1, 0),
        }
    }
}
