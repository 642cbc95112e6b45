//! Binary serialization (§4.6): a small hand-rolled framing of varints and
//! raw little-endian cell bytes, with an optional zero-suppressed body that
//! the encoder picks whenever it's smaller than the raw one.
//!
//! Every histogram round-trips through the dynamic representation
//! (`Histogram<Vec<AnyAxis>>`), since that's the one shape that can name
//! any axis collection regardless of the caller's original tuple type.

use crate::axis::{Axis, AnyAxis, AxisOptions, Categorical, GrowableInteger, GrowableRegular, Integer, Regular};
use crate::histogram::Histogram;
use crate::storage::{Depth, Storage};
use crate::Error;

const FORMAT_VERSION: u8 = 1;

const AXIS_TAG_REGULAR: u8 = 0;
const AXIS_TAG_INTEGER: u8 = 1;
const AXIS_TAG_CATEGORICAL: u8 = 2;
const AXIS_TAG_GROWABLE_REGULAR: u8 = 3;
const AXIS_TAG_GROWABLE_INTEGER: u8 = 4;

const BODY_RAW: u8 = 0;
const BODY_ZERO_SUPPRESSED: u8 = 1;

fn write_varint(mut n: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (n & 0x7f) as u8;
        n >>= 7;
        if n == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

fn read_varint(bytes: &[u8], pos: &mut usize) -> Result<u64, Error> {
    let mut result = 0u64;
    let mut shift = 0u32;
    loop {
        let byte = *bytes
            .get(*pos)
            .ok_or(Error::Corrupt("truncated varint"))?;
        *pos += 1;
        result |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift >= 64 {
            return Err(Error::Corrupt("varint too long"));
        }
    }
}

fn take(bytes: &[u8], pos: &mut usize, n: usize) -> Result<&[u8], Error> {
    let slice = bytes
        .get(*pos..*pos + n)
        .ok_or(Error::Corrupt("truncated field"))?;
    *pos += n;
    Ok(slice)
}

fn encode_axis(axis: &AnyAxis, out: &mut Vec<u8>) {
    match axis {
        AnyAxis::Regular(a) => {
            out.push(AXIS_TAG_REGULAR);
            write_varint(a.n_bins() as u64, out);
            out.extend_from_slice(&a.low().to_le_bytes());
            out.extend_from_slice(&a.high().to_le_bytes());
            out.push(a.options().bits());
        }
        AnyAxis::Integer(a) => {
            out.push(AXIS_TAG_INTEGER);
            out.extend_from_slice(&a.low().to_le_bytes());
            out.extend_from_slice(&a.high().to_le_bytes());
            out.push(a.options().bits());
        }
        AnyAxis::Categorical(a) => {
            out.push(AXIS_TAG_CATEGORICAL);
            write_varint(a.labels().len() as u64, out);
            for label in a.labels() {
                write_varint(label.len() as u64, out);
                out.extend_from_slice(label.as_bytes());
            }
            out.push(a.has_overflow() as u8);
        }
        AnyAxis::GrowableRegular(a) => {
            out.push(AXIS_TAG_GROWABLE_REGULAR);
            write_varint(a.extent() as u64, out);
            out.extend_from_slice(&a.low().to_le_bytes());
            out.extend_from_slice(&a.high().to_le_bytes());
        }
        AnyAxis::GrowableInteger(a) => {
            out.push(AXIS_TAG_GROWABLE_INTEGER);
            out.extend_from_slice(&a.low().to_le_bytes());
            out.extend_from_slice(&a.high().to_le_bytes());
        }
    }
}

fn decode_axis(bytes: &[u8], pos: &mut usize) -> Result<AnyAxis, Error> {
    let tag = *bytes.get(*pos).ok_or(Error::Corrupt("truncated axis tag"))?;
    *pos += 1;
    Ok(match tag {
        AXIS_TAG_REGULAR => {
            let n_bins = read_varint(bytes, pos)? as u32;
            let lo = f64::from_le_bytes(take(bytes, pos, 8)?.try_into().unwrap());
            let hi = f64::from_le_bytes(take(bytes, pos, 8)?.try_into().unwrap());
            let options = AxisOptions::new(*take(bytes, pos, 1)?.first().unwrap());
            AnyAxis::Regular(Regular::with_options(n_bins, lo, hi, options))
        }
        AXIS_TAG_INTEGER => {
            let lo = i64::from_le_bytes(take(bytes, pos, 8)?.try_into().unwrap());
            let hi = i64::from_le_bytes(take(bytes, pos, 8)?.try_into().unwrap());
            let options = AxisOptions::new(*take(bytes, pos, 1)?.first().unwrap());
            AnyAxis::Integer(Integer::with_options(lo, hi, options))
        }
        AXIS_TAG_CATEGORICAL => {
            let n_labels = read_varint(bytes, pos)?;
            let mut labels = Vec::with_capacity(n_labels as usize);
            for _ in 0..n_labels {
                let len = read_varint(bytes, pos)? as usize;
                let raw = take(bytes, pos, len)?;
                let label = std::str::from_utf8(raw)
                    .map_err(|_| Error::Corrupt("non-utf8 categorical label"))?
                    .to_string();
                labels.push(label);
            }
            let overflow = *take(bytes, pos, 1)?.first().unwrap() != 0;
            AnyAxis::Categorical(Categorical::with_overflow(labels, overflow))
        }
        AXIS_TAG_GROWABLE_REGULAR => {
            let n_bins = read_varint(bytes, pos)? as u32;
            let lo = f64::from_le_bytes(take(bytes, pos, 8)?.try_into().unwrap());
            let hi = f64::from_le_bytes(take(bytes, pos, 8)?.try_into().unwrap());
            AnyAxis::GrowableRegular(GrowableRegular::new(n_bins, lo, hi))
        }
        AXIS_TAG_GROWABLE_INTEGER => {
            let lo = i64::from_le_bytes(take(bytes, pos, 8)?.try_into().unwrap());
            let hi = i64::from_le_bytes(take(bytes, pos, 8)?.try_into().unwrap());
            AnyAxis::GrowableInteger(GrowableInteger::new(lo, hi))
        }
        _ => return Err(Error::Corrupt("unknown axis tag")),
    })
}

fn encode_raw_body(storage: &Storage, out: &mut Vec<u8>) {
    for i in 0..storage.size() {
        storage.encode_cell(i, out);
    }
}

fn encode_zero_suppressed_body(storage: &Storage, out: &mut Vec<u8>) {
    let nonzero_count = (0..storage.size())
        .filter(|&i| !storage.is_cell_zero(i))
        .count();
    write_varint(nonzero_count as u64, out);
    let mut zeros_since_previous = 0u64;
    for i in 0..storage.size() {
        if storage.is_cell_zero(i) {
            zeros_since_previous += 1;
        } else {
            write_varint(zeros_since_previous, out);
            storage.encode_cell(i, out);
            zeros_since_previous = 0;
        }
    }
}

/// Encodes `histogram` into the wire format, picking whichever of the raw or
/// zero-suppressed cell body is smaller (§4.6).
pub fn encode(histogram: &Histogram<Vec<AnyAxis>>) -> Vec<u8> {
    let axes = histogram.axes();
    let mut out = Vec::new();
    out.push(FORMAT_VERSION);
    write_varint(axes.len() as u64, &mut out);
    for axis in axes {
        encode_axis(axis, &mut out);
    }

    let storage = crate::histogram::storage_ref(histogram);
    out.push(storage.depth().tag());
    write_varint(storage.size() as u64, &mut out);

    let mut raw_body = Vec::new();
    encode_raw_body(storage, &mut raw_body);
    let mut suppressed_body = Vec::new();
    encode_zero_suppressed_body(storage, &mut suppressed_body);

    if suppressed_body.len() < raw_body.len() {
        out.push(BODY_ZERO_SUPPRESSED);
        out.extend_from_slice(&suppressed_body);
    } else {
        out.push(BODY_RAW);
        out.extend_from_slice(&raw_body);
    }
    out
}

/// Decodes a histogram previously produced by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<Histogram<Vec<AnyAxis>>, Error> {
    let mut pos = 0usize;
    let version = *bytes.get(pos).ok_or(Error::Corrupt("empty stream"))?;
    pos += 1;
    if version != FORMAT_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    let n_axes = read_varint(bytes, &mut pos)?;
    let mut axes = Vec::with_capacity(n_axes as usize);
    for _ in 0..n_axes {
        axes.push(decode_axis(bytes, &mut pos)?);
    }

    let depth_tag = *bytes.get(pos).ok_or(Error::Corrupt("truncated depth tag"))?;
    pos += 1;
    let depth = Depth::from_tag(depth_tag)?;
    let size = read_varint(bytes, &mut pos)? as usize;

    let body_tag = *bytes.get(pos).ok_or(Error::Corrupt("truncated body tag"))?;
    pos += 1;

    let mut storage = Storage::empty_at_depth(depth, size);
    let width = depth.width();
    match body_tag {
        BODY_RAW => {
            for i in 0..size {
                let cell = take(bytes, &mut pos, width)?;
                storage.set_cell_from_bytes(i, cell)?;
            }
        }
        BODY_ZERO_SUPPRESSED => {
            let nonzero_count = read_varint(bytes, &mut pos)?;
            let mut i = 0usize;
            for _ in 0..nonzero_count {
                let zeros = read_varint(bytes, &mut pos)?;
                i += zeros as usize;
                let cell = take(bytes, &mut pos, width)?;
                storage.set_cell_from_bytes(i, cell)?;
                i += 1;
            }
        }
        _ => return Err(Error::Corrupt("unknown body tag")),
    }

    Ok(build_histogram(axes, storage))
}

fn build_histogram(axes: Vec<AnyAxis>, storage: Storage) -> Histogram<Vec<AnyAxis>> {
    crate::histogram::from_raw_parts(axes, storage)
}
