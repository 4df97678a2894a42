//! Encoded polyline codec
//!
//! Implements the Google encoded polyline format at precision 5, which is
//! what OpenRouteService returns for 2D route geometry. Each coordinate is
//! scaled by 1e5, delta-encoded against the previous point, zig-zag encoded
//! and written as little-endian 5-bit groups offset by 63.

use domain::GeoPoint;

use crate::error::RoutingError;

const PRECISION: f64 = 1e5;
const CHUNK_MASK: u64 = 0x1f;
const CONTINUATION: u64 = 0x20;
const ASCII_OFFSET: u8 = 63;

/// Encode a sequence of points as a polyline string
///
/// Coordinates outside the valid latitude/longitude ranges are clamped to
/// them first.
#[must_use]
pub fn encode_polyline(points: &[GeoPoint]) -> String {
    let mut encoded = String::with_capacity(points.len() * 8);
    let (mut prev_lat, mut prev_lng) = (0i64, 0i64);

    for point in points {
        let lat = scale(point.lat(), 90.0);
        let lng = scale(point.lng(), 180.0);

        encode_value(lat - prev_lat, &mut encoded);
        encode_value(lng - prev_lng, &mut encoded);

        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

/// Decode a polyline string into points
///
/// # Errors
///
/// Returns `RoutingError::Decode` if the string contains characters outside
/// the polyline alphabet, ends in the middle of a value, or holds an odd
/// number of values.
#[allow(clippy::cast_precision_loss)]
pub fn decode_polyline(encoded: &str) -> Result<Vec<GeoPoint>, RoutingError> {
    let mut bytes = encoded.bytes().peekable();
    let mut points = Vec::new();
    let (mut lat, mut lng) = (0i64, 0i64);

    while bytes.peek().is_some() {
        lat = accumulate(lat, decode_value(&mut bytes)?)?;
        if bytes.peek().is_none() {
            return Err(RoutingError::Decode(
                "polyline ends after a latitude without a longitude".to_string(),
            ));
        }
        lng = accumulate(lng, decode_value(&mut bytes)?)?;

        points.push(GeoPoint::new_unchecked(
            lat as f64 / PRECISION,
            lng as f64 / PRECISION,
        ));
    }

    Ok(points)
}

/// Degrees to fixed point, within `[-limit, limit]`
#[allow(clippy::cast_possible_truncation)]
fn scale(degrees: f64, limit: f64) -> i64 {
    // NaN saturates to 0
    (degrees.clamp(-limit, limit) * PRECISION).round() as i64
}

fn accumulate(total: i64, delta: i64) -> Result<i64, RoutingError> {
    total
        .checked_add(delta)
        .ok_or_else(|| RoutingError::Decode("polyline coordinate overflows".to_string()))
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn encode_value(value: i64, out: &mut String) {
    let mut zigzag = ((value << 1) ^ (value >> 63)) as u64;

    while zigzag >= CONTINUATION {
        out.push(char::from((CONTINUATION | (zigzag & CHUNK_MASK)) as u8 + ASCII_OFFSET));
        zigzag >>= 5;
    }
    out.push(char::from(zigzag as u8 + ASCII_OFFSET));
}

#[allow(clippy::cast_possible_wrap)]
fn decode_value(bytes: &mut impl Iterator<Item = u8>) -> Result<i64, RoutingError> {
    let mut result = 0u64;
    let mut shift = 0u32;

    loop {
        let byte = bytes
            .next()
            .ok_or_else(|| RoutingError::Decode("polyline ends mid-value".to_string()))?;

        if !(ASCII_OFFSET..=ASCII_OFFSET + 63).contains(&byte) {
            return Err(RoutingError::Decode(format!(
                "invalid polyline character {:?}",
                char::from(byte)
            )));
        }
        if shift > 60 {
            return Err(RoutingError::Decode("polyline value overflows".to_string()));
        }

        let chunk = u64::from(byte - ASCII_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk < CONTINUATION {
            break;
        }
    }

    let magnitude = (result >> 1) as i64;
    Ok(if result & 1 == 1 { !magnitude } else { magnitude })
}
