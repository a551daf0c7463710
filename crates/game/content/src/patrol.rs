//! `FixedPos=` patrol strings.
//!
//! Each waypoint is eight hex digits: x then y, each a little-endian `u16`.
//! `"0A000B00"` is the single waypoint (10, 11).

use actor_core::Position;

const DIGITS_PER_WAYPOINT: usize = 8;

/// Decodes a patrol string. Malformed input means no patrol.
pub fn decode_fixed_pos(text: &str) -> Option<Vec<Position>> {
    let text = text.trim();
    if text.is_empty() || text.len() % DIGITS_PER_WAYPOINT != 0 {
        tracing::warn!("malformed patrol string {:?}, ignoring", text);
        return None;
    }
    if !text.bytes().all(|digit| digit.is_ascii_hexdigit()) {
        tracing::warn!("non-hex patrol string {:?}, ignoring", text);
        return None;
    }

    let mut waypoints = Vec::with_capacity(text.len() / DIGITS_PER_WAYPOINT);
    for chunk in text.as_bytes().chunks(DIGITS_PER_WAYPOINT) {
        let (Some(x), Some(y)) = (read_u16_le(&chunk[..4]), read_u16_le(&chunk[4..])) else {
            return None;
        };
        waypoints.push(Position::new(i32::from(x), i32::from(y)));
    }
    Some(waypoints)
}

/// Inverse of [`decode_fixed_pos`]. Coordinates outside `u16` are clamped.
pub fn encode_fixed_pos(waypoints: &[Position]) -> String {
    let mut text = String::with_capacity(waypoints.len() * DIGITS_PER_WAYPOINT);
    for waypoint in waypoints {
        for value in [waypoint.x, waypoint.y] {
            let [low, high] = (value.clamp(0, i32::from(u16::MAX)) as u16).to_le_bytes();
            text.push_str(&format!("{low:02X}{high:02X}"));
        }
    }
    text
}

fn read_u16_le(digits: &[u8]) -> Option<u16> {
    let low = read_byte(&digits[..2])?;
    let high = read_byte(&digits[2..])?;
    Some(u16::from_le_bytes([low, high]))
}

fn read_byte(digits: &[u8]) -> Option<u8> {
    let text = std::str::from_utf8(digits).ok()?;
    u8::from_str_radix(text, 16).ok()
}
