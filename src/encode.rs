use crate::body::{Body, Field};
use crate::marker::{Major, INIT_F64, INIT_FALSE, INIT_TRUE};

// Writes a shortest-form head: `major` plus the `value` argument in the
// fewest bytes the encoding allows.
pub(crate) fn write_head(buf: &mut Vec<u8>, major: Major, value: u64) {
    let high = major.into_u8();
    if value < 24 {
        buf.push(high | value as u8);
    } else if value <= u8::MAX as u64 {
        buf.push(high | 24);
        buf.push(value as u8);
    } else if value <= u16::MAX as u64 {
        buf.push(high | 25);
        buf.extend_from_slice(&(value as u16).to_be_bytes());
    } else if value <= u32::MAX as u64 {
        buf.push(high | 26);
        buf.extend_from_slice(&(value as u32).to_be_bytes());
    } else {
        buf.push(high | 27);
        buf.extend_from_slice(&value.to_be_bytes());
    }
}

/// Write a map header declaring `len` key/value pairs.
pub fn write_map_header(buf: &mut Vec<u8>, len: u64) {
    write_head(buf, Major::Map, len);
}

/// Write a definite-length text item.
pub fn write_text(buf: &mut Vec<u8>, text: &str) {
    write_head(buf, Major::Text, text.len() as u64);
    buf.extend_from_slice(text.as_bytes());
}

/// Write a boolean item.
pub fn write_boolean(buf: &mut Vec<u8>, value: bool) {
    buf.push(if value { INIT_TRUE } else { INIT_FALSE });
}

/// Write an integer item, choosing the major type by sign.
pub fn write_signed_int(buf: &mut Vec<u8>, value: i64) {
    if value < 0 {
        // Major type 1 carries -1 - value, which is !value in two's
        // complement.
        write_head(buf, Major::Negative, !value as u64);
    } else {
        write_head(buf, Major::Unsigned, value as u64);
    }
}

/// Write a floating-point item. Always the full 8-byte form; this writer
/// never shrinks floats.
pub fn write_double(buf: &mut Vec<u8>, value: f64) {
    buf.push(INIT_F64);
    buf.extend_from_slice(&value.to_be_bytes());
}

impl Body {
    /// Encode this record as one definite-length map, fields in
    /// declaration order.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);
        write_map_header(&mut buf, Field::ALL.len() as u64);
        write_text(&mut buf, Field::Name.key());
        write_text(&mut buf, &self.name);
        write_text(&mut buf, Field::Planet.key());
        write_boolean(&mut buf, self.planet);
        write_text(&mut buf, Field::Number.key());
        write_signed_int(&mut buf, self.number);
        write_text(&mut buf, Field::Gravity.key());
        write_double(&mut buf, self.gravity);
        buf
    }
}
