use std::fmt;
use std::io::Read;
use std::str;

use log::trace;

use crate::decode::Reader;
use crate::error::{Error, Result};
use crate::name::Name;
use crate::MAX_KEY_LEN;

/// The four fields of a [`Body`] record. The wire keys of the map are
/// exactly these names; anything else is a schema violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Planet,
    Number,
    Gravity,
}

impl Field {
    pub(crate) const ALL: [Field; 4] =
        [Field::Name, Field::Planet, Field::Number, Field::Gravity];

    /// The wire key for this field.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Planet => "planet",
            Field::Number => "number",
            Field::Gravity => "gravity",
        }
    }

    /// Match a decoded key against the recognized set.
    pub fn from_key(key: &str) -> Option<Field> {
        match key {
            "name" => Some(Field::Name),
            "planet" => Some(Field::Planet),
            "number" => Some(Field::Number),
            "gravity" => Some(Field::Gravity),
            _ => None,
        }
    }

    fn mask(self) -> u8 {
        1 << self as u8
    }

    fn first_missing(seen: u8) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| seen & f.mask() == 0)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One decoded record.
///
/// A `Body` only ever exists in two states: the caller-visible default,
/// or fully decoded. [`Body::decode`] returns a value instead of filling
/// a caller-supplied buffer, so a failed decode leaves nothing partially
/// written behind, and nothing leaks from one decode call into the next.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    /// UTF-8 name, at most [`Name::CAPACITY`] bytes.
    pub name: Name,
    /// Whether the body is a planet.
    pub planet: bool,
    /// Position index.
    pub number: i64,
    /// Surface gravity in m/s².
    pub gravity: f64,
}

impl Body {
    /// Decode one complete record map off `reader`.
    ///
    /// The stream must be positioned exactly at the map header. On
    /// success, exactly one map item has been consumed and every field of
    /// the returned record was written from the wire. On failure, the
    /// number of consumed bytes is unspecified and the stream must be
    /// discarded; there is no resynchronization.
    pub fn decode<R: Read>(reader: &mut Reader<R>) -> Result<Body> {
        let header = reader.probe_map()?.ok_or(Error::MalformedHeader)?;
        if header.indefinite {
            // A fixed schema needs a known entry count to bound the loop.
            return Err(Error::MalformedHeader);
        }
        trace!("record map declares {} entries", header.len);

        let mut body = Body::default();
        let mut seen = 0u8;
        for _ in 0..header.len {
            let field = Self::decode_key(reader)?;
            match field {
                Field::Name => {
                    let text = reader.probe_text()?.ok_or(Error::TypeMismatch { field })?;
                    if text.indefinite {
                        return Err(Error::TypeMismatch { field });
                    }
                    if text.len > Name::CAPACITY as u64 {
                        return Err(Error::ValueTooLong { field });
                    }
                    let mut buf = [0u8; Name::CAPACITY];
                    let len = text.len as usize;
                    reader.read_exact(&mut buf[..len])?;
                    let text = str::from_utf8(&buf[..len])
                        .map_err(|_| Error::TypeMismatch { field })?;
                    body.name = Name::new(text).ok_or(Error::ValueTooLong { field })?;
                }
                Field::Planet => {
                    body.planet = reader
                        .probe_boolean()?
                        .ok_or(Error::TypeMismatch { field })?;
                }
                Field::Number => {
                    body.number = reader
                        .probe_signed_int()?
                        .ok_or(Error::TypeMismatch { field })?;
                }
                Field::Gravity => {
                    body.gravity = reader
                        .probe_double()?
                        .ok_or(Error::TypeMismatch { field })?;
                }
            }
            trace!("field {} decoded", field);
            // Duplicates overwrite: the map's last occurrence wins.
            seen |= field.mask();
        }

        match Field::first_missing(seen) {
            Some(field) => Err(Error::MissingField { field }),
            None => Ok(body),
        }
    }

    // Probes one text key, stages it in a bounded stack buffer, and
    // matches it against the recognized key set. The length check comes
    // before the copy; an oversized key is rejected without a single
    // byte of it being read.
    fn decode_key<R: Read>(reader: &mut Reader<R>) -> Result<Field> {
        let key = reader.probe_text()?.ok_or(Error::MalformedKey)?;
        if key.indefinite {
            return Err(Error::MalformedKey);
        }
        if key.len >= MAX_KEY_LEN as u64 {
            return Err(Error::KeyTooLong { len: key.len });
        }
        let mut buf = [0u8; MAX_KEY_LEN];
        let len = key.len as usize;
        reader.read_exact(&mut buf[..len])?;
        let key = str::from_utf8(&buf[..len]).map_err(|_| Error::MalformedKey)?;
        Field::from_key(key).ok_or_else(|| Error::UnknownKey {
            key: key.to_string(),
        })
    }

    /// Decode a record from an in-memory buffer.
    pub fn from_slice(buf: &[u8]) -> Result<Body> {
        Body::decode(&mut Reader::new(buf))
    }
}
