use std::fmt;
use std::io;

use crate::body::Field;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a record decode can fail.
///
/// The decoder never recovers internally: the first violation is
/// surfaced to the caller, and the stream must be treated as unusable
/// afterwards, since the number of bytes consumed by a failed decode is
/// unspecified.
#[derive(Debug)]
pub enum Error {
    /// The next stream item is not a definite-length map. Covers wrong
    /// wire types, reserved wire bytes, and indefinite-length maps alike:
    /// the fixed schema needs a known entry count to bound its loop.
    MalformedHeader,
    /// A map key is missing, not text, indefinite-length, or not valid
    /// UTF-8.
    MalformedKey,
    /// A key's reported length meets or exceeds the key staging capacity.
    /// Rejected before a single byte of the key is copied.
    KeyTooLong { len: u64 },
    /// A key decoded cleanly but is not in the recognized set. Unknown
    /// keys are schema violations, not optional extensions.
    UnknownKey { key: String },
    /// A value's wire type disagrees with its field's expected type. No
    /// coercion between types is attempted.
    TypeMismatch { field: Field },
    /// A text value is too long for its destination. Rejected before a
    /// single byte of the value is copied.
    ValueTooLong { field: Field },
    /// The map ended without ever supplying this field.
    MissingField { field: Field },
    /// The underlying read failed, or the stream ended mid-item.
    Stream(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::MalformedHeader => f.write_str("expected a definite-length map"),
            Error::MalformedKey => f.write_str("expected a definite-length text key"),
            Error::KeyTooLong { len } => write!(
                f,
                "key length {} overruns the {}-byte key buffer",
                len,
                crate::MAX_KEY_LEN
            ),
            Error::UnknownKey { ref key } => write!(f, "unrecognized key \"{}\"", key),
            Error::TypeMismatch { field } => {
                write!(f, "wrong wire type for field \"{}\"", field)
            }
            Error::ValueTooLong { field } => {
                write!(f, "text value does not fit field \"{}\"", field)
            }
            Error::MissingField { field } => write!(f, "map never supplied field \"{}\"", field),
            Error::Stream(ref err) => write!(f, "stream read failed: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Stream(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Stream(err)
    }
}
