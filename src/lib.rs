//! astro-pack reads a compact, self-describing binary record, a CBOR map
//! of four known fields, directly off a byte stream and into a bounded
//! in-memory value. It exists for one fixed schema, known at compile
//! time, and trades generality for a decoder that can run against a slow
//! network stream with a handful of stack bytes:
//!
//! - Items are interpreted incrementally. Nothing larger than one map key
//!   or one scalar value is ever buffered, so a message never has to be
//!   materialized to be decoded.
//! - Every length the wire reports is checked against its fixed
//!   destination *before* any byte is copied. Oversized keys and values
//!   are rejected, never truncated.
//! - Anything outside the schema is a hard, typed failure: an unknown
//!   key, a wrong wire type, an indefinite-length item, or a map that
//!   ends with a field missing.
//!
//! The decoder works against any [`std::io::Read`] implementor through
//! [`Reader`], so it can be driven by an HTTP response body, a serial
//! port, or an in-memory slice in tests. The matching [`encode`] module
//! writes the same wire shape back out.
//!
//! ```
//! use astro_pack::{Body, Name};
//!
//! let body = Body {
//!     name: Name::new("earth").unwrap(),
//!     planet: true,
//!     number: 3,
//!     gravity: 9.807,
//! };
//!
//! let wire = body.to_vec();
//! assert_eq!(Body::from_slice(&wire).unwrap(), body);
//! ```

mod body;
mod error;
mod marker;
mod name;

pub mod decode;
pub mod encode;

pub use self::body::{Body, Field};
pub use self::decode::{MapHeader, Reader, TextHeader};
pub use self::error::{Error, Result};
pub use self::marker::{DataType, Major};
pub use self::name::Name;

/// Size of the stack buffer that stages map keys during a decode. A key
/// whose reported length meets or exceeds this is rejected before a
/// single byte of it is read; the longest recognized key, `gravity`,
/// is exactly one byte under the bound.
pub const MAX_KEY_LEN: usize = 8;
