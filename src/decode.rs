use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::Result;
use crate::marker::{DataType, INIT_TRUE};

/// Header of a map item: the declared entry count, or indefinite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapHeader {
    /// Declared number of key/value pairs. Zero when `indefinite` is set.
    pub len: u64,
    /// Entry count is not declared up front; the map runs to a break
    /// marker instead.
    pub indefinite: bool,
}

/// Header of a text item: the payload length in bytes, or indefinite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextHeader {
    /// Payload length in UTF-8 bytes. Zero when `indefinite` is set.
    pub len: u64,
    /// Payload is chunked and runs to a break marker instead of carrying
    /// a length up front.
    pub indefinite: bool,
}

/// Streaming reader over a sequence of CBOR items.
///
/// Wraps any byte source and consumes it strictly forward. The only
/// lookahead is a single buffered initial byte, which lets the `probe_*`
/// methods inspect the next item's type and decline to consume it when
/// it is not what the caller expects. Reads block until the underlying
/// source produces bytes; a source that ends mid-item reports
/// [`Error::Stream`](crate::Error::Stream).
#[derive(Debug)]
pub struct Reader<R> {
    inner: R,
    peeked: Option<u8>,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R) -> Reader<R> {
        Reader {
            inner,
            peeked: None,
        }
    }

    /// Consume the reader, returning the underlying byte source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn peek_initial(&mut self) -> Result<u8> {
        if let Some(init) = self.peeked {
            return Ok(init);
        }
        let init = self.inner.read_u8()?;
        self.peeked = Some(init);
        Ok(init)
    }

    fn take_initial(&mut self) -> Result<u8> {
        match self.peeked.take() {
            Some(init) => Ok(init),
            None => Ok(self.inner.read_u8()?),
        }
    }

    /// Classify the next item without consuming anything.
    pub fn peek_type(&mut self) -> Result<DataType> {
        Ok(DataType::from_initial_byte(self.peek_initial()?))
    }

    // Reads the argument encoded by an initial byte's additional info,
    // pulling 1-8 further bytes off the stream as needed. `None` means
    // the item is indefinite-length. Reserved additional-info values
    // classify as `DataType::Reserved` and are screened off by the type
    // check in every probe, so they cannot reach this point.
    fn read_argument(&mut self, ai: u8) -> Result<Option<u64>> {
        match ai {
            0..=23 => Ok(Some(u64::from(ai))),
            24 => Ok(Some(u64::from(self.inner.read_u8()?))),
            25 => Ok(Some(u64::from(self.inner.read_u16::<BigEndian>()?))),
            26 => Ok(Some(u64::from(self.inner.read_u32::<BigEndian>()?))),
            27 => Ok(Some(self.inner.read_u64::<BigEndian>()?)),
            31 => Ok(None),
            _ => unreachable!("reserved additional info never passes the probe type check"),
        }
    }

    /// Probe for a map header. Returns `None` without consuming anything
    /// if the next item is not a map.
    pub fn probe_map(&mut self) -> Result<Option<MapHeader>> {
        if self.peek_type()? != DataType::Map {
            return Ok(None);
        }
        let init = self.take_initial()?;
        Ok(Some(match self.read_argument(init & 0x1f)? {
            Some(len) => MapHeader {
                len,
                indefinite: false,
            },
            None => MapHeader {
                len: 0,
                indefinite: true,
            },
        }))
    }

    /// Probe for a text header. Returns `None` without consuming anything
    /// if the next item is not text. The payload itself is left on the
    /// stream for the caller to pull through [`read_exact`] once it has
    /// checked the length against its destination.
    ///
    /// [`read_exact`]: Reader::read_exact
    pub fn probe_text(&mut self) -> Result<Option<TextHeader>> {
        if self.peek_type()? != DataType::Text {
            return Ok(None);
        }
        let init = self.take_initial()?;
        Ok(Some(match self.read_argument(init & 0x1f)? {
            Some(len) => TextHeader {
                len,
                indefinite: false,
            },
            None => TextHeader {
                len: 0,
                indefinite: true,
            },
        }))
    }

    /// Probe for a boolean item. Returns `None` without consuming
    /// anything if the next item is not a boolean.
    pub fn probe_boolean(&mut self) -> Result<Option<bool>> {
        if self.peek_type()? != DataType::Boolean {
            return Ok(None);
        }
        let init = self.take_initial()?;
        Ok(Some(init == INIT_TRUE))
    }

    /// Probe for an integer item of either sign, widened to `i64`.
    ///
    /// Returns `None` when the next item is not an integer, and also when
    /// the wire value falls outside the signed 64-bit range. In the
    /// latter case the item's bytes have been consumed; callers reject
    /// the stream on `None`, so the cursor position no longer matters.
    pub fn probe_signed_int(&mut self) -> Result<Option<i64>> {
        let negative = match self.peek_type()? {
            DataType::Unsigned => false,
            DataType::Negative => true,
            _ => return Ok(None),
        };
        let init = self.take_initial()?;
        let arg = match self.read_argument(init & 0x1f)? {
            Some(arg) => arg,
            None => return Ok(None),
        };
        if arg > i64::MAX as u64 {
            return Ok(None);
        }
        Ok(Some(if negative {
            // Major type 1 encodes -1 - n.
            -1 - arg as i64
        } else {
            arg as i64
        }))
    }

    /// Probe for a floating-point item, promoted to double precision.
    ///
    /// Half- and single-precision wire values are accepted and widened;
    /// a fixed `f64` field has no reason to reject a producer that
    /// shrank its floats. Returns `None` without consuming anything if
    /// the next item is not a float.
    pub fn probe_double(&mut self) -> Result<Option<f64>> {
        if self.peek_type()? != DataType::Float {
            return Ok(None);
        }
        let init = self.take_initial()?;
        Ok(Some(match init & 0x1f {
            25 => half_to_double(self.inner.read_u16::<BigEndian>()?),
            26 => f64::from(self.inner.read_f32::<BigEndian>()?),
            _ => self.inner.read_f64::<BigEndian>()?,
        }))
    }

    /// Read exactly `buf.len()` payload bytes off the stream.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        // Payload reads follow a consumed header, but drain the lookahead
        // byte if one is pending so the cursor can never skip it.
        let start = match self.peeked.take() {
            Some(init) => {
                buf[0] = init;
                1
            }
            None => 0,
        };
        self.inner.read_exact(&mut buf[start..])?;
        Ok(())
    }
}

// Half-precision expansion, following the RFC 8949 reference algorithm.
fn half_to_double(half: u16) -> f64 {
    let exp = (half >> 10) & 0x1f;
    let mant = f64::from(half & 0x3ff);
    let val = match exp {
        0 => mant * (-24f64).exp2(),
        31 => {
            if mant == 0.0 {
                f64::INFINITY
            } else {
                f64::NAN
            }
        }
        _ => (mant + 1024.0) * f64::from(i32::from(exp) - 25).exp2(),
    };
    if half & 0x8000 != 0 {
        -val
    } else {
        val
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn reader(bytes: &[u8]) -> Reader<&[u8]> {
        Reader::new(bytes)
    }

    #[test]
    fn peek_does_not_consume() {
        let mut r = reader(&[0xf5]);
        assert_eq!(r.peek_type().unwrap(), DataType::Boolean);
        assert_eq!(r.peek_type().unwrap(), DataType::Boolean);
        assert_eq!(r.probe_boolean().unwrap(), Some(true));
    }

    #[test]
    fn failed_probe_leaves_item_on_stream() {
        let mut r = reader(&[0x03]);
        assert_eq!(r.probe_boolean().unwrap(), None);
        assert_eq!(r.probe_double().unwrap(), None);
        assert_eq!(r.probe_signed_int().unwrap(), Some(3));
    }

    #[test]
    fn map_header_widths() {
        assert_eq!(
            reader(&[0xa4]).probe_map().unwrap(),
            Some(MapHeader {
                len: 4,
                indefinite: false
            })
        );
        assert_eq!(reader(&[0xb8, 0x19]).probe_map().unwrap().unwrap().len, 25);
        assert_eq!(
            reader(&[0xb9, 0x01, 0x00]).probe_map().unwrap().unwrap().len,
            256
        );
        assert_eq!(
            reader(&[0xba, 0x00, 0x01, 0x00, 0x00])
                .probe_map()
                .unwrap()
                .unwrap()
                .len,
            65536
        );
        assert_eq!(
            reader(&[0xbb, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00])
                .probe_map()
                .unwrap()
                .unwrap()
                .len,
            1 << 32
        );
    }

    #[test]
    fn indefinite_headers_are_flagged() {
        assert_eq!(
            reader(&[0xbf]).probe_map().unwrap(),
            Some(MapHeader {
                len: 0,
                indefinite: true
            })
        );
        assert_eq!(
            reader(&[0x7f]).probe_text().unwrap(),
            Some(TextHeader {
                len: 0,
                indefinite: true
            })
        );
    }

    #[test]
    fn text_header_and_payload() {
        let mut r = reader(b"\x64name");
        let header = r.probe_text().unwrap().unwrap();
        assert_eq!(header.len, 4);
        assert!(!header.indefinite);
        let mut buf = [0u8; 4];
        r.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"name");
    }

    #[test]
    fn reserved_bytes_match_nothing() {
        let mut r = reader(&[0x1c]);
        assert_eq!(r.peek_type().unwrap(), DataType::Reserved);
        assert_eq!(r.probe_signed_int().unwrap(), None);
        assert_eq!(r.probe_map().unwrap(), None);
    }

    #[test]
    fn booleans() {
        assert_eq!(reader(&[0xf4]).probe_boolean().unwrap(), Some(false));
        assert_eq!(reader(&[0xf5]).probe_boolean().unwrap(), Some(true));
        // Null is not a boolean.
        assert_eq!(reader(&[0xf6]).probe_boolean().unwrap(), None);
    }

    #[test]
    fn signed_ints() {
        assert_eq!(reader(&[0x00]).probe_signed_int().unwrap(), Some(0));
        assert_eq!(reader(&[0x17]).probe_signed_int().unwrap(), Some(23));
        assert_eq!(reader(&[0x18, 0x18]).probe_signed_int().unwrap(), Some(24));
        assert_eq!(
            reader(&[0x19, 0x03, 0xe8]).probe_signed_int().unwrap(),
            Some(1000)
        );
        assert_eq!(reader(&[0x20]).probe_signed_int().unwrap(), Some(-1));
        assert_eq!(reader(&[0x38, 0x63]).probe_signed_int().unwrap(), Some(-100));
        assert_eq!(
            reader(&[0x39, 0x03, 0xe7]).probe_signed_int().unwrap(),
            Some(-1000)
        );
    }

    #[test]
    fn signed_int_range_limits() {
        let max = [0x1b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(
            reader(&max).probe_signed_int().unwrap(),
            Some(i64::MAX)
        );
        let min = [0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(
            reader(&min).probe_signed_int().unwrap(),
            Some(i64::MIN)
        );
        // One past either end of the representable range.
        let over = [0x1b, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(reader(&over).probe_signed_int().unwrap(), None);
        let under = [0x3b, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(reader(&under).probe_signed_int().unwrap(), None);
    }

    #[test]
    fn half_floats_promote() {
        assert_eq!(reader(&[0xf9, 0x3c, 0x00]).probe_double().unwrap(), Some(1.0));
        assert_eq!(reader(&[0xf9, 0x3e, 0x00]).probe_double().unwrap(), Some(1.5));
        assert_eq!(reader(&[0xf9, 0x80, 0x00]).probe_double().unwrap(), Some(-0.0));
        assert_eq!(
            reader(&[0xf9, 0x00, 0x01]).probe_double().unwrap(),
            Some(5.960464477539063e-8)
        );
        assert_eq!(
            reader(&[0xf9, 0x7c, 0x00]).probe_double().unwrap(),
            Some(f64::INFINITY)
        );
        assert_eq!(
            reader(&[0xf9, 0xfc, 0x00]).probe_double().unwrap(),
            Some(f64::NEG_INFINITY)
        );
        assert!(reader(&[0xf9, 0x7e, 0x00])
            .probe_double()
            .unwrap()
            .unwrap()
            .is_nan());
    }

    #[test]
    fn single_floats_promote() {
        let mut bytes = vec![0xfa];
        bytes.extend_from_slice(&1.5f32.to_be_bytes());
        assert_eq!(reader(&bytes).probe_double().unwrap(), Some(1.5));
    }

    #[test]
    fn double_floats() {
        let mut bytes = vec![0xfb];
        bytes.extend_from_slice(&9.807f64.to_be_bytes());
        assert_eq!(reader(&bytes).probe_double().unwrap(), Some(9.807));
    }

    #[test]
    fn premature_end_is_a_stream_error() {
        assert!(matches!(
            reader(&[]).probe_map(),
            Err(Error::Stream(_))
        ));
        // Initial byte promises a length argument that never arrives.
        assert!(matches!(
            reader(&[0xb8]).probe_map(),
            Err(Error::Stream(_))
        ));
        let mut r = reader(b"\x65ear");
        r.probe_text().unwrap().unwrap();
        let mut buf = [0u8; 5];
        assert!(matches!(r.read_exact(&mut buf), Err(Error::Stream(_))));
    }

    #[test]
    fn read_exact_drains_pending_peek() {
        let mut r = reader(&[0x01, 0x02]);
        r.peek_type().unwrap();
        let mut buf = [0u8; 2];
        r.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x02]);
    }
}
