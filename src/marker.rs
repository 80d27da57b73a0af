/// CBOR major types, the high three bits of an initial byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Major {
    Unsigned,
    Negative,
    Bytes,
    Text,
    Array,
    Map,
    Tag,
    Simple,
}

impl Major {
    /// Extract the major type from an initial byte.
    pub fn from_u8(n: u8) -> Major {
        match n >> 5 {
            0 => Major::Unsigned,
            1 => Major::Negative,
            2 => Major::Bytes,
            3 => Major::Text,
            4 => Major::Array,
            5 => Major::Map,
            6 => Major::Tag,
            _ => Major::Simple,
        }
    }

    /// The high three bits of an initial byte for this major type, with
    /// the additional-info bits cleared.
    pub fn into_u8(self) -> u8 {
        let n: u8 = match self {
            Major::Unsigned => 0,
            Major::Negative => 1,
            Major::Bytes => 2,
            Major::Text => 3,
            Major::Array => 4,
            Major::Map => 5,
            Major::Tag => 6,
            Major::Simple => 7,
        };
        n << 5
    }
}

// Initial bytes for the major-7 items this crate reads and writes.
pub(crate) const INIT_FALSE: u8 = 0xf4;
pub(crate) const INIT_TRUE: u8 = 0xf5;
pub(crate) const INIT_F64: u8 = 0xfb;

/// Classification of the next stream item, judged from its initial byte
/// alone.
///
/// This is what a peek reports before anything is consumed. Initial bytes
/// carrying a reserved additional-info value (28-30, or 31 where an
/// indefinite length is meaningless) classify as [`Reserved`]: they can
/// never satisfy an expected type, so a decoder probing for one fails
/// before any argument bytes are read.
///
/// [`Reserved`]: DataType::Reserved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    Unsigned,
    Negative,
    Bytes,
    Text,
    Array,
    Map,
    Tag,
    Simple,
    Boolean,
    Null,
    Undefined,
    Float,
    Break,
    Reserved,
}

impl DataType {
    /// Classify a single initial byte.
    pub fn from_initial_byte(n: u8) -> DataType {
        match n {
            0x00..=0x1b => DataType::Unsigned,
            0x1c..=0x1f => DataType::Reserved,
            0x20..=0x3b => DataType::Negative,
            0x3c..=0x3f => DataType::Reserved,
            0x40..=0x5b => DataType::Bytes,
            0x5c..=0x5e => DataType::Reserved,
            0x5f => DataType::Bytes,
            0x60..=0x7b => DataType::Text,
            0x7c..=0x7e => DataType::Reserved,
            0x7f => DataType::Text,
            0x80..=0x9b => DataType::Array,
            0x9c..=0x9e => DataType::Reserved,
            0x9f => DataType::Array,
            0xa0..=0xbb => DataType::Map,
            0xbc..=0xbe => DataType::Reserved,
            0xbf => DataType::Map,
            0xc0..=0xdb => DataType::Tag,
            0xdc..=0xdf => DataType::Reserved,
            0xe0..=0xf3 => DataType::Simple,
            INIT_FALSE | INIT_TRUE => DataType::Boolean,
            0xf6 => DataType::Null,
            0xf7 => DataType::Undefined,
            0xf8 => DataType::Simple,
            0xf9..=0xfb => DataType::Float,
            0xfc..=0xfe => DataType::Reserved,
            0xff => DataType::Break,
        }
    }
}

impl From<u8> for DataType {
    fn from(val: u8) -> DataType {
        DataType::from_initial_byte(val)
    }
}
