use core::fmt;

use zerocopy::byteorder::{LittleEndian, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Types 0 through 127 are reserved for and defined by the SMBIOS
/// specification. Types 128 through 255 are available for system- and
/// OEM-specific information.
pub type SmbiosType = u8;

/// A structure's handle: a 16-bit number unique within the table, opaque
/// to this library's callers.
pub type SmbiosHandle = u16;

/// End-of-table indicator. Reference SMBIOS 2.6, chapter 3.3.44.
/// The last physical structure in a table carries this type.
pub const TYPE_END_OF_TABLE: SmbiosType = 127;

/// Byte size of [`Header`] on the wire. A structure's length field counts
/// the header and formatted block together.
pub const HEADER_LENGTH: usize = 4;

/// The fixed header that starts every SMBIOS structure.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct Header {
    /// Structure type code.
    pub record_type: SmbiosType,
    /// Total size of header plus formatted block, excluding strings.
    pub length: u8,
    handle: U16<LittleEndian>,
}

impl Header {
    pub fn new(record_type: SmbiosType, length: u8, handle: SmbiosHandle) -> Self {
        Self { record_type, length, handle: U16::new(handle) }
    }

    /// The structure's handle.
    pub fn handle(&self) -> SmbiosHandle {
        self.handle.get()
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("record_type", &self.record_type)
            .field("length", &self.length)
            .field("handle", &self.handle.get())
            .finish()
    }
}

/// One decoded SMBIOS structure: header, formatted block, and string set.
///
/// The formatted bytes and strings are owned copies; the source buffer may
/// be released as soon as decoding returns. The string vector is 1-based
/// when referenced from formatted fields and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    pub header: Header,
    pub formatted: Vec<u8>,
    pub strings: Vec<String>,
}
