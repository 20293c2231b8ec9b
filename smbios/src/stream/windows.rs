//! Windows SMBIOS access through the `GetSystemFirmwareTable` service.
//!
//! Windows hands over a `RawSMBIOSData` buffer rather than the raw entry
//! point record:
//!
//! ```text
//! struct RawSMBIOSData {
//!     BYTE  Used20CallingMethod;
//!     BYTE  SMBIOSMajorVersion;
//!     BYTE  SMBIOSMinorVersion;
//!     BYTE  DMIRevision;
//!     DWORD Length;
//!     BYTE  SMBIOSTableData[];
//! }
//! ```
//!
//! Only the version and table size survive, so the result carries an
//! opaque entry point whose table address reads as zero.

use std::io::Cursor;
use std::ptr;

use windows_sys::Win32::System::SystemInformation::GetSystemFirmwareTable;

use crate::entry_point::{EntryPoint, OpaqueEntryPoint};
use crate::error::{Result, SmbiosError};

use super::TableStream;

/// 'RSMB' in ASCII: the raw SMBIOS firmware table provider.
const PROVIDER_RSMB: u32 = 0x5253_4d42;

/// Size of the fixed part of `RawSMBIOSData`. Doubles as the offset of
/// the table data and the minimum size of a valid buffer.
const RAW_SMBIOS_DATA_HEADER_SIZE: usize = 8;

pub(super) fn platform_stream() -> Result<(TableStream, EntryPoint)> {
    // First call sizes the buffer, second call fills it.
    let size = unsafe { GetSystemFirmwareTable(PROVIDER_RSMB, 0, ptr::null_mut(), 0) };
    if size == 0 {
        return Err(SmbiosError::FirmwareTable { reason: "failed to determine required buffer size" });
    }

    let mut buffer = vec![0u8; size as usize];
    let written = unsafe { GetSystemFirmwareTable(PROVIDER_RSMB, 0, buffer.as_mut_ptr().cast(), size) };
    if written == 0 {
        return Err(SmbiosError::FirmwareTable { reason: "failed to read firmware table data" });
    }
    if written > size {
        return Err(SmbiosError::FirmwareTable { reason: "firmware table grew between size probe and read" });
    }
    buffer.truncate(written as usize);

    parse_raw_smbios_data(buffer)
}

// Splits a RawSMBIOSData buffer into an opaque entry point and the table
// bytes it carries.
fn parse_raw_smbios_data(mut buffer: Vec<u8>) -> Result<(TableStream, EntryPoint)> {
    if buffer.len() < RAW_SMBIOS_DATA_HEADER_SIZE {
        return Err(SmbiosError::FirmwareTable { reason: "buffer smaller than the RawSMBIOSData header" });
    }

    // The length field is the only multi-byte value Windows writes in
    // native byte order rather than little-endian.
    let table_size = u32::from_ne_bytes([buffer[4], buffer[5], buffer[6], buffer[7]]);
    if RAW_SMBIOS_DATA_HEADER_SIZE + table_size as usize > buffer.len() {
        return Err(SmbiosError::FirmwareTable { reason: "reported table size exceeds buffer" });
    }

    let entry_point = EntryPoint::Opaque(OpaqueEntryPoint {
        major: buffer[1],
        minor: buffer[2],
        revision: buffer[3],
        table_size,
    });

    buffer.truncate(RAW_SMBIOS_DATA_HEADER_SIZE + table_size as usize);
    buffer.drain(..RAW_SMBIOS_DATA_HEADER_SIZE);

    Ok((TableStream::new(Box::new(Cursor::new(buffer))), entry_point))
}
