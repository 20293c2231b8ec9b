//! Error types for SMBIOS decoding.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

use core::fmt;
use std::io;

/// Public result type for the crate.
pub type Result<T> = core::result::Result<T, SmbiosError>;

/// Errors produced while locating, parsing, or decoding SMBIOS data.
///
/// Errors are surfaced to the caller unchanged; nothing is retried and no
/// partial decode results are returned.
#[derive(Debug)]
pub enum SmbiosError {
    /// The platform source could not be read.
    Io(io::Error),
    /// The memory window was searched without finding an anchor string.
    NoEntryPoint,
    /// Too few bytes were available for an entry point record.
    ShortEntryPoint { have: usize, need: usize },
    /// The entry point length field disagrees with the bytes supplied.
    LengthMismatch { declared: u8, available: usize },
    /// The record starts with neither of the known anchor strings.
    UnknownAnchor { found: [u8; 4] },
    /// The 32-bit entry point is missing its `_DMI_` sub-anchor.
    BadIntermediateAnchor { found: [u8; 5] },
    /// The additive checksum over the entry point record is non-zero.
    BadChecksum { checksum: u8, sum: u8 },
    /// A structure header declares a length smaller than the header itself.
    MalformedLength { length: u8 },
    /// The table stream ended before an end-of-table structure.
    Truncated,
    /// The platform firmware-table service returned an inconsistent buffer.
    FirmwareTable { reason: &'static str },
}

impl fmt::Display for SmbiosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmbiosError::Io(err) => write!(f, "I/O error reading SMBIOS data: {err}"),
            SmbiosError::NoEntryPoint => {
                write!(f, "no SMBIOS entry point found in memory window")
            }
            SmbiosError::ShortEntryPoint { have, need } => {
                write!(f, "too few bytes for SMBIOS entry point: have {have}, need at least {need}")
            }
            SmbiosError::LengthMismatch { declared, available } => {
                write!(f, "SMBIOS entry point declares length {declared}, but {available} bytes are available")
            }
            SmbiosError::UnknownAnchor { found } => {
                write!(f, "unrecognized SMBIOS entry point anchor: {found:02x?}")
            }
            SmbiosError::BadIntermediateAnchor { found } => {
                write!(f, "incorrect DMI anchor in SMBIOS 32-bit entry point: {found:02x?}")
            }
            SmbiosError::BadChecksum { checksum, sum } => {
                write!(f, "invalid entry point checksum {checksum:#04x}: record sums to {sum:#04x}")
            }
            SmbiosError::MalformedLength { length } => {
                write!(f, "structure header length {length} is smaller than the header itself")
            }
            SmbiosError::Truncated => {
                write!(f, "structure table ended before the end-of-table structure")
            }
            SmbiosError::FirmwareTable { reason } => {
                write!(f, "firmware table service: {reason}")
            }
        }
    }
}

impl std::error::Error for SmbiosError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SmbiosError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SmbiosError {
    fn from(err: io::Error) -> Self {
        SmbiosError::Io(err)
    }
}

// Cursor reads inside the crate are always bounds-checked first, so a
// scroll failure can only mean the input ran out from under us.
impl From<scroll::Error> for SmbiosError {
    fn from(_: scroll::Error) -> Self {
        SmbiosError::Truncated
    }
}
