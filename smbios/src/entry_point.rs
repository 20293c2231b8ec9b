//! SMBIOS entry point parsing.
//!
//! An entry point is a small, fixed-layout record that locates and versions
//! the structure table. Two wire layouts exist: the 32-bit entry point
//! introduced with SMBIOS 2.1 and the 64-bit entry point introduced with
//! SMBIOS 3.0. Some platforms (Windows) surface only version and table size
//! through a firmware service; those are represented by the opaque variant.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

use core::fmt;

use scroll::{Pread, LE};

use crate::error::{Result, SmbiosError};

/// Reference SMBIOS 3.4, chapter 5.2.1 SMBIOS 2.1 (32-bit) Entry Point.
/// `_SM_`, specified as four ASCII characters (5F 53 4D 5F).
pub const ANCHOR_32: &[u8; 4] = b"_SM_";

/// Reference SMBIOS 3.4, chapter 5.2.2 SMBIOS 3.0 (64-bit) Entry Point.
/// `_SM3_`, specified as five ASCII characters (5F 53 4D 33 5F).
pub const ANCHOR_64: &[u8; 5] = b"_SM3_";

/// Intermediate anchor string embedded in the 32-bit entry point at
/// offset 16, `_DMI_`.
pub const ANCHOR_DMI: &[u8; 5] = b"_DMI_";

/// Upper bound on the bytes considered when parsing an entry point.
/// Bounds reads from corrupt or hostile sources.
pub(crate) const ENTRY_POINT_READ_LIMIT: usize = 64;

// Minimum record lengths as of SMBIOS 3.1.1.
const ENTRY_POINT_32_LENGTH: usize = 31;
const ENTRY_POINT_64_LENGTH: usize = 24;

/// An SMBIOS specification version, as carried by an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

/// An SMBIOS entry point record.
///
/// The variants share the [`version`](EntryPoint::version) and
/// [`table`](EntryPoint::table) accessors; match on the variant to reach
/// layout-specific fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// SMBIOS 2.1 (32-bit) entry point, anchored by `_SM_`.
    Bit32(EntryPoint32Bit),
    /// SMBIOS 3.0 (64-bit) entry point, anchored by `_SM3_`.
    Bit64(EntryPoint64Bit),
    /// Version and table size only, from platforms that do not expose the
    /// raw entry point record. The table address reads as zero.
    Opaque(OpaqueEntryPoint),
}

/// SMBIOS 2.1 (32-bit) entry point structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint32Bit {
    pub checksum: u8,
    pub length: u8,
    pub major: u8,
    pub minor: u8,
    pub max_structure_size: u16,
    pub entry_point_revision: u8,
    pub intermediate_checksum: u8,
    pub table_length: u16,
    pub table_address: u32,
    pub structure_count: u16,
    pub bcd_revision: u8,
}

/// SMBIOS 3.0 (64-bit) entry point structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint64Bit {
    pub checksum: u8,
    pub length: u8,
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
    pub entry_point_revision: u8,
    pub reserved: u8,
    pub table_max_size: u32,
    pub table_address: u64,
}

/// Entry point information recovered from a platform service rather than
/// a raw firmware record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueEntryPoint {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
    pub table_size: u32,
}

impl EntryPoint {
    /// Returns the SMBIOS version advertised by this entry point.
    ///
    /// The 32-bit entry point carries only major and minor numbers; its
    /// revision reads as zero.
    pub fn version(&self) -> Version {
        match self {
            EntryPoint::Bit32(ep) => Version { major: ep.major, minor: ep.minor, revision: 0 },
            EntryPoint::Bit64(ep) => Version { major: ep.major, minor: ep.minor, revision: ep.revision },
            EntryPoint::Opaque(ep) => Version { major: ep.major, minor: ep.minor, revision: ep.revision },
        }
    }

    /// Returns the physical address and byte size of the structure table.
    ///
    /// The address is zero for the opaque variant.
    pub fn table(&self) -> (u64, u32) {
        match self {
            EntryPoint::Bit32(ep) => (ep.table_address as u64, ep.table_length as u32),
            EntryPoint::Bit64(ep) => (ep.table_address, ep.table_max_size),
            EntryPoint::Opaque(ep) => (0, ep.table_size),
        }
    }
}

/// Parses an [`EntryPoint`] from a byte slice.
///
/// At most [the first 64 bytes](ENTRY_POINT_READ_LIMIT) are considered.
/// Bytes past the record's declared length are ignored, so callers may
/// hand over a fixed-size window rather than an exact record.
pub fn parse_entry_point(b: &[u8]) -> Result<EntryPoint> {
    let b = &b[..b.len().min(ENTRY_POINT_READ_LIMIT)];

    if b.len() < ANCHOR_32.len() {
        return Err(SmbiosError::ShortEntryPoint { have: b.len(), need: ANCHOR_32.len() });
    }

    if b.starts_with(ANCHOR_64) {
        return parse64(b);
    }
    if b.starts_with(ANCHOR_32) {
        return parse32(b);
    }

    let mut found = [0u8; 4];
    found.copy_from_slice(&b[..4]);
    Err(SmbiosError::UnknownAnchor { found })
}

fn parse32(b: &[u8]) -> Result<EntryPoint> {
    if b.len() < ENTRY_POINT_32_LENGTH {
        return Err(SmbiosError::ShortEntryPoint { have: b.len(), need: ENTRY_POINT_32_LENGTH });
    }

    let length = b[5] as usize;
    if length < ENTRY_POINT_32_LENGTH || length > b.len() {
        return Err(SmbiosError::LengthMismatch { declared: b[5], available: b.len() });
    }
    let b = &b[..length];

    let mut intermediate = [0u8; 5];
    intermediate.copy_from_slice(&b[16..21]);
    if &intermediate != ANCHOR_DMI {
        return Err(SmbiosError::BadIntermediateAnchor { found: intermediate });
    }

    // The outer checksum covers the entire record, the intermediate anchor
    // region included, so the intermediate checksum needs no second pass.
    verify_checksum(b, b[4])?;

    let mut offset = 6;
    let major = b.gread_with::<u8>(&mut offset, LE)?;
    let minor = b.gread_with::<u8>(&mut offset, LE)?;
    let max_structure_size = b.gread_with::<u16>(&mut offset, LE)?;
    let entry_point_revision = b.gread_with::<u8>(&mut offset, LE)?;

    let mut offset = 21;
    let intermediate_checksum = b.gread_with::<u8>(&mut offset, LE)?;
    let table_length = b.gread_with::<u16>(&mut offset, LE)?;
    let table_address = b.gread_with::<u32>(&mut offset, LE)?;
    let structure_count = b.gread_with::<u16>(&mut offset, LE)?;
    let bcd_revision = b.gread_with::<u8>(&mut offset, LE)?;

    Ok(EntryPoint::Bit32(EntryPoint32Bit {
        checksum: b[4],
        length: b[5],
        major,
        minor,
        max_structure_size,
        entry_point_revision,
        intermediate_checksum,
        table_length,
        table_address,
        structure_count,
        bcd_revision,
    }))
}

fn parse64(b: &[u8]) -> Result<EntryPoint> {
    if b.len() < ENTRY_POINT_64_LENGTH {
        return Err(SmbiosError::ShortEntryPoint { have: b.len(), need: ENTRY_POINT_64_LENGTH });
    }

    let length = b[6] as usize;
    if length < ENTRY_POINT_64_LENGTH || length > b.len() {
        return Err(SmbiosError::LengthMismatch { declared: b[6], available: b.len() });
    }
    let b = &b[..length];

    verify_checksum(b, b[5])?;

    let mut offset = 7;
    let major = b.gread_with::<u8>(&mut offset, LE)?;
    let minor = b.gread_with::<u8>(&mut offset, LE)?;
    let revision = b.gread_with::<u8>(&mut offset, LE)?;
    let entry_point_revision = b.gread_with::<u8>(&mut offset, LE)?;
    let reserved = b.gread_with::<u8>(&mut offset, LE)?;
    let table_max_size = b.gread_with::<u32>(&mut offset, LE)?;
    let table_address = b.gread_with::<u64>(&mut offset, LE)?;

    Ok(EntryPoint::Bit64(EntryPoint64Bit {
        checksum: b[5],
        length: b[6],
        major,
        minor,
        revision,
        entry_point_revision,
        reserved,
        table_max_size,
        table_address,
    }))
}

// The stored checksum byte participates in the sum: every byte of a valid
// record, checksum included, wraps to zero.
fn verify_checksum(b: &[u8], checksum: u8) -> Result<()> {
    let sum = b.iter().fold(0u8, |sum, val| sum.wrapping_add(*val));
    if sum != 0 {
        return Err(SmbiosError::BadChecksum { checksum, sum });
    }
    Ok(())
}
