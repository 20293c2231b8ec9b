//! Solaris SMBIOS access through `/dev/smbios`.
//!
//! The device yields the entry point record followed directly by the
//! structure table, so the same handle serves as the table stream once
//! the entry point window is consumed.

use std::fs;

use crate::entry_point::{parse_entry_point, EntryPoint, ENTRY_POINT_READ_LIMIT};
use crate::error::Result;

use super::{memory, TableStream};

const DEV_SMBIOS: &str = "/dev/smbios";

pub(super) fn platform_stream() -> Result<(TableStream, EntryPoint)> {
    let mut device = fs::File::open(DEV_SMBIOS)?;

    let mut b = [0u8; ENTRY_POINT_READ_LIMIT];
    let n = memory::read_up_to(&mut device, &mut b)?;
    let entry_point = parse_entry_point(&b[..n])?;

    Ok((TableStream::new(Box::new(device)), entry_point))
}
