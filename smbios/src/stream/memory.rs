//! Entry point discovery in a raw physical memory window.
//!
//! Older kernels and the BSDs expose no pre-parsed firmware tables; the
//! entry point must be found by scanning the legacy BIOS region of
//! physical memory through `/dev/mem`.

use std::io::{self, Read, Seek, SeekFrom};

use crate::entry_point::{parse_entry_point, EntryPoint, ANCHOR_32, ANCHOR_64, ENTRY_POINT_READ_LIMIT};
use crate::error::{Result, SmbiosError};
use crate::stream::TableStream;

/// Entry point anchors begin on 16-byte paragraph boundaries.
const PARAGRAPH: usize = 16;

// The specification places the entry point somewhere in this physical
// window.
#[cfg(any(
    target_os = "linux",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly"
))]
const SCAN_START: u64 = 0x000f_0000;
#[cfg(any(
    target_os = "linux",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly"
))]
const SCAN_END: u64 = 0x000f_ffff;

#[cfg(any(
    target_os = "linux",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly"
))]
pub(super) fn dev_mem_stream() -> Result<(TableStream, EntryPoint)> {
    const DEV_MEM: &str = "/dev/mem";

    log::debug!("scanning {DEV_MEM} for an SMBIOS entry point");
    let mem = std::fs::File::open(DEV_MEM)?;
    memory_stream(mem, SCAN_START, SCAN_END)
}

/// Reads the SMBIOS entry point and structure table out of a seekable
/// memory window, usually physical memory.
///
/// The table is copied into an owned buffer before this function returns,
/// so nothing handed to the caller can reach back into the window.
pub fn memory_stream<T: Read + Seek>(mut window: T, start: u64, end: u64) -> Result<(TableStream, EntryPoint)> {
    let addr = find_entry_point(&mut window, start, end)?;
    log::debug!("SMBIOS entry point found at {addr:#x}");

    window.seek(SeekFrom::Start(addr))?;
    let mut b = [0u8; ENTRY_POINT_READ_LIMIT];
    let n = read_up_to(&mut window, &mut b)?;
    let entry_point = parse_entry_point(&b[..n])?;

    let (address, size) = entry_point.table();
    window.seek(SeekFrom::Start(address))?;

    let mut table = vec![0u8; size as usize];
    window.read_exact(&mut table).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => SmbiosError::Truncated,
        _ => SmbiosError::Io(err),
    })?;

    Ok((TableStream::new(Box::new(io::Cursor::new(table))), entry_point))
}

/// Scans the half-open window `[start, end)` one 16-byte paragraph at a
/// time and returns the offset of the first paragraph that opens with an
/// entry point anchor.
///
/// Anchors that do not begin on a paragraph boundary are not found; the
/// specification does not place them anywhere else.
pub fn find_entry_point<T: Read + Seek>(window: &mut T, start: u64, end: u64) -> Result<u64> {
    window.seek(SeekFrom::Start(start))?;

    let mut b = [0u8; PARAGRAPH];
    let mut addr = start;
    while addr < end {
        window.read_exact(&mut b)?;

        // The five-byte anchor is tested first; the first paragraph
        // matching either wins.
        if b.starts_with(ANCHOR_64) || b.starts_with(ANCHOR_32) {
            return Ok(addr);
        }

        addr += PARAGRAPH as u64;
    }

    Err(SmbiosError::NoEntryPoint)
}

// Reads until the buffer is full or the source is exhausted, whichever
// comes first.
pub(super) fn read_up_to<T: Read>(r: &mut T, b: &mut [u8]) -> Result<usize> {
    let mut n = 0;
    while n < b.len() {
        match r.read(&mut b[n..]) {
            Ok(0) => break,
            Ok(read) => n += read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(n)
}
