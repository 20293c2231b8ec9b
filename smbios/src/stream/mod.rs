//! Operating system-specific access to SMBIOS data.
//!
//! Each supported platform contributes one implementation of the same
//! contract: locate the entry point, then expose exactly the structure
//! table bytes as a readable stream. The platform is selected at build
//! time; only one implementation is live per target.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

mod memory;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "solaris")]
mod solaris;
#[cfg(windows)]
mod windows;

use core::fmt;
use std::io::Read;

use crate::entry_point::EntryPoint;
use crate::error::Result;

pub use memory::{find_entry_point, memory_stream};

/// A readable stream of structure table bytes.
///
/// The concrete source (a sysfs file, a copied memory window, a firmware
/// service buffer) stays hidden so callers cannot recover a privileged
/// handle from it. The stream can only be read and dropped; dropping it
/// releases the source.
pub struct TableStream {
    stream: Box<dyn Read>,
}

impl TableStream {
    pub(crate) fn new(stream: Box<dyn Read>) -> Self {
        Self { stream }
    }
}

impl Read for TableStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stream.read(buf)
    }
}

impl fmt::Debug for TableStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableStream").finish_non_exhaustive()
    }
}

/// Locates SMBIOS data in an operating system-specific location and opens
/// a stream over the structure table, along with its entry point.
///
/// The stream delivers exactly the table bytes described by the entry
/// point. Callers hand it to [`Decoder`](crate::Decoder) and drop it once
/// decoding returns.
pub fn stream() -> Result<(TableStream, EntryPoint)> {
    platform_stream()
}

#[cfg(target_os = "linux")]
use linux::platform_stream;
#[cfg(target_os = "macos")]
use macos::platform_stream;
#[cfg(target_os = "solaris")]
use solaris::platform_stream;
#[cfg(windows)]
use windows::platform_stream;

// The BSDs have no sysfs equivalent; the legacy memory window is the only
// source.
#[cfg(any(target_os = "freebsd", target_os = "netbsd", target_os = "openbsd", target_os = "dragonfly"))]
fn platform_stream() -> Result<(TableStream, EntryPoint)> {
    memory::dev_mem_stream()
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "solaris",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly",
    windows,
)))]
fn platform_stream() -> Result<(TableStream, EntryPoint)> {
    Err(crate::error::SmbiosError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "no SMBIOS data source is known for this platform",
    )))
}
