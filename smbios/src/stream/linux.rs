//! Linux SMBIOS access: modern sysfs firmware tables, with the legacy
//! `/dev/mem` scan as a fallback for older kernels.

use std::fs;
use std::io;

use crate::entry_point::{parse_entry_point, EntryPoint};
use crate::error::Result;

use super::{memory, TableStream};

// sysfs locations exported by modern kernels.
const SYSFS_ENTRY_POINT: &str = "/sys/firmware/dmi/tables/smbios_entry_point";
const SYSFS_DMI: &str = "/sys/firmware/dmi/tables/DMI";

pub(super) fn platform_stream() -> Result<(TableStream, EntryPoint)> {
    match fs::metadata(SYSFS_ENTRY_POINT) {
        Ok(_) => sysfs_stream(SYSFS_ENTRY_POINT, SYSFS_DMI),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::debug!("{SYSFS_ENTRY_POINT} absent, falling back to /dev/mem");
            memory::dev_mem_stream()
        }
        Err(err) => Err(err.into()),
    }
}

fn sysfs_stream(entry_point: &str, dmi: &str) -> Result<(TableStream, EntryPoint)> {
    let b = fs::read(entry_point)?;
    let entry_point = parse_entry_point(&b)?;

    let table = fs::File::open(dmi)?;
    Ok((TableStream::new(Box::new(table)), entry_point))
}
