//! Detection and decoding of System Management BIOS (SMBIOS) and Desktop
//! Management Interface (DMI) data exposed by system firmware.
//!
//! The library locates an SMBIOS entry point in an operating
//! system-specific location, validates it, and decodes the structure table
//! it describes into a sequence of [`Structure`]s. Recognized structure
//! types additionally project into typed records via [`Interpretation`].
//!
//! ```no_run
//! # fn main() -> smbios::Result<()> {
//! let (table, entry_point) = smbios::stream()?;
//!
//! let structures = smbios::Decoder::new(table).decode()?;
//! let inventory = smbios::Inventory::new(&structures, entry_point.version());
//!
//! if let Some(bios) = inventory.bios {
//!     println!("firmware vendor: {:?}", bios.vendor);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

pub mod decoder;
pub mod entry_point;
pub mod error;
pub mod interpret;
pub mod stream;
pub mod structure;

pub use decoder::Decoder;
pub use entry_point::{parse_entry_point, EntryPoint, EntryPoint32Bit, EntryPoint64Bit, OpaqueEntryPoint, Version};
pub use error::{Result, SmbiosError};
pub use interpret::{Interpretation, Inventory};
pub use stream::{find_entry_point, memory_stream, stream, TableStream};
pub use structure::{Header, Structure};
