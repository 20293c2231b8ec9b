//! Typed interpretation of recognized structure types.
//!
//! Decoding a table yields raw [`Structure`]s; this module projects the
//! recognized types into fielded records. Field access is gated on the
//! formatted block actually reaching the length at which the SMBIOS
//! specification introduced the field, so records written against an older
//! minor version simply report newer fields as absent. Interpretation
//! never fails: short blocks, out-of-range string indices, and sentinel
//! byte patterns all degrade to `None`.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

use bitfield::bitfield;
use scroll::{Pread, LE};

use crate::entry_point::Version;
use crate::structure::{SmbiosType, Structure};

/// BIOS Information (Type 0)
pub const TYPE_BIOS_INFORMATION: SmbiosType = 0;
/// System Information (Type 1)
pub const TYPE_SYSTEM_INFORMATION: SmbiosType = 1;
/// Baseboard Information (Type 2)
pub const TYPE_BASEBOARD_INFORMATION: SmbiosType = 2;
/// System Enclosure (Type 3)
pub const TYPE_SYSTEM_ENCLOSURE: SmbiosType = 3;
/// Processor Information (Type 4)
pub const TYPE_PROCESSOR_INFORMATION: SmbiosType = 4;
/// Memory Device (Type 17)
pub const TYPE_MEMORY_DEVICE: SmbiosType = 17;

// Formatted-block lengths at which each memory device field group was
// introduced. Reference SMBIOS 3.0.0, chapter 7.18.
const MEMORY_DEVICE_LENGTH_2_1: usize = 17;
const MEMORY_DEVICE_LENGTH_2_3: usize = 23;
const MEMORY_DEVICE_LENGTH_2_6: usize = 24;
const MEMORY_DEVICE_LENGTH_2_7: usize = 30;
const MEMORY_DEVICE_LENGTH_2_8: usize = 36;

/// A size word of 0x7FFF directs readers to the 32-bit extended size.
const EXTENDED_SIZE_SENTINEL: u16 = 0x7fff;

const BYTES_PER_MEGABYTE: u64 = 1_048_576;
const BYTES_PER_KILOBYTE: u64 = 1024;

bitfield! {
    /// Enclosure type byte: chassis type with the lock-present flag in the
    /// high bit.
    struct ChassisTypeByte(u8);
    impl Debug;
    chassis_type, _: 6, 0;
    lock_present, _: 7;
}

bitfield! {
    /// Memory device size word. The granularity of the count in the low
    /// bits depends on the most-significant bit: clear means megabytes,
    /// set means kilobytes.
    struct DeviceSizeWord(u16);
    impl Debug;
    device_size, _: 14, 0;
    in_kilobytes, _: 15;
}

/// A typed projection of one recognized structure.
///
/// Produced alongside, never instead of, the raw [`Structure`]; unknown
/// types carry no projection and end-of-table records terminate decoding
/// without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Bios(BiosInformation),
    System(SystemInformation),
    Baseboard(BaseboardInformation),
    Enclosure(EnclosureInformation),
    Processor(ProcessorInformation),
    MemoryDevice(MemoryDevice),
}

impl Interpretation {
    /// Decodes the typed projection for a recognized structure type.
    ///
    /// Returns `None` for unrecognized types (including end-of-table);
    /// the raw structure remains the only representation for those.
    pub fn of(structure: &Structure, version: Version) -> Option<Interpretation> {
        match structure.header.record_type {
            TYPE_BIOS_INFORMATION => Some(Interpretation::Bios(bios_information(structure, version))),
            TYPE_SYSTEM_INFORMATION => Some(Interpretation::System(system_information(structure))),
            TYPE_BASEBOARD_INFORMATION => Some(Interpretation::Baseboard(baseboard_information(structure))),
            TYPE_SYSTEM_ENCLOSURE => Some(Interpretation::Enclosure(system_enclosure(structure))),
            TYPE_PROCESSOR_INFORMATION => Some(Interpretation::Processor(processor_information(structure, version))),
            TYPE_MEMORY_DEVICE => Some(Interpretation::MemoryDevice(memory_device(structure))),
            _ => None,
        }
    }
}

/// BIOS information (type 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiosInformation {
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub release_date: Option<String>,
    /// Synthetic `major.minor` string derived from the entry point, not
    /// from the structure itself.
    pub bios_version: String,
}

/// System information (type 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInformation {
    pub manufacturer: Option<String>,
    pub product_name: Option<String>,
    pub serial_number: Option<String>,
    /// Canonical UUID rendering. Absent when the firmware reports all
    /// 0x00 (not set) or all 0xFF (set but unreadable) bytes.
    pub uuid: Option<String>,
}

/// Baseboard information (type 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseboardInformation {
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub version: Option<String>,
    pub serial_number: Option<String>,
}

/// System enclosure (type 3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosureInformation {
    /// Chassis type code with the lock flag masked off.
    pub chassis_type: Option<u8>,
    pub lock_present: Option<bool>,
}

/// Processor information (type 4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorInformation {
    pub processor_type: Option<u8>,
    pub family: Option<u8>,
    /// Processor ID rendered as four 16-bit hex words, highest word
    /// first. Absent when the firmware reports all zeroes.
    pub id: Option<String>,
    pub manufacturer: Option<String>,
    pub current_speed_mhz: Option<u16>,
    pub core_count: Option<u16>,
}

/// Memory device (type 17).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDevice {
    pub array_handle: Option<u16>,
    pub error_handle: Option<u16>,
    pub total_width: Option<u16>,
    pub data_width: Option<u16>,
    pub form_factor: Option<u8>,
    pub device_set: Option<u8>,
    pub device_locator: Option<String>,
    pub bank_locator: Option<String>,
    pub memory_type: Option<u8>,
    pub type_detail: Option<u16>,
    pub speed: Option<u16>,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub asset_tag: Option<String>,
    pub part_number: Option<String>,
    pub attribute: Option<u8>,
    pub configured_clock_speed: Option<u16>,
    pub min_voltage: Option<u16>,
    pub max_voltage: Option<u16>,
    pub configured_voltage: Option<u16>,
    /// Module size in bytes, combining the size word, its granularity
    /// bit, and the extended size field. `Some(0)` marks an empty slot.
    pub size_bytes: Option<u64>,
}

impl MemoryDevice {
    /// Whether the slot is populated. Devices reporting size zero are
    /// sockets without a module.
    pub fn is_empty_slot(&self) -> bool {
        self.size_bytes == Some(0)
    }
}

/// Hardware inventory aggregated over a decoded structure table.
///
/// For the singleton types the first structure in stream order wins;
/// processors and memory devices keep every occurrence in order, except
/// that empty memory slots are omitted. The raw structures are left
/// untouched; this is a pure derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub bios: Option<BiosInformation>,
    pub system: Option<SystemInformation>,
    pub baseboard: Option<BaseboardInformation>,
    pub enclosure: Option<EnclosureInformation>,
    pub processors: Vec<ProcessorInformation>,
    pub memory_devices: Vec<MemoryDevice>,
}

impl Inventory {
    /// Aggregates the typed projections of `structures`.
    pub fn new(structures: &[Structure], version: Version) -> Inventory {
        let mut inventory = Inventory::default();

        for structure in structures {
            match Interpretation::of(structure, version) {
                Some(Interpretation::Bios(bios)) => {
                    inventory.bios.get_or_insert(bios);
                }
                Some(Interpretation::System(system)) => {
                    inventory.system.get_or_insert(system);
                }
                Some(Interpretation::Baseboard(baseboard)) => {
                    inventory.baseboard.get_or_insert(baseboard);
                }
                Some(Interpretation::Enclosure(enclosure)) => {
                    inventory.enclosure.get_or_insert(enclosure);
                }
                Some(Interpretation::Processor(processor)) => inventory.processors.push(processor),
                Some(Interpretation::MemoryDevice(device)) => {
                    if !device.is_empty_slot() {
                        inventory.memory_devices.push(device);
                    }
                }
                None => {}
            }
        }

        inventory
    }
}

// Reads little-endian fields out of a formatted block, gated on the block
// reaching the length at which the field was introduced.
struct Fields<'a> {
    formatted: &'a [u8],
}

impl Fields<'_> {
    fn u8(&self, offset: usize, introduced_at: usize) -> Option<u8> {
        if self.formatted.len() < introduced_at {
            return None;
        }
        self.formatted.pread_with::<u8>(offset, LE).ok()
    }

    fn u16(&self, offset: usize, introduced_at: usize) -> Option<u16> {
        if self.formatted.len() < introduced_at {
            return None;
        }
        self.formatted.pread_with::<u16>(offset, LE).ok()
    }

    fn u32(&self, offset: usize, introduced_at: usize) -> Option<u32> {
        if self.formatted.len() < introduced_at {
            return None;
        }
        self.formatted.pread_with::<u32>(offset, LE).ok()
    }

    fn array<const N: usize>(&self, offset: usize, introduced_at: usize) -> Option<[u8; N]> {
        if self.formatted.len() < introduced_at {
            return None;
        }
        let slice = self.formatted.get(offset..offset + N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Some(out)
    }
}

// Uniform string reference rule: an index of zero means "no string", as
// does an index past the end of the set. Indices are 1-based.
fn string_ref(strings: &[String], index: u8) -> Option<String> {
    let index = index as usize;
    if index == 0 || index > strings.len() {
        return None;
    }
    Some(strings[index - 1].clone())
}

fn bios_information(structure: &Structure, version: Version) -> BiosInformation {
    let fields = Fields { formatted: &structure.formatted };
    BiosInformation {
        vendor: fields.u8(0, 1).and_then(|i| string_ref(&structure.strings, i)),
        version: fields.u8(1, 2).and_then(|i| string_ref(&structure.strings, i)),
        release_date: fields.u8(4, 5).and_then(|i| string_ref(&structure.strings, i)),
        bios_version: format!("{}.{}", version.major, version.minor),
    }
}

fn system_information(structure: &Structure) -> SystemInformation {
    let fields = Fields { formatted: &structure.formatted };
    SystemInformation {
        manufacturer: fields.u8(0, 1).and_then(|i| string_ref(&structure.strings, i)),
        product_name: fields.u8(1, 2).and_then(|i| string_ref(&structure.strings, i)),
        serial_number: fields.u8(3, 4).and_then(|i| string_ref(&structure.strings, i)),
        uuid: fields.array::<16>(4, 20).and_then(|raw| render_uuid(&raw)),
    }
}

fn baseboard_information(structure: &Structure) -> BaseboardInformation {
    let fields = Fields { formatted: &structure.formatted };
    BaseboardInformation {
        manufacturer: fields.u8(0, 1).and_then(|i| string_ref(&structure.strings, i)),
        product: fields.u8(1, 2).and_then(|i| string_ref(&structure.strings, i)),
        version: fields.u8(2, 3).and_then(|i| string_ref(&structure.strings, i)),
        serial_number: fields.u8(3, 4).and_then(|i| string_ref(&structure.strings, i)),
    }
}

fn system_enclosure(structure: &Structure) -> EnclosureInformation {
    match structure.formatted.first() {
        Some(&byte) => {
            let byte = ChassisTypeByte(byte);
            EnclosureInformation { chassis_type: Some(byte.chassis_type()), lock_present: Some(byte.lock_present()) }
        }
        None => EnclosureInformation { chassis_type: None, lock_present: None },
    }
}

fn processor_information(structure: &Structure, version: Version) -> ProcessorInformation {
    let fields = Fields { formatted: &structure.formatted };

    // An 8-bit count of 0xFF directs readers to the 16-bit field that
    // SMBIOS 3.0 added for high-core-count parts.
    let core_count = match fields.u8(31, 32) {
        Some(0xff) if version.major >= 3 => fields.u16(38, 40),
        other => other.map(u16::from),
    };

    ProcessorInformation {
        processor_type: fields.u8(1, 2),
        family: fields.u8(2, 3),
        id: fields.array::<8>(4, 12).and_then(render_processor_id),
        manufacturer: fields.u8(16, 17).and_then(|i| string_ref(&structure.strings, i)),
        current_speed_mhz: fields.u16(18, 20),
        core_count,
    }
}

fn memory_device(structure: &Structure) -> MemoryDevice {
    let fields = Fields { formatted: &structure.formatted };
    let strings = &structure.strings;

    MemoryDevice {
        array_handle: fields.u16(0, MEMORY_DEVICE_LENGTH_2_1),
        error_handle: fields.u16(2, MEMORY_DEVICE_LENGTH_2_1),
        total_width: fields.u16(4, MEMORY_DEVICE_LENGTH_2_1),
        data_width: fields.u16(6, MEMORY_DEVICE_LENGTH_2_1),
        form_factor: fields.u8(10, MEMORY_DEVICE_LENGTH_2_1),
        device_set: fields.u8(11, MEMORY_DEVICE_LENGTH_2_1),
        device_locator: fields.u8(12, MEMORY_DEVICE_LENGTH_2_1).and_then(|i| string_ref(strings, i)),
        bank_locator: fields.u8(13, MEMORY_DEVICE_LENGTH_2_1).and_then(|i| string_ref(strings, i)),
        memory_type: fields.u8(14, MEMORY_DEVICE_LENGTH_2_1),
        type_detail: fields.u16(15, MEMORY_DEVICE_LENGTH_2_1),
        speed: fields.u16(17, MEMORY_DEVICE_LENGTH_2_3),
        manufacturer: fields.u8(19, MEMORY_DEVICE_LENGTH_2_3).and_then(|i| string_ref(strings, i)),
        serial_number: fields.u8(20, MEMORY_DEVICE_LENGTH_2_3).and_then(|i| string_ref(strings, i)),
        asset_tag: fields.u8(21, MEMORY_DEVICE_LENGTH_2_3).and_then(|i| string_ref(strings, i)),
        part_number: fields.u8(22, MEMORY_DEVICE_LENGTH_2_3).and_then(|i| string_ref(strings, i)),
        attribute: fields.u8(23, MEMORY_DEVICE_LENGTH_2_6),
        configured_clock_speed: fields.u16(28, MEMORY_DEVICE_LENGTH_2_7),
        min_voltage: fields.u16(30, MEMORY_DEVICE_LENGTH_2_8),
        max_voltage: fields.u16(32, MEMORY_DEVICE_LENGTH_2_8),
        configured_voltage: fields.u16(34, MEMORY_DEVICE_LENGTH_2_8),
        size_bytes: device_size_bytes(&fields),
    }
}

fn device_size_bytes(fields: &Fields<'_>) -> Option<u64> {
    let raw = fields.u16(8, MEMORY_DEVICE_LENGTH_2_1)?;
    if raw == 0 {
        // Empty slot.
        return Some(0);
    }

    if raw == EXTENDED_SIZE_SENTINEL {
        if let Some(extended) = fields.u32(24, MEMORY_DEVICE_LENGTH_2_7) {
            // The extended size is always in megabytes.
            return Some(extended as u64 * BYTES_PER_MEGABYTE);
        }
    }

    let word = DeviceSizeWord(raw);
    let unit = if word.in_kilobytes() { BYTES_PER_KILOBYTE } else { BYTES_PER_MEGABYTE };
    Some(word.device_size() as u64 * unit)
}

// UUID wire format is little-endian in the first three groups, so those
// bytes reverse for display; the trailing groups copy through.
fn render_uuid(raw: &[u8; 16]) -> Option<String> {
    if raw.iter().all(|&b| b == 0x00) || raw.iter().all(|&b| b == 0xff) {
        return None;
    }

    Some(format!(
        "{:02X}{:02X}{:02X}{:02X}-{:02X}{:02X}-{:02X}{:02X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}",
        raw[3], raw[2], raw[1], raw[0], raw[5], raw[4], raw[7], raw[6], raw[8], raw[9], raw[10], raw[11], raw[12],
        raw[13], raw[14], raw[15],
    ))
}

fn render_processor_id(raw: [u8; 8]) -> Option<String> {
    if raw.iter().all(|&b| b == 0) {
        return None;
    }

    let word = |i: usize| u16::from_le_bytes([raw[i], raw[i + 1]]);
    Some(format!("{:04X}{:04X}{:04X}{:04X}", word(6), word(4), word(2), word(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Header;

    const VERSION_2_8: Version = Version { major: 2, minor: 8, revision: 0 };
    const VERSION_3_0: Version = Version { major: 3, minor: 0, revision: 0 };

    fn structure(record_type: SmbiosType, formatted: Vec<u8>, strings: &[&str]) -> Structure {
        Structure {
            header: Header::new(record_type, (formatted.len() + 4) as u8, 1),
            formatted,
            strings: strings.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn memory_formatted(len: usize, size_word: u16) -> Vec<u8> {
        let mut formatted = vec![0u8; len];
        if len >= 10 {
            formatted[8..10].copy_from_slice(&size_word.to_le_bytes());
        }
        formatted
    }

    #[test]
    fn bios_strings_and_synthetic_version() {
        let mut formatted = vec![0u8; 18];
        formatted[0] = 1; // vendor
        formatted[1] = 2; // version
        formatted[4] = 3; // release date
        let s = structure(TYPE_BIOS_INFORMATION, formatted, &["Acme", "1.2.3", "07/01/2017"]);

        let Some(Interpretation::Bios(bios)) = Interpretation::of(&s, VERSION_2_8) else {
            panic!("expected BIOS interpretation");
        };
        assert_eq!(bios.vendor.as_deref(), Some("Acme"));
        assert_eq!(bios.version.as_deref(), Some("1.2.3"));
        assert_eq!(bios.release_date.as_deref(), Some("07/01/2017"));
        assert_eq!(bios.bios_version, "2.8");
    }

    #[test]
    fn string_reference_rule_is_uniform() {
        // Zero and out-of-range indices resolve to absent; in-range
        // indices resolve to exactly the 1-based entry. Never a panic.
        let strings = vec!["first".to_string(), "second".to_string()];
        for index in 0u8..=5 {
            let resolved = string_ref(&strings, index);
            match index {
                1 => assert_eq!(resolved.as_deref(), Some("first")),
                2 => assert_eq!(resolved.as_deref(), Some("second")),
                _ => assert_eq!(resolved, None),
            }
        }
    }

    #[test]
    fn system_uuid_absent_for_sentinel_patterns() {
        for fill in [0x00u8, 0xff] {
            let mut formatted = vec![0u8; 24];
            formatted[4..20].fill(fill);
            let s = structure(TYPE_SYSTEM_INFORMATION, formatted, &[]);

            let Some(Interpretation::System(system)) = Interpretation::of(&s, VERSION_2_8) else {
                panic!("expected system interpretation");
            };
            assert_eq!(system.uuid, None);
        }
    }

    #[test]
    fn system_uuid_renders_byte_reversed_groups() {
        let uuid = [
            0xa4, 0x98, 0x35, 0x10, 0x71, 0xe2, 0x11, 0xe2, 0xad, 0xb1, 0xdf, 0x8b, 0xe4, 0x84, 0x1f, 0x5b,
        ];
        let mut formatted = vec![0u8; 24];
        formatted[4..20].copy_from_slice(&uuid);
        formatted[0] = 1;
        formatted[1] = 2;
        formatted[3] = 3;
        let s = structure(TYPE_SYSTEM_INFORMATION, formatted, &["LENOVO", "20ARS25701", "PF01ABCD"]);

        let Some(Interpretation::System(system)) = Interpretation::of(&s, VERSION_2_8) else {
            panic!("expected system interpretation");
        };
        assert_eq!(system.uuid.as_deref(), Some("103598A4-E271-E211-ADB1-DF8BE4841F5B"));
        assert_eq!(system.manufacturer.as_deref(), Some("LENOVO"));
        assert_eq!(system.product_name.as_deref(), Some("20ARS25701"));
        assert_eq!(system.serial_number.as_deref(), Some("PF01ABCD"));
        // The rendered UUID is a projection field only; the structure's
        // string set is untouched.
        assert_eq!(s.strings.len(), 3);
    }

    #[test]
    fn baseboard_strings() {
        let s = structure(TYPE_BASEBOARD_INFORMATION, vec![1, 2, 3, 4, 0, 0], &["Maker", "Board", "v2", "SN999"]);
        let Some(Interpretation::Baseboard(baseboard)) = Interpretation::of(&s, VERSION_2_8) else {
            panic!("expected baseboard interpretation");
        };
        assert_eq!(baseboard.manufacturer.as_deref(), Some("Maker"));
        assert_eq!(baseboard.product.as_deref(), Some("Board"));
        assert_eq!(baseboard.version.as_deref(), Some("v2"));
        assert_eq!(baseboard.serial_number.as_deref(), Some("SN999"));
    }

    #[test]
    fn enclosure_masks_lock_flag() {
        let s = structure(TYPE_SYSTEM_ENCLOSURE, vec![0x8a], &[]);
        let Some(Interpretation::Enclosure(enclosure)) = Interpretation::of(&s, VERSION_2_8) else {
            panic!("expected enclosure interpretation");
        };
        assert_eq!(enclosure.chassis_type, Some(0x0a));
        assert_eq!(enclosure.lock_present, Some(true));

        let s = structure(TYPE_SYSTEM_ENCLOSURE, vec![], &[]);
        let Some(Interpretation::Enclosure(enclosure)) = Interpretation::of(&s, VERSION_2_8) else {
            panic!("expected enclosure interpretation");
        };
        assert_eq!(enclosure.chassis_type, None);
        assert_eq!(enclosure.lock_present, None);
    }

    fn processor_formatted(core_count: u8, core_count2: u16) -> Vec<u8> {
        let mut formatted = vec![0u8; 40];
        formatted[1] = 0x03; // central processor
        formatted[2] = 0xc6; // family
        formatted[4..12].copy_from_slice(&[0x54, 0x06, 0x05, 0x00, 0xff, 0xfb, 0xeb, 0xbf]);
        formatted[16] = 1; // manufacturer string
        formatted[18..20].copy_from_slice(&2400u16.to_le_bytes());
        formatted[31] = core_count;
        formatted[38..40].copy_from_slice(&core_count2.to_le_bytes());
        formatted
    }

    #[test]
    fn processor_id_renders_words_in_reverse_order() {
        let s = structure(TYPE_PROCESSOR_INFORMATION, processor_formatted(8, 0), &["GenuineIntel"]);
        let Some(Interpretation::Processor(processor)) = Interpretation::of(&s, VERSION_3_0) else {
            panic!("expected processor interpretation");
        };
        assert_eq!(processor.id.as_deref(), Some("BFEBFBFF00050654"));
        assert_eq!(processor.processor_type, Some(0x03));
        assert_eq!(processor.family, Some(0xc6));
        assert_eq!(processor.manufacturer.as_deref(), Some("GenuineIntel"));
        assert_eq!(processor.current_speed_mhz, Some(2400));
        assert_eq!(processor.core_count, Some(8));
    }

    #[test]
    fn processor_id_absent_when_all_zero() {
        let mut formatted = processor_formatted(4, 0);
        formatted[4..12].fill(0);
        let s = structure(TYPE_PROCESSOR_INFORMATION, formatted, &[]);
        let Some(Interpretation::Processor(processor)) = Interpretation::of(&s, VERSION_3_0) else {
            panic!("expected processor interpretation");
        };
        assert_eq!(processor.id, None);
    }

    #[test]
    fn processor_core_count_falls_back_to_extended_field() {
        // The 0xFF sentinel defers to the 16-bit count, but only on
        // tables that are versioned 3.0 or later.
        let s = structure(TYPE_PROCESSOR_INFORMATION, processor_formatted(0xff, 384), &[]);
        let Some(Interpretation::Processor(processor)) = Interpretation::of(&s, VERSION_3_0) else {
            panic!("expected processor interpretation");
        };
        assert_eq!(processor.core_count, Some(384));

        let Some(Interpretation::Processor(processor)) = Interpretation::of(&s, VERSION_2_8) else {
            panic!("expected processor interpretation");
        };
        assert_eq!(processor.core_count, Some(0xff));
    }

    #[test]
    fn processor_short_block_degrades() {
        let s = structure(TYPE_PROCESSOR_INFORMATION, vec![0u8; 16], &[]);
        let Some(Interpretation::Processor(processor)) = Interpretation::of(&s, VERSION_3_0) else {
            panic!("expected processor interpretation");
        };
        assert_eq!(processor.manufacturer, None);
        assert_eq!(processor.current_speed_mhz, None);
        assert_eq!(processor.core_count, None);
    }

    #[test]
    fn memory_size_in_megabytes() {
        let s = structure(TYPE_MEMORY_DEVICE, memory_formatted(23, 0x2000), &[]);
        let Some(Interpretation::MemoryDevice(device)) = Interpretation::of(&s, VERSION_2_8) else {
            panic!("expected memory device interpretation");
        };
        assert_eq!(device.size_bytes, Some(0x2000 * BYTES_PER_MEGABYTE));
    }

    #[test]
    fn memory_size_in_kilobytes() {
        // Bit 15 selects kilobyte granularity and is masked from the count.
        let s = structure(TYPE_MEMORY_DEVICE, memory_formatted(23, 0x8400), &[]);
        let Some(Interpretation::MemoryDevice(device)) = Interpretation::of(&s, VERSION_2_8) else {
            panic!("expected memory device interpretation");
        };
        assert_eq!(device.size_bytes, Some(0x0400 * BYTES_PER_KILOBYTE));
    }

    #[test]
    fn memory_size_extended_field() {
        let mut formatted = memory_formatted(30, EXTENDED_SIZE_SENTINEL);
        formatted[24..28].copy_from_slice(&40960u32.to_le_bytes());
        let s = structure(TYPE_MEMORY_DEVICE, formatted, &[]);
        let Some(Interpretation::MemoryDevice(device)) = Interpretation::of(&s, VERSION_2_8) else {
            panic!("expected memory device interpretation");
        };
        assert_eq!(device.size_bytes, Some(40960 * BYTES_PER_MEGABYTE));
    }

    #[test]
    fn memory_size_sentinel_without_extended_field() {
        // A block too short for the extended size falls back to reading
        // the sentinel as a plain megabyte count.
        let s = structure(TYPE_MEMORY_DEVICE, memory_formatted(23, EXTENDED_SIZE_SENTINEL), &[]);
        let Some(Interpretation::MemoryDevice(device)) = Interpretation::of(&s, VERSION_2_8) else {
            panic!("expected memory device interpretation");
        };
        assert_eq!(device.size_bytes, Some(0x7fff * BYTES_PER_MEGABYTE));
    }

    #[test]
    fn memory_version_gating() {
        let mut formatted = memory_formatted(23, 0x2000);
        formatted[12] = 1; // device locator
        formatted[17..19].copy_from_slice(&2933u16.to_le_bytes());
        formatted[19] = 2; // manufacturer
        let s = structure(TYPE_MEMORY_DEVICE, formatted, &["DIMM A1", "Kingston"]);

        let Some(Interpretation::MemoryDevice(device)) = Interpretation::of(&s, VERSION_2_8) else {
            panic!("expected memory device interpretation");
        };
        assert_eq!(device.device_locator.as_deref(), Some("DIMM A1"));
        assert_eq!(device.speed, Some(2933));
        assert_eq!(device.manufacturer.as_deref(), Some("Kingston"));
        // Fields introduced at longer block lengths read as absent.
        assert_eq!(device.attribute, None);
        assert_eq!(device.configured_clock_speed, None);
        assert_eq!(device.min_voltage, None);

        let short = structure(TYPE_MEMORY_DEVICE, vec![0u8; 16], &[]);
        let Some(Interpretation::MemoryDevice(device)) = Interpretation::of(&short, VERSION_2_8) else {
            panic!("expected memory device interpretation");
        };
        assert_eq!(device.array_handle, None);
        assert_eq!(device.size_bytes, None);
    }

    #[test]
    fn inventory_skips_empty_memory_slots() {
        let populated = structure(TYPE_MEMORY_DEVICE, memory_formatted(23, 0x2000), &[]);
        let empty = structure(TYPE_MEMORY_DEVICE, memory_formatted(23, 0), &[]);
        let end = structure(127, vec![], &[]);
        let structures = vec![populated, empty, end];

        let inventory = Inventory::new(&structures, VERSION_2_8);
        assert_eq!(inventory.memory_devices.len(), 1);
        assert_eq!(inventory.memory_devices[0].size_bytes, Some(0x2000 * BYTES_PER_MEGABYTE));
        // The empty slot is still present as a raw structure.
        assert_eq!(structures.len(), 3);
    }

    #[test]
    fn inventory_keeps_duplicates_in_stream_order() {
        let structures = vec![
            structure(TYPE_PROCESSOR_INFORMATION, processor_formatted(8, 0), &[]),
            structure(TYPE_PROCESSOR_INFORMATION, processor_formatted(16, 0), &[]),
            structure(0xc8, vec![0xaa], &["vendor specific"]),
            structure(127, vec![], &[]),
        ];

        let inventory = Inventory::new(&structures, VERSION_3_0);
        assert_eq!(inventory.processors.len(), 2);
        assert_eq!(inventory.processors[0].core_count, Some(8));
        assert_eq!(inventory.processors[1].core_count, Some(16));
        assert_eq!(inventory.bios, None);
    }

    #[test]
    fn unknown_types_have_no_interpretation() {
        let s = structure(0xc8, vec![0x01, 0x02], &["oem"]);
        assert_eq!(Interpretation::of(&s, VERSION_2_8), None);

        let end = structure(127, vec![], &[]);
        assert_eq!(Interpretation::of(&end, VERSION_2_8), None);
    }
}
