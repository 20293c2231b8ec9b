//! Command lsdimms lists memory module information from SMBIOS.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

use clap::Parser;
use smbios::interpret::{Interpretation, TYPE_MEMORY_DEVICE};
use smbios::Decoder;

#[derive(Parser, Debug)]
struct Args {
    /// Also print manufacturer, part number, and speed per module.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> smbios::Result<()> {
    let (table, entry_point) = smbios::stream()?;

    let structures = Decoder::new(table).decode()?;
    let version = entry_point.version();
    println!("SMBIOS {version}");

    for structure in structures.iter().filter(|s| s.header.record_type == TYPE_MEMORY_DEVICE) {
        let Some(Interpretation::MemoryDevice(device)) = Interpretation::of(structure, version) else {
            continue;
        };

        // Fall back to the handle when the firmware names no locator.
        let locator = device
            .device_locator
            .clone()
            .unwrap_or_else(|| format!("{:#06x}", structure.header.handle()));

        match device.size_bytes {
            Some(0) => println!("[{locator}] empty"),
            Some(bytes) => {
                println!("[{locator}] DIMM: {} MB", bytes / 1_048_576);
                if args.verbose {
                    println!(
                        "    manufacturer: {}  part: {}  speed: {}",
                        device.manufacturer.as_deref().unwrap_or("-"),
                        device.part_number.as_deref().unwrap_or("-"),
                        device.speed.map_or("-".to_string(), |s| s.to_string()),
                    );
                }
            }
            None => println!("[{locator}] unknown size"),
        }
    }

    Ok(())
}
