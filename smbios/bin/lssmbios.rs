//! Command lssmbios accesses and displays SMBIOS structures.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

use clap::Parser;
use smbios::{Decoder, Inventory};

#[derive(Parser, Debug)]
struct Args {
    /// Print the typed hardware inventory instead of raw structures.
    #[arg(short, long, default_value_t = false)]
    inventory: bool,
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
    // Find SMBIOS data in an operating system-specific location.
    let (table, entry_point) = smbios::stream()?;

    let structures = Decoder::new(table).decode()?;

    let version = entry_point.version();
    let (address, size) = entry_point.table();
    println!("SMBIOS {version} - table: address: {address:#x}, size: {size}");

    if args.inventory {
        println!("{:#?}", Inventory::new(&structures, version));
        return Ok(());
    }

    for structure in &structures {
        println!("{structure:?}");
    }

    Ok(())
}
