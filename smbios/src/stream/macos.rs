//! macOS SMBIOS access through the `ioreg` registry dump.
//!
//! The AppleSMBIOS driver publishes the entry point and table as
//! hex-encoded registry properties; there is no file interface.

use std::io::{self, Cursor};
use std::process::Command;

use crate::entry_point::{parse_entry_point, EntryPoint};
use crate::error::{Result, SmbiosError};

use super::TableStream;

const ENTRY_POINT_KEY: &str = "\"SMBIOS-EPS\"";
const TABLE_KEY: &str = "\"SMBIOS\"";

pub(super) fn platform_stream() -> Result<(TableStream, EntryPoint)> {
    let output = Command::new("ioreg").args(["-rd1", "-c", "AppleSMBIOS"]).output()?;
    if !output.status.success() {
        return Err(SmbiosError::Io(io::Error::other(format!("ioreg failed: {}", output.status))));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let (eps, table) = extract_smbios(&text)?;

    let entry_point = parse_entry_point(&decode_hex(&eps)?)?;
    let table = decode_hex(&table)?;

    Ok((TableStream::new(Box::new(Cursor::new(table))), entry_point))
}

// Pulls the two hex values out of ioreg's key = <value> lines.
fn extract_smbios(text: &str) -> Result<(String, String)> {
    let mut eps = None;
    let mut table = None;

    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            ENTRY_POINT_KEY => eps = Some(trim_value(value)),
            TABLE_KEY => table = Some(trim_value(value)),
            _ => {}
        }
    }

    match (eps, table) {
        (Some(eps), Some(table)) => Ok((eps, table)),
        _ => Err(SmbiosError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            "ioreg output carries no SMBIOS properties; is AppleSMBIOS loaded?",
        ))),
    }
}

fn trim_value(value: &str) -> String {
    value.trim().trim_start_matches('<').trim_end_matches('>').to_string()
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    if s.len() % 2 != 0 {
        return Err(invalid_hex());
    }

    let mut out = Vec::with_capacity(s.len() / 2);
    for pair in s.as_bytes().chunks_exact(2) {
        let hi = hex_digit(pair[0]).ok_or_else(invalid_hex)?;
        let lo = hex_digit(pair[1]).ok_or_else(invalid_hex)?;
        out.push(hi << 4 | lo);
    }
    Ok(out)
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn invalid_hex() -> SmbiosError {
    SmbiosError::Io(io::Error::new(io::ErrorKind::InvalidData, "malformed hex value in ioreg output"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_both_properties() {
        let text = concat!(
            "+-o AppleSMBIOS  <class AppleSMBIOS>\n",
            "    {\n",
            "      \"SMBIOS-EPS\" = <5f534d5f>\n",
            "      \"SMBIOS\" = <7f0401000000>\n",
            "    }\n",
        );
        let (eps, table) = extract_smbios(text).expect("extract failed");
        assert_eq!(eps, "5f534d5f");
        assert_eq!(table, "7f0401000000");
    }

    #[test]
    fn missing_properties_error() {
        assert!(extract_smbios("+-o Root  <class IORegistryEntry>\n").is_err());
    }

    #[test]
    fn decodes_hex_values() {
        assert_eq!(decode_hex("5f534d5f").expect("decode failed"), b"_SM_");
        assert!(decode_hex("5f5").is_err());
        assert!(decode_hex("zz").is_err());
    }
}
