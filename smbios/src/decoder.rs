//! Structure table decoding.
//!
//! The structure table is a concatenation of heterogeneous records, each a
//! fixed header, a formatted block, and a null-terminated string set,
//! terminated by an end-of-table record. [`Decoder`] frames that stream
//! into owned [`Structure`]s.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

use std::io::{self, BufReader, Read};

use zerocopy::FromBytes;

use crate::error::{Result, SmbiosError};
use crate::structure::{Header, Structure, HEADER_LENGTH, TYPE_END_OF_TABLE};

/// Decodes [`Structure`]s from a stream of structure table bytes.
pub struct Decoder<R: Read> {
    stream: BufReader<R>,
}

impl<R: Read> Decoder<R> {
    /// Creates a decoder reading from `stream`.
    pub fn new(stream: R) -> Self {
        Self { stream: BufReader::new(stream) }
    }

    /// Decodes structures until an end-of-table structure is found.
    ///
    /// Structures are returned in stream order, the end-of-table record
    /// included. A stream that ends first yields
    /// [`Truncated`](SmbiosError::Truncated) and no structures: partial
    /// results are never returned.
    pub fn decode(mut self) -> Result<Vec<Structure>> {
        let mut structures = Vec::new();

        loop {
            let structure = self.next_structure()?;
            let done = structure.header.record_type == TYPE_END_OF_TABLE;

            structures.push(structure);
            if done {
                log::debug!("decoded {} SMBIOS structures", structures.len());
                return Ok(structures);
            }
        }
    }

    fn next_structure(&mut self) -> Result<Structure> {
        let header = self.read_header()?;

        // The length field counts the header itself.
        let length = header.length as usize;
        if length < HEADER_LENGTH {
            return Err(SmbiosError::MalformedLength { length: header.length });
        }

        let formatted = self.read_formatted(length - HEADER_LENGTH)?;
        let strings = self.read_strings()?;

        Ok(Structure { header, formatted, strings })
    }

    fn read_header(&mut self) -> Result<Header> {
        let mut b = [0u8; HEADER_LENGTH];
        self.read_exact(&mut b)?;
        Header::read_from_bytes(&b).map_err(|_| SmbiosError::Truncated)
    }

    fn read_formatted(&mut self, length: usize) -> Result<Vec<u8>> {
        if length == 0 {
            return Ok(Vec::new());
        }

        // A fresh buffer per structure; nothing borrows the source stream.
        let mut b = vec![0u8; length];
        self.read_exact(&mut b)?;
        Ok(b)
    }

    // Reads the string set that trails the formatted block. Each string is
    // null-terminated; an extra null terminates the set. A set opening
    // with two nulls is empty, while a single leading null followed by
    // more text is an empty first string.
    fn read_strings(&mut self) -> Result<Vec<String>> {
        let mut strings = Vec::new();

        let mut byte = self.read_u8()?;
        if byte == 0 {
            let next = self.read_u8()?;
            if next == 0 {
                return Ok(strings);
            }
            strings.push(String::new());
            byte = next;
        }

        loop {
            let mut raw = Vec::new();
            while byte != 0 {
                raw.push(byte);
                byte = self.read_u8()?;
            }
            strings.push(String::from_utf8_lossy(&raw).into_owned());

            let next = self.read_u8()?;
            if next == 0 {
                return Ok(strings);
            }
            byte = next;
        }
    }

    fn read_u8(&mut self) -> Result<u8> {
        let mut b = [0u8; 1];
        self.read_exact(&mut b)?;
        Ok(b[0])
    }

    fn read_exact(&mut self, b: &mut [u8]) -> Result<()> {
        self.stream.read_exact(b).map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => SmbiosError::Truncated,
            _ => SmbiosError::Io(err),
        })
    }
}
