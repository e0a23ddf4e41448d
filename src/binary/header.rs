// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fixed header for the scored-index binary stream (§4.8).
//!
//! Deliberately tiny: magic bytes plus a format version, nothing else. The
//! seek map built alongside the stream is the authority on record
//! boundaries, not an in-file footer — records are appended incrementally
//! during serialization and a whole-file footer would mean buffering the
//! entire stream before any byte could be written.

use std::io::{self, Read, Write};

pub const MAGIC: [u8; 4] = *b"IIDX";
pub const VERSION: u8 = 1;

pub struct IndexHeader {
    pub version: u8,
}

impl IndexHeader {
    pub const SIZE: usize = 5;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_all(&[self.version])?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "bad index file magic",
            ));
        }
        let mut version = [0u8; 1];
        r.read_exact(&mut version)?;
        Ok(IndexHeader {
            version: version[0],
        })
    }
}
