/*
    mac2dsk
    https://github.com/dbalsom/fluxfox

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    src/types/mac_file.rs

    A decoded two-fork Macintosh file, and the format-specific records that
    embed it.
*/
use std::fmt::{self, Display, Formatter};

use crate::types::{flags::FinderFlags, FourCC};

/// The fields shared by every decoded Macintosh file, independent of the container that carried it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MacFile {
    file_name: String,
    file_type: FourCC,
    file_creator: FourCC,
    finder_flags: FinderFlags,
    data_fork: Vec<u8>,
    resource_fork: Vec<u8>,
}

impl MacFile {
    pub fn new(
        file_name: String,
        file_type: FourCC,
        file_creator: FourCC,
        finder_flags: FinderFlags,
        data_fork: Vec<u8>,
        resource_fork: Vec<u8>,
    ) -> Self {
        Self {
            file_name,
            file_type,
            file_creator,
            finder_flags,
            data_fork,
            resource_fork,
        }
    }

    /// The file name. Each char holds one raw Mac Roman byte.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The file name as the raw bytes it was decoded from.
    pub fn file_name_bytes(&self) -> Vec<u8> {
        self.file_name.chars().map(|c| c as u32 as u8).collect()
    }

    pub fn file_type(&self) -> FourCC {
        self.file_type
    }

    pub fn file_creator(&self) -> FourCC {
        self.file_creator
    }

    pub fn finder_flags(&self) -> FinderFlags {
        self.finder_flags
    }

    pub fn data_fork(&self) -> &[u8] {
        &self.data_fork
    }

    pub fn resource_fork(&self) -> &[u8] {
        &self.resource_fork
    }

    pub fn into_data_fork(self) -> Vec<u8> {
        self.data_fork
    }
}

/// A file decoded from BinHex 4.0. The CRCs are carried as found in the stream and are not verified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinHexFile {
    pub(crate) file: MacFile,
    pub(crate) header_crc: u16,
    pub(crate) data_crc: u16,
    pub(crate) resource_crc: u16,
}

impl BinHexFile {
    pub fn file(&self) -> &MacFile {
        &self.file
    }

    pub fn header_crc(&self) -> u16 {
        self.header_crc
    }

    pub fn data_crc(&self) -> u16 {
        self.data_crc
    }

    pub fn resource_crc(&self) -> u16 {
        self.resource_crc
    }
}

/// MacBinary revision, as inferred from the header.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MacBinaryVersion {
    I,
    II,
    III,
}

impl Display for MacBinaryVersion {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            MacBinaryVersion::I => write!(f, "MacBinary I"),
            MacBinaryVersion::II => write!(f, "MacBinary II"),
            MacBinaryVersion::III => write!(f, "MacBinary III"),
        }
    }
}

/// A file decoded from MacBinary. The header's zero-fill sentinels are validated but not kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacBinaryFile {
    pub(crate) file: MacFile,
    pub(crate) version: MacBinaryVersion,
}

impl MacBinaryFile {
    pub fn file(&self) -> &MacFile {
        &self.file
    }

    pub fn version(&self) -> MacBinaryVersion {
        self.version
    }
}

/// A decoded Macintosh file together with the container-specific fields it was decoded with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MacFileRecord {
    BinHex(BinHexFile),
    MacBinary(MacBinaryFile),
}

impl MacFileRecord {
    pub fn file(&self) -> &MacFile {
        match self {
            MacFileRecord::BinHex(record) => &record.file,
            MacFileRecord::MacBinary(record) => &record.file,
        }
    }

    pub fn into_file(self) -> MacFile {
        match self {
            MacFileRecord::BinHex(record) => record.file,
            MacFileRecord::MacBinary(record) => record.file,
        }
    }

    pub fn into_data_fork(self) -> Vec<u8> {
        self.into_file().into_data_fork()
    }
}

impl From<BinHexFile> for MacFileRecord {
    fn from(record: BinHexFile) -> Self {
        MacFileRecord::BinHex(record)
    }
}

impl From<MacBinaryFile> for MacFileRecord {
    fn from(record: MacBinaryFile) -> Self {
        MacFileRecord::MacBinary(record)
    }
}
