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

    src/types/disk_copy.rs

    A DiskCopy 4.2 image: the fixed 0x54-byte header and the raw sector data
    it describes.
*/
use std::fmt::{self, Display, Formatter};

use binrw::BinRead;

use crate::{file_parsers::crc::dc42_checksum, util::bytes_to_string, KIB};

pub const DC42_HEADER_SIZE: usize = 0x54;
pub const DC42_MAGIC: u16 = 0x0100;

/// The three floppy sizes a DiskCopy 4.2 image may contain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum FloppySize {
    /// 400K single-sided GCR
    Gcr400K,
    /// 800K double-sided GCR
    Gcr800K,
    /// 1.44M double-sided high density MFM
    Mfm1440K,
}

impl FloppySize {
    pub fn size(&self) -> usize {
        match self {
            FloppySize::Gcr400K => 400 * KIB,
            FloppySize::Gcr800K => 800 * KIB,
            FloppySize::Mfm1440K => 1440 * KIB,
        }
    }
}

impl TryFrom<u32> for FloppySize {
    type Error = u32;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        match size as usize {
            s if s == 400 * KIB => Ok(FloppySize::Gcr400K),
            s if s == 800 * KIB => Ok(FloppySize::Gcr800K),
            s if s == 1440 * KIB => Ok(FloppySize::Mfm1440K),
            _ => Err(size),
        }
    }
}

impl Display for FloppySize {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            FloppySize::Gcr400K => write!(f, "400K GCR"),
            FloppySize::Gcr800K => write!(f, "800K GCR"),
            FloppySize::Mfm1440K => write!(f, "1440K MFM"),
        }
    }
}

/// Named view of the 0x54-byte DiskCopy 4.2 header. All integers are big-endian.
#[derive(Clone, Debug, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct DiskCopyHeader {
    name_len: u8,
    name: [u8; 63],
    pub(crate) data_size: u32,
    tag_size: u32,
    data_checksum: u32,
    tag_checksum: u32,
    disk_encoding: u8,
    format_byte: u8,
    pub(crate) magic: u16,
}

impl DiskCopyHeader {
    /// The image name, a Pascal string of at most 63 bytes. Each char holds one raw byte.
    pub fn image_name(&self) -> String {
        let len = (self.name_len as usize).min(self.name.len());
        bytes_to_string(&self.name[..len])
    }

    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    pub fn tag_size(&self) -> u32 {
        self.tag_size
    }

    pub fn data_checksum(&self) -> u32 {
        self.data_checksum
    }

    pub fn tag_checksum(&self) -> u32 {
        self.tag_checksum
    }

    /// 0 = 400K GCR, 1 = 800K GCR, 2 = 720K MFM, 3 = 1440K MFM
    pub fn disk_encoding(&self) -> u8 {
        self.disk_encoding
    }

    pub fn format_byte(&self) -> u8 {
        self.format_byte
    }

    pub fn magic(&self) -> u16 {
        self.magic
    }
}

/// A decoded DiskCopy 4.2 image. The length of `data` is always one of the [FloppySize] sizes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiskCopyImage {
    pub(crate) raw_header: [u8; DC42_HEADER_SIZE],
    pub(crate) header: DiskCopyHeader,
    pub(crate) floppy_size: FloppySize,
    pub(crate) data: Vec<u8>,
}

impl DiskCopyImage {
    /// The header exactly as it appeared in the input.
    pub fn raw_header(&self) -> &[u8; DC42_HEADER_SIZE] {
        &self.raw_header
    }

    pub fn header(&self) -> &DiskCopyHeader {
        &self.header
    }

    pub fn floppy_size(&self) -> FloppySize {
        self.floppy_size
    }

    /// The raw sector data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Compute the DiskCopy checksum of the sector data.
    pub fn data_checksum(&self) -> u32 {
        dc42_checksum(&self.data)
    }

    /// Return true if the computed data checksum matches the one stored in the header.
    pub fn checksum_valid(&self) -> bool {
        self.data_checksum() == self.header.data_checksum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_floppy_sizes() {
        let sizes: Vec<usize> = FloppySize::iter().map(|f| f.size()).collect();
        assert_eq!(sizes, vec![409_600, 819_200, 1_474_560]);
        assert_eq!(FloppySize::try_from(0x000C_8000u32), Ok(FloppySize::Gcr800K));
        assert_eq!(FloppySize::try_from(500u32 * 1024), Err(500 * 1024));
    }
}
