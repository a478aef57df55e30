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
*/

//! File format parser for MacBinary I, II and III.
//! A MacBinary file is a fixed 128-byte header followed by the data fork and the resource fork,
//! each padded to a multiple of 128 bytes.
//! https://github.com/mietek/theunarchiver/wiki/MacBinarySpecs

use binrw::{BinRead, BinReaderExt};

use crate::{
    file_parsers::crc::crc16_xmodem,
    io::{Cursor, ReadSeek},
    types::{
        flags::FinderFlags,
        mac_file::{MacBinaryFile, MacBinaryVersion, MacFile},
        FourCC,
    },
    util::{bytes_to_string, read_all, read_bytes_at},
    MacDiskError,
};

pub const MACBINARY_HEADER_SIZE: usize = 128;
pub const MACBINARY_BLOCK_SIZE: usize = 128;
pub const MACBINARY_MAX_NAME_LEN: u8 = 63;
pub const MACBINARY_MAX_FORK_LEN: i32 = 0x007F_FFFF;
pub const MACBINARY_III_SIGNATURE: &[u8; 4] = b"mBIN";
/// The header CRC covers bytes 0x00 to 0x7B.
const MACBINARY_CRC_SPAN: usize = 0x7C;

/// The MacBinary header. Offsets are noted for each field; integers are big-endian.
#[allow(dead_code)]
#[derive(Debug, BinRead)]
#[br(big)]
pub struct MacBinaryHeader {
    /// 0x00: Must be zero.
    old_version: u8,
    /// 0x01
    name_len: u8,
    /// 0x02: Only `name_len` bytes are significant.
    name: [u8; 63],
    /// 0x41
    file_type: [u8; 4],
    /// 0x45
    file_creator: [u8; 4],
    /// 0x49: Finder flags, bits 8-15.
    finder_flags_hi: u8,
    /// 0x4A: Must be zero.
    zero_fill_1: u8,
    /// 0x4B
    vertical_pos: u16,
    /// 0x4D
    horizontal_pos: u16,
    /// 0x4F
    window_id: u16,
    /// 0x51
    protected: u8,
    /// 0x52: Must be zero.
    zero_fill_2: u8,
    /// 0x53
    data_fork_len: i32,
    /// 0x57
    resource_fork_len: i32,
    /// 0x5B
    created: u32,
    /// 0x5F
    modified: u32,
    /// 0x63
    comment_len: u16,
    /// 0x65: Finder flags, bits 0-7. MacBinary II and later.
    finder_flags_lo: u8,
    /// 0x66: 'mBIN' for MacBinary III.
    signature: [u8; 4],
    /// 0x6A
    script: u8,
    /// 0x6B
    extended_finder_flags: u8,
    /// 0x6C
    _unused: [u8; 8],
    /// 0x74
    unpacked_len: u32,
    /// 0x78: Secondary header length, skipped rounded up to 128 bytes. MacBinary II and later.
    secondary_header_len: u16,
    /// 0x7A
    version: u8,
    /// 0x7B
    min_version: u8,
    /// 0x7C: CRC of bytes 0x00-0x7B. MacBinary II and later.
    crc: u16,
    /// 0x7E
    _reserved: u16,
}

impl MacBinaryHeader {
    /// Read the fixed header from the start of `buf`.
    pub fn read_from(buf: &[u8]) -> Result<MacBinaryHeader, MacDiskError> {
        let header_bytes = read_bytes_at(buf, 0, MACBINARY_HEADER_SIZE)?;
        Ok(Cursor::new(header_bytes).read_be::<MacBinaryHeader>()?)
    }

    /// Check header fields in the order they appear, naming the first field found invalid.
    pub fn validate(&self) -> Result<(), MacDiskError> {
        if self.old_version != 0 {
            return Err(MacDiskError::MalformedHeader { field: "old_version" });
        }
        if !(1..=MACBINARY_MAX_NAME_LEN).contains(&self.name_len) {
            return Err(MacDiskError::MalformedHeader {
                field: "file_name_length",
            });
        }
        if self.zero_fill_1 != 0 {
            return Err(MacDiskError::MalformedHeader { field: "zero_fill_1" });
        }
        if self.zero_fill_2 != 0 {
            return Err(MacDiskError::MalformedHeader { field: "zero_fill_2" });
        }
        if !(0..=MACBINARY_MAX_FORK_LEN).contains(&self.data_fork_len) {
            return Err(MacDiskError::MalformedHeader {
                field: "data_fork_length",
            });
        }
        if !(0..=MACBINARY_MAX_FORK_LEN).contains(&self.resource_fork_len) {
            return Err(MacDiskError::MalformedHeader {
                field: "resource_fork_length",
            });
        }
        Ok(())
    }

    pub fn file_name(&self) -> String {
        let len = (self.name_len as usize).min(self.name.len());
        bytes_to_string(&self.name[..len])
    }

    pub fn finder_flags(&self) -> FinderFlags {
        FinderFlags::from_bytes(self.finder_flags_hi, self.finder_flags_lo)
    }

    /// Validated fork lengths are never negative.
    pub fn data_fork_len(&self) -> usize {
        self.data_fork_len.max(0) as usize
    }

    pub fn resource_fork_len(&self) -> usize {
        self.resource_fork_len.max(0) as usize
    }

    pub fn secondary_header_len(&self) -> usize {
        self.secondary_header_len as usize
    }
}

pub struct MacBinaryFormat;

impl MacBinaryFormat {
    /// MacBinary has no conventional extension. It is selected explicitly or by detection.
    pub(crate) fn extensions() -> Vec<&'static str> {
        Vec::new()
    }

    pub(crate) fn detect(buf: &[u8]) -> bool {
        match MacBinaryHeader::read_from(buf) {
            Ok(header) => header.validate().is_ok(),
            Err(_) => false,
        }
    }

    /// Determine the MacBinary revision that produced a header.
    pub fn version(buf: &[u8]) -> Option<MacBinaryVersion> {
        let header = read_bytes_at(buf, 0, MACBINARY_HEADER_SIZE).ok()?;
        if &header[0x66..0x6A] == MACBINARY_III_SIGNATURE {
            return Some(MacBinaryVersion::III);
        }
        let stored_crc = u16::from_be_bytes([header[MACBINARY_CRC_SPAN], header[MACBINARY_CRC_SPAN + 1]]);
        if stored_crc == crc16_xmodem(&header[..MACBINARY_CRC_SPAN]) {
            Some(MacBinaryVersion::II)
        }
        else {
            Some(MacBinaryVersion::I)
        }
    }

    pub fn load<RS: ReadSeek>(mut read_buf: RS) -> Result<MacBinaryFile, MacDiskError> {
        let buf = read_all(&mut read_buf)?;
        MacBinaryFormat::decode(&buf)
    }

    pub fn decode(buf: &[u8]) -> Result<MacBinaryFile, MacDiskError> {
        let header = MacBinaryHeader::read_from(buf)?;
        header.validate()?;

        let version = MacBinaryFormat::version(buf).unwrap_or(MacBinaryVersion::I);
        let data_len = header.data_fork_len();
        let resource_len = header.resource_fork_len();

        log::debug!(
            "MacBinary::decode(): {} name: {:?} type: {} creator: {} data: {} resource: {}",
            version,
            header.file_name(),
            FourCC(header.file_type),
            FourCC(header.file_creator),
            data_len,
            resource_len
        );

        // MacBinary I has no secondary header; its data fork always follows the fixed header.
        let secondary_len = match version {
            MacBinaryVersion::I => 0,
            _ => padded_len(header.secondary_header_len()),
        };
        let mut offset = MACBINARY_HEADER_SIZE + secondary_len;

        let data_fork = read_bytes_at(buf, offset, data_len)?.to_vec();
        offset += data_len;

        let resource_fork = if resource_len > 0 {
            // The data fork's padding must be present when a resource fork follows it.
            offset += padded_len(data_len) - data_len;
            read_bytes_at(buf, offset, resource_len)?.to_vec()
        }
        else {
            Vec::new()
        };

        Ok(MacBinaryFile {
            file: MacFile::new(
                header.file_name(),
                FourCC(header.file_type),
                FourCC(header.file_creator),
                header.finder_flags(),
                data_fork,
                resource_fork,
            ),
            version,
        })
    }
}

/// Round a length up to the next multiple of the 128-byte block size.
fn padded_len(len: usize) -> usize {
    len.div_ceil(MACBINARY_BLOCK_SIZE) * MACBINARY_BLOCK_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(name: &[u8], data_len: i32, resource_len: i32) -> Vec<u8> {
        let mut header = vec![0u8; MACBINARY_HEADER_SIZE];
        header[0x01] = name.len() as u8;
        header[0x02..0x02 + name.len()].copy_from_slice(name);
        header[0x41..0x45].copy_from_slice(b"dImg");
        header[0x45..0x49].copy_from_slice(b"dCpy");
        header[0x49] = 0x01;
        header[0x53..0x57].copy_from_slice(&data_len.to_be_bytes());
        header[0x57..0x5B].copy_from_slice(&resource_len.to_be_bytes());
        header[0x65] = 0x20;
        header
    }

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(1), 128);
        assert_eq!(padded_len(128), 128);
        assert_eq!(padded_len(409_684), 409_728);
    }

    #[test]
    fn test_decode_forks() {
        let mut buf = header(b"Disk", 3, 2);
        buf.extend_from_slice(&[1, 2, 3]);
        buf.extend_from_slice(&[0; 125]);
        buf.extend_from_slice(&[9, 8]);
        buf.extend_from_slice(&[0; 126]);

        let file = MacBinaryFormat::decode(&buf).unwrap();
        assert_eq!(file.version(), MacBinaryVersion::I);
        assert_eq!(file.file().file_name(), "Disk");
        assert_eq!(file.file().file_type().to_string(), "dImg");
        assert_eq!(file.file().file_creator().to_string(), "dCpy");
        assert_eq!(file.file().finder_flags().bits(), 0x0120);
        assert_eq!(file.file().data_fork(), &[1, 2, 3]);
        assert_eq!(file.file().resource_fork(), &[9, 8]);
    }

    #[test]
    fn test_empty_forks() {
        let buf = header(b"Empty", 0, 0);
        let file = MacBinaryFormat::decode(&buf).unwrap();
        assert!(file.file().data_fork().is_empty());
        assert!(file.file().resource_fork().is_empty());
    }

    #[test]
    fn test_unpadded_data_fork_without_resource_fork() {
        let mut buf = header(b"Disk", 3, 0);
        buf.extend_from_slice(&[1, 2, 3]);
        assert_eq!(MacBinaryFormat::decode(&buf).unwrap().file().data_fork(), &[1, 2, 3]);
    }

    #[test]
    fn test_name_length_out_of_range() {
        let mut buf = header(b"Disk", 0, 0);
        buf[0x01] = 0;
        assert_eq!(
            MacBinaryFormat::decode(&buf),
            Err(MacDiskError::MalformedHeader {
                field: "file_name_length",
            })
        );
        buf[0x01] = 64;
        assert!(MacBinaryFormat::decode(&buf).is_err());
    }

    #[test]
    fn test_sentinels() {
        let mut buf = header(b"Disk", 0, 0);
        buf[0x00] = 1;
        assert_eq!(
            MacBinaryFormat::decode(&buf),
            Err(MacDiskError::MalformedHeader { field: "old_version" })
        );

        let mut buf = header(b"Disk", 0, 0);
        buf[0x4A] = 1;
        assert_eq!(
            MacBinaryFormat::decode(&buf),
            Err(MacDiskError::MalformedHeader { field: "zero_fill_1" })
        );

        let mut buf = header(b"Disk", 0, 0);
        buf[0x52] = 1;
        assert_eq!(
            MacBinaryFormat::decode(&buf),
            Err(MacDiskError::MalformedHeader { field: "zero_fill_2" })
        );
    }

    #[test]
    fn test_fork_length_range() {
        let buf = header(b"Disk", 0x0080_0000, 0);
        assert_eq!(
            MacBinaryFormat::decode(&buf),
            Err(MacDiskError::MalformedHeader {
                field: "data_fork_length",
            })
        );
        let buf = header(b"Disk", 0, -1);
        assert_eq!(
            MacBinaryFormat::decode(&buf),
            Err(MacDiskError::MalformedHeader {
                field: "resource_fork_length",
            })
        );
    }

    #[test]
    fn test_truncated() {
        assert!(matches!(
            MacBinaryFormat::decode(&[0u8; 100]),
            Err(MacDiskError::TruncatedInput(_))
        ));

        let mut buf = header(b"Disk", 200, 0);
        buf.extend_from_slice(&[0; 199]);
        assert!(matches!(
            MacBinaryFormat::decode(&buf),
            Err(MacDiskError::TruncatedInput(_))
        ));
    }

    #[test]
    fn test_version_detection() {
        let mut buf = header(b"Disk", 0, 0);
        let crc = crc16_xmodem(&buf[..0x7C]);
        buf[0x7C..0x7E].copy_from_slice(&crc.to_be_bytes());
        assert_eq!(MacBinaryFormat::version(&buf), Some(MacBinaryVersion::II));

        buf[0x66..0x6A].copy_from_slice(MACBINARY_III_SIGNATURE);
        assert_eq!(MacBinaryFormat::version(&buf), Some(MacBinaryVersion::III));
        assert_eq!(MacBinaryFormat::version(&buf[..64]), None);
    }

    #[test]
    fn test_secondary_header_skipped() {
        let mut buf = header(b"Disk", 2, 0);
        buf[0x78..0x7A].copy_from_slice(&10u16.to_be_bytes());
        let crc = crc16_xmodem(&buf[..0x7C]);
        buf[0x7C..0x7E].copy_from_slice(&crc.to_be_bytes());
        buf.extend_from_slice(&[0xEE; 128]);
        buf.extend_from_slice(&[5, 6]);
        assert_eq!(MacBinaryFormat::decode(&buf).unwrap().file().data_fork(), &[5, 6]);
    }

    #[test]
    fn test_secondary_header_ignored_for_macbinary_i() {
        // No header CRC, so the length at 0x78 is not a MacBinary II field.
        let mut buf = header(b"Disk", 2, 0);
        buf[0x78..0x7A].copy_from_slice(&10u16.to_be_bytes());
        buf.extend_from_slice(&[5, 6]);

        let file = MacBinaryFormat::decode(&buf).unwrap();
        assert_eq!(file.version(), MacBinaryVersion::I);
        assert_eq!(file.file().data_fork(), &[5, 6]);
    }

    #[test]
    fn test_load_matches_decode() {
        let mut buf = header(b"Disk", 3, 2);
        buf.extend_from_slice(&[1, 2, 3]);
        buf.extend_from_slice(&[0; 125]);
        buf.extend_from_slice(&[9, 8]);

        let loaded = MacBinaryFormat::load(Cursor::new(buf.clone())).unwrap();
        assert_eq!(Ok(loaded), MacBinaryFormat::decode(&buf));

        buf.truncate(buf.len() - 1);
        assert!(matches!(
            MacBinaryFormat::load(Cursor::new(buf)),
            Err(MacDiskError::TruncatedInput(_))
        ));
    }
}
