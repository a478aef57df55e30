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

//! File format parser for Apple DiskCopy 4.2 images.
//! A DiskCopy 4.2 image is a 0x54-byte header followed by the raw sector data of a 400K, 800K or
//! 1440K floppy, then optional tag data.
//! https://www.bigmessowires.com/2013/12/16/macintosh-diskcopy-4-2-floppy-image-converter/

use binrw::BinReaderExt;

use crate::{
    io::{Cursor, ReadSeek},
    types::disk_copy::{DiskCopyHeader, DiskCopyImage, FloppySize, DC42_HEADER_SIZE, DC42_MAGIC},
    util::{get_length, read_all, read_bytes_at},
    MacDiskError,
    KIB,
};

/// The smallest input that could hold a DiskCopy 4.2 image.
pub const DC42_MIN_SIZE: usize = 400 * KIB;
const DC42_MAGIC_OFFSET: usize = 0x52;

pub struct Dc42Format;

impl Dc42Format {
    pub(crate) fn extensions() -> Vec<&'static str> {
        vec!["img", "image"]
    }

    pub(crate) fn detect(buf: &[u8]) -> bool {
        Dc42Format::read_header(buf)
            .map(|(_, header)| FloppySize::try_from(header.data_size()).is_ok())
            .unwrap_or(false)
    }

    /// Decode a DiskCopy 4.2 image from a seekable source. The stream length is checked before
    /// anything is read.
    pub fn load<RS: ReadSeek>(mut read_buf: RS) -> Result<DiskCopyImage, MacDiskError> {
        let raw_len = usize::try_from(get_length(&mut read_buf)?)
            .map_err(|_| MacDiskError::IoError("stream length exceeds addressable memory".to_string()))?;
        if raw_len < DC42_MIN_SIZE {
            return Err(MacDiskError::TooSmall(raw_len));
        }
        let buf = read_all(&mut read_buf)?;
        Dc42Format::decode(&buf)
    }

    pub fn decode(buf: &[u8]) -> Result<DiskCopyImage, MacDiskError> {
        if buf.len() < DC42_MIN_SIZE {
            return Err(MacDiskError::TooSmall(buf.len()));
        }

        let (raw_header, header) = Dc42Format::read_header(buf)?;

        let floppy_size =
            FloppySize::try_from(header.data_size()).map_err(MacDiskError::UnsupportedImageSize)?;

        log::debug!(
            "Dc42::decode(): name: {:?} size: {} tag size: {} encoding: {:02X} format: {:02X}",
            header.image_name(),
            floppy_size,
            header.tag_size(),
            header.disk_encoding(),
            header.format_byte()
        );

        let data = read_bytes_at(buf, DC42_HEADER_SIZE, floppy_size.size())?.to_vec();

        Ok(DiskCopyImage {
            raw_header,
            header,
            floppy_size,
            data,
        })
    }

    /// Copy the raw header and check its magic bytes.
    fn read_header(buf: &[u8]) -> Result<([u8; DC42_HEADER_SIZE], DiskCopyHeader), MacDiskError> {
        let mut raw_header = [0u8; DC42_HEADER_SIZE];
        raw_header.copy_from_slice(read_bytes_at(buf, 0, DC42_HEADER_SIZE)?);

        if raw_header[DC42_MAGIC_OFFSET] != 0x01 || raw_header[DC42_MAGIC_OFFSET + 1] != 0x00 {
            return Err(MacDiskError::NotDiskCopyFormat);
        }

        let header: DiskCopyHeader = Cursor::new(&raw_header[..]).read_be()?;
        debug_assert_eq!(header.magic(), DC42_MAGIC);
        Ok((raw_header, header))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(data_size: u32, payload_len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; DC42_HEADER_SIZE + payload_len];
        buf[0] = 8;
        buf[1..9].copy_from_slice(b"Blank800");
        buf[0x40..0x44].copy_from_slice(&data_size.to_be_bytes());
        buf[0x50] = 0x01;
        buf[0x51] = 0x22;
        buf[0x52] = 0x01;
        buf[0x53] = 0x00;
        for (i, byte) in buf[DC42_HEADER_SIZE..].iter_mut().enumerate() {
            *byte = (i % 251) as u8;
        }
        buf
    }

    #[test]
    fn test_decode_800k() {
        let buf = image(0x000C_8000, 800 * KIB);
        let img = Dc42Format::decode(&buf).unwrap();
        assert_eq!(img.floppy_size(), FloppySize::Gcr800K);
        assert_eq!(img.data(), &buf[DC42_HEADER_SIZE..]);
        assert_eq!(&img.raw_header()[..], &buf[..DC42_HEADER_SIZE]);
        assert_eq!(img.header().image_name(), "Blank800");
        assert_eq!(img.header().disk_encoding(), 0x01);
        assert_eq!(img.header().format_byte(), 0x22);
    }

    #[test]
    fn test_trailing_tag_data_ignored() {
        let mut buf = image(400 * 1024, 400 * KIB);
        buf.extend_from_slice(&[0xAA; 9600]);
        let img = Dc42Format::decode(&buf).unwrap();
        assert_eq!(img.data().len(), 400 * KIB);
        assert_eq!(img.data(), &buf[DC42_HEADER_SIZE..DC42_HEADER_SIZE + 400 * KIB]);
    }

    #[test]
    fn test_too_small() {
        let buf = image(400 * 1024, 400 * KIB - DC42_HEADER_SIZE - 1);
        assert_eq!(Dc42Format::decode(&buf), Err(MacDiskError::TooSmall(400 * KIB - 1)));
    }

    #[test]
    fn test_bad_magic() {
        let mut buf = image(800 * 1024, 800 * KIB);
        buf[0x53] = 0x01;
        assert_eq!(Dc42Format::decode(&buf), Err(MacDiskError::NotDiskCopyFormat));
        buf[0x53] = 0x00;
        buf[0x52] = 0x00;
        assert_eq!(Dc42Format::decode(&buf), Err(MacDiskError::NotDiskCopyFormat));
    }

    #[test]
    fn test_unsupported_size() {
        let buf = image(500 * 1024, 800 * KIB);
        assert_eq!(
            Dc42Format::decode(&buf),
            Err(MacDiskError::UnsupportedImageSize(500 * 1024))
        );
    }

    #[test]
    fn test_data_truncated() {
        // Large enough to pass the size check, but not to hold the declared 800K of data.
        let buf = image(800 * 1024, 600 * KIB);
        assert!(matches!(Dc42Format::decode(&buf), Err(MacDiskError::TruncatedInput(_))));
    }

    #[test]
    fn test_load_from_stream() {
        let buf = image(1440 * 1024, 1440 * KIB);
        let img = Dc42Format::load(Cursor::new(buf.clone())).unwrap();
        assert_eq!(img.floppy_size(), FloppySize::Mfm1440K);
        assert_eq!(img.into_data(), buf[DC42_HEADER_SIZE..].to_vec());

        let small = Cursor::new(vec![0u8; 1000]);
        assert_eq!(Dc42Format::load(small).unwrap_err(), MacDiskError::TooSmall(1000));
    }

    #[test]
    fn test_detect() {
        assert!(Dc42Format::detect(&image(800 * 1024, 0)));
        assert!(!Dc42Format::detect(&image(500 * 1024, 0)));
        assert!(!Dc42Format::detect(&[0u8; 0x40]));
    }
}
