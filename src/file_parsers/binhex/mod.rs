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

//! File format parser for BinHex 4.0 (.hqx) files.
//! BinHex is a 7-bit ASCII encoding of a two-fork Macintosh file: the file's header and forks are
//! RLE90 compressed, then encoded with a 64-character alphabet between a pair of colons.
//! http://files.stairways.com/other/binhex-40-specs-info.txt

pub mod six_bit;

use crate::{
    file_parsers::compression::rle90,
    io::ReadSeek,
    types::{
        mac_file::{BinHexFile, MacFile},
        FourCC,
    },
    util::{read_all, ByteCursor},
    MacDiskError,
};

pub const BINHEX_SIGNATURE: &str = "(This file must be converted with BinHex 4.0)";
pub const BINHEX_DELIMITER: char = ':';

pub struct BinHexFormat;

impl BinHexFormat {
    pub(crate) fn extensions() -> Vec<&'static str> {
        vec!["hqx"]
    }

    pub(crate) fn detect(buf: &[u8]) -> bool {
        String::from_utf8_lossy(buf).contains(BINHEX_SIGNATURE)
    }

    /// Decode BinHex text read from a seekable source.
    pub fn load<RS: ReadSeek>(mut read_buf: RS) -> Result<BinHexFile, MacDiskError> {
        let buf = read_all(&mut read_buf)?;
        BinHexFormat::decode(&buf)
    }

    /// Decode BinHex text held in a byte buffer. Invalid UTF-8 sequences can only appear outside
    /// the encoded payload of a valid file, so they are decoded lossily.
    pub fn decode(buf: &[u8]) -> Result<BinHexFile, MacDiskError> {
        BinHexFormat::decode_text(&String::from_utf8_lossy(buf))
    }

    /// Decode BinHex text.
    pub fn decode_text(text: &str) -> Result<BinHexFile, MacDiskError> {
        let payload = BinHexFormat::payload(text)?;
        log::trace!("BinHex::decode_text(): Encoded payload is {} chars", payload.len());

        let compressed = six_bit::decode(payload)?;
        let stream = rle90::expand(&compressed)?;
        log::debug!(
            "BinHex::decode_text(): Decoded {} bytes, expanded to {} bytes",
            compressed.len(),
            stream.len()
        );

        BinHexFormat::parse_stream(&stream)
    }

    /// Locate the encoded text between the colons following the signature line.
    fn payload(text: &str) -> Result<&str, MacDiskError> {
        let header_idx = text.find(BINHEX_SIGNATURE).ok_or(MacDiskError::MissingHeader)?;

        let search_start = header_idx + BINHEX_SIGNATURE.len();
        let start_idx = text[search_start..]
            .find(BINHEX_DELIMITER)
            .map(|i| search_start + i)
            .ok_or(MacDiskError::MissingDelimiter("starting"))?;

        let payload_start = start_idx + BINHEX_DELIMITER.len_utf8();
        let end_idx = text[payload_start..]
            .find(BINHEX_DELIMITER)
            .map(|i| payload_start + i)
            .ok_or(MacDiskError::MissingDelimiter("ending"))?;

        Ok(&text[payload_start..end_idx])
    }

    /// Parse the uncompressed BinHex stream: header, data fork and resource fork, each followed
    /// by a CRC.
    fn parse_stream(stream: &[u8]) -> Result<BinHexFile, MacDiskError> {
        let mut cursor = ByteCursor::new(stream);

        let name_len = cursor.read_u8()? as usize;
        let file_name = cursor.read_string(name_len)?;

        if cursor.read_u8()? != 0 {
            return Err(MacDiskError::MalformedHeader { field: "version" });
        }

        let file_type = FourCC(cursor.read_array::<4>()?);
        let file_creator = FourCC(cursor.read_array::<4>()?);
        let finder_flags = cursor.read_u16_be()?;
        let data_len = fork_length(cursor.read_i32_be()?, "data_fork_length")?;
        let resource_len = fork_length(cursor.read_i32_be()?, "resource_fork_length")?;
        let header_crc = cursor.read_u16_be()?;

        log::trace!(
            "BinHex::parse_stream(): name: {:?} type: {} creator: {} data: {} resource: {}",
            file_name,
            file_type,
            file_creator,
            data_len,
            resource_len
        );

        let data_fork = cursor.read_bytes(data_len)?.to_vec();
        let data_crc = cursor.read_u16_be()?;
        let resource_fork = cursor.read_bytes(resource_len)?.to_vec();
        let resource_crc = cursor.read_u16_be()?;

        if cursor.remaining() > 0 {
            log::trace!(
                "BinHex::parse_stream(): Ignoring {} trailing byte(s) of group padding",
                cursor.remaining()
            );
        }

        Ok(BinHexFile {
            file: MacFile::new(
                file_name,
                file_type,
                file_creator,
                finder_flags.into(),
                data_fork,
                resource_fork,
            ),
            header_crc,
            data_crc,
            resource_crc,
        })
    }
}

/// Fork lengths are stored signed. A negative length is rejected rather than reinterpreted.
fn fork_length(len: i32, field: &'static str) -> Result<usize, MacDiskError> {
    usize::try_from(len).map_err(|_| MacDiskError::MalformedHeader { field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Cursor;

    /// A stream holding file "A" of type TEXT/ttxt with a 2-byte data fork and empty resource fork.
    fn small_stream() -> Vec<u8> {
        let mut stream = vec![1, b'A', 0];
        stream.extend_from_slice(b"TEXTttxt");
        stream.extend_from_slice(&[0x01, 0x00]);
        stream.extend_from_slice(&2i32.to_be_bytes());
        stream.extend_from_slice(&0i32.to_be_bytes());
        stream.extend_from_slice(&[0xAB, 0xCD]);
        stream.extend_from_slice(&[0x11, 0x22]);
        stream.extend_from_slice(&[0x12, 0x34]);
        stream.extend_from_slice(&[0x00, 0x00]);
        stream
    }

    #[test]
    fn test_parse_stream() {
        let file = BinHexFormat::parse_stream(&small_stream()).unwrap();
        assert_eq!(file.file().file_name(), "A");
        assert_eq!(file.file().file_type(), FourCC(*b"TEXT"));
        assert_eq!(file.file().file_creator(), FourCC(*b"ttxt"));
        assert_eq!(file.file().finder_flags().bits(), 0x0100);
        assert_eq!(file.file().data_fork(), &[0x11, 0x22]);
        assert!(file.file().resource_fork().is_empty());
        assert_eq!(file.header_crc(), 0xABCD);
        assert_eq!(file.data_crc(), 0x1234);
        assert_eq!(file.resource_crc(), 0);
    }

    #[test]
    fn test_parse_stream_ignores_padding() {
        let mut stream = small_stream();
        stream.extend_from_slice(&[0; 5]);
        assert!(BinHexFormat::parse_stream(&stream).is_ok());
    }

    #[test]
    fn test_parse_stream_bad_version() {
        let mut stream = small_stream();
        stream[2] = 1;
        assert_eq!(
            BinHexFormat::parse_stream(&stream),
            Err(MacDiskError::MalformedHeader { field: "version" })
        );
    }

    #[test]
    fn test_parse_stream_negative_fork_length() {
        let mut stream = small_stream();
        stream[13..17].copy_from_slice(&(-1i32).to_be_bytes());
        assert_eq!(
            BinHexFormat::parse_stream(&stream),
            Err(MacDiskError::MalformedHeader {
                field: "data_fork_length",
            })
        );
    }

    #[test]
    fn test_parse_stream_truncated() {
        let stream = small_stream();
        for len in [0, 1, 5, 20, stream.len() - 1] {
            assert!(matches!(
                BinHexFormat::parse_stream(&stream[..len]),
                Err(MacDiskError::TruncatedInput(_))
            ));
        }
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            BinHexFormat::decode_text(":!!!!!!!!:"),
            Err(MacDiskError::MissingHeader)
        );
    }

    #[test]
    fn test_missing_delimiters() {
        let text = format!("{}\n!!!!!!!!", BINHEX_SIGNATURE);
        assert_eq!(
            BinHexFormat::decode_text(&text),
            Err(MacDiskError::MissingDelimiter("starting"))
        );
        let text = format!("{}\n:!!!!!!!!", BINHEX_SIGNATURE);
        assert_eq!(
            BinHexFormat::decode_text(&text),
            Err(MacDiskError::MissingDelimiter("ending"))
        );
    }

    #[test]
    fn test_colon_before_signature_is_ignored() {
        let text = format!("Note: see below\n{}\n:!!!!!!!!:", BINHEX_SIGNATURE);
        assert_eq!(BinHexFormat::payload(&text), Ok("!!!!!!!!"));
    }

    #[test]
    fn test_invalid_character_in_payload() {
        let text = format!("{}\n:!!!7!!!!:", BINHEX_SIGNATURE);
        assert!(matches!(
            BinHexFormat::decode_text(&text),
            Err(MacDiskError::InvalidCharacter { character: '7', .. })
        ));
    }

    #[test]
    fn test_empty_name_stream_is_truncated() {
        // Six zero bytes: empty name, version 0, then the stream runs out in the type field.
        let text = format!("{}\n:!!!!!!!!:", BINHEX_SIGNATURE);
        assert!(matches!(
            BinHexFormat::decode_text(&text),
            Err(MacDiskError::TruncatedInput(_))
        ));
    }

    #[test]
    fn test_load_applies_decode_checks() {
        let text = format!("{}\n:!!!!!!!!:", BINHEX_SIGNATURE);
        assert!(matches!(
            BinHexFormat::load(Cursor::new(text.into_bytes())),
            Err(MacDiskError::TruncatedInput(_))
        ));
        assert_eq!(
            BinHexFormat::load(Cursor::new(b":!!!!!!!!:".to_vec())),
            Err(MacDiskError::MissingHeader)
        );
    }
}
