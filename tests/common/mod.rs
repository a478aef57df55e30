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

    tests/common/mod.rs

    Common support routines for tests
*/
#![allow(dead_code)]

use hex::encode;
use sha1::{Digest, Sha1};

pub const DC42_HEADER_SIZE: usize = 0x54;
pub const SIZE_400K: usize = 400 * 1024;
pub const SIZE_800K: usize = 800 * 1024;
pub const SIZE_1440K: usize = 1440 * 1024;

pub const BINHEX_SIGNATURE: &str = "(This file must be converted with BinHex 4.0)";
const HQX_ALPHABET: &[u8; 64] = b"!\"#$%&'()*+,-012345689@ABCDEFGHIJKLMNPQRSTUVXYZ[`abcdefhijklmpqr";
const HQX_LINE_LEN: usize = 64;
const RLE_ESCAPE: u8 = 0x90;

pub fn compute_slice_hash(slice: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(slice);
    let result = hasher.finalize();

    encode(result)
}

/// Produce `size` bytes of sector-like data: pseudo-random noise broken up by long runs of
/// repeated bytes, with the RLE escape byte appearing both alone and in runs.
pub fn sector_data(size: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    let mut data = Vec::with_capacity(size);
    while data.len() < size {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let value = (state >> 16) as u8;
        match state % 16 {
            // Runs of fill bytes, longer than a single RLE count can hold.
            0 => data.extend(std::iter::repeat(0xF6).take(300)),
            1 => data.extend(std::iter::repeat(RLE_ESCAPE).take(5)),
            2 => data.push(RLE_ESCAPE),
            3 => data.extend(std::iter::repeat(value).take(3 + (state as usize >> 24) % 20)),
            _ => data.push(value),
        }
    }
    data.truncate(size);
    data
}

pub fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 { (crc << 1) ^ 0x1021 } else { crc << 1 };
        }
    }
    crc
}

pub fn dc42_checksum(data: &[u8]) -> u32 {
    data.chunks_exact(2).fold(0u32, |sum, word| {
        sum.wrapping_add(u16::from_be_bytes([word[0], word[1]]) as u32)
            .rotate_right(1)
    })
}

/// Build a DiskCopy 4.2 image around `data` with a correct data checksum and no tag data.
pub fn build_dc42(name: &str, data: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; DC42_HEADER_SIZE];
    buf[0] = name.len() as u8;
    buf[1..1 + name.len()].copy_from_slice(name.as_bytes());
    buf[0x40..0x44].copy_from_slice(&(data.len() as u32).to_be_bytes());
    buf[0x48..0x4C].copy_from_slice(&dc42_checksum(data).to_be_bytes());
    let (encoding, format) = match data.len() {
        SIZE_400K => (0x00, 0x12),
        SIZE_800K => (0x01, 0x22),
        _ => (0x03, 0x22),
    };
    buf[0x50] = encoding;
    buf[0x51] = format;
    buf[0x52] = 0x01;
    buf[0x53] = 0x00;
    buf.extend_from_slice(data);
    buf
}

/// The fields of a Macintosh file, for building test containers.
#[derive(Clone, Debug)]
pub struct TestFile<'a> {
    pub name: &'a str,
    pub file_type: &'a [u8; 4],
    pub creator: &'a [u8; 4],
    pub flags: u16,
    pub data: &'a [u8],
    pub resource: &'a [u8],
}

impl<'a> TestFile<'a> {
    /// A DiskCopy image file as DiskCopy 4.2 saves it.
    pub fn disk_copy(name: &'a str, data: &'a [u8]) -> Self {
        TestFile {
            name,
            file_type: b"dImg",
            creator: b"dCpy",
            flags: 0x0100,
            data,
            resource: &[],
        }
    }
}

fn padded(len: usize) -> usize {
    len.div_ceil(128) * 128
}

/// Build a MacBinary II file. The data fork is padded to a 128-byte boundary when a resource
/// fork follows.
pub fn build_macbinary(file: &TestFile) -> Vec<u8> {
    let mut buf = vec![0u8; 128];
    buf[1] = file.name.len() as u8;
    buf[2..2 + file.name.len()].copy_from_slice(file.name.as_bytes());
    buf[0x41..0x45].copy_from_slice(file.file_type);
    buf[0x45..0x49].copy_from_slice(file.creator);
    buf[0x49] = (file.flags >> 8) as u8;
    buf[0x53..0x57].copy_from_slice(&(file.data.len() as i32).to_be_bytes());
    buf[0x57..0x5B].copy_from_slice(&(file.resource.len() as i32).to_be_bytes());
    buf[0x65] = file.flags as u8;
    buf[0x7A] = 129;
    buf[0x7B] = 129;
    let crc = crc16_xmodem(&buf[..0x7C]);
    buf[0x7C..0x7E].copy_from_slice(&crc.to_be_bytes());

    buf.extend_from_slice(file.data);
    if !file.resource.is_empty() {
        buf.resize(128 + padded(file.data.len()), 0);
        buf.extend_from_slice(file.resource);
        buf.resize(128 + padded(file.data.len()) + padded(file.resource.len()), 0);
    }
    buf
}

/// Build the uncompressed BinHex stream: header, data fork and resource fork, each with its CRC.
pub fn binhex_stream(file: &TestFile) -> Vec<u8> {
    let mut header = vec![file.name.len() as u8];
    header.extend_from_slice(file.name.as_bytes());
    header.push(0);
    header.extend_from_slice(file.file_type);
    header.extend_from_slice(file.creator);
    header.extend_from_slice(&file.flags.to_be_bytes());
    header.extend_from_slice(&(file.data.len() as i32).to_be_bytes());
    header.extend_from_slice(&(file.resource.len() as i32).to_be_bytes());

    let mut stream = Vec::new();
    for part in [&header[..], file.data, file.resource] {
        stream.extend_from_slice(part);
        stream.extend_from_slice(&crc16_xmodem(part).to_be_bytes());
    }
    stream
}

/// RLE90 compress a stream. Runs of up to 255 bytes are encoded as the byte followed by the
/// escape and a count. The escape byte itself is always written as escape, zero.
pub fn rle90_compress(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let byte = input[i];
        if byte == RLE_ESCAPE {
            output.extend_from_slice(&[RLE_ESCAPE, 0x00]);
            i += 1;
            continue;
        }
        let mut run = 1;
        while i + run < input.len() && input[i + run] == byte && run < 255 {
            run += 1;
        }
        output.push(byte);
        if run > 2 {
            output.extend_from_slice(&[RLE_ESCAPE, run as u8]);
        }
        else if run == 2 {
            output.push(byte);
        }
        i += run;
    }
    output
}

/// Encode bytes with the BinHex alphabet, three bytes to four characters.
pub fn six_bit_encode(input: &[u8]) -> String {
    let mut text = String::with_capacity(input.len() * 4 / 3 + 4);
    for chunk in input.chunks(3) {
        let mut group = [0u8; 3];
        group[..chunk.len()].copy_from_slice(chunk);
        let bits = (group[0] as u32) << 16 | (group[1] as u32) << 8 | group[2] as u32;
        let char_ct = chunk.len() + 1;
        for j in 0..char_ct {
            let value = (bits >> (18 - 6 * j)) & 0x3F;
            text.push(HQX_ALPHABET[value as usize] as char);
        }
    }
    text
}

/// Encode a file as BinHex 4.0 text, with a preamble, the signature line and 64-column lines.
pub fn encode_binhex(file: &TestFile) -> String {
    let encoded = six_bit_encode(&rle90_compress(&binhex_stream(file)));
    let mut text = String::from("Encoded by the mac2dsk test suite.\r\n\r\n");
    text.push_str(BINHEX_SIGNATURE);
    text.push_str("\r\n:");

    let mut column = 1;
    for c in encoded.chars() {
        if column == HQX_LINE_LEN {
            text.push_str("\r\n");
            column = 0;
        }
        text.push(c);
        column += 1;
    }
    text.push_str(":\r\n");
    text
}
