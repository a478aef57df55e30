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

//! Checksum algorithms used by the Macintosh container formats.

/// CRC-16/XMODEM (CCITT polynomial 0x1021, zero initial value), as used by the MacBinary II
/// header CRC.
#[cfg_attr(not(feature = "macbinary"), allow(dead_code))]
pub(crate) fn crc16_xmodem(buf: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for byte in buf {
        crc ^= (*byte as u16) << 8;
        for _j in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            }
            else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// The DiskCopy 4.2 checksum: each big-endian word is added to the sum, which is then rotated
/// right by one bit.
pub(crate) fn dc42_checksum(buf: &[u8]) -> u32 {
    buf.chunks_exact(2).fold(0u32, |sum, word| {
        sum.wrapping_add(u16::from_be_bytes([word[0], word[1]]) as u32)
            .rotate_right(1)
    })
}
