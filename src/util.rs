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

    src/util.rs

    Bounds-checked big-endian field readers shared by all container parsers.
*/
use crate::io::{Read, Seek, SeekFrom};
use thiserror::Error;

/// A read extended past the end of a buffer.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("read of {len} byte(s) at offset {offset} exceeds buffer length {available}")]
pub struct OutOfRange {
    pub offset:    usize,
    pub len:       usize,
    pub available: usize,
}

pub(crate) fn get_length<T: Seek>(source: &mut T) -> Result<u64, crate::io::Error> {
    // Seek to the end of the source
    let length = source.seek(SeekFrom::End(0))?;
    // Seek back to the beginning of the source
    source.seek(SeekFrom::Start(0))?;
    Ok(length)
}

/// Read an entire seekable source into memory, using its measured length to size the buffer.
pub(crate) fn read_all<T: Read + Seek>(source: &mut T) -> Result<Vec<u8>, crate::io::Error> {
    let length = get_length(source)?;
    let mut buf = Vec::with_capacity(length as usize);
    source.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Return `len` bytes of `buf` starting at `offset`.
pub fn read_bytes_at(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], OutOfRange> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or(OutOfRange {
            offset,
            len,
            available: buf.len(),
        })
}

pub fn read_u8_at(buf: &[u8], offset: usize) -> Result<u8, OutOfRange> {
    Ok(read_bytes_at(buf, offset, 1)?[0])
}

pub fn read_u16_be_at(buf: &[u8], offset: usize) -> Result<u16, OutOfRange> {
    let bytes = read_bytes_at(buf, offset, 2)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

pub fn read_u32_be_at(buf: &[u8], offset: usize) -> Result<u32, OutOfRange> {
    let bytes = read_bytes_at(buf, offset, 4)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub fn read_i32_be_at(buf: &[u8], offset: usize) -> Result<i32, OutOfRange> {
    read_u32_be_at(buf, offset).map(|v| v as i32)
}

/// Read a fixed-length string, mapping each byte directly to the char of the same code point.
/// No character set conversion is performed, so Mac Roman bytes above 0x7F survive as
/// Latin-1 code points and can be mapped back to the original bytes.
pub fn read_string_at(buf: &[u8], offset: usize, len: usize) -> Result<String, OutOfRange> {
    Ok(bytes_to_string(read_bytes_at(buf, offset, len)?))
}

pub(crate) fn bytes_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// A forward-only reader over a byte slice. Each read advances the position only if it succeeds.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn with_offset(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn read_u8(&mut self) -> Result<u8, OutOfRange> {
        let value = read_u8_at(self.buf, self.pos)?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, OutOfRange> {
        let value = read_u16_be_at(self.buf, self.pos)?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32_be(&mut self) -> Result<u32, OutOfRange> {
        let value = read_u32_be_at(self.buf, self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_i32_be(&mut self) -> Result<i32, OutOfRange> {
        let value = read_i32_be_at(self.buf, self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], OutOfRange> {
        let bytes = read_bytes_at(self.buf, self.pos, len)?;
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], OutOfRange> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    pub fn read_string(&mut self, len: usize) -> Result<String, OutOfRange> {
        self.read_bytes(len).map(bytes_to_string)
    }
}
