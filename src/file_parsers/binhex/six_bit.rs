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

    src/file_parsers/binhex/six_bit.rs

    Demodulation of the BinHex 4.0 64-character alphabet into 8-bit bytes.

    In    In    In    In    In    In    In    In
    012345012345012345012345012345012345012345012345
    Out     Out     Out     Out     Out     Out
*/
use crate::MacDiskError;

/// The BinHex 4.0 alphabet. A character's position is its 6-bit value.
pub const HQX_ALPHABET: &[u8; 64] = b"!\"#$%&'()*+,-012345689@ABCDEFGHIJKLMNPQRSTUVXYZ[`abcdefhijklmpqr";

const INVALID: u8 = 0xFF;
const CHARS_PER_GROUP: usize = 8;
const BYTES_PER_GROUP: usize = 6;

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < HQX_ALPHABET.len() {
        table[HQX_ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static DECODE_TABLE: [u8; 256] = build_decode_table();

/// Return the 6-bit value of an alphabet character.
pub fn char_value(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    match DECODE_TABLE[c as usize] {
        INVALID => None,
        value => Some(value),
    }
}

/// Decode a run of BinHex text into bytes. Whitespace is skipped.
///
/// Every started group of up to eight characters produces six bytes. A trailing partial group is
/// flushed with its unfilled low bits set to zero, so the output may carry up to five padding
/// bytes past the encoded payload. The fork lengths in the BinHex header delimit the real data.
pub fn decode(text: &str) -> Result<Vec<u8>, MacDiskError> {
    let mut output = Vec::with_capacity((text.len() / CHARS_PER_GROUP + 1) * BYTES_PER_GROUP);
    let mut group: u64 = 0;
    let mut char_ct = 0;

    for (index, c) in text.chars().enumerate() {
        if c.is_whitespace() {
            continue;
        }

        let value = char_value(c).ok_or(MacDiskError::InvalidCharacter { character: c, index })?;
        group |= (value as u64) << (42 - 6 * char_ct);
        char_ct += 1;

        if char_ct == CHARS_PER_GROUP {
            flush_group(group, &mut output);
            group = 0;
            char_ct = 0;
        }
    }

    if char_ct > 0 {
        flush_group(group, &mut output);
    }

    Ok(output)
}

fn flush_group(group: u64, output: &mut Vec<u8>) {
    for j in 0..BYTES_PER_GROUP {
        output.push((group >> (40 - 8 * j)) as u8);
    }
}
