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

//! RLE90 run-length decompression, as used by BinHex 4.0.
//!
//! The escape byte 0x90 is followed by a count byte. A count of zero stands for a literal 0x90.
//! A count of N > 0 means the byte before the escape occurs N times in total, so N - 1 further
//! copies are emitted.

use crate::MacDiskError;

pub const RLE_ESCAPE: u8 = 0x90;

/// Expand an RLE90 stream into the literal bytes it represents.
pub fn expand(input: &[u8]) -> Result<Vec<u8>, MacDiskError> {
    let mut output = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];
        if byte != RLE_ESCAPE {
            output.push(byte);
            i += 1;
            continue;
        }

        let count = *input.get(i + 1).ok_or(MacDiskError::TruncatedRun { offset: i })?;
        if count == 0 {
            output.push(RLE_ESCAPE);
        }
        else {
            let last = *output.last().ok_or(MacDiskError::MalformedRun { offset: i })?;
            output.resize(output.len() + count as usize - 1, last);
        }
        i += 2;
    }

    log::trace!("rle90::expand(): {} bytes expanded to {} bytes", input.len(), output.len());
    Ok(output)
}
