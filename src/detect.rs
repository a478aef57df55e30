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
use crate::{
    file_parsers::{ContainerFormat, ContainerParser},
    MacDiskError,
};

// BinHex is text and can never be mistaken for the binary formats. DiskCopy is checked before
// MacBinary since its magic and size field are more specific than MacBinary's sentinels.
const DETECT_ORDER: [ContainerFormat; 3] = [
    ContainerFormat::BinHex,
    ContainerFormat::DiskCopy,
    ContainerFormat::MacBinary,
];

/// Attempt to detect the container format of a buffer by content. If the format cannot be
/// determined, UnknownFormat is returned.
pub fn detect_container_format(buf: &[u8]) -> Result<ContainerFormat, MacDiskError> {
    for format in DETECT_ORDER.iter() {
        if format.detect(buf) {
            log::debug!("detect_container_format(): Detected {}", format);
            return Ok(*format);
        }
    }
    Err(MacDiskError::UnknownFormat)
}
