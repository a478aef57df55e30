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

//! # mac2dsk
//!
//! A library for turning classic Macintosh floppy disk containers into raw sector images.
//!
//! Three container formats are understood:
//!
//! - **BinHex 4.0** (`.hqx`) - a 7-bit text encoding of a two-fork Macintosh file.
//! - **MacBinary** - a 128-byte binary header followed by the data and resource forks.
//! - **DiskCopy 4.2** (`.img`, `.image`) - a 0x54-byte header followed by raw sector data.
//!
//! BinHex and MacBinary only wrap a file; the data fork of that file is expected to be a DiskCopy
//! 4.2 image, whose sector data is the final product. Every decoder works on a fully buffered
//! input and returns either a complete, immutable record or a [`MacDiskError`].
//!
//! ```no_run
//! use mac2dsk::prelude::*;
//!
//! let buf = std::fs::read("System Tools.img.hqx").unwrap();
//! let raw = convert_to_raw(ContainerFormat::BinHex, &buf).unwrap();
//! std::fs::write("System Tools.img.hqx.dsk", raw).unwrap();
//! ```

pub mod convert;
mod detect;
pub mod file_parsers;
pub mod io;
pub mod types;
pub mod util;

use thiserror::Error;

pub use crate::util::OutOfRange;

/// The kilobyte, as used by floppy image sizes.
pub const KIB: usize = 1024;

/// The error type for all container decoding operations. Every variant is a permanent failure
/// for the input that produced it.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MacDiskError {
    #[error("The input does not have a BinHex 4.0 header")]
    MissingHeader,
    #[error("The input does not have a {0} colon")]
    MissingDelimiter(&'static str),
    #[error("The input contains invalid character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
    #[error("RLE run marker at offset {offset} has no preceding byte to repeat")]
    MalformedRun { offset: usize },
    #[error("RLE escape at offset {offset} is missing its repeat count")]
    TruncatedRun { offset: usize },
    #[error("Malformed header: invalid value for field '{field}'")]
    MalformedHeader { field: &'static str },
    #[error("The input is truncated: {0}")]
    TruncatedInput(#[from] OutOfRange),
    #[error("The input is too small to be a DiskCopy 4.2 image ({0} bytes)")]
    TooSmall(usize),
    #[error("The input does not appear to have a DiskCopy 4.2 header")]
    NotDiskCopyFormat,
    #[error("The input has an unsupported data size: {0} bytes")]
    UnsupportedImageSize(u32),
    #[error("Unknown container format")]
    UnknownFormat,
    #[error("Support for the {0} container format was not enabled")]
    UnsupportedFormat(&'static str),
    #[error("An error occurred reading a fixed header: {0}")]
    HeaderReadError(String),
    #[error("An IO error occurred reading the input: {0}")]
    IoError(String),
}

impl From<std::io::Error> for MacDiskError {
    fn from(err: std::io::Error) -> Self {
        MacDiskError::IoError(err.to_string())
    }
}

impl From<binrw::Error> for MacDiskError {
    fn from(err: binrw::Error) -> Self {
        MacDiskError::HeaderReadError(err.to_string())
    }
}

pub use crate::{
    convert::{convert_to_raw, decode_container, extract_disk_image, load_container, DecodedContainer},
    detect::detect_container_format,
    file_parsers::{format_from_ext, supported_extensions, ContainerFormat, ContainerParser},
    types::{
        disk_copy::{DiskCopyHeader, DiskCopyImage, FloppySize},
        flags::FinderFlags,
        mac_file::{BinHexFile, MacBinaryFile, MacBinaryVersion, MacFile, MacFileRecord},
        FourCC,
    },
};

pub mod prelude {
    pub use crate::{
        convert::{convert_to_raw, decode_container, extract_disk_image, load_container, DecodedContainer},
        detect::detect_container_format,
        file_parsers::{format_from_ext, supported_extensions, ContainerFormat, ContainerParser},
        types::{
            disk_copy::{DiskCopyImage, FloppySize},
            flags::FinderFlags,
            mac_file::{MacFile, MacFileRecord},
            FourCC,
        },
        MacDiskError,
    };
}
