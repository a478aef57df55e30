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
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use strum::IntoEnumIterator;

use crate::{
    types::{disk_copy::DiskCopyImage, mac_file::MacFileRecord},
    MacDiskError,
};

#[cfg(feature = "binhex")]
pub mod binhex;
pub mod compression;
pub(crate) mod crc;
pub mod dc42;
#[cfg(feature = "macbinary")]
pub mod macbinary;

/// The container formats that can carry a Macintosh floppy image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum ContainerFormat {
    /// BinHex 4.0 text, wrapping a file whose data fork is a DiskCopy 4.2 image.
    BinHex,
    /// MacBinary, wrapping a file whose data fork is a DiskCopy 4.2 image.
    MacBinary,
    /// A bare DiskCopy 4.2 image.
    DiskCopy,
}

impl ContainerFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ContainerFormat::BinHex => "BinHex 4.0",
            ContainerFormat::MacBinary => "MacBinary",
            ContainerFormat::DiskCopy => "DiskCopy 4.2",
        }
    }
}

impl Display for ContainerFormat {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ContainerFormat {
    type Err = &'static str;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "hqx" | "binhex" => Ok(ContainerFormat::BinHex),
            "bin" | "macbinary" => Ok(ContainerFormat::MacBinary),
            "img" | "image" | "diskcopy" | "dc42" => Ok(ContainerFormat::DiskCopy),
            _ => Err("Invalid format; expected 'hqx', 'macbinary' or 'img'"),
        }
    }
}

/// Returns a list of advertised file extensions supported by the available container parsers.
/// MacBinary files have no conventional extension and must be selected explicitly or detected.
pub fn supported_extensions() -> Vec<&'static str> {
    ContainerFormat::iter().flat_map(|f| f.extensions()).collect()
}

/// Returns a ContainerFormat enum variant based on the file extension provided. If the extension
/// is not recognized, None is returned.
pub fn format_from_ext(ext: &str) -> Option<ContainerFormat> {
    let ext = ext.trim_start_matches('.').to_lowercase();
    ContainerFormat::iter().find(|format| format.extensions().contains(&ext.as_str()))
}

/// Dispatch interface for the container parsers.
pub trait ContainerParser {
    /// Return a list of file extensions associated with the parser.
    fn extensions(&self) -> Vec<&'static str>;
    /// Detect and return true if the buffer holds a container the parser can read.
    fn detect(&self, buf: &[u8]) -> bool;
    /// Decode the Macintosh file wrapped by the container. A bare DiskCopy image wraps no file,
    /// and returns None.
    fn unwrap_file(&self, buf: &[u8]) -> Result<Option<MacFileRecord>, MacDiskError>;
    /// Decode the DiskCopy 4.2 image carried by the container.
    fn extract_image(&self, buf: &[u8]) -> Result<DiskCopyImage, MacDiskError> {
        match self.unwrap_file(buf)? {
            Some(record) => dc42::Dc42Format::decode(record.file().data_fork()),
            None => dc42::Dc42Format::decode(buf),
        }
    }
}

impl ContainerParser for ContainerFormat {
    fn extensions(&self) -> Vec<&'static str> {
        match self {
            #[cfg(feature = "binhex")]
            ContainerFormat::BinHex => binhex::BinHexFormat::extensions(),
            #[cfg(feature = "macbinary")]
            ContainerFormat::MacBinary => macbinary::MacBinaryFormat::extensions(),
            ContainerFormat::DiskCopy => dc42::Dc42Format::extensions(),
            #[allow(unreachable_patterns)]
            _ => Vec::new(),
        }
    }

    fn detect(&self, buf: &[u8]) -> bool {
        match self {
            #[cfg(feature = "binhex")]
            ContainerFormat::BinHex => binhex::BinHexFormat::detect(buf),
            #[cfg(feature = "macbinary")]
            ContainerFormat::MacBinary => macbinary::MacBinaryFormat::detect(buf),
            ContainerFormat::DiskCopy => dc42::Dc42Format::detect(buf),
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }

    #[allow(unused_variables)]
    fn unwrap_file(&self, buf: &[u8]) -> Result<Option<MacFileRecord>, MacDiskError> {
        match self {
            #[cfg(feature = "binhex")]
            ContainerFormat::BinHex => binhex::BinHexFormat::decode(buf).map(|file| Some(file.into())),
            #[cfg(feature = "macbinary")]
            ContainerFormat::MacBinary => macbinary::MacBinaryFormat::decode(buf).map(|file| Some(file.into())),
            ContainerFormat::DiskCopy => Ok(None),
            #[allow(unreachable_patterns)]
            _ => Err(MacDiskError::UnsupportedFormat(self.name())),
        }
    }
}
