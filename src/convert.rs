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

    src/convert.rs

    The conversion pipeline: unwrap a container, decode the DiskCopy 4.2
    image it carries, and hand back the raw sector data.
*/
use crate::{
    detect::detect_container_format,
    file_parsers::{dc42::Dc42Format, ContainerFormat, ContainerParser},
    io::ReadSeek,
    types::{disk_copy::DiskCopyImage, mac_file::MacFileRecord},
    util::read_all,
    MacDiskError,
};

/// The full result of decoding a container: the Macintosh file that wrapped the image, if any,
/// and the DiskCopy image itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedContainer {
    pub format: ContainerFormat,
    pub record: Option<MacFileRecord>,
    pub image:  DiskCopyImage,
}

impl DecodedContainer {
    /// Consume the container, returning the raw sector data.
    pub fn into_raw(self) -> Vec<u8> {
        self.image.into_data()
    }
}

/// Decode a container of the given format, retaining the wrapping file record.
pub fn decode_container(format: ContainerFormat, buf: &[u8]) -> Result<DecodedContainer, MacDiskError> {
    log::trace!("decode_container(): Decoding {} bytes as {}", buf.len(), format);
    let record = format.unwrap_file(buf)?;

    let image = match &record {
        Some(record) => {
            let file = record.file();
            log::debug!(
                "decode_container(): Unwrapped {:?} type: {} creator: {} data fork: {} resource fork: {}",
                file.file_name(),
                file.file_type(),
                file.file_creator(),
                file.data_fork().len(),
                file.resource_fork().len()
            );
            Dc42Format::decode(file.data_fork())?
        }
        None => Dc42Format::decode(buf)?,
    };

    Ok(DecodedContainer { format, record, image })
}

/// Decode the DiskCopy 4.2 image carried by a container of the given format.
pub fn extract_disk_image(format: ContainerFormat, buf: &[u8]) -> Result<DiskCopyImage, MacDiskError> {
    format.extract_image(buf)
}

/// Convert a container of the given format to a raw sector image.
pub fn convert_to_raw(format: ContainerFormat, buf: &[u8]) -> Result<Vec<u8>, MacDiskError> {
    Ok(extract_disk_image(format, buf)?.into_data())
}

/// Read a container from a seekable source and decode it. If no format is specified, the format
/// is detected from the content.
pub fn load_container<RS: ReadSeek>(
    format: Option<ContainerFormat>,
    mut read_buf: RS,
) -> Result<DecodedContainer, MacDiskError> {
    match format {
        Some(ContainerFormat::DiskCopy) => {
            let image = Dc42Format::load(&mut read_buf)?;
            Ok(DecodedContainer {
                format: ContainerFormat::DiskCopy,
                record: None,
                image,
            })
        }
        Some(format) => {
            let buf = read_all(&mut read_buf)?;
            decode_container(format, &buf)
        }
        None => {
            let buf = read_all(&mut read_buf)?;
            decode_container(detect_container_format(&buf)?, &buf)
        }
    }
}
