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
use crate::{args::GlobalOptions, read_file};
use anyhow::{bail, Error};
use mac2dsk::prelude::*;

pub mod args;

pub(crate) fn run(_global: &GlobalOptions, params: &args::InfoParams) -> Result<(), Error> {
    let reader = read_file(&params.in_file)?;

    let format = params.format.or_else(|| {
        params
            .in_file
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(format_from_ext)
    });

    let decoded = match load_container(format, reader) {
        Ok(decoded) => decoded,
        Err(e) => {
            bail!("Error loading image: {}", e);
        }
    };

    println!("Container format: {}", decoded.format);

    if let Some(record) = &decoded.record {
        let file = record.file();
        println!("Macintosh file:");
        println!("{}", "-".repeat(79));
        println!("  Name:          {}", file.file_name());
        println!("  Type:          {}", file.file_type());
        println!("  Creator:       {}", file.file_creator());
        println!("  Finder flags:  {:04X} {:?}", file.finder_flags().bits(), file.finder_flags());
        println!("  Data fork:     {} bytes", file.data_fork().len());
        println!("  Resource fork: {} bytes", file.resource_fork().len());
        match record {
            MacFileRecord::BinHex(binhex) => {
                println!(
                    "  CRCs:          header {:04X} data {:04X} resource {:04X}",
                    binhex.header_crc(),
                    binhex.data_crc(),
                    binhex.resource_crc()
                );
            }
            MacFileRecord::MacBinary(macbinary) => {
                println!("  Version:       {}", macbinary.version());
            }
        }
        println!();
    }

    let image = &decoded.image;
    let header = image.header();
    let computed = image.data_checksum();
    println!("DiskCopy 4.2 image:");
    println!("{}", "-".repeat(79));
    println!("  Name:          {}", header.image_name());
    println!("  Floppy size:   {}", image.floppy_size());
    println!("  Data size:     {} bytes", header.data_size());
    println!("  Tag size:      {} bytes", header.tag_size());
    println!("  Disk encoding: {:02X}", header.disk_encoding());
    println!("  Format byte:   {:02X}", header.format_byte());
    if image.checksum_valid() {
        println!("  Data checksum: {:08X} (valid)", header.data_checksum());
    }
    else {
        println!(
            "  Data checksum: {:08X} (mismatch, computed {:08X})",
            header.data_checksum(),
            computed
        );
    }

    Ok(())
}
