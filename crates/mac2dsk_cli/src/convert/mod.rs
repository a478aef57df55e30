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
pub mod args;

use crate::{args::GlobalOptions, read_file};
use anyhow::{bail, Error};
use mac2dsk::prelude::*;
use std::{
    collections::BTreeSet,
    io::Write,
    path::{Path, PathBuf},
};

/// The extension appended to an input path to form its output path.
pub(crate) const OUTPUT_EXTENSION: &str = "dsk";

pub(crate) struct ConvertOutcome {
    pub(crate) format: ContainerFormat,
    pub(crate) out_file: PathBuf,
    pub(crate) floppy_size: FloppySize,
    pub(crate) checksum: (u32, u32),
}

impl ConvertOutcome {
    pub(crate) fn checksum_valid(&self) -> bool {
        self.checksum.0 == self.checksum.1
    }
}

pub(crate) fn run(global: &GlobalOptions, params: &args::ConvertParams) -> Result<(), Error> {
    let verbose = |msg: &str| {
        if params.verbose {
            global.loud(|| println!("{}", msg));
        }
    };

    verbose("Searching for image files...");
    let files = find_image_files(&params.paths)?;
    verbose(&format!("Found {} image file(s).", files.len()));

    if files.is_empty() {
        return Ok(());
    }

    verbose("Converting file(s)...");
    let mut failed = 0;
    for file in &files {
        global.loud(|| {
            print!("Converting \"{}\"...", file.display());
            let _ = std::io::stdout().flush();
        });

        match convert_file(file, params.format, params.force) {
            Ok(outcome) => {
                global.loud(|| println!(" success!"));
                verbose(&format!(
                    "  {} -> {} ({})",
                    outcome.format,
                    outcome.out_file.display(),
                    outcome.floppy_size
                ));
                if !outcome.checksum_valid() {
                    global.loud(|| {
                        println!(
                            "  Warning: DiskCopy data checksum mismatch (header: {:08X}, computed: {:08X})",
                            outcome.checksum.0, outcome.checksum.1
                        )
                    });
                }
            }
            Err(e) => {
                failed += 1;
                global.loud(|| println!(" failed."));
                eprintln!("Error: {}", e);
            }
        }
    }
    verbose("Conversion(s) complete.");

    if failed > 0 {
        bail!("{} of {} file(s) failed to convert", failed, files.len());
    }
    Ok(())
}

/// Resolve the input paths into a sorted, de-duplicated list of files. Files are taken as given;
/// directories are searched recursively for files with a supported extension.
pub(crate) fn find_image_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, Error> {
    let extensions = supported_extensions();
    let mut found = BTreeSet::new();

    for path in paths {
        if path.is_file() {
            found.insert(std::fs::canonicalize(path)?);
        }
        else if path.is_dir() {
            walk_dir(path, &extensions, &mut found)?;
        }
        else {
            bail!("Unable to find \"{}\"", path.display());
        }
    }

    Ok(found.into_iter().collect())
}

fn walk_dir(dir: &Path, extensions: &[&str], found: &mut BTreeSet<PathBuf>) -> Result<(), Error> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, extensions, found)?;
        }
        else if has_extension(&path, extensions) {
            found.insert(std::fs::canonicalize(&path)?);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// The output path for an input: the input path with `.dsk` appended.
pub(crate) fn output_path(in_file: &Path) -> PathBuf {
    let mut out_file = in_file.as_os_str().to_owned();
    out_file.push(".");
    out_file.push(OUTPUT_EXTENSION);
    PathBuf::from(out_file)
}

/// Convert a single file. The container format is taken from `format` if given, then from the
/// file extension, and finally detected from the file content.
pub(crate) fn convert_file(
    in_file: &Path,
    format: Option<ContainerFormat>,
    force: bool,
) -> Result<ConvertOutcome, Error> {
    let format = format.or_else(|| {
        in_file
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(format_from_ext)
    });
    log::debug!("convert_file(): {} format: {:?}", in_file.display(), format);

    let out_file = output_path(in_file);
    if out_file.exists() && !force {
        bail!(
            "The output file \"{}\" already exists and would be overwritten",
            out_file.display()
        );
    }

    let reader = read_file(in_file)?;
    let decoded = load_container(format, reader)?;

    let checksum = (
        decoded.image.header().data_checksum(),
        decoded.image.data_checksum(),
    );
    let floppy_size = decoded.image.floppy_size();
    let format = decoded.format;

    std::fs::write(&out_file, decoded.into_raw())?;

    Ok(ConvertOutcome {
        format,
        out_file,
        floppy_size,
        checksum,
    })
}
