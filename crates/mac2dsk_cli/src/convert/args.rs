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
use crate::args::format_parser;
use bpaf::{construct, long, positional, Parser};
use mac2dsk::ContainerFormat;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub(crate) struct ConvertParams {
    pub(crate) verbose: bool,
    pub(crate) format: Option<ContainerFormat>,
    pub(crate) force: bool,
    pub(crate) paths: Vec<PathBuf>,
}

fn verbose_parser() -> impl Parser<bool> {
    long("verbose").short('v').switch().help("Show verbose output")
}

fn force_parser() -> impl Parser<bool> {
    long("force").switch().help("Overwrite existing output files")
}

fn paths_parser() -> impl Parser<Vec<PathBuf>> {
    positional::<PathBuf>("PATH")
        .help("Image files, or directories to search for image files")
        .some("At least one path is required")
}

pub(crate) fn convert_parser() -> impl Parser<ConvertParams> {
    let verbose = verbose_parser();
    let format = format_parser();
    let force = force_parser();
    let paths = paths_parser();

    construct!(ConvertParams {
        verbose,
        format,
        force,
        paths,
    })
}
