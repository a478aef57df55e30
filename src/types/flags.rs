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

    types/flags.rs

    Defines common bitflags
*/

use bitflags::bitflags;

bitflags! {
    /// Classic Macintosh Finder flags, as carried in BinHex and MacBinary headers.
    ///
    /// Values are always constructed with `from_bits_retain`, so undefined and reserved bits are
    /// passed through unmodified.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[rustfmt::skip]
    pub struct FinderFlags: u16 {
        #[doc = "File is on the desktop (System 6 and earlier)"]
        const IS_ON_DESK        = 0b0000_0000_0000_0001;
        #[doc = "Three-bit label color"]
        const COLOR             = 0b0000_0000_0000_1110;
        #[doc = "Application may be launched multiple times"]
        const IS_SHARED         = 0b0000_0000_0100_0000;
        #[doc = "File contains no INIT resources"]
        const HAS_NO_INITS      = 0b0000_0000_1000_0000;
        #[doc = "Finder has recorded the file's bundle information"]
        const HAS_BEEN_INITED   = 0b0000_0001_0000_0000;
        #[doc = "File has a custom icon"]
        const HAS_CUSTOM_ICON   = 0b0000_0100_0000_0000;
        #[doc = "File is a stationery pad"]
        const IS_STATIONERY     = 0b0000_1000_0000_0000;
        #[doc = "File name cannot be changed"]
        const NAME_LOCKED       = 0b0001_0000_0000_0000;
        #[doc = "File has a BNDL resource"]
        const HAS_BUNDLE        = 0b0010_0000_0000_0000;
        #[doc = "File is invisible"]
        const IS_INVISIBLE      = 0b0100_0000_0000_0000;
        #[doc = "File is an alias"]
        const IS_ALIAS          = 0b1000_0000_0000_0000;
    }
}

impl From<u16> for FinderFlags {
    fn from(bits: u16) -> Self {
        FinderFlags::from_bits_retain(bits)
    }
}

impl FinderFlags {
    /// Assemble flags from the separated high and low bytes used by the MacBinary header.
    pub fn from_bytes(high: u8, low: u8) -> Self {
        FinderFlags::from(u16::from_be_bytes([high, low]))
    }

    /// The Finder label color index, 0-7.
    pub fn color(&self) -> u8 {
        ((self.bits() & FinderFlags::COLOR.bits()) >> 1) as u8
    }
}
