pub mod rle90;
