//! Decoder for VSML virtual memory images.
//! Layout: one meta page, bitmap pages, page table pages,
//! page list table pages, data pages. All pages are the same size,
//! declared in the 20 byte header at the start of the meta page.

mod codec;
mod page;
mod meta;

mod layout;
mod bitmap;
mod dump;

mod session;
mod file;

#[cfg(test)]
mod tests;

pub use self::{
    codec::{CodecError, decode_be16, decode_text, to_hex, to_printable_ascii},
    page::{PageCategory, PageRecord, PLT_ENTRY_SIZE, PT_ENTRY_SIZE, ROW_SIZE},
    meta::{MetaDescriptor, MetaError, HEADER_SIZE},
    layout::partition,
    bitmap::BitmapResult,
    dump::{ByteTag, Cell, FormattedDump, Row, RowStyle, tag_of},
    session::{DecodeOptions, Session},
    file::{FileError, Format, Image},
};
