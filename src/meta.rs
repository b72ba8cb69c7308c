use std::{fmt, ops::Range};

use thiserror::Error;

use super::{
    codec::{self, CodecError},
    page::{KIB, PLT_ENTRY_SIZE, PT_ENTRY_SIZE},
};

/// Size of the fixed meta header at the start of every image.
pub const HEADER_SIZE: usize = 20;

pub const MAGIC_NUMBER: Range<usize> = 0..4;
pub const LAYOUT_TYPE: Range<usize> = 4..8;
pub const PAGE_SIZE: Range<usize> = 8..10;
pub const PAGE_COUNT: Range<usize> = 10..12;
pub const SWAP_PAGE_COUNT: Range<usize> = 12..14;
pub const BITMAP_PAGE_COUNT: Range<usize> = 14..16;
pub const PT_PAGE_COUNT: Range<usize> = 16..18;
pub const PLT_PAGE_COUNT: Range<usize> = 18..20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetaError {
    #[error("truncated header: {len} bytes, need 20")]
    TruncatedHeader { len: usize },
    #[error("{0}")]
    Codec(#[from] CodecError),
}

/// Parsed meta header. Counts are taken as-is, nothing is validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaDescriptor {
    pub magic_number: String,
    pub layout_type: String,
    pub page_size_bytes: u32,
    pub page_count: u16,
    pub swap_page_count: u16,
    pub bitmap_page_count: u16,
    pub page_table_page_count: u16,
    pub page_table_entry_list_page_count: u16,
}

impl MetaDescriptor {
    pub fn parse(buffer: &[u8]) -> Result<Self, MetaError> {
        if buffer.len() < HEADER_SIZE {
            return Err(MetaError::TruncatedHeader { len: buffer.len() });
        }
        log::debug!("meta header: {}", hex::encode(&buffer[..HEADER_SIZE]));

        let count = |range: Range<usize>| codec::decode_be16(&buffer[range]);

        Ok(MetaDescriptor {
            magic_number: codec::decode_text(&buffer[MAGIC_NUMBER]).into_owned(),
            layout_type: codec::decode_text(&buffer[LAYOUT_TYPE]).into_owned(),
            page_size_bytes: u32::from(count(PAGE_SIZE)?) * KIB,
            page_count: count(PAGE_COUNT)?,
            swap_page_count: count(SWAP_PAGE_COUNT)?,
            bitmap_page_count: count(BITMAP_PAGE_COUNT)?,
            page_table_page_count: count(PT_PAGE_COUNT)?,
            page_table_entry_list_page_count: count(PLT_PAGE_COUNT)?,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size_bytes as usize
    }

    pub fn pt_entries_per_page(&self) -> u32 {
        self.page_size_bytes / PT_ENTRY_SIZE as u32
    }

    pub fn plt_entries_per_page(&self) -> u32 {
        self.page_size_bytes / PLT_ENTRY_SIZE as u32
    }

    pub fn total_pt_entries(&self) -> u64 {
        u64::from(self.pt_entries_per_page()) * u64::from(self.page_table_page_count)
    }

    pub fn total_plt_entries(&self) -> u64 {
        u64::from(self.plt_entries_per_page()) * u64::from(self.page_table_entry_list_page_count)
    }

    pub fn total_memory_bytes(&self) -> u64 {
        u64::from(self.page_size_bytes) * u64::from(self.page_count)
    }

    /// Length of the allocation map at the start of a bitmap page, one bit per page.
    pub fn bitmap_header_len(&self) -> usize {
        usize::from(self.page_count).div_ceil(8)
    }
}

impl fmt::Display for MetaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "magic number: {}", self.magic_number)?;
        writeln!(f, "layout type: {}", self.layout_type)?;
        writeln!(f, "page size: {}", self.page_size_bytes)?;
        writeln!(f, "pages: {}", self.page_count)?;
        writeln!(f, "swap pages: {}", self.swap_page_count)?;
        writeln!(f, "bitmap pages: {}", self.bitmap_page_count)?;
        writeln!(f, "pt pages: {}", self.page_table_page_count)?;
        writeln!(f, "plt pages: {}", self.page_table_entry_list_page_count)?;
        writeln!(f, "pt entries per pt page: {}", self.pt_entries_per_page())?;
        writeln!(f, "total pt entries: {}", self.total_pt_entries())?;
        writeln!(f, "plt entries per plt page: {}", self.plt_entries_per_page())?;
        writeln!(f, "total plt entries: {}", self.total_plt_entries())?;
        write!(f, "total memory size: {}", self.total_memory_bytes())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::{MetaDescriptor, MetaError};
    use crate::tests::header;

    #[test]
    fn parse() {
        let meta = MetaDescriptor::parse(&header(1, 4, 2, 1, 1, 3)).unwrap();
        assert_eq!(meta.magic_number, "VSML");
        assert_eq!(meta.layout_type, "LIN1");
        assert_eq!(meta.page_size_bytes, 1024);
        assert_eq!(meta.page_count, 4);
        assert_eq!(meta.swap_page_count, 2);
        assert_eq!(meta.bitmap_page_count, 1);
        assert_eq!(meta.page_table_page_count, 1);
        assert_eq!(meta.page_table_entry_list_page_count, 3);

        assert_eq!(meta.pt_entries_per_page(), 16);
        assert_eq!(meta.plt_entries_per_page(), 32);
        assert_eq!(meta.total_pt_entries(), 16);
        assert_eq!(meta.total_plt_entries(), 96);
        assert_eq!(meta.total_memory_bytes(), 4096);
        assert_eq!(meta.bitmap_header_len(), 1);
    }

    #[test]
    fn truncated() {
        assert_eq!(
            MetaDescriptor::parse(&[0; 10]),
            Err(MetaError::TruncatedHeader { len: 10 })
        );
        assert!(MetaDescriptor::parse(&[0; 19]).is_err());
        assert!(MetaDescriptor::parse(&[0; 20]).is_ok());
    }

    #[test]
    fn derived_totals() {
        let mut rng = StdRng::seed_from_u64(0x123);
        for _ in 0..100 {
            let raw_size = rng.gen::<u16>();
            let pages = rng.gen::<u16>();
            let meta = MetaDescriptor::parse(&header(raw_size, pages, 0, 0, 0, 0)).unwrap();
            assert_eq!(meta.page_size_bytes, u32::from(raw_size) * 1024);
            assert_eq!(
                meta.total_memory_bytes(),
                u64::from(meta.page_size_bytes) * u64::from(pages)
            );
        }
    }

    #[test]
    fn summary() {
        let meta = MetaDescriptor::parse(&header(2, 8, 0, 1, 2, 1)).unwrap();
        let text = meta.to_string();
        assert!(text.starts_with("magic number: VSML\n"));
        assert!(text.contains("page size: 2048\n"));
        assert!(text.contains("total pt entries: 64\n"));
        assert!(text.ends_with("total memory size: 16384"));
    }
}
