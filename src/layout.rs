use super::{
    meta::MetaDescriptor,
    page::{PageCategory, PageRecord},
};

/// Slice of page `n`, clipped to the buffer. Pages past the end are empty.
fn page_bytes(buffer: &[u8], n: u32, page_size: usize) -> &[u8] {
    let start = (n as usize).saturating_mul(page_size).min(buffer.len());
    let end = start.saturating_add(page_size).min(buffer.len());
    &buffer[start..end]
}

/// Walks the image in header order: one meta page, then bitmap, page table
/// and page list table runs, an optional swap run, and data up to `page_count`.
pub struct Partition<'a, 'm> {
    buffer: &'a [u8],
    meta: &'m MetaDescriptor,
    filename: Option<&'m str>,
    records: Vec<PageRecord<'a>>,
    cursor: u32,
}

impl<'a, 'm> Partition<'a, 'm> {
    pub fn new(buffer: &'a [u8], meta: &'m MetaDescriptor, filename: Option<&'m str>) -> Self {
        Partition {
            buffer,
            meta,
            filename,
            records: Vec::with_capacity(usize::from(meta.page_count)),
            cursor: 0,
        }
    }

    fn emit(&mut self, category: PageCategory, count: u32) {
        let size = self.meta.page_size();
        for k in 0..count {
            let n = self.cursor + k;
            let bytes = page_bytes(self.buffer, n, size);
            if bytes.len() < size {
                log::warn!(
                    "{category} page {} is short: {} of {size} bytes",
                    k + 1,
                    bytes.len()
                );
            }
            let mut record = PageRecord::new(
                category,
                k + 1,
                n,
                self.meta.page_count,
                self.meta.page_size_bytes,
                bytes,
            );
            if let Some(filename) = self.filename {
                record = record.with_hint(filename, self.meta.page_size_bytes);
            }
            log::debug!("{}: offset 0x{:x}", record.label, record.byte_offset);
            self.records.push(record);
        }
        self.cursor += count;
    }

    pub fn meta_page(mut self) -> Self {
        self.emit(PageCategory::Meta, 1);
        self
    }

    pub fn run(mut self, category: PageCategory, count: u16) -> Self {
        self.emit(category, u32::from(count));
        self
    }

    /// Everything left up to the declared page count is data.
    pub fn data(mut self) -> Vec<PageRecord<'a>> {
        let page_count = u32::from(self.meta.page_count);
        if self.cursor > page_count {
            log::warn!(
                "header declares {} special pages but only {page_count} pages in total",
                self.cursor
            );
        }
        self.emit(PageCategory::Data, page_count.saturating_sub(self.cursor));
        self.records
    }
}

/// Splits `buffer` into typed pages. With `swap_pages` unset the swap count is
/// only informational and data starts right after the page list table pages.
pub fn partition<'a>(
    buffer: &'a [u8],
    meta: &MetaDescriptor,
    filename: Option<&str>,
    swap_pages: bool,
) -> Vec<PageRecord<'a>> {
    let partition = Partition::new(buffer, meta, filename)
        .meta_page()
        .run(PageCategory::Bitmap, meta.bitmap_page_count)
        .run(PageCategory::PageTable, meta.page_table_page_count)
        .run(
            PageCategory::PageTableEntryList,
            meta.page_table_entry_list_page_count,
        );
    let partition = if swap_pages {
        partition.run(PageCategory::Swap, meta.swap_page_count)
    } else {
        partition
    };
    partition.data()
}
