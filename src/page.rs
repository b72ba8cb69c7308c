use std::fmt;

/// Unit of the raw page size field.
pub const KIB: u32 = 0x400;

/// Page table entry is 512 bits wide.
pub const PT_ENTRY_SIZE: usize = 512 / 8;

/// Page list table entry is 256 bits wide.
pub const PLT_ENTRY_SIZE: usize = 256 / 8;

/// Bytes per dump row.
pub const ROW_SIZE: usize = 0x10;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum PageCategory {
    Meta,
    Bitmap,
    PageTable,
    PageTableEntryList,
    Swap,
    Data,
}

impl PageCategory {
    pub const fn name(self) -> &'static str {
        match self {
            PageCategory::Meta => "Meta",
            PageCategory::Bitmap => "Bitmap",
            PageCategory::PageTable => "PT",
            PageCategory::PageTableEntryList => "PLT",
            PageCategory::Swap => "Swap",
            PageCategory::Data => "Data",
        }
    }
}

impl fmt::Display for PageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One physical page, borrowing its bytes from the loaded image.
#[derive(Clone, Debug)]
pub struct PageRecord<'a> {
    pub category: PageCategory,
    // 1-based
    pub index_within_category: u32,
    // 0-based
    pub global_index: u32,
    pub byte_offset: u64,
    pub bytes: &'a [u8],
    pub label: String,
    pub extraction_hint: Option<String>,
}

impl<'a> PageRecord<'a> {
    pub fn new(
        category: PageCategory,
        index_within_category: u32,
        global_index: u32,
        page_count: u16,
        page_size: u32,
        bytes: &'a [u8],
    ) -> Self {
        let label = if category == PageCategory::Meta {
            format!("[{}/{page_count}] Meta Page", global_index + 1)
        } else {
            format!(
                "[{}/{page_count}] {category} Page # {index_within_category}",
                global_index + 1,
            )
        };

        PageRecord {
            category,
            index_within_category,
            global_index,
            byte_offset: u64::from(global_index) * u64::from(page_size),
            bytes,
            label,
            extraction_hint: None,
        }
    }

    /// Attach the `xxd` invocation that extracts the same bytes from `filename`.
    pub fn with_hint(mut self, filename: &str, page_size: u32) -> Self {
        self.extraction_hint = Some(format!(
            "xxd -s 0x{:x} -l {page_size} {filename}",
            self.byte_offset
        ));
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
