use std::collections::BTreeMap;

use super::{
    bitmap::BitmapResult,
    dump::FormattedDump,
    layout,
    meta::{MetaDescriptor, MetaError},
    page::{PageCategory, PageRecord},
};

#[derive(Default, Clone, Copy, Debug)]
pub struct DecodeOptions {
    /// Slice declared swap pages into their own run between the page list
    /// table and data pages. Off by default: swap pages read as data.
    pub swap_pages: bool,
    /// Report the union of all bitmap pages instead of the last one decoded.
    pub merge_bitmaps: bool,
}

/// Everything decoded from one image. Loading another image means building a
/// new `Session`, nothing is shared between them.
pub struct Session<'a> {
    meta: MetaDescriptor,
    pages: Vec<PageRecord<'a>>,
    labels: Vec<String>,
    dumps: BTreeMap<String, FormattedDump>,
    used: BitmapResult,
}

impl<'a> Session<'a> {
    pub fn load(buffer: &'a [u8]) -> Result<Self, MetaError> {
        Self::load_with(buffer, None, DecodeOptions::default())
    }

    pub fn load_with(
        buffer: &'a [u8],
        filename: Option<&str>,
        options: DecodeOptions,
    ) -> Result<Self, MetaError> {
        let meta = MetaDescriptor::parse(buffer)?;
        log::info!(
            "load {} {} image: {} pages of {} bytes",
            meta.magic_number,
            meta.layout_type,
            meta.page_count,
            meta.page_size_bytes
        );

        let pages = layout::partition(buffer, &meta, filename, options.swap_pages);

        let mut used = BitmapResult::default();
        for page in pages.iter().filter(|p| p.category == PageCategory::Bitmap) {
            let decoded = BitmapResult::decode(page.bytes, meta.page_count);
            log::debug!("{}: {} pages in use", page.label, decoded.len());
            if options.merge_bitmaps {
                used.merge(&decoded);
            } else {
                used = decoded;
            }
        }

        let labels = pages.iter().map(|p| p.label.clone()).collect::<Vec<_>>();
        let dumps = pages
            .iter()
            .map(|p| (p.label.clone(), FormattedDump::new(p, &meta)))
            .collect();

        Ok(Session {
            meta,
            pages,
            labels,
            dumps,
            used,
        })
    }

    pub fn meta(&self) -> &MetaDescriptor {
        &self.meta
    }

    pub fn pages(&self) -> &[PageRecord<'a>] {
        &self.pages
    }

    /// Page labels in image order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn dump(&self, label: &str) -> Option<&FormattedDump> {
        self.dumps.get(label)
    }

    /// Dumps in image order.
    pub fn dumps(&self) -> impl Iterator<Item = (&str, &FormattedDump)> + '_ {
        self.labels
            .iter()
            .filter_map(|label| Some((label.as_str(), self.dumps.get(label)?)))
    }

    /// Formats page `index` again without touching the stored dumps.
    pub fn format_page(&self, index: usize) -> Option<FormattedDump> {
        let page = self.pages.get(index)?;
        Some(FormattedDump::new(page, &self.meta))
    }

    pub fn used_pages(&self) -> &BitmapResult {
        &self.used
    }

    pub fn page_used(&self) -> String {
        self.used.to_string()
    }
}
