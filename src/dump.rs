use std::fmt::{self, Write};

use super::{
    codec,
    meta::{self, MetaDescriptor},
    page::{PageCategory, PageRecord, PLT_ENTRY_SIZE, PT_ENTRY_SIZE, ROW_SIZE},
};

/// Semantic region a single byte belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ByteTag {
    MagicNumber,
    LayoutType,
    PageSize,
    PageCount,
    SwapPageCount,
    BitmapPageCount,
    PageTablePageCount,
    EntryListPageCount,
    BitmapActive,
}

impl ByteTag {
    pub const fn color(self) -> &'static str {
        match self {
            ByteTag::MagicNumber => "#ff4444",
            ByteTag::LayoutType => "#00ff00",
            ByteTag::PageSize => "#4444ff",
            ByteTag::PageCount => "#ff8800",
            ByteTag::SwapPageCount => "#bb00bb",
            ByteTag::BitmapPageCount => "#00ff88",
            ByteTag::PageTablePageCount => "#ffff00",
            ByteTag::EntryListPageCount => "#ff00ff",
            ByteTag::BitmapActive => "#00aaff",
        }
    }
}

/// Style of a whole row starting on an entry boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RowStyle {
    PageTableEntry,
    EntryListEntry,
}

impl RowStyle {
    fn of(category: PageCategory, row_start: usize) -> Option<Self> {
        match category {
            PageCategory::PageTable if row_start % PT_ENTRY_SIZE == 0 => {
                Some(RowStyle::PageTableEntry)
            }
            PageCategory::PageTableEntryList if row_start % PLT_ENTRY_SIZE == 0 => {
                Some(RowStyle::EntryListEntry)
            }
            _ => None,
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            RowStyle::PageTableEntry => "#ff0088",
            RowStyle::EntryListEntry => "#aa00aa",
        }
    }
}

#[derive(Clone, Copy)]
enum End {
    At(usize),
    BitmapHeader,
}

struct TagRule {
    category: PageCategory,
    start: usize,
    end: End,
    tag: ByteTag,
}

const fn field(start: usize, end: usize, tag: ByteTag) -> TagRule {
    TagRule {
        category: PageCategory::Meta,
        start,
        end: End::At(end),
        tag,
    }
}

/// First matching rule wins.
const RULES: &[TagRule] = &[
    field(meta::MAGIC_NUMBER.start, meta::MAGIC_NUMBER.end, ByteTag::MagicNumber),
    field(meta::LAYOUT_TYPE.start, meta::LAYOUT_TYPE.end, ByteTag::LayoutType),
    field(meta::PAGE_SIZE.start, meta::PAGE_SIZE.end, ByteTag::PageSize),
    field(meta::PAGE_COUNT.start, meta::PAGE_COUNT.end, ByteTag::PageCount),
    field(meta::SWAP_PAGE_COUNT.start, meta::SWAP_PAGE_COUNT.end, ByteTag::SwapPageCount),
    field(meta::BITMAP_PAGE_COUNT.start, meta::BITMAP_PAGE_COUNT.end, ByteTag::BitmapPageCount),
    field(meta::PT_PAGE_COUNT.start, meta::PT_PAGE_COUNT.end, ByteTag::PageTablePageCount),
    field(meta::PLT_PAGE_COUNT.start, meta::PLT_PAGE_COUNT.end, ByteTag::EntryListPageCount),
    TagRule {
        category: PageCategory::Bitmap,
        start: 0,
        end: End::BitmapHeader,
        tag: ByteTag::BitmapActive,
    },
];

/// Tag of the byte at page-relative offset `n`.
pub fn tag_of(category: PageCategory, n: usize, meta: &MetaDescriptor) -> Option<ByteTag> {
    RULES
        .iter()
        .filter(|rule| rule.category == category)
        .find(|rule| {
            let end = match rule.end {
                End::At(end) => end,
                End::BitmapHeader => meta.bitmap_header_len(),
            };
            (rule.start..end).contains(&n)
        })
        .map(|rule| rule.tag)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub byte: u8,
    pub tag: Option<ByteTag>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Row {
    /// Absolute offset of the first byte in the image.
    pub offset: u64,
    pub style: Option<RowStyle>,
    pub cells: Vec<Cell>,
}

impl Row {
    /// Hex column, a space after every second byte.
    pub fn hex(&self) -> String {
        let mut s = String::with_capacity(ROW_SIZE * 5 / 2);
        for (j, cell) in self.cells.iter().enumerate() {
            s.push_str(&hex::encode([cell.byte]));
            if (j + 1) % 2 == 0 {
                s.push(' ');
            }
        }
        s
    }

    pub fn ascii(&self) -> String {
        self.cells
            .iter()
            .map(|cell| codec::to_printable_ascii(cell.byte))
            .collect()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}  {}",
            codec::to_hex(self.offset, 8),
            self.hex(),
            self.ascii()
        )
    }
}

/// Hex and ASCII dump of one page with byte level annotations.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FormattedDump {
    pub title: String,
    pub rows: Vec<Row>,
}

impl FormattedDump {
    pub fn new(page: &PageRecord<'_>, meta: &MetaDescriptor) -> Self {
        let rows = page
            .bytes
            .chunks(ROW_SIZE)
            .enumerate()
            .map(|(r, chunk)| {
                let row_start = r * ROW_SIZE;
                let cells = chunk
                    .iter()
                    .enumerate()
                    .map(|(j, &byte)| Cell {
                        byte,
                        tag: tag_of(page.category, row_start + j, meta),
                    })
                    .collect();
                Row {
                    offset: page.byte_offset + row_start as u64,
                    style: RowStyle::of(page.category, row_start),
                    cells,
                }
            })
            .collect();

        FormattedDump {
            title: page.label.clone(),
            rows,
        }
    }

    /// Tag of the byte at page-relative `offset`, `None` if untagged or out of range.
    pub fn tag_at(&self, offset: usize) -> Option<ByteTag> {
        self.rows
            .get(offset / ROW_SIZE)?
            .cells
            .get(offset % ROW_SIZE)?
            .tag
    }

    /// HTML rendering, one `<pre>` per row, tagged bytes wrapped in colored spans.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        out.push_str("<pre>");
        escape_into(&mut out, &self.title);
        out.push_str("</pre><pre>");
        out.push_str(&"_".repeat(68));
        out.push_str("</pre>");

        for row in &self.rows {
            match row.style {
                Some(style) => {
                    let _ = write!(out, r#"<pre style="color: {}">"#, style.color());
                }
                None => out.push_str("<pre>"),
            }
            out.push_str(&codec::to_hex(row.offset, 8));
            out.push_str(": ");
            for (j, cell) in row.cells.iter().enumerate() {
                let byte = hex::encode([cell.byte]);
                match cell.tag {
                    Some(tag) => {
                        let _ = write!(out, r#"<span style="color: {}">{byte}</span>"#, tag.color());
                    }
                    None => out.push_str(&byte),
                }
                if (j + 1) % 2 == 0 {
                    out.push(' ');
                }
            }
            out.push_str("  ");
            escape_into(&mut out, &row.ascii());
            out.push_str("</pre>");
        }

        out
    }
}

impl fmt::Display for FormattedDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
}
