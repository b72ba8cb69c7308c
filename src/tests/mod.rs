
use crate::HEADER_SIZE;

/// Meta header with magic `VSML` and layout `LIN1`.
pub fn header(raw_page_size: u16, pages: u16, swap: u16, bitmap: u16, pt: u16, plt: u16) -> Vec<u8> {
    let mut v = Vec::with_capacity(HEADER_SIZE);
    v.extend_from_slice(b"VSML");
    v.extend_from_slice(b"LIN1");
    for field in [raw_page_size, pages, swap, bitmap, pt, plt] {
        v.extend_from_slice(&field.to_be_bytes());
    }
    v
}

/// Full image of `pages` zeroed pages with the header in front.
pub fn image(raw_page_size: u16, pages: u16, swap: u16, bitmap: u16, pt: u16, plt: u16) -> Vec<u8> {
    let mut v = vec![0; usize::from(raw_page_size) * 0x400 * usize::from(pages)];
    let h = header(raw_page_size, pages, swap, bitmap, pt, plt);
    let len = h.len().min(v.len());
    v[..len].clone_from_slice(&h[..len]);
    v
}

pub fn init_log() {
    let env = env_logger::Env::new().filter_or("RUST_LOG", "vsml=info");
    env_logger::try_init_from_env(env).unwrap_or_default();
}
