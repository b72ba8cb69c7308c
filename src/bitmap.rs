use std::fmt;

/// Pages marked in use by a bitmap page, ascending.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct BitmapResult {
    pub used_page_indices: Vec<u32>,
}

impl BitmapResult {
    /// Reads only the first `ceil(page_count / 8)` bytes of `page`. Bit 7 of
    /// byte `i` is page `i * 8`, bit 0 is page `i * 8 + 7`.
    pub fn decode(page: &[u8], page_count: u16) -> Self {
        let header_len = usize::from(page_count).div_ceil(8).min(page.len());

        let mut used_page_indices = vec![];
        for (i, byte) in page[..header_len].iter().enumerate() {
            for j in (0..8usize).rev() {
                if (byte >> j) & 1 == 1 {
                    used_page_indices.push((i * 8 + (7 - j)) as u32);
                }
            }
        }

        BitmapResult { used_page_indices }
    }

    pub fn is_used(&self, page: u32) -> bool {
        self.used_page_indices.binary_search(&page).is_ok()
    }

    pub fn len(&self) -> usize {
        self.used_page_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used_page_indices.is_empty()
    }

    /// Union with another result, keeping the order and dropping duplicates.
    pub fn merge(&mut self, other: &Self) {
        self.used_page_indices
            .extend_from_slice(&other.used_page_indices);
        self.used_page_indices.sort_unstable();
        self.used_page_indices.dedup();
    }
}

impl fmt::Display for BitmapResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut it = self.used_page_indices.iter();
        if let Some(first) = it.next() {
            write!(f, "{first}")?;
            for page in it {
                write!(f, ", {page}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::BitmapResult;

    #[test]
    fn decode() {
        // bits for pages 0, 3, 8, 15
        let mut page = vec![0; 1024];
        page[0] = 0b1001_0000;
        page[1] = 0b1000_0001;
        let result = BitmapResult::decode(&page, 16);
        assert_eq!(result.used_page_indices, [0, 3, 8, 15]);
        assert_eq!(result.to_string(), "0, 3, 8, 15");
        assert!(result.is_used(8));
        assert!(!result.is_used(9));
    }

    #[test]
    fn ignores_bytes_past_header() {
        let mut page = vec![0xff; 8];
        page[0] = 0b1010_0000;
        let result = BitmapResult::decode(&page, 4);
        assert_eq!(result.used_page_indices, [0, 2]);
    }

    #[test]
    fn short_page() {
        let result = BitmapResult::decode(&[0x80], 64);
        assert_eq!(result.used_page_indices, [0]);
        assert!(BitmapResult::decode(&[], 64).is_empty());
        assert!(BitmapResult::decode(&[0xff], 0).is_empty());
    }

    #[test]
    fn random() {
        let mut rng = StdRng::seed_from_u64(0x123);
        let page_count = 200u16;
        let mut page = vec![0u8; 64];
        let mut expected = vec![];
        for index in 0..u32::from(page_count) {
            if rng.gen_bool(0.3) {
                page[index as usize / 8] |= 0x80 >> (index % 8);
                expected.push(index);
            }
        }
        let result = BitmapResult::decode(&page, page_count);
        log::debug!("{}", hex::encode(&page[..25]));
        assert_eq!(result.used_page_indices, expected);
    }

    #[test]
    fn merge() {
        let mut a = BitmapResult {
            used_page_indices: vec![1, 4, 9],
        };
        let b = BitmapResult {
            used_page_indices: vec![0, 4, 10],
        };
        a.merge(&b);
        assert_eq!(a.used_page_indices, [0, 1, 4, 9, 10]);
        assert_eq!(BitmapResult::default().to_string(), "");
    }
}
