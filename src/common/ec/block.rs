use super::{ecc, G, MAX_BLOCK_SIZE};

// Data codewords of a block followed by the ecc derived from them
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct Block {
    data: [u8; MAX_BLOCK_SIZE],
    // Block length
    len: usize,
    // Data length
    dlen: usize,
}

impl Block {
    pub fn new(raw: &[u8], gen_poly: &[G]) -> Self {
        let dlen = raw.len();
        let len = dlen + gen_poly.len() - 1;
        debug_assert!(len <= MAX_BLOCK_SIZE, "Block too large: {len}");

        let mut data = [0u8; MAX_BLOCK_SIZE];
        data[..dlen].copy_from_slice(raw);
        data[dlen..len].copy_from_slice(&ecc(raw, gen_poly));
        Self { data, len, dlen }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn ec_len(&self) -> usize {
        self.len - self.dlen
    }

    #[cfg(test)]
    pub fn data_len(&self) -> usize {
        self.dlen
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlen]
    }

    pub fn ecc(&self) -> &[u8] {
        &self.data[self.dlen..self.len]
    }
}
