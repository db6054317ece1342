use std::{fmt::Display, mem};

use num_traits::PrimInt;

// Bit stream
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
    // Max bit capacity
    capacity: usize,
    // Pointer to take bits
    cursor: usize,
}

impl BitStream {
    pub fn new(capacity: usize) -> Self {
        Self { data: vec![0; (capacity + 7) >> 3], len: 0, capacity, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..(self.len + 7) >> 3]
    }
}

// Push bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    // Appends the lowest `size` bits of `bits`, most significant bit first
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Into<u32> + Display,
    {
        let max_bits = mem::size_of::<T>() * 8;
        debug_assert!(size <= max_bits, "Bit count exceeds type width: Size {size}");
        debug_assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );
        debug_assert!(
            self.len + size <= self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + size
        );

        let bits: u32 = bits.into();
        let mut remaining = size;
        while remaining > 0 {
            let offset = self.len & 7;
            let pos = self.len >> 3;
            let take = remaining.min(8 - offset);
            let chunk = ((bits >> (remaining - take)) & ((1 << take) - 1)) as u8;
            self.data[pos] |= chunk << (8 - offset - take);
            self.len += take;
            remaining -= take;
        }
    }

    pub fn extend(&mut self, arr: &[u8]) {
        debug_assert!(
            (self.len & 7) == 0,
            "Bit offset must be zero to extend from another array: Bit offset {}",
            self.len & 7
        );
        let pos = self.len >> 3;
        let arr_bits = arr.len() << 3;
        debug_assert!(
            self.len + arr_bits <= self.capacity,
            "Extension shouldn't overflow capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + arr_bits
        );
        self.data[pos..pos + arr.len()].copy_from_slice(arr);
        self.len += arr_bits;
    }
}

// Take bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    #[cfg(test)]
    pub fn take_bits(&mut self, size: usize) -> Option<u16> {
        if size > 16 || self.cursor + size > self.len {
            return None;
        }
        let mut res = 0;
        for _ in 0..size {
            res = (res << 1) | self.next()? as u16;
        }
        Some(res)
    }
}

impl Iterator for BitStream {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }
        let bit = (self.data[self.cursor >> 3] >> (7 - (self.cursor & 7))) & 1 == 1;
        self.cursor += 1;
        Some(bit)
    }
}
