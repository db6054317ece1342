use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Walks column pairs from the right edge, alternating upward and downward,
// visiting the right column of a pair before the left one. The vertical timing
// column is skipped entirely. Reserved modules are yielded too; the caller is
// responsible for skipping them.
#[derive(Clone)]
pub struct EncRegionIter {
    r: i16,
    c: i16,
    w: i16,
    upward: bool,
    left: bool,
}

impl EncRegionIter {
    pub fn new(ver: Version) -> Self {
        let w = ver.width() as i16;
        Self { r: w - 1, c: w - 1, w, upward: true, left: false }
    }

    fn advance(&mut self) {
        if !self.left {
            self.left = true;
            return;
        }
        self.left = false;

        let at_edge = if self.upward { self.r == 0 } else { self.r == self.w - 1 };
        if !at_edge {
            self.r += if self.upward { -1 } else { 1 };
            return;
        }

        self.upward = !self.upward;
        self.c -= 2;
        if self.c == VERT_TIMING_COL {
            self.c -= 1;
        }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);

    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 0 {
            return None;
        }
        let res = (self.r, self.c - self.left as i16);
        self.advance();
        Some(res)
    }
}


// Global constants
//------------------------------------------------------------------------------

static VERT_TIMING_COL: i16 = 6;
