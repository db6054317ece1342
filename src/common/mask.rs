use std::fmt::{Display, Formatter};
use std::ops::Deref;

use log::{debug, trace};
use rayon::prelude::*;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern >= 8 {
            return Err(QRError::InvalidMaskingPattern);
        }
        Ok(Self(pattern))
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).map(Self)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

mod mask_functions {
    pub fn checkerboard(r: i32, c: i32) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i32, _: i32) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i32, c: i32) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i32, c: i32) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i32, c: i32) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i32, c: i32) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i32, c: i32) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i32, c: i32) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    // Whether the module at row r, column c is flipped by this pattern
    pub fn mask_function(self) -> fn(i32, i32) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid pattern {}", *self),
        }
    }
}

// Mask selection
//------------------------------------------------------------------------------

// Scores every pattern on its own copy of the symbol and applies the cheapest.
// Ties go to the lower pattern index.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let (pen, best) = (0..8)
        .into_par_iter()
        .map(MaskPattern)
        .map(|mask| {
            let mut candidate = qr.clone();
            candidate.apply_mask(mask);
            let pen = compute_total_penalty(&candidate);
            trace!("Mask {mask} penalty {pen}");
            (pen, mask)
        })
        .reduce(|| (u32::MAX, MaskPattern(7)), std::cmp::min);

    debug!("Selected mask {best} with penalty {pen}");
    qr.apply_mask(best);
    best
}

// Penalty
//------------------------------------------------------------------------------

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let rows = (0..w).map(|r| (0..w).map(|c| *qr.get(r, c)).collect()).collect::<Vec<Vec<_>>>();
    let cols = (0..w).map(|c| (0..w).map(|r| *qr.get(r, c)).collect()).collect::<Vec<Vec<_>>>();

    let adj_pen = rows.iter().chain(&cols).map(|l| compute_adjacent_penalty(l)).sum::<u32>();
    let blk_pen = compute_block_penalty(&rows);
    let fp_pen = rows.iter().chain(&cols).map(|l| compute_finder_pattern_penalty(l)).sum::<u32>();
    let bal_pen = compute_balance_penalty(qr.count_dark_modules(), rows.len() * rows.len());
    adj_pen + blk_pen + fp_pen + bal_pen
}

// Every run of 5 or more same coloured modules scores 3, plus 1 per extra module
fn compute_adjacent_penalty(line: &[Color]) -> u32 {
    line.chunk_by(|a, b| a == b).filter(|run| run.len() >= 5).map(|run| run.len() as u32 - 2).sum()
}

fn compute_block_penalty(rows: &[Vec<Color>]) -> u32 {
    let mut pen = 0;
    for pair in rows.windows(2) {
        let (top, bot) = (&pair[0], &pair[1]);
        for c in 0..top.len().saturating_sub(1) {
            let clr = top[c];
            if clr == top[c + 1] && clr == bot[c] && clr == bot[c + 1] {
                pen += 3;
            }
        }
    }
    pen
}

fn compute_finder_pattern_penalty(line: &[Color]) -> u32 {
    let hits = line
        .windows(FINDER_LIKE_PATTERNS[0].len())
        .filter(|win| FINDER_LIKE_PATTERNS.iter().any(|p| p[..] == win[..]))
        .count();
    hits as u32 * 40
}

// 10 points for every full 5% the dark ratio deviates from 50%
fn compute_balance_penalty(dark_cnt: usize, total: usize) -> u32 {
    let dev = (dark_cnt * 20).abs_diff(total * 10);
    (dev / total) as u32 * 10
}

#[cfg(test)]
mod mask_tests {
    use test_case::test_case;

    use super::{
        compute_adjacent_penalty, compute_balance_penalty, compute_block_penalty,
        compute_finder_pattern_penalty, MaskPattern,
    };
    use crate::common::error::QRError;
    use crate::common::metadata::Color;

    fn line(bits: &str) -> Vec<Color> {
        bits.chars().map(|b| Color::from(b == '1')).collect()
    }

    #[test]
    fn test_mask_pattern_range() {
        assert_eq!(MaskPattern::all().count(), 8);
        assert_eq!(*MaskPattern::new(7).unwrap(), 7);
        assert_eq!(MaskPattern::new(8), Err(QRError::InvalidMaskingPattern));
    }

    #[test_case(0, 0, 0, true)]
    #[test_case(0, 0, 1, false)]
    #[test_case(1, 1, 0, false)]
    #[test_case(1, 2, 5, true)]
    #[test_case(2, 5, 3, true)]
    #[test_case(2, 3, 5, false)]
    #[test_case(3, 1, 2, true)]
    #[test_case(3, 1, 1, false)]
    #[test_case(4, 0, 3, false)]
    #[test_case(4, 2, 0, false)]
    #[test_case(4, 2, 3, true)]
    #[test_case(5, 2, 3, true)]
    #[test_case(5, 1, 1, false)]
    #[test_case(6, 1, 2, true)]
    #[test_case(6, 1, 5, false)]
    #[test_case(7, 1, 3, true)]
    #[test_case(7, 2, 2, false)]
    fn test_mask_function(mask: u8, r: i32, c: i32, exp: bool) {
        let mask_fn = MaskPattern::new(mask).unwrap().mask_function();
        assert_eq!(mask_fn(r, c), exp);
    }

    #[test_case("0000", 0)]
    #[test_case("11111", 3)]
    #[test_case("0000000", 5)]
    #[test_case("111110000011111", 9)]
    #[test_case("1111011110", 0)]
    fn test_adjacent_penalty(bits: &str, exp: u32) {
        assert_eq!(compute_adjacent_penalty(&line(bits)), exp);
    }

    #[test]
    fn test_block_penalty() {
        let rows = vec![line("1110"), line("1110"), line("1101")];
        // Two dark blocks on the first pair of rows and one on the second
        assert_eq!(compute_block_penalty(&rows), 9);
        assert_eq!(compute_block_penalty(&[line("0000")]), 0);
    }

    #[test_case("10111010000", 40)]
    #[test_case("00001011101", 40)]
    #[test_case("000010111010000", 80)]
    #[test_case("1011101000", 0)]
    #[test_case("10111011000", 0)]
    fn test_finder_pattern_penalty(bits: &str, exp: u32) {
        assert_eq!(compute_finder_pattern_penalty(&line(bits)), exp);
    }

    #[test_case(50, 100, 0)]
    #[test_case(54, 100, 0)]
    #[test_case(44, 100, 10)]
    #[test_case(55, 100, 10)]
    #[test_case(100, 100, 100)]
    #[test_case(0, 441, 100)]
    #[test_case(250, 441, 10)]
    fn test_balance_penalty(dark: usize, total: usize, exp: u32) {
        assert_eq!(compute_balance_penalty(dark, total), exp);
    }
}

// Global constants
//------------------------------------------------------------------------------

static FINDER_LIKE_PATTERNS: [[Color; 11]; 2] = {
    use Color::{Dark as D, Light as L};
    [[D, L, D, D, D, L, D, L, L, L, L], [L, L, L, L, D, L, D, D, D, L, D]]
};
