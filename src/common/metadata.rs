use std::fmt::{Display, Formatter};
use std::ops::{Deref, Not};

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Color {
    pub fn select<T>(self, light: T, dark: T) -> T {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }
}

impl From<Color> for u8 {
    fn from(clr: Color) -> Self {
        clr.select(0, 1)
    }
}

impl From<bool> for Color {
    fn from(bit: bool) -> Self {
        if bit {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Version {
    pub fn new(version: usize) -> QRResult<Self> {
        match version {
            1..=40 => Ok(Self(version)),
            _ => Err(QRError::InvalidVersion),
        }
    }

    // Every version in ascending order of size
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=40).map(Self)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0 - 1]
    }

    pub fn total_codewords(self) -> usize {
        TOTAL_CODEWORDS[self.0 - 1]
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        BLOCK_LAYOUT[self.0 - 1][ecl as usize].0
    }

    // Returns (block1 size, block1 count, block2 size, block2 count)
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let (_, b1_cnt, b1_sz, b2_cnt, b2_sz) = BLOCK_LAYOUT[self.0 - 1][ecl as usize];
        (b1_sz, b1_cnt, b2_sz, b2_cnt)
    }

    pub fn block_count(self, ecl: ECLevel) -> usize {
        let (_, b1_cnt, _, b2_cnt) = self.data_codewords_per_block(ecl);
        b1_cnt + b2_cnt
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        let (b1_sz, b1_cnt, b2_sz, b2_cnt) = self.data_codewords_per_block(ecl);
        b1_sz * b1_cnt + b2_sz * b2_cnt
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    pub fn remainder_bits(self) -> usize {
        match self.0 {
            2..=6 => 7,
            14..=20 | 28..=34 => 3,
            21..=27 => 4,
            _ => 0,
        }
    }

    pub fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        match (self.0, mode) {
            (1..=9, Mode::Numeric) => 10,
            (1..=9, Mode::Alphanumeric) => 9,
            (1..=9, Mode::Byte) => 8,
            (10..=26, Mode::Numeric) => 12,
            (10..=26, Mode::Alphanumeric) => 11,
            (10..=26, Mode::Byte) => 16,
            (_, Mode::Numeric) => 14,
            (_, Mode::Alphanumeric) => 13,
            (_, Mode::Byte) => 16,
        }
    }

    // 18 bit BCH codeword carrying the version number, only exists from version 7
    pub fn info(self) -> u32 {
        debug_assert!(self.0 >= 7, "Version info is absent below version 7: {}", self.0);
        VERSION_INFOS[self.0 - 7]
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    #[default]
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    // 2 bit indicator written into format info
    pub fn indicator(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

// Format info
//------------------------------------------------------------------------------

pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u32 {
    FORMAT_INFOS[((ecl.indicator() << 3) | *mask as u32) as usize]
}

// Metadata
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Metadata {
    version: Version,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl Metadata {
    pub fn new(version: Version, ec_level: ECLevel, mask: Option<MaskPattern>) -> Self {
        Self { version, ec_level, mask }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.mask {
            Some(m) => write!(
                f,
                "{{ Version: {}, Ec level: {:?}, Mask: {} }}",
                self.version, self.ec_level, *m
            ),
            None => {
                write!(f, "{{ Version: {}, Ec level: {:?}, Mask: None }}", self.version, self.ec_level)
            }
        }
    }
}

#[cfg(test)]
mod metadata_tests {
    use test_case::test_case;

    use super::{format_info, ECLevel, Metadata, Version};
    use crate::common::codec::Mode;
    use crate::common::mask::MaskPattern;

    #[test]
    fn test_version_range() {
        assert!(Version::new(0).is_err());
        assert!(Version::new(41).is_err());
        assert_eq!(*Version::new(40).unwrap(), 40);
        assert_eq!(Version::all().count(), 40);
    }

    #[test]
    fn test_width() {
        for ver in Version::all() {
            assert_eq!(ver.width(), *ver * 4 + 17);
        }
        assert_eq!(Version::new(1).unwrap().width(), 21);
        assert_eq!(Version::new(40).unwrap().width(), 177);
    }

    #[test]
    fn test_block_layout_consistency() {
        for ver in Version::all() {
            for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                let total = ver.total_codewords();
                let ecc_total = ver.ecc_per_block(ecl) * ver.block_count(ecl);
                assert_eq!(ver.data_codewords(ecl), total - ecc_total, "{ver} {ecl:?}");

                let (b1_sz, _, b2_sz, b2_cnt) = ver.data_codewords_per_block(ecl);
                if b2_cnt > 0 {
                    assert_eq!(b2_sz, b1_sz + 1, "{ver} {ecl:?}");
                }
            }
        }
    }

    #[test]
    fn test_data_codewords_decrease_with_ec_level() {
        for ver in Version::all() {
            let caps = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H].map(|e| ver.data_codewords(e));
            assert!(caps.windows(2).all(|w| w[0] > w[1]), "{ver} {caps:?}");
        }
    }

    #[test]
    fn test_data_region_matches_total_codewords() {
        // Raw data modules minus function patterns equals codewords plus remainder bits
        for ver in Version::all() {
            let v = *ver;
            let mut raw = (16 * v + 128) * v + 64;
            if v >= 2 {
                let n = v / 7 + 2;
                raw -= (25 * n - 10) * n - 55;
                if v >= 7 {
                    raw -= 36;
                }
            }
            assert_eq!(raw, ver.total_codewords() * 8 + ver.remainder_bits(), "{ver}");
        }
    }

    #[test]
    fn test_alignment_pattern_positions() {
        assert!(Version::new(1).unwrap().alignment_pattern().is_empty());
        for ver in Version::all().skip(1) {
            let poses = ver.alignment_pattern();
            assert_eq!(poses.len(), *ver / 7 + 2, "{ver}");
            assert_eq!(poses[0], 6);
            assert_eq!(*poses.last().unwrap() as usize, ver.width() - 7, "{ver}");
        }
    }

    #[test_case(1, Mode::Numeric, 10)]
    #[test_case(9, Mode::Alphanumeric, 9)]
    #[test_case(10, Mode::Byte, 16)]
    #[test_case(26, Mode::Numeric, 12)]
    #[test_case(27, Mode::Alphanumeric, 13)]
    #[test_case(40, Mode::Byte, 16)]
    fn test_char_cnt_bits(ver: usize, mode: Mode, exp: usize) {
        assert_eq!(Version::new(ver).unwrap().char_cnt_bits(mode), exp);
    }

    #[test]
    fn test_version_info() {
        assert_eq!(Version::new(7).unwrap().info(), 0x07C94);
        assert_eq!(Version::new(40).unwrap().info(), 0x28C69);
        for ver in Version::all().skip(6) {
            assert_eq!(ver.info() >> 12, *ver as u32);
        }
    }

    #[test_case(ECLevel::L, 0, 0x77C4)]
    #[test_case(ECLevel::L, 4, 0x662F)]
    #[test_case(ECLevel::M, 0, 0x5412)]
    #[test_case(ECLevel::M, 5, 0x40CE)]
    #[test_case(ECLevel::Q, 7, 0x2BED)]
    #[test_case(ECLevel::H, 3, 0x19D0)]
    fn test_format_info(ecl: ECLevel, mask: u8, exp: u32) {
        assert_eq!(format_info(ecl, MaskPattern::new(mask).unwrap()), exp);
    }

    #[test]
    fn test_format_info_distinct() {
        let mut infos = super::FORMAT_INFOS.to_vec();
        infos.sort();
        infos.dedup();
        assert_eq!(infos.len(), 32);
        assert!(infos.iter().all(|&i| i < 1 << super::FORMAT_INFO_BIT_LEN));
    }

    #[test]
    fn test_metadata_display() {
        let ver = Version::new(3).unwrap();
        let meta = Metadata::new(ver, ECLevel::Q, None);
        assert_eq!(meta.to_string(), "{ Version: 3, Ec level: Q, Mask: None }");
        let meta = Metadata::new(ver, ECLevel::Q, Some(MaskPattern::new(6).unwrap()));
        assert_eq!(meta.to_string(), "{ Version: 3, Ec level: Q, Mask: 6 }");
    }
}

// Global constants
//------------------------------------------------------------------------------

pub static FORMAT_INFO_BIT_LEN: usize = 15;

pub static VERSION_INFO_BIT_LEN: usize = 18;

// Indexed by (ec indicator << 3) | mask pattern
static FORMAT_INFOS: [u32; 32] = [
    0x5412, 0x5125, 0x5E7C, 0x5B4B, 0x45F9, 0x40CE, 0x4F97, 0x4AA0,
    0x77C4, 0x72F3, 0x7DAA, 0x789D, 0x662F, 0x6318, 0x6C41, 0x6976,
    0x1689, 0x13BE, 0x1CE7, 0x19D0, 0x0762, 0x0255, 0x0D0C, 0x083B,
    0x355F, 0x3068, 0x3F31, 0x3A06, 0x24B4, 0x2183, 0x2EDA, 0x2BED,
];

// Versions 7 to 40
static VERSION_INFOS: [u32; 34] = [
    0x07C94, 0x085BC, 0x09A99, 0x0A4D3, 0x0BBF6, 0x0C762,
    0x0D847, 0x0E60D, 0x0F928, 0x10B78, 0x1145D, 0x12A17,
    0x13532, 0x149A6, 0x15683, 0x168C9, 0x177EC, 0x18EC4,
    0x191E1, 0x1AFAB, 0x1B08E, 0x1CC1A, 0x1D33F, 0x1ED75,
    0x1F250, 0x209D5, 0x216F0, 0x228BA, 0x2379F, 0x24B0B,
    0x2542E, 0x26A64, 0x27541, 0x28C69,
];

static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

static TOTAL_CODEWORDS: [usize; 40] = [
    26, 44, 70, 100, 134, 172, 196, 242, 292, 346,
    404, 466, 532, 581, 655, 733, 815, 901, 991, 1085,
    1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185,
    2323, 2465, 2611, 2761, 2876, 3034, 3196, 3362, 3532, 3706,
];

// (ecc per block, group 1 blocks, group 1 data codewords, group 2 blocks, group 2 data codewords)
// for ec levels L, M, Q & H
static BLOCK_LAYOUT: [[(usize, usize, usize, usize, usize); 4]; 40] = [
    [(7, 1, 19, 0, 0), (10, 1, 16, 0, 0), (13, 1, 13, 0, 0), (17, 1, 9, 0, 0)],
    [(10, 1, 34, 0, 0), (16, 1, 28, 0, 0), (22, 1, 22, 0, 0), (28, 1, 16, 0, 0)],
    [(15, 1, 55, 0, 0), (26, 1, 44, 0, 0), (18, 2, 17, 0, 0), (22, 2, 13, 0, 0)],
    [(20, 1, 80, 0, 0), (18, 2, 32, 0, 0), (26, 2, 24, 0, 0), (16, 4, 9, 0, 0)],
    [(26, 1, 108, 0, 0), (24, 2, 43, 0, 0), (18, 2, 15, 2, 16), (22, 2, 11, 2, 12)],
    [(18, 2, 68, 0, 0), (16, 4, 27, 0, 0), (24, 4, 19, 0, 0), (28, 4, 15, 0, 0)],
    [(20, 2, 78, 0, 0), (18, 4, 31, 0, 0), (18, 2, 14, 4, 15), (26, 4, 13, 1, 14)],
    [(24, 2, 97, 0, 0), (22, 2, 38, 2, 39), (22, 4, 18, 2, 19), (26, 4, 14, 2, 15)],
    [(30, 2, 116, 0, 0), (22, 3, 36, 2, 37), (20, 4, 16, 4, 17), (24, 4, 12, 4, 13)],
    [(18, 2, 68, 2, 69), (26, 4, 43, 1, 44), (24, 6, 19, 2, 20), (28, 6, 15, 2, 16)],
    [(20, 4, 81, 0, 0), (30, 1, 50, 4, 51), (28, 4, 22, 4, 23), (24, 3, 12, 8, 13)],
    [(24, 2, 92, 2, 93), (22, 6, 36, 2, 37), (26, 4, 20, 6, 21), (28, 7, 14, 4, 15)],
    [(26, 4, 107, 0, 0), (22, 8, 37, 1, 38), (24, 8, 20, 4, 21), (22, 12, 11, 4, 12)],
    [(30, 3, 115, 1, 116), (24, 4, 40, 5, 41), (20, 11, 16, 5, 17), (24, 11, 12, 5, 13)],
    [(22, 5, 87, 1, 88), (24, 5, 41, 5, 42), (30, 5, 24, 7, 25), (24, 11, 12, 7, 13)],
    [(24, 5, 98, 1, 99), (28, 7, 45, 3, 46), (24, 15, 19, 2, 20), (30, 3, 15, 13, 16)],
    [(28, 1, 107, 5, 108), (28, 10, 46, 1, 47), (28, 1, 22, 15, 23), (28, 2, 14, 17, 15)],
    [(30, 5, 120, 1, 121), (26, 9, 43, 4, 44), (28, 17, 22, 1, 23), (28, 2, 14, 19, 15)],
    [(28, 3, 113, 4, 114), (26, 3, 44, 11, 45), (26, 17, 21, 4, 22), (26, 9, 13, 16, 14)],
    [(28, 3, 107, 5, 108), (26, 3, 41, 13, 42), (30, 15, 24, 5, 25), (28, 15, 15, 10, 16)],
    [(28, 4, 116, 4, 117), (26, 17, 42, 0, 0), (28, 17, 22, 6, 23), (30, 19, 16, 6, 17)],
    [(28, 2, 111, 7, 112), (28, 17, 46, 0, 0), (30, 7, 24, 16, 25), (24, 34, 13, 0, 0)],
    [(30, 4, 121, 5, 122), (28, 4, 47, 14, 48), (30, 11, 24, 14, 25), (30, 16, 15, 14, 16)],
    [(30, 6, 117, 4, 118), (28, 6, 45, 14, 46), (30, 11, 24, 16, 25), (30, 30, 16, 2, 17)],
    [(26, 8, 106, 4, 107), (28, 8, 47, 13, 48), (30, 7, 24, 22, 25), (30, 22, 15, 13, 16)],
    [(28, 10, 114, 2, 115), (28, 19, 46, 4, 47), (28, 28, 22, 6, 23), (30, 33, 16, 4, 17)],
    [(30, 8, 122, 4, 123), (28, 22, 45, 3, 46), (30, 8, 23, 26, 24), (30, 12, 15, 28, 16)],
    [(30, 3, 117, 10, 118), (28, 3, 45, 23, 46), (30, 4, 24, 31, 25), (30, 11, 15, 31, 16)],
    [(30, 7, 116, 7, 117), (28, 21, 45, 7, 46), (30, 1, 23, 37, 24), (30, 19, 15, 26, 16)],
    [(30, 5, 115, 10, 116), (28, 19, 47, 10, 48), (30, 15, 24, 25, 25), (30, 23, 15, 25, 16)],
    [(30, 13, 115, 3, 116), (28, 2, 46, 29, 47), (30, 42, 24, 1, 25), (30, 23, 15, 28, 16)],
    [(30, 17, 115, 0, 0), (28, 10, 46, 23, 47), (30, 10, 24, 35, 25), (30, 19, 15, 35, 16)],
    [(30, 17, 115, 1, 116), (28, 14, 46, 21, 47), (30, 29, 24, 19, 25), (30, 11, 15, 46, 16)],
    [(30, 13, 115, 6, 116), (28, 14, 46, 23, 47), (30, 44, 24, 7, 25), (30, 59, 16, 1, 17)],
    [(30, 12, 121, 7, 122), (28, 12, 47, 26, 48), (30, 39, 24, 14, 25), (30, 22, 15, 41, 16)],
    [(30, 6, 121, 14, 122), (28, 6, 47, 34, 48), (30, 46, 24, 10, 25), (30, 2, 15, 64, 16)],
    [(30, 17, 122, 4, 123), (28, 29, 46, 14, 47), (30, 49, 24, 10, 25), (30, 24, 15, 46, 16)],
    [(30, 4, 122, 18, 123), (28, 13, 46, 32, 47), (30, 48, 24, 14, 25), (30, 42, 15, 32, 16)],
    [(30, 20, 117, 4, 118), (28, 40, 47, 7, 48), (30, 43, 24, 22, 25), (30, 10, 15, 67, 16)],
    [(30, 19, 118, 6, 119), (28, 18, 47, 31, 48), (30, 34, 24, 34, 25), (30, 20, 15, 61, 16)],
];
