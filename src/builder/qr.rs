use std::ops::Deref;

use image::{GrayImage, Luma};

use crate::common::bit_utils::BitStream;
use crate::common::codec::Mode;
use crate::common::iter::EncRegionIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{
    format_info, Color, ECLevel, Metadata, Version, FORMAT_INFO_BIT_LEN, VERSION_INFO_BIT_LEN,
};

// Module of a symbol. The variant records which part of the symbol owns the
// cell, anything other than Empty and Data is reserved.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

impl Module {
    pub fn is_reserved(self) -> bool {
        matches!(self, Module::Func(_) | Module::Version(_) | Module::Format(_))
    }
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mode: Mode,
    data_len: usize,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn new(ver: Version, ecl: ECLevel, mode: Mode, data_len: usize) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mode, data_len, mask: None }
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    // Always set on a symbol returned by the builder
    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    // Character count, or utf-8 byte count in byte mode
    pub fn data_len(&self) -> usize {
        self.data_len
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.ver, self.ecl, self.mask)
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|m| matches!(***m, Color::Dark)).count()
    }

    // Row major grid of 0 for light and 1 for dark modules
    pub fn matrix(&self) -> Vec<Vec<u8>> {
        self.grid.chunks(self.w).map(|row| row.iter().map(|m| u8::from(**m)).collect()).collect()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "Row out of bounds: {r}");
        debug_assert!(-w <= c && c < w, "Column out of bounds: {c}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    // Negative coordinates wrap around from the far edge
    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub(crate) fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Draws the 7x7 pattern centred at (r, c) with its separator on the inner sides
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom): (i16, i16) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right): (i16, i16) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                let clr = match i16::max(i.abs(), j.abs()) {
                    4 | 2 => Color::Light,
                    _ => Color::Dark,
                };
                self.set(r + i, c + j, Module::Func(clr));
            }
        }
    }
}

// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let last = self.w as i16 - 9;
        self.draw_line(6, 8, 6, last);
        self.draw_line(8, 6, last, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Func(Color::from(j & 1 == 0)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Func(Color::from(i & 1 == 0)));
            }
        }
    }
}

// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        // Centres overlapping a finder pattern are skipped
        if (r == 6 && (c == 6 || c == w - 7)) || (r == w - 7 && c == 6) {
            return;
        }
        for i in -2i16..=2 {
            for j in -2i16..=2 {
                let clr = match i16::max(i.abs(), j.abs()) {
                    1 => Color::Light,
                    _ => Color::Dark,
                };
                self.set(r + i, c + j, Module::Func(clr));
            }
        }
    }
}

// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        let (off, on) = (Module::Format(Color::Light), Module::Format(Color::Dark));
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_MAIN);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_SIDE);
        // Dark module at (4 * version + 9, 8)
        self.set(-8, 8, on);
    }

    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let ver_info = self.ver.info();
        let (off, on) = (Module::Version(Color::Light), Module::Version(Color::Dark));
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_TR);
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_BL);
    }

    // Writes the lowest bit_len bits of number along coords, most significant bit first
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        debug_assert_eq!(coords.len(), bit_len, "Coordinate count doesn't match bit length");

        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            let module = if number & mask == 0 { off_clr } else { on_clr };
            self.set(r, c, module);
            mask >>= 1;
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_encoding_region(&mut self, payload: BitStream) {
        self.reserve_format_area();
        self.draw_version_info();

        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload {
            for (r, c) in coords.by_ref() {
                if matches!(self.get(r, c), Module::Empty) {
                    self.set(r, c, Module::Data(Color::from(bit)));
                    break;
                }
            }
        }
        self.fill_remainder_bits(coords);

        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module left after drawing payload");
    }

    // Cells left over after the last codeword are light data modules
    fn fill_remainder_bits(&mut self, coords: impl Iterator<Item = (i16, i16)>) {
        let mut filled = 0;
        for (r, c) in coords {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Data(Color::Light));
                filled += 1;
            }
        }
        debug_assert_eq!(filled, self.ver.remainder_bits(), "Remainder bits of version {}", self.ver);
    }

    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if let Module::Data(clr) = self.get(r, c) {
                    if mask_fn(r as i32, c as i32) {
                        self.set(r, c, Module::Data(!clr));
                    }
                }
            }
        }
        self.draw_format_info(format_info(self.ecl, pattern));
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use super::qr_util_tests::blank;
    use super::{Module, QR};
    use crate::common::bit_utils::BitStream;
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{Color, Version};

    fn filled(ver: usize, fill: u8) -> QR {
        let mut qr = blank(ver);
        let total = qr.version().total_codewords();
        let mut payload = BitStream::new(total << 3);
        payload.extend(&vec![fill; total]);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(payload);
        qr
    }

    #[test]
    fn test_first_codeword_placement() {
        let qr = filled(1, 0b1000_0001);
        let dark = [(20, 20), (17, 19)];
        let light = [(20, 19), (19, 20), (19, 19), (18, 20), (18, 19), (17, 20)];
        for (r, c) in dark {
            assert_eq!(qr.get(r, c), Module::Data(Color::Dark), "({r}, {c})");
        }
        for (r, c) in light {
            assert_eq!(qr.get(r, c), Module::Data(Color::Light), "({r}, {c})");
        }
        // Second codeword continues upward, third one ends right below the format area
        assert_eq!(qr.get(16, 20), Module::Data(Color::Dark));
        assert_eq!(qr.get(9, 19), Module::Data(Color::Dark));
    }

    #[test]
    fn test_encoding_region_fills_grid() {
        for ver in Version::all() {
            let qr = filled(*ver, 0xff);
            let grid = qr.to_debug_str();
            assert!(!grid.contains('.'), "Empty module in version {ver}");

            let total = ver.total_codewords();
            let light_data = grid.matches('D').count();
            assert_eq!(light_data, ver.remainder_bits(), "{ver}");
            assert_eq!(grid.matches('d').count(), total * 8, "{ver}");
        }
    }

    #[test]
    fn test_mask_self_inverse() {
        let qr = filled(5, 0b1011_0010);
        for mask in MaskPattern::all() {
            let mut masked = qr.clone();
            masked.apply_mask(mask);
            assert_eq!(masked.mask(), Some(mask));
            masked.apply_mask(mask);
            for r in 0..qr.width() as i16 {
                for c in 0..qr.width() as i16 {
                    if let Module::Data(_) = qr.get(r, c) {
                        assert_eq!(masked.get(r, c), qr.get(r, c), "Mask {} ({r}, {c})", *mask);
                    }
                }
            }
        }
    }

    #[test]
    fn test_mask_skips_reserved() {
        let qr = filled(7, 0);
        let mut masked = qr.clone();
        masked.apply_mask(MaskPattern::new(0).unwrap());
        for r in 0..qr.width() as i16 {
            for c in 0..qr.width() as i16 {
                match qr.get(r, c) {
                    Module::Func(_) | Module::Version(_) => assert_eq!(masked.get(r, c), qr.get(r, c)),
                    Module::Data(_) => {
                        let exp = Color::from((r + c) % 2 == 0);
                        assert_eq!(masked.get(r, c), Module::Data(exp), "({r}, {c})");
                    }
                    Module::Format(_) | Module::Empty => {}
                }
            }
        }
    }
}

// Render
//------------------------------------------------------------------------------

impl QR {
    // One module_sz square per module, surrounded by a 4 module quiet zone
    pub fn to_image(&self, module_sz: u32) -> GrayImage {
        let qz_sz = QUIET_ZONE_WIDTH as u32 * module_sz;
        let qr_sz = self.w as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = GrayImage::from_pixel(total_sz, total_sz, Luma([255]));
        for i in qz_sz..qz_sz + qr_sz {
            for j in qz_sz..qz_sz + qr_sz {
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;
                if *self.get(r, c) == Color::Dark {
                    canvas.put_pixel(j, i, Luma([0]));
                }
            }
        }

        canvas
    }

    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = QUIET_ZONE_WIDTH * module_sz;
        let qr_sz = self.w * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::with_capacity(total_sz * (total_sz + 1) * 3);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;
                canvas.push(self.get(r, c).select('█', ' '));
            }
            canvas.push('\n');
        }

        canvas
    }
}

#[cfg(test)]
mod render_tests {
    use super::qr_util_tests::blank;

    #[test]
    fn test_to_image() {
        let mut qr = blank(1);
        qr.draw_all_function_patterns();
        let img = qr.to_image(2);
        assert_eq!(img.dimensions(), (58, 58));
        assert_eq!(img.get_pixel(0, 0).0, [255]);
        assert_eq!(img.get_pixel(8, 8).0, [0]);
        assert_eq!(img.get_pixel(9, 9).0, [0]);
        // Light ring of the top left finder
        assert_eq!(img.get_pixel(10, 10).0, [255]);
        assert_eq!(img.get_pixel(49, 49).0, [255]);
    }

    #[test]
    fn test_to_str() {
        let mut qr = blank(1);
        qr.draw_all_function_patterns();
        let s = qr.to_str(1);
        let lines = s.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 29);
        assert!(lines.iter().all(|l| l.chars().count() == 29));
        assert!(lines[0].chars().all(|c| c == '█'));
        assert_eq!(lines[4].chars().nth(4), Some(' '));
        assert_eq!(lines[5].chars().nth(5), Some('█'));
    }

    #[test]
    fn test_matrix() {
        let mut qr = blank(1);
        qr.draw_all_function_patterns();
        let matrix = qr.matrix();
        assert_eq!(matrix.len(), 21);
        assert!(matrix.iter().all(|row| row.len() == 21));
        assert_eq!(&matrix[0][..8], [1, 1, 1, 1, 1, 1, 1, 0]);
        assert_eq!(&matrix[6][6..15], [1, 0, 1, 0, 1, 0, 1, 0, 1]);
        let dark = matrix.iter().flatten().filter(|&&m| m == 1).count();
        assert_eq!(dark, qr.count_dark_modules());
    }
}

// Global constants
//------------------------------------------------------------------------------

static QUIET_ZONE_WIDTH: usize = 4;

static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];
