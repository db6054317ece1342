pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};

    // Picks the most compact mode able to represent the whole text
    pub fn detect_mode(text: &str) -> Mode {
        let bytes = text.as_bytes();
        if bytes.iter().all(|b| Mode::Numeric.contains(*b)) {
            Mode::Numeric
        } else if bytes.iter().all(|b| Mode::Alphanumeric.contains(b.to_ascii_uppercase())) {
            Mode::Alphanumeric
        } else {
            Mode::Byte
        }
    }

    // Detects the mode and returns the payload in the form it will be encoded.
    // Alphanumeric text is upper-cased, byte text is kept as its utf-8 bytes.
    pub fn prepare(text: &str) -> (Mode, Vec<u8>) {
        let mode = detect_mode(text);
        let payload = match mode {
            Mode::Alphanumeric => text.to_ascii_uppercase().into_bytes(),
            Mode::Numeric | Mode::Byte => text.as_bytes().to_vec(),
        };
        (mode, payload)
    }

    pub fn encode(data: &[u8], mode: Mode, ecl: ECLevel) -> QRResult<(BitStream, Version)> {
        let ver = select_version(data.len(), ecl, mode)?;
        let bs = encode_with_version(data, mode, ver, ecl)?;
        Ok((bs, ver))
    }

    pub fn encode_with_version(
        data: &[u8],
        mode: Mode,
        ver: Version,
        ecl: ECLevel,
    ) -> QRResult<BitStream> {
        if !fits(data.len(), mode, ver, ecl) {
            return Err(QRError::DataTooLong);
        }

        let seg = Segment::new(mode, ver.mode_bits(), ver.char_cnt_bits(mode), data);
        let mut bs = BitStream::new(ver.data_bit_capacity(ecl));
        push_segment(seg, &mut bs);
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        Ok(bs)
    }

    // Smallest version whose data capacity holds the single segment payload
    pub fn select_version(len: usize, ecl: ECLevel, mode: Mode) -> QRResult<Version> {
        Version::all().find(|&ver| fits(len, mode, ver, ecl)).ok_or(QRError::DataTooLong)
    }

    fn fits(len: usize, mode: Mode, ver: Version, ecl: ECLevel) -> bool {
        let len_bits = ver.char_cnt_bits(mode);
        let bit_len = ver.mode_bits() + len_bits + mode.encoded_len(len);
        len < (1 << len_bits) && bit_len <= ver.data_bit_capacity(ecl)
    }

    #[cfg(test)]
    mod encode_tests {
        use test_case::test_case;

        use super::{detect_mode, encode, encode_with_version, prepare, select_version};
        use crate::common::codec::Mode;
        use crate::common::error::QRError;
        use crate::common::metadata::{ECLevel, Version};

        #[test_case("0123456789", Mode::Numeric)]
        #[test_case("HELLO WORLD", Mode::Alphanumeric)]
        #[test_case("hello world", Mode::Alphanumeric)]
        #[test_case("$%*+-./: 42", Mode::Alphanumeric)]
        #[test_case("Hello, world!", Mode::Byte)]
        #[test_case("12#4", Mode::Byte)]
        #[test_case("Ünïcödé", Mode::Byte)]
        fn test_detect_mode(text: &str, exp: Mode) {
            assert_eq!(detect_mode(text), exp);
        }

        #[test]
        fn test_prepare() {
            assert_eq!(prepare("hello world"), (Mode::Alphanumeric, b"HELLO WORLD".to_vec()));
            assert_eq!(prepare("Hello!"), (Mode::Byte, b"Hello!".to_vec()));
            assert_eq!(prepare("ß"), (Mode::Byte, vec![0xc3, 0x9f]));
            assert_eq!(prepare("007"), (Mode::Numeric, b"007".to_vec()));
        }

        #[test]
        fn test_encode_hello_world() {
            let (bs, ver) = encode(b"HELLO WORLD", Mode::Alphanumeric, ECLevel::M).unwrap();
            assert_eq!(*ver, 1);
            assert_eq!(bs.len(), bs.capacity());
            assert_eq!(
                bs.data(),
                [
                    0x20, 0x5b, 0x0b, 0x78, 0xd1, 0x72, 0xdc, 0x4d, 0x43, 0x40, 0xec, 0x11, 0xec,
                    0x11, 0xec, 0x11
                ]
            );
        }

        #[test]
        fn test_encode_numeric() {
            let ver = Version::new(1).unwrap();
            let bs = encode_with_version(b"01234567", Mode::Numeric, ver, ECLevel::M).unwrap();
            // Header 0001 + 0000001000, data 0000001100 0101011001 1000011, terminator 0000
            assert_eq!(&bs.data()[..6], [0x10, 0x20, 0x0c, 0x56, 0x61, 0x80]);
            assert_eq!(bs.data()[6], 0xec);
        }

        #[test_case("1".repeat(41), Mode::Numeric, ECLevel::L, 1)]
        #[test_case("1".repeat(42), Mode::Numeric, ECLevel::L, 2)]
        #[test_case("A".repeat(25), Mode::Alphanumeric, ECLevel::L, 1)]
        #[test_case("A".repeat(26), Mode::Alphanumeric, ECLevel::L, 2)]
        #[test_case("a".repeat(17), Mode::Byte, ECLevel::L, 1)]
        #[test_case("a".repeat(18), Mode::Byte, ECLevel::L, 2)]
        #[test_case("a".repeat(7), Mode::Byte, ECLevel::H, 1)]
        #[test_case("a".repeat(8), Mode::Byte, ECLevel::H, 2)]
        #[test_case("1".repeat(7089), Mode::Numeric, ECLevel::L, 40)]
        #[test_case("A".repeat(4296), Mode::Alphanumeric, ECLevel::L, 40)]
        #[test_case("a".repeat(2953), Mode::Byte, ECLevel::L, 40)]
        #[test_case("a".repeat(1273), Mode::Byte, ECLevel::H, 40)]
        fn test_select_version(data: String, mode: Mode, ecl: ECLevel, exp: usize) {
            let ver = select_version(data.len(), ecl, mode).unwrap();
            assert_eq!(*ver, exp);
        }

        #[test_case(7090, Mode::Numeric, ECLevel::L)]
        #[test_case(4297, Mode::Alphanumeric, ECLevel::L)]
        #[test_case(2954, Mode::Byte, ECLevel::L)]
        #[test_case(1274, Mode::Byte, ECLevel::H)]
        fn test_select_version_overflow(len: usize, mode: Mode, ecl: ECLevel) {
            assert_eq!(select_version(len, ecl, mode), Err(QRError::DataTooLong));
        }

        #[test]
        fn test_select_version_monotonic() {
            let ecls = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];
            for mode in [Mode::Numeric, Mode::Alphanumeric, Mode::Byte] {
                for ecl in ecls {
                    let mut prev = 1;
                    for len in (1..1200).step_by(7) {
                        let ver = select_version(len, ecl, mode).unwrap();
                        assert!(*ver >= prev, "Version dropped at {len} chars: {mode} {ecl:?}");
                        prev = *ver;
                    }
                }
                for len in (1..900).step_by(11) {
                    let vers = ecls.map(|ecl| *select_version(len, ecl, mode).unwrap());
                    assert!(vers.windows(2).all(|w| w[0] <= w[1]), "{len} chars: {vers:?}");
                }
            }
        }

        #[test]
        fn test_encode_with_version_too_long() {
            let ver = Version::new(1).unwrap();
            let res = encode_with_version(&[b'a'; 18], Mode::Byte, ver, ECLevel::L);
            assert_eq!(res.err(), Some(QRError::DataTooLong));
        }
    }
}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment, PADDING_CODEWORDS};

    pub fn push_segment(seg: Segment, out: &mut BitStream) {
        push_header(&seg, out);
        match seg.mode {
            Mode::Numeric => push_numeric_data(seg.data, out),
            Mode::Alphanumeric => push_alphanumeric_data(seg.data, out),
            Mode::Byte => push_byte_data(seg.data, out),
        }
    }

    fn push_header(seg: &Segment, out: &mut BitStream) {
        out.push_bits(seg.mode as u8, seg.mode_bits);
        let char_cnt = seg.data.len();
        debug_assert!(
            char_cnt < (1 << seg.len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {}",
            seg.len_bits
        );
        out.push_bits(char_cnt as u16, seg.len_bits);
    }

    fn push_numeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(3) {
            let len = Mode::Numeric.encoded_len(chunk.len());
            out.push_bits(Mode::Numeric.encode_chunk(chunk), len);
        }
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = Mode::Alphanumeric.encoded_len(chunk.len());
            out.push_bits(Mode::Alphanumeric.encode_chunk(chunk), len);
        }
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for &b in data {
            out.push_bits(b, 8);
        }
    }

    // Up to four zero bits, clipped to whatever capacity is left
    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 && out.len() < out.capacity() {
            out.push_bits(0u8, 8 - offset);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        debug_assert!(offset == 0, "Bit offset should be zero before padding codewords: {offset}");

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}
