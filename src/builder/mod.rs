mod qr;

pub use qr::{Module, QR};

use std::ops::Deref;

use log::debug;

use crate::common::{
    bit_utils::BitStream,
    codec::{encode, encode_with_version, prepare},
    ec::{generator_polynomial, Block},
    error::{QRError, QRResult},
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

#[derive(Debug, Clone)]
pub struct QRBuilder<'a> {
    data: &'a str,
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a str) -> Self {
        Self { data, version: None, ec_level: ECLevel::default(), mask: None }
    }

    pub fn data(&mut self, data: &'a str) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> String {
        let version = self.version.map_or("None".to_string(), |v| v.to_string());
        let mask = self.mask.map_or("None".to_string(), |m| m.to_string());
        format!("{{ Version: {version}, Ec level: {:?}, Mask: {mask} }}", self.ec_level)
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}", self.metadata());
        if self.data.is_empty() {
            return Err(QRError::EmptyData);
        }

        let (mode, payload) = prepare(self.data);
        debug!("Encoding {} chars in {mode} mode", payload.len());

        let (encoded_data, version) = match self.version {
            Some(v) => (encode_with_version(&payload, mode, v, self.ec_level)?, v),
            None => encode(&payload, mode, self.ec_level)?,
        };
        debug!(
            "Version {version} selected, {} of {} data bits used by payload",
            mode.encoded_len(payload.len()),
            encoded_data.capacity()
        );

        let codewords = Self::construct_payload(encoded_data.data(), version, self.ec_level);

        let mut qr = QR::new(version, self.ec_level, mode, payload.len());
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(codewords);

        let mask = match self.mask {
            Some(m) => {
                debug!("Applying mask {m}");
                qr.apply_mask(m);
                m
            }
            None => apply_best_mask(&mut qr),
        };

        debug!(
            "Generated QR {}, dark modules {} of {}",
            qr.metadata(),
            qr.count_dark_modules(),
            qr.width() * qr.width()
        );
        debug_assert_eq!(qr.mask(), Some(mask));

        Ok(qr)
    }

    // Interleaves data codewords of every block, followed by their ecc
    fn construct_payload(data: &[u8], version: Version, ec_level: ECLevel) -> BitStream {
        let blocks = Self::blockify(data, version, ec_level);
        debug_assert!(
            blocks.iter().all(|b| b.ec_len() == version.ecc_per_block(ec_level)),
            "Ecc length doesn't match version {version} and ec level {ec_level:?}"
        );
        let data_blocks = blocks.iter().map(Block::data).collect::<Vec<_>>();
        let ecc_blocks = blocks.iter().map(Block::ecc).collect::<Vec<_>>();

        let total_codewords = version.total_codewords();
        debug_assert_eq!(blocks.iter().map(Block::len).sum::<usize>(), total_codewords);
        let mut payload = BitStream::new(total_codewords << 3);
        payload.extend(&Self::interleave(&data_blocks));
        payload.extend(&Self::interleave(&ecc_blocks));
        debug_assert_eq!(payload.len(), payload.capacity(), "Payload doesn't fill the symbol");
        payload
    }

    // Splits data into group 1 blocks followed by group 2 blocks, each holding
    // its ecc from the shared generator polynomial
    pub(crate) fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<Block> {
        let (block1_size, block1_count, block2_size, block2_count) =
            version.data_codewords_per_block(ec_level);

        let total_block1_size = block1_size * block1_count;
        let total_size = total_block1_size + block2_size * block2_count;

        debug_assert!(
            total_size == data.len(),
            "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
            data.len(),
            total_size
        );

        let gen_poly = generator_polynomial(version.ecc_per_block(ec_level));
        let mut blocks = Vec::with_capacity(block1_count + block2_count);
        blocks.extend(data[..total_block1_size].chunks(block1_size).map(|b| Block::new(b, &gen_poly)));
        if block2_count > 0 {
            blocks.extend(
                data[total_block1_size..].chunks(block2_size).map(|b| Block::new(b, &gen_poly)),
            );
        }
        blocks
    }

    pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if i < b.len() {
                    res.push(b[i]);
                }
            }
        }
        res
    }
}
