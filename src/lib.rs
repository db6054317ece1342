//! # qrforge
//!
//! A Rust library for generating QR codes with Reed-Solomon error correction.
//! Supports numeric, alphanumeric and byte (UTF-8) modes across versions 1 to 40 and all four
//! error correction levels.
//!
//! ## Features
//!
//! - **Automatic Mode Detection**: Digits are packed as numeric, upper-case text as alphanumeric,
//!   everything else as UTF-8 bytes
//! - **Version Selection**: Picks the smallest version that holds the data at the chosen level
//! - **Reed-Solomon Error Correction**: Configurable levels (L, M, Q, H)
//! - **Mask Selection**: Scores all 8 mask patterns in parallel and keeps the cheapest
//! - **Rendering**: Grayscale images and terminal friendly strings, both with a quiet zone
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrforge::{generate, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = generate("HELLO WORLD", ECLevel::M)?;
//! assert_eq!(*qr.version(), 1);
//! assert_eq!(qr.width(), 21);
//!
//! // Rows of 0 for light and 1 for dark modules
//! let matrix = qr.matrix();
//! assert_eq!(matrix.len(), 21);
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust,no_run
//! use qrforge::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("Hello, World!")
//!     .version(Version::new(2)?)         // QR version (size) - if not provided, finds smallest version to fit data
//!     .ec_level(ECLevel::Q)              // Error correction level - if not provided, defaults to ECLevel::M
//!     .mask(MaskPattern::new(3)?)        // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! let img = qr.to_image(4);  // 4x scale factor
//! img.save("configured_qr.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! Versions 1-40, with sizes from 21x21 to 177x177 modules
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(
    clippy::items_after_test_module,
    clippy::suspicious_arithmetic_impl,
    clippy::suspicious_op_assign_impl
)]

pub mod builder;
pub(crate) mod common;

pub use builder::{Module, QRBuilder, QR};
pub use common::codec::Mode;
pub use common::error::{QRError, QRResult};
pub use common::mask::{compute_total_penalty, MaskPattern};
pub use common::metadata::{Color, ECLevel, Metadata, Version};

/// Encodes text into a QR symbol at the given error correction level, choosing the mode, the
/// smallest fitting version and the best mask.
///
/// Fails with [`QRError::EmptyData`] for empty text and with [`QRError::DataTooLong`] when no
/// version can hold the text.
pub fn generate(text: &str, ec_level: ECLevel) -> QRResult<QR> {
    QRBuilder::new(text).ec_level(ec_level).build()
}
