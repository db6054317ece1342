use std::error::Error;

use qrforge::{generate, ECLevel, MaskPattern, QRBuilder, Version};

fn main() -> Result<(), Box<dyn Error>> {
    // Simplest usage - provide text and error correction level, everything else is chosen
    let qr = generate("Hello, World!", ECLevel::M)?;

    // Convert to image and save
    let img = qr.to_image(4); // 4x scale factor
    img.save("simple_qr.png")?;

    println!("Simple QR code saved to: simple_qr.png");
    println!("QR metadata: {}", qr.metadata());

    let data = "THIS EXAMPLE SHOWS ALL AVAILABLE CONFIGURATION OPTIONS";

    let qr = QRBuilder::new(data)
        .version(Version::new(5)?)      // QR version (size) - if not provided, finds smallest version to fit data
        .ec_level(ECLevel::H)           // Error correction level - if not provided, defaults to ECLevel::M
        .mask(MaskPattern::new(2)?)     // Mask pattern - if not provided, finds best mask based on penalty score
        .build()?;

    // Terminal rendering, one character per module
    println!("{}", qr.to_str(1));
    println!("QR metadata: {}", qr.metadata());

    Ok(())
}
